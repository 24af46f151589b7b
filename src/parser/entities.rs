use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Direction of a trace message relative to the managed device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Outbound,
    Inbound,
    Unparsed,
}

impl Direction {
    /// Arrow notation used in overview output
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Outbound => "-->",
            Direction::Inbound => "<--",
            Direction::Unparsed => "???",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Outbound => "outbound",
            Direction::Inbound => "inbound",
            Direction::Unparsed => "unparsed",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.arrow())
    }
}

/// Advisory flags lifted from a message header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MessageFlags {
    pub closed: bool,
    pub badxml: bool,
    pub timeout: bool,
    pub eof: bool,
    pub unparsed: bool,
}

impl MessageFlags {
    pub fn any(&self) -> bool {
        self.closed || self.badxml || self.timeout || self.eof || self.unparsed
    }
}

/// One marker-delimited block of a trace file, header plus body plus the
/// derived summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceMessage {
    /// Source line number of the marker line (1-based).
    pub line_start: usize,
    /// Last source line of the body (inclusive); equals `line_start` when the
    /// body is empty.
    pub line_end: usize,
    /// Sum of raw body line lengths, newline-exclusive.
    pub byte_count: usize,
    pub direction: Direction,
    /// Raw timestamp token as it appeared in the header.
    pub timestamp: String,
    pub date: String,
    pub time: String,
    pub user: Option<String>,
    pub thandle: Option<String>,
    pub hostname: Option<String>,
    pub device: Option<String>,
    pub session_id: Option<String>,
    pub trace_id: Option<String>,
    /// Unrecognized `key=value` header tokens, kept for attribute queries.
    pub extensions: BTreeMap<String, String>,
    pub flags: MessageFlags,
    pub message_id: Option<String>,
    /// Classified operation type ("hello", or the first tag line after an
    /// rpc/rpc-reply open tag). Absent when nothing classifiable was found.
    pub op_type: Option<String>,
    pub raw_header: String,
    pub body: Vec<String>,
}

impl TraceMessage {
    pub fn new(line_start: usize, raw_header: String) -> Self {
        Self {
            line_start,
            line_end: line_start,
            byte_count: 0,
            direction: Direction::Unparsed,
            timestamp: String::new(),
            date: String::new(),
            time: String::new(),
            user: None,
            thandle: None,
            hostname: None,
            device: None,
            session_id: None,
            trace_id: None,
            extensions: BTreeMap::new(),
            flags: MessageFlags::default(),
            message_id: None,
            op_type: None,
            raw_header,
            body: Vec::new(),
        }
    }

    /// Full line span of the record, marker line included.
    pub fn length(&self) -> usize {
        self.line_end - self.line_start + 1
    }

    pub fn op_type_or_empty(&self) -> &str {
        self.op_type.as_deref().unwrap_or("")
    }

    /// Attribute presence check for `?key` query conditions. Keys use the
    /// header spelling (`session-id`, not `session_id`).
    pub fn has_attribute(&self, key: &str) -> bool {
        match key {
            "user" => self.user.is_some(),
            "thandle" => self.thandle.is_some(),
            "hostname" => self.hostname.is_some(),
            "device" => self.device.is_some(),
            "session-id" => self.session_id.is_some(),
            "trace-id" => self.trace_id.is_some(),
            "message-id" => self.message_id.is_some(),
            "type" => self.op_type.is_some(),
            _ => self.extensions.contains_key(key),
        }
    }
}

/// A recoverable header anomaly, reported out of band from the records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    pub line_number: usize,
    pub token: String,
    pub note: String,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: unparsed token \"{}\" ({})",
            self.line_number, self.token, self.note
        )
    }
}

/// The parsed representation of one whole trace file
#[derive(Debug, Clone, Default)]
pub struct TraceOverview {
    pub messages: Vec<TraceMessage>,
    pub diagnostics: Vec<ParseDiagnostic>,
}
