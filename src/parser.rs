use crate::config::TroveConfig;
use std::fs;
use std::path::Path;
use thiserror::Error;

mod entities;

pub use entities::{Direction, MessageFlags, ParseDiagnostic, TraceMessage, TraceOverview};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read trace file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Parses a whole trace file into an ordered sequence of message records.
pub fn parse_trace_file(
    path: impl AsRef<Path>,
    config: &TroveConfig,
) -> Result<TraceOverview, ParseError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_trace_text(&text, config))
}

/// Segments raw trace text on marker lines. Lines before the first marker
/// are discarded; the trailing in-progress record is finalized at EOF so the
/// record count always equals the marker-line count (modulo the type-less
/// drop policy).
pub fn parse_trace_text(text: &str, config: &TroveConfig) -> TraceOverview {
    let mut messages = Vec::new();
    let mut diagnostics = Vec::new();
    let mut current: Option<TraceMessage> = None;
    let mut last_lineno = 0;

    for (idx, line) in text.lines().enumerate() {
        let lineno = idx + 1;
        last_lineno = lineno;

        if line.starts_with(&config.parser.outbound_marker)
            || line.starts_with(&config.parser.inbound_marker)
        {
            if let Some(mut message) = current.take() {
                summarize_message(&mut message, lineno, config);
                push_message(&mut messages, message, config);
            }
            current = Some(parse_message_header(lineno, line, config, &mut diagnostics));
        } else if let Some(message) = current.as_mut() {
            message.byte_count += line.len();
            message.body.push(line.to_string());
        }
    }

    if let Some(mut message) = current.take() {
        summarize_message(&mut message, last_lineno + 1, config);
        push_message(&mut messages, message, config);
    }

    TraceOverview {
        messages,
        diagnostics,
    }
}

fn push_message(out: &mut Vec<TraceMessage>, message: TraceMessage, config: &TroveConfig) {
    if message.op_type.is_none() && !config.summary.keep_typeless {
        return;
    }
    out.push(message);
}

/// Parses one marker line into a partial message record.
///
/// Header format:
/// `<marker> <date>::<time> [user: <name>] [thandle <n>] [hostname <h>]
/// [device <d>] [session-id=<id>] [trace-id=<id>] [NCS close] [(badxml)]
/// [TIMEOUT] [EOF]`
///
/// Unrecognized tokens set the `unparsed` flag and emit a diagnostic but
/// never abort the parse.
fn parse_message_header(
    lineno: usize,
    line: &str,
    config: &TroveConfig,
    diagnostics: &mut Vec<ParseDiagnostic>,
) -> TraceMessage {
    let mut message = TraceMessage::new(lineno, line.to_string());
    let words: Vec<&str> = line.split(' ').collect();

    if words[0] == config.parser.outbound_marker {
        message.direction = Direction::Outbound;
    } else if words[0] == config.parser.inbound_marker {
        message.direction = Direction::Inbound;
    } else {
        message.flags.unparsed = true;
        diagnostics.push(diagnostic(lineno, words[0], "unknown direction marker"));
    }

    match words.get(1) {
        Some(timestamp) => {
            message.timestamp = timestamp.to_string();
            match timestamp.split_once(&config.parser.timestamp_separator) {
                Some((date, time)) => {
                    message.date = date.to_string();
                    message.time = time.to_string();
                }
                None => {
                    message.date = timestamp.to_string();
                    message.flags.unparsed = true;
                    diagnostics.push(diagnostic(lineno, timestamp, "malformed timestamp"));
                }
            }
        }
        None => {
            message.flags.unparsed = true;
            diagnostics.push(diagnostic(lineno, line, "missing timestamp"));
        }
    }

    let mut i = 2;
    while i < words.len() {
        let word = words[i];
        let next = words.get(i + 1).copied();

        match word {
            "user:" | "thandle" | "hostname" | "device" => match next {
                Some(value) => {
                    let value = Some(value.to_string());
                    match word {
                        "user:" => message.user = value,
                        "thandle" => message.thandle = value,
                        "hostname" => message.hostname = value,
                        _ => message.device = value,
                    }
                    i += 1;
                }
                None => {
                    message.flags.unparsed = true;
                    diagnostics.push(diagnostic(lineno, word, "missing value"));
                }
            },
            "NCS" => {
                if next == Some("close") {
                    message.flags.closed = true;
                    i += 1;
                } else {
                    message.flags.unparsed = true;
                    diagnostics.push(diagnostic(lineno, word, "expected \"close\""));
                }
            }
            "(badxml)" => message.flags.badxml = true,
            "TIMEOUT" => message.flags.timeout = true,
            "EOF" => message.flags.eof = true,
            _ => {
                if let Some(value) = word.strip_prefix("session-id=") {
                    message.session_id = Some(value.to_string());
                } else if let Some(value) = word.strip_prefix("trace-id=") {
                    message.trace_id = Some(value.to_string());
                } else if let Some((key, value)) = word.split_once('=')
                    && !key.is_empty()
                {
                    message
                        .extensions
                        .insert(key.to_string(), value.to_string());
                } else {
                    message.flags.unparsed = true;
                    diagnostics.push(diagnostic(lineno, word, "unrecognized token"));
                }
            }
        }
        i += 1;
    }

    message
}

fn diagnostic(line_number: usize, token: &str, note: &str) -> ParseDiagnostic {
    ParseDiagnostic {
        line_number,
        token: token.to_string(),
        note: note.to_string(),
    }
}

/// Enriches a record whose body is complete: computes the line span and scans
/// the leading body lines for the message id and the operation type.
fn summarize_message(message: &mut TraceMessage, next_marker_line: usize, config: &TroveConfig) {
    message.line_end = next_marker_line - 1;

    let mut main_op = false;
    for line in message.body.iter().take(config.summary.scan_limit) {
        if line.contains("<hello ") {
            message.op_type = Some("hello".to_string());
            break;
        }
        if message.message_id.is_none()
            && let Some((_, rest)) = line.split_once("message-id=")
        {
            message.message_id = Some(parse_message_id(rest));
        }
        if line.contains("<rpc ") || line.contains("<rpc-reply ") {
            main_op = true;
            continue;
        }
        if main_op && line.trim_start().starts_with('<') {
            if message.op_type.is_none() {
                message.op_type = Some(truncate_type(line.trim(), config.summary.type_max_len));
            }
            main_op = false;
        }
    }
}

/// Extracts the quoted value following `message-id=`. A value not opening
/// with a double quote reads as `"?"`; an unterminated quote still yields the
/// text after it.
fn parse_message_id(rest: &str) -> String {
    match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next().unwrap_or("").to_string(),
        None => "?".to_string(),
    }
}

fn truncate_type(tag_line: &str, max_len: usize) -> String {
    if tag_line.chars().count() <= max_len {
        tag_line.to_string()
    } else {
        let truncated: String = tag_line.chars().take(max_len).collect();
        format!("{truncated}...")
    }
}
