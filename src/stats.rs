use crate::parser::{Direction, TraceMessage};
use chrono::NaiveTime;
use comfy_table::{Cell, ContentArrangement, Table};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Aggregate counters for one operation type
#[derive(Debug, Clone, Serialize)]
pub struct TypeStatEntry {
    pub op_type: String,
    pub count: usize,
    pub body_lines: usize,
    pub body_bytes: usize,
    pub outbound: usize,
    pub inbound: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeStatsReport {
    pub total_messages: usize,
    pub typeless_messages: usize,
    pub total_body_bytes: usize,
    pub outbound_messages: usize,
    pub inbound_messages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    pub entries: Vec<TypeStatEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeRange {
    pub first: String,
    pub last: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_seconds: Option<f64>,
}

pub fn collect_type_stats(messages: &[TraceMessage]) -> TypeStatsReport {
    let mut accum: BTreeMap<String, TypeStatEntry> = BTreeMap::new();
    let mut typeless_messages = 0;
    let mut total_body_bytes = 0;
    let mut outbound_messages = 0;
    let mut inbound_messages = 0;

    for message in messages {
        let key = match &message.op_type {
            Some(op_type) => op_type.clone(),
            None => {
                typeless_messages += 1;
                "(untyped)".to_string()
            }
        };

        let entry = accum.entry(key.clone()).or_insert_with(|| TypeStatEntry {
            op_type: key,
            count: 0,
            body_lines: 0,
            body_bytes: 0,
            outbound: 0,
            inbound: 0,
        });

        entry.count += 1;
        entry.body_lines += message.body.len();
        entry.body_bytes += message.byte_count;
        total_body_bytes += message.byte_count;
        match message.direction {
            Direction::Outbound => {
                entry.outbound += 1;
                outbound_messages += 1;
            }
            Direction::Inbound => {
                entry.inbound += 1;
                inbound_messages += 1;
            }
            Direction::Unparsed => {}
        }
    }

    let mut entries: Vec<TypeStatEntry> = accum.into_values().collect();
    entries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.op_type.cmp(&b.op_type))
    });

    TypeStatsReport {
        total_messages: messages.len(),
        typeless_messages,
        total_body_bytes,
        outbound_messages,
        inbound_messages,
        time_range: compute_time_range(messages),
        entries,
    }
}

fn compute_time_range(messages: &[TraceMessage]) -> Option<TimeRange> {
    let first = messages.first()?;
    let last = messages.last()?;

    let span_seconds = match (parse_trace_time(&first.time), parse_trace_time(&last.time)) {
        (Some(start), Some(end)) => {
            Some(end.signed_duration_since(start).num_milliseconds() as f64 / 1000.0)
        }
        _ => None,
    };

    Some(TimeRange {
        first: first.time.clone(),
        last: last.time.clone(),
        span_seconds,
    })
}

fn parse_trace_time(time: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M:%S%.3f").ok()
}

pub fn format_stats_text(report: &TypeStatsReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "TYPES: {} messages, {} operation types, {} body bytes",
        report.total_messages,
        report.entries.len(),
        report.total_body_bytes
    );
    let _ = writeln!(
        out,
        "  outbound: {}  inbound: {}  untyped: {}",
        report.outbound_messages, report.inbound_messages, report.typeless_messages
    );
    if let Some(range) = &report.time_range {
        match range.span_seconds {
            Some(span) => {
                let _ = writeln!(
                    out,
                    "  time range: {} to {} ({:.3}s)",
                    range.first, range.last, span
                );
            }
            None => {
                let _ = writeln!(out, "  time range: {} to {}", range.first, range.last);
            }
        }
    }

    if report.entries.is_empty() {
        return out;
    }
    out.push('\n');

    let mut table = create_styled_table(&["Type", "Count", "Lines", "Bytes", "Out", "In", "Percent"]);
    for entry in &report.entries {
        let percentage = (entry.count as f64 / report.total_messages.max(1) as f64) * 100.0;
        table.add_row(vec![
            Cell::new(&entry.op_type),
            Cell::new(entry.count),
            Cell::new(entry.body_lines),
            Cell::new(entry.body_bytes),
            Cell::new(entry.outbound),
            Cell::new(entry.inbound),
            Cell::new(format!("{:>6.2}%", percentage)),
        ]);
    }
    let _ = writeln!(out, "{table}");

    out
}

pub fn format_stats_json(report: &TypeStatsReport) -> String {
    serde_json::to_string_pretty(&json!({ "stats": report }))
        .unwrap_or_else(|_| "{\"stats\":{\"error\":\"failed to serialize stats output\"}}".into())
}

fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.to_vec());
    table
}
