use crate::config::TroveConfig;
use crate::expand::{ExpansionSet, MatchContext};
use crate::parser::{TraceMessage, TraceOverview};
use colored::{ColoredString, Colorize};
use serde_json::json;
use std::fmt::Write;

/// Renders the per-message overview, one summary line per record, plus the
/// matching body lines for every message the expansion set selects.
pub fn format_overview_text(
    overview: &TraceOverview,
    expansions: &ExpansionSet,
    config: &TroveConfig,
) -> String {
    let mut out = String::new();
    let mut ctx = MatchContext::new(&config.matcher);

    for (index, message) in overview.messages.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:3} {:4}+{:<5} {:>7} {} {} {} {}",
            index,
            message.line_start,
            message.length(),
            format!("{}B", message.byte_count),
            message.time,
            colored_arrow(message),
            message.message_id.as_deref().unwrap_or(""),
            flagged_type(message)
        );

        if expansions.matches_message(message, &mut ctx) {
            for (lineno, line) in message.body.iter().enumerate() {
                let lineno = lineno + 1;
                if expansions.matches_line(message, line, lineno, &mut ctx) {
                    let _ = writeln!(out, "       {:10}:  {}", lineno, line);
                }
            }
        }
    }

    out
}

pub fn format_overview_json(
    overview: &TraceOverview,
    expansions: &ExpansionSet,
    config: &TroveConfig,
) -> String {
    let mut ctx = MatchContext::new(&config.matcher);

    let rows: Vec<_> = overview
        .messages
        .iter()
        .enumerate()
        .map(|(index, message)| {
            let expanded_lines = if expansions.matches_message(message, &mut ctx) {
                let lines: Vec<_> = message
                    .body
                    .iter()
                    .enumerate()
                    .filter_map(|(lineno, line)| {
                        let lineno = lineno + 1;
                        expansions
                            .matches_line(message, line, lineno, &mut ctx)
                            .then(|| json!({ "line_number": lineno, "text": line }))
                    })
                    .collect();
                Some(lines)
            } else {
                None
            };

            json!({
                "index": index,
                "line_start": message.line_start,
                "line_end": message.line_end,
                "length": message.length(),
                "byte_count": message.byte_count,
                "direction": message.direction.as_str(),
                "timestamp": message.timestamp,
                "date": message.date,
                "time": message.time,
                "user": message.user,
                "thandle": message.thandle,
                "hostname": message.hostname,
                "device": message.device,
                "session_id": message.session_id,
                "trace_id": message.trace_id,
                "extensions": message.extensions,
                "flags": message.flags,
                "message_id": message.message_id,
                "type": message.op_type,
                "expanded_lines": expanded_lines,
            })
        })
        .collect();

    serde_json::to_string_pretty(&json!({
        "overview": {
            "count": overview.messages.len(),
            "diagnostics": overview.diagnostics,
            "messages": rows,
        }
    }))
    .unwrap_or_else(|_| {
        "{\"overview\":{\"error\":\"failed to serialize overview output\"}}".to_string()
    })
}

fn colored_arrow(message: &TraceMessage) -> ColoredString {
    use crate::parser::Direction;
    match message.direction {
        Direction::Outbound => message.direction.arrow().green(),
        Direction::Inbound => message.direction.arrow().cyan(),
        Direction::Unparsed => message.direction.arrow().red(),
    }
}

/// Type column with advisory flag markers prepended, most severe last so it
/// ends up leftmost.
fn flagged_type(message: &TraceMessage) -> String {
    let mut label = message.op_type_or_empty().to_string();
    if message.flags.unparsed {
        label = format!("{} {}", "UNPARSED".red(), label);
    }
    if message.flags.badxml {
        label = format!("{} {}", "BADXML".red(), label);
    }
    if message.flags.timeout {
        label = format!("{} {}", "TIMEOUT".yellow(), label);
    }
    if message.flags.closed {
        label = format!("{} {}", "CLOSED".blue(), label);
    }
    if message.flags.eof {
        label = format!("{} {}", "EOF".magenta(), label);
    }
    label
}
