use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( *)</?([^ />]*)").expect("valid tag regex"));

/// Derives `(tag_name, depth)` from an indented pseudo-XML line, or `None`
/// when the line is not tag-like. Depth is the leading-space count divided
/// by two (the trace pretty-printer indents two spaces per level). Closing
/// tags report the same name as their opener.
pub fn tag_and_depth(line: &str) -> Option<(&str, usize)> {
    let caps = TAG_RE.captures(line)?;
    let depth = caps.get(1).map_or(0, |m| m.len()) / 2;
    let name = caps.get(2).map_or("", |m| m.as_str());
    Some((name, depth))
}

/// Depth-indexed map of the innermost currently-open tag at each nesting
/// level, rebuilt progressively while scanning one message's body. Never
/// shared across messages.
#[derive(Debug, Clone, Default)]
pub struct TagStack {
    entries: HashMap<usize, String>,
}

impl TagStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Feeds one body line to the stack. Observing a tag at depth `d`
    /// invalidates any tag previously recorded at depth `d + 1`, so stale
    /// entries from a sibling's subtree cannot leak into path matches.
    /// Returns the derived pair even for lines whose tag name is empty.
    pub fn observe<'l>(&mut self, line: &'l str) -> Option<(&'l str, usize)> {
        let (name, depth) = tag_and_depth(line)?;
        if !name.is_empty() {
            self.entries.insert(depth, name.to_string());
            self.entries.remove(&(depth + 1));
        }
        Some((name, depth))
    }

    pub fn get(&self, depth: usize) -> Option<&str> {
        self.entries.get(&depth).map(String::as_str)
    }

    /// True when `components` exactly cover the open tags from `start`
    /// downwards: each component matches the entry at its consecutive depth
    /// and no deeper entry follows the last one. A strict prefix of a deeper
    /// stack does not match.
    pub fn matches_at(&self, start: usize, components: &[String]) -> bool {
        for (offset, component) in components.iter().enumerate() {
            if self.get(start + offset) != Some(component.as_str()) {
                return false;
            }
        }
        self.get(start + components.len()).is_none()
    }
}
