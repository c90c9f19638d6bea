//! Span Edits
//!
//! Every mutation of a round is collected as a byte-range replacement against the
//! current source text, then applied in a single pass.

use crate::error::{CodemodError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: u32,
    pub end: u32,
    pub text: String,
}

#[derive(Debug)]
pub struct EditSet<'s> {
    source: &'s str,
    edits: Vec<Edit>,
}

impl<'s> EditSet<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn replace(&mut self, start: u32, end: u32, text: impl Into<String>) {
        self.edits.push(Edit {
            start,
            end,
            text: text.into(),
        });
    }

    pub fn remove(&mut self, start: u32, end: u32) {
        self.replace(start, end, String::new());
    }

    /// Remove a statement. When it sits alone on its line the whole line goes with it.
    pub fn remove_statement(&mut self, start: u32, end: u32) {
        let bytes = self.source.as_bytes();
        let (start_idx, end_idx) = (start as usize, end as usize);

        let mut line_start = start_idx;
        while line_start > 0 && matches!(bytes[line_start - 1], b' ' | b'\t') {
            line_start -= 1;
        }
        let owns_line_start = line_start == 0 || bytes[line_start - 1] == b'\n';

        let mut line_end = end_idx;
        while line_end < bytes.len() && matches!(bytes[line_end], b' ' | b'\t') {
            line_end += 1;
        }
        if line_end < bytes.len() && bytes[line_end] == b'\r' {
            line_end += 1;
        }
        let owns_line_end = line_end == bytes.len() || bytes[line_end] == b'\n';

        if owns_line_start && owns_line_end {
            let line_end = (line_end + 1).min(bytes.len());
            self.remove(line_start as u32, line_end as u32);
        } else {
            self.remove(start, end);
        }
    }

    /// Remove the flagged items of a comma separated list together with their separators.
    ///
    /// Returns `true` without recording anything when every item is flagged; the caller
    /// then removes the enclosing construct instead.
    pub fn remove_list_items(&mut self, items: &[(u32, u32)], removed: &[bool]) -> bool {
        debug_assert_eq!(items.len(), removed.len());
        if removed.iter().all(|r| *r) {
            return true;
        }

        let mut i = 0;
        while i < items.len() {
            if !removed[i] {
                i += 1;
                continue;
            }
            let run_start = i;
            while i < items.len() && removed[i] {
                i += 1;
            }
            let run_end = i - 1;
            if i < items.len() {
                // Followed by a kept item: drop up to where it starts.
                self.remove(items[run_start].0, items[i].0);
            } else {
                // Trailing run: drop from the end of the last kept item.
                self.remove(items[run_start - 1].1, items[run_end].1);
            }
        }
        false
    }

    /// Apply all edits. Edits nested inside another edit are dropped; partial overlaps
    /// are a conflict.
    pub fn apply(mut self) -> Result<String> {
        self.edits
            .sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut output = String::with_capacity(self.source.len());
        let mut cursor = 0usize;
        let mut last: Option<(u32, u32)> = None;

        for edit in &self.edits {
            if let Some((last_start, last_end)) = last {
                if edit.start < last_end {
                    if edit.end <= last_end {
                        continue;
                    }
                    return Err(CodemodError::EditConflict {
                        first: (last_start, last_end),
                        second: (edit.start, edit.end),
                    });
                }
            }
            output.push_str(&self.source[cursor..edit.start as usize]);
            output.push_str(&edit.text);
            cursor = edit.end as usize;
            last = Some((edit.start, edit.end));
        }
        output.push_str(&self.source[cursor..]);
        Ok(output)
    }
}
