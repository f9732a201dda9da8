//! Blob-level diff: line-oriented comparison of two byte sequences.
//!
//! The edit script comes from the `similar` crate (Myers algorithm, greedy
//! diagonal tie-break, so equal-cost alignments resolve reproducibly). Line
//! splitting, comparison keys, and hunk assembly live here: hunks carry up
//! to `context_lines` unchanged lines on each side, and two edit runs merge
//! into one hunk when the unchanged gap between them is at most
//! 2 x `context_lines` + `interhunk_lines`.
//!
//! Pure function of its inputs; no store access and no error conditions.

use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, Algorithm, DiffOp, DiffTag};
use tracing::debug;

use crate::options::{BinaryDetection, DiffOptions};

/// Bytes scanned from the head of each side for binary classification.
const BINARY_SCAN_WINDOW: usize = 8000;

/// A single line in a diff hunk. The text keeps its original line
/// terminator; context lines carry the new side's bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffLine {
    /// A line present in both old and new.
    Context(String),
    /// A line added in the new content.
    Added(String),
    /// A line removed from the old content.
    Deleted(String),
}

impl DiffLine {
    /// The line text, terminator included when one was present.
    pub fn text(&self) -> &str {
        match self {
            Self::Context(t) | Self::Added(t) | Self::Deleted(t) => t,
        }
    }
}

/// A contiguous region of changes with its surrounding context.
///
/// `old_lines` counts Context + Deleted lines, `new_lines` counts Context +
/// Added lines. Starts are 1-based; a side contributing no lines uses its
/// 0-based insertion position instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// Line number in the old content where this hunk starts.
    pub old_start: usize,
    /// Number of old-side lines covered by this hunk.
    pub old_lines: usize,
    /// Line number in the new content where this hunk starts.
    pub new_start: usize,
    /// Number of new-side lines covered by this hunk.
    pub new_lines: usize,
    /// The individual lines of this hunk.
    pub lines: Vec<DiffLine>,
}

/// The result of diffing two blobs' content.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentChanges {
    /// Whether the pair was classified as binary. Binary pairs carry no
    /// hunks.
    pub is_binary: bool,
    /// The diff hunks, in old-content order.
    pub hunks: Vec<Hunk>,
    /// Total number of lines in the old content (0 for binary).
    pub old_total_lines: usize,
    /// Total number of lines in the new content (0 for binary).
    pub new_total_lines: usize,
    /// The old content is non-empty and does not end with a newline.
    pub old_missing_newline: bool,
    /// The new content is non-empty and does not end with a newline.
    pub new_missing_newline: bool,
}

impl ContentChanges {
    /// Returns `true` for a text pair with no differences.
    pub fn is_empty(&self) -> bool {
        !self.is_binary && self.hunks.is_empty()
    }

    /// Total number of lines added across all hunks.
    pub fn additions(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Added(_)))
            .count()
    }

    /// Total number of lines removed across all hunks.
    pub fn deletions(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Deleted(_)))
            .count()
    }
}

/// Compute a line-level diff between two byte sequences.
///
/// Binary pairs (per `options.binary_detection()`) skip edit-script work
/// entirely. `\r\n` and `\n` are both accepted as line terminators and
/// compare equal; a missing final newline is reported per side, never an
/// error.
pub fn diff_content(old: &[u8], new: &[u8], options: &DiffOptions) -> ContentChanges {
    let is_binary = match options.binary_detection() {
        BinaryDetection::ForceBinary => true,
        BinaryDetection::ForceText => false,
        BinaryDetection::Auto => looks_binary(old) || looks_binary(new),
    };
    if is_binary {
        debug!("content classified as binary; skipping edit script");
        return ContentChanges {
            is_binary: true,
            ..ContentChanges::default()
        };
    }

    let old_text = String::from_utf8_lossy(old);
    let new_text = String::from_utf8_lossy(new);
    let old_lines: Vec<&str> = split_lines(&old_text);
    let new_lines: Vec<&str> = split_lines(&new_text);

    let mut changes = ContentChanges {
        is_binary: false,
        hunks: Vec::new(),
        old_total_lines: old_lines.len(),
        new_total_lines: new_lines.len(),
        old_missing_newline: !old_text.is_empty() && !old_text.ends_with('\n'),
        new_missing_newline: !new_text.is_empty() && !new_text.ends_with('\n'),
    };

    if old == new {
        return changes;
    }

    let ignore_ws = options.ignore_whitespace();
    let old_keys: Vec<String> = old_lines.iter().map(|l| line_key(l, ignore_ws)).collect();
    let new_keys: Vec<String> = new_lines.iter().map(|l| line_key(l, ignore_ws)).collect();

    let ops = capture_diff_slices(Algorithm::Myers, &old_keys, &new_keys);
    changes.hunks = assemble_hunks(&ops, &old_lines, &new_lines, options);
    changes
}

/// Binary heuristic: a NUL byte in the scan window, a window-sized run
/// without a newline, or content that is not valid UTF-8.
fn looks_binary(data: &[u8]) -> bool {
    let window = &data[..data.len().min(BINARY_SCAN_WINDOW)];
    if window.contains(&0) {
        return true;
    }
    if data.len() >= BINARY_SCAN_WINDOW && !window.contains(&b'\n') {
        return true;
    }
    std::str::from_utf8(data).is_err()
}

/// Split into lines, each keeping its terminator. A trailing fragment
/// without a newline still counts as a line.
fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Comparison key for one line. `\r\n` normalizes to `\n` so terminator
/// style never registers as a change; with `ignore_ws` all whitespace is
/// stripped.
fn line_key(line: &str, ignore_ws: bool) -> String {
    if ignore_ws {
        line.chars().filter(|c| !c.is_whitespace()).collect()
    } else if let Some(stripped) = line.strip_suffix("\r\n") {
        format!("{stripped}\n")
    } else {
        line.to_string()
    }
}

/// Group edit runs into hunks and attach context.
fn assemble_hunks(
    ops: &[DiffOp],
    old_lines: &[&str],
    new_lines: &[&str],
    options: &DiffOptions,
) -> Vec<Hunk> {
    let context = options.context_lines() as usize;
    let merge_gap = 2 * context + options.interhunk_lines() as usize;

    let Some(last_change) = ops.iter().rposition(|op| op.tag() != DiffTag::Equal) else {
        return Vec::new();
    };

    // Each group is an inclusive range of op indices whose first and last
    // ops are edits; equal runs short enough to merge sit in the middle.
    let mut groups: Vec<(usize, usize)> = Vec::new();
    let mut open: Option<(usize, usize)> = None;
    for (idx, op) in ops.iter().enumerate() {
        if op.tag() == DiffTag::Equal {
            if let Some((start, end)) = open {
                if idx >= last_change || op.old_range().len() > merge_gap {
                    groups.push((start, end));
                    open = None;
                }
            }
        } else {
            open = Some(match open {
                Some((start, _)) => (start, idx),
                None => (idx, idx),
            });
        }
    }
    if let Some(group) = open {
        groups.push(group);
    }

    groups
        .into_iter()
        .map(|(start, end)| build_hunk(ops, start, end, old_lines, new_lines, context))
        .collect()
}

fn build_hunk(
    ops: &[DiffOp],
    start: usize,
    end: usize,
    old_lines: &[&str],
    new_lines: &[&str],
    context: usize,
) -> Hunk {
    let first_old = ops[start].old_range().start;
    let first_new = ops[start].new_range().start;

    // Groups begin and end at edit ops, so any neighbor op is an equal run.
    let lead = match start.checked_sub(1) {
        Some(prev) => context.min(ops[prev].old_range().len()),
        None => 0,
    };
    let trail = match ops.get(end + 1) {
        Some(next) => context.min(next.old_range().len()),
        None => 0,
    };

    let mut lines = Vec::new();
    let mut old_count = 0;
    let mut new_count = 0;

    for idx in first_new - lead..first_new {
        lines.push(DiffLine::Context(new_lines[idx].to_string()));
        old_count += 1;
        new_count += 1;
    }

    for op in &ops[start..=end] {
        match op.tag() {
            DiffTag::Equal => {
                for idx in op.new_range() {
                    lines.push(DiffLine::Context(new_lines[idx].to_string()));
                    old_count += 1;
                    new_count += 1;
                }
            }
            DiffTag::Delete => {
                for idx in op.old_range() {
                    lines.push(DiffLine::Deleted(old_lines[idx].to_string()));
                    old_count += 1;
                }
            }
            DiffTag::Insert => {
                for idx in op.new_range() {
                    lines.push(DiffLine::Added(new_lines[idx].to_string()));
                    new_count += 1;
                }
            }
            DiffTag::Replace => {
                for idx in op.old_range() {
                    lines.push(DiffLine::Deleted(old_lines[idx].to_string()));
                    old_count += 1;
                }
                for idx in op.new_range() {
                    lines.push(DiffLine::Added(new_lines[idx].to_string()));
                    new_count += 1;
                }
            }
        }
    }

    let trail_start = ops
        .get(end + 1)
        .map(|op| op.new_range().start)
        .unwrap_or(new_lines.len());
    for idx in trail_start..trail_start + trail {
        lines.push(DiffLine::Context(new_lines[idx].to_string()));
        old_count += 1;
        new_count += 1;
    }

    let hunk_old_start = first_old - lead;
    let hunk_new_start = first_new - lead;
    Hunk {
        old_start: if old_count > 0 { hunk_old_start + 1 } else { hunk_old_start },
        old_lines: old_count,
        new_start: if new_count > 0 { hunk_new_start + 1 } else { hunk_new_start },
        new_lines: new_count,
        lines,
    }
}
