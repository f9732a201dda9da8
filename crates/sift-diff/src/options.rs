//! Comparison options.
//!
//! A [`DiffOptions`] value is immutable once constructed and shared by
//! reference across one comparison call. There is no hidden process-wide
//! mutable default; callers that want the defaults use
//! [`DiffOptions::default()`].

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// Upper bound for context/interhunk line settings. Requests beyond this are
/// rejected at construction.
pub const MAX_LINE_SETTING: u32 = 65_535;

/// How blob content is classified before line diffing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryDetection {
    /// Heuristic classification: NUL byte or over-long line in the leading
    /// window, or content that is not valid UTF-8.
    #[default]
    Auto,
    /// Always diff as text, bypassing detection.
    ForceText,
    /// Always classify as binary; no hunks are produced.
    ForceBinary,
}

/// Configuration controlling comparison sensitivity.
///
/// Line-count settings are validated by the setters, so a constructed value
/// is always valid when it reaches the algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOptions {
    context_lines: u32,
    interhunk_lines: u32,
    ignore_whitespace: bool,
    binary_detection: BinaryDetection,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            context_lines: 3,
            interhunk_lines: 2,
            ignore_whitespace: false,
            binary_detection: BinaryDetection::Auto,
        }
    }
}

impl DiffOptions {
    /// Create options with the defaults (3 context lines, 2 interhunk
    /// lines, whitespace significant, automatic binary detection).
    pub fn new() -> Self {
        Self::default()
    }

    /// Unchanged lines shown before and after each hunk.
    pub fn with_context_lines(mut self, n: u32) -> DiffResult<Self> {
        if n > MAX_LINE_SETTING {
            return Err(DiffError::InvalidOptions(format!(
                "context_lines {n} exceeds maximum {MAX_LINE_SETTING}"
            )));
        }
        self.context_lines = n;
        Ok(self)
    }

    /// Maximum gap of unchanged lines between two edit runs before they are
    /// merged into a single hunk. Controls hunk granularity, not edit-script
    /// correctness.
    pub fn with_interhunk_lines(mut self, n: u32) -> DiffResult<Self> {
        if n > MAX_LINE_SETTING {
            return Err(DiffError::InvalidOptions(format!(
                "interhunk_lines {n} exceeds maximum {MAX_LINE_SETTING}"
            )));
        }
        self.interhunk_lines = n;
        Ok(self)
    }

    /// Treat lines differing only in whitespace as equal.
    pub fn with_ignore_whitespace(mut self, ignore: bool) -> Self {
        self.ignore_whitespace = ignore;
        self
    }

    /// Override or keep automatic binary classification.
    pub fn with_binary_detection(mut self, detection: BinaryDetection) -> Self {
        self.binary_detection = detection;
        self
    }

    /// Unchanged lines included before/after each hunk.
    pub fn context_lines(&self) -> u32 {
        self.context_lines
    }

    /// Maximum unchanged-line gap merged into one hunk.
    pub fn interhunk_lines(&self) -> u32 {
        self.interhunk_lines
    }

    /// Whether whitespace-only differences are ignored.
    pub fn ignore_whitespace(&self) -> bool {
        self.ignore_whitespace
    }

    /// The binary classification mode.
    pub fn binary_detection(&self) -> BinaryDetection {
        self.binary_detection
    }
}
