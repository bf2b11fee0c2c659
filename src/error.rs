use std::fmt;

use thiserror::Error;

/// Why a timing line could not be turned into a start/end pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimingError {
    #[error("malformed time string: no timestamps found")]
    NoTimestamps,
    #[error("malformed time string: only one timestamp found")]
    OneTimestamp,
    #[error("malformed time string: expected two timestamps, found {0}")]
    TooManyTimestamps(usize),
    #[error("malformed time string: invalid timestamp '{0}'")]
    MalformedTimestamp(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    #[error(transparent)]
    MalformedTiming(#[from] TimingError),
    #[error("{}", incomplete_message(.missing_time, .missing_body))]
    IncompleteBlock {
        missing_time: bool,
        missing_body: bool,
    },
    #[error("time shifted below zero, clamped to 00:00:00,000")]
    NegativeTime,
    #[error("shifted time is out of range, block dropped")]
    TimeOutOfRange,
}

fn incomplete_message(missing_time: &bool, missing_body: &bool) -> &'static str {
    match (*missing_time, *missing_body) {
        (true, true) => "no time and no body",
        (true, false) => "no time",
        _ => "no body",
    }
}

/// A non-fatal problem found while segmenting, tied to a 1-based line number.
/// The line counter starts at 1, not 0 like a raw enumeration index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Line {} - {}", self.line, self.kind)
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input file does not exist: '{0}'")]
    NotFound(String),
    #[error("Unknown source encoding: '{0}'")]
    UnknownEncoding(String),
}
