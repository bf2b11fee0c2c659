use std::time::Duration;

/// A single cue. `preamble` holds whatever came before the timing line,
/// usually the sequence number, and is kept as opaque text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtitle {
    pub(crate) preamble: Vec<String>,
    pub(crate) show_at: Duration,
    pub(crate) hide_at: Duration,
    pub(crate) text: Vec<String>,
}

/// Cues in input order.
pub type Document = Vec<Subtitle>;
