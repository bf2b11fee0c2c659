use crate::error::{Diagnostic, DiagnosticKind};
use crate::retime::RetimeOpts;
use crate::srt::{Document, Subtitle};
use crate::timing::{self, TimeSpan, ARROW};

use std::iter;
use std::sync::OnceLock;
use std::time::Duration;

use log::debug;
use nom::bytes::complete::tag;
use nom::combinator::opt;
use nom::error::VerboseError;
use nom::IResult;
use regex::Regex;

/// Where the segmenter is within the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Space,
    Preamble,
    Timing,
    Body,
}

/// Classifies `line` given the stage of the previous line.
/// Rules are checked in order; the first match wins.
pub fn next_stage(stage: Stage, line: &str) -> Stage {
    if line.is_empty() {
        Stage::Space
    } else if stage == Stage::Space {
        Stage::Preamble
    } else if matches!(stage, Stage::Preamble | Stage::Timing) && line.contains(ARROW) {
        Stage::Timing
    } else if stage == Stage::Timing {
        Stage::Body
    } else {
        stage
    }
}

#[derive(Debug, Default)]
struct CueBuilder {
    preamble: Vec<String>,
    span: Option<TimeSpan>,
    text: Vec<String>,
}

impl CueBuilder {
    fn preamble_line(mut self, line: &str) -> Self {
        self.preamble.push(line.to_string());
        self
    }

    fn span(mut self, span: Option<TimeSpan>) -> Self {
        self.span = span;
        self
    }

    fn text_line(mut self, line: &str) -> Self {
        self.text.push(line.to_string());
        self
    }

    fn build(self) -> Result<Subtitle, DiagnosticKind> {
        match self.span {
            Some((show_at, hide_at)) if !self.text.is_empty() => Ok(Subtitle {
                preamble: self.preamble,
                show_at,
                hide_at,
                text: self.text,
            }),
            span => Err(DiagnosticKind::IncompleteBlock {
                missing_time: span.is_none(),
                missing_body: self.text.is_empty(),
            }),
        }
    }
}

/// Output of a parse run. Blocks that could not be completed are absent from
/// `subs` and explained in `diagnostics`.
#[derive(Debug, Default)]
pub struct Parsed {
    pub subs: Document,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Parser {
    opts: RetimeOpts,
}

impl Parser {
    pub fn new(opts: RetimeOpts) -> Self {
        Self { opts }
    }

    /// Splits `input` into cues, retiming each one on the way. Never fails:
    /// malformed blocks are dropped and reported.
    pub fn parse(&self, input: &str) -> Parsed {
        let mut parsed = Parsed::default();
        let mut stage = Stage::Space;
        let mut cue = CueBuilder::default();

        for (index, line) in lines(input).chain(iter::once("")).enumerate() {
            let line_no = index + 1;
            let prev = stage;
            stage = next_stage(prev, line);

            cue = match stage {
                Stage::Space => {
                    if prev != Stage::Space {
                        match cue.build() {
                            Ok(sub) => parsed.subs.push(sub),
                            Err(kind) => parsed.diagnostics.push(Diagnostic {
                                line: line_no,
                                kind,
                            }),
                        }
                    }
                    CueBuilder::default()
                }
                Stage::Preamble => cue.preamble_line(line),
                Stage::Timing => {
                    let span = match timing::parse_timing_line(line) {
                        Ok(span) => self.retime(span, line_no, &mut parsed.diagnostics),
                        Err(err) => {
                            parsed.diagnostics.push(Diagnostic {
                                line: line_no,
                                kind: err.into(),
                            });
                            None
                        }
                    };
                    cue.span(span)
                }
                Stage::Body => cue.text_line(line),
            };
        }

        parsed
    }

    fn retime(
        &self,
        (start, end): TimeSpan,
        line: usize,
        diags: &mut Vec<Diagnostic>,
    ) -> Option<TimeSpan> {
        let mut shift = |time| match self.opts.apply(time) {
            Ok(time) => Some(time),
            Err(DiagnosticKind::NegativeTime) => {
                diags.push(Diagnostic {
                    line,
                    kind: DiagnosticKind::NegativeTime,
                });
                Some(Duration::ZERO)
            }
            Err(kind) => {
                diags.push(Diagnostic { line, kind });
                None
            }
        };
        let span = (shift(start)?, shift(end)?);
        if span.1 < span.0 {
            debug!("Line {} - end time precedes start time", line);
        }
        Some(span)
    }
}

fn optional_bom(input: &str) -> IResult<&str, Option<&str>, VerboseError<&str>> {
    opt(tag("\u{FEFF}"))(input)
}

fn line_breaks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r\n|\r|\n").expect("static regex is valid"))
}

/// Splits on `\r\n`, `\n` or a lone `\r`.
fn lines(input: &str) -> impl Iterator<Item = &str> {
    let input = optional_bom(input).map_or(input, |(rest, _)| rest);
    line_breaks().split(input)
}
