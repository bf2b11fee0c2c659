use crate::error::DiagnosticKind;

use std::time::Duration;

/// Time multiplier selected by `--ntsc`.
pub const NTSC_RATE: f64 = 1.040959040959041;
/// Time multiplier selected by `--pal`.
pub const PAL_RATE: f64 = 0.959040959040959;

const MICROS_PER_SEC: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRate {
    Ntsc,
    Pal,
}

impl FrameRate {
    pub fn multiplier(self) -> f64 {
        match self {
            FrameRate::Ntsc => NTSC_RATE,
            FrameRate::Pal => PAL_RATE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetimeOpts {
    pub rate: f64,
    pub offset_secs: f64,
}

impl Default for RetimeOpts {
    fn default() -> Self {
        Self {
            rate: 1.0,
            offset_secs: 0.0,
        }
    }
}

impl RetimeOpts {
    pub fn new(frame_rate: Option<FrameRate>, offset_secs: f64) -> Self {
        Self {
            rate: frame_rate.map_or(1.0, FrameRate::multiplier),
            offset_secs,
        }
    }

    /// Computes `time * rate + offset` in whole microseconds.
    ///
    /// The scaled value is rounded to the nearest microsecond before the
    /// offset is added. Millisecond truncation is left to the serialiser.
    /// Results below zero are `NegativeTime`; results that do not fit a
    /// `Duration` of whole microseconds are `TimeOutOfRange`.
    pub fn apply(&self, time: Duration) -> Result<Duration, DiagnosticKind> {
        let scaled = time.as_micros() as f64 * self.rate;
        let offset = self.offset_secs * MICROS_PER_SEC;
        if !scaled.is_finite() || !offset.is_finite() {
            return Err(DiagnosticKind::TimeOutOfRange);
        }
        let micros = (scaled.round() as i128)
            .checked_add(offset.round() as i128)
            .ok_or(DiagnosticKind::TimeOutOfRange)?;
        if micros < 0 {
            return Err(DiagnosticKind::NegativeTime);
        }
        let micros = u64::try_from(micros).map_err(|_| DiagnosticKind::TimeOutOfRange)?;
        Ok(Duration::from_micros(micros))
    }
}
