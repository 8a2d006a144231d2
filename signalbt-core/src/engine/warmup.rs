//! Warm-up boundary: the first bar the simulation may act on.

use crate::engine::frame::{Field, IndicatorFrame};

/// Where the simulation starts and whether momentum readings are ready there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupWindow {
    /// Later of the +DI and -DI warm-up boundaries.
    pub start_index: usize,
    /// First bar where both MACD and its signal line are defined.
    pub macd_ready_index: Option<usize>,
}

impl WarmupWindow {
    /// Derive the window from a frame. `None` means the directional
    /// indicators never become defined (insufficient data).
    ///
    /// The start index only follows +DI/-DI. MACD readiness is reported,
    /// not enforced: bars before `macd_ready_index` evaluate as neutral.
    pub fn from_frame(frame: &IndicatorFrame) -> Option<Self> {
        let plus = frame.first_valid_index(Field::PlusDi)?;
        let minus = frame.first_valid_index(Field::MinusDi)?;

        let macd_ready_index = match (
            frame.first_valid_index(Field::Macd),
            frame.first_valid_index(Field::MacdSignal),
        ) {
            (Some(m), Some(s)) => Some(m.max(s)),
            _ => None,
        };

        Some(Self {
            start_index: plus.max(minus),
            macd_ready_index,
        })
    }

    /// True when MACD is still undefined at the start index.
    pub fn macd_lagging(&self) -> bool {
        self.macd_ready_index
            .map_or(true, |ready| ready > self.start_index)
    }

    /// Bars after the start index during which MACD is still undefined.
    /// `None` when MACD never becomes defined.
    pub fn macd_lag_bars(&self) -> Option<usize> {
        self.macd_ready_index
            .map(|ready| ready.saturating_sub(self.start_index))
    }
}
