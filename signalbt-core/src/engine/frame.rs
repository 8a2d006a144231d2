//! Indicator frame — bars plus their aligned indicator series.
//!
//! The frame is the engine's read-only input. Indicator values may be NaN
//! for a warm-up prefix; the close price must be tradable on every bar.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::indicator::{first_valid_index, Indicator};
use crate::components::signal::SignalInputs;
use crate::domain::Bar;
use crate::indicators::{Dmi, DmiComponent, IndicatorParams, Macd, MacdLine};

/// Indicator columns carried by a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Adx,
    PlusDi,
    MinusDi,
    Macd,
    MacdSignal,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Adx,
        Field::PlusDi,
        Field::MinusDi,
        Field::Macd,
        Field::MacdSignal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Adx => "ADX",
            Field::PlusDi => "PLUS_DI",
            Field::MinusDi => "MINUS_DI",
            Field::Macd => "MACD",
            Field::MacdSignal => "MACDSignal",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while assembling a frame.
#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("indicator {field} has {actual} values for {expected} bars")]
    LengthMismatch {
        field: Field,
        expected: usize,
        actual: usize,
    },
    #[error("bar {index} ({date}) has non-tradable close {close}")]
    InvalidClose {
        index: usize,
        date: chrono::NaiveDate,
        close: f64,
    },
    #[error("bar {index} ({date}) is not strictly after the previous bar")]
    OutOfOrder {
        index: usize,
        date: chrono::NaiveDate,
    },
}

/// Precomputed indicator columns, one value per bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSeries {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
}

impl IndicatorSeries {
    pub fn get(&self, field: Field) -> &[f64] {
        match field {
            Field::Adx => &self.adx,
            Field::PlusDi => &self.plus_di,
            Field::MinusDi => &self.minus_di,
            Field::Macd => &self.macd,
            Field::MacdSignal => &self.macd_signal,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut Vec<f64> {
        match field {
            Field::Adx => &mut self.adx,
            Field::PlusDi => &mut self.plus_di,
            Field::MinusDi => &mut self.minus_di,
            Field::Macd => &mut self.macd,
            Field::MacdSignal => &mut self.macd_signal,
        }
    }
}

/// The standard indicator set, one instance per frame column.
pub fn standard_indicators(params: &IndicatorParams) -> Vec<(Field, Box<dyn Indicator>)> {
    let p = params;
    vec![
        (Field::Adx, Box::new(Dmi::new(p.dmi_period, DmiComponent::Adx)) as Box<dyn Indicator>),
        (Field::PlusDi, Box::new(Dmi::new(p.dmi_period, DmiComponent::PlusDi))),
        (Field::MinusDi, Box::new(Dmi::new(p.dmi_period, DmiComponent::MinusDi))),
        (
            Field::Macd,
            Box::new(Macd::new(p.macd_fast, p.macd_slow, p.macd_signal, MacdLine::Macd)),
        ),
        (
            Field::MacdSignal,
            Box::new(Macd::new(p.macd_fast, p.macd_slow, p.macd_signal, MacdLine::Signal)),
        ),
    ]
}

/// Bars plus aligned indicator columns for one symbol.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    bars: Vec<Bar>,
    series: IndicatorSeries,
}

impl IndicatorFrame {
    /// Assemble a frame from bars and externally computed indicator series.
    pub fn new(bars: Vec<Bar>, series: IndicatorSeries) -> Result<Self, FrameError> {
        let expected = bars.len();
        for field in Field::ALL {
            let actual = series.get(field).len();
            if actual != expected {
                return Err(FrameError::LengthMismatch {
                    field,
                    expected,
                    actual,
                });
            }
        }

        for (index, bar) in bars.iter().enumerate() {
            if !bar.has_tradable_close() {
                return Err(FrameError::InvalidClose {
                    index,
                    date: bar.date,
                    close: bar.close,
                });
            }
            if index > 0 && bar.date <= bars[index - 1].date {
                return Err(FrameError::OutOfOrder {
                    index,
                    date: bar.date,
                });
            }
        }

        Ok(Self { bars, series })
    }

    /// Compute the standard indicator set from the bars, then assemble the frame.
    pub fn compute(bars: Vec<Bar>, params: &IndicatorParams) -> Result<Self, FrameError> {
        let mut series = IndicatorSeries::default();
        for (field, indicator) in standard_indicators(params) {
            *series.get_mut(field) = indicator.compute(&bars);
        }
        Self::new(bars, series)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn bar(&self, index: usize) -> &Bar {
        &self.bars[index]
    }

    /// Symbol of the first bar, or an empty string for an empty frame.
    pub fn symbol(&self) -> &str {
        self.bars.first().map(|b| b.symbol.as_str()).unwrap_or("")
    }

    pub fn series(&self, field: Field) -> &[f64] {
        self.series.get(field)
    }

    /// First bar index at which `field` is defined.
    pub fn first_valid_index(&self, field: Field) -> Option<usize> {
        first_valid_index(self.series.get(field))
    }

    /// Signal-rule inputs for bar `index`.
    pub fn inputs(&self, index: usize) -> SignalInputs {
        SignalInputs {
            plus_di: self.series.plus_di[index],
            minus_di: self.series.minus_di[index],
            macd: self.series.macd[index],
            macd_signal: self.series.macd_signal[index],
        }
    }
}
