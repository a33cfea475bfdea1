use crate::{shared::Quartiles, trip::TripSummary};

/// Open interval `(low, high)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

impl From<(f64, f64)> for Range {
    fn from((low, high): (f64, f64)) -> Self {
        Self { low, high }
    }
}

impl Range {
    /// Both bounds are exclusive.
    pub fn contains(&self, value: f64) -> bool {
        self.low < value && value < self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

/// Trip durations and displacements considered normal for one route.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptanceWindow {
    /// In milliseconds.
    pub duration_range: Range,
    /// In kilometers.
    pub displacement_range: Range,
    pub duration: Quartiles,
    pub displacement: Quartiles,
    /// Number of trips the window was built from.
    pub population: usize,
}

impl AcceptanceWindow {
    pub fn accepts(&self, summary: &TripSummary) -> bool {
        self.duration_range.contains(summary.duration_ms() as f64)
            && self.displacement_range.contains(summary.displacement_km())
    }
}
