use std::sync::Arc;

use thiserror::Error;

use crate::{
    calibrate::Calibration,
    trip::{RawTrip, TripSummary},
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The calibration was built from a different set of summaries.
    #[error("Route {0} has no acceptance window")]
    UnknownRouteWindow(Arc<str>),
}

/// Outcome of checking one trip against its route's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    OutOfWindow,
    /// The route had too few trips to be calibrated.
    DegenerateRoute,
}

#[derive(Debug, Clone, Copy)]
pub struct TripFilter<'a> {
    calibration: &'a Calibration,
}

impl<'a> TripFilter<'a> {
    pub fn new(calibration: &'a Calibration) -> Self {
        Self { calibration }
    }

    pub fn verdict(&self, summary: &TripSummary) -> Result<Verdict, self::Error> {
        match self.calibration.window(&summary.route_name) {
            Some(window) if window.accepts(summary) => Ok(Verdict::Accepted),
            Some(_) => Ok(Verdict::OutOfWindow),
            None if self.calibration.is_degenerate(&summary.route_name) => {
                Ok(Verdict::DegenerateRoute)
            }
            None => Err(self::Error::UnknownRouteWindow(summary.route_name.clone())),
        }
    }

    /// Keeps the trips whose summary falls inside their route's window.
    pub fn filter<I>(&self, trips: I) -> Result<Vec<RawTrip>, self::Error>
    where
        I: IntoIterator<Item = (RawTrip, TripSummary)>,
    {
        let mut accepted = Vec::new();
        for (trip, summary) in trips {
            if self.verdict(&summary)? == Verdict::Accepted {
                accepted.push(trip);
            }
        }
        Ok(accepted)
    }
}
