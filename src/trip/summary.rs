use std::sync::Arc;

use crate::{
    shared::{Distance, Duration},
    trip::{self, RawTrip},
};

/// What the calibrator needs to know about a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSummary {
    pub route_name: Arc<str>,
    pub vehicle_id: Arc<str>,
    pub duration: Duration,
    pub displacement: Distance,
}

impl TripSummary {
    pub fn duration_ms(&self) -> i64 {
        self.duration.as_millis()
    }

    pub fn displacement_km(&self) -> f64 {
        self.displacement.as_kilometers()
    }
}

impl TryFrom<&RawTrip> for TripSummary {
    type Error = trip::Error;

    fn try_from(trip: &RawTrip) -> Result<Self, Self::Error> {
        let malformed = || trip::Error::Malformed {
            route: trip.route_name.clone(),
            vehicle: trip.vehicle_id.clone(),
            pings: trip.len(),
        };
        if trip.len() < 2 {
            return Err(malformed());
        }
        Ok(Self {
            route_name: trip.route_name.clone(),
            vehicle_id: trip.vehicle_id.clone(),
            duration: trip.duration().ok_or_else(malformed)?,
            displacement: trip.displacement().ok_or_else(malformed)?,
        })
    }
}
