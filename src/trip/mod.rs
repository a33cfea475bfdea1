use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod summary;
pub use summary::*;

use crate::shared::{
    geo::{Coordinate, Distance},
    time::{Duration, Timestamp},
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Trip of vehicle {vehicle} on {route} has {pings} pings, at least 2 are needed")]
    Malformed {
        route: Arc<str>,
        vehicle: Arc<str>,
        pings: usize,
    },
}

/// A ping kept inside a trip, with the speed measured on arrival.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripPing {
    pub timestamp: Timestamp,
    pub coordinate: Coordinate,
    /// Speed from the previous ping in km/h, `0.0` when stationary or noisy.
    pub velocity_kmh: f64,
}

/// A contiguous run of pings judged to be one traversal of a route.
/// Built by the segmenter and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTrip {
    /// Canonical route name the trip is reported under.
    pub route_name: Arc<str>,
    pub vehicle_id: Arc<str>,
    pub pings: Box<[TripPing]>,
}

impl RawTrip {
    pub fn new(route_name: Arc<str>, vehicle_id: Arc<str>, pings: Vec<TripPing>) -> Self {
        Self {
            route_name,
            vehicle_id,
            pings: pings.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.pings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pings.is_empty()
    }

    pub fn first(&self) -> Option<&TripPing> {
        self.pings.first()
    }

    pub fn last(&self) -> Option<&TripPing> {
        self.pings.last()
    }

    /// Last minus first timestamp, `None` for an empty trip.
    pub fn duration(&self) -> Option<Duration> {
        Some(self.last()?.timestamp - self.first()?.timestamp)
    }

    /// Straight-line distance between the first and last ping.
    pub fn displacement(&self) -> Option<Distance> {
        Some(self.first()?.coordinate.distance(&self.last()?.coordinate))
    }

    pub fn summarize(&self) -> Result<TripSummary, self::Error> {
        TripSummary::try_from(self)
    }
}

/// Plain tuple form handed to export collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPingRecord {
    pub timestamp: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub velocity_kmh: f64,
}

impl From<&TripPing> for TripPingRecord {
    fn from(value: &TripPing) -> Self {
        Self {
            timestamp: value.timestamp.as_millis(),
            latitude: value.coordinate.latitude,
            longitude: value.coordinate.longitude,
            velocity_kmh: value.velocity_kmh,
        }
    }
}

impl RawTrip {
    pub fn to_records(&self) -> Vec<TripPingRecord> {
        self.pings.iter().map(TripPingRecord::from).collect()
    }
}
