use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::Config,
    shared::{Distance, Duration},
    trip::{RawTrip, TripPing},
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Trip has {pings} pings, at least {required} are needed")]
    TooShort { pings: usize, required: usize },
    #[error("Trip of vehicle {vehicle} on {route} spans no time")]
    ZeroDuration { route: Arc<str>, vehicle: Arc<str> },
}

/// Path length from every `stride`-th fix, pairing ping `i` with `i + stride`.
///
/// Skipping the fixes in between smooths GPS jitter at the cost of cutting
/// corners. Pings after the last full stride are ignored.
pub fn sampled_path_length(pings: &[TripPing], stride: usize) -> Distance {
    let stride = stride.max(1);
    (0..pings.len().saturating_sub(stride))
        .step_by(stride)
        .map(|i| pings[i + stride].coordinate.distance(&pings[i].coordinate))
        .sum()
}

/// Length, duration and speed of an accepted trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripMetrics {
    pub route_name: Arc<str>,
    pub vehicle_id: Arc<str>,
    pub total_distance: Distance,
    /// First to last ping, not just the sampled part.
    pub duration: Duration,
    pub average_speed_kmh: f64,
}

impl TripMetrics {
    pub fn measure(trip: &RawTrip, config: &Config) -> Result<Self, self::Error> {
        let required = config.min_trip_pings.max(2);
        if trip.len() < required {
            return Err(self::Error::TooShort {
                pings: trip.len(),
                required,
            });
        }
        let zero_duration = || self::Error::ZeroDuration {
            route: trip.route_name.clone(),
            vehicle: trip.vehicle_id.clone(),
        };
        let total_distance = sampled_path_length(&trip.pings, config.sample_stride);
        let duration = trip.duration().ok_or_else(zero_duration)?;
        let average_speed_kmh = total_distance
            .speed_over(duration)
            .ok_or_else(zero_duration)?;
        Ok(Self {
            route_name: trip.route_name.clone(),
            vehicle_id: trip.vehicle_id.clone(),
            total_distance,
            duration,
            average_speed_kmh,
        })
    }

    pub fn to_record(&self) -> ExportRecord {
        self.into()
    }
}

/// Export row, rounded half-to-even to whole kilometers, seconds and km/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub route_name: String,
    pub vehicle_id: String,
    pub total_distance_km: f64,
    pub duration_s: i64,
    pub avg_speed_kmh: f64,
}

impl From<&TripMetrics> for ExportRecord {
    fn from(value: &TripMetrics) -> Self {
        Self {
            route_name: value.route_name.to_string(),
            vehicle_id: value.vehicle_id.to_string(),
            total_distance_km: value.total_distance.as_kilometers().round_ties_even(),
            duration_s: value.duration.as_seconds_f64().round_ties_even() as i64,
            avg_speed_kmh: value.average_speed_kmh.round_ties_even(),
        }
    }
}

#[test]
fn sampled_path_length_short_test() {
    let ping = TripPing {
        timestamp: 0.into(),
        coordinate: Default::default(),
        velocity_kmh: 0.0,
    };
    assert_eq!(
        sampled_path_length(&[ping; 5], 5),
        Distance::from_meters(0.0)
    );
}

#[test]
fn export_rounding_test() {
    let metrics = TripMetrics {
        route_name: "100".into(),
        vehicle_id: "A1".into(),
        total_distance: Distance::from_kilometers(12.5),
        duration: Duration::from_millis(1_499),
        average_speed_kmh: 30.6,
    };
    let record = metrics.to_record();
    assert_eq!(record.total_distance_km, 12.0);
    assert_eq!(record.duration_s, 1);
    assert_eq!(record.avg_speed_kmh, 31.0);
}
