mod state;
pub use state::*;

use crate::{
    config::Config,
    repository::Repository,
    shared::{Distance, Duration},
    source::Ping,
    trip::RawTrip,
};

/// Speed between two fixes in km/h.
///
/// A zero time gap gives `0.0`, and so does any speed outside
/// `[min_speed_kmh, max_speed_kmh]`: crawling is treated as standing still
/// and implausible jumps as GPS noise.
pub fn instantaneous_speed(distance: Distance, elapsed: Duration, config: &Config) -> f64 {
    let velocity = distance.speed_over(elapsed).unwrap_or(0.0);
    if velocity < config.min_speed_kmh || velocity > config.max_speed_kmh {
        0.0
    } else {
        velocity
    }
}

/// Drops the first and the last trip of a vehicle.
///
/// The state machine starts without context and is never force-closed, so
/// the outermost trips of a stream are treated as partial.
pub fn discard_boundary_trips<T>(trips: Vec<T>) -> Vec<T> {
    let n = trips.len();
    trips.into_iter().skip(1).take(n.saturating_sub(2)).collect()
}

/// Slices vehicle ping streams into trips.
#[derive(Debug, Clone, Copy)]
pub struct Segmenter<'a> {
    repository: &'a Repository,
    config: &'a Config,
}

impl<'a> Segmenter<'a> {
    pub fn new(repository: &'a Repository, config: &'a Config) -> Self {
        Self { repository, config }
    }

    pub fn segmentation(&self, vehicle_id: &str) -> Segmentation<'a> {
        Segmentation::new(self.repository, self.config, vehicle_id)
    }

    /// Every trip the state machine closes, boundary trips included.
    pub fn closed_trips(&self, vehicle_id: &str, pings: &[Ping]) -> Vec<RawTrip> {
        let mut segmentation = self.segmentation(vehicle_id);
        let trips = pings
            .iter()
            .filter_map(|ping| segmentation.push(ping))
            .collect();
        segmentation.finish();
        trips
    }

    /// The trips of a vehicle that are surfaced to the rest of the pipeline.
    pub fn segment(&self, vehicle_id: &str, pings: &[Ping]) -> Vec<RawTrip> {
        discard_boundary_trips(self.closed_trips(vehicle_id, pings))
    }
}
