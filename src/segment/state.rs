use std::sync::Arc;

use tracing::trace;

use crate::{
    config::Config,
    repository::Repository,
    segment::instantaneous_speed,
    shared::{Coordinate, Distance, Timestamp},
    source::Ping,
    trip::{RawTrip, TripPing},
};

/// Values carried over from the previous ping.
#[derive(Debug, Clone)]
struct Carried<'a> {
    coordinate: Coordinate,
    timestamp: Timestamp,
    route_id: Arc<str>,
    terminals: &'a [Coordinate],
}

/// Segmentation state of a single vehicle.
///
/// Feed the vehicle's pings in order with [`Segmentation::push`], which
/// hands back every trip as soon as it closes, then call
/// [`Segmentation::finish`]. A trip still open at that point is dropped,
/// since nothing says where it would have ended.
#[derive(Debug)]
pub struct Segmentation<'a> {
    repository: &'a Repository,
    config: &'a Config,
    vehicle_id: Arc<str>,
    carried: Option<Carried<'a>>,
    open: Vec<TripPing>,
}

impl<'a> Segmentation<'a> {
    pub fn new(repository: &'a Repository, config: &'a Config, vehicle_id: &str) -> Self {
        Self {
            repository,
            config,
            vehicle_id: vehicle_id.into(),
            carried: None,
            open: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        !self.open.is_empty()
    }

    pub fn push(&mut self, ping: &Ping) -> Option<RawTrip> {
        let (velocity, terminals) = match &self.carried {
            // Without a previous fix the ping is compared with itself.
            None => (0.0, self.repository.terminals_for(&ping.route_id)),
            Some(prev) => {
                let distance = prev.coordinate.distance(&ping.coordinate);
                let velocity =
                    instantaneous_speed(distance, ping.timestamp - prev.timestamp, self.config);
                let terminals = if prev.route_id != ping.route_id {
                    self.repository.terminals_for(&ping.route_id)
                } else {
                    prev.terminals
                };
                (velocity, terminals)
            }
        };

        // None when the route has no known terminals
        let nearest = ping.coordinate.nearest_distance(terminals);
        let radius = self.config.terminal_radius();

        let mut closed = None;
        if self.is_open() && (nearest.is_none() || arrived(velocity, nearest, radius)) {
            closed = self.close();
        }

        if self.is_open() || departed(velocity, nearest, radius) {
            self.open.push(TripPing {
                timestamp: ping.timestamp,
                coordinate: ping.coordinate,
                velocity_kmh: velocity,
            });
        }

        self.carried = Some(Carried {
            coordinate: ping.coordinate,
            timestamp: ping.timestamp,
            route_id: ping.route_id.clone(),
            terminals,
        });
        closed
    }

    /// Ends the run, returning how many pings the unfinished trip held.
    pub fn finish(self) -> usize {
        if self.is_open() {
            trace!(
                "Vehicle {} ends with an unfinished trip of {} pings",
                self.vehicle_id,
                self.open.len()
            );
        }
        self.open.len()
    }

    fn close(&mut self) -> Option<RawTrip> {
        let prev = self.carried.as_ref()?;
        let route_name: Arc<str> = self.repository.canonicalize(&prev.route_id).into();
        let pings = std::mem::take(&mut self.open);
        let trip = RawTrip::new(route_name, self.vehicle_id.clone(), pings);
        trace!(
            "Vehicle {} closed a trip on {} with {} pings",
            trip.vehicle_id,
            trip.route_name,
            trip.len()
        );
        Some(trip)
    }
}

fn arrived(velocity: f64, nearest: Option<Distance>, radius: Distance) -> bool {
    velocity == 0.0 && nearest.is_some_and(|distance| distance < radius)
}

fn departed(velocity: f64, nearest: Option<Distance>, radius: Distance) -> bool {
    velocity > 0.0 && nearest.is_some_and(|distance| distance > radius)
}
