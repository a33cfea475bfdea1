#![allow(dead_code)]

use tripwise::{
    prelude::*,
    shared::EARTH_RADIUS,
    source::{Field, PingRecord},
};

/// A point on the equator `km` kilometers east of the origin.
pub fn east(km: f64) -> Coordinate {
    let degrees = (km / EARTH_RADIUS.as_kilometers()).to_degrees();
    Coordinate::new(0.0, degrees)
}

/// Scripts the pings of one vehicle moving along the equator.
pub struct Driver {
    vehicle: String,
    route: String,
    pub time: i64,
    pub position: f64,
    pings: Vec<Ping>,
}

impl Driver {
    /// Starts with a first ping at `start_km`.
    pub fn new(vehicle: &str, route: &str, start_km: f64) -> Self {
        let mut driver = Self {
            vehicle: vehicle.into(),
            route: route.into(),
            time: 1_700_000_000_000,
            position: start_km,
            pings: Vec::new(),
        };
        driver.ping_at(start_km, 0);
        driver
    }

    pub fn route(&mut self, route: &str) -> &mut Self {
        self.route = route.into();
        self
    }

    pub fn ping_at(&mut self, km: f64, dt_ms: i64) -> &mut Self {
        self.time += dt_ms;
        self.position = km;
        self.pings.push(Ping::new(
            &self.vehicle,
            &self.route,
            Timestamp::from_millis(self.time),
            east(km),
        ));
        self
    }

    pub fn dwell(&mut self, dt_ms: i64) -> &mut Self {
        self.ping_at(self.position, dt_ms)
    }

    /// Moves to `to_km` in steps of `step_km`; the last step is between half
    /// and one and a half steps long so it never crawls.
    pub fn drive(&mut self, to_km: f64, step_km: f64, dt_ms: i64) -> &mut Self {
        let dir = if to_km >= self.position { 1.0 } else { -1.0 };
        loop {
            let next = self.position + dir * step_km;
            if (to_km - next) * dir < step_km * 0.5 {
                break;
            }
            self.ping_at(next, dt_ms);
        }
        self.ping_at(to_km, dt_ms)
    }

    pub fn pings(&self) -> &[Ping] {
        &self.pings
    }

    pub fn len(&self) -> usize {
        self.pings.len()
    }

    pub fn finish(self) -> Vec<Ping> {
        self.pings
    }
}

/// Feed records for `pings`, written with a decimal comma like the fleet
/// dumps.
pub fn to_records(pings: &[Ping]) -> Vec<PingRecord> {
    pings
        .iter()
        .map(|ping| PingRecord {
            vehicle_id: Some(ping.vehicle_id.to_string()),
            route_id: ping.route_id.to_string(),
            timestamp: Field::Text(ping.timestamp.as_millis().to_string()),
            latitude: Field::Text(ping.coordinate.latitude.to_string().replace('.', ",")),
            longitude: Field::Text(ping.coordinate.longitude.to_string().replace('.', ",")),
        })
        .collect()
}

pub fn summary(route: &str, duration_ms: i64, displacement_km: f64) -> TripSummary {
    TripSummary {
        route_name: route.into(),
        vehicle_id: "A1".into(),
        duration: Duration::from_millis(duration_ms),
        displacement: Distance::from_kilometers(displacement_km),
    }
}

/// A trip of `n` pings `spacing_km` apart, `dt_ms` apart in time.
pub fn straight_trip(route: &str, n: usize, spacing_km: f64, dt_ms: i64) -> RawTrip {
    let pings = (0..n)
        .map(|i| TripPing {
            timestamp: Timestamp::from_millis(1_700_000_000_000 + dt_ms * i as i64),
            coordinate: east(spacing_km * i as f64),
            velocity_kmh: 0.0,
        })
        .collect();
    RawTrip::new(route.into(), "A1".into(), pings)
}
