use std::io::Read;

use serde::Deserialize;

use crate::shared::Distance;

/// Tunables of the segmentation and validation pipeline.
///
/// Every field has a default, so a JSON document only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// A stationary vehicle closer than this to a terminal ends its trip, and
    /// a moving vehicle farther than this may start one.
    pub terminal_radius_km: f64,
    /// Speeds below this are treated as stationary.
    pub min_speed_kmh: f64,
    /// Speeds above this are treated as sensor noise.
    pub max_speed_kmh: f64,
    /// IQR multiplier of the duration acceptance window.
    pub duration_fence: f64,
    /// IQR multiplier of the displacement acceptance window.
    pub displacement_fence: f64,
    /// Routes with fewer candidate trips get no acceptance window.
    pub min_route_population: usize,
    /// Accepted trips shorter than this are not exported.
    pub min_trip_pings: usize,
    /// Ping stride used when measuring path length.
    pub sample_stride: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            terminal_radius_km: 0.5,
            min_speed_kmh: 2.0,
            max_speed_kmh: 200.0,
            duration_fence: 0.5,
            displacement_fence: 0.3,
            min_route_population: 4,
            min_trip_pings: 20,
            sample_stride: 5,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn terminal_radius(&self) -> Distance {
        Distance::from_kilometers(self.terminal_radius_km)
    }

    pub fn with_terminal_radius(mut self, radius: Distance) -> Self {
        self.terminal_radius_km = radius.as_kilometers();
        self
    }

    pub fn with_min_route_population(mut self, population: usize) -> Self {
        self.min_route_population = population;
        self
    }

    pub fn with_min_trip_pings(mut self, pings: usize) -> Self {
        self.min_trip_pings = pings;
        self
    }
}

#[test]
fn partial_json_test() {
    let config = Config::from_json_reader(r#"{ "min_trip_pings": 10 }"#.as_bytes()).unwrap();
    assert_eq!(config.min_trip_pings, 10);
    assert_eq!(config.sample_stride, 5);
    assert_eq!(config.terminal_radius(), Distance::from_meters(500.0));
}
