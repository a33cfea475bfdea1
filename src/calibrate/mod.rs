use std::{collections::HashMap, sync::Arc, time::Instant};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

mod window;
pub use window::*;

use crate::{config::Config, shared::Quartiles, trip::TripSummary};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Route {route} has {population} trips, at least {required} are needed to calibrate it")]
    DegenerateRoutePopulation {
        route: Arc<str>,
        population: usize,
        required: usize,
    },
}

/// Acceptance windows of every route seen in one batch.
///
/// This is a snapshot of the summaries it was built from; adding trips means
/// calibrating the whole batch again.
#[derive(Debug, Clone, Default)]
pub struct Calibration {
    windows: HashMap<Arc<str>, AcceptanceWindow>,
    /// Routes with too few trips, and how many they had.
    degenerate: HashMap<Arc<str>, usize>,
}

impl Calibration {
    pub fn from_summaries(summaries: &[TripSummary], config: &Config) -> Self {
        debug!("Calibrating routes...");
        let now = Instant::now();

        let mut samples: HashMap<Arc<str>, (Vec<f64>, Vec<f64>)> = HashMap::new();
        summaries.iter().for_each(|summary| {
            let (durations, displacements) =
                samples.entry(summary.route_name.clone()).or_default();
            durations.push(summary.duration_ms() as f64);
            displacements.push(summary.displacement_km());
        });

        let results: Vec<_> = samples
            .into_par_iter()
            .map(|(route, (durations, displacements))| {
                let result = calibrate_route(&route, &durations, &displacements, config);
                (route, result)
            })
            .collect();

        let mut calibration = Self::default();
        results.into_iter().for_each(|(route, result)| match result {
            Ok(window) => {
                calibration.windows.insert(route, window);
            }
            Err(err) => {
                warn!("{err}");
                let Error::DegenerateRoutePopulation { population, .. } = err;
                calibration.degenerate.insert(route, population);
            }
        });

        debug!(
            "Calibrating {} routes took {:?}",
            calibration.windows.len(),
            now.elapsed()
        );
        calibration
    }

    pub fn window(&self, route: &str) -> Option<&AcceptanceWindow> {
        self.windows.get(route)
    }

    /// True when the route was seen but had too few trips to calibrate.
    pub fn is_degenerate(&self, route: &str) -> bool {
        self.degenerate.contains_key(route)
    }

    pub fn windows(&self) -> impl Iterator<Item = (&str, &AcceptanceWindow)> {
        self.windows
            .iter()
            .map(|(route, window)| (route.as_ref(), window))
    }

    pub fn degenerate_routes(&self) -> impl Iterator<Item = (&str, usize)> {
        self.degenerate
            .iter()
            .map(|(route, population)| (route.as_ref(), *population))
    }

    pub fn route_count(&self) -> usize {
        self.windows.len()
    }
}

/// Builds the acceptance window of a single route from its trip durations
/// (ms) and displacements (km).
pub fn calibrate_route(
    route: &Arc<str>,
    durations: &[f64],
    displacements: &[f64],
    config: &Config,
) -> Result<AcceptanceWindow, Error> {
    let required = config.min_route_population.max(2);
    let population = durations.len().min(displacements.len());
    let degenerate = || Error::DegenerateRoutePopulation {
        route: route.clone(),
        population,
        required,
    };
    if population < required {
        return Err(degenerate());
    }
    let duration = Quartiles::exclusive(durations).ok_or_else(degenerate)?;
    let displacement = Quartiles::exclusive(displacements).ok_or_else(degenerate)?;
    Ok(AcceptanceWindow {
        duration_range: duration.fence(config.duration_fence).into(),
        displacement_range: displacement.fence(config.displacement_fence).into(),
        duration,
        displacement,
        population,
    })
}
