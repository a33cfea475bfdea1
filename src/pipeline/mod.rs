use std::{sync::Arc, time::Instant};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

mod report;
pub use report::*;

use crate::{
    calibrate::Calibration,
    config::Config,
    filter::{self, TripFilter, Verdict},
    metrics::{self, TripMetrics},
    repository::Repository,
    segment::Segmenter,
    source::{self, Ping, VehicleStream},
    trip::{RawTrip, TripSummary},
};

/// Failures that make the whole batch unusable.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Filter(#[from] filter::Error),
}

/// Everything a batch run produces.
#[derive(Debug, Default)]
pub struct BatchOutput {
    /// Trips that passed their route's window, in vehicle order.
    pub accepted: Vec<RawTrip>,
    /// Metrics of the accepted trips that were long enough to measure.
    pub records: Vec<TripMetrics>,
    pub calibration: Calibration,
    pub report: Report,
    /// Vehicles whose stream could not be parsed.
    pub stream_errors: Vec<source::Error>,
}

struct VehicleTrips {
    candidates: Vec<(RawTrip, TripSummary)>,
    malformed: usize,
}

/// Runs segmentation, calibration and filtering over a complete batch.
///
/// Calibration needs every summary of a route, so the batch is processed in
/// three phases: segment and summarize every vehicle, calibrate every route,
/// then filter and measure every trip.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    repository: &'a Repository,
    config: &'a Config,
}

impl<'a> Pipeline<'a> {
    pub fn new(repository: &'a Repository, config: &'a Config) -> Self {
        Self { repository, config }
    }

    /// Parses and processes raw vehicle streams. A stream with a malformed
    /// record is skipped and reported; the other vehicles are unaffected.
    pub fn run(&self, streams: &[VehicleStream]) -> Result<BatchOutput, self::Error> {
        debug!("Parsing {} vehicle streams...", streams.len());
        let now = Instant::now();
        let parsed: Vec<_> = streams
            .par_iter()
            .map(|stream| stream.pings().map(|pings| (stream.vehicle_id.clone(), pings)))
            .collect();

        let mut vehicles = Vec::with_capacity(parsed.len());
        let mut stream_errors = Vec::new();
        parsed.into_iter().for_each(|result| match result {
            Ok(vehicle) => vehicles.push(vehicle),
            Err(err) => {
                warn!("Skipping vehicle: {err}");
                stream_errors.push(err);
            }
        });
        debug!("Parsing vehicle streams took {:?}", now.elapsed());

        let mut output = self.run_pings(&vehicles)?;
        output.report.vehicles += stream_errors.len();
        output.report.dropped.invalid_streams = stream_errors.len();
        output.stream_errors = stream_errors;
        Ok(output)
    }

    /// Processes already parsed pings, one entry per vehicle.
    pub fn run_pings(&self, vehicles: &[(Arc<str>, Vec<Ping>)]) -> Result<BatchOutput, self::Error> {
        let mut report = Report {
            vehicles: vehicles.len(),
            ..Default::default()
        };

        let candidates = self.segment_all(vehicles, &mut report);
        let summaries: Vec<TripSummary> = candidates
            .iter()
            .map(|(_, summary)| summary.clone())
            .collect();
        let calibration = Calibration::from_summaries(&summaries, self.config);
        let accepted = self.filter_all(candidates, &calibration, &mut report)?;
        let records = self.measure_all(&accepted, &mut report);

        info!(
            "Batch of {} vehicles: {} candidate trips, {} accepted, {} measured",
            report.vehicles, report.candidate_trips, report.accepted_trips, report.records
        );
        Ok(BatchOutput {
            accepted,
            records,
            calibration,
            report,
            stream_errors: Vec::new(),
        })
    }

    fn segment_all(
        &self,
        vehicles: &[(Arc<str>, Vec<Ping>)],
        report: &mut Report,
    ) -> Vec<(RawTrip, TripSummary)> {
        debug!("Segmenting {} vehicles...", vehicles.len());
        let now = Instant::now();
        let segmenter = Segmenter::new(self.repository, self.config);
        let per_vehicle: Vec<VehicleTrips> = vehicles
            .par_iter()
            .map(|(vehicle_id, pings)| {
                let mut malformed = 0;
                let candidates = segmenter
                    .segment(vehicle_id, pings)
                    .into_iter()
                    .filter_map(|trip| match trip.summarize() {
                        Ok(summary) => Some((trip, summary)),
                        Err(err) => {
                            warn!("Dropping trip: {err}");
                            malformed += 1;
                            None
                        }
                    })
                    .collect();
                VehicleTrips {
                    candidates,
                    malformed,
                }
            })
            .collect();

        let mut candidates = Vec::new();
        per_vehicle.into_iter().for_each(|mut vehicle| {
            report.dropped.malformed += vehicle.malformed;
            candidates.append(&mut vehicle.candidates);
        });
        report.candidate_trips = candidates.len();
        debug!(
            "Segmenting into {} candidate trips took {:?}",
            candidates.len(),
            now.elapsed()
        );
        candidates
    }

    fn filter_all(
        &self,
        candidates: Vec<(RawTrip, TripSummary)>,
        calibration: &Calibration,
        report: &mut Report,
    ) -> Result<Vec<RawTrip>, self::Error> {
        debug!("Filtering {} trips...", candidates.len());
        let now = Instant::now();
        let filter = TripFilter::new(calibration);
        let verdicts: Vec<Verdict> = candidates
            .par_iter()
            .map(|(_, summary)| filter.verdict(summary))
            .collect::<Result<_, _>>()?;

        let accepted: Vec<RawTrip> = candidates
            .into_iter()
            .zip(verdicts)
            .filter_map(|((trip, _), verdict)| match verdict {
                Verdict::Accepted => Some(trip),
                Verdict::OutOfWindow => {
                    report.dropped.out_of_window += 1;
                    None
                }
                Verdict::DegenerateRoute => {
                    report.dropped.degenerate_route += 1;
                    None
                }
            })
            .collect();
        report.accepted_trips = accepted.len();
        debug!("Filtering trips took {:?}", now.elapsed());
        Ok(accepted)
    }

    fn measure_all(&self, accepted: &[RawTrip], report: &mut Report) -> Vec<TripMetrics> {
        let results: Vec<_> = accepted
            .par_iter()
            .map(|trip| TripMetrics::measure(trip, self.config))
            .collect();

        let mut records = Vec::with_capacity(results.len());
        results.into_iter().for_each(|result| match result {
            Ok(metrics) => records.push(metrics),
            Err(metrics::Error::TooShort { .. }) => report.dropped.too_short += 1,
            Err(err @ metrics::Error::ZeroDuration { .. }) => {
                warn!("Dropping trip: {err}");
                report.dropped.zero_duration += 1;
            }
        });
        report.records = records.len();
        records
    }
}
