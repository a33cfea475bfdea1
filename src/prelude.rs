pub use crate::{
    calibrate::{AcceptanceWindow, Calibration, Range},
    config::Config,
    filter::{TripFilter, Verdict},
    metrics::{ExportRecord, TripMetrics},
    pipeline::{BatchOutput, DropCounts, Pipeline, Report},
    repository::Repository,
    segment::{Segmentation, Segmenter},
    shared::{Coordinate, Distance, Duration, Quartiles, Timestamp},
    source::{Ping, PingRecord, VehicleStream},
    trip::{RawTrip, TripPing, TripSummary},
};
