mod common;

use std::sync::Arc;

use common::{Driver, east, to_records};
use tripwise::prelude::*;

const LEGS: usize = 8;

fn repository() -> Repository {
    Repository::new()
        .with_terminals("100", [east(0.0), east(9.0)])
        .with_terminals("300", [east(0.0), east(9.0)])
}

/// Length and ping interval of run `m`. Later runs are longer and slower,
/// so trip durations and displacements both grow with `m`.
fn run(m: usize) -> (f64, i64) {
    (8.6 + 0.8 * m as f64 / 23.0, 30_000 + 400 * m as i64)
}

/// Outbound runs from terminal 0 to around terminal 9, jumping back to the
/// start between runs.
fn commuter<I>(vehicle: &str, route: &str, runs: I) -> Vec<Ping>
where
    I: IntoIterator<Item = (f64, i64)>,
{
    let mut driver = Driver::new(vehicle, route, 0.0);
    for (length, dt) in runs {
        driver.drive(length, 0.4, dt).dwell(dt);
        driver.ping_at(0.0, 30_000);
    }
    driver.finish()
}

fn fleet() -> Vec<(Arc<str>, Vec<Ping>)> {
    let mut vehicles: Vec<(Arc<str>, Vec<Ping>)> = (0..3)
        .map(|v| {
            let vehicle = format!("A{v}");
            let pings = commuter(&vehicle, "100", (v * LEGS..(v + 1) * LEGS).map(run));
            (vehicle.into(), pings)
        })
        .collect();
    // One crawling run, far too long for route 100.
    vehicles.push((
        "A9".into(),
        commuter("A9", "100", [run(0), (9.0, 90_000), run(0)]),
    ));
    vehicles.push(("Z9".into(), commuter("Z9", "300", (0..4).map(run))));
    vehicles
}

#[test]
fn run_pings_test() {
    let repository = repository();
    let config = Config::default();
    let output = Pipeline::new(&repository, &config)
        .run_pings(&fleet())
        .unwrap();
    let report = output.report;

    assert_eq!(report.vehicles, 5);
    // Every vehicle loses its first and last trip.
    assert_eq!(report.candidate_trips, 3 * (LEGS - 2) + 1 + 2);
    assert_eq!(report.dropped.malformed, 0);
    assert_eq!(report.dropped.degenerate_route, 2);
    assert!(report.accepted_trips > 0);
    assert!(report.dropped.out_of_window > 0);
    assert_eq!(
        report.candidate_trips,
        report.accepted_trips + report.dropped.out_of_window + report.dropped.degenerate_route
    );
    assert_eq!(
        report.accepted_trips,
        report.records + report.dropped.too_short + report.dropped.zero_duration
    );

    assert_eq!(output.accepted.len(), report.accepted_trips);
    assert_eq!(output.records.len(), report.records);
    assert!(!output.records.is_empty());
    assert!(output.records.iter().all(|r| r.route_name.as_ref() == "100"));
    assert!(output.calibration.window("100").is_some());
    assert!(output.calibration.is_degenerate("300"));
    assert!(output.stream_errors.is_empty());
}

#[test]
fn accepted_trips_inside_window_test() {
    let repository = repository();
    let config = Config::default();
    let output = Pipeline::new(&repository, &config)
        .run_pings(&fleet())
        .unwrap();
    let window = output.calibration.window("100").unwrap();

    assert_eq!(window.population, 3 * (LEGS - 2) + 1);
    assert!(output.accepted.iter().all(|trip| trip.vehicle_id.as_ref() != "A9"));
    output.accepted.iter().for_each(|trip| {
        let summary = trip.summarize().unwrap();
        assert!(window.accepts(&summary));
    });
}

#[test]
fn run_isolates_invalid_stream_test() {
    let repository = repository();
    let config = Config::default();
    let mut streams: Vec<VehicleStream> = fleet()
        .iter()
        .map(|(vehicle, pings)| VehicleStream::new(vehicle, to_records(pings)))
        .collect();
    let mut broken = streams[0].clone();
    broken.vehicle_id = "X1".into();
    broken.records[3].latitude = "north".into();
    streams.push(broken);

    let output = Pipeline::new(&repository, &config).run(&streams).unwrap();
    let expected = Pipeline::new(&repository, &config)
        .run_pings(&fleet())
        .unwrap();

    assert_eq!(output.report.vehicles, 6);
    assert_eq!(output.report.dropped.invalid_streams, 1);
    assert_eq!(output.stream_errors.len(), 1);
    assert_eq!(output.report.candidate_trips, expected.report.candidate_trips);
    assert_eq!(output.report.records, expected.report.records);
}

#[test]
fn empty_batch_test() {
    let repository = repository();
    let config = Config::default();
    let output = Pipeline::new(&repository, &config).run(&[]).unwrap();
    assert_eq!(output.report, Report::default());
    assert!(output.records.is_empty());
}

#[test]
fn export_records_test() {
    let repository = repository();
    let config = Config::default();
    let output = Pipeline::new(&repository, &config)
        .run_pings(&fleet())
        .unwrap();

    let mut writer = csv::Writer::from_writer(Vec::new());
    output
        .records
        .iter()
        .try_for_each(|metrics| writer.serialize(metrics.to_record()))
        .unwrap();
    let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    let mut lines = data.lines();

    assert_eq!(
        lines.next(),
        Some("route_name,vehicle_id,total_distance_km,duration_s,avg_speed_kmh")
    );
    assert_eq!(lines.count(), output.records.len());
}

#[test]
fn malformed_trip_test() {
    const MINUTE: i64 = 60_000;
    // Each switch to route 999, which has no terminals, closes the open trip.
    let mut driver = Driver::new("M1", "100", 0.0);
    driver.drive(5.0, 1.0, MINUTE);
    driver.route("999").ping_at(6.0, MINUTE);
    driver.route("100").ping_at(7.0, MINUTE);
    driver.route("999").ping_at(8.0, MINUTE);
    driver.route("100").ping_at(7.0, MINUTE).drive(4.0, 1.0, MINUTE);
    driver.route("999").ping_at(3.0, MINUTE);
    driver.route("100").ping_at(2.0, MINUTE).ping_at(1.0, MINUTE);
    driver.route("999").ping_at(0.5, MINUTE);
    let pings = driver.finish();

    let repository = repository();
    let config = Config::default();
    let closed = Segmenter::new(&repository, &config).closed_trips("M1", &pings);
    assert_eq!(
        closed.iter().map(RawTrip::len).collect::<Vec<_>>(),
        vec![5, 1, 4, 2]
    );

    let vehicles: Vec<(Arc<str>, Vec<Ping>)> = vec![("M1".into(), pings)];
    let output = Pipeline::new(&repository, &config)
        .run_pings(&vehicles)
        .unwrap();
    let report = output.report;
    assert_eq!(report.dropped.malformed, 1);
    assert_eq!(report.candidate_trips, 1);
    assert_eq!(report.dropped.degenerate_route, 1);
    assert_eq!(report.dropped.trips(), 2);
    assert!(output.accepted.is_empty());
}
