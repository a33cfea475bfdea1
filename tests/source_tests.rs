use std::io::Write;

use tripwise::{
    prelude::*,
    shared::ParseError,
    source::{Error, Field},
};

const JSON: &str = r#"[
    {"ordem": "B31001", "linha": "010", "datahora": "1700000000000", "latitude": "-22,90", "longitude": "-43,20"},
    {"linha": "010", "datahora": 1700000060000, "latitude": -22.89, "longitude": -43.19, "velocidade": 31}
]"#;

const CSV: &str = "\
ordem,linha,datahora,latitude,longitude
B1,100,1700000000000,\"-22,90\",\"-43,20\"
C2,200,1700000000000,\"-22,80\",\"-43,10\"
B1,100,1700000060000,\"-22,91\",\"-43,21\"
C2,200,1700000060000,\"-22,81\",\"-43,11\"
B1,LECD34,1700000120000,\"-22,92\",\"-43,22\"
";

fn record(latitude: &str) -> PingRecord {
    PingRecord {
        vehicle_id: None,
        route_id: "100".into(),
        timestamp: Field::Integer(1_700_000_000_000),
        latitude: latitude.into(),
        longitude: "-43,2".into(),
    }
}

#[test]
fn json_reader_test() {
    let stream = VehicleStream::from_json_reader("B31001", JSON.as_bytes()).unwrap();
    assert_eq!(stream.len(), 2);

    let pings = stream.pings().unwrap();
    assert_eq!(pings[0].vehicle_id.as_ref(), "B31001");
    assert_eq!(pings[1].vehicle_id.as_ref(), "B31001");
    assert_eq!(pings[0].route_id.as_ref(), "010");
    assert_eq!(pings[0].timestamp, Timestamp::from_millis(1_700_000_000_000));
    assert_eq!(pings[1].timestamp, Timestamp::from_millis(1_700_000_060_000));
    assert_eq!(pings[0].coordinate, Coordinate::new(-22.90, -43.20));
    assert_eq!(pings[1].coordinate, Coordinate::new(-22.89, -43.19));
}

#[test]
fn json_file_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("B31001.json");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(JSON.as_bytes())
        .unwrap();

    let stream = VehicleStream::from_json_file(&path).unwrap();
    assert_eq!(stream.vehicle_id.as_ref(), "B31001");
    assert_eq!(stream.pings().unwrap().len(), 2);

    assert!(matches!(
        VehicleStream::from_json_file(dir.path().join("missing.json")),
        Err(Error::Io(_))
    ));
}

#[test]
fn csv_reader_test() {
    let streams = VehicleStream::from_csv_reader(CSV.as_bytes()).unwrap();
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0].vehicle_id.as_ref(), "B1");
    assert_eq!(streams[1].vehicle_id.as_ref(), "C2");

    let pings = streams[0].pings().unwrap();
    assert_eq!(pings.len(), 3);
    assert_eq!(pings[2].route_id.as_ref(), "LECD34");
    assert!(pings.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    assert_eq!(pings[1].coordinate, Coordinate::new(-22.91, -43.21));
    assert_eq!(streams[1].pings().unwrap().len(), 2);
}

#[test]
fn csv_missing_vehicle_test() {
    let csv = "linha,datahora,latitude,longitude\n100,1700000000000,1,2\n";
    assert!(matches!(
        VehicleStream::from_csv_reader(csv.as_bytes()),
        Err(Error::MissingVehicleId(0))
    ));
}

#[test]
fn bad_coordinate_test() {
    let stream = VehicleStream::new("B1", vec![record("-22,9"), record("abc")]);
    match stream.pings() {
        Err(Error::Coordinate {
            vehicle,
            index,
            source,
        }) => {
            assert_eq!(vehicle, "B1");
            assert_eq!(index, 1);
            assert_eq!(source, ParseError::InvalidNumber("abc".into()));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn out_of_range_coordinate_test() {
    let stream = VehicleStream::new("B1", vec![record("-122,9")]);
    assert!(matches!(
        stream.pings(),
        Err(Error::Coordinate {
            source: ParseError::OutOfRange { .. },
            ..
        })
    ));
}

#[test]
fn bad_timestamp_test() {
    let mut bad = record("-22,9");
    bad.timestamp = "yesterday".into();
    let stream = VehicleStream::new("B1", vec![record("-22,9"), bad]);
    assert!(matches!(
        stream.pings(),
        Err(Error::Timestamp { index: 1, .. })
    ));
}

#[test]
fn empty_stream_test() {
    let stream = VehicleStream::new("B1", Vec::new());
    assert!(stream.is_empty());
    assert!(stream.pings().unwrap().is_empty());
}

#[test]
fn timestamp_out_of_range_test() {
    let mut huge = record("-22,9");
    huge.timestamp = Field::Integer(i64::MAX);
    let mut tiny = record("-22,9");
    tiny.timestamp = i64::MIN.to_string().as_str().into();

    let stream = VehicleStream::new("B1", vec![record("-22,9"), huge]);
    assert!(matches!(
        stream.pings(),
        Err(Error::Timestamp { index: 1, .. })
    ));
    let stream = VehicleStream::new("B1", vec![tiny]);
    assert!(matches!(
        stream.pings(),
        Err(Error::Timestamp { index: 0, .. })
    ));
}
