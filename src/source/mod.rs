use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;

pub mod models;
pub use models::*;

use crate::shared::{Coordinate, ParseError, Timestamp, parse_coordinate};

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Ping {index} of vehicle {vehicle} has a bad coordinate: {source}")]
    Coordinate {
        vehicle: String,
        index: usize,
        source: ParseError,
    },
    #[error("Ping {index} of vehicle {vehicle} has a bad timestamp: {value:?}")]
    Timestamp {
        vehicle: String,
        index: usize,
        value: String,
    },
    #[error("Row {0} has no vehicle id")]
    MissingVehicleId(usize),
    #[error("Could not derive a vehicle id from {0}")]
    InvalidPath(PathBuf),
}

/// A parsed GPS fix.
#[derive(Debug, Clone, PartialEq)]
pub struct Ping {
    pub vehicle_id: Arc<str>,
    pub route_id: Arc<str>,
    pub timestamp: Timestamp,
    pub coordinate: Coordinate,
}

impl Ping {
    pub fn new(
        vehicle_id: &str,
        route_id: &str,
        timestamp: Timestamp,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            route_id: route_id.into(),
            timestamp,
            coordinate,
        }
    }
}

/// Every ping of one vehicle, in feed order.
///
/// The feed order is expected to be chronological; nothing here re-sorts it.
#[derive(Debug, Clone, Default)]
pub struct VehicleStream {
    pub vehicle_id: Arc<str>,
    pub records: Vec<PingRecord>,
}

impl VehicleStream {
    pub fn new(vehicle_id: &str, records: Vec<PingRecord>) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reads a JSON array of ping records belonging to `vehicle_id`.
    pub fn from_json_reader<R: Read>(vehicle_id: &str, reader: R) -> Result<Self, self::Error> {
        let records: Vec<PingRecord> = serde_json::from_reader(reader)?;
        Ok(Self::new(vehicle_id, records))
    }

    /// Reads a per-vehicle dump. The vehicle id is the file stem, so
    /// `B31001.json` holds the pings of `B31001`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, self::Error> {
        let path = path.as_ref();
        let vehicle_id = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| self::Error::InvalidPath(path.to_path_buf()))?;
        let file = File::open(path)?;
        Self::from_json_reader(vehicle_id, BufReader::new(file))
    }

    /// Reads a CSV dump with a vehicle column and splits it per vehicle.
    /// Vehicles are returned in order of first appearance, each keeping its
    /// rows in file order.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<Self>, self::Error> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut order: Vec<Arc<str>> = Vec::new();
        let mut streams: HashMap<Arc<str>, Vec<PingRecord>> = HashMap::new();
        for (i, result) in rdr.deserialize().enumerate() {
            let record: PingRecord = result?;
            let vehicle_id = record
                .vehicle_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .ok_or(self::Error::MissingVehicleId(i))?;
            if let Some(records) = streams.get_mut(vehicle_id) {
                records.push(record);
            } else {
                let vehicle_id: Arc<str> = vehicle_id.into();
                order.push(vehicle_id.clone());
                streams.insert(vehicle_id, vec![record]);
            }
        }
        Ok(order
            .into_iter()
            .map(|vehicle_id| {
                let records = streams.remove(&vehicle_id).unwrap_or_default();
                Self {
                    vehicle_id,
                    records,
                }
            })
            .collect())
    }

    /// Parses every record. The first malformed record fails the whole
    /// stream.
    pub fn pings(&self) -> Result<Vec<Ping>, self::Error> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| self.parse_record(index, record))
            .collect()
    }

    fn parse_record(&self, index: usize, record: &PingRecord) -> Result<Ping, self::Error> {
        let coordinate_error = |source| self::Error::Coordinate {
            vehicle: self.vehicle_id.to_string(),
            index,
            source,
        };
        let latitude = parse_field(&record.latitude).map_err(coordinate_error)?;
        let longitude = parse_field(&record.longitude).map_err(coordinate_error)?;
        let coordinate = Coordinate::checked(latitude, longitude).map_err(coordinate_error)?;
        let timestamp = parse_timestamp(&record.timestamp).ok_or_else(|| self::Error::Timestamp {
            vehicle: self.vehicle_id.to_string(),
            index,
            value: record.timestamp.as_text().into_owned(),
        })?;
        Ok(Ping {
            vehicle_id: self.vehicle_id.clone(),
            route_id: record.route_id.trim().into(),
            timestamp,
            coordinate,
        })
    }
}

fn parse_field(field: &Field) -> Result<f64, ParseError> {
    match field {
        Field::Integer(value) => Ok(*value as f64),
        Field::Float(value) => Ok(*value),
        Field::Text(text) => parse_coordinate(text),
    }
}

fn parse_timestamp(field: &Field) -> Option<Timestamp> {
    match field {
        Field::Integer(value) => Timestamp::checked(*value),
        Field::Float(value) if value.fract() == 0.0 => Timestamp::checked(*value as i64),
        Field::Float(_) => None,
        Field::Text(text) => Timestamp::parse(text),
    }
}
