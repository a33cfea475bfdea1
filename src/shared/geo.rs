use std::{
    cmp,
    fmt::Display,
    iter::Sum,
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::time::Duration;

/// Mean earth radius used by every great-circle computation in the crate.
pub const EARTH_RADIUS: Distance = Distance::from_kilometers(6371.009);

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Coordinate text is empty")]
    Empty,
    #[error("Could not parse coordinate: {0:?}")]
    InvalidNumber(String),
    #[error("{axis} {value} is outside of [-{limit}, {limit}]")]
    OutOfRange {
        axis: &'static str,
        value: f64,
        limit: f64,
    },
}

/// Parses a single coordinate component.
///
/// The fleet feed writes numbers with a decimal comma (`"-22,90"`), so both
/// separators are accepted. Non-finite values are rejected.
pub fn parse_coordinate(text: &str) -> Result<f64, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }
    let value: f64 = text
        .replace(',', ".")
        .parse()
        .map_err(|_| ParseError::InvalidNumber(text.to_string()))?;
    if !value.is_finite() {
        return Err(ParseError::InvalidNumber(text.to_string()));
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Distance(f64);

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Add for Distance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Distance {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Distance {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, distance| acc + distance)
    }
}

impl Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} km", self.as_kilometers())
    }
}

impl Distance {
    pub const fn from_meters(distance: f64) -> Self {
        Self(distance)
    }

    pub const fn from_kilometers(distance: f64) -> Self {
        Self(distance * 1000.0)
    }

    pub const fn as_meters(&self) -> f64 {
        self.0
    }

    pub const fn as_kilometers(&self) -> f64 {
        self.0 / 1000.0
    }

    /// Speed in km/h needed to cover this distance in `elapsed`.
    /// Returns `None` when no time has passed.
    pub fn speed_over(&self, elapsed: Duration) -> Option<f64> {
        let millis = elapsed.as_millis();
        if millis == 0 {
            return None;
        }
        Some(self.as_kilometers() * MILLIS_PER_HOUR / millis as f64)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}, {}", self.latitude, self.longitude))
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(value: Coordinate) -> Self {
        (value.latitude, value.longitude)
    }
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate from feed text, validating both axes.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, ParseError> {
        let latitude = parse_coordinate(latitude)?;
        let longitude = parse_coordinate(longitude)?;
        Self::checked(latitude, longitude)
    }

    pub fn checked(latitude: f64, longitude: f64) -> Result<Self, ParseError> {
        if !latitude.is_finite() || latitude.abs() > 90.0 {
            return Err(ParseError::OutOfRange {
                axis: "latitude",
                value: latitude,
                limit: 90.0,
            });
        }
        if !longitude.is_finite() || longitude.abs() > 180.0 {
            return Err(ParseError::OutOfRange {
                axis: "longitude",
                value: longitude,
                limit: 180.0,
            });
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Great-circle (haversine) distance.
    pub fn distance(&self, coord: &Self) -> Distance {
        let dist_lat = f64::to_radians(coord.latitude - self.latitude);
        let dist_lon = f64::to_radians(coord.longitude - self.longitude);
        let a = f64::powi(f64::sin(dist_lat / 2.0), 2)
            + f64::cos(f64::to_radians(self.latitude))
                * f64::cos(f64::to_radians(coord.latitude))
                * f64::sin(dist_lon / 2.0)
                * f64::sin(dist_lon / 2.0);
        let c = 2.0 * f64::atan2(f64::sqrt(a), f64::sqrt(1.0 - a));
        Distance::from_meters(EARTH_RADIUS.as_meters() * c)
    }

    /// Distance to the closest of `others`, `None` if there are none.
    pub fn nearest_distance(&self, others: &[Coordinate]) -> Option<Distance> {
        others
            .iter()
            .map(|other| self.distance(other))
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(cmp::Ordering::Equal))
    }
}

#[test]
fn distance_test() {
    let coord_a = Coordinate::new(48.85800943005911, 2.3514350059357927);
    let coord_b = Coordinate::new(51.5052389927712, -0.12495407345099824);
    let d = coord_a.distance(&coord_b);
    assert!((d.as_kilometers() - 343.5).abs() < 1.0);
}

#[test]
fn distance_eq_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(1.0);
    assert_eq!(dist_a, dist_b)
}

#[test]
fn distance_cmp_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(0.5);
    assert!(dist_a > dist_b)
}

#[test]
fn distance_sum_test() {
    let total: Distance = [0.1, 0.2, 0.3]
        .into_iter()
        .map(Distance::from_kilometers)
        .sum();
    assert!((total.as_meters() - 600.0).abs() < 1e-9);
}

#[test]
fn speed_over_zero_test() {
    assert!(
        Distance::from_kilometers(1.0)
            .speed_over(Duration::from_millis(0))
            .is_none()
    );
}

#[test]
fn speed_over_test() {
    let speed = Distance::from_kilometers(1.0)
        .speed_over(Duration::from_millis(60_000))
        .unwrap();
    assert!((speed - 60.0).abs() < 1e-9);
}

#[test]
fn parse_decimal_comma_test() {
    assert_eq!(parse_coordinate("-22,9068").unwrap(), -22.9068);
}

#[test]
fn parse_decimal_point_test() {
    assert_eq!(parse_coordinate(" -43.1729 ").unwrap(), -43.1729);
}

#[test]
fn parse_invalid_test() {
    assert_eq!(
        parse_coordinate("abc"),
        Err(ParseError::InvalidNumber("abc".into()))
    );
    assert_eq!(parse_coordinate(""), Err(ParseError::Empty));
    assert!(parse_coordinate("NaN").is_err());
}

#[test]
fn parse_out_of_range_test() {
    assert!(matches!(
        Coordinate::parse("91,0", "0"),
        Err(ParseError::OutOfRange {
            axis: "latitude",
            ..
        })
    ));
    assert!(Coordinate::parse("-22,9", "-43,2").is_ok());
}

#[test]
fn nearest_distance_test() {
    let origin = Coordinate::new(0.0, 0.0);
    assert!(origin.nearest_distance(&[]).is_none());
    let near = Coordinate::new(0.0, 0.001);
    let far = Coordinate::new(0.0, 1.0);
    let nearest = origin.nearest_distance(&[far, near]).unwrap();
    assert_eq!(nearest, origin.distance(&near));
}
