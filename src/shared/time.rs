use std::{
    fmt::Display,
    ops::{Add, AddAssign, Sub},
};

use chrono::{DateTime, Utc};

/// Instant of a ping, in milliseconds since the unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl From<i64> for Timestamp {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration(self.0.saturating_sub(rhs.0))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign<Duration> for Timestamp {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S%.3f")),
            None => write!(f, "{}ms", self.0),
        }
    }
}

impl Timestamp {
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }

    /// `None` outside the range chrono can represent.
    pub fn checked(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(|_| Self(millis))
    }

    /// Parses the integer millisecond text used by the fleet feed.
    pub fn parse(text: &str) -> Option<Self> {
        text.trim().parse().ok().and_then(Self::checked)
    }
}

/// Signed span between two timestamps, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(i64);

impl From<i64> for Duration {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Duration {
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn from_seconds(secs: i64) -> Self {
        Self(secs * 1000)
    }

    pub const fn from_minutes(minutes: i64) -> Self {
        Self(minutes * 60 * 1000)
    }

    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn as_seconds_f64(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    pub fn to_hms_string(&self) -> String {
        let secs = self.0.abs() / 1000;
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{sign}{:02}:{:02}:{:02}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        )
    }
}

#[test]
fn timestamp_sub_test() {
    let a = Timestamp::from_millis(1_700_000_000_000);
    let b = a + Duration::from_seconds(90);
    assert_eq!((b - a).as_millis(), 90_000);
}

#[test]
fn timestamp_parse_test() {
    assert_eq!(
        Timestamp::parse("1699999999000"),
        Some(Timestamp::from_millis(1_699_999_999_000))
    );
    assert_eq!(Timestamp::parse("16999a"), None);
    assert_eq!(Timestamp::parse(&i64::MAX.to_string()), None);
}

#[test]
fn timestamp_sub_saturates_test() {
    let a = Timestamp::from_millis(i64::MIN);
    let b = Timestamp::from_millis(i64::MAX);
    assert_eq!((b - a).as_millis(), i64::MAX);
}

#[test]
fn timestamp_display_test() {
    let t = Timestamp::from_millis(0);
    assert_eq!(t.to_string(), "1970-01-01 00:00:00.000");
}

#[test]
fn hms_test() {
    assert_eq!(Duration::from_seconds(3690).to_hms_string(), "01:01:30");
    assert_eq!(Duration::from_millis(-30_000).to_hms_string(), "-00:00:30");
}
