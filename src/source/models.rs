use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// A feed value that may arrive as JSON number or as text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Field {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Field {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Field::Integer(value) => Cow::Owned(value.to_string()),
            Field::Float(value) => Cow::Owned(value.to_string()),
            Field::Text(value) => Cow::Borrowed(value),
        }
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// One position broadcast as it appears in the fleet dumps.
///
/// Field names follow the feed (`ordem`, `linha`, `datahora`); the English
/// names are accepted too. Unknown columns are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PingRecord {
    #[serde(alias = "ordem", default)]
    pub vehicle_id: Option<String>,
    #[serde(alias = "linha")]
    pub route_id: String,
    #[serde(alias = "datahora")]
    pub timestamp: Field,
    pub latitude: Field,
    pub longitude: Field,
}
