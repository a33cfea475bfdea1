use std::{collections::HashMap, io, sync::Arc};

mod models;
mod source;
pub use models::*;
use thiserror::Error;

use crate::shared::geo::{Coordinate, ParseError};

/// Route codes starting with this denote special or renamed services that
/// are published under a second code.
pub const SPECIAL_SERVICE_PREFIX: &str = "LECD";

type IdToId = HashMap<Arc<str>, Arc<str>>;
type IdToCoordinates = HashMap<Arc<str>, Arc<[Coordinate]>>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Route {route} has a bad terminal: {source}")]
    Terminal { route: String, source: ParseError },
}

/// Read-only route knowledge shared by every segmentation run: which codes
/// alias each other and where each route's terminals are.
#[derive(Debug, Clone)]
pub struct Repository {
    special_prefix: Arc<str>,
    alias_lookup: IdToId,
    terminal_lookup: IdToCoordinates,
}

impl Default for Repository {
    fn default() -> Self {
        Self {
            special_prefix: SPECIAL_SERVICE_PREFIX.into(),
            alias_lookup: Default::default(),
            terminal_lookup: Default::default(),
        }
    }
}

impl Repository {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_special_prefix(mut self, prefix: &str) -> Self {
        self.special_prefix = prefix.into();
        self
    }

    /// Registers two codes for the same physical line.
    /// A code keeps the first partner it was registered with.
    pub fn with_alias(mut self, a: &str, b: &str) -> Self {
        self.insert_alias(a, b);
        self
    }

    /// Sets the terminals of a route, replacing any previous entry.
    pub fn with_terminals<I>(mut self, route_id: &str, terminals: I) -> Self
    where
        I: IntoIterator<Item = Coordinate>,
    {
        self.insert_terminals(route_id, terminals.into_iter().collect());
        self
    }

    pub(crate) fn insert_alias(&mut self, a: &str, b: &str) {
        let a: Arc<str> = a.into();
        let b: Arc<str> = b.into();
        self.alias_lookup
            .entry(a.clone())
            .or_insert_with(|| b.clone());
        self.alias_lookup.entry(b).or_insert(a);
    }

    pub(crate) fn insert_terminals(&mut self, route_id: &str, terminals: Vec<Coordinate>) {
        self.terminal_lookup.insert(route_id.into(), terminals.into());
    }

    /// The other code of an alias pair, or the code itself if it has none.
    pub fn partner<'a>(&'a self, route_id: &'a str) -> &'a str {
        self.alias_lookup
            .get(route_id)
            .map(|partner| partner.as_ref())
            .unwrap_or(route_id)
    }

    pub fn is_special(&self, route_id: &str) -> bool {
        route_id.starts_with(self.special_prefix.as_ref())
    }

    /// Name a trip on `route_id` is reported under.
    /// Special-service codes are replaced by their partner, everything else
    /// is returned unchanged.
    pub fn canonicalize<'a>(&'a self, route_id: &'a str) -> &'a str {
        if self.is_special(route_id) {
            self.partner(route_id)
        } else {
            route_id
        }
    }

    /// Known terminals of a route, falling back to its canonical code.
    /// Unknown routes have no terminals.
    pub fn terminals_for(&self, route_id: &str) -> &[Coordinate] {
        if let Some(terminals) = self.terminal_lookup.get(route_id) {
            return terminals;
        }
        self.terminal_lookup
            .get(self.canonicalize(route_id))
            .map(|terminals| terminals.as_ref())
            .unwrap_or(&[])
    }

    pub fn route_count(&self) -> usize {
        self.terminal_lookup.len()
    }

    pub fn alias_count(&self) -> usize {
        self.alias_lookup.len()
    }
}
