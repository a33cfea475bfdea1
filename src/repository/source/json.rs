use crate::{
    repository::{self, AliasFile, Repository, TerminalFile},
    shared::Coordinate,
};
use std::{fs::File, io::BufReader, io::Read, path::Path, time::Instant};
use tracing::{debug, warn};

const MAX_TERMINALS: usize = 2;

impl Repository {
    /// Loads the `{"route": [[lat, lon], ...]}` terminal table.
    pub fn load_terminals<R: Read>(mut self, reader: R) -> Result<Self, repository::Error> {
        debug!("Loading terminals...");
        let now = Instant::now();
        let file: TerminalFile = serde_json::from_reader(reader)?;
        for (route_id, points) in file {
            if points.len() > MAX_TERMINALS {
                warn!(
                    "Route {route_id} has {} terminals, expected at most {MAX_TERMINALS}",
                    points.len()
                );
            }
            let terminals = points
                .into_iter()
                .map(|[lat, lon]| Coordinate::checked(lat, lon))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| repository::Error::Terminal {
                    route: route_id.clone(),
                    source,
                })?;
            self.insert_terminals(&route_id, terminals);
        }
        debug!(
            "Loading {} terminal sets took {:?}",
            self.route_count(),
            now.elapsed()
        );
        Ok(self)
    }

    /// Loads the `[["a", "b"], ...]` alias table.
    pub fn load_aliases<R: Read>(mut self, reader: R) -> Result<Self, repository::Error> {
        debug!("Loading aliases...");
        let now = Instant::now();
        let file: AliasFile = serde_json::from_reader(reader)?;
        file.iter()
            .for_each(|pair| self.insert_alias(&pair.0, &pair.1));
        debug!(
            "Loading {} alias pairs took {:?}",
            file.len(),
            now.elapsed()
        );
        Ok(self)
    }

    pub fn load_terminals_file<P: AsRef<Path>>(self, path: P) -> Result<Self, repository::Error> {
        let file = File::open(path)?;
        self.load_terminals(BufReader::new(file))
    }

    pub fn load_aliases_file<P: AsRef<Path>>(self, path: P) -> Result<Self, repository::Error> {
        let file = File::open(path)?;
        self.load_aliases(BufReader::new(file))
    }
}
