use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Terminal file layout: route code to `[latitude, longitude]` pairs, one per
/// direction of travel.
pub type TerminalFile = HashMap<String, Vec<[f64; 2]>>;

/// Alias file layout: list of two-code pairs.
pub type AliasFile = Vec<AliasPair>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AliasPair(pub String, pub String);
