//! Token frequency summaries

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Token count, type count and frequency table of one article
///
/// Serializes as `{"token": .., "type": .., "wortfreq": [[surface, count], ..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub token: usize,
    #[serde(rename = "type")]
    pub types: usize,
    pub wortfreq: Vec<(String, usize)>,
}

impl Summary {
    /// Builds a summary from surface forms in text order
    ///
    /// The table is sorted by descending count; ties keep the order in which
    /// the surfaces first appeared.
    pub fn from_surfaces<I, S>(surfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut table: Vec<(String, usize)> = Vec::new();
        let mut token = 0;

        for surface in surfaces {
            let surface = surface.as_ref();
            token += 1;
            match index.get(surface) {
                Some(&slot) => table[slot].1 += 1,
                None => {
                    index.insert(surface.to_string(), table.len());
                    table.push((surface.to_string(), 1));
                }
            }
        }

        // Stable sort preserves first-occurrence order among equal counts
        table.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            token,
            types: table.len(),
            wortfreq: table,
        }
    }

    /// Serializes the summary as compact JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
