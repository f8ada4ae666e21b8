//! Station search response parsing.
//!
//! A search page lists each result as several sibling nodes sharing an ID
//! prefix `lchs_searchresult_<digits>`: a `Node.Link` with the display name
//! and, for docks with bikes, a `Node.Media.Image` named "Hire now" whose
//! tags carry the terminal/point address.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::{DockAddress, SearchedStationInfo, StationId};
use crate::error::CycleHireError;

use super::types::{NodeDto, decode_children};

const RESULT_PREFIX: &str = "lchs_searchresult_";
const HIRE_NOW: &str = "Hire now";
const NO_SUBTITLE: &str = "N/A";

/// A result group that could not be turned into a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// The shared ID prefix, e.g. `lchs_searchresult_300205`.
    pub key: String,
    pub reason: &'static str,
}

/// Everything recovered from one search page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSearch {
    pub stations: Vec<SearchedStationInfo>,
    pub skipped: Vec<SkippedRecord>,
}

/// Fields collected for one result group.
#[derive(Debug, Default)]
struct PartialRecord {
    digits: String,
    name: Option<String>,
    subtitle: Option<String>,
    dock_location: Option<String>,
    link_station_id: Option<String>,
    terminal_name: Option<String>,
    point_name: Option<String>,
    image_station_id: Option<String>,
}

impl PartialRecord {
    fn absorb(&mut self, node: &NodeDto) {
        if node.is_type("Node.Link") {
            self.name = node.name.clone().filter(|s| !s.is_empty());
            self.subtitle = node.subtitle.clone().filter(|s| !s.is_empty());
            self.dock_location = node.tag("LCHS.DockLocation").map(str::to_string);
            if let Some(id) = node.tag("LCHS.StationID") {
                self.link_station_id = Some(id.to_string());
            }
        } else if node.is_type("Node.Media.Image") && node.name.as_deref() == Some(HIRE_NOW) {
            self.terminal_name = node.tag("Terminal").map(str::to_string);
            self.point_name = node.tag("PointName").map(str::to_string);
            if let Some(id) = node.tag("StationID") {
                self.image_station_id = Some(id.to_string());
            }
        }
    }

    fn station_id(&self) -> Option<StationId> {
        [
            self.image_station_id.as_deref(),
            self.link_station_id.as_deref(),
            Some(self.digits.as_str()),
        ]
        .into_iter()
        .flatten()
        .find_map(|candidate| StationId::parse(candidate).ok())
    }

    fn finish(self, key: &str) -> Result<SearchedStationInfo, &'static str> {
        let id = self.station_id().ok_or("no usable station id")?;
        let name = self.name.ok_or("missing station name")?;

        let address = match self.terminal_name {
            Some(terminal) => {
                let point = self.point_name.unwrap_or_else(|| name.clone());
                match DockAddress::new(terminal, point) {
                    Ok(address) => Some(address),
                    Err(e) => {
                        debug!(key, error = %e, "dropping unusable dock address");
                        None
                    }
                }
            }
            None => None,
        };

        Ok(SearchedStationInfo::new(
            id,
            name,
            self.subtitle.unwrap_or_else(|| NO_SUBTITLE.to_string()),
            address,
            self.dock_location,
        ))
    }
}

/// Split `lchs_searchresult_<digits>...` into the group key and its digits.
fn result_key(node_id: &str) -> Option<(&str, &str)> {
    let rest = node_id.strip_prefix(RESULT_PREFIX)?;
    let digits_len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_len == 0 {
        return None;
    }
    let key_len = RESULT_PREFIX.len() + digits_len;
    Some((&node_id[..key_len], &rest[..digits_len]))
}

/// Parses station search responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct StationSearchParser;

impl StationSearchParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a search body into stations, in order of first appearance.
    pub fn parse(&self, body: &str) -> Result<Vec<SearchedStationInfo>, CycleHireError> {
        self.parse_detailed(body).map(|parsed| parsed.stations)
    }

    /// Like [`parse`](Self::parse) but also reports the groups that were
    /// dropped.
    pub fn parse_detailed(&self, body: &str) -> Result<ParsedSearch, CycleHireError> {
        let nodes = decode_children(body).map_err(|e| CycleHireError::SearchResponseMalformed {
            message: e.to_string(),
        })?;

        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, PartialRecord> = HashMap::new();

        for node in &nodes {
            let Some((key, digits)) = result_key(node.id()) else {
                continue;
            };
            let record = groups.entry(key.to_string()).or_insert_with(|| {
                order.push(key.to_string());
                PartialRecord {
                    digits: digits.to_string(),
                    ..PartialRecord::default()
                }
            });
            record.absorb(node);
        }

        let mut parsed = ParsedSearch::default();
        for key in order {
            let Some(record) = groups.remove(&key) else {
                continue;
            };
            match record.finish(&key) {
                Ok(station) => parsed.stations.push(station),
                Err(reason) => {
                    warn!(key = %key, reason, "skipping search result");
                    parsed.skipped.push(SkippedRecord { key, reason });
                }
            }
        }

        debug!(
            stations = parsed.stations.len(),
            skipped = parsed.skipped.len(),
            "parsed search response"
        );
        Ok(parsed)
    }
}
