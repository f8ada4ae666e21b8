//! Recently seen search results, so a result can be hired by id.
//!
//! Entries expire after the configured TTL: dock availability changes
//! quickly and a stale result may no longer be hirable.

use moka::future::Cache as MokaCache;

use crate::domain::{SearchedStationInfo, StationId};

use super::config::SearchCacheConfig;

/// Search results keyed by station id.
pub struct RecentStations {
    stations: MokaCache<StationId, SearchedStationInfo>,
}

impl RecentStations {
    pub fn new(config: &SearchCacheConfig) -> Self {
        let stations = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { stations }
    }

    /// Remember every station of a result set, replacing older entries.
    pub async fn remember(&self, stations: &[SearchedStationInfo]) {
        for station in stations {
            self.stations
                .insert(station.id().clone(), station.clone())
                .await;
        }
    }

    pub async fn get(&self, id: &StationId) -> Option<SearchedStationInfo> {
        self.stations.get(id).await
    }

    /// Approximate number of remembered stations (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.stations.entry_count()
    }

    pub fn invalidate_all(&self) {
        self.stations.invalidate_all();
    }
}

impl std::fmt::Debug for RecentStations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentStations")
            .field("entry_count", &self.stations.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DockAddress;

    fn station(id: &str, name: &str) -> SearchedStationInfo {
        SearchedStationInfo::new(
            StationId::parse(id).unwrap(),
            name,
            "N/A",
            Some(DockAddress::new(id, name).unwrap()),
            None,
        )
    }

    #[tokio::test]
    async fn remembers_and_replaces() {
        let recent = RecentStations::new(&SearchCacheConfig::default());
        let id = StationId::parse("1").unwrap();

        assert_eq!(recent.get(&id).await, None);

        recent.remember(&[station("1", "Old name")]).await;
        recent.remember(&[station("1", "New name"), station("2", "Other")]).await;

        assert_eq!(recent.get(&id).await.unwrap().name(), "New name");
        assert!(recent.get(&StationId::parse("2").unwrap()).await.is_some());

        recent.invalidate_all();
        assert_eq!(recent.get(&id).await, None);
    }
}
