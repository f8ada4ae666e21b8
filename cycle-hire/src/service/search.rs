//! Search facade: free-text dock search.

use tracing::{debug, info};

use crate::corethree::build_search_request;
use crate::domain::{ClientTime, Encoding, SearchedStationInfo, TokenTriple};
use crate::error::CycleHireError;
use crate::registry::StaticLocationKey;
use crate::transport::Transport;

use super::CycleHireSession;

/// Per-call options for a search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Static location whose example tokens are the last resort.
    pub prime_from: Option<StaticLocationKey>,

    /// Use exactly these tokens, once, with no fallback.
    pub explicit_tokens: Option<(Encoding, ClientTime)>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prime_from(mut self, key: StaticLocationKey) -> Self {
        self.prime_from = Some(key);
        self
    }

    pub fn with_explicit_tokens(mut self, encoding: Encoding, client_time: ClientTime) -> Self {
        self.explicit_tokens = Some((encoding, client_time));
        self
    }
}

impl<T: Transport> CycleHireSession<T> {
    /// Search docking stations by free text.
    ///
    /// Tokens are chosen like for a hire when any are cached or a static
    /// key applies; otherwise the search is sent without them. Results are
    /// remembered for [`hire_by_station_id`](Self::hire_by_station_id).
    pub async fn search_stations(
        &mut self,
        search_text: &str,
        options: SearchOptions,
    ) -> Result<Vec<SearchedStationInfo>, CycleHireError> {
        let search_text = search_text.trim();
        if search_text.is_empty() {
            debug!("empty search text");
            return Ok(Vec::new());
        }

        let explicit = options
            .explicit_tokens
            .map(|(encoding, client_time)| self.token_triple(encoding, client_time));
        let static_key = options.prime_from.or(self.default_static_key);

        let transport = &self.transport;
        let profile = self.builder.profile();
        let parser = self.parser;
        let attempt = move |tokens: TokenTriple| {
            let request = build_search_request(profile, search_text, Some(&tokens));
            async move {
                let body = transport.send(&request).await?;
                parser.parse(body.as_str())
            }
        };

        let stations = if let Some(tokens) = explicit {
            self.selector.with_explicit(tokens, attempt).await?.value
        } else if self.selector.active_tokens().is_empty() && static_key.is_none() {
            debug!("searching without tokens");
            let request = build_search_request(profile, search_text, None);
            let body = transport.send(&request).await?;
            parser.parse(body.as_str())?
        } else {
            let selected = self.selector.select(static_key, attempt).await?;
            debug!(tier = %selected.tier, "search tokens accepted");
            selected.value
        };

        self.recent.remember(&stations).await;
        info!(
            query = search_text,
            results = stations.len(),
            hirable = stations.iter().filter(|s| s.is_hirable()).count(),
            "station search complete"
        );
        Ok(stations)
    }
}
