//! Hire facade: obtain a release code for a dock.

use std::fmt;

use tracing::{debug, info};

use crate::corethree::{HireTarget, extract_release_code};
use crate::domain::{
    ClientTime, DockAddress, Encoding, ReleaseCode, SearchedStationInfo, StationId, TokenTriple,
};
use crate::error::CycleHireError;
use crate::registry::StaticLocationKey;
use crate::tokens::{Selected, Tier};
use crate::transport::Transport;

use super::CycleHireSession;

/// Per-call options for a hire.
#[derive(Debug, Clone, Default)]
pub struct HireOptions {
    /// Static location whose example tokens are the last resort.
    pub token_source: Option<StaticLocationKey>,

    /// Use exactly these tokens, once, with no fallback.
    pub explicit_tokens: Option<(Encoding, ClientTime)>,
}

impl HireOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token_source(mut self, key: StaticLocationKey) -> Self {
        self.token_source = Some(key);
        self
    }

    pub fn with_explicit_tokens(mut self, encoding: Encoding, client_time: ClientTime) -> Self {
        self.explicit_tokens = Some((encoding, client_time));
        self
    }
}

/// A successful hire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HireOutcome {
    pub code: ReleaseCode,
    /// Name of the hired station.
    pub station: String,
    pub address: DockAddress,
    /// The token tier that worked.
    pub tier: Tier,
}

impl fmt::Display for HireOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "release code {} for {} (terminal {}, {})",
            self.code,
            self.station,
            self.address.terminal_name(),
            self.tier
        )
    }
}

impl<T: Transport> CycleHireSession<T> {
    /// Hire at a static location.
    ///
    /// Unless `options` names another token source, the location's own
    /// example tokens are the last resort.
    pub async fn hire_static(
        &mut self,
        key: StaticLocationKey,
        options: HireOptions,
    ) -> Result<HireOutcome, CycleHireError> {
        let record = self.selector.registry().lookup(key)?.clone();
        let token_source = options.token_source.or(Some(key));
        self.hire_target(HireTarget::Static(&record), token_source, options.explicit_tokens)
            .await
    }

    /// Hire at a station from a search result.
    ///
    /// Fails with [`CycleHireError::UnhirableStation`] before any request
    /// when the station has no dock address.
    pub async fn hire_searched(
        &mut self,
        station: &SearchedStationInfo,
        options: HireOptions,
    ) -> Result<HireOutcome, CycleHireError> {
        let token_source = options.token_source.or(self.default_static_key);
        self.hire_target(
            HireTarget::Searched(station),
            token_source,
            options.explicit_tokens,
        )
        .await
    }

    /// Hire at a station remembered from a recent search.
    pub async fn hire_by_station_id(
        &mut self,
        id: &StationId,
        options: HireOptions,
    ) -> Result<HireOutcome, CycleHireError> {
        let station = self
            .recent
            .get(id)
            .await
            .ok_or_else(|| CycleHireError::StationNotFound(id.clone()))?;
        self.hire_searched(&station, options).await
    }

    async fn hire_target(
        &mut self,
        target: HireTarget<'_>,
        token_source: Option<StaticLocationKey>,
        explicit_tokens: Option<(Encoding, ClientTime)>,
    ) -> Result<HireOutcome, CycleHireError> {
        let station = target.label().to_string();
        let address = target
            .address()
            .cloned()
            .ok_or_else(|| CycleHireError::UnhirableStation {
                name: station.clone(),
            })?;

        let explicit = explicit_tokens
            .map(|(encoding, client_time)| self.token_triple(encoding, client_time));

        let transport = &self.transport;
        let builder = &self.builder;
        let label = station.as_str();
        let attempt = move |tokens: TokenTriple| {
            let request = builder.build(target, &tokens);
            async move {
                let request = request?;
                debug!(
                    station = label,
                    terminal = request.address().terminal_name(),
                    "sending hire confirmation"
                );
                let body = transport.send(request.outbound()).await?;
                extract_release_code(body.as_str(), label)
            }
        };

        let Selected { value: code, tier, .. } = match explicit {
            Some(tokens) => self.selector.with_explicit(tokens, attempt).await?,
            None => self.selector.select(token_source, attempt).await?,
        };

        info!(station = %station, %tier, "release code obtained");
        Ok(HireOutcome {
            code,
            station,
            address,
            tier,
        })
    }
}
