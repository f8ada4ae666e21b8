//! The session facade: search for docks and hire bikes.
//!
//! A [`CycleHireSession`] owns a transport, the token strategy selector and
//! the recent search results. Every method that can touch the token state
//! takes `&mut self`, so one session never interleaves two token decisions.
//! Use [`CycleHireSession::into_shared`] to drive one session from several
//! tasks.

mod config;
mod hire;
mod recent;
mod search;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::corethree::{ReleaseCodeRequestBuilder, StationSearchParser};
use crate::domain::{ClientTime, Encoding, SearchedStationInfo, StationId, TokenTriple, UserAuth};
use crate::error::CycleHireError;
use crate::registry::{StaticLocationKey, StaticLocationRegistry};
use crate::tokens::{ActiveTokenState, Clock, StrategyPolicy, TokenStrategySelector};
use crate::transport::Transport;

pub use config::{SearchCacheConfig, SessionConfig};
pub use hire::{HireOptions, HireOutcome};
pub use recent::RecentStations;
pub use search::SearchOptions;

/// A session shared between tasks.
pub type SharedSession<T> = Arc<Mutex<CycleHireSession<T>>>;

/// One logical user of the cycle hire API.
#[derive(Debug)]
pub struct CycleHireSession<T> {
    transport: T,
    selector: TokenStrategySelector,
    builder: ReleaseCodeRequestBuilder,
    parser: StationSearchParser,
    recent: RecentStations,
    user_auth: UserAuth,
    default_static_key: Option<StaticLocationKey>,
}

impl<T: Transport> CycleHireSession<T> {
    /// Create a session with empty token state.
    pub fn new(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            selector: TokenStrategySelector::new(config.registry, config.policy),
            builder: ReleaseCodeRequestBuilder::new(config.profile),
            parser: StationSearchParser::new(),
            recent: RecentStations::new(&config.search_cache),
            user_auth: config.user_auth,
            default_static_key: config.default_static_key,
        }
    }

    /// Use a different clock for fresh client times (for testing).
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.selector = self.selector.with_clock(clock);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn registry(&self) -> &StaticLocationRegistry {
        self.selector.registry()
    }

    pub fn policy(&self) -> StrategyPolicy {
        self.selector.policy()
    }

    pub fn set_policy(&mut self, policy: StrategyPolicy) {
        self.selector.set_policy(policy);
    }

    /// Read-only view of the cached tokens.
    pub fn active_tokens(&self) -> &ActiveTokenState {
        self.selector.active_tokens()
    }

    /// Seed the token state from a static location's example tokens.
    pub fn prime_tokens_from_static_location(
        &mut self,
        key: StaticLocationKey,
    ) -> Result<(), CycleHireError> {
        self.selector.prime_tokens_from_static_location(key)?;
        Ok(())
    }

    /// Replace the cached tokens with a captured encoding and client time.
    ///
    /// The session's own user auth completes the triple.
    pub fn set_active_tokens(&mut self, encoding: Encoding, client_time: ClientTime) {
        let tokens = self.token_triple(encoding, client_time);
        self.selector.set_explicit(tokens);
    }

    pub fn clear_active_tokens(&mut self) {
        self.selector.clear();
    }

    /// A station from a recent search, if it has not expired.
    pub async fn recent_station(&self, id: &StationId) -> Option<SearchedStationInfo> {
        self.recent.get(id).await
    }

    /// Wrap the session for use from several tasks.
    ///
    /// The mutex is held for a whole call, covering the read, the attempts
    /// and the cache update.
    pub fn into_shared(self) -> SharedSession<T> {
        info!("session shared");
        Arc::new(Mutex::new(self))
    }

    fn token_triple(&self, encoding: Encoding, client_time: ClientTime) -> TokenTriple {
        TokenTriple::new(encoding, client_time, self.user_auth.clone())
    }
}
