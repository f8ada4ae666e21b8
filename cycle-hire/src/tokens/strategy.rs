//! Token fallback chain.
//!
//! For an action that needs credentials, candidates are tried in a fixed
//! order, cheapest and most recent first:
//!
//! 1. [`Tier::FullReuse`] - the cached triple exactly as cached.
//! 2. [`Tier::FreshTime`] - the cached encoding with a newly generated
//!    client time.
//! 3. [`Tier::StaticFallback`] - the example triple of a caller-named
//!    static location.
//!
//! The order relies on the upstream accepting tokens that are neither bound
//! to a station nor single-use. That was true of the live API when it was
//! observed and is not a protocol guarantee, so the chain is a heuristic.
//!
//! Only a successful attempt writes the cache. A failed tier falls through
//! to the next one only when [`StrategyPolicy::allow_fallback`] is set.

use std::fmt;
use std::future::Future;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::{ClientTime, TokenTriple};
use crate::error::CycleHireError;
use crate::registry::{StaticLocationKey, StaticLocationRegistry, UnknownLocation};

use super::cache::{ActiveTokenState, Provenance, TokenCache};

/// Source of "now" for fresh client times.
pub type Clock = fn() -> DateTime<Utc>;

/// Caller policy for the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyPolicy {
    /// Move on to the next tier when an attempt fails.
    pub allow_fallback: bool,
    /// Skip full reuse and start from the fresh-time tier.
    pub prefer_fresh_time: bool,
}

impl StrategyPolicy {
    /// Create a policy with explicit settings.
    pub fn new(allow_fallback: bool, prefer_fresh_time: bool) -> Self {
        Self {
            allow_fallback,
            prefer_fresh_time,
        }
    }

    pub fn with_allow_fallback(mut self, allow: bool) -> Self {
        self.allow_fallback = allow;
        self
    }

    pub fn with_prefer_fresh_time(mut self, prefer: bool) -> Self {
        self.prefer_fresh_time = prefer;
        self
    }
}

impl Default for StrategyPolicy {
    fn default() -> Self {
        Self {
            allow_fallback: true,
            prefer_fresh_time: false,
        }
    }
}

/// Which token source an attempt used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Caller-supplied tokens, outside the chain.
    Explicit,
    FullReuse,
    FreshTime,
    StaticFallback(StaticLocationKey),
}

impl Tier {
    /// Provenance recorded when an attempt on this tier succeeds.
    fn provenance(self) -> Provenance {
        match self {
            Tier::Explicit => Provenance::Explicit,
            Tier::FullReuse => Provenance::ReusedFull,
            Tier::FreshTime => Provenance::ReusedFreshTime,
            Tier::StaticFallback(key) => Provenance::StaticPrimed(key),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Explicit => f.write_str("explicit"),
            Tier::FullReuse => f.write_str("full reuse"),
            Tier::FreshTime => f.write_str("fresh-time reuse"),
            Tier::StaticFallback(key) => write!(f, "static fallback ({key})"),
        }
    }
}

/// Result of a successful attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected<T> {
    pub value: T,
    pub tier: Tier,
    /// The tokens the successful attempt sent.
    pub tokens: TokenTriple,
}

/// Orchestrates the fallback chain and owns the session's [`TokenCache`].
#[derive(Debug)]
pub struct TokenStrategySelector {
    cache: TokenCache,
    registry: StaticLocationRegistry,
    policy: StrategyPolicy,
    clock: Clock,
}

impl TokenStrategySelector {
    /// Create a selector with an empty cache.
    pub fn new(registry: StaticLocationRegistry, policy: StrategyPolicy) -> Self {
        Self {
            cache: TokenCache::new(),
            registry,
            policy,
            clock: Utc::now,
        }
    }

    /// Use a different clock for fresh client times (for testing).
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn active_tokens(&self) -> &ActiveTokenState {
        self.cache.get()
    }

    pub fn registry(&self) -> &StaticLocationRegistry {
        &self.registry
    }

    pub fn policy(&self) -> StrategyPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: StrategyPolicy) {
        self.policy = policy;
    }

    /// Seed the cache from a static location without attempting anything.
    pub fn prime_tokens_from_static_location(
        &mut self,
        key: StaticLocationKey,
    ) -> Result<(), UnknownLocation> {
        let record = self.registry.lookup(key)?;
        self.cache
            .set(record.tokens().clone(), Provenance::StaticPrimed(key));
        info!(location = %key, "primed active tokens from static location");
        Ok(())
    }

    /// Replace the cached tokens with caller-supplied ones.
    pub fn set_explicit(&mut self, tokens: TokenTriple) {
        debug!(
            encoding = %tokens.encoding.redacted(),
            user_auth = %tokens.user_auth.redacted(),
            "active tokens set explicitly"
        );
        self.cache.set(tokens, Provenance::Explicit);
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        info!("active tokens cleared");
    }

    /// Run `attempt` through the fallback chain.
    ///
    /// `static_key` names the location whose example tokens are the last
    /// resort. It is resolved before anything is attempted, so an unknown
    /// key fails without calling `attempt`.
    ///
    /// Returns [`CycleHireError::TokenUnavailable`] without calling
    /// `attempt` when nothing is cached and no key is given. When every
    /// tier fails, the last tier's error is returned unchanged.
    pub async fn select<T, F, Fut>(
        &mut self,
        static_key: Option<StaticLocationKey>,
        mut attempt: F,
    ) -> Result<Selected<T>, CycleHireError>
    where
        F: FnMut(TokenTriple) -> Fut,
        Fut: Future<Output = Result<T, CycleHireError>>,
    {
        let mut plan: Vec<(Tier, TokenTriple)> = Vec::with_capacity(3);

        if let Some(active) = self.cache.get().tokens() {
            if !self.policy.prefer_fresh_time {
                plan.push((Tier::FullReuse, active.clone()));
            }
            plan.push((Tier::FreshTime, active.clone()));
        }
        if let Some(key) = static_key {
            let record = self.registry.lookup(key)?;
            plan.push((Tier::StaticFallback(key), record.tokens().clone()));
        }

        if plan.is_empty() {
            info!("no token tier applies");
            return Err(CycleHireError::TokenUnavailable);
        }

        let mut last_error = None;
        for (tier, tokens) in plan {
            let tokens = match tier {
                Tier::FreshTime => tokens.with_client_time(self.fresh_client_time()),
                _ => tokens,
            };

            match attempt_tier(tier, tokens, &mut attempt).await {
                Ok(selected) => {
                    self.cache
                        .set(selected.tokens.clone(), tier.provenance());
                    info!(%tier, "token tier succeeded");
                    return Ok(selected);
                }
                Err(err) if self.policy.allow_fallback => {
                    warn!(%tier, error = %err, "token tier failed, falling back");
                    last_error = Some(err);
                }
                Err(err) => {
                    warn!(%tier, error = %err, "token tier failed, fallback disabled");
                    return Err(err);
                }
            }
        }

        Err(last_error.unwrap_or(CycleHireError::TokenUnavailable))
    }

    /// Make a single attempt with caller-supplied tokens.
    ///
    /// No fallback on failure. On success the tokens become the cached
    /// state with [`Provenance::Explicit`].
    pub async fn with_explicit<T, F, Fut>(
        &mut self,
        tokens: TokenTriple,
        mut attempt: F,
    ) -> Result<Selected<T>, CycleHireError>
    where
        F: FnMut(TokenTriple) -> Fut,
        Fut: Future<Output = Result<T, CycleHireError>>,
    {
        match attempt_tier(Tier::Explicit, tokens, &mut attempt).await {
            Ok(selected) => {
                self.cache
                    .set(selected.tokens.clone(), Provenance::Explicit);
                Ok(selected)
            }
            Err(err) => {
                warn!(error = %err, "explicit tokens failed");
                Err(err)
            }
        }
    }

    fn fresh_client_time(&self) -> ClientTime {
        ClientTime::from_datetime((self.clock)())
    }
}

async fn attempt_tier<T, F, Fut>(
    tier: Tier,
    tokens: TokenTriple,
    attempt: &mut F,
) -> Result<Selected<T>, CycleHireError>
where
    F: FnMut(TokenTriple) -> Fut,
    Fut: Future<Output = Result<T, CycleHireError>>,
{
    debug!(
        %tier,
        encoding = %tokens.encoding.redacted(),
        client_time = %tokens.client_time,
        "attempting token tier"
    );
    let value = attempt(tokens.clone()).await?;
    Ok(Selected {
        value,
        tier,
        tokens,
    })
}
