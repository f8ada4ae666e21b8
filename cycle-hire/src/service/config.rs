//! Session configuration.

use std::time::Duration;

use crate::corethree::{DEFAULT_USER_AUTH, DeviceProfile};
use crate::domain::{InvalidToken, UserAuth};
use crate::registry::{StaticLocationKey, StaticLocationRegistry};
use crate::tokens::StrategyPolicy;

/// Configuration for the recent search results cache.
#[derive(Debug, Clone)]
pub struct SearchCacheConfig {
    /// How long a search result stays hirable by id.
    pub ttl: Duration,

    /// Maximum number of remembered stations.
    pub max_capacity: u64,
}

impl Default for SearchCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 500,
        }
    }
}

/// Configuration for a [`CycleHireSession`](super::CycleHireSession).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// `c3-userauth` sent with manually set tokens.
    pub user_auth: UserAuth,

    /// Constant device fields sent with every request.
    pub profile: DeviceProfile,

    pub policy: StrategyPolicy,

    pub search_cache: SearchCacheConfig,

    /// Static locations available for priming and fallback.
    pub registry: StaticLocationRegistry,

    /// Fallback token source for searches and searched-station hires when
    /// the caller names none.
    pub default_static_key: Option<StaticLocationKey>,
}

impl SessionConfig {
    /// Create a config for the given user auth with defaults elsewhere.
    pub fn new(user_auth: &str) -> Result<Self, InvalidToken> {
        Ok(Self {
            user_auth: UserAuth::new(user_auth)?,
            ..Self::default()
        })
    }

    pub fn with_profile(mut self, profile: DeviceProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_policy(mut self, policy: StrategyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_search_cache(mut self, search_cache: SearchCacheConfig) -> Self {
        self.search_cache = search_cache;
        self
    }

    pub fn with_registry(mut self, registry: StaticLocationRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_default_static_key(mut self, key: StaticLocationKey) -> Self {
        self.default_static_key = Some(key);
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_auth: UserAuth::from_static(DEFAULT_USER_AUTH),
            profile: DeviceProfile::default(),
            policy: StrategyPolicy::default(),
            search_cache: SearchCacheConfig::default(),
            registry: StaticLocationRegistry::builtin(),
            default_static_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.user_auth.as_str(), DEFAULT_USER_AUTH);
        assert_eq!(config.search_cache.ttl, Duration::from_secs(600));
        assert_eq!(config.search_cache.max_capacity, 500);
        assert_eq!(config.registry.len(), 3);
        assert_eq!(config.default_static_key, None);
        assert!(config.policy.allow_fallback);
    }

    #[test]
    fn new_rejects_empty_user_auth() {
        assert!(SessionConfig::new("").is_err());

        let config = SessionConfig::new("abc|def")
            .unwrap()
            .with_default_static_key(StaticLocationKey::CromerStreet);
        assert_eq!(config.user_auth.as_str(), "abc|def");
        assert_eq!(config.default_static_key, Some(StaticLocationKey::CromerStreet));
    }

    #[test]
    fn builders_replace_fields() {
        let config = SessionConfig::default().with_search_cache(SearchCacheConfig {
            ttl: Duration::from_secs(30),
            max_capacity: 10,
        });
        assert_eq!(config.search_cache.ttl, Duration::from_secs(30));
        assert_eq!(config.search_cache.max_capacity, 10);
    }
}
