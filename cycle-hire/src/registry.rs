//! Static example locations.
//!
//! A fixed table of docking stations captured together with the credential
//! values the upstream app sent when hiring there. Each record doubles as a
//! hire target and as the token source of last resort.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::corethree::{DEFAULT_DEVICE_ID, DEFAULT_USER_AUTH};
use crate::domain::{ClientTime, DockAddress, Encoding, TokenTriple, UserAuth};

/// Error returned for a location key that is not in the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown static location: {key}")]
pub struct UnknownLocation {
    key: String,
}

impl UnknownLocation {
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Key of a built-in example location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticLocationKey {
    CromerStreet,
    TavitonStreet,
    WarrenStreetStation,
}

impl StaticLocationKey {
    /// Every key, in table order.
    pub const ALL: [StaticLocationKey; 3] = [
        StaticLocationKey::CromerStreet,
        StaticLocationKey::TavitonStreet,
        StaticLocationKey::WarrenStreetStation,
    ];

    /// The snake_case name used in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            StaticLocationKey::CromerStreet => "cromer_street",
            StaticLocationKey::TavitonStreet => "taviton_street",
            StaticLocationKey::WarrenStreetStation => "warren_street_station",
        }
    }
}

impl fmt::Display for StaticLocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaticLocationKey {
    type Err = UnknownLocation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StaticLocationKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownLocation { key: s.to_string() })
    }
}

/// One example location with its captured tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticLocationRecord {
    key: StaticLocationKey,
    address: DockAddress,
    tokens: TokenTriple,
    device_id: String,
}

impl StaticLocationRecord {
    /// Create a record.
    pub fn new(
        key: StaticLocationKey,
        address: DockAddress,
        tokens: TokenTriple,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            key,
            address,
            tokens,
            device_id: device_id.into(),
        }
    }

    pub fn key(&self) -> StaticLocationKey {
        self.key
    }

    pub fn address(&self) -> &DockAddress {
        &self.address
    }

    /// The example `(c3-encoding, c3-clienttime, c3-userauth)` captured here.
    pub fn tokens(&self) -> &TokenTriple {
        &self.tokens
    }

    /// The `c3-deviceid` the tokens were captured with.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }
}

/// (key, terminal, point, c3-encoding, c3-clienttime)
const BUILTIN_LOCATIONS: [(
    StaticLocationKey,
    &str,
    &str,
    &str,
    &str,
); 3] = [
    (
        StaticLocationKey::CromerStreet,
        "300205",
        "Cromer Street, Bloomsbury",
        "Kv6OJKA1JWRui1R+UltG2iCZBcb3+EMMfBu5aAhZNEXnA3QTJHKcKBLT+Hd097N5",
        "1748480905.359684",
    ),
    (
        StaticLocationKey::TavitonStreet,
        "001009",
        "Taviton Street, Bloomsbury",
        "hjQd5cl1SN7BOdmflRPMZwu1UnranBQaYc1W+u/ofJSmJa24Ca9fbkVYjg5SZ+Lg",
        "1748481522.599196",
    ),
    (
        StaticLocationKey::WarrenStreetStation,
        "001090",
        "Warren Street Station, Euston",
        "Af1F2GlMLbIbykRF6YQQbhJQxCWXYsXyOdUx4M2KxIAvFtrFbaK3CmUhY1dwxDa0",
        "1748481544.979739",
    ),
];

/// Immutable lookup table of static locations.
///
/// Built once and never mutated, so it can be shared freely.
#[derive(Debug, Clone)]
pub struct StaticLocationRegistry {
    records: HashMap<StaticLocationKey, StaticLocationRecord>,
}

impl StaticLocationRegistry {
    /// Build a registry from arbitrary records. A later record for the same
    /// key replaces an earlier one.
    pub fn new(records: impl IntoIterator<Item = StaticLocationRecord>) -> Self {
        let records = records.into_iter().map(|r| (r.key, r)).collect();
        Self { records }
    }

    /// The registry of captured example locations.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_LOCATIONS.iter().map(
            |&(key, terminal, point, encoding, client_time)| {
                StaticLocationRecord::new(
                    key,
                    DockAddress::from_static(terminal, point),
                    TokenTriple::new(
                        Encoding::from_static(encoding),
                        ClientTime::from_static(client_time),
                        UserAuth::from_static(DEFAULT_USER_AUTH),
                    ),
                    DEFAULT_DEVICE_ID,
                )
            },
        ))
    }

    /// Replace the user auth in every record's captured tokens.
    ///
    /// The captured encodings and client times stay as they are.
    pub fn with_user_auth(mut self, user_auth: &UserAuth) -> Self {
        for record in self.records.values_mut() {
            record.tokens.user_auth = user_auth.clone();
        }
        self
    }

    /// Look up a record by key.
    pub fn lookup(&self, key: StaticLocationKey) -> Result<&StaticLocationRecord, UnknownLocation> {
        self.records.get(&key).ok_or_else(|| UnknownLocation {
            key: key.as_str().to_string(),
        })
    }

    /// Keys present in this registry, in table order.
    pub fn keys(&self) -> impl Iterator<Item = StaticLocationKey> + '_ {
        StaticLocationKey::ALL
            .into_iter()
            .filter(|key| self.records.contains_key(key))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for StaticLocationRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_every_key() {
        let registry = StaticLocationRegistry::builtin();
        assert_eq!(registry.len(), 3);
        for key in StaticLocationKey::ALL {
            let record = registry.lookup(key).unwrap();
            assert_eq!(record.key(), key);
            assert_eq!(record.device_id(), DEFAULT_DEVICE_ID);
        }
    }

    #[test]
    fn builtin_cromer_street() {
        let registry = StaticLocationRegistry::builtin();
        let record = registry.lookup(StaticLocationKey::CromerStreet).unwrap();

        assert_eq!(record.address().terminal_name(), "300205");
        assert_eq!(record.address().point_name(), "Cromer Street, Bloomsbury");
        assert_eq!(record.tokens().client_time.as_str(), "1748480905.359684");
        assert!(record.tokens().encoding.as_str().starts_with("Kv6OJKA1"));
        assert_eq!(record.tokens().user_auth.as_str(), DEFAULT_USER_AUTH);
    }

    #[test]
    fn user_auth_is_replaced_everywhere() {
        let user_auth = UserAuth::new("mine|1234").unwrap();
        let registry = StaticLocationRegistry::builtin().with_user_auth(&user_auth);
        let builtin = StaticLocationRegistry::builtin();

        for key in StaticLocationKey::ALL {
            let record = registry.lookup(key).unwrap();
            let original = builtin.lookup(key).unwrap();
            assert_eq!(record.tokens().user_auth.as_str(), "mine|1234");
            assert_eq!(record.tokens().encoding, original.tokens().encoding);
            assert_eq!(record.tokens().client_time, original.tokens().client_time);
            assert_eq!(record.address(), original.address());
        }
    }

    #[test]
    fn lookup_missing_key_fails() {
        let registry = StaticLocationRegistry::new([]);
        let err = registry.lookup(StaticLocationKey::TavitonStreet).unwrap_err();
        assert_eq!(err.key(), "taviton_street");
        assert_eq!(err.to_string(), "unknown static location: taviton_street");
        assert!(registry.is_empty());
    }

    #[test]
    fn key_parse_roundtrip() {
        for key in StaticLocationKey::ALL {
            assert_eq!(key.as_str().parse::<StaticLocationKey>().unwrap(), key);
        }
        assert_eq!(
            "WarrenStreet".parse::<StaticLocationKey>().unwrap_err().key(),
            "WarrenStreet"
        );
    }

    #[test]
    fn keys_follow_table_order() {
        let registry = StaticLocationRegistry::builtin();
        let keys: Vec<_> = registry.keys().collect();
        assert_eq!(keys, StaticLocationKey::ALL.to_vec());
    }
}
