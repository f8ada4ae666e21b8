//! The session's active token state.

use std::fmt;

use crate::domain::{ClientTime, Encoding, TokenTriple, UserAuth};
use crate::registry::StaticLocationKey;

/// Where the currently cached tokens came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Nothing cached yet.
    None,
    /// Copied from a static location's example tokens.
    StaticPrimed(StaticLocationKey),
    /// Last used unmodified from the cache.
    ReusedFull,
    /// Cached encoding last used with a freshly generated client time.
    ReusedFreshTime,
    /// Supplied by the caller.
    Explicit,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::None => f.write_str("none"),
            Provenance::StaticPrimed(key) => write!(f, "static-primed ({key})"),
            Provenance::ReusedFull => f.write_str("reused-full"),
            Provenance::ReusedFreshTime => f.write_str("reused-fresh-time"),
            Provenance::Explicit => f.write_str("explicit"),
        }
    }
}

/// Snapshot of the cached tokens.
///
/// Either a complete [`TokenTriple`] with a provenance, or empty with
/// [`Provenance::None`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTokenState {
    tokens: Option<TokenTriple>,
    provenance: Provenance,
}

impl ActiveTokenState {
    /// The empty state a session starts with.
    pub fn empty() -> Self {
        Self {
            tokens: None,
            provenance: Provenance::None,
        }
    }

    pub fn tokens(&self) -> Option<&TokenTriple> {
        self.tokens.as_ref()
    }

    pub fn encoding(&self) -> Option<&Encoding> {
        self.tokens.as_ref().map(|t| &t.encoding)
    }

    /// The client time cached alongside the encoding. After a fresh-time
    /// reuse this is the generated time, not the one originally captured.
    pub fn client_time(&self) -> Option<&ClientTime> {
        self.tokens.as_ref().map(|t| &t.client_time)
    }

    pub fn user_auth(&self) -> Option<&UserAuth> {
        self.tokens.as_ref().map(|t| &t.user_auth)
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_none()
    }
}

impl Default for ActiveTokenState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Holds the single [`ActiveTokenState`] of a session.
///
/// No locking and no validation: the cache is owned by one
/// [`TokenStrategySelector`](super::TokenStrategySelector), which is the
/// only writer.
#[derive(Debug, Default)]
pub struct TokenCache {
    state: ActiveTokenState,
}

impl TokenCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &ActiveTokenState {
        &self.state
    }

    /// Replace the cached state wholesale.
    ///
    /// `Provenance::None` describes the empty state only; passing it here
    /// records the tokens as [`Provenance::Explicit`].
    pub fn set(&mut self, tokens: TokenTriple, provenance: Provenance) {
        let provenance = match provenance {
            Provenance::None => Provenance::Explicit,
            other => other,
        };
        self.state = ActiveTokenState {
            tokens: Some(tokens),
            provenance,
        };
    }

    /// True iff an encoding is cached.
    pub fn has_active(&self) -> bool {
        self.state.encoding().is_some()
    }

    /// Forget the cached tokens.
    pub fn clear(&mut self) {
        self.state = ActiveTokenState::empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(enc: &str, ct: &str) -> TokenTriple {
        TokenTriple::new(
            Encoding::new(enc).unwrap(),
            ClientTime::new(ct).unwrap(),
            UserAuth::new("UA").unwrap(),
        )
    }

    #[test]
    fn starts_empty() {
        let cache = TokenCache::new();
        assert!(!cache.has_active());
        assert!(cache.get().is_empty());
        assert_eq!(cache.get().provenance(), Provenance::None);
        assert_eq!(cache.get().encoding(), None);
        assert_eq!(cache.get().client_time(), None);
    }

    #[test]
    fn set_overwrites() {
        let mut cache = TokenCache::new();
        cache.set(
            triple("ENC1", "CT1"),
            Provenance::StaticPrimed(StaticLocationKey::CromerStreet),
        );
        assert!(cache.has_active());
        assert_eq!(cache.get().encoding().unwrap().as_str(), "ENC1");

        cache.set(triple("ENC2", "CT2"), Provenance::ReusedFreshTime);
        assert_eq!(cache.get().encoding().unwrap().as_str(), "ENC2");
        assert_eq!(cache.get().client_time().unwrap().as_str(), "CT2");
        assert_eq!(cache.get().provenance(), Provenance::ReusedFreshTime);
    }

    #[test]
    fn none_provenance_with_tokens_is_explicit() {
        let mut cache = TokenCache::new();
        cache.set(triple("ENC1", "CT1"), Provenance::None);
        assert_eq!(cache.get().provenance(), Provenance::Explicit);
    }

    #[test]
    fn clear_resets() {
        let mut cache = TokenCache::new();
        cache.set(triple("ENC1", "CT1"), Provenance::Explicit);
        cache.clear();
        assert!(!cache.has_active());
        assert_eq!(cache.get(), &ActiveTokenState::empty());
    }

    #[test]
    fn provenance_display() {
        assert_eq!(Provenance::None.to_string(), "none");
        assert_eq!(
            Provenance::StaticPrimed(StaticLocationKey::CromerStreet).to_string(),
            "static-primed (cromer_street)"
        );
        assert_eq!(Provenance::ReusedFreshTime.to_string(), "reused-fresh-time");
    }
}
