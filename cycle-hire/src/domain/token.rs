//! Opaque credential values for the hire-confirmation endpoint.
//!
//! The upstream API wants three of these on every hire request. Nothing in
//! this crate can generate a valid `c3-encoding` or `c3-userauth`; they are
//! only ever reused. `c3-clienttime` is the one value that can be minted
//! locally (see [`ClientTime::from_datetime`]).

use std::fmt;

use chrono::{DateTime, Utc};

/// Characters of a secret value that are shown in logs and `Debug` output.
const REDACTED_PREFIX_LEN: usize = 8;

/// Error returned when constructing a token from an unusable string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {reason}")]
pub struct InvalidToken {
    kind: &'static str,
    reason: &'static str,
}

macro_rules! opaque_token {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw value. Only the empty string is rejected; the
            /// content is otherwise opaque.
            pub fn new(value: impl Into<String>) -> Result<Self, InvalidToken> {
                let value = value.into();
                if value.is_empty() {
                    return Err(InvalidToken {
                        kind: $kind,
                        reason: "cannot be empty",
                    });
                }
                Ok(Self(value))
            }

            /// Wrap a compiled-in value known to be non-empty.
            pub(crate) fn from_static(value: &'static str) -> Self {
                debug_assert!(!value.is_empty());
                Self(value.to_string())
            }

            /// Returns the raw value.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_token!(
    /// The `c3-encoding` header value.
    Encoding,
    "c3-encoding"
);

opaque_token!(
    /// The `c3-clienttime` form value: unix seconds with microsecond
    /// precision, e.g. `1748480905.359684`.
    ClientTime,
    "c3-clienttime"
);

opaque_token!(
    /// The `c3-userauth` form value.
    UserAuth,
    "c3-userauth"
);

impl Encoding {
    /// A short prefix of the value, safe to log.
    pub fn redacted(&self) -> String {
        redact(&self.0)
    }
}

impl UserAuth {
    /// A short prefix of the value, safe to log.
    pub fn redacted(&self) -> String {
        redact(&self.0)
    }
}

impl ClientTime {
    /// Format a timestamp the way the upstream app does.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        let micros = at.timestamp_subsec_micros().min(999_999);
        Self(format!("{}.{:06}", at.timestamp(), micros))
    }
}

impl fmt::Debug for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Encoding({})", self.redacted())
    }
}

impl fmt::Debug for UserAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserAuth({})", self.redacted())
    }
}

impl fmt::Debug for ClientTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientTime({})", self.0)
    }
}

impl fmt::Display for ClientTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn redact(value: &str) -> String {
    let mut chars = value.chars();
    let prefix: String = chars.by_ref().take(REDACTED_PREFIX_LEN).collect();
    if chars.next().is_some() {
        format!("{prefix}...")
    } else {
        prefix
    }
}

/// The three credential values one hire request carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTriple {
    pub encoding: Encoding,
    pub client_time: ClientTime,
    pub user_auth: UserAuth,
}

impl TokenTriple {
    /// Create a triple from its parts.
    pub fn new(encoding: Encoding, client_time: ClientTime, user_auth: UserAuth) -> Self {
        Self {
            encoding,
            client_time,
            user_auth,
        }
    }

    /// The same encoding and user auth paired with a different client time.
    pub fn with_client_time(self, client_time: ClientTime) -> Self {
        Self {
            client_time,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_values_rejected() {
        assert!(Encoding::new("").is_err());
        assert!(ClientTime::new("").is_err());
        assert!(UserAuth::new("").is_err());
        assert!(Encoding::new("x").is_ok());
    }

    #[test]
    fn error_display_names_the_field() {
        let err = Encoding::new("").unwrap_err();
        assert_eq!(err.to_string(), "invalid c3-encoding: cannot be empty");
    }

    #[test]
    fn client_time_has_six_fractional_digits() {
        let at = Utc.timestamp_opt(1_748_480_905, 359_684_000).unwrap();
        assert_eq!(ClientTime::from_datetime(at).as_str(), "1748480905.359684");

        let whole = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(ClientTime::from_datetime(whole).as_str(), "1700000000.000000");
    }

    #[test]
    fn debug_redacts_secrets() {
        let enc = Encoding::new("Kv6OJKA1JWRui1R+UltG2iCZBcb3").unwrap();
        assert_eq!(format!("{enc:?}"), "Encoding(Kv6OJKA1...)");

        let short = UserAuth::new("abc").unwrap();
        assert_eq!(format!("{short:?}"), "UserAuth(abc)");
    }

    #[test]
    fn with_client_time_keeps_encoding() {
        let triple = TokenTriple::new(
            Encoding::new("ENC1").unwrap(),
            ClientTime::new("CT1").unwrap(),
            UserAuth::new("UA").unwrap(),
        );
        let fresh = triple.clone().with_client_time(ClientTime::new("CT2").unwrap());

        assert_eq!(fresh.encoding, triple.encoding);
        assert_eq!(fresh.user_auth, triple.user_auth);
        assert_eq!(fresh.client_time.as_str(), "CT2");
    }
}
