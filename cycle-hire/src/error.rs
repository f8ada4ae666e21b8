//! Error taxonomy of the cycle hire client.
//!
//! Every variant is a terminal failure of the call in progress. Nothing
//! here is retried by the crate itself.

use crate::domain::StationId;
use crate::registry::UnknownLocation;
use crate::transport::TransportError;

/// Errors returned by the session, the strategy selector and the request
/// builders.
#[derive(Debug, thiserror::Error)]
pub enum CycleHireError {
    /// A static location key is not in the registry.
    #[error(transparent)]
    UnknownLocation(#[from] UnknownLocation),

    /// No token source applies: nothing cached and no static key given.
    #[error("no tokens available: prime the session or supply a static location")]
    TokenUnavailable,

    /// The target has no terminal/point address.
    #[error("station {name} is not hirable: no terminal/point address")]
    UnhirableStation { name: String },

    /// The search response envelope is not the expected structure.
    #[error("malformed search response: {message}")]
    SearchResponseMalformed { message: String },

    /// The transport succeeded but the response carried no release code.
    #[error("no release code in response for {station}")]
    NoCodeInResponse { station: String },

    /// A station id is not among the recent search results.
    #[error("station {0} not found in recent search results")]
    StationNotFound(StationId),

    /// The transport collaborator failed; carried through unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CycleHireError::TokenUnavailable;
        assert_eq!(
            err.to_string(),
            "no tokens available: prime the session or supply a static location"
        );

        let err = CycleHireError::UnhirableStation {
            name: "Soho Square, Soho".into(),
        };
        assert_eq!(
            err.to_string(),
            "station Soho Square, Soho is not hirable: no terminal/point address"
        );

        let err = CycleHireError::NoCodeInResponse {
            station: "Cromer Street, Bloomsbury".into(),
        };
        assert!(err.to_string().contains("Cromer Street"));

        let err = CycleHireError::Transport(TransportError::Status {
            status: 502,
            body: "Bad Gateway".into(),
        });
        assert_eq!(err.to_string(), "HTTP status 502: Bad Gateway");
    }
}
