//! Client for the London cycle hire app's undocumented API.
//!
//! Searches docking stations and obtains bike release codes. Requests need
//! opaque tokens captured from the official app; the crate manages their
//! reuse across calls with a fallback chain (see [`tokens`]).

pub mod corethree;
pub mod domain;
pub mod error;
pub mod registry;
pub mod service;
pub mod tokens;
pub mod transport;

pub use error::CycleHireError;
pub use registry::{StaticLocationKey, StaticLocationRegistry};
pub use service::{CycleHireSession, HireOptions, HireOutcome, SearchOptions, SessionConfig};
