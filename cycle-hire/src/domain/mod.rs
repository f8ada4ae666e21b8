//! Domain types for the cycle hire client.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod station;
mod token;

pub use station::{
    DockAddress, InvalidDockAddress, InvalidStationId, ReleaseCode, SearchedStationInfo, StationId,
};
pub use token::{ClientTime, Encoding, InvalidToken, TokenTriple, UserAuth};
