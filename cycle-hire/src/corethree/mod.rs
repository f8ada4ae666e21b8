//! The CoreThree wire protocol behind the cycle hire app.
//!
//! Requests are form POSTs replaying what the iOS app sends; responses are
//! JSON pages of UI nodes. This module builds the former and reads the
//! latter. It performs no IO itself.

mod profile;
mod release;
mod request;
mod search;
mod types;

pub use profile::{DEFAULT_DEVICE_ID, DEFAULT_USER_AUTH, DeviceProfile};
pub use release::extract_release_code;
pub use request::{HireTarget, ReleaseCodeRequest, ReleaseCodeRequestBuilder, build_search_request};
pub use search::{ParsedSearch, SkippedRecord, StationSearchParser};
pub use types::{EnvelopeError, NodeDto, decode_children};
