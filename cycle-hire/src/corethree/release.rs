//! Release code extraction from a hire-confirmation response.

use tracing::debug;

use crate::domain::ReleaseCode;
use crate::error::CycleHireError;

use super::types::{NodeDto, decode_children};

const RELEASE_CODE_LABEL: &str = "Your cycle hire release code:";
const UNLOCK_BAR_SUFFIX: &str = "_unlockbar";
const UNLOCK_BAR_PHRASE: &str = "Release code ";

/// The digits following the first `"Release code "` that has any.
fn code_in_unlock_bar(name: &str) -> Option<&str> {
    name.match_indices(UNLOCK_BAR_PHRASE).find_map(|(start, phrase)| {
        let rest = &name[start + phrase.len()..];
        let len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        (len > 0).then(|| &rest[..len])
    })
}

fn labelled_code(node: &NodeDto) -> Option<&str> {
    if node.name.as_deref() != Some(RELEASE_CODE_LABEL) {
        return None;
    }
    node.subtitle.as_deref().filter(|s| !s.is_empty())
}

fn unlock_bar_code(node: &NodeDto) -> Option<&str> {
    if !node.id().ends_with(UNLOCK_BAR_SUFFIX) {
        return None;
    }
    code_in_unlock_bar(node.name.as_deref()?)
}

/// Find the release code in a `HandleEventWithNode` response body.
///
/// The labelled node wins over the unlock bar wherever each appears.
/// `station` only names the target in the error.
pub fn extract_release_code(body: &str, station: &str) -> Result<ReleaseCode, CycleHireError> {
    let not_found = || CycleHireError::NoCodeInResponse {
        station: station.to_string(),
    };

    let nodes = match decode_children(body) {
        Ok(nodes) => nodes,
        Err(e) => {
            debug!(station, error = %e, "hire response is not a page");
            return Err(not_found());
        }
    };

    nodes
        .iter()
        .find_map(labelled_code)
        .or_else(|| nodes.iter().find_map(unlock_bar_code))
        .map(ReleaseCode::new)
        .ok_or_else(not_found)
}
