//! Upstream response DTOs.
//!
//! Both endpoints answer with a JSON "page" whose `Children` array holds UI
//! nodes (links, images, labels). Fields are optional throughout because the
//! upstream omits whatever a node does not display.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// Error for a body that is not a page envelope at all.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("body is not JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("body is not a JSON object")]
    NotAnObject,

    #[error("Children is not an array")]
    ChildrenNotArray,
}

/// One UI node of a page.
///
/// Each field is read on its own: a field of an unexpected JSON type is
/// treated as absent and does not cost the node its other fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeDto {
    /// Node identifier, e.g. `lchs_searchresult_300205_link`.
    #[serde(rename = "ID", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    /// Node kind, e.g. `Node.Link` or `Node.Media.Image`.
    #[serde(rename = "Type", default, deserialize_with = "lenient_string")]
    pub node_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub subtitle: Option<String>,

    /// Free-form metadata. Values are usually strings.
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Option<HashMap<String, Value>>,
}

/// A string field; any other JSON type reads as `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// An object field; any other JSON type reads as `None`.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Option<HashMap<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => Some(map.into_iter().collect()),
        _ => None,
    })
}

impl NodeDto {
    /// A tag's value, if it is a non-empty string.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .as_ref()?
            .get(key)?
            .as_str()
            .filter(|s| !s.is_empty())
    }

    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    pub fn is_type(&self, node_type: &str) -> bool {
        self.node_type.as_deref() == Some(node_type)
    }
}

/// Decode the `Children` of a page.
///
/// A missing `Children` is an empty page. Children that are not JSON
/// objects are skipped; only a broken envelope is an error.
pub fn decode_children(body: &str) -> Result<Vec<NodeDto>, EnvelopeError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Object(mut page) = value else {
        return Err(EnvelopeError::NotAnObject);
    };

    let children = match page.remove("Children") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(children)) => children,
        Some(_) => return Err(EnvelopeError::ChildrenNotArray),
    };

    let nodes = children
        .into_iter()
        .enumerate()
        .filter_map(|(index, child)| match serde_json::from_value::<NodeDto>(child) {
            Ok(node) => Some(node),
            Err(e) => {
                debug!(index, error = %e, "skipping undecodable node");
                None
            }
        })
        .collect();

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nodes() {
        let body = r#"{
            "Children": [
                {
                    "ID": "lchs_searchresult_1_link",
                    "Type": "Node.Link",
                    "Name": "Soho Square, Soho",
                    "Subtitle": "5 bikes",
                    "Tags": {"LCHS.StationID": "1", "Count": 3}
                }
            ]
        }"#;

        let nodes = decode_children(body).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id(), "lchs_searchresult_1_link");
        assert!(nodes[0].is_type("Node.Link"));
        assert_eq!(nodes[0].tag("LCHS.StationID"), Some("1"));
        assert_eq!(nodes[0].tag("Count"), None);
        assert_eq!(nodes[0].tag("Missing"), None);
    }

    #[test]
    fn missing_or_null_children_is_empty() {
        assert!(decode_children(r#"{"Name": "Search"}"#).unwrap().is_empty());
        assert!(decode_children(r#"{"Children": null}"#).unwrap().is_empty());
    }

    #[test]
    fn non_object_children_skipped() {
        let body = r#"{"Children": [42, {"ID": "ok"}, "text", null]}"#;
        let nodes = decode_children(body).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id(), "ok");
    }

    #[test]
    fn mistyped_fields_read_as_absent() {
        let body = r#"{"Children": [
            {"ID": 7, "Type": "Node.Link", "Name": "Dock", "Subtitle": 3, "Tags": ["x"]},
            {"ID": "img", "Name": ["Hire now"], "Tags": {"Terminal": "000005"}}
        ]}"#;

        let nodes = decode_children(body).unwrap();
        assert_eq!(nodes.len(), 2);

        assert_eq!(nodes[0].id(), "");
        assert!(nodes[0].is_type("Node.Link"));
        assert_eq!(nodes[0].name.as_deref(), Some("Dock"));
        assert_eq!(nodes[0].subtitle, None);
        assert!(nodes[0].tags.is_none());

        assert_eq!(nodes[1].name, None);
        assert_eq!(nodes[1].tag("Terminal"), Some("000005"));
    }

    #[test]
    fn broken_envelopes_rejected() {
        assert!(matches!(
            decode_children("<html>"),
            Err(EnvelopeError::NotJson(_))
        ));
        assert!(matches!(
            decode_children("[1, 2]"),
            Err(EnvelopeError::NotAnObject)
        ));
        assert!(matches!(
            decode_children(r#"{"Children": {"a": 1}}"#),
            Err(EnvelopeError::ChildrenNotArray)
        ));
    }

    #[test]
    fn null_tags_tolerated() {
        let nodes = decode_children(r#"{"Children": [{"ID": "x", "Tags": null}]}"#).unwrap();
        assert_eq!(nodes[0].tag("Terminal"), None);
    }
}
