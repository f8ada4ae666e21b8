//! Request construction for the hire and search endpoints.
//!
//! Builders are pure: the same inputs always give the same request. The
//! fresh client time of the fresh-time tier is generated by the strategy
//! selector and arrives here inside the [`TokenTriple`].

use crate::domain::{DockAddress, SearchedStationInfo, TokenTriple};
use crate::error::CycleHireError;
use crate::registry::StaticLocationRecord;
use crate::transport::{Endpoint, OutboundRequest};

use super::profile::DeviceProfile;

/// What a hire request can be aimed at.
#[derive(Debug, Clone, Copy)]
pub enum HireTarget<'a> {
    Static(&'a StaticLocationRecord),
    Searched(&'a SearchedStationInfo),
}

impl<'a> HireTarget<'a> {
    /// The dock address, if the target has one.
    pub fn address(&self) -> Option<&'a DockAddress> {
        match self {
            HireTarget::Static(record) => Some(record.address()),
            HireTarget::Searched(station) => station.address(),
        }
    }

    /// Human-readable name for logs and errors.
    pub fn label(&self) -> &'a str {
        match self {
            HireTarget::Static(record) => record.address().point_name(),
            HireTarget::Searched(station) => station.name(),
        }
    }
}

impl<'a> From<&'a StaticLocationRecord> for HireTarget<'a> {
    fn from(record: &'a StaticLocationRecord) -> Self {
        HireTarget::Static(record)
    }
}

impl<'a> From<&'a SearchedStationInfo> for HireTarget<'a> {
    fn from(station: &'a SearchedStationInfo) -> Self {
        HireTarget::Searched(station)
    }
}

/// A materialized hire-confirmation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCodeRequest {
    address: DockAddress,
    tokens: TokenTriple,
    device_id: String,
    outbound: OutboundRequest,
}

impl ReleaseCodeRequest {
    pub fn address(&self) -> &DockAddress {
        &self.address
    }

    pub fn tokens(&self) -> &TokenTriple {
        &self.tokens
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// The wire form of this request.
    pub fn outbound(&self) -> &OutboundRequest {
        &self.outbound
    }
}

/// Builds hire-confirmation requests for one device profile.
#[derive(Debug, Clone, Default)]
pub struct ReleaseCodeRequestBuilder {
    profile: DeviceProfile,
}

impl ReleaseCodeRequestBuilder {
    pub fn new(profile: DeviceProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Build the request for `target` using `tokens`.
    ///
    /// Addressing comes from the target only; the tokens may have been
    /// captured at any other station.
    pub fn build<'a>(
        &self,
        target: impl Into<HireTarget<'a>>,
        tokens: &TokenTriple,
    ) -> Result<ReleaseCodeRequest, CycleHireError> {
        let target = target.into();
        let address = target
            .address()
            .ok_or_else(|| CycleHireError::UnhirableStation {
                name: target.label().to_string(),
            })?;

        let profile = &self.profile;
        let outbound = OutboundRequest::new(Endpoint::HandleEventWithNode)
            .header("Accept", "*/*")
            .header("c3-encoding", tokens.encoding.as_str())
            .header("Accept-Language", profile.accept_language.as_str())
            .field("c3-clienttime", tokens.client_time.as_str())
            .field("c3-language", profile.language.as_str())
            .field(
                "c3-applysensitivedatacheck",
                profile.apply_sensitive_data_check.as_str(),
            )
            .field("c3-scalefactor", profile.scale_factor.as_str())
            .field("Node", confirm_hire_node(address))
            .field("c3-capabilities", profile.capabilities.as_str())
            .field("c3-batterylevel", profile.battery_level.as_str())
            .field("c3-userlat", profile.user_lat.as_str())
            .field("c3-deviceid", profile.device_id.as_str())
            .field("c3-userlong", profile.user_long.as_str())
            .field("Event", profile.event_name.as_str())
            .field("c3-controlvals", profile.control_vals.as_str())
            .field("c3-userauth", tokens.user_auth.as_str());

        Ok(ReleaseCodeRequest {
            address: address.clone(),
            tokens: tokens.clone(),
            device_id: profile.device_id.clone(),
            outbound,
        })
    }
}

/// Build a station search request.
///
/// Without tokens the credential fields are left out entirely.
pub fn build_search_request(
    profile: &DeviceProfile,
    search_text: &str,
    tokens: Option<&TokenTriple>,
) -> OutboundRequest {
    let mut request = OutboundRequest::new(Endpoint::StationSearch).header("Accept", "*/*");
    if let Some(tokens) = tokens {
        request = request
            .header("c3-encoding", tokens.encoding.as_str())
            .field("c3-clienttime", tokens.client_time.as_str());
    }
    request = request
        .header("Accept-Language", profile.accept_language.as_str())
        .field("c3-scalefactor", profile.scale_factor.as_str())
        .field("c3-userlat", profile.user_lat.as_str())
        .field("c3-userlong", profile.user_long.as_str())
        .field("c3-batterylevel", profile.battery_level.as_str())
        .field("c3-language", profile.language.as_str())
        .field(
            "c3-applysensitivedatacheck",
            profile.apply_sensitive_data_check.as_str(),
        );
    if let Some(tokens) = tokens {
        request = request.field("c3-userauth", tokens.user_auth.as_str());
    }
    request
        .field("c3-controlvals", profile.control_vals.as_str())
        .field("c3-capabilities", profile.capabilities.as_str())
        .field("c3-deviceid", profile.device_id.as_str())
        .field("lchs_search_text", search_text)
        .field("postback", "1")
        .field("format", "json")
}

/// Point names go inside an already-escaped target URI, where a bare
/// comma would split the query.
fn encode_point_name(point_name: &str) -> String {
    point_name.replace(',', "%2C")
}

/// The "Confirm hire" button node the app posts back when pressed.
fn confirm_hire_node(address: &DockAddress) -> String {
    format!(
        r#"<Node Type%3D"Node.FormControls.Button" ID%3D"page_button1" SortOrder%3D"25" TTL%3D"3600" AliasMode%3D"Passive">
<Name>Confirm hire<%2FName>
<TreeMode>Leaf<%2FTreeMode>
<Language><%2FLanguage>
<TargetUri>part%3A%2F%2FClients.TfL.EBikePhase2.ConfirmMemberHire%3FTerminalName%3D{terminal}%26amp%3BPointName%3D{point}%26amp%3BLCHS_Confirm%3D1%26amp%3BnbBikes%3D(null)<%2FTargetUri>
<Tags>
<Tag key%3D"Style.Cell.ForegroundColor">#FFFFFF<%2FTag>
<Tag key%3D"Style.Cell.BorderColor">#EE0000<%2FTag>
<Tag key%3D"Style.Cell.CenterVertically">1<%2FTag>
<Tag key%3D"Style.Cell.TextAlign">center<%2FTag>
<Tag key%3D"Style.Cell.BackgroundBorderRadius">5%<%2FTag>
<Tag key%3D"Style.Cell.Width">70%<%2FTag>
<Tag key%3D"Style.Cell.Margin.BackgroundColor">#FFFFFF<%2FTag>
<Tag key%3D"Style.Cell.BackgroundColor">#EE0000<%2FTag>
<Tag key%3D"Style.Cell.BorderWidth">1px<%2FTag>
<Tag key%3D"Style.Cell.HideNativeWidgets">1<%2FTag>
<Tag key%3D"Style.Cell.Margin">50 40 40 40<%2FTag>
<Tag key%3D"Style.Cell.FontSize">16px<%2FTag>
<Tag key%3D"Style.Class">button_set page_button1<%2FTag>
<Tag key%3D"Style.Cell.FontName">NJFont-Medium<%2FTag>
<%2FTags>
<%2FNode>"#,
        terminal = address.terminal_name(),
        point = encode_point_name(address.point_name()),
    )
}
