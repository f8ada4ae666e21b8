//! Constant device fields sent with every request.

/// `c3-userauth` of the device the example tokens were captured on.
pub const DEFAULT_USER_AUTH: &str = "564e7ff6ebbf80c4cafb4c7b7d3ea7bbc4435ad0|bcSxLxDWpaTC";

/// `c3-deviceid` of the device the example tokens were captured on.
pub const DEFAULT_DEVICE_ID: &str = "555D91A6-5B1E-49BC-9624-1989B4DA4833";

const DEFAULT_CAPABILITIES: &str = "inlinevouchers,expirytags,bucketpopulation,vzero,\
creditcall-chipdna,card.io,camera,camera-front,camera-rear,ble-unknown,location-on-wheninuse,\
londonriders,londonridersphase2r1,londonridersphase3,londonridersphase4,3dsenabled,\
ebikesphase2,daypass";

/// The device the requests claim to come from.
///
/// Defaults replay the iOS app the example tokens were captured from; the
/// upstream has only been observed to accept tokens together with the
/// device id they were issued to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    /// `Accept-Language` header
    pub accept_language: String,
    /// `c3-language`
    pub language: String,
    /// `c3-applysensitivedatacheck`
    pub apply_sensitive_data_check: String,
    /// `c3-scalefactor`
    pub scale_factor: String,
    /// `c3-capabilities`
    pub capabilities: String,
    /// `c3-batterylevel`
    pub battery_level: String,
    /// `c3-userlat`
    pub user_lat: String,
    /// `c3-userlong`
    pub user_long: String,
    /// `c3-deviceid`
    pub device_id: String,
    /// `Event` for `HandleEventWithNode`
    pub event_name: String,
    /// `c3-controlvals`
    pub control_vals: String,
}

impl DeviceProfile {
    /// Report a different user position.
    pub fn with_user_location(mut self, lat: impl Into<String>, long: impl Into<String>) -> Self {
        self.user_lat = lat.into();
        self.user_long = long.into();
        self
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
    }

    pub fn with_accept_language(mut self, accept_language: impl Into<String>) -> Self {
        self.accept_language = accept_language.into();
        self
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            accept_language: "en-SG,en-GB;q=0.9,en;q=0.8".to_string(),
            language: "en".to_string(),
            apply_sensitive_data_check: "y".to_string(),
            scale_factor: "2.00".to_string(),
            capabilities: DEFAULT_CAPABILITIES.to_string(),
            battery_level: "-1.000000".to_string(),
            user_lat: "51.5282".to_string(),
            user_long: "-0.121092".to_string(),
            device_id: DEFAULT_DEVICE_ID.to_string(),
            event_name: "Click".to_string(),
            control_vals: "cHTnp0wCbVOhbs12x8sR4+2I/8CVACvEd8Zn5e3Tpas=".to_string(),
        }
    }
}
