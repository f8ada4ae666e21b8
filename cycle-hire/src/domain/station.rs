//! Docking station types.

use std::fmt;

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station ID: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// Error returned when a dock address is missing one of its halves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid dock address: {reason}")]
pub struct InvalidDockAddress {
    reason: &'static str,
}

/// Upstream identifier of a docking station (e.g. `"300205"`).
///
/// Opaque apart from being non-empty and free of surrounding whitespace.
///
/// # Examples
///
/// ```
/// use cycle_hire::domain::StationId;
///
/// let id = StationId::parse("300205").unwrap();
/// assert_eq!(id.as_str(), "300205");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse(" 12").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationId(String);

impl StationId {
    /// Parse a station identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "cannot be empty",
            });
        }
        if s.trim() != s {
            return Err(InvalidStationId {
                reason: "cannot have surrounding whitespace",
            });
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The terminal/point pair a hire-confirmation request is addressed to.
///
/// Both halves exist together or not at all, so a station either has a
/// `DockAddress` (hirable) or it does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DockAddress {
    terminal_name: String,
    point_name: String,
}

impl DockAddress {
    /// Create an address from a terminal name (e.g. `"001009"`) and a
    /// point name (e.g. `"Taviton Street, Bloomsbury"`).
    pub fn new(
        terminal_name: impl Into<String>,
        point_name: impl Into<String>,
    ) -> Result<Self, InvalidDockAddress> {
        let terminal_name = terminal_name.into();
        let point_name = point_name.into();

        if terminal_name.is_empty() {
            return Err(InvalidDockAddress {
                reason: "terminal name cannot be empty",
            });
        }
        if point_name.is_empty() {
            return Err(InvalidDockAddress {
                reason: "point name cannot be empty",
            });
        }

        Ok(Self {
            terminal_name,
            point_name,
        })
    }

    /// Build an address from compiled-in values known to be non-empty.
    pub(crate) fn from_static(terminal_name: &'static str, point_name: &'static str) -> Self {
        debug_assert!(!terminal_name.is_empty() && !point_name.is_empty());
        Self {
            terminal_name: terminal_name.to_string(),
            point_name: point_name.to_string(),
        }
    }

    pub fn terminal_name(&self) -> &str {
        &self.terminal_name
    }

    pub fn point_name(&self) -> &str {
        &self.point_name
    }
}

/// A station as returned by the search endpoint.
///
/// Non-hirable stations (no bikes, closed, or simply a name match) are
/// kept with no [`DockAddress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchedStationInfo {
    id: StationId,
    name: String,
    subtitle: String,
    address: Option<DockAddress>,
    dock_location: Option<String>,
}

impl SearchedStationInfo {
    /// Create a new search result.
    pub fn new(
        id: StationId,
        name: impl Into<String>,
        subtitle: impl Into<String>,
        address: Option<DockAddress>,
        dock_location: Option<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            subtitle: subtitle.into(),
            address,
            dock_location,
        }
    }

    pub fn id(&self) -> &StationId {
        &self.id
    }

    /// Display name, e.g. `"Cromer Street, Bloomsbury"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Availability summary shown under the name.
    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn address(&self) -> Option<&DockAddress> {
        self.address.as_ref()
    }

    pub fn terminal_name(&self) -> Option<&str> {
        self.address.as_ref().map(DockAddress::terminal_name)
    }

    pub fn point_name(&self) -> Option<&str> {
        self.address.as_ref().map(DockAddress::point_name)
    }

    /// `"lat,lon"` of the dock, when the upstream supplied it.
    pub fn dock_location(&self) -> Option<&str> {
        self.dock_location.as_deref()
    }

    pub fn is_hirable(&self) -> bool {
        self.address.is_some()
    }
}

impl fmt::Display for SearchedStationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.subtitle)
    }
}

/// A release code for unlocking a bike, e.g. `"13312"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCode(String);

impl ReleaseCode {
    pub(crate) fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(address: Option<DockAddress>) -> SearchedStationInfo {
        SearchedStationInfo::new(
            StationId::parse("42").unwrap(),
            "Soho Square, Soho",
            "3 bikes",
            address,
            None,
        )
    }

    #[test]
    fn station_id_validation() {
        assert!(StationId::parse("300205").is_ok());
        assert!(StationId::parse("").is_err());
        assert!(StationId::parse("12 ").is_err());
        assert_eq!(
            StationId::parse("").unwrap_err().to_string(),
            "invalid station ID: cannot be empty"
        );
    }

    #[test]
    fn dock_address_requires_both_halves() {
        assert!(DockAddress::new("001009", "Taviton Street, Bloomsbury").is_ok());
        assert!(DockAddress::new("", "Taviton Street, Bloomsbury").is_err());
        assert!(DockAddress::new("001009", "").is_err());
    }

    #[test]
    fn hirable_iff_address_present() {
        let hirable = station(Some(DockAddress::new("300205", "Soho Square, Soho").unwrap()));
        assert!(hirable.is_hirable());
        assert_eq!(hirable.terminal_name(), Some("300205"));
        assert_eq!(hirable.point_name(), Some("Soho Square, Soho"));

        let not_hirable = station(None);
        assert!(!not_hirable.is_hirable());
        assert_eq!(not_hirable.terminal_name(), None);
        assert_eq!(not_hirable.point_name(), None);
    }

    #[test]
    fn display() {
        assert_eq!(station(None).to_string(), "Soho Square, Soho (3 bikes)");
        assert_eq!(ReleaseCode::new("13312").to_string(), "13312");
    }
}
