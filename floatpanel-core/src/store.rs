//! # Geometry persistence
//!
//! Panel geometry is stored per [`PanelIdentity`] under the key
//! `"panel-state:" + identity` as a JSON record with optional string fields
//! `left`, `top`, `width` and `height`, each a number with a `px` suffix:
//!
//! ```json
//! {"left":"100px","top":"80px","width":"400px","height":"300px"}
//! ```
//!
//! Persistence is a convenience. [`GeometryStore`] never reports failure:
//! unreadable or malformed payloads read as an empty [`PersistedState`] and
//! failed writes or deletions are logged and dropped.

use crate::backend::{MemoryBackend, StorageBackend};
use floatpanel_api::{Point, Rect, Size};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Identity used when a panel has no explicit identifier.
pub const DEFAULT_IDENTITY: &str = "panel-component-default";

/// Prefix of every storage key.
pub const STORAGE_KEY_PREFIX: &str = "panel-state:";

/// Stable key namespacing a panel's persisted geometry.
///
/// Two panels with the same identity share persisted geometry.
///
/// # Example
///
/// ```rust
/// use floatpanel_core::store::PanelIdentity;
///
/// assert_eq!(PanelIdentity::new(Some("inspector")).storage_key(), "panel-state:inspector");
/// assert_eq!(PanelIdentity::new(None).storage_key(), "panel-state:panel-component-default");
/// assert_eq!(PanelIdentity::new(Some("")).as_str(), "panel-component-default");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PanelIdentity(String);

impl PanelIdentity {
    /// Identity from an explicit id, falling back to [`DEFAULT_IDENTITY`] when
    /// the id is absent or empty.
    pub fn new(id: Option<&str>) -> Self {
        match id {
            Some(id) if !id.is_empty() => Self(id.to_string()),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn storage_key(&self) -> String {
        format!("{}{}", STORAGE_KEY_PREFIX, self.0)
    }
}

impl Default for PanelIdentity {
    fn default() -> Self {
        Self(DEFAULT_IDENTITY.to_string())
    }
}

impl fmt::Display for PanelIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A non-negative pixel length, serialised as `"<n>px"`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Length(f32);

impl Length {
    /// `None` for negative or non-finite values.
    pub fn px(value: f32) -> Option<Self> {
        (value.is_finite() && value >= 0.0).then_some(Self(value))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

/// Error returned when a string is not a valid pixel length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLengthError(String);

impl fmt::Display for ParseLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid pixel length: {:?}", self.0)
    }
}

impl std::error::Error for ParseLengthError {}

impl FromStr for Length {
    type Err = ParseLengthError;

    /// Accepts `"120px"`, `"120.5px"` and bare numbers such as `"120"`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
        number
            .parse::<f32>()
            .ok()
            .and_then(Length::px)
            .ok_or_else(|| ParseLengthError(s.to_string()))
    }
}

impl Serialize for Length {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Length {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Geometry restored for a panel. Every field is optional.
///
/// Absent `left`/`top` mean the panel has never been dragged and keeps its
/// initial layout position; absent `width`/`height` fall back to the
/// configured defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,
}

impl PersistedState {
    /// State with all four fields taken from `rect`. Negative coordinates
    /// are stored as 0.
    pub fn from_rect(rect: Rect) -> Self {
        let length = |value: f32| Length::px(value.max(0.0));
        Self {
            left: length(rect.left),
            top: length(rect.top),
            width: length(rect.width),
            height: length(rect.height),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Saved top-left corner, only when both coordinates were saved.
    pub fn position(&self) -> Option<Point> {
        match (self.left, self.top) {
            (Some(left), Some(top)) => Some(Point::new(left.value(), top.value())),
            _ => None,
        }
    }

    /// Saved size, with each missing dimension taken from `default`.
    pub fn size_or(&self, default: Size) -> Size {
        Size::new(
            self.width.map_or(default.width, |w| w.value()),
            self.height.map_or(default.height, |h| h.value()),
        )
    }

    /// The full rectangle, when every field is present.
    pub fn to_rect(&self) -> Option<Rect> {
        let position = self.position()?;
        Some(Rect::new(
            position.x,
            position.y,
            self.width?.value(),
            self.height?.value(),
        ))
    }
}

/// Best-effort, identity-keyed geometry persistence.
///
/// # Example
///
/// ```rust
/// use floatpanel_api::Rect;
/// use floatpanel_core::store::{GeometryStore, PanelIdentity};
///
/// let store = GeometryStore::in_memory();
/// let identity = PanelIdentity::new(Some("main"));
///
/// store.write(&identity, Rect::new(100.0, 80.0, 400.0, 300.0));
/// assert_eq!(store.read(&identity).to_rect(), Some(Rect::new(100.0, 80.0, 400.0, 300.0)));
///
/// store.reset(&identity);
/// assert!(store.read(&identity).is_empty());
/// ```
pub struct GeometryStore {
    backend: Box<dyn StorageBackend>,
}

impl GeometryStore {
    pub fn new<B: StorageBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Store backed by a fresh [`MemoryBackend`].
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Persisted state for `identity`; empty when nothing is stored, the
    /// backend fails, or the payload is malformed.
    pub fn read(&self, identity: &PanelIdentity) -> PersistedState {
        let key = identity.storage_key();
        let raw = match self.backend.get_item(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PersistedState::default(),
            Err(e) => {
                warn!("Failed to read panel state '{}': {}", key, e);
                return PersistedState::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                warn!("Ignoring malformed panel state '{}': {}", key, e);
                PersistedState::default()
            }
        }
    }

    /// Persist `rect` for `identity`. Failures are logged and dropped.
    pub fn write(&self, identity: &PanelIdentity, rect: Rect) {
        self.write_state(identity, &PersistedState::from_rect(rect));
    }

    pub fn write_state(&self, identity: &PanelIdentity, state: &PersistedState) {
        let key = identity.storage_key();
        let payload = match serde_json::to_string(state) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize panel state '{}': {}", key, e);
                return;
            }
        };

        match self.backend.set_item(&key, &payload) {
            Ok(()) => debug!("Saved panel state '{}': {}", key, payload),
            Err(e) => warn!("Failed to save panel state '{}': {}", key, e),
        }
    }

    /// Delete persisted state for `identity`. Failures are logged and dropped.
    pub fn reset(&self, identity: &PanelIdentity) {
        let key = identity.storage_key();
        match self.backend.remove_item(&key) {
            Ok(()) => debug!("Cleared panel state '{}'", key),
            Err(e) => warn!("Failed to clear panel state '{}': {}", key, e),
        }
    }
}

impl fmt::Debug for GeometryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometryStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Result};

    /// Backend whose every operation fails.
    struct BrokenBackend;

    impl StorageBackend for BrokenBackend {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::storage("backend unavailable"))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::storage("quota exceeded"))
        }

        fn remove_item(&self, _key: &str) -> Result<()> {
            Err(Error::storage("backend unavailable"))
        }
    }

    fn identity() -> PanelIdentity {
        PanelIdentity::new(Some("test"))
    }

    #[test]
    fn test_length_parsing() {
        assert_eq!("120px".parse::<Length>().unwrap().value(), 120.0);
        assert_eq!(" 12.5px ".parse::<Length>().unwrap().value(), 12.5);
        assert_eq!("80".parse::<Length>().unwrap().value(), 80.0);
        assert!("abc".parse::<Length>().is_err());
        assert!("-5px".parse::<Length>().is_err());
        assert!("NaNpx".parse::<Length>().is_err());
        assert!("10em".parse::<Length>().is_err());
        assert!("".parse::<Length>().is_err());
    }

    #[test]
    fn test_length_display() {
        assert_eq!(Length::px(100.0).unwrap().to_string(), "100px");
        assert_eq!(Length::px(100.5).unwrap().to_string(), "100.5px");
        assert!(Length::px(f32::INFINITY).is_none());
    }

    #[test]
    fn test_persisted_state_wire_format() {
        let state = PersistedState::from_rect(Rect::new(100.0, 80.0, 400.0, 300.0));
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(
            json,
            r#"{"left":"100px","top":"80px","width":"400px","height":"300px"}"#
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let state = PersistedState {
            width: Length::px(250.0),
            ..PersistedState::default()
        };
        assert_eq!(serde_json::to_string(&state).unwrap(), r#"{"width":"250px"}"#);
        assert_eq!(state.position(), None);
        assert_eq!(state.size_or(Size::new(400.0, 300.0)), Size::new(250.0, 300.0));
    }

    #[test]
    fn test_position_requires_both_coordinates() {
        let state: PersistedState = serde_json::from_str(r#"{"left":"10px"}"#).unwrap();
        assert_eq!(state.position(), None);

        let state: PersistedState = serde_json::from_str(r#"{"left":"10px","top":"20px"}"#).unwrap();
        assert_eq!(state.position(), Some(Point::new(10.0, 20.0)));
    }

    #[test]
    fn test_read_missing_is_empty() {
        let store = GeometryStore::in_memory();
        assert!(store.read(&identity()).is_empty());
    }

    #[test]
    fn test_write_read_reset_roundtrip() {
        let store = GeometryStore::in_memory();
        let rect = Rect::new(12.0, 34.5, 456.0, 78.0);

        store.write(&identity(), rect);
        assert_eq!(store.read(&identity()).to_rect(), Some(rect));

        store.reset(&identity());
        assert_eq!(store.read(&identity()), PersistedState::default());
    }

    #[test]
    fn test_malformed_payloads_read_as_empty() {
        let backend = MemoryBackend::new();
        let store = GeometryStore::new(backend.clone());
        let key = identity().storage_key();

        for payload in [
            "not json",
            "[]",
            "42",
            r#"{"left":"wide"}"#,
            r#"{"left":10}"#,
            r#"{"width":"-4px"}"#,
        ] {
            backend.set_item(&key, payload).unwrap();
            assert!(store.read(&identity()).is_empty(), "payload {payload:?}");
        }
    }

    #[test]
    fn test_null_and_unknown_fields_are_tolerated() {
        let backend = MemoryBackend::new();
        let store = GeometryStore::new(backend.clone());
        backend
            .set_item(&identity().storage_key(), r#"{"left":null,"width":"300px","zIndex":"4"}"#)
            .unwrap();

        let state = store.read(&identity());
        assert_eq!(state.left, None);
        assert_eq!(state.width, Length::px(300.0));
    }

    #[test]
    fn test_backend_failures_are_swallowed() {
        let store = GeometryStore::new(BrokenBackend);
        store.write(&identity(), Rect::new(1.0, 2.0, 300.0, 200.0));
        store.reset(&identity());
        assert!(store.read(&identity()).is_empty());
    }

    #[test]
    fn test_identities_are_isolated() {
        let store = GeometryStore::in_memory();
        let a = PanelIdentity::new(Some("a"));
        let b = PanelIdentity::new(Some("b"));

        store.write(&a, Rect::new(1.0, 1.0, 200.0, 200.0));
        assert!(store.read(&b).is_empty());
        store.reset(&b);
        assert!(!store.read(&a).is_empty());
    }
}
