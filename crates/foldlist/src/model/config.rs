//! Behavior switches for an expandable list.
//!
//! Configuration can be built in code or loaded from JSON or TOML text:
//!
//! ```ignore
//! use foldlist::model::ExpandableConfig;
//!
//! let config = ExpandableConfig::from_toml_str("items_expandable = false")?;
//! assert!(!config.items_expandable);
//! ```

use serde::{Deserialize, Serialize};

use super::error::{FoldError, FoldResult};

/// Behavior switches for an [`ExpandableListModel`](super::ExpandableListModel).
///
/// Missing fields take their default when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandableConfig {
    /// Whether user interaction reported by views may expand or collapse
    /// parents. Programmatic operations ignore this switch.
    pub items_expandable: bool,
    /// Whether a parent row should toggle when clicked anywhere, rather than
    /// only on a dedicated indicator. Passed through to parent binds.
    pub toggle_on_item_click: bool,
    /// Whether programmatic transitions call back attached views.
    pub notify_attached_views: bool,
}

impl Default for ExpandableConfig {
    fn default() -> Self {
        Self {
            items_expandable: true,
            toggle_on_item_click: true,
            notify_attached_views: true,
        }
    }
}

impl ExpandableConfig {
    /// Sets whether user interaction may toggle parents.
    pub fn with_items_expandable(mut self, expandable: bool) -> Self {
        self.items_expandable = expandable;
        self
    }

    /// Sets whether a click anywhere on a parent row toggles it.
    pub fn with_toggle_on_item_click(mut self, toggle: bool) -> Self {
        self.toggle_on_item_click = toggle;
        self
    }

    /// Sets whether attached views are notified of programmatic transitions.
    pub fn with_notify_attached_views(mut self, notify: bool) -> Self {
        self.notify_attached_views = notify;
        self
    }

    /// Parses configuration from JSON text.
    pub fn from_json_str(text: &str) -> FoldResult<Self> {
        serde_json::from_str(text).map_err(|e| FoldError::Config(e.to_string()))
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(text: &str) -> FoldResult<Self> {
        toml::from_str(text).map_err(|e| FoldError::Config(e.to_string()))
    }

    /// Serializes the configuration as TOML text.
    pub fn to_toml_string(&self) -> FoldResult<String> {
        toml::to_string(self).map_err(|e| FoldError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExpandableConfig::default();
        assert!(config.items_expandable);
        assert!(config.toggle_on_item_click);
        assert!(config.notify_attached_views);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ExpandableConfig::from_json_str(r#"{"toggle_on_item_click": false}"#).unwrap();
        assert!(config.items_expandable);
        assert!(!config.toggle_on_item_click);
    }

    #[test]
    fn test_toml() {
        let config = ExpandableConfig::from_toml_str("items_expandable = false\n").unwrap();
        assert!(!config.items_expandable);
        assert!(config.notify_attached_views);

        let text = config.to_toml_string().unwrap();
        assert_eq!(ExpandableConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_text() {
        let err = ExpandableConfig::from_toml_str("items_expandable = 3").unwrap_err();
        assert!(matches!(err, FoldError::Config(_)));
        assert!(ExpandableConfig::from_json_str("{").is_err());
    }
}
