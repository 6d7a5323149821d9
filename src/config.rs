use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::sequence::phrases;

/// Runtime configuration for the announcer.
///
/// Lives only for the process lifetime; there is no load/save. Callers
/// adjust it through `Announcer::configure`, which merges a partial
/// `ConfigOverrides` over the current values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnouncerConfig {
    /// Root directory containing the clip files
    pub resource_root: PathBuf,

    /// Mapping from logical symbol (digit, letter, phrase) to clip filename
    pub clip_map: HashMap<String, String>,

    /// Log skipped/unmapped symbols at debug level
    pub verbose: bool,
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        Self {
            resource_root: PathBuf::from("sounds"),
            clip_map: default_clip_map(),
            verbose: false,
        }
    }
}

/// Partial configuration used for field-wise merging.
///
/// Unset fields leave the current value untouched. `clip_map` merges
/// key-wise: supplied symbols override or extend the existing map, the
/// rest of the map is preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub resource_root: Option<PathBuf>,

    #[serde(default)]
    pub clip_map: Option<HashMap<String, String>>,

    #[serde(default)]
    pub verbose: Option<bool>,
}

impl AnnouncerConfig {
    /// Merge the supplied overrides into this configuration
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(root) = overrides.resource_root {
            self.resource_root = root;
        }
        if let Some(map) = overrides.clip_map {
            self.clip_map.extend(map);
        }
        if let Some(verbose) = overrides.verbose {
            self.verbose = verbose;
        }
    }
}

/// Default symbol-to-filename mapping: digits, uppercase letters and the
/// announcement phrases, each expected as a standalone clip under
/// `resource_root`.
pub fn default_clip_map() -> HashMap<String, String> {
    let mut map = HashMap::new();

    for digit in '0'..='9' {
        map.insert(digit.to_string(), format!("{digit}.wav"));
    }
    for letter in 'A'..='Z' {
        map.insert(letter.to_string(), format!("{letter}.wav"));
    }

    for phrase in [
        phrases::CHIME,
        phrases::PLEASE,
        phrases::CUSTOMER_NUMBER,
        phrases::PROCEED_TO,
        phrases::WINDOW_NUMBER,
        phrases::LOBBY_MANAGER,
        phrases::COUNTER_NUMBER,
        phrases::PRE_FILL_MACHINE,
        phrases::SELF_SERVICE_AREA,
    ] {
        map.insert(phrase.to_string(), format!("{phrase}.wav"));
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnnouncerConfig::default();
        assert_eq!(config.resource_root, PathBuf::from("sounds"));
        assert!(!config.verbose);

        // 10 digits + 26 letters + 9 phrases
        assert_eq!(config.clip_map.len(), 45);
        assert_eq!(config.clip_map.get("7").unwrap(), "7.wav");
        assert_eq!(config.clip_map.get("B").unwrap(), "B.wav");
        assert_eq!(config.clip_map.get("lobby-manager").unwrap(), "lobby-manager.wav");
    }

    #[test]
    fn test_apply_merges_fields_independently() {
        let mut config = AnnouncerConfig::default();
        config.apply(ConfigOverrides {
            verbose: Some(true),
            ..Default::default()
        });

        assert!(config.verbose);
        assert_eq!(config.resource_root, PathBuf::from("sounds"));
        assert_eq!(config.clip_map.len(), 45);
    }

    #[test]
    fn test_apply_clip_map_merge_is_key_wise() {
        let mut config = AnnouncerConfig::default();
        let mut overrides = HashMap::new();
        overrides.insert("chime".to_string(), "bell.wav".to_string());
        overrides.insert("closing-soon".to_string(), "closing-soon.wav".to_string());

        config.apply(ConfigOverrides {
            clip_map: Some(overrides),
            ..Default::default()
        });

        // Overridden and added keys take effect, everything else is retained
        assert_eq!(config.clip_map.get("chime").unwrap(), "bell.wav");
        assert_eq!(config.clip_map.get("closing-soon").unwrap(), "closing-soon.wav");
        assert_eq!(config.clip_map.get("0").unwrap(), "0.wav");
        assert_eq!(config.clip_map.len(), 46);
    }

    #[test]
    fn test_overrides_deserialize_with_missing_fields() {
        let overrides: ConfigOverrides = serde_json::from_str(r#"{"verbose": true}"#).unwrap();
        assert_eq!(overrides.verbose, Some(true));
        assert!(overrides.resource_root.is_none());
        assert!(overrides.clip_map.is_none());
    }
}
