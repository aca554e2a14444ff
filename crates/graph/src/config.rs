use serde::{Deserialize, Serialize};

/// Name of the universal base type in JVM scans
pub const DEFAULT_ROOT_TYPE: &str = "java.lang.Object";

/// Settings the scan was performed with; they decide what the graph exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Expose types that were only referenced, not scanned (otherwise
    /// strict whitelist semantics apply)
    pub enable_external_types: bool,

    /// Non-public attributes were scanned too
    pub ignore_attribute_visibility: bool,

    /// Non-public routines were scanned too
    pub ignore_routine_visibility: bool,

    /// Universal base type, hidden from listings and diagrams
    pub root_type: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            enable_external_types: false,
            ignore_attribute_visibility: false,
            ignore_routine_visibility: false,
            root_type: DEFAULT_ROOT_TYPE.to_string(),
        }
    }
}

impl ScanConfig {
    /// Config that also exposes external types
    pub fn with_external_types() -> Self {
        Self {
            enable_external_types: true,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.root_type.trim().is_empty() {
            return Err("root_type must not be empty".to_string());
        }
        Ok(())
    }
}

/// Diagram rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Canvas width in inches
    pub width: f32,

    /// Canvas height in inches
    pub height: f32,

    /// List attributes inside node labels
    pub show_attributes: bool,

    /// List routines inside node labels
    pub show_routines: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 10.0,
            show_attributes: true,
            show_routines: true,
        }
    }
}

impl DiagramConfig {
    /// Nodes show only their header, name and tags
    pub fn hierarchy_only() -> Self {
        Self {
            show_attributes: false,
            show_routines: false,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        for (label, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{label} must be a positive number, got {value}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_valid() {
        assert!(ScanConfig::default().validate().is_ok());
        assert!(ScanConfig::with_external_types().validate().is_ok());
        assert!(DiagramConfig::default().validate().is_ok());
        assert!(DiagramConfig::hierarchy_only().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let scan = ScanConfig {
            root_type: "  ".to_string(),
            ..Default::default()
        };
        assert!(scan.validate().is_err());

        let mut diagram = DiagramConfig::default();
        diagram.width = 0.0;
        assert!(diagram.validate().is_err());

        diagram.width = 8.5;
        diagram.height = f32::NAN;
        assert!(diagram.validate().is_err());

        diagram.height = 11.0;
        assert!(diagram.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let scan: ScanConfig = serde_json::from_str(r#"{"enable_external_types":true}"#).unwrap();
        assert!(scan.enable_external_types);
        assert_eq!(scan.root_type, DEFAULT_ROOT_TYPE);
    }
}
