//! # Codec Options
//!
//! Tunables shared by every message codec attached to a
//! [`DescriptorDatabase`](crate::DescriptorDatabase). The struct is
//! `Deserialize` so embedders can load it from the same YAML/JSON
//! configuration files as the rest of their settings.

use serde::{Deserialize, Serialize};

/// Default bound on nested message depth.
pub const DEFAULT_RECURSION_LIMIT: u32 = 100;

/// Behaviour knobs for binary and JSON conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecOptions {
    /// Maximum nesting of messages accepted while decoding.
    pub recursion_limit: u32,
    /// Skip unknown keys in debug JSON instead of rejecting them.
    pub ignore_unknown_json_fields: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            ignore_unknown_json_fields: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = CodecOptions::default();
        assert_eq!(opts.recursion_limit, 100);
        assert!(!opts.ignore_unknown_json_fields);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let opts: CodecOptions = serde_yaml::from_str("ignore_unknown_json_fields: true\n").unwrap();
        assert_eq!(opts.recursion_limit, DEFAULT_RECURSION_LIMIT);
        assert!(opts.ignore_unknown_json_fields);
    }

    #[test]
    fn unknown_keys_rejected() {
        let res: Result<CodecOptions, _> = serde_json::from_str(r#"{"recursion": 3}"#);
        assert!(res.is_err());
    }
}
