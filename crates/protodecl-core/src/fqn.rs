//! # Fully-Qualified Names
//!
//! `FullyQualifiedName` is the dotted path of a type inside the
//! package/nesting hierarchy, with a link to its parent path.
//!
//! ## Invariant
//!
//! `full_name == parent.full_name + "." + symbol_name` when a parent exists,
//! otherwise `full_name == symbol_name`. The fields are private and every
//! constructor maintains the invariant, so the chain can be walked to build
//! nested namespaces without re-splitting strings.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// A dotted type path with its parent chain materialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FullyQualifiedName {
    symbol_name: String,
    full_name: String,
    parent: Option<Arc<FullyQualifiedName>>,
}

impl FullyQualifiedName {
    /// Create a name for `symbol_name` nested under `parent`.
    pub fn new(parent: Option<Arc<FullyQualifiedName>>, symbol_name: impl Into<String>) -> Self {
        let symbol_name = symbol_name.into();
        let full_name = match &parent {
            Some(p) => format!("{}.{}", p.full_name, symbol_name),
            None => symbol_name.clone(),
        };
        Self {
            symbol_name,
            full_name,
            parent,
        }
    }

    /// Rebuild the parent chain of a dotted name.
    ///
    /// Returns `None` for an empty string. A leading dot (as found in
    /// descriptor type references) is ignored.
    pub fn parse(full_name: &str) -> Option<Arc<Self>> {
        let trimmed = full_name.strip_prefix('.').unwrap_or(full_name);
        if trimmed.is_empty() {
            return None;
        }
        let mut current: Option<Arc<Self>> = None;
        for segment in trimmed.split('.') {
            current = Some(Arc::new(Self::new(current, segment)));
        }
        current
    }

    /// The last path segment.
    pub fn symbol_name(&self) -> &str {
        &self.symbol_name
    }

    /// The complete dotted path.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The enclosing package or message, if any.
    pub fn parent(&self) -> Option<&Arc<FullyQualifiedName>> {
        self.parent.as_ref()
    }

    /// Path segments ordered root first.
    pub fn segments(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut node = Some(self);
        while let Some(n) = node {
            out.push(n.symbol_name.as_str());
            node = n.parent.as_deref();
        }
        out.reverse();
        out
    }

    /// Number of segments in the path.
    pub fn depth(&self) -> usize {
        1 + self.parent.as_ref().map_or(0, |p| p.depth())
    }
}

impl fmt::Display for FullyQualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

impl Serialize for FullyQualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.full_name)
    }
}

/// Strict package-name check: dot-separated segments, each starting with a
/// letter or underscore and continuing with ASCII alphanumerics or
/// underscores.
pub fn is_valid_package_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_valid_segment)
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// True if the string contains an ASCII control character (0x00-0x1F).
pub fn contains_control_chars(s: &str) -> bool {
    s.bytes().any(|b| b < 0x20)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_name_has_no_parent() {
        let fqn = FullyQualifiedName::new(None, "test");
        assert_eq!(fqn.full_name(), "test");
        assert_eq!(fqn.symbol_name(), "test");
        assert!(fqn.parent().is_none());
    }

    #[test]
    fn nested_name_joins_with_dot() {
        let pkg = Arc::new(FullyQualifiedName::new(None, "test"));
        let msg = FullyQualifiedName::new(Some(pkg), "Message");
        assert_eq!(msg.full_name(), "test.Message");
        assert_eq!(msg.parent().map(|p| p.full_name()), Some("test"));
    }

    #[test]
    fn parse_rebuilds_chain() {
        let fqn = FullyQualifiedName::parse("test.ParentMessage.ChildMessage").unwrap();
        assert_eq!(fqn.segments(), vec!["test", "ParentMessage", "ChildMessage"]);
        assert_eq!(fqn.depth(), 3);
        let parent = fqn.parent().unwrap();
        assert_eq!(parent.full_name(), "test.ParentMessage");
        assert_eq!(parent.parent().unwrap().full_name(), "test");
    }

    #[test]
    fn parse_strips_leading_dot() {
        let fqn = FullyQualifiedName::parse(".test.Message").unwrap();
        assert_eq!(fqn.full_name(), "test.Message");
    }

    #[test]
    fn parse_empty_is_none() {
        assert!(FullyQualifiedName::parse("").is_none());
        assert!(FullyQualifiedName::parse(".").is_none());
    }

    #[test]
    fn package_name_validation() {
        assert!(is_valid_package_name("test"));
        assert!(is_valid_package_name("package_with_underscores"));
        assert!(is_valid_package_name("a.b_c.D9"));
        assert!(is_valid_package_name("_private.x"));
        assert!(!is_valid_package_name(""));
        assert!(!is_valid_package_name("9lives"));
        assert!(!is_valid_package_name("a.1b"));
        assert!(!is_valid_package_name("a/b"));
        assert!(!is_valid_package_name("a..b"));
        assert!(!is_valid_package_name("a.b."));
        assert!(!is_valid_package_name("caf\u{e9}"));
    }

    #[test]
    fn control_characters_detected() {
        assert!(contains_control_chars("bad\nname.proto"));
        assert!(contains_control_chars("\u{0}"));
        assert!(!contains_control_chars("ok/name.proto"));
    }

    #[test]
    fn serializes_as_full_name() {
        let fqn = FullyQualifiedName::parse("a.b.C").unwrap();
        let json = serde_json::to_string(&*fqn).unwrap();
        assert_eq!(json, r#""a.b.C""#);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The full name always equals the parent full name plus the symbol.
        #[test]
        fn full_name_invariant_holds(segments in prop::collection::vec("[A-Za-z_][A-Za-z0-9_]{0,8}", 1..6)) {
            let joined = segments.join(".");
            let fqn = FullyQualifiedName::parse(&joined).unwrap();
            prop_assert_eq!(fqn.full_name(), joined.as_str());
            let mut node: Option<&FullyQualifiedName> = Some(&fqn);
            while let Some(n) = node {
                match n.parent() {
                    Some(p) => prop_assert_eq!(n.full_name().to_string(), format!("{}.{}", p.full_name(), n.symbol_name())),
                    None => prop_assert_eq!(n.full_name(), n.symbol_name()),
                }
                node = n.parent().map(|p| p.as_ref());
            }
        }

        /// Generated identifier paths always pass package validation.
        #[test]
        fn identifier_paths_are_valid_packages(segments in prop::collection::vec("[A-Za-z_][A-Za-z0-9_]{0,8}", 1..6)) {
            prop_assert!(is_valid_package_name(&segments.join(".")));
        }
    }
}
