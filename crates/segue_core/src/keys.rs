//! Screen/tag identity and ancestor-chain matching
//!
//! Screens and shared elements are identified by plain string keys. An
//! element that lives inside a nested navigator also carries an
//! **ancestor chain** - the keys of its enclosing navigator screens - so a
//! match against an ancestor's key still succeeds after a direct miss.

use smallvec::SmallVec;

/// Identity of a screen in the navigation stack
pub type ScreenKey = String;

/// Stable identifier shared by an element instance on two screens
pub type Tag = String;

/// Name of a tag family used by list/collection UIs
pub type GroupName = String;

/// Ancestor screen keys, innermost first
pub type AncestorChain = SmallVec<[ScreenKey; 2]>;

/// Check whether `candidate` identifies the screen described by `direct`
/// plus its ancestor chain. The direct key is tried first; the ancestor
/// chain only after a direct miss.
pub fn key_matches(candidate: &str, direct: &str, ancestors: &[ScreenKey]) -> bool {
    if candidate == direct {
        return true;
    }
    ancestors.iter().any(|a| a == candidate)
}

/// Compose the concrete tag for a group member (`group:id`)
pub fn group_tag(group: &str, id: &str) -> Tag {
    format!("{group}:{id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_direct_match() {
        assert!(key_matches("a", "a", &[]));
        assert!(!key_matches("a", "b", &[]));
    }

    #[test]
    fn test_ancestor_match() {
        let ancestors: AncestorChain = smallvec!["outer".to_string(), "root".to_string()];
        assert!(key_matches("outer", "inner", &ancestors));
        assert!(key_matches("root", "inner", &ancestors));
        assert!(!key_matches("sibling", "inner", &ancestors));
    }

    #[test]
    fn test_group_tag_format() {
        assert_eq!(group_tag("photos", "42"), "photos:42");
    }
}
