// src/core/resolver.rs

use crate::models::{ArgumentsMap, Entry, Visitor};

/// Follows `key` through the alias entries of `known` and returns the key the
/// chain ends on, together with its handler (if that key has one).
///
/// A key with no entry resolves to itself with no handler. Alias chains are
/// not checked for cycles; a cyclic map recurses until the stack runs out.
pub fn find_visitor<'a>(key: &'a str, known: &'a ArgumentsMap) -> (&'a str, Option<&'a Visitor>) {
    match known.get(key) {
        Some(Entry::Alias(target)) => find_visitor(target, known),
        Some(Entry::Handler(visit)) => (key, Some(visit)),
        None => (key, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Signal;

    fn known() -> ArgumentsMap {
        ArgumentsMap::new()
            .alias("-r", "--req")
            .alias("--req", "--require")
            .handler("--require", |_| Ok(Signal::Continue))
            .alias("-x", "--missing")
    }

    #[test]
    fn test_direct_handler() {
        let known = known();
        let (key, visit) = find_visitor("--require", &known);
        assert_eq!(key, "--require");
        assert!(visit.is_some());
    }

    #[test]
    fn test_alias_chain() {
        let known = known();
        let (key, visit) = find_visitor("-r", &known);
        assert_eq!(key, "--require");
        assert!(visit.is_some());
    }

    #[test]
    fn test_dangling_alias_and_unknown_key() {
        let known = known();

        let (key, visit) = find_visitor("-x", &known);
        assert_eq!(key, "--missing");
        assert!(visit.is_none());

        let (key, visit) = find_visitor("build", &known);
        assert_eq!(key, "build");
        assert!(visit.is_none());
    }
}
