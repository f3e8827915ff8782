//! Prefix completion over registered names.

use crate::registry::Registry;

/// The incremental completion contract: the `index`-th name in `names`
/// starting with `prefix`, or `None` once the matches are exhausted.
///
/// Callers enumerate by calling with `index` 0, 1, 2, … until `None`.
/// Duplicates in `names` are preserved.
pub fn complete<'a>(names: &'a [String], prefix: &str, index: usize) -> Option<&'a str> {
    names
        .iter()
        .filter(|name| name.starts_with(prefix))
        .nth(index)
        .map(String::as_str)
}

/// A snapshot of registered names for interactive completion.
///
/// Line editors poll completions from contexts that cannot borrow the
/// registry, so the provider holds its own copy of the name list and is
/// refreshed between reads.
#[derive(Debug, Clone, Default)]
pub struct CompletionProvider {
    names: Vec<String>,
}

impl CompletionProvider {
    /// Build a provider over an explicit name list.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Snapshot the current registry contents.
    pub fn from_registry(registry: &Registry) -> Self {
        Self::new(registry.all_names().to_vec())
    }

    /// Replace the snapshot with the registry's current contents.
    pub fn refresh(&mut self, registry: &Registry) {
        self.names = registry.all_names().to_vec();
    }

    /// See [`complete`].
    pub fn complete(&self, prefix: &str, index: usize) -> Option<&str> {
        complete(&self.names, prefix, index)
    }

    /// All matches for `prefix`, obtained through the incremental
    /// contract.
    pub fn candidates(&self, prefix: &str) -> Vec<String> {
        (0..)
            .map_while(|index| self.complete(prefix, index))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, handler};
    use pretty_assertions::assert_eq;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_enumeration_ends_with_none() {
        let names = names(&["foo", "format", "bar", "for"]);

        assert_eq!(complete(&names, "fo", 0), Some("foo"));
        assert_eq!(complete(&names, "fo", 1), Some("format"));
        assert_eq!(complete(&names, "fo", 2), Some("for"));
        assert_eq!(complete(&names, "fo", 3), None);
    }

    #[test]
    fn test_duplicates_are_enumerated() {
        let names = names(&["go", "go"]);

        assert_eq!(complete(&names, "g", 0), Some("go"));
        assert_eq!(complete(&names, "g", 1), Some("go"));
        assert_eq!(complete(&names, "g", 2), None);
    }

    #[test]
    fn test_empty_prefix_matches_everything() {
        let names = names(&["a", "b"]);

        assert_eq!(complete(&names, "", 0), Some("a"));
        assert_eq!(complete(&names, "", 1), Some("b"));
        assert_eq!(complete(&names, "", 2), None);
    }

    #[test]
    fn test_provider_sees_aliases() {
        let mut registry = Registry::new();
        registry.insert(
            Command::new("ping", handler(|_args| Ok(()))).with_aliases(["p"]),
        );
        registry.insert(Command::new("pong", handler(|_args| Ok(()))));

        let provider = CompletionProvider::from_registry(&registry);
        assert_eq!(provider.candidates("p"), vec!["ping", "p", "pong"]);
        assert_eq!(provider.candidates("q"), Vec::<String>::new());
    }

    #[test]
    fn test_refresh_tracks_registry_growth() {
        let mut registry = Registry::new();
        let mut provider = CompletionProvider::from_registry(&registry);
        assert!(provider.candidates("").is_empty());

        registry.insert(Command::new("late", handler(|_args| Ok(()))));
        provider.refresh(&registry);
        assert_eq!(provider.candidates("la"), vec!["late"]);
    }
}
