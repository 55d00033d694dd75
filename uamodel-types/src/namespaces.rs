//! Utilities for working with namespaces.

use hashbrown::HashMap;

/// Utility for handling assignment of namespaces on server startup.
#[derive(Debug, Clone)]
pub struct NamespaceMap {
    known_namespaces: HashMap<String, u16>,
}

impl Default for NamespaceMap {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceMap {
    /// Create a new namespace map containing only the base namespace.
    pub fn new() -> Self {
        let mut known_namespaces = HashMap::new();
        known_namespaces.insert("http://opcfoundation.org/UA/".to_owned(), 0u16);

        Self { known_namespaces }
    }

    /// Add a new namespace, returning its index in the namespace map.
    /// If the namespace is already added, its old index is returned.
    pub fn add_namespace(&mut self, namespace: &str) -> u16 {
        if let Some(ns) = self.known_namespaces.get(namespace) {
            return *ns;
        }
        let max = self
            .known_namespaces
            .values()
            .max()
            .copied()
            .unwrap_or_default();
        self.known_namespaces.insert(namespace.to_owned(), max + 1);

        max + 1
    }

    /// Return the inner namespace map.
    pub fn known_namespaces(&self) -> &HashMap<String, u16> {
        &self.known_namespaces
    }

    /// Get the index of the given namespace.
    pub fn get_index(&self, ns: &str) -> Option<u16> {
        self.known_namespaces.get(ns).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::NamespaceMap;

    #[test]
    fn add_is_idempotent() {
        let mut map = NamespaceMap::new();
        assert_eq!(map.get_index("http://opcfoundation.org/UA/"), Some(0));
        let a = map.add_namespace("urn:first");
        let b = map.add_namespace("urn:second");
        assert_eq!((a, b), (1, 2));
        assert_eq!(map.add_namespace("urn:first"), 1);
    }
}
