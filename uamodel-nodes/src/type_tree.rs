use uamodel_types::{NodeClass, NodeId};

/// Resolves questions about the type hierarchy of an address space.
///
/// The subtype relation is driven entirely by `HasSubtype` references in
/// the node graph, so the canonical implementation is the address space
/// itself; filters and services take this trait so they can run against
/// any view of the hierarchy.
pub trait TypeTree {
    /// Return `true` if `child` is `base` or a transitive subtype of it.
    fn is_subtype_of(&self, child: &NodeId, base: &NodeId) -> bool;

    /// Get the node class of the given type node, `None` if it is not
    /// known to the tree.
    fn get(&self, node: &NodeId) -> Option<NodeClass>;
}
