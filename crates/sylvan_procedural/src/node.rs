//! # Nodes and Node Roles
//!
//! A node is the content of one voxel cell. Generators never deal with
//! node names at run time: every role a generator stamps is resolved to
//! an identifier once, before generation starts.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::error::{TreegenError, TreegenResult};

/// A single node (voxel cell content).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct Node {
    /// Content type ID.
    pub content: u16,
    /// Content-specific parameter (facing, level, etc.).
    pub param: u16,
}

impl Node {
    /// Air - empty space.
    pub const AIR: Self = Self::new(126);
    /// Ignore - not loaded / unknown content.
    pub const IGNORE: Self = Self::new(127);

    /// Creates a node with the given content ID.
    #[inline]
    #[must_use]
    pub const fn new(content: u16) -> Self {
        Self { content, param: 0 }
    }

    /// Creates a node with content ID and parameter.
    #[inline]
    #[must_use]
    pub const fn with_param(content: u16, param: u16) -> Self {
        Self { content, param }
    }

    /// Returns true for air.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.content == Self::AIR.content
    }

    /// Returns true if a generator may write over this node.
    ///
    /// Only air and unknown content are replaceable.
    #[inline]
    #[must_use]
    pub const fn is_replaceable(self) -> bool {
        self.content == Self::AIR.content || self.content == Self::IGNORE.content
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::AIR
    }
}

/// Maps symbolic node names to identifiers.
pub trait NodeResolver {
    /// Returns the identifier registered under `name`.
    fn resolve_identifier(&self, name: &str) -> Option<Node>;

    /// Like [`resolve_identifier`](Self::resolve_identifier), failing with
    /// [`TreegenError::UnknownNode`].
    ///
    /// # Errors
    ///
    /// Returns `UnknownNode` if the name is not registered.
    fn require(&self, name: &str) -> TreegenResult<Node> {
        self.resolve_identifier(name)
            .ok_or_else(|| TreegenError::UnknownNode(name.to_owned()))
    }
}

/// In-memory name to node table.
#[derive(Clone, Debug)]
pub struct NodeRegistry {
    by_name: HashMap<String, Node>,
}

impl NodeRegistry {
    /// Creates a registry holding only `air` and `ignore`.
    #[must_use]
    pub fn new() -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("air".to_owned(), Node::AIR);
        by_name.insert("ignore".to_owned(), Node::IGNORE);
        Self { by_name }
    }

    /// Registers (or replaces) a name.
    pub fn register(&mut self, name: impl Into<String>, node: Node) -> &mut Self {
        self.by_name.insert(name.into(), node);
        self
    }

    /// Number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Always false: `air` and `ignore` are always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeResolver for NodeRegistry {
    fn resolve_identifier(&self, name: &str) -> Option<Node> {
        self.by_name.get(name).copied()
    }
}

/// Node identifiers for every role a simple tree or sapling stamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRoles {
    /// Trunk.
    pub trunk: Node,
    /// Primary leaves.
    pub leaves: Node,
    /// Alternate leaves.
    pub leaves_alt: Node,
    /// Fruit.
    pub fruit: Node,
    /// Ground support under thick trunks.
    pub dirt: Node,
    /// Sapling marker.
    pub sapling: Node,
}

impl NodeRoles {
    /// Registry name of the trunk role.
    pub const TRUNK: &'static str = "mapgen_tree";
    /// Registry name of the leaves role.
    pub const LEAVES: &'static str = "mapgen_leaves";
    /// Registry name of the fruit role.
    pub const FRUIT: &'static str = "mapgen_apple";
    /// Registry name of the dirt role.
    pub const DIRT: &'static str = "mapgen_dirt";
    /// Registry name of the sapling role.
    pub const SAPLING: &'static str = "mapgen_jsapling";

    /// Resolves every role once.
    ///
    /// Alternate leaves share the primary leaves node.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNode` for the first role name that is not registered.
    pub fn resolve(resolver: &impl NodeResolver) -> TreegenResult<Self> {
        let leaves = resolver.require(Self::LEAVES)?;
        Ok(Self {
            trunk: resolver.require(Self::TRUNK)?,
            leaves,
            leaves_alt: leaves,
            fruit: resolver.require(Self::FRUIT)?,
            dirt: resolver.require(Self::DIRT)?,
            sapling: resolver.require(Self::SAPLING)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapgen_registry() -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        registry
            .register(NodeRoles::TRUNK, Node::new(10))
            .register(NodeRoles::LEAVES, Node::new(11))
            .register(NodeRoles::FRUIT, Node::new(12))
            .register(NodeRoles::DIRT, Node::new(13))
            .register(NodeRoles::SAPLING, Node::new(14));
        registry
    }

    #[test]
    fn test_replaceable_contents() {
        assert!(Node::AIR.is_replaceable());
        assert!(Node::IGNORE.is_replaceable());
        assert!(!Node::new(1).is_replaceable());
        assert!(Node::AIR.is_air());
        assert!(!Node::IGNORE.is_air());
    }

    #[test]
    fn test_node_layout() {
        assert_eq!(std::mem::size_of::<Node>(), 4);
        let node = Node::with_param(0x0102, 0x0304);
        let bytes = bytemuck::bytes_of(&node);
        assert_eq!(bytes.len(), 4);
    }

    #[test]
    fn test_roles_resolve() {
        let roles = NodeRoles::resolve(&mapgen_registry()).unwrap();
        assert_eq!(roles.trunk, Node::new(10));
        assert_eq!(roles.leaves_alt, roles.leaves);
        assert_eq!(roles.sapling, Node::new(14));
    }

    #[test]
    fn test_roles_missing_name() {
        let mut registry = NodeRegistry::new();
        registry.register(NodeRoles::LEAVES, Node::new(11));
        let err = NodeRoles::resolve(&registry).unwrap_err();
        assert_eq!(err, TreegenError::UnknownNode(NodeRoles::TRUNK.to_owned()));
    }
}
