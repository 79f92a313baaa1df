//! # Voxel Volume
//!
//! Generators write into a bounded, pre-staged region of the map. The
//! region is owned by the caller and mutably borrowed for exactly one
//! generation call.
//!
//! ## Layout
//!
//! [`VoxelBuffer`] stores nodes in a flat array indexed x-fastest, then y,
//! then z. Writes are tracked per cell so the caller can commit only what
//! changed and work out which map blocks need relighting.

use std::collections::BTreeSet;

use sylvan_shared::NodePos;

use crate::node::Node;

/// Map block edge length in nodes.
pub const MAP_BLOCK_SIZE: i32 = 16;

/// Returns the map block containing a node position.
#[inline]
#[must_use]
pub const fn block_position(p: NodePos) -> NodePos {
    p.div_euclid(MAP_BLOCK_SIZE)
}

/// Inclusive axis-aligned box of node positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoxelArea {
    /// Lowest corner (inclusive).
    pub min: NodePos,
    /// Highest corner (inclusive).
    pub max: NodePos,
}

impl VoxelArea {
    /// Creates an area from two inclusive corners.
    #[inline]
    #[must_use]
    pub const fn new(min: NodePos, max: NodePos) -> Self {
        Self { min, max }
    }

    /// Area covering the map blocks `min_block..=max_block`.
    #[inline]
    #[must_use]
    pub const fn from_blocks(min_block: NodePos, max_block: NodePos) -> Self {
        Self {
            min: min_block.scale(MAP_BLOCK_SIZE),
            max: max_block
                .scale(MAP_BLOCK_SIZE)
                .offset(MAP_BLOCK_SIZE - 1, MAP_BLOCK_SIZE - 1, MAP_BLOCK_SIZE - 1),
        }
    }

    /// Cube of half-width `radius` centred on `center`.
    #[inline]
    #[must_use]
    pub const fn around(center: NodePos, radius: i32) -> Self {
        Self {
            min: center.offset(-radius, -radius, -radius),
            max: center.offset(radius, radius, radius),
        }
    }

    /// Returns true if the area holds no cells.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Edge lengths in nodes.
    #[inline]
    #[must_use]
    pub const fn extent(&self) -> NodePos {
        if self.is_empty() {
            return NodePos::ZERO;
        }
        NodePos::new(
            self.max.x - self.min.x + 1,
            self.max.y - self.min.y + 1,
            self.max.z - self.min.z + 1,
        )
    }

    /// Number of cells.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn volume(&self) -> usize {
        let e = self.extent();
        e.x as usize * e.y as usize * e.z as usize
    }

    /// Bounds test.
    #[inline]
    #[must_use]
    pub const fn contains(&self, p: NodePos) -> bool {
        p.x >= self.min.x
            && p.y >= self.min.y
            && p.z >= self.min.z
            && p.x <= self.max.x
            && p.y <= self.max.y
            && p.z <= self.max.z
    }

    /// Flat index of a contained position.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn index(&self, p: NodePos) -> usize {
        let e = self.extent();
        let local = NodePos::new(p.x - self.min.x, p.y - self.min.y, p.z - self.min.z);
        (local.z as usize * e.y as usize + local.y as usize) * e.x as usize + local.x as usize
    }

    /// Position of a flat index (inverse of [`index`](Self::index)).
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub const fn position(&self, index: usize) -> NodePos {
        let e = self.extent();
        let (ex, ey) = (e.x as usize, e.y as usize);
        let x = index % ex;
        let y = (index / ex) % ey;
        let z = index / (ex * ey);
        self.min.offset(x as i32, y as i32, z as i32)
    }
}

/// A bounded region of nodes a generator may read and write.
///
/// Writes are only meaningful where [`contains`](Self::contains) holds;
/// generators check bounds before every write.
pub trait VoxelVolume {
    /// Bounds test against the staged region.
    fn contains(&self, p: NodePos) -> bool;

    /// Node at `p`. Positions outside the region read as [`Node::IGNORE`].
    fn read(&self, p: NodePos) -> Node;

    /// Stores `node` at `p`.
    fn write(&mut self, p: NodePos, node: Node);
}

/// Owned, flat voxel buffer over a [`VoxelArea`].
#[derive(Clone, Debug)]
pub struct VoxelBuffer {
    area: VoxelArea,
    /// Node data (indexed by `area.index`).
    nodes: Vec<Node>,
    /// Per-cell write flags.
    dirty: Vec<bool>,
}

impl VoxelBuffer {
    /// Creates a buffer where every cell is [`Node::IGNORE`].
    #[must_use]
    pub fn new(area: VoxelArea) -> Self {
        Self::filled(area, Node::IGNORE)
    }

    /// Creates a buffer where every cell holds `fill`.
    #[must_use]
    pub fn filled(area: VoxelArea, fill: Node) -> Self {
        let len = area.volume();
        Self {
            area,
            nodes: vec![fill; len],
            dirty: vec![false; len],
        }
    }

    /// The staged region.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> VoxelArea {
        self.area
    }

    /// Sets a node without marking it written.
    ///
    /// Used while staging the buffer from the map.
    #[inline]
    pub fn stage(&mut self, p: NodePos, node: Node) {
        if self.area.contains(p) {
            let i = self.area.index(p);
            self.nodes[i] = node;
        }
    }

    /// Number of cells written since creation.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.dirty.iter().filter(|&&d| d).count()
    }

    /// Written cells with their current nodes, in index order.
    pub fn written(&self) -> impl Iterator<Item = (NodePos, Node)> + '_ {
        self.dirty
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d)
            .map(|(i, _)| (self.area.position(i), self.nodes[i]))
    }

    /// Map blocks that contain at least one written cell.
    #[must_use]
    pub fn modified_blocks(&self) -> BTreeSet<NodePos> {
        self.written().map(|(p, _)| block_position(p)).collect()
    }

    /// Raw node data as bytes.
    ///
    /// Two buffers over the same area hold the same nodes exactly when
    /// these slices are equal.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }

    /// Counts cells holding `node`.
    #[must_use]
    pub fn count(&self, node: Node) -> usize {
        self.nodes.iter().filter(|&&n| n == node).count()
    }
}

impl VoxelVolume for VoxelBuffer {
    #[inline]
    fn contains(&self, p: NodePos) -> bool {
        self.area.contains(p)
    }

    #[inline]
    fn read(&self, p: NodePos) -> Node {
        if self.area.contains(p) {
            self.nodes[self.area.index(p)]
        } else {
            Node::IGNORE
        }
    }

    #[inline]
    fn write(&mut self, p: NodePos, node: Node) {
        if self.area.contains(p) {
            let i = self.area.index(p);
            self.nodes[i] = node;
            self.dirty[i] = true;
        }
    }
}
