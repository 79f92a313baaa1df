//! # Spawning Into a Map
//!
//! Emerge, generate, commit.
//!
//! A generator only ever sees a [`VoxelBuffer`]. The spawner stages the
//! surrounding map blocks into one, runs the generator, then writes the
//! result back, relights the touched blocks and announces the edit.
//! A failed grammar tree is never committed.

use std::collections::{BTreeSet, HashMap};

use sylvan_shared::NodePos;
use tracing::debug;

use crate::error::TreegenResult;
use crate::grammar::GrowthGrammar;
use crate::ltree::generate_grammar_tree;
use crate::node::{Node, NodeRoles};
use crate::simple_tree::generate_simple_tree;
use crate::volume::{block_position, VoxelArea, VoxelBuffer};

/// Kind of a map edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapEditKind {
    /// Bulk edit that is not a single node add or remove.
    Other,
}

/// Notification sent after a commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapEditEvent {
    /// Edit kind. Tree spawns are always [`MapEditKind::Other`].
    pub kind: MapEditKind,
    /// Map blocks touched by the edit.
    pub modified_blocks: BTreeSet<NodePos>,
}

/// The map side of a spawn.
pub trait MapBackend {
    /// Stages the nodes of `area` into a fresh buffer.
    fn emerge(&mut self, area: VoxelArea) -> VoxelBuffer;

    /// Writes the buffer's written cells back and returns the modified
    /// map blocks.
    fn blit_back(&mut self, buffer: &VoxelBuffer) -> BTreeSet<NodePos>;

    /// Recomputes lighting for `blocks`.
    fn update_lighting(&mut self, blocks: &BTreeSet<NodePos>);

    /// Announces a committed edit.
    fn dispatch_event(&mut self, event: &MapEditEvent);
}

/// Map blocks staged around a grammar tree: one block of margin on each
/// side and three above.
#[must_use]
pub const fn grammar_tree_area(anchor: NodePos) -> VoxelArea {
    let block = block_position(anchor);
    VoxelArea::from_blocks(block.offset(-1, -1, -1), block.offset(1, 3, 1))
}

/// Map blocks staged around a simple tree: one block of margin on each
/// side and two above.
#[must_use]
pub const fn simple_tree_area(anchor: NodePos) -> VoxelArea {
    let block = block_position(anchor);
    VoxelArea::from_blocks(block.offset(-1, -1, -1), block.offset(1, 2, 1))
}

/// Spawns a grammar tree at `anchor`.
///
/// # Errors
///
/// Propagates generation errors. Nothing reaches the map in that case.
pub fn spawn_grammar_tree<M: MapBackend + ?Sized>(
    map: &mut M,
    anchor: NodePos,
    grammar: &GrowthGrammar,
) -> TreegenResult<MapEditEvent> {
    let area = grammar_tree_area(anchor);
    debug!(anchor = ?anchor, area = ?area, "emerging grammar tree");
    let mut buffer = map.emerge(area);
    generate_grammar_tree(&mut buffer, anchor, grammar)?;
    Ok(commit(map, &buffer))
}

/// Spawns a simple tree at `anchor`.
pub fn spawn_simple_tree<M: MapBackend + ?Sized>(
    map: &mut M,
    anchor: NodePos,
    is_fruiting: bool,
    roles: &NodeRoles,
    seed: i32,
) -> MapEditEvent {
    let area = simple_tree_area(anchor);
    debug!(anchor = ?anchor, area = ?area, is_fruiting, "emerging simple tree");
    let mut buffer = map.emerge(area);
    generate_simple_tree(&mut buffer, anchor, is_fruiting, roles, seed);
    commit(map, &buffer)
}

fn commit<M: MapBackend + ?Sized>(map: &mut M, buffer: &VoxelBuffer) -> MapEditEvent {
    let modified_blocks = map.blit_back(buffer);
    map.update_lighting(&modified_blocks);
    let event = MapEditEvent {
        kind: MapEditKind::Other,
        modified_blocks,
    };
    map.dispatch_event(&event);
    debug!(
        area = ?buffer.area(),
        nodes = buffer.write_count(),
        blocks = event.modified_blocks.len(),
        "tree committed"
    );
    event
}

/// Sparse in-memory map.
///
/// Blocks that were never written read as air. Emerged areas, lighting
/// updates and events are recorded instead of acted on.
#[derive(Clone, Debug, Default)]
pub struct MemoryMap {
    blocks: HashMap<NodePos, Vec<Node>>,
    emerged: Vec<VoxelArea>,
    lighting_updates: Vec<BTreeSet<NodePos>>,
    events: Vec<MapEditEvent>,
}

impl MemoryMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Node at `p`.
    #[must_use]
    pub fn get_node(&self, p: NodePos) -> Node {
        let block = block_position(p);
        self.blocks
            .get(&block)
            .map_or(Node::AIR, |nodes| nodes[VoxelArea::from_blocks(block, block).index(p)])
    }

    /// Sets the node at `p`, allocating its block if needed.
    pub fn set_node(&mut self, p: NodePos, node: Node) {
        let block = block_position(p);
        let area = VoxelArea::from_blocks(block, block);
        let nodes = self
            .blocks
            .entry(block)
            .or_insert_with(|| vec![Node::AIR; area.volume()]);
        nodes[area.index(p)] = node;
    }

    /// Number of allocated blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Areas passed to [`MapBackend::emerge`], in order.
    #[must_use]
    pub fn emerged_areas(&self) -> &[VoxelArea] {
        &self.emerged
    }

    /// Block sets passed to [`MapBackend::update_lighting`], in order.
    #[must_use]
    pub fn lighting_updates(&self) -> &[BTreeSet<NodePos>] {
        &self.lighting_updates
    }

    /// Dispatched events, in order.
    #[must_use]
    pub fn events(&self) -> &[MapEditEvent] {
        &self.events
    }
}

impl MapBackend for MemoryMap {
    fn emerge(&mut self, area: VoxelArea) -> VoxelBuffer {
        self.emerged.push(area);
        let mut buffer = VoxelBuffer::filled(area, Node::AIR);
        for (&block, nodes) in &self.blocks {
            let block_area = VoxelArea::from_blocks(block, block);
            for (i, &node) in nodes.iter().enumerate() {
                buffer.stage(block_area.position(i), node);
            }
        }
        buffer
    }

    fn blit_back(&mut self, buffer: &VoxelBuffer) -> BTreeSet<NodePos> {
        for (p, node) in buffer.written() {
            self.set_node(p, node);
        }
        buffer.modified_blocks()
    }

    fn update_lighting(&mut self, blocks: &BTreeSet<NodePos>) {
        self.lighting_updates.push(blocks.clone());
    }

    fn dispatch_event(&mut self, event: &MapEditEvent) {
        self.events.push(event.clone());
    }
}
