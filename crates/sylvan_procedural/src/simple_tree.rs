//! # Footprint Trees
//!
//! Grammar-free fallback for ordinary and fruit trees: a straight trunk
//! capped with a randomized, roughly octahedral canopy.

use sylvan_shared::NodePos;

use crate::node::{Node, NodeRoles};
use crate::random::PseudoRandom;
use crate::volume::VoxelVolume;

/// Shortest random trunk.
pub const TRUNK_MIN_HEIGHT: i32 = 5;
/// Tallest random trunk.
pub const TRUNK_MAX_HEIGHT: i32 = 11;
/// Trunk height of fruit trees.
pub const FRUIT_TREE_HEIGHT: i32 = 5;
/// Half-width of the canopy cube.
pub const CANOPY_RADIUS: i32 = 3;
/// Bound on each pairwise coordinate sum (`|x|+|z|`, `|x|+|y|`, `|y|+|z|`).
pub const CANOPY_BOUND: i32 = 5;

/// Canopy cells survive when a `range(0, 29)` draw is at most this.
const CANOPY_GAP_CUTOFF: i32 = 22;
/// Percent of fruit-tree canopy cells that become fruit.
const FRUIT_PERCENT: i32 = 10;

/// Returns true if a canopy offset lies inside the rounded canopy.
#[inline]
#[must_use]
pub const fn in_canopy(x: i32, y: i32, z: i32) -> bool {
    x.abs() + z.abs() <= CANOPY_BOUND
        && x.abs() + y.abs() <= CANOPY_BOUND
        && y.abs() + z.abs() <= CANOPY_BOUND
}

/// Grows a simple tree at `anchor`.
///
/// The trunk rises `height` cells above the anchor (the anchor cell
/// included, so `height + 1` cells); the canopy is centred on its top.
/// Never fails: cells outside the volume or already occupied are skipped,
/// and occupied canopy cells draw no fruit roll.
pub fn generate_simple_tree<V: VoxelVolume + ?Sized>(
    volume: &mut V,
    anchor: NodePos,
    is_fruiting: bool,
    roles: &NodeRoles,
    seed: i32,
) {
    let mut rng = PseudoRandom::new(seed);

    let mut height = rng.range(TRUNK_MIN_HEIGHT, TRUNK_MAX_HEIGHT);
    if is_fruiting {
        height = FRUIT_TREE_HEIGHT;
    }

    for step in 0..=height {
        let p = anchor.offset(0, step, 0);
        // The ground step replaces whatever is there
        if volume.contains(p) && (step == 0 || volume.read(p).is_air()) {
            volume.write(p, roles.trunk);
        }
    }

    let top = anchor.offset(0, height, 0);
    for z in -CANOPY_RADIUS..=CANOPY_RADIUS {
        for y in -CANOPY_RADIUS..=CANOPY_RADIUS {
            for x in -CANOPY_RADIUS..=CANOPY_RADIUS {
                let p = top.offset(x, y, z);
                if !volume.contains(p) {
                    continue;
                }
                if rng.range(0, 29) > CANOPY_GAP_CUTOFF {
                    continue;
                }
                if !in_canopy(x, y, z) || !volume.read(p).is_replaceable() {
                    continue;
                }
                let node = if is_fruiting && rng.range(0, 99) < FRUIT_PERCENT {
                    roles.fruit
                } else {
                    roles.leaves
                };
                volume.write(p, node);
            }
        }
    }
}

/// Stamps a single sapling marker at `anchor`.
///
/// Overwrites whatever is there; only the bounds are checked.
pub fn generate_sapling_marker<V: VoxelVolume + ?Sized>(
    volume: &mut V,
    anchor: NodePos,
    roles: &NodeRoles,
) {
    if volume.contains(anchor) {
        volume.write(anchor, roles.sapling);
    }
}

/// Counts a node inside the canopy cube of a tree whose trunk top is `top`.
#[must_use]
pub fn count_in_canopy<V: VoxelVolume + ?Sized>(volume: &V, top: NodePos, node: Node) -> usize {
    let mut count = 0;
    for z in -CANOPY_RADIUS..=CANOPY_RADIUS {
        for y in -CANOPY_RADIUS..=CANOPY_RADIUS {
            for x in -CANOPY_RADIUS..=CANOPY_RADIUS {
                if volume.read(top.offset(x, y, z)) == node {
                    count += 1;
                }
            }
        }
    }
    count
}
