//! # Placement Policy
//!
//! Decides which node lands in which cell.
//!
//! Every placement follows the same two preconditions:
//! 1. The target (nearest lattice point of the real position) must be
//!    inside the volume; otherwise the placement is skipped.
//! 2. The target must hold air or unknown content; solid content is
//!    never overwritten.
//!
//! Neither condition is an error. Procedural growth routinely probes
//! cells that are occupied or outside the staged region.

use sylvan_shared::{NodePos, Vec3};

use crate::grammar::GrowthGrammar;
use crate::node::Node;
use crate::random::PseudoRandom;
use crate::volume::VoxelVolume;

/// Density of cluster leaves when fruit is disabled: a `range(1, 100)`
/// draw must exceed this.
const CLUSTER_LEAF_SKIP: i32 = 20;

/// Writes `node` at `p` if `p` is inside the volume and replaceable.
///
/// Returns whether the node was written.
#[inline]
pub fn place_at<V: VoxelVolume + ?Sized>(volume: &mut V, p: NodePos, node: Node) -> bool {
    if !volume.contains(p) || !volume.read(p).is_replaceable() {
        return false;
    }
    volume.write(p, node);
    true
}

/// [`place_at`] for a real-valued position, rounded to the nearest cell.
#[inline]
pub fn place_node<V: VoxelVolume + ?Sized>(volume: &mut V, p: Vec3, node: Node) -> bool {
    place_at(volume, p.round(), node)
}

/// Returns true with `chance` percent probability: `range(1, 100) > 100 - chance`.
#[inline]
fn roll_percent(rng: &mut PseudoRandom, chance: u8) -> bool {
    rng.range(1, 100) > 100 - i32::from(chance)
}

/// Per-symbol placement rules of one grammar tree.
///
/// Borrows the volume for the duration of one generation call.
pub struct Placement<'a, V: VoxelVolume + ?Sized> {
    volume: &'a mut V,
    grammar: &'a GrowthGrammar,
}

impl<'a, V: VoxelVolume + ?Sized> Placement<'a, V> {
    /// Creates the placement policy for one tree.
    pub fn new(volume: &'a mut V, grammar: &'a GrowthGrammar) -> Self {
        Self { volume, grammar }
    }

    /// Stamps dirt under the thickening footprint of the anchor so thick
    /// trunks never start floating.
    ///
    /// Single trunks get no ground support.
    pub fn ground_support(&mut self, anchor: Vec3) {
        for &(dx, dz) in self.grammar.trunk_style.thickening_offsets() {
            place_node(
                self.volume,
                anchor + offset(dx, -1, dz),
                self.grammar.dirt_node,
            );
        }
    }

    /// Trunk cell, plus the style's extra cells when `thick`.
    pub fn trunk(&mut self, at: Vec3, thick: bool) {
        let node = self.grammar.trunk_node;
        place_node(self.volume, at, node);
        if thick {
            for &(dx, dz) in self.grammar.trunk_style.thickening_offsets() {
                place_node(self.volume, at + offset(dx, 0, dz), node);
            }
        }
    }

    /// Leaf cluster around a branch segment.
    ///
    /// For each of the 8 corners of the unit cube around `at`, four sites
    /// shifted by +x, -x, +z and -z. Each site draws its own forked stream.
    pub fn leaf_cluster(&mut self, at: Vec3, rng: &mut PseudoRandom) {
        for x in [-1, 1] {
            for y in [-1, 1] {
                for z in [-1, 1] {
                    let corner = at + offset(x, y, z);
                    for (dx, dz) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                        self.cluster_leaf(corner + offset(dx, 0, dz), rng.fork());
                    }
                }
            }
        }
    }

    /// One cluster site: alternate-leaf selection, then fruit substitution
    /// or density thinning.
    fn cluster_leaf(&mut self, at: Vec3, mut rng: PseudoRandom) {
        let leaves = self.leaf_variant(&mut rng);
        let p = at.round();
        if !self.volume.contains(p) || !self.volume.read(p).is_replaceable() {
            return;
        }
        let fruit_chance = self.grammar.fruit_chance;
        if fruit_chance > 0 {
            let node = if roll_percent(&mut rng, fruit_chance) {
                self.grammar.fruit_node
            } else {
                leaves
            };
            self.volume.write(p, node);
        } else if rng.range(1, 100) > CLUSTER_LEAF_SKIP {
            self.volume.write(p, leaves);
        }
    }

    /// Single leaf, always placed when the cell allows it.
    pub fn single_leaf(&mut self, at: Vec3, mut rng: PseudoRandom) {
        let leaves = self.leaf_variant(&mut rng);
        place_node(self.volume, at, leaves);
    }

    /// Explicit fruit.
    pub fn fruit(&mut self, at: Vec3) {
        place_node(self.volume, at, self.grammar.fruit_node);
    }

    fn leaf_variant(&self, rng: &mut PseudoRandom) -> Node {
        if roll_percent(rng, self.grammar.leaves_alt_chance) {
            self.grammar.leaves_alt_node
        } else {
            self.grammar.leaves_node
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn offset(dx: i32, dy: i32, dz: i32) -> Vec3 {
    Vec3::new(dx as f32, dy as f32, dz as f32)
}
