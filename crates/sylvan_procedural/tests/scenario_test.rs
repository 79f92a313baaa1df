//! # Reference Tree Scenarios
//!
//! Two fixed trees whose shape is pinned down:
//! - a seeded grammar tree, compared against a recorded voxel set
//! - an apple tree, checked for trunk height, canopy shape and fruit rate

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use sylvan_procedural::simple_tree::{count_in_canopy, in_canopy, FRUIT_TREE_HEIGHT};
use sylvan_procedural::{
    generate_grammar_tree, generate_simple_tree, GrowthGrammar, Node, NodeRoles, PseudoRandom,
    RuleSlot, VoxelArea, VoxelBuffer, VoxelVolume,
};
use sylvan_shared::NodePos;

const TRUNK: Node = Node::new(10);
const LEAVES: Node = Node::new(11);
const FRUIT: Node = Node::new(13);
const DIRT: Node = Node::new(14);

fn roles() -> NodeRoles {
    NodeRoles {
        trunk: TRUNK,
        leaves: LEAVES,
        leaves_alt: LEAVES,
        fruit: FRUIT,
        dirt: DIRT,
        sapling: Node::new(15),
    }
}

fn nested_branch_grammar() -> GrowthGrammar {
    GrowthGrammar::new("FFFA", &roles())
        .with_rule(RuleSlot::A, "[&FFA]")
        .with_angle(30.0)
        .with_iterations(1, 0)
        .with_seed(42)
}

/// One line per written cell, relative to the anchor.
fn render(volume: &VoxelBuffer, anchor: NodePos) -> String {
    let mut out = String::new();
    for (p, node) in volume.written() {
        let d = p - anchor;
        let _ = writeln!(out, "{} {} {} {}", d.x, d.y, d.z, node.content);
    }
    out
}

/// Compares against `tests/golden/<name>`.
///
/// A missing file is a failure. Run with `UPDATE_GOLDEN=1` to re-record.
fn check_golden(name: &str, actual: &str) {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "golden", name]
        .iter()
        .collect();
    if std::env::var_os("UPDATE_GOLDEN").is_some() {
        fs::write(&path, actual).unwrap();
        println!("Recorded golden file {}", path.display());
        return;
    }
    let expected = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("missing golden file {}: {e}", path.display()));
    assert_eq!(actual, expected, "voxel set drifted from {}", path.display());
}

/// Test: Scenario A expands to two nested branches.
#[test]
fn test_scenario_a_production() {
    let grammar = nested_branch_grammar();
    let mut rng = PseudoRandom::new(42);
    let passes = grammar.effective_iterations(&mut rng);
    assert_eq!(passes, 2, "one requested pass is floored to two");
    assert_eq!(grammar.expand(passes, &mut rng), "FFF[&FF[&FFA]]");
}

/// Test: Scenario A grows a three-node vertical trunk, then branches
/// tilting away from it, and matches its recorded voxel set.
#[test]
fn test_scenario_a_voxels() {
    let anchor = NodePos::new(10, 5, -10);
    let grammar = nested_branch_grammar();
    let area = VoxelArea::around(anchor, 12);

    let mut volume = VoxelBuffer::filled(area, Node::AIR);
    generate_grammar_tree(&mut volume, anchor, &grammar).unwrap();

    // Vertical trunk, plus the first branch node right on top of it
    for y in 0..=3 {
        assert_eq!(volume.read(anchor.offset(0, y, 0)), TRUNK, "trunk at height {y}");
    }
    assert_eq!(volume.count(DIRT), 0, "single trunks get no ground support");
    assert_eq!(volume.count(FRUIT), 0);
    assert!(volume.count(LEAVES) > 0, "branch segments carry leaf clusters");

    for (p, node) in volume.written() {
        let d = p - anchor;
        assert!(d.y >= 0, "nothing grows below the anchor: {d:?}");
        if node == TRUNK {
            // Pitch only: the tree stays in the anchor's x-plane, leaning to -z
            assert_eq!(d.x, 0, "trunk off-plane at {d:?}");
            assert!(d.z <= 0, "trunk leaning the wrong way at {d:?}");
        }
    }

    assert_eq!(volume.count(TRUNK), 5);
    assert_eq!(volume.read(anchor.offset(0, 5, -1)), TRUNK, "leaning branch segment");
    assert_eq!(volume.count(LEAVES), 73);

    check_golden("scenario_a.txt", &render(&volume, anchor));
}

/// Test: Scenario B apple tree has a fixed trunk and a bounded canopy.
#[test]
fn test_scenario_b_apple_tree_shape() {
    let anchor = NodePos::new(0, 100, 0);
    let roles = roles();
    let area = VoxelArea::new(anchor.offset(-4, -1, -4), anchor.offset(4, 10, 4));

    for seed in [0, 7, 42, 1234] {
        let mut volume = VoxelBuffer::filled(area, Node::AIR);
        generate_simple_tree(&mut volume, anchor, true, &roles, seed);

        for y in 0..=FRUIT_TREE_HEIGHT {
            assert_eq!(volume.read(anchor.offset(0, y, 0)), TRUNK, "seed {seed}, height {y}");
        }
        assert_ne!(volume.read(anchor.offset(0, FRUIT_TREE_HEIGHT + 1, 0)), TRUNK);
        assert_eq!(volume.read(anchor.offset(0, -1, 0)), Node::AIR);

        let top = anchor.offset(0, FRUIT_TREE_HEIGHT, 0);
        for (p, node) in volume.written() {
            if node == TRUNK {
                continue;
            }
            let d = p - top;
            assert!(in_canopy(d.x, d.y, d.z), "seed {seed}: canopy cell {d:?} out of bound");
        }
    }
}

/// Test: Roughly one canopy cell in ten is fruit.
#[test]
#[allow(clippy::cast_precision_loss)]
fn test_scenario_b_fruit_rate() {
    let anchor = NodePos::new(0, 100, 0);
    let roles = roles();
    let area = VoxelArea::new(anchor.offset(-4, -1, -4), anchor.offset(4, 10, 4));
    let top = anchor.offset(0, FRUIT_TREE_HEIGHT, 0);

    let mut fruit = 0;
    let mut canopy = 0;
    for seed in 0..300 {
        let mut volume = VoxelBuffer::filled(area, Node::AIR);
        generate_simple_tree(&mut volume, anchor, true, &roles, seed);
        let apples = count_in_canopy(&volume, top, FRUIT);
        fruit += apples;
        canopy += apples + count_in_canopy(&volume, top, LEAVES);
    }

    let rate = fruit as f64 / canopy as f64;
    println!("Fruit rate: {:.3} ({fruit} / {canopy})", rate);
    assert!(canopy > 10_000, "canopies too sparse: {canopy}");
    assert!((0.07..0.13).contains(&rate), "fruit rate {rate:.3}, expected ~0.10");
}
