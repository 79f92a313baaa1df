//! # Spawn Orchestration Tests
//!
//! End to end: tree definition file, node registry, map backend.
//! Verifies the emerge/generate/commit lifecycle and that failed trees
//! never reach the map.

use sylvan_procedural::spawn::{grammar_tree_area, simple_tree_area};
use sylvan_procedural::volume::block_position;
use sylvan_procedural::{
    spawn_grammar_tree, spawn_simple_tree, GrammarDefinition, MapEditKind, MemoryMap, Node,
    NodeRegistry, NodeRoles, TreegenError,
};
use sylvan_shared::NodePos;

const TREE: Node = Node::new(30);
const LEAVES: Node = Node::new(31);
const APPLE: Node = Node::new(32);
const DIRT: Node = Node::new(33);
const SAPLING: Node = Node::new(34);
const STONE: Node = Node::new(40);

const APPLE_TREE: &str = r#"
    axiom = "FFFFFAFFBF"
    rules_a = "[&&&FFFFF&&FFFF][&&&++++FFFFF&&FFFF][&&&----FFFFF&&FFFF]"
    rules_b = "[&&&++FFFF&&FFFF][&&&--FFFF&&FFFF][&&&------FFFF&&FFFF]"
    trunk = "default:tree"
    leaves = "default:leaves"
    angle = 30
    iterations = 2
    random_level = 0
    trunk_type = "single"
    thin_branches = true
    fruit_chance = 10
    fruit = "default:apple"
"#;

fn registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    registry
        .register("default:tree", TREE)
        .register("default:leaves", LEAVES)
        .register("default:apple", APPLE)
        .register(NodeRoles::TRUNK, TREE)
        .register(NodeRoles::LEAVES, LEAVES)
        .register(NodeRoles::FRUIT, APPLE)
        .register(NodeRoles::DIRT, DIRT)
        .register(NodeRoles::SAPLING, SAPLING);
    registry
}

/// Flat stone ground below `y = 0`.
fn ground(map: &mut MemoryMap, anchor: NodePos, radius: i32) {
    for z in -radius..=radius {
        for x in -radius..=radius {
            map.set_node(NodePos::new(anchor.x + x, anchor.y - 1, anchor.z + z), STONE);
        }
    }
}

/// Test: A definition file spawns a tree and announces a single edit.
#[test]
fn test_spawn_grammar_tree_from_definition() {
    let grammar = GrammarDefinition::from_toml_str(APPLE_TREE)
        .unwrap()
        .resolve(&registry())
        .unwrap();
    let anchor = NodePos::new(40, 0, -25);
    let mut map = MemoryMap::new();
    ground(&mut map, anchor, 6);

    let event = spawn_grammar_tree(&mut map, anchor, &grammar).unwrap();

    assert_eq!(event.kind, MapEditKind::Other);
    assert_eq!(map.emerged_areas(), &[grammar_tree_area(anchor)]);
    assert!(event.modified_blocks.contains(&block_position(anchor)));
    assert_eq!(map.events(), std::slice::from_ref(&event));
    assert_eq!(map.lighting_updates(), std::slice::from_ref(&event.modified_blocks));

    for y in 0..5 {
        assert_eq!(map.get_node(anchor.offset(0, y, 0)), TREE, "trunk at height {y}");
    }
    assert_eq!(map.get_node(anchor.offset(0, -1, 0)), STONE);

    // Every modified block lies inside the emerged region
    let area = grammar_tree_area(anchor);
    for block in &event.modified_blocks {
        assert!(area.contains(block.scale(16)), "block {block:?} outside the emerged region");
    }
}

/// Test: Spawning twice into identical maps gives identical maps.
#[test]
fn test_spawn_is_deterministic() {
    let grammar = GrammarDefinition::from_toml_str(APPLE_TREE)
        .unwrap()
        .resolve(&registry())
        .unwrap();
    let anchor = NodePos::new(-7, 12, 3);

    let mut first = MemoryMap::new();
    let mut second = MemoryMap::new();
    let a = spawn_grammar_tree(&mut first, anchor, &grammar).unwrap();
    let b = spawn_grammar_tree(&mut second, anchor, &grammar).unwrap();
    assert_eq!(a, b);

    let area = grammar_tree_area(anchor);
    for i in 0..area.volume() {
        let p = area.position(i);
        assert_eq!(first.get_node(p), second.get_node(p), "maps differ at {p:?}");
    }
}

/// Test: A tree that fails to generate leaves the map untouched.
#[test]
fn test_failed_tree_is_not_committed() {
    let definition = GrammarDefinition::from_toml_str(
        r#"
        axiom = "FFF]FF"
        trunk = "default:tree"
        leaves = "default:leaves"
        "#,
    )
    .unwrap();
    let grammar = definition.resolve(&registry()).unwrap();
    let mut map = MemoryMap::new();

    let err = spawn_grammar_tree(&mut map, NodePos::ZERO, &grammar).unwrap_err();
    assert_eq!(err, TreegenError::UnbalancedBrackets { index: 3 });
    assert_eq!(map.block_count(), 0);
    assert_eq!(map.emerged_areas().len(), 1, "staged, then discarded");
    assert!(map.events().is_empty());
    assert!(map.lighting_updates().is_empty());
}

/// Test: Unknown node names are reported before anything is generated.
#[test]
fn test_unknown_node_in_definition() {
    let definition = GrammarDefinition::from_toml_str(
        r#"
        axiom = "F"
        trunk = "default:tree"
        leaves = "default:leaves"
        fruit = "default:pear"
        fruit_chance = 5
        "#,
    )
    .unwrap();
    assert_eq!(
        definition.resolve(&registry()).unwrap_err(),
        TreegenError::UnknownNode("default:pear".to_owned())
    );
}

/// Test: Simple trees commit through the same lifecycle and respect
/// existing terrain.
#[test]
fn test_spawn_simple_tree() {
    let roles = NodeRoles::resolve(&registry()).unwrap();
    let anchor = NodePos::new(3, 64, 3);
    let mut map = MemoryMap::new();
    ground(&mut map, anchor, 4);
    // A stone overhang inside the canopy
    let overhang = anchor.offset(1, 5, 0);
    map.set_node(overhang, STONE);

    let event = spawn_simple_tree(&mut map, anchor, true, &roles, 4242);

    assert_eq!(event.kind, MapEditKind::Other);
    assert_eq!(map.events().len(), 1);
    assert_eq!(map.emerged_areas(), &[simple_tree_area(anchor)]);
    assert_eq!(map.get_node(anchor), TREE);
    assert_eq!(map.get_node(anchor.offset(0, 5, 0)), TREE);
    assert_eq!(map.get_node(overhang), STONE);
    assert_eq!(map.get_node(anchor.offset(0, -1, 0)), STONE);
}
