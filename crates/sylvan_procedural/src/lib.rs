//! # SYLVAN Procedural Trees
//!
//! Deterministic tree generation for voxel maps.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same anchor, same grammar, same world, same tree
//! 2. **Bounded**: Generators never write outside the staged volume
//! 3. **Polite**: Solid nodes are never overwritten
//! 4. **Engine-agnostic**: Node identifiers and map access come in through traits
//!
//! ## Core Components
//!
//! - `GrowthGrammar`: L-system tree description and rewriting
//! - `Turtle`: 3D interpreter for expanded productions
//! - `Placement`: Per-symbol node placement rules
//! - `generate_simple_tree`: Grammar-free trunk and canopy
//! - `spawn_grammar_tree`: Emerge, generate and commit against a map
//!
//! ## Example
//!
//! ```rust
//! use sylvan_procedural::{
//!     generate_grammar_tree, GrowthGrammar, Node, NodeRoles, RuleSlot, VoxelArea, VoxelBuffer,
//!     VoxelVolume,
//! };
//! use sylvan_shared::NodePos;
//!
//! let roles = NodeRoles {
//!     trunk: Node::new(1),
//!     leaves: Node::new(2),
//!     leaves_alt: Node::new(2),
//!     fruit: Node::new(3),
//!     dirt: Node::new(4),
//!     sapling: Node::new(5),
//! };
//! let grammar = GrowthGrammar::new("FFFA", &roles)
//!     .with_rule(RuleSlot::A, "[&FFA]")
//!     .with_iterations(1, 0);
//!
//! let anchor = NodePos::new(0, 0, 0);
//! let mut volume = VoxelBuffer::filled(VoxelArea::around(anchor, 16), Node::AIR);
//! generate_grammar_tree(&mut volume, anchor, &grammar).unwrap();
//! assert_eq!(volume.read(anchor), Node::new(1));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod definition;
pub mod error;
pub mod grammar;
pub mod ltree;
pub mod node;
pub mod placement;
pub mod random;
pub mod simple_tree;
pub mod spawn;
pub mod turtle;
pub mod volume;

pub use definition::GrammarDefinition;
pub use error::{TreegenError, TreegenResult};
pub use grammar::{GrowthGrammar, OrientationMode, RuleSlot, TrunkStyle, MIN_ITERATIONS};
pub use ltree::generate_grammar_tree;
pub use node::{Node, NodeRegistry, NodeResolver, NodeRoles};
pub use placement::{place_at, place_node, Placement};
pub use random::{PseudoRandom, TreeSeed};
pub use simple_tree::{generate_sapling_marker, generate_simple_tree};
pub use spawn::{spawn_grammar_tree, spawn_simple_tree, MapBackend, MapEditEvent, MapEditKind, MemoryMap};
pub use turtle::{tokenize, Turtle, TurtleCommand, TurtleState};
pub use volume::{VoxelArea, VoxelBuffer, VoxelVolume, MAP_BLOCK_SIZE};
