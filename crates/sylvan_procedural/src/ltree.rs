//! # Grammar Trees
//!
//! Full pipeline for one L-system tree:
//!
//! 1. Seed the stream (explicit override or anchor-derived)
//! 2. Draw the pass count and the per-tree angle offset
//! 3. Expand the grammar
//! 4. Stamp ground support under thick trunks
//! 5. Walk the production with the turtle
//!
//! Steps 2, 3 and 5 all draw from the same stream, in that order.

use sylvan_shared::{NodePos, Vec3};
use tracing::{debug, warn};

use crate::error::{TreegenError, TreegenResult};
use crate::grammar::GrowthGrammar;
use crate::placement::Placement;
use crate::random::{PseudoRandom, TreeSeed};
use crate::turtle::{tokenize, TurnAngles, Turtle};
use crate::volume::VoxelVolume;

/// Largest per-tree yaw/pitch offset, in degrees.
pub const MAX_ANGLE_OFFSET_DEGREES: i32 = 4;

/// Grows a grammar tree at `anchor` into `volume`.
///
/// Same anchor, same grammar and same volume contents always produce the
/// same writes. Nothing is written outside the volume and no solid node is
/// overwritten.
///
/// # Errors
///
/// Returns `InvalidConfig` for a non-finite turn angle, before anything is
/// drawn or written. Returns `UnbalancedBrackets` if the expanded
/// production pops an empty stack. Nodes written before the failing command are not rolled back;
/// stage the volume and discard it on error if that matters.
pub fn generate_grammar_tree<V: VoxelVolume + ?Sized>(
    volume: &mut V,
    anchor: NodePos,
    grammar: &GrowthGrammar,
) -> TreegenResult<()> {
    if !grammar.angle_degrees.is_finite() {
        return Err(TreegenError::InvalidConfig(format!(
            "angle must be finite, got {}",
            grammar.angle_degrees
        )));
    }

    let seed = TreeSeed::resolve(grammar.seed_override, anchor);
    let mut rng = PseudoRandom::from_seed(seed);

    let iterations = grammar.effective_iterations(&mut rng);
    let angle_offset = rng.range(0, MAX_ANGLE_OFFSET_DEGREES);
    let production = grammar.expand(iterations, &mut rng);
    let commands = tokenize(&production);
    debug!(
        anchor = ?anchor,
        seed = seed.value(),
        iterations,
        angle_offset,
        len = commands.len(),
        "grammar expanded"
    );

    let origin = Vec3::from(anchor);
    let mut placement = Placement::new(volume, grammar);
    placement.ground_support(origin);

    let mut turtle = Turtle::new(
        origin,
        TurnAngles::from_degrees(grammar.angle_degrees, angle_offset),
        grammar.orientation_mode,
        grammar.thin_branches,
    );
    turtle
        .run(&commands, &mut placement, &mut rng)
        .map_err(|e| {
            warn!(anchor = ?anchor, error = %e, "grammar tree aborted");
            e
        })
}
