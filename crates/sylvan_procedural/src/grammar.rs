//! # Growth Grammar
//!
//! Stochastic L-system definition and the string-rewriting engine.
//!
//! ## Rewriting Symbols
//!
//! | Symbol | Replacement |
//! |---|---|
//! | `A` `B` `C` `D` | rule A/B/C/D, always |
//! | `a` `b` `c` `d` | rule A/B/C/D with 90/80/70/60% chance, dropped otherwise |
//! | anything else | copied unchanged |
//!
//! Probabilistic rewrites draw `range(1, 10)` from the shared stream in
//! left-to-right scan order, so the expansion is reproducible for a fixed
//! seed.

use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeRoles};
use crate::random::PseudoRandom;

/// Fewest expansion passes a grammar tree ever gets.
pub const MIN_ITERATIONS: u32 = 2;

/// Trunk cross-section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrunkStyle {
    /// One node wide.
    #[default]
    Single,
    /// 2x2 square: the base cell plus +x, +z and +x+z.
    Double,
    /// Plus shape: the base cell plus +x, -x, +z and -z.
    Crossed,
}

impl TrunkStyle {
    /// Extra cells stamped next to every thick trunk cell.
    #[must_use]
    pub const fn thickening_offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::Single => &[],
            Self::Double => &[(1, 0), (0, 1), (1, 1)],
            Self::Crossed => &[(1, 0), (-1, 0), (0, 1), (0, -1)],
        }
    }
}

/// How the turtle treats accumulated rotation error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrientationMode {
    /// Compose rotations without correction. Reproduces legacy output
    /// bit for bit, drift included.
    #[default]
    Legacy,
    /// Re-orthonormalize after every rotation command.
    Renormalized,
}

/// One of the four rewriting rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleSlot {
    /// Rule for `A` / `a`.
    A,
    /// Rule for `B` / `b`.
    B,
    /// Rule for `C` / `c`.
    C,
    /// Rule for `D` / `d`.
    D,
}

impl RuleSlot {
    /// Chance (out of 10) that the lowercase symbol is rewritten.
    #[must_use]
    pub const fn threshold(self) -> i32 {
        match self {
            Self::A => 9,
            Self::B => 8,
            Self::C => 7,
            Self::D => 6,
        }
    }
}

/// What the expander does with one symbol.
enum Rewrite {
    Always(RuleSlot),
    Maybe(RuleSlot),
    Keep,
}

impl Rewrite {
    const fn of(symbol: char) -> Self {
        match symbol {
            'A' => Self::Always(RuleSlot::A),
            'B' => Self::Always(RuleSlot::B),
            'C' => Self::Always(RuleSlot::C),
            'D' => Self::Always(RuleSlot::D),
            'a' => Self::Maybe(RuleSlot::A),
            'b' => Self::Maybe(RuleSlot::B),
            'c' => Self::Maybe(RuleSlot::C),
            'd' => Self::Maybe(RuleSlot::D),
            _ => Self::Keep,
        }
    }
}

/// Immutable definition of a grammar tree.
///
/// Node identifiers are already resolved; see
/// [`GrammarDefinition`](crate::definition::GrammarDefinition) for the
/// name-based form read from files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowthGrammar {
    /// Starting symbol sequence.
    pub initial_axiom: String,
    /// Replacement for `A` / `a`.
    pub rule_a: String,
    /// Replacement for `B` / `b`.
    pub rule_b: String,
    /// Replacement for `C` / `c`.
    pub rule_c: String,
    /// Replacement for `D` / `d`.
    pub rule_d: String,
    /// Expansion passes before jitter.
    pub iterations: u32,
    /// Passes are reduced by a random amount in `0..=iteration_jitter`.
    pub iteration_jitter: u32,
    /// Turn angle for every rotation command, in degrees.
    pub angle_degrees: f32,
    /// Trunk cross-section.
    pub trunk_style: TrunkStyle,
    /// Keep branch segments one node wide.
    pub thin_branches: bool,
    /// Trunk node.
    pub trunk_node: Node,
    /// Primary leaves node.
    pub leaves_node: Node,
    /// Alternate leaves node.
    pub leaves_alt_node: Node,
    /// Fruit node.
    pub fruit_node: Node,
    /// Ground support node.
    pub dirt_node: Node,
    /// Percent chance (0-100) a leaf uses the alternate node.
    pub leaves_alt_chance: u8,
    /// Percent chance (0-100) a cluster leaf becomes fruit.
    pub fruit_chance: u8,
    /// Explicit seed. Unseeded trees derive their seed from the anchor.
    pub seed_override: Option<i32>,
    /// Rotation drift handling.
    #[serde(default)]
    pub orientation_mode: OrientationMode,
}

impl GrowthGrammar {
    /// Creates a grammar with the given axiom, no rules, and default settings.
    #[must_use]
    pub fn new(initial_axiom: impl Into<String>, roles: &NodeRoles) -> Self {
        Self {
            initial_axiom: initial_axiom.into(),
            rule_a: String::new(),
            rule_b: String::new(),
            rule_c: String::new(),
            rule_d: String::new(),
            iterations: MIN_ITERATIONS,
            iteration_jitter: 0,
            angle_degrees: 30.0,
            trunk_style: TrunkStyle::Single,
            thin_branches: false,
            trunk_node: roles.trunk,
            leaves_node: roles.leaves,
            leaves_alt_node: roles.leaves_alt,
            fruit_node: roles.fruit,
            dirt_node: roles.dirt,
            leaves_alt_chance: 0,
            fruit_chance: 0,
            seed_override: None,
            orientation_mode: OrientationMode::Legacy,
        }
    }

    /// Sets one rewriting rule.
    #[must_use]
    pub fn with_rule(mut self, slot: RuleSlot, replacement: impl Into<String>) -> Self {
        *self.rule_mut(slot) = replacement.into();
        self
    }

    /// Sets the pass count and its jitter.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32, jitter: u32) -> Self {
        self.iterations = iterations;
        self.iteration_jitter = jitter;
        self
    }

    /// Sets the turn angle in degrees.
    #[must_use]
    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.angle_degrees = degrees;
        self
    }

    /// Sets the trunk style and branch thinning.
    #[must_use]
    pub fn with_trunk(mut self, style: TrunkStyle, thin_branches: bool) -> Self {
        self.trunk_style = style;
        self.thin_branches = thin_branches;
        self
    }

    /// Sets the alternate-leaves and fruit chances (percent, clamped to 100).
    #[must_use]
    pub fn with_chances(mut self, leaves_alt: u8, fruit: u8) -> Self {
        self.leaves_alt_chance = leaves_alt.min(100);
        self.fruit_chance = fruit.min(100);
        self
    }

    /// Fixes the seed instead of deriving it from the anchor.
    #[must_use]
    pub fn with_seed(mut self, seed: i32) -> Self {
        self.seed_override = Some(seed);
        self
    }

    /// Sets the rotation drift handling.
    #[must_use]
    pub fn with_orientation_mode(mut self, mode: OrientationMode) -> Self {
        self.orientation_mode = mode;
        self
    }

    /// Replacement text for a rule.
    #[must_use]
    pub fn rule(&self, slot: RuleSlot) -> &str {
        match slot {
            RuleSlot::A => &self.rule_a,
            RuleSlot::B => &self.rule_b,
            RuleSlot::C => &self.rule_c,
            RuleSlot::D => &self.rule_d,
        }
    }

    fn rule_mut(&mut self, slot: RuleSlot) -> &mut String {
        match slot {
            RuleSlot::A => &mut self.rule_a,
            RuleSlot::B => &mut self.rule_b,
            RuleSlot::C => &mut self.rule_c,
            RuleSlot::D => &mut self.rule_d,
        }
    }

    /// Passes to run for one tree.
    ///
    /// Draws the jitter from `rng` only when jitter is enabled. Never
    /// returns fewer than [`MIN_ITERATIONS`].
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn effective_iterations(&self, rng: &mut PseudoRandom) -> u32 {
        let mut iterations = i64::from(self.iterations);
        if self.iteration_jitter > 0 {
            let jitter = self.iteration_jitter.min(3276) as i32;
            iterations -= i64::from(rng.range(0, jitter));
        }
        iterations.max(i64::from(MIN_ITERATIONS)) as u32
    }

    /// Rewrites the axiom `iterations` times.
    ///
    /// Zero passes return the axiom unchanged.
    pub fn expand(&self, iterations: u32, rng: &mut PseudoRandom) -> String {
        let mut current = self.initial_axiom.clone();
        for _ in 0..iterations {
            current = self.rewrite_once(&current, rng);
        }
        current
    }

    /// One left-to-right rewriting pass.
    fn rewrite_once(&self, input: &str, rng: &mut PseudoRandom) -> String {
        let mut output = String::with_capacity(input.len() * 2);
        for symbol in input.chars() {
            match Rewrite::of(symbol) {
                Rewrite::Always(slot) => output.push_str(self.rule(slot)),
                Rewrite::Maybe(slot) => {
                    if rng.range(1, 10) <= slot.threshold() {
                        output.push_str(self.rule(slot));
                    }
                }
                Rewrite::Keep => output.push(symbol),
            }
        }
        output
    }
}
