//! # Tree Definition Files
//!
//! Name-based grammar definitions, as written by content authors.
//!
//! A definition names its nodes (`trunk = "default:tree"`); resolving it
//! against a [`NodeResolver`] turns every name into an identifier exactly
//! once and yields a ready-to-use [`GrowthGrammar`].
//!
//! ## Example
//!
//! ```toml
//! axiom = "FFFFFAFFBF"
//! rules_a = "[&&&FFFFF&&FFFF][&&&++++FFFFF&&FFFF][&&&----FFFFF&&FFFF]"
//! rules_b = "[&&&++FFFF&&FFFF][&&&--FFFF&&FFFF][&&&------FFFF&&FFFF]"
//! trunk = "default:tree"
//! leaves = "default:leaves"
//! angle = 30
//! iterations = 2
//! random_level = 0
//! trunk_type = "single"
//! thin_branches = true
//! fruit_chance = 10
//! fruit = "default:apple"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{TreegenError, TreegenResult};
use crate::grammar::{GrowthGrammar, OrientationMode, TrunkStyle, MIN_ITERATIONS};
use crate::node::{Node, NodeResolver, NodeRoles};

fn default_iterations() -> u32 {
    MIN_ITERATIONS
}

fn default_angle() -> f32 {
    30.0
}

fn default_dirt() -> String {
    NodeRoles::DIRT.to_owned()
}

/// On-disk form of a grammar tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarDefinition {
    /// Starting symbol sequence.
    pub axiom: String,
    /// Replacement for `A` / `a`.
    #[serde(default)]
    pub rules_a: String,
    /// Replacement for `B` / `b`.
    #[serde(default)]
    pub rules_b: String,
    /// Replacement for `C` / `c`.
    #[serde(default)]
    pub rules_c: String,
    /// Replacement for `D` / `d`.
    #[serde(default)]
    pub rules_d: String,
    /// Trunk node name.
    pub trunk: String,
    /// Leaves node name.
    pub leaves: String,
    /// Alternate leaves node name. Defaults to `leaves`.
    #[serde(default)]
    pub leaves2: Option<String>,
    /// Percent chance of alternate leaves.
    #[serde(default)]
    pub leaves2_chance: u32,
    /// Turn angle in degrees.
    #[serde(default = "default_angle")]
    pub angle: f32,
    /// Expansion passes.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Random reduction of `iterations`.
    #[serde(default)]
    pub random_level: u32,
    /// Trunk cross-section.
    #[serde(default)]
    pub trunk_type: TrunkStyle,
    /// Keep branch segments one node wide.
    #[serde(default)]
    pub thin_branches: bool,
    /// Fruit node name. Without it fruit is disabled.
    #[serde(default)]
    pub fruit: Option<String>,
    /// Percent chance of fruit in leaf clusters.
    #[serde(default)]
    pub fruit_chance: u32,
    /// Ground support node name.
    #[serde(default = "default_dirt")]
    pub dirt: String,
    /// Explicit seed.
    #[serde(default)]
    pub seed: Option<i32>,
    /// Rotation drift handling.
    #[serde(default)]
    pub orientation: OrientationMode,
}

impl GrammarDefinition {
    /// Parses and validates a TOML definition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for malformed TOML, unknown keys or values,
    /// and chances above 100.
    pub fn from_toml_str(source: &str) -> TreegenResult<Self> {
        let definition: Self =
            toml::from_str(source).map_err(|e| TreegenError::InvalidConfig(e.to_string()))?;
        definition.validate()?;
        Ok(definition)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` describing the first bad value.
    pub fn validate(&self) -> TreegenResult<()> {
        for (name, chance) in [
            ("leaves2_chance", self.leaves2_chance),
            ("fruit_chance", self.fruit_chance),
        ] {
            if chance > 100 {
                return Err(TreegenError::InvalidConfig(format!(
                    "{name} must be 0-100, got {chance}"
                )));
            }
        }
        if !self.angle.is_finite() {
            return Err(TreegenError::InvalidConfig(format!(
                "angle must be finite, got {}",
                self.angle
            )));
        }
        Ok(())
    }

    /// Resolves every node name once and builds the grammar.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNode` for the first unresolvable name and
    /// `InvalidConfig` if validation fails.
    #[allow(clippy::cast_possible_truncation)]
    pub fn resolve(&self, resolver: &impl NodeResolver) -> TreegenResult<GrowthGrammar> {
        self.validate()?;
        let leaves = resolver.require(&self.leaves)?;
        let leaves_alt = match &self.leaves2 {
            Some(name) => resolver.require(name)?,
            None => leaves,
        };
        let (fruit_node, fruit_chance) = match &self.fruit {
            Some(name) => (resolver.require(name)?, self.fruit_chance as u8),
            None => (Node::AIR, 0),
        };
        Ok(GrowthGrammar {
            initial_axiom: self.axiom.clone(),
            rule_a: self.rules_a.clone(),
            rule_b: self.rules_b.clone(),
            rule_c: self.rules_c.clone(),
            rule_d: self.rules_d.clone(),
            iterations: self.iterations,
            iteration_jitter: self.random_level,
            angle_degrees: self.angle,
            trunk_style: self.trunk_type,
            thin_branches: self.thin_branches,
            trunk_node: resolver.require(&self.trunk)?,
            leaves_node: leaves,
            leaves_alt_node: leaves_alt,
            fruit_node,
            dirt_node: resolver.require(&self.dirt)?,
            leaves_alt_chance: self.leaves2_chance as u8,
            fruit_chance,
            seed_override: self.seed,
            orientation_mode: self.orientation,
        })
    }
}
