//! # Turtle Interpreter
//!
//! Walks an expanded production with a 3D cursor and asks the placement
//! policy to stamp nodes along the way.
//!
//! ## Commands
//!
//! | Symbol | Command |
//! |---|---|
//! | `G` | move forward, pen up |
//! | `F` | trunk/branch segment, leaf cluster inside branches, move |
//! | `T` | thick trunk segment, move |
//! | `f` | single leaf, move |
//! | `R` | fruit, move |
//! | `[` `]` | push / pop orientation and position |
//! | `+` `-` | yaw about local Z |
//! | `&` `^` | pitch about local Y |
//! | `*` `/` | roll about local X (no per-tree offset) |
//!
//! Every other character is dropped during tokenization.
//!
//! ## Frame
//!
//! Forward is local +X. The initial orientation is a quarter turn about +Z,
//! which maps forward onto world +Y, so a bare `F` string grows straight
//! up. Rotations compose on the right, in the turtle's local frame.

use std::f64::consts::{FRAC_PI_2, PI};

use sylvan_shared::{Mat3, Vec3};

use crate::error::{TreegenError, TreegenResult};
use crate::grammar::OrientationMode;
use crate::placement::Placement;
use crate::random::PseudoRandom;
use crate::volume::VoxelVolume;

/// Rotation direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Rotate about the positive axis.
    Positive,
    /// Rotate about the negated axis.
    Negative,
}

impl Sign {
    fn apply(self, axis: Vec3) -> Vec3 {
        match self {
            Self::Positive => axis,
            Self::Negative => -axis,
        }
    }
}

/// One interpreted symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurtleCommand {
    /// `G`
    Move,
    /// `F`
    Branch,
    /// `T`
    Trunk,
    /// `f`
    Leaf,
    /// `R`
    Fruit,
    /// `[`
    Push,
    /// `]`
    Pop,
    /// `+` / `-`
    Yaw(Sign),
    /// `&` / `^`
    Pitch(Sign),
    /// `*` / `/`
    Roll(Sign),
}

impl TurtleCommand {
    /// Parses one symbol. Unknown symbols yield `None`.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        Some(match symbol {
            'G' => Self::Move,
            'F' => Self::Branch,
            'T' => Self::Trunk,
            'f' => Self::Leaf,
            'R' => Self::Fruit,
            '[' => Self::Push,
            ']' => Self::Pop,
            '+' => Self::Yaw(Sign::Positive),
            '-' => Self::Yaw(Sign::Negative),
            '&' => Self::Pitch(Sign::Positive),
            '^' => Self::Pitch(Sign::Negative),
            '*' => Self::Roll(Sign::Positive),
            '/' => Self::Roll(Sign::Negative),
            _ => return None,
        })
    }
}

/// Tokenizes an expanded production once, dropping unknown symbols.
#[must_use]
pub fn tokenize(production: &str) -> Vec<TurtleCommand> {
    production
        .chars()
        .filter_map(TurtleCommand::from_symbol)
        .collect()
}

/// Turn angles for one tree, in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnAngles {
    /// Yaw and pitch: grammar angle plus the per-tree offset.
    pub turn: f64,
    /// Roll: grammar angle only.
    pub roll: f64,
}

impl TurnAngles {
    /// Builds the angles from the grammar angle and the per-tree offset,
    /// both in degrees.
    #[must_use]
    pub fn from_degrees(angle: f32, offset: i32) -> Self {
        let angle = f64::from(angle) * PI / 180.0;
        let offset = f64::from(offset) * PI / 180.0;
        Self {
            turn: angle + offset,
            roll: angle,
        }
    }
}

/// Position, orientation and save stack of one generation run.
#[derive(Clone, Debug)]
pub struct TurtleState {
    /// Sub-voxel position.
    pub position: Vec3,
    /// Accumulated orientation.
    pub orientation: Mat3,
    stack: Vec<(Mat3, Vec3)>,
}

impl TurtleState {
    /// Fresh state at `origin`, heading up, with an empty stack.
    #[must_use]
    pub fn new(origin: Vec3) -> Self {
        Self {
            position: origin,
            orientation: Mat3::from_axis_angle(Vec3::Z, FRAC_PI_2),
            stack: Vec::new(),
        }
    }

    /// Current forward heading.
    #[inline]
    #[must_use]
    pub fn heading(&self) -> Vec3 {
        self.orientation.mul_vec3(Vec3::X)
    }

    /// Moves one unit along the heading.
    #[inline]
    pub fn advance(&mut self) {
        self.position += self.heading();
    }

    /// True while at least one state is saved.
    #[inline]
    #[must_use]
    pub fn in_branch(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Number of saved states.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Saves orientation and position.
    pub fn push(&mut self) {
        self.stack.push((self.orientation, self.position));
    }

    /// Restores the last saved state. Returns false if the stack is empty.
    #[must_use]
    pub fn pop(&mut self) -> bool {
        match self.stack.pop() {
            Some((orientation, position)) => {
                self.orientation = orientation;
                self.position = position;
                true
            }
            None => false,
        }
    }

    /// Composes a local rotation into the orientation.
    pub fn rotate(&mut self, axis: Vec3, radians: f64, mode: OrientationMode) {
        self.orientation *= Mat3::from_axis_angle(axis, radians);
        if mode == OrientationMode::Renormalized {
            self.orientation = self.orientation.renormalized();
        }
    }
}

/// Interpreter for one tree.
pub struct Turtle {
    state: TurtleState,
    angles: TurnAngles,
    mode: OrientationMode,
    thin_branches: bool,
}

impl Turtle {
    /// Creates an interpreter starting at `origin`.
    #[must_use]
    pub fn new(origin: Vec3, angles: TurnAngles, mode: OrientationMode, thin_branches: bool) -> Self {
        Self {
            state: TurtleState::new(origin),
            angles,
            mode,
            thin_branches,
        }
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &TurtleState {
        &self.state
    }

    /// Runs every command in order.
    ///
    /// # Errors
    ///
    /// Returns `UnbalancedBrackets` on a pop with an empty stack. Nodes
    /// placed before that command stay in the volume.
    pub fn run<V: VoxelVolume + ?Sized>(
        &mut self,
        commands: &[TurtleCommand],
        placement: &mut Placement<'_, V>,
        rng: &mut PseudoRandom,
    ) -> TreegenResult<()> {
        for (index, &command) in commands.iter().enumerate() {
            self.step(command, placement, rng)
                .ok_or(TreegenError::UnbalancedBrackets { index })?;
        }
        Ok(())
    }

    /// Executes one command. `None` only for an unbalanced pop.
    fn step<V: VoxelVolume + ?Sized>(
        &mut self,
        command: TurtleCommand,
        placement: &mut Placement<'_, V>,
        rng: &mut PseudoRandom,
    ) -> Option<()> {
        let at = self.state.position;
        match command {
            TurtleCommand::Move => self.state.advance(),
            TurtleCommand::Branch => {
                let in_branch = self.state.in_branch();
                placement.trunk(at, !in_branch || !self.thin_branches);
                if in_branch {
                    placement.leaf_cluster(at, rng);
                }
                self.state.advance();
            }
            TurtleCommand::Trunk => {
                placement.trunk(at, true);
                self.state.advance();
            }
            TurtleCommand::Leaf => {
                placement.single_leaf(at, rng.fork());
                self.state.advance();
            }
            TurtleCommand::Fruit => {
                placement.fruit(at);
                self.state.advance();
            }
            TurtleCommand::Push => self.state.push(),
            TurtleCommand::Pop => {
                if !self.state.pop() {
                    return None;
                }
            }
            TurtleCommand::Yaw(sign) => {
                self.state.rotate(sign.apply(Vec3::Z), self.angles.turn, self.mode);
            }
            TurtleCommand::Pitch(sign) => {
                self.state.rotate(sign.apply(Vec3::Y), self.angles.turn, self.mode);
            }
            TurtleCommand::Roll(sign) => {
                self.state.rotate(sign.apply(Vec3::X), self.angles.roll, self.mode);
            }
        }
        Some(())
    }
}
