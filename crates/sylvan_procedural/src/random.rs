//! # Deterministic Pseudo-Random Stream
//!
//! A small linear congruential generator with a 15-bit output, plus the
//! seed derivation used by grammar trees.
//!
//! ## Determinism Guarantee
//!
//! Given the same seed, [`PseudoRandom`] produces **exactly** the same
//! sequence on any platform. All arithmetic is wrapping 32-bit integer
//! arithmetic; no floating point is involved.
//!
//! The stream is always passed explicitly. One instance belongs to one
//! generation call and is never shared between concurrent calls.

use sylvan_shared::NodePos;

/// Offset added to an explicit tree seed before seeding the stream.
pub const EXPLICIT_SEED_OFFSET: i32 = 14002;

/// Seed for one tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeSeed(i32);

impl TreeSeed {
    /// Creates a seed from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(seed: i32) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Seed from an explicit override: `override + 14002`.
    #[inline]
    #[must_use]
    pub const fn from_override(seed: i32) -> Self {
        Self(seed.wrapping_add(EXPLICIT_SEED_OFFSET))
    }

    /// Seed from the anchor position: `2x + 4y + z`.
    ///
    /// Unseeded trees are deterministic per location: the same spot always
    /// grows the same tree.
    #[inline]
    #[must_use]
    pub const fn from_anchor(anchor: NodePos) -> Self {
        Self(
            anchor
                .x
                .wrapping_mul(2)
                .wrapping_add(anchor.y.wrapping_mul(4))
                .wrapping_add(anchor.z),
        )
    }

    /// Picks the override when present, the anchor-derived seed otherwise.
    #[inline]
    #[must_use]
    pub const fn resolve(seed_override: Option<i32>, anchor: NodePos) -> Self {
        match seed_override {
            Some(seed) => Self::from_override(seed),
            None => Self::from_anchor(anchor),
        }
    }
}

/// Seeded pseudo-random integer stream.
///
/// `next` yields values in `0..=32767`.
///
/// # Example
///
/// ```rust
/// use sylvan_procedural::random::PseudoRandom;
///
/// let mut a = PseudoRandom::new(42);
/// let mut b = PseudoRandom::new(42);
/// assert_eq!(a.range(1, 100), b.range(1, 100));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PseudoRandom {
    state: i32,
}

impl PseudoRandom {
    /// Largest value returned by [`next`](Self::next).
    pub const MAX: i32 = 32767;

    const MULTIPLIER: i32 = 1_103_515_245;
    const INCREMENT: i32 = 12345;

    /// Creates a new stream from a seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: i32) -> Self {
        Self { state: seed }
    }

    /// Creates a stream from a tree seed.
    #[inline]
    #[must_use]
    pub const fn from_seed(seed: TreeSeed) -> Self {
        Self::new(seed.value())
    }

    /// Advances the stream and returns a value in `0..=32767`.
    #[inline]
    #[allow(clippy::should_implement_trait, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    pub fn next(&mut self) -> i32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        // Truncating division first, then reinterpretation as unsigned.
        ((self.state / 65536) as u32 % 32768) as i32
    }

    /// Returns a value in `[min, max]` inclusive.
    ///
    /// The span `max - min` must not exceed 3276, beyond which the modulo
    /// bias of a 15-bit source becomes noticeable.
    #[inline]
    pub fn range(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max, "empty range {min}..={max}");
        debug_assert!(max - min <= (Self::MAX + 1) / 10, "range {min}..={max} too wide");
        if min > max {
            return max;
        }
        self.next() % (max - min + 1) + min
    }

    /// Draws one value and seeds a fresh, independent stream with it.
    ///
    /// Per-placement decisions use a forked stream so the shared stream
    /// advances by exactly one step per placement site, regardless of
    /// how many draws the placement itself makes.
    #[inline]
    pub fn fork(&mut self) -> Self {
        Self::new(self.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sequence() {
        // state = 1103515245 * 1 + 12345 = 1103527590 -> /65536 = 16838
        let mut rng = PseudoRandom::new(1);
        assert_eq!(rng.next(), 16838);
        // Seed 0 yields 12345 / 65536 = 0 on the first draw
        let mut zero = PseudoRandom::new(0);
        assert_eq!(zero.next(), 0);
    }

    #[test]
    fn test_determinism() {
        let mut a = PseudoRandom::new(-7331);
        let mut b = PseudoRandom::new(-7331);
        for _ in 0..10_000 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn test_next_is_fifteen_bit() {
        let mut rng = PseudoRandom::new(i32::MIN);
        for _ in 0..100_000 {
            let v = rng.next();
            assert!((0..=PseudoRandom::MAX).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let mut rng = PseudoRandom::new(99);
        let mut seen = [false; 10];
        for _ in 0..10_000 {
            let v = rng.range(1, 10);
            assert!((1..=10).contains(&v));
            seen[(v - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "every value should appear: {seen:?}");
    }

    #[test]
    fn test_fork_advances_parent_once() {
        let mut parent = PseudoRandom::new(5);
        let mut reference = PseudoRandom::new(5);
        let mut child = parent.fork();
        child.range(1, 100);
        child.range(1, 100);
        reference.next();
        assert_eq!(parent, reference);
    }

    #[test]
    fn test_seed_derivation() {
        assert_eq!(TreeSeed::from_override(42).value(), 14044);
        assert_eq!(TreeSeed::from_anchor(NodePos::new(1, 2, 3)).value(), 2 + 8 + 3);
        assert_eq!(
            TreeSeed::resolve(None, NodePos::new(-5, 10, 7)),
            TreeSeed::new(-10 + 40 + 7)
        );
        assert_eq!(
            TreeSeed::resolve(Some(1), NodePos::new(100, 100, 100)),
            TreeSeed::new(14003)
        );
    }
}
