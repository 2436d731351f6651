//! Roll sources: the only randomness the combat core sees
//!
//! Every roll, perturbation, status chance and AI choice goes through a
//! `RollSource`, so fixing the seed fixes the whole fight.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait RollSource: Send {
    /// Uniform integer in `[1, sides]`
    fn roll_die(&mut self, sides: i32) -> i32;

    /// Uniform integer in `[low, high]` inclusive
    fn roll_range(&mut self, low: i32, high: i32) -> i32;

    /// Uniform value in `[0, 1)`
    fn chance(&mut self) -> f32;

    fn d20(&mut self) -> i32 {
        self.roll_die(20)
    }

    /// True with probability `p` (clamped to `[0, 1]`)
    fn check(&mut self, p: f32) -> bool {
        if p >= 1.0 {
            return true;
        }
        if p <= 0.0 {
            return false;
        }
        self.chance() < p
    }
}

/// ChaCha-backed dice
#[derive(Debug, Clone)]
pub struct SeededDice {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Dice with a fresh seed from the thread RNG
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RollSource for SeededDice {
    fn roll_die(&mut self, sides: i32) -> i32 {
        if sides <= 1 {
            return 1;
        }
        self.rng.gen_range(1..=sides)
    }

    fn roll_range(&mut self, low: i32, high: i32) -> i32 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    fn chance(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Replays fixed values, for tests and log replay
///
/// Integer queue feeds `roll_die` and `roll_range`; the chance
/// queue feeds `chance`. Values are clamped into the requested range.
/// An empty integer queue yields the lowest legal value and an empty
/// chance queue yields 1.0, which never passes a `check` below certainty.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    rolls: VecDeque<i32>,
    chances: VecDeque<f32>,
}

impl ScriptedRolls {
    pub fn new(rolls: impl IntoIterator<Item = i32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            chances: VecDeque::new(),
        }
    }

    pub fn with_chances(mut self, chances: impl IntoIterator<Item = f32>) -> Self {
        self.chances.extend(chances);
        self
    }

    pub fn push_roll(&mut self, value: i32) {
        self.rolls.push_back(value);
    }

    pub fn push_chance(&mut self, value: f32) {
        self.chances.push_back(value);
    }

    /// Values not yet consumed
    pub fn remaining(&self) -> (usize, usize) {
        (self.rolls.len(), self.chances.len())
    }
}

impl RollSource for ScriptedRolls {
    fn roll_die(&mut self, sides: i32) -> i32 {
        self.rolls.pop_front().unwrap_or(1).clamp(1, sides.max(1))
    }

    fn roll_range(&mut self, low: i32, high: i32) -> i32 {
        self.rolls.pop_front().unwrap_or(low).clamp(low, high.max(low))
    }

    fn chance(&mut self) -> f32 {
        self.chances.pop_front().unwrap_or(1.0).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SeededDice::new(42);
        let mut b = SeededDice::new(42);
        for _ in 0..50 {
            assert_eq!(a.d20(), b.d20());
            assert_eq!(a.roll_range(-3, 5), b.roll_range(-3, 5));
        }
    }

    #[test]
    fn test_seeded_ranges() {
        let mut dice = SeededDice::new(7);
        for _ in 0..500 {
            let face = dice.d20();
            assert!((1..=20).contains(&face));
            let p = dice.roll_range(-3, 5);
            assert!((-3..=5).contains(&p));
            let c = dice.chance();
            assert!((0.0..1.0).contains(&c));
        }
    }

    #[test]
    fn test_scripted_replay_and_clamp() {
        let mut dice = ScriptedRolls::new([15, 25, 9]).with_chances([0.05]);
        assert_eq!(dice.d20(), 15);
        assert_eq!(dice.d20(), 20);
        assert_eq!(dice.roll_range(-3, 5), 5);
        assert!(dice.check(0.1));
        assert!(!dice.check(0.99));
        assert_eq!(dice.remaining(), (0, 0));
    }

    #[test]
    fn test_check_extremes() {
        let mut dice = ScriptedRolls::default();
        assert!(dice.check(1.0));
        assert!(!dice.check(0.0));
    }
}
