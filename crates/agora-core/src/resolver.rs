//! Decision resolution: rule lookup and the dice judgment.
//!
//! The resolver is deterministic given its dice. Production code rolls a
//! seeded or entropy-seeded [`RandomDice`]; tests script the faces with
//! [`FixedDice`].

use std::collections::VecDeque;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use agora_ledger::{EconomyRule, RuleBook};
use agora_types::Judgment;

/// Number of faces on the judgment die.
pub const DICE_FACES: u8 = 6;

/// A source of die faces in `1..=6`.
pub trait DiceSource: Send {
    /// Roll the die.
    fn roll(&mut self) -> u8;
}

/// Uniform rolls from a standard RNG.
#[derive(Debug)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    /// Seed deterministically.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl DiceSource for RandomDice {
    fn roll(&mut self) -> u8 {
        self.rng.random_range(1..=DICE_FACES)
    }
}

/// Replays a fixed sequence of faces, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct FixedDice {
    faces: VecDeque<u8>,
}

impl FixedDice {
    /// Replay `faces` in order. Faces are clamped into `1..=6`; an empty
    /// sequence always rolls 1.
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces
                .into_iter()
                .map(|f| f.clamp(1, DICE_FACES))
                .collect(),
        }
    }

    /// Always roll `face`.
    pub fn always(face: u8) -> Self {
        Self::new([face])
    }
}

impl DiceSource for FixedDice {
    fn roll(&mut self) -> u8 {
        match self.faces.pop_front() {
            Some(face) => {
                self.faces.push_back(face);
                face
            }
            None => 1,
        }
    }
}

/// The judged outcome of one roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// Die face, 1-6.
    pub dice: u8,
    /// Judgment band of the face.
    pub judgment: Judgment,
    /// Whether the decision is accepted.
    pub accepted: bool,
    /// Human-readable verdict.
    pub text: &'static str,
}

/// Matches actions to economy rules and judges them with a die.
pub struct DecisionResolver {
    rules: RuleBook,
    dice: Mutex<Box<dyn DiceSource>>,
}

impl core::fmt::Debug for DecisionResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecisionResolver")
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}

impl DecisionResolver {
    /// Create a resolver over `rules` rolling `dice`.
    pub fn new(rules: RuleBook, dice: impl DiceSource + 'static) -> Self {
        Self {
            rules,
            dice: Mutex::new(Box::new(dice)),
        }
    }

    /// The rule for an action label (first keyword match, or the fallback).
    pub fn resolve(&self, action: &str) -> &EconomyRule {
        self.rules.lookup(action)
    }

    /// Map a die face to its judgment. Fixed step function:
    /// 1-2 strong rejection, 3 reserved, 4 grudging acceptance, 5-6
    /// enthusiastic acceptance.
    pub const fn judge(dice: u8) -> Verdict {
        let judgment = Judgment::from_dice(dice);
        Verdict {
            dice,
            judgment,
            accepted: judgment.accepted(),
            text: judgment.verdict(),
        }
    }

    /// Roll the die once.
    pub fn roll(&self) -> u8 {
        self.dice.lock().roll()
    }

    /// Roll and judge.
    pub fn roll_verdict(&self) -> Verdict {
        Self::judge(self.roll())
    }

    /// The rule table.
    pub const fn rules(&self) -> &RuleBook {
        &self.rules
    }
}
