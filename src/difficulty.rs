//! Difficulty profiles for the computer player.
//!
//! A profile never changes which moves are legal. It scales category scores
//! and sets how often the player runs its safety checks and how often it
//! settles for a worse move than its best.

use std::fmt;
use std::str::FromStr;

use crate::scoring::Category;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Chance of switching to the survival branch when vulnerable.
    pub fn survival_probability(self) -> f64 {
        match self {
            Difficulty::Easy => 0.4,
            Difficulty::Medium => 0.8,
            Difficulty::Hard => 0.95,
        }
    }

    /// Chance of looking for an immediately winning explosion in the endgame.
    pub fn winning_check_probability(self) -> f64 {
        match self {
            Difficulty::Easy => 0.6,
            Difficulty::Medium | Difficulty::Hard => 1.0,
        }
    }

    /// Chance of playing the top-ranked candidate.
    pub fn top_pick_probability(self) -> f64 {
        match self {
            Difficulty::Easy => 0.4,
            Difficulty::Medium => 0.7,
            Difficulty::Hard => 1.0,
        }
    }

    /// Score multiplier for a move category.
    pub fn multiplier(self, category: Category) -> f64 {
        let table: [f64; 4] = match self {
            Difficulty::Easy => [0.9, 0.85, 0.8, 0.7],
            Difficulty::Medium => [1.0; 4],
            Difficulty::Hard => [1.05, 1.1, 1.2, 1.3],
        };
        table[category.index()]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown difficulty: {s} (expected easy, medium or hard)"))
    }
}
