use std::fmt::Display;

use itertools::Itertools;
use thiserror::Error;

use crate::{permutation::Permutation, puzzles::MoveTable};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmError {
    #[error("No move matches `{found}` at offset {offset}")]
    UnknownMove { offset: usize, found: String },
    #[error("The modifier at offset {offset} doesn't follow a move")]
    DanglingModifier { offset: usize },
    #[error("The repeat count at offset {offset} is too large")]
    RepeatTooLarge { offset: usize },
}

/// A single move of an algorithm, possibly repeated and inverted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    name: String,
    /// Negative when the turn is primed
    amount: i64,
    permutation: Permutation,
}

impl Turn {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    #[must_use]
    pub fn inverse(&self) -> Turn {
        Turn {
            name: self.name.clone(),
            amount: -self.amount,
            permutation: self.permutation.invert(),
        }
    }
}

impl Display for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;

        let count = self.amount.unsigned_abs();
        if count != 1 {
            write!(f, "{count}")?;
        }

        if self.amount < 0 {
            write!(f, "'")?;
        }

        Ok(())
    }
}

/// A sequence of turns on a puzzle, performed left to right
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Algorithm {
    turns: Vec<Turn>,
    permutation: Permutation,
}

impl Algorithm {
    /// Parse a move sequence like `R U2 R' U'` against the moves of `table`.
    ///
    /// Whitespace between turns is optional, so `RUR'U'` reads the same. At
    /// every position the longest move name that matches (ignoring ASCII case)
    /// is taken, then an optional repeat count and an optional prime.
    ///
    /// # Errors
    ///
    /// Fails if no move name matches at some position, if a repeat count or a
    /// prime doesn't follow a move, or if a repeat count overflows.
    pub fn parse(table: &MoveTable, text: &str) -> Result<Algorithm, AlgorithmError> {
        let mut turns = vec![];
        let mut offset = 0;

        while offset < text.len() {
            let rest = &text[offset..];

            let Some(c) = rest.chars().next() else {
                break;
            };

            if c.is_whitespace() {
                offset += c.len_utf8();
                continue;
            }

            if c.is_ascii_digit() || c == '\'' {
                return Err(AlgorithmError::DanglingModifier { offset });
            }

            let Some(found) = table
                .moves()
                .iter()
                .filter(|move_| {
                    rest.get(..move_.name().len())
                        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(move_.name()))
                })
                .max_by_key(|move_| (move_.name().len(), rest.starts_with(move_.name())))
            else {
                return Err(AlgorithmError::UnknownMove {
                    offset,
                    found: c.to_string(),
                });
            };

            offset += found.name().len();

            let digits = text[offset..]
                .bytes()
                .take_while(u8::is_ascii_digit)
                .count();

            let mut amount = if digits == 0 {
                1
            } else {
                let amount = text[offset..offset + digits]
                    .parse::<i64>()
                    .map_err(|_| AlgorithmError::RepeatTooLarge { offset })?;
                offset += digits;
                amount
            };

            if text[offset..].starts_with('\'') {
                amount = -amount;
                offset += 1;
            }

            turns.push(Turn {
                name: found.name().to_owned(),
                amount,
                permutation: found.permutation().power(amount),
            });
        }

        Ok(Algorithm::from_turns(turns))
    }

    fn from_turns(turns: Vec<Turn>) -> Algorithm {
        let permutation = turns
            .iter()
            .fold(Permutation::identity(), |state, turn| {
                state.apply_after(&turn.permutation)
            });

        Algorithm { turns, permutation }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The effect of performing every turn, the first turn first
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// The algorithm that undoes this one
    #[must_use]
    pub fn inverse(&self) -> Algorithm {
        Algorithm {
            turns: self.turns.iter().rev().map(Turn::inverse).collect(),
            permutation: self.permutation.invert(),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.turns.iter().join(" "))
    }
}
