use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    math::Order,
    puzzles::{MoveTable, MoveTableError},
};

#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("Failed to parse the puzzle definition: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    MoveTable(#[from] MoveTableError),
}

/// A puzzle described in TOML:
///
/// ```toml
/// name = "tetrahedron"
/// facelet_count = 4
/// expected_order = 12
///
/// [moves]
/// A = [[0, 1, 2]]
/// B = [[1, 2, 3]]
/// ```
///
/// Every move is a list of disjoint cycles of facelets. `expected_order` is
/// optional, and is computed when it's missing wherever it's needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleDefinition {
    pub name: String,
    pub facelet_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_order: Option<u64>,
    pub moves: BTreeMap<String, Vec<Vec<usize>>>,
}

impl PuzzleDefinition {
    /// # Errors
    ///
    /// Fails if the text isn't TOML or doesn't have the shape of a puzzle
    /// definition.
    pub fn from_toml_str(text: &str) -> Result<PuzzleDefinition, DefinitionError> {
        Ok(toml::from_str(text)?)
    }

    /// # Errors
    ///
    /// Fails if a move doesn't describe a permutation of the puzzle's facelets,
    /// or if there are no moves.
    pub fn into_move_table(self) -> Result<MoveTable, MoveTableError> {
        let table = MoveTable::new(self.name, self.facelet_count, self.moves)?;

        Ok(match self.expected_order {
            Some(expected_order) => table.with_expected_order(Order::from_digit(expected_order)),
            None => table,
        })
    }
}

/// Parse a TOML puzzle definition straight into a move table
///
/// # Errors
///
/// Fails if the definition is malformed in either way described by
/// [`DefinitionError`].
pub fn move_table_from_toml(text: &str) -> Result<MoveTable, DefinitionError> {
    Ok(PuzzleDefinition::from_toml_str(text)?.into_move_table()?)
}

#[cfg(test)]
mod tests {
    use super::{DefinitionError, PuzzleDefinition, move_table_from_toml};
    use crate::{math::Order, permutation::Permutation, puzzles::MoveTableError};

    const TETRAHEDRON: &str = "
name = \"tetrahedron\"
facelet_count = 4
expected_order = 12

[moves]
A = [[0, 1, 2]]
B = [[1, 2, 3]]
";

    #[test]
    fn parse() {
        let definition = PuzzleDefinition::from_toml_str(TETRAHEDRON).unwrap();
        assert_eq!(definition.name, "tetrahedron");
        assert_eq!(definition.facelet_count, 4);
        assert_eq!(definition.expected_order, Some(12));
        assert_eq!(definition.moves["B"], vec![vec![1, 2, 3]]);

        let table = definition.into_move_table().unwrap();
        assert_eq!(table.name(), "tetrahedron");
        assert_eq!(table.expected_order(), Some(Order::from_digit(12)));
        assert_eq!(
            table.get("A"),
            Some(&Permutation::from_cycles([[0, 1, 2]]).unwrap())
        );
    }

    #[test]
    fn expected_order_is_optional() {
        let table = move_table_from_toml(
            "
name = \"swap\"
facelet_count = 2
moves = { S = [[0, 1]] }
",
        )
        .unwrap();

        assert_eq!(table.expected_order(), None);
        assert_eq!(table.moves().len(), 1);
    }

    #[test]
    fn errors() {
        assert!(matches!(
            move_table_from_toml("name = \"nothing\"\nfacelet_count = 3"),
            Err(DefinitionError::Toml(_))
        ));

        assert!(matches!(
            move_table_from_toml("name = \"nothing\"\nfacelet_count = 3\n[moves]\n"),
            Err(DefinitionError::MoveTable(MoveTableError::NoMoves))
        ));

        assert!(matches!(
            move_table_from_toml("name = \"big\"\nfacelet_count = 3\n[moves]\nA = [[1, 3]]"),
            Err(DefinitionError::MoveTable(
                MoveTableError::PositionOutOfRange { position: 3, .. }
            ))
        ));

        assert!(matches!(
            move_table_from_toml("name = \"bad\"\nfacelet_count = 3\n[moves]\nA = [[0, 1], [1, 2]]"),
            Err(DefinitionError::MoveTable(
                MoveTableError::MalformedMove { .. }
            ))
        ));
    }
}
