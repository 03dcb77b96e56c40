use std::sync::LazyLock;

use thiserror::Error;

use crate::{
    math::{Order, order_from_u128},
    permutation::{Permutation, PermutationError},
};

/// A named generator of a puzzle
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    name: String,
    permutation: Permutation,
}

impl Move {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveTableError {
    #[error("The move {name} is malformed: {source}")]
    MalformedMove {
        name: String,
        #[source]
        source: PermutationError,
    },
    #[error("The move {name} moves facelet {position} but the puzzle only has {facelet_count} facelets")]
    PositionOutOfRange {
        name: String,
        position: usize,
        facelet_count: usize,
    },
    #[error("The move {0} is defined more than once")]
    DuplicateMoveName(String),
    #[error("A puzzle must have at least one move")]
    NoMoves,
}

/// The moves of one puzzle, each a permutation of its facelets
#[derive(Clone, Debug)]
pub struct MoveTable {
    name: String,
    facelet_count: usize,
    moves: Vec<Move>,
    expected_order: Option<Order>,
}

impl MoveTable {
    /// Build a move table from the disjoint cycles of each move.
    ///
    /// # Errors
    ///
    /// Fails if any move repeats a facelet across its cycles, moves a facelet
    /// outside of `0..facelet_count`, or shares its name with another move.
    pub fn new<N, C>(
        name: impl Into<String>,
        facelet_count: usize,
        moves: impl IntoIterator<Item = (N, C)>,
    ) -> Result<MoveTable, MoveTableError>
    where
        N: Into<String>,
        C: IntoIterator,
        C::Item: AsRef<[usize]>,
    {
        let mut table = MoveTable {
            name: name.into(),
            facelet_count,
            moves: Vec::new(),
            expected_order: None,
        };

        for (name, cycles) in moves {
            let name = name.into();

            if table.get(&name).is_some() {
                return Err(MoveTableError::DuplicateMoveName(name));
            }

            let permutation = match Permutation::from_cycles(cycles) {
                Ok(permutation) => permutation,
                Err(source) => return Err(MoveTableError::MalformedMove { name, source }),
            };

            if let Some(position) = permutation.largest_moved_position()
                && position >= facelet_count
            {
                return Err(MoveTableError::PositionOutOfRange {
                    name,
                    position,
                    facelet_count,
                });
            }

            table.moves.push(Move { name, permutation });
        }

        if table.moves.is_empty() {
            return Err(MoveTableError::NoMoves);
        }

        Ok(table)
    }

    /// Record the order of the group generated by all of the moves
    #[must_use]
    pub fn with_expected_order(mut self, expected_order: Order) -> MoveTable {
        self.expected_order = Some(expected_order);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn facelet_count(&self) -> usize {
        self.facelet_count
    }

    /// The order of the group generated by the moves, if it is known
    pub fn expected_order(&self) -> Option<Order> {
        self.expected_order
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Look up a move by its exact name
    pub fn get(&self, name: &str) -> Option<&Permutation> {
        self.moves
            .iter()
            .find(|move_| move_.name == name)
            .map(Move::permutation)
    }

    /// Look up a move by name, preferring an exact match and falling back to
    /// an ASCII case-insensitive one
    pub fn find(&self, name: &str) -> Option<&Move> {
        self.moves
            .iter()
            .find(|move_| move_.name == name)
            .or_else(|| {
                self.moves
                    .iter()
                    .find(|move_| move_.name.eq_ignore_ascii_case(name))
            })
    }

    pub fn generators(&self) -> impl ExactSizeIterator<Item = &Permutation> {
        self.moves.iter().map(Move::permutation)
    }

    /// The base moves followed by the inverse of each of them
    pub fn generators_with_inverses(&self) -> Vec<Permutation> {
        self.generators()
            .cloned()
            .chain(self.generators().map(Permutation::invert))
            .collect()
    }

    pub fn identity(&self) -> Permutation {
        Permutation::identity()
    }
}

type MoveSpec = (&'static str, &'static [&'static [usize]]);

// Facelets 0..5 are the top face, then front, right, back, left and bottom,
// five facelets each: center first, then the corners.
const SKEWB_MOVES: &[MoveSpec] = &[
    (
        "R",
        &[
            &[10, 15, 25],
            &[12, 19, 29],
            &[13, 16, 26],
            &[14, 18, 27],
            &[2, 23, 9],
        ],
    ),
    (
        "U",
        &[
            &[0, 20, 15],
            &[1, 21, 17],
            &[2, 22, 19],
            &[3, 23, 16],
            &[6, 26, 12],
        ],
    ),
    (
        "L",
        &[
            &[5, 25, 20],
            &[6, 29, 23],
            &[8, 28, 24],
            &[9, 26, 22],
            &[3, 13, 19],
        ],
    ),
    (
        "B",
        &[
            &[15, 20, 25],
            &[17, 24, 27],
            &[18, 21, 28],
            &[19, 23, 26],
            &[1, 8, 14],
        ],
    ),
];

// Facelets 0..9 are the top face with the back row first. 9..45 are the three
// rows of the side band, each going front, right, back, left and read from
// outside the cube. 45..54 are the bottom face with the back row first.
const CUBE3_MOVES: &[MoveSpec] = &[
    (
        "U",
        &[
            &[0, 2, 8, 6],
            &[1, 5, 7, 3],
            &[9, 18, 15, 12],
            &[10, 19, 16, 13],
            &[11, 20, 17, 14],
        ],
    ),
    (
        "D",
        &[
            &[33, 36, 39, 42],
            &[34, 37, 40, 43],
            &[35, 38, 41, 44],
            &[45, 51, 53, 47],
            &[46, 48, 52, 50],
        ],
    ),
    (
        "L",
        &[
            &[0, 9, 51, 41],
            &[3, 21, 48, 29],
            &[6, 33, 45, 17],
            &[18, 20, 44, 42],
            &[19, 32, 43, 30],
        ],
    ),
    (
        "R",
        &[
            &[2, 39, 53, 11],
            &[5, 27, 50, 23],
            &[8, 15, 47, 35],
            &[12, 14, 38, 36],
            &[13, 26, 37, 24],
        ],
    ),
    (
        "F",
        &[
            &[6, 12, 53, 44],
            &[7, 24, 52, 32],
            &[8, 36, 51, 20],
            &[9, 11, 35, 33],
            &[10, 23, 34, 21],
        ],
    ),
    (
        "B",
        &[
            &[0, 42, 47, 14],
            &[1, 30, 46, 26],
            &[2, 18, 45, 38],
            &[15, 17, 41, 39],
            &[16, 29, 40, 27],
        ],
    ),
    ("M", &[&[1, 10, 52, 40], &[4, 22, 49, 28], &[7, 34, 46, 16]]),
    ("E", &[&[21, 24, 27, 30], &[22, 25, 28, 31], &[23, 26, 29, 32]]),
    ("S", &[&[3, 13, 50, 43], &[4, 25, 49, 31], &[5, 37, 48, 19]]),
    (
        "X",
        &[
            &[0, 41, 51, 9],
            &[1, 40, 52, 10],
            &[2, 39, 53, 11],
            &[3, 29, 48, 21],
            &[4, 28, 49, 22],
            &[5, 27, 50, 23],
            &[6, 17, 45, 33],
            &[7, 16, 46, 34],
            &[8, 15, 47, 35],
            &[12, 14, 38, 36],
            &[13, 26, 37, 24],
            &[18, 42, 44, 20],
            &[19, 30, 43, 32],
        ],
    ),
    (
        "Y",
        &[
            &[0, 2, 8, 6],
            &[1, 5, 7, 3],
            &[9, 18, 15, 12],
            &[10, 19, 16, 13],
            &[11, 20, 17, 14],
            &[21, 30, 27, 24],
            &[22, 31, 28, 25],
            &[23, 32, 29, 26],
            &[33, 42, 39, 36],
            &[34, 43, 40, 37],
            &[35, 44, 41, 38],
            &[45, 47, 53, 51],
            &[46, 50, 52, 48],
        ],
    ),
    (
        "Z",
        &[
            &[0, 14, 47, 42],
            &[1, 26, 46, 30],
            &[2, 38, 45, 18],
            &[3, 13, 50, 43],
            &[4, 25, 49, 31],
            &[5, 37, 48, 19],
            &[6, 12, 53, 44],
            &[7, 24, 52, 32],
            &[8, 36, 51, 20],
            &[9, 11, 35, 33],
            &[10, 23, 34, 21],
            &[15, 39, 41, 17],
            &[16, 27, 40, 29],
        ],
    ),
];

pub static SKEWB: LazyLock<MoveTable> = LazyLock::new(|| {
    MoveTable::new("skewb", 30, SKEWB_MOVES.iter().copied())
        .expect("the skewb moves to be well formed")
        .with_expected_order(SKEWB_ORDER)
});

pub static CUBE3: LazyLock<MoveTable> = LazyLock::new(|| {
    MoveTable::new("3x3x3", 54, CUBE3_MOVES.iter().copied())
        .expect("the 3x3x3 moves to be well formed")
        .with_expected_order(CUBE3_ORDER)
});

/// The size of the group generated by the skewb's four corner turns
pub const SKEWB_ORDER: Order = Order::from_digit(3_149_280);

const CUBE3_FACE_TURN_STATES: u128 = 43_252_003_274_489_856_000;

/// The size of the 3x3x3 group generated by the six outer face turns
pub const CUBE3_FACE_TURN_ORDER: Order = order_from_u128(CUBE3_FACE_TURN_STATES);

/// Slice turns and rotations additionally reorient the whole cube, one of 24
/// ways
pub const CUBE3_ORDER: Order = order_from_u128(CUBE3_FACE_TURN_STATES * 24);

#[cfg(test)]
mod tests {
    use super::{CUBE3, MoveTable, MoveTableError, SKEWB};
    use crate::{
        math::Order,
        permutation::{Permutation, PermutationError},
    };

    #[test]
    fn skewb_moves() {
        assert_eq!(SKEWB.facelet_count(), 30);
        assert_eq!(
            SKEWB.moves().iter().map(|m| m.name()).collect::<Vec<_>>(),
            vec!["R", "U", "L", "B"]
        );

        for move_ in SKEWB.moves() {
            assert_eq!(move_.permutation().order(), Order::from_digit(3));
            assert_eq!(move_.permutation().cycle_type(), vec![3; 5]);
        }
    }

    #[test]
    fn cube_moves() {
        assert_eq!(CUBE3.facelet_count(), 54);
        assert_eq!(CUBE3.moves().len(), 12);

        for move_ in CUBE3.moves() {
            assert_eq!(
                move_.permutation().order(),
                Order::from_digit(4),
                "{}",
                move_.name()
            );
        }

        let get = |name| CUBE3.get(name).unwrap().clone();

        // Quarter turns of a face cycle four corner and four edge facelets on
        // the face, and three facelets on each side of it
        assert_eq!(get("U").cycle_type(), vec![4; 5]);
        assert_eq!(get("M").cycle_type(), vec![4; 3]);
        assert_eq!(get("X").cycle_type(), vec![4; 13]);
    }

    #[test]
    fn rotations_are_layer_turns() {
        let get = |name| CUBE3.get(name).unwrap().clone();

        assert_eq!(
            get("R").apply_after(&get("M").invert()).apply_after(&get("L").invert()),
            get("X")
        );
        assert_eq!(
            get("U").apply_after(&get("E").invert()).apply_after(&get("D").invert()),
            get("Y")
        );
        assert_eq!(
            get("F").apply_after(&get("S")).apply_after(&get("B").invert()),
            get("Z")
        );
    }

    #[test]
    fn lookup() {
        assert!(CUBE3.get("x").is_none());
        assert_eq!(CUBE3.find("x").unwrap().name(), "X");
        assert_eq!(SKEWB.find("r").unwrap().permutation(), SKEWB.get("R").unwrap());
        assert!(SKEWB.find("F").is_none());

        let with_inverses = SKEWB.generators_with_inverses();
        assert_eq!(with_inverses.len(), 8);
        assert_eq!(with_inverses[4], SKEWB.get("R").unwrap().invert());
        assert_eq!(SKEWB.identity(), Permutation::identity());
    }

    #[test]
    fn malformed_tables() {
        assert_eq!(
            MoveTable::new("bad", 4, [("A", vec![vec![0, 1], vec![1, 2]])]).unwrap_err(),
            MoveTableError::MalformedMove {
                name: "A".to_owned(),
                source: PermutationError::DuplicateMapping { position: 1 }
            }
        );
        assert_eq!(
            MoveTable::new("bad", 4, [("A", vec![vec![0, 4]])]).unwrap_err(),
            MoveTableError::PositionOutOfRange {
                name: "A".to_owned(),
                position: 4,
                facelet_count: 4
            }
        );
        assert_eq!(
            MoveTable::new("bad", 4, [("A", vec![vec![0, 1]]), ("A", vec![vec![2, 3]])])
                .unwrap_err(),
            MoveTableError::DuplicateMoveName("A".to_owned())
        );
        assert_eq!(
            MoveTable::new("bad", 4, Vec::<(&str, Vec<Vec<usize>>)>::new()).unwrap_err(),
            MoveTableError::NoMoves
        );
    }
}
