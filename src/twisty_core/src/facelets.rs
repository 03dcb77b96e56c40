//! Sticker colors and the flat nets puzzles are drawn with.
//!
//! A state is drawn by inverting it and reading each facelet's color from the
//! solved arrangement: facelet `i` shows the color of the facelet that the
//! state carried into position `i`. See [`Permutation::arrange`].

use std::fmt::Display;

use crate::permutation::Permutation;

use Color::{Blue as B, Green as G, Orange as O, Red as R, White as W, Yellow as Y};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Green,
    Red,
    Blue,
    Orange,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::Orange,
        Color::Yellow,
    ];

    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::White => (0xFF, 0xFF, 0xFF),
            Color::Green => (0x02, 0xD0, 0x40),
            Color::Red => (0xEC, 0x00, 0x00),
            Color::Blue => (0x30, 0x4F, 0xFE),
            Color::Orange => (0xFF, 0x8B, 0x24),
            Color::Yellow => (0xFD, 0xD8, 0x35),
        }
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Green => 'G',
            Color::Red => 'R',
            Color::Blue => 'B',
            Color::Orange => 'O',
            Color::Yellow => 'Y',
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Where one face sits in a net, and which facelet is drawn in each cell of
/// its 3x3 grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceLayout {
    pub name: &'static str,
    pub column: usize,
    pub row: usize,
    pub cells: [[usize; 3]; 3],
}

/// A flat drawing of a puzzle: four faces across the middle, with the top and
/// bottom faces above and below the second one
#[derive(Clone, Copy, Debug)]
pub struct Net {
    pub faces: [FaceLayout; 6],
    pub solved: &'static [Color],
}

impl Net {
    pub const COLUMNS: usize = 12;
    pub const ROWS: usize = 9;

    pub fn facelet_count(&self) -> usize {
        self.solved.len()
    }

    /// The color shown at each facelet
    pub fn colors(&self, state: &Permutation) -> Vec<Color> {
        state.arrange(self.solved)
    }

    /// The net as a grid of cells, `None` where no face is drawn
    pub fn grid(&self, state: &Permutation) -> Vec<Vec<Option<Color>>> {
        let colors = self.colors(state);
        let mut grid = vec![vec![None; Net::COLUMNS]; Net::ROWS];

        for face in &self.faces {
            for (j, row) in face.cells.iter().enumerate() {
                for (i, &facelet) in row.iter().enumerate() {
                    grid[3 * face.row + j][3 * face.column + i] = Some(colors[facelet]);
                }
            }
        }

        grid
    }

    /// The net as lines of color letters
    pub fn letters(&self, state: &Permutation) -> String {
        self.grid(state)
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or(' ', Color::letter))
                    .collect::<String>()
                    .trim_end()
                    .to_owned()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

const fn cube_face(
    name: &'static str,
    column: usize,
    row: usize,
    cells: [[usize; 3]; 3],
) -> FaceLayout {
    FaceLayout {
        name,
        column,
        row,
        cells,
    }
}

/// Skewb centers are diamonds touching the middle of every edge, so they fill
/// the middle cross of the grid and the corners fill the rest
const fn skewb_face(
    name: &'static str,
    column: usize,
    row: usize,
    [center, top_left, top_right, bottom_left, bottom_right]: [usize; 5],
) -> FaceLayout {
    FaceLayout {
        name,
        column,
        row,
        cells: [
            [top_left, center, top_right],
            [center, center, center],
            [bottom_left, center, bottom_right],
        ],
    }
}

#[rustfmt::skip]
pub const SKEWB_SOLVED: &[Color] = &[
    W, W, W, W, W,
    G, G, G, G, G,
    R, R, R, R, R,
    B, B, B, B, B,
    O, O, O, O, O,
    Y, Y, Y, Y, Y,
];

#[rustfmt::skip]
pub const CUBE3_SOLVED: &[Color] = &[
    W, W, W,
    W, W, W,
    W, W, W,

    G, G, G,  R, R, R,  B, B, B,  O, O, O,
    G, G, G,  R, R, R,  B, B, B,  O, O, O,
    G, G, G,  R, R, R,  B, B, B,  O, O, O,

    Y, Y, Y,
    Y, Y, Y,
    Y, Y, Y,
];

pub const SKEWB_NET: Net = Net {
    faces: [
        skewb_face("top", 1, 0, [0, 1, 2, 3, 4]),
        skewb_face("left", 0, 1, [20, 21, 22, 23, 24]),
        skewb_face("front", 1, 1, [5, 6, 7, 8, 9]),
        skewb_face("right", 2, 1, [10, 11, 12, 13, 14]),
        skewb_face("back", 3, 1, [15, 16, 17, 18, 19]),
        skewb_face("bottom", 1, 2, [25, 28, 29, 26, 27]),
    ],
    solved: SKEWB_SOLVED,
};

pub const CUBE3_NET: Net = Net {
    faces: [
        cube_face("top", 1, 0, [[0, 1, 2], [3, 4, 5], [6, 7, 8]]),
        cube_face("left", 0, 1, [[18, 19, 20], [30, 31, 32], [42, 43, 44]]),
        cube_face("front", 1, 1, [[9, 10, 11], [21, 22, 23], [33, 34, 35]]),
        cube_face("right", 2, 1, [[12, 13, 14], [24, 25, 26], [36, 37, 38]]),
        cube_face("back", 3, 1, [[15, 16, 17], [27, 28, 29], [39, 40, 41]]),
        cube_face("bottom", 1, 2, [[51, 52, 53], [48, 49, 50], [45, 46, 47]]),
    ],
    solved: CUBE3_SOLVED,
};
