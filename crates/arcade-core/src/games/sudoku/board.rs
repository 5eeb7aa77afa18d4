use crate::geometry::GridPos;

pub const SIZE: usize = 9;
pub const BOX: usize = 3;

/// Bit `v` set means digit `v` is allowed
pub type Candidates = u16;

const ALL_DIGITS: Candidates = 0b11_1111_1110;

/// 9x9 digits, 0 for empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[u8; SIZE]; SIZE],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse 81 characters, digits or `.`/`0` for empty; whitespace is skipped
    pub fn parse(text: &str) -> Option<Self> {
        let digits: Vec<u8> = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '.' => Some(0),
                c => c.to_digit(10).map(|d| d as u8),
            })
            .collect::<Option<_>>()?;
        if digits.len() != SIZE * SIZE {
            return None;
        }
        let mut board = Self::empty();
        for (i, d) in digits.into_iter().enumerate() {
            board.cells[i / SIZE][i % SIZE] = d;
        }
        Some(board)
    }

    pub fn contains(pos: GridPos) -> bool {
        pos.row < SIZE && pos.col < SIZE
    }

    /// None for empty cells and for positions off the board
    pub fn get(&self, pos: GridPos) -> Option<u8> {
        match self.cells.get(pos.row).and_then(|row| row.get(pos.col)) {
            None | Some(0) => None,
            Some(&v) => Some(v),
        }
    }

    /// Positions off the board are ignored
    pub fn set(&mut self, pos: GridPos, value: Option<u8>) {
        if let Some(cell) = self.cells.get_mut(pos.row).and_then(|row| row.get_mut(pos.col)) {
            *cell = value.unwrap_or(0);
        }
    }

    pub fn positions() -> impl Iterator<Item = GridPos> {
        (0..SIZE).flat_map(|row| (0..SIZE).map(move |col| GridPos::new(row, col)))
    }

    pub fn empty_positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        Self::positions().filter(|&pos| self.get(pos).is_none())
    }

    pub fn filled_count(&self) -> usize {
        Self::positions().filter(|&pos| self.get(pos).is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.empty_positions().next().is_none()
    }

    /// Cells sharing a row, column or box with `pos`, excluding `pos` itself
    pub fn peers(pos: GridPos) -> impl Iterator<Item = GridPos> {
        let (box_row, box_col) = (pos.row / BOX * BOX, pos.col / BOX * BOX);
        Self::positions().filter(move |p| {
            *p != pos
                && (p.row == pos.row
                    || p.col == pos.col
                    || (p.row / BOX * BOX == box_row && p.col / BOX * BOX == box_col))
        })
    }

    /// Digits that could go at `pos` given its peers
    pub fn candidates(&self, pos: GridPos) -> Candidates {
        Self::peers(pos)
            .filter_map(|p| self.get(p))
            .fold(ALL_DIGITS, |mask, v| mask & !(1 << v))
    }

    pub fn allows(&self, pos: GridPos, value: u8) -> bool {
        self.candidates(pos) & (1 << value) != 0
    }
}

/// Digits in a candidate mask, ascending
pub fn digits(mask: Candidates) -> impl Iterator<Item = u8> {
    (1..=9u8).filter(move |v| mask & (1 << v) != 0)
}
