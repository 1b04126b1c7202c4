#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Open,
    Wall,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,
    #[error("row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("invalid cell value {value} at row {row}, col {col} (expected 0 or 1)")]
    InvalidCell { row: usize, col: usize, value: u8 },
}

/// 10x10 reference scene, 1 = wall.
const REFERENCE: [[u8; 10]; 10] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 1, 1, 1, 1, 0, 1, 1],
    [1, 0, 0, 1, 1, 1, 1, 0, 1, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 1, 1],
    [1, 0, 0, 1, 1, 1, 1, 0, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// Immutable occupancy table, indexed `(row = y, col = x)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<Cell>, // row-major
}

impl GridMap {
    /// Builds a map from rows of 0 (open) / 1 (wall).
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != width {
                return Err(GridError::RaggedRow {
                    row,
                    len: values.len(),
                    expected: width,
                });
            }
            for (col, &value) in values.iter().enumerate() {
                cells.push(match value {
                    0 => Cell::Open,
                    1 => Cell::Wall,
                    _ => return Err(GridError::InvalidCell { row, col, value }),
                });
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn reference() -> Self {
        let cells = REFERENCE
            .iter()
            .flatten()
            .map(|&v| if v == 1 { Cell::Wall } else { Cell::Open })
            .collect();
        Self {
            width: REFERENCE[0].len(),
            height: REFERENCE.len(),
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Unchecked-by-contract lookup; the indices must lie inside the table.
    #[inline]
    pub fn cell_is_wall(&self, row: usize, col: usize) -> bool {
        debug_assert!(row < self.height && col < self.width);
        self.cells[row * self.width + col] == Cell::Wall
    }

    /// Bounds-checked lookup. Negative or past-the-edge indices give `None`.
    #[inline]
    pub fn cell(&self, row: i64, col: i64) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    /// Whether the floating grid position `(x, y)` is inside an open cell.
    pub fn is_open_at(&self, x: f32, y: f32) -> bool {
        self.cell(y.floor() as i64, x.floor() as i64) == Some(Cell::Open)
    }

    /// True when every border cell is a wall, so every ray that starts
    /// inside the map terminates on a wall.
    pub fn is_enclosed(&self) -> bool {
        let (w, h) = (self.width, self.height);
        (0..w).all(|c| self.cell_is_wall(0, c) && self.cell_is_wall(h - 1, c))
            && (0..h).all(|r| self.cell_is_wall(r, 0) && self.cell_is_wall(r, w - 1))
    }
}
