use crate::grid::{Cell, GridMap};

pub const DEFAULT_STEP: f32 = 0.01;
pub const DEFAULT_MAX_DISTANCE: f32 = 64.0;

/// Side of a wall cell a ray struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    North,
    East,
    South,
    West,
}

impl Face {
    /// North and East faces are lit at full intensity, the others at half.
    #[inline]
    pub fn is_bright(self) -> bool {
        matches!(self, Face::North | Face::East)
    }
}

/// Fixed-step march settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct March {
    pub step: f32,
    pub max_distance: f32,
}

impl Default for March {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            max_distance: DEFAULT_MAX_DISTANCE,
        }
    }
}

impl March {
    /// Number of samples taken before giving up.
    fn max_steps(&self) -> u32 {
        if !(self.step > 0.0) {
            return 0;
        }
        // NaN -> 0, inf -> u32::MAX
        (self.max_distance / self.step).ceil() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub dist: f32,
    pub face: Face,
    pub cell: (usize, usize), // (row, col)
}

#[inline]
fn fract(v: f32) -> f32 {
    v - v.floor()
}

/// Classifies the struck face from the last open sample and the first
/// sample inside the wall. An x boundary crossing wins over a y crossing.
/// When neither integer coordinate changed (the march started inside a
/// wall) the face is North.
pub fn classify_face(last: [f32; 2], hit: [f32; 2]) -> Face {
    if last[0].floor() != hit[0].floor() {
        if fract(last[0]) > 0.5 {
            Face::East
        } else {
            Face::West
        }
    } else if last[1].floor() != hit[1].floor() {
        if fract(last[1]) > 0.5 {
            Face::North
        } else {
            Face::South
        }
    } else {
        Face::North
    }
}

/// Marches from `origin` along `angle` until a wall cell is entered.
///
/// Returns `None` when the ray leaves the map or exceeds
/// `march.max_distance` without hitting anything.
pub fn cast_ray(grid: &GridMap, origin: [f32; 2], angle: f32, march: &March) -> Option<Hit> {
    let dx = angle.cos();
    let dy = angle.sin();

    let mut last = origin;
    for i in 1..=march.max_steps() {
        // Scale the step count instead of accumulating to keep sample
        // positions free of summation drift.
        let dist = i as f32 * march.step;
        let p = [origin[0] + dist * dx, origin[1] + dist * dy];
        let (row, col) = (p[1].floor() as i64, p[0].floor() as i64);

        match grid.cell(row, col)? {
            Cell::Wall => {
                return Some(Hit {
                    dist,
                    face: classify_face(last, p),
                    cell: (row as usize, col as usize),
                });
            }
            Cell::Open => last = p,
        }
    }

    None
}
