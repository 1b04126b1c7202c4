use rayon::{
    iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::{
    camera::Camera,
    caster::{self, Hit, March},
    color::Color,
    grid::GridMap,
};

/// Hit distances are clamped to this before computing slice heights.
pub const MIN_DIST: f32 = 1e-3;

/// Shading factor for South and West faces.
const DIM: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub width: usize,
    pub height: usize,
    pub base_color: Color,
    pub march: March,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            base_color: Color::RED,
            march: March::default(),
        }
    }
}

/// Row-major frame of `width * height` colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<Color> {
        self.pixels
    }
}

/// Projected wall run for one column. Rows are inclusive and already
/// clipped to the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallSlice {
    pub top: usize,
    pub bottom: usize,
    pub line_height: i64,
    pub color: Color,
}

impl WallSlice {
    #[inline]
    fn covers(&self, row: usize) -> bool {
        self.top <= row && row <= self.bottom
    }
}

/// Turns a hit into the column's wall run.
pub fn wall_slice(hit: &Hit, height: usize, base_color: Color) -> Option<WallSlice> {
    if height == 0 {
        return None;
    }
    let h = height as i64;
    let line_height = (height as f32 / hit.dist.max(MIN_DIST)) as i64;
    let line_start = h / 2 - line_height / 2;
    let line_end = h / 2 + line_height / 2;

    let color = if hit.face.is_bright() {
        base_color
    } else {
        base_color.scale(DIM)
    };

    Some(WallSlice {
        top: line_start.max(0) as usize,
        bottom: line_end.min(h - 1) as usize,
        line_height,
        color,
    })
}

/// Casts the ray for column `x` and projects it. `None` means the column
/// stays black.
pub fn project_column(
    camera: &Camera,
    grid: &GridMap,
    params: &RenderParams,
    x: usize,
) -> Option<WallSlice> {
    let angle = camera.ray_angle(x, params.width);
    let hit = caster::cast_ray(grid, camera.pos, angle, &params.march)?;
    wall_slice(&hit, params.height, params.base_color)
}

/// Renders one frame. Pure in its inputs; the returned buffer is fresh.
pub fn render(camera: &Camera, grid: &GridMap, params: &RenderParams) -> PixelBuffer {
    let (width, height) = (params.width, params.height);

    // Columns are independent; each worker produces its own slice record
    let slices: Vec<Option<WallSlice>> = (0..width)
        .into_par_iter()
        .map(|x| project_column(camera, grid, params, x))
        .collect();

    let mut pixels = vec![Color::BLACK; width * height];
    if width > 0 {
        // Fill by disjoint rows
        pixels.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
            for (px, slice) in row.iter_mut().zip(&slices) {
                match slice {
                    Some(s) if s.covers(y) => *px = s.color,
                    _ => {}
                }
            }
        });
    }

    let misses = slices.iter().filter(|s| s.is_none()).count();
    if misses > 0 && height > 0 {
        tracing::trace!(misses, "columns without a wall hit");
    }

    PixelBuffer {
        width,
        height,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caster::Face;

    /// Inclusive row range of the non-black run in column `x`; asserts the
    /// run is contiguous.
    fn wall_run(buf: &PixelBuffer, x: usize) -> Option<(usize, usize)> {
        let filled: Vec<usize> = (0..buf.height())
            .filter(|&y| buf.get(x, y) != Color::BLACK)
            .collect();
        let (&first, &last) = (filled.first()?, filled.last()?);
        assert_eq!(
            last - first + 1,
            filled.len(),
            "column {x} has a broken wall run"
        );
        Some((first, last))
    }

    /// 7x7 room with a wall border; the camera sits at (4.5, 3.5) facing +x
    /// so a 60 degree fan lands entirely on the east wall.
    fn facing_wall() -> (GridMap, Camera, RenderParams) {
        let mut rows = vec![vec![0u8; 7]; 7];
        for i in 0..7 {
            rows[0][i] = 1;
            rows[6][i] = 1;
            rows[i][0] = 1;
            rows[i][6] = 1;
        }
        let grid = GridMap::from_rows(&rows).unwrap();
        let camera = Camera {
            pos: [4.5, 3.5],
            dir: 0.0,
            fov: 60.0,
        };
        let params = RenderParams {
            width: 64,
            height: 48,
            base_color: Color::new(201, 99, 7),
            ..RenderParams::default()
        };
        (grid, camera, params)
    }

    #[test]
    fn reference_center_column() {
        let grid = GridMap::reference();
        let buf = render(&Camera::default(), &grid, &RenderParams::default());
        assert_eq!(buf.pixels().len(), 640 * 480);

        let (top, bottom) = wall_run(&buf, 320).unwrap();
        let height = bottom - top;
        assert!((238..=242).contains(&height), "height = {height}");
        assert!(((top + bottom) / 2).abs_diff(240) <= 1);
        assert_eq!(buf.get(320, 240), Color::RED);
        assert_eq!(buf.get(320, 0), Color::BLACK);
        assert_eq!(buf.get(320, 479), Color::BLACK);
    }

    #[test]
    fn every_column_has_one_run() {
        let grid = GridMap::reference();
        for (pos, dir) in [([1.0, 1.0], 0.0), ([1.5, 7.5], 1.2), ([7.5, 2.5], -2.0)] {
            let camera = Camera {
                pos,
                dir,
                ..Camera::default()
            };
            let params = RenderParams {
                width: 96,
                height: 72,
                ..RenderParams::default()
            };
            let buf = render(&camera, &grid, &params);
            for x in 0..buf.width() {
                assert!(wall_run(&buf, x).is_some(), "column {x} is empty");
            }
        }
    }

    #[test]
    fn shading_is_binary() {
        let grid = GridMap::reference();
        let base = Color::new(201, 99, 7);
        let dim = base.scale(0.5);
        let params = RenderParams {
            width: 120,
            height: 90,
            base_color: base,
            ..RenderParams::default()
        };
        let camera = Camera {
            pos: [1.5, 7.5],
            dir: -0.7,
            ..Camera::default()
        };
        let buf = render(&camera, &grid, &params);

        let mut seen = (false, false);
        for &px in buf.pixels() {
            match px {
                p if p == Color::BLACK => {}
                p if p == base => seen.0 = true,
                p if p == dim => seen.1 = true,
                other => panic!("unexpected shade {other}"),
            }
        }
        assert!(seen.0 && seen.1, "expected both shades in this view");
    }

    #[test]
    fn closer_walls_are_taller() {
        let (grid, mut camera, params) = facing_wall();
        let mid = params.width / 2;

        let near = wall_run(&render(&camera, &grid, &params), mid).unwrap();
        camera.pos[0] = 1.5;
        let far = wall_run(&render(&camera, &grid, &params), mid).unwrap();

        assert!(near.1 - near.0 > far.1 - far.0);
    }

    #[test]
    fn slice_height_is_non_increasing_in_distance() {
        let base = Color::RED;
        let mut previous = i64::MAX;
        for i in 1..400 {
            let hit = Hit {
                dist: i as f32 * 0.05,
                face: Face::East,
                cell: (0, 0),
            };
            let slice = wall_slice(&hit, 480, base).unwrap();
            assert!(slice.line_height <= previous);
            previous = slice.line_height;
        }
    }

    #[test]
    fn mirror_symmetric_room() {
        let (grid, camera, params) = facing_wall();
        let buf = render(&camera, &grid, &params);
        let w = params.width;

        for x in 1..w {
            let (a, b) = (wall_run(&buf, x).unwrap(), wall_run(&buf, w - x).unwrap());
            assert!(a.0.abs_diff(b.0) <= 1, "tops differ at column {x}");
            assert!(a.1.abs_diff(b.1) <= 1, "bottoms differ at column {x}");
            assert_eq!(buf.get(x, a.0), buf.get(w - x, b.0));
        }
    }

    #[test]
    fn render_is_deterministic() {
        let grid = GridMap::reference();
        let camera = Camera {
            pos: [5.2, 1.7],
            dir: 2.4,
            ..Camera::default()
        };
        let params = RenderParams {
            width: 160,
            height: 120,
            ..RenderParams::default()
        };
        assert_eq!(
            render(&camera, &grid, &params),
            render(&camera, &grid, &params)
        );
    }

    #[test]
    fn rotation_shifts_by_one_column() {
        let (grid, camera, params) = facing_wall();
        let w = params.width;
        let before = render(&camera, &grid, &params);

        let mut turned = camera;
        turned.dir += camera.fov_radians() / w as f32;
        let after = render(&turned, &grid, &params);

        for x in 0..w - 1 {
            let (a, b) = (wall_run(&after, x).unwrap(), wall_run(&before, x + 1).unwrap());
            assert!(a.0.abs_diff(b.0) <= 1, "column {x} jumped");
            assert!(a.1.abs_diff(b.1) <= 1, "column {x} jumped");
        }
    }

    #[test]
    fn unenclosed_map_renders_black() {
        let grid = GridMap::from_rows(&[[0u8; 3]; 3]).unwrap();
        let camera = Camera {
            pos: [1.5, 1.5],
            ..Camera::default()
        };
        let params = RenderParams {
            width: 16,
            height: 12,
            ..RenderParams::default()
        };
        let buf = render(&camera, &grid, &params);
        assert!(buf.pixels().iter().all(|&p| p == Color::BLACK));
    }

    #[test]
    fn camera_inside_wall_fills_columns() {
        let grid = GridMap::reference();
        let camera = Camera {
            pos: [0.5, 0.5],
            ..Camera::default()
        };
        let params = RenderParams {
            width: 8,
            height: 6,
            ..RenderParams::default()
        };
        let buf = render(&camera, &grid, &params);
        for x in 0..8 {
            assert_eq!(wall_run(&buf, x), Some((0, 5)));
        }
    }

    #[test]
    fn empty_frame() {
        let grid = GridMap::reference();
        let params = RenderParams {
            width: 0,
            height: 0,
            ..RenderParams::default()
        };
        let buf = render(&Camera::default(), &grid, &params);
        assert!(buf.pixels().is_empty());
    }
}
