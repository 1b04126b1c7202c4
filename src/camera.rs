use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pos: [f32; 2], // (x, y) in grid units
    pub dir: f32,      // radians, heading in the X-Y plane
    pub fov: f32,      // degrees, horizontal
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pos: [1.0, 1.0],
            dir: 0.0,
            fov: 75.0,
        }
    }
}

impl Camera {
    #[inline]
    pub fn fov_radians(&self) -> f32 {
        self.fov.to_radians()
    }

    /// Heading of the ray for screen column `column` out of `width`.
    /// Column 0 sits on the left edge of the fan.
    #[inline]
    pub fn ray_angle(&self, column: usize, width: usize) -> f32 {
        // dir - fov/2 + fov * column/width, arranged so the middle column
        // gets exactly dir
        self.dir + self.fov_radians() * (column as f32 / width as f32 - 0.5)
    }

    /// Unit heading vector `(cos dir, sin dir)`.
    #[inline]
    pub fn forward(&self) -> [f32; 2] {
        [self.dir.cos(), self.dir.sin()]
    }

    pub fn rotate(&mut self, delta: f32) {
        self.dir += delta;
        // Keep dir in [-pi, pi] to avoid float drift
        if self.dir > PI {
            self.dir -= 2.0 * PI;
        }
        if self.dir < -PI {
            self.dir += 2.0 * PI;
        }
    }

    /// Moves along the heading; negative `distance` walks backwards.
    /// No collision checks.
    pub fn advance(&mut self, distance: f32) {
        let [fx, fy] = self.forward();
        self.pos[0] += distance * fx;
        self.pos[1] += distance * fy;
    }
}
