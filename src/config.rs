use clap::Parser;

use crate::{
    camera::Camera,
    caster::{DEFAULT_MAX_DISTANCE, DEFAULT_STEP, March},
    color::Color,
    grid::GridMap,
    renderer::RenderParams,
};

#[derive(Debug, Parser)]
#[command(name = "grid_raycaster", about = "Grid ray-casting renderer")]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Frame buffer width in pixels
    #[arg(long, default_value_t = 640)]
    pub width: usize,

    /// Frame buffer height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: usize,

    /// Initial camera x, in grid units
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub x: f32,

    /// Initial camera y, in grid units
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub y: f32,

    /// Initial heading in radians
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub dir: f32,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 75.0)]
    pub fov: f32,

    /// Wall color: "r,g,b", "#rrggbb" or a name (red, green, blue, white)
    #[arg(long, default_value = "255,0,0")]
    pub color: Color,

    /// Ray march step in grid units
    #[arg(long, default_value_t = DEFAULT_STEP)]
    pub step: f32,

    /// Distance after which a ray counts as a miss
    #[arg(long, default_value_t = DEFAULT_MAX_DISTANCE)]
    pub max_distance: f32,

    /// Render worker threads (0 = one per core)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("frame size must be non-zero, got {width}x{height}")]
    ZeroSize { width: usize, height: usize },
    #[error("field of view must be within (0, 180) degrees, got {0}")]
    Fov(f32),
    #[error("march step must be positive, got {0}")]
    Step(f32),
    #[error("max distance {max_distance} must exceed the march step {step}")]
    MaxDistance { max_distance: f32, step: f32 },
}

/// Validated startup state for one session.
#[derive(Debug, Clone)]
pub struct Settings {
    pub camera: Camera,
    pub grid: GridMap,
    pub params: RenderParams,
    pub threads: usize,
}

impl Cli {
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroSize {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(ConfigError::Fov(self.fov));
        }
        if !(self.step > 0.0 && self.step.is_finite()) {
            return Err(ConfigError::Step(self.step));
        }
        if !(self.max_distance > self.step) {
            return Err(ConfigError::MaxDistance {
                max_distance: self.max_distance,
                step: self.step,
            });
        }

        Ok(Settings {
            camera: Camera {
                pos: [self.x, self.y],
                dir: self.dir,
                fov: self.fov,
            },
            grid: GridMap::reference(),
            params: RenderParams {
                width: self.width,
                height: self.height,
                base_color: self.color,
                march: March {
                    step: self.step,
                    max_distance: self.max_distance,
                },
            },
            threads: self.threads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("grid_raycaster").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults_match_reference_scene() {
        let settings = parse(&[]).into_settings().unwrap();
        assert_eq!(settings.camera, Camera::default());
        assert_eq!(settings.params, RenderParams::default());
        assert_eq!(settings.grid, GridMap::reference());
        assert_eq!(settings.threads, 0);
    }

    #[test]
    fn overrides() {
        let settings = parse(&[
            "--width", "320", "--height", "200", "--x", "2.5", "--dir", "-1.5", "--fov", "90",
            "--color", "#00ff00", "--step", "0.05",
        ])
        .into_settings()
        .unwrap();
        assert_eq!((settings.params.width, settings.params.height), (320, 200));
        assert_eq!(settings.camera.pos, [2.5, 1.0]);
        assert_eq!(settings.camera.dir, -1.5);
        assert_eq!(settings.camera.fov, 90.0);
        assert_eq!(settings.params.base_color, Color::GREEN);
        assert_eq!(settings.params.march.step, 0.05);
    }

    #[test]
    fn bad_color_is_a_parse_error() {
        let parsed = Cli::try_parse_from(["grid_raycaster", "--color", "1,2"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn validation_errors() {
        assert_eq!(
            parse(&["--width", "0"]).into_settings().unwrap_err(),
            ConfigError::ZeroSize {
                width: 0,
                height: 480
            }
        );
        assert_eq!(
            parse(&["--fov", "180"]).into_settings().unwrap_err(),
            ConfigError::Fov(180.0)
        );
        assert_eq!(
            parse(&["--step", "0"]).into_settings().unwrap_err(),
            ConfigError::Step(0.0)
        );
        assert_eq!(
            parse(&["--max-distance", "0.001"])
                .into_settings()
                .unwrap_err(),
            ConfigError::MaxDistance {
                max_distance: 0.001,
                step: DEFAULT_STEP
            }
        );
    }
}
