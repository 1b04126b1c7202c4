//! Grid ray-casting renderer.
//!
//! Marches one ray per screen column through a [`GridMap`], classifies the
//! struck wall [`Face`], and projects the hit distance into a shaded wall
//! slice. [`render`] is a pure function of the camera, grid and
//! [`RenderParams`]; the window shell in `main.rs` only feeds it camera
//! updates and presents the returned [`PixelBuffer`].

pub mod camera;
pub mod caster;
pub mod color;
pub mod config;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod scaler;

pub use camera::Camera;
pub use caster::{Face, Hit, March, cast_ray, classify_face};
pub use color::{Color, ColorParseError};
pub use config::{Cli, ConfigError, Settings};
pub use grid::{Cell, GridError, GridMap};
pub use input::{Action, Motion};
pub use renderer::{PixelBuffer, RenderParams, WallSlice, render};
pub use scaler::{ScaleLut, blit_nearest_stretch, build_scale_lut};
