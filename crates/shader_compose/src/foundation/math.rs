//! Math types for material parameters and shader uniforms
//!
//! Thin aliases over nalgebra plus a small RGB color value type. Colors are
//! kept separate from vectors because material color parameters carry
//! semantics of their own (a black specular color disables the entire
//! specular feature, for example).

pub use nalgebra::{Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// RGB color with `f32` channels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color3 {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Color3 {
    /// Opaque white
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    /// Opaque black
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0 };

    /// Create a color from individual channels
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Whether all channels are exactly zero
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }
}

impl Default for Color3 {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 3]> for Color3 {
    fn from(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

/// Clamp a value into `[0, 1]`
pub fn saturate(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
