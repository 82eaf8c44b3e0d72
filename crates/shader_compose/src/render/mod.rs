//! Renderer collaborator boundary
//!
//! The material and composition engine never talks to a GPU driver
//! directly. Everything it needs from the outside world is expressed by two
//! traits: [`ProgramGenerator`] (compile/link a program for a flag set,
//! resolve uniform and attribute locations) and [`RenderBackend`]
//! (make a program current, bind textures, set sampler state and uniform
//! values). A real OpenGL/Vulkan backend implements both; the bundled
//! [`HeadlessBackend`] implements them against plain data structures for
//! tests and tooling.

pub mod headless;

pub use headless::HeadlessBackend;

use slotmap::new_key_type;
use thiserror::Error;

use crate::foundation::math::{Color3, Vec2, Vec4};
use crate::program::ProgramFlags;

new_key_type! {
    /// Opaque handle of a compiled and linked GPU program
    pub struct ProgramHandle;

    /// Opaque handle of a GPU texture
    pub struct TextureHandle;
}

/// Resolved location of a program uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// Resolved location of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeLocation(pub u32);

/// Errors surfaced by program generation
#[derive(Debug, Error)]
pub enum ProgramError {
    /// Shader compilation or program linking failed
    #[error("program generation failed for flags {flags:?}: {reason}")]
    GenerationFailed {
        /// Flag set the generation was attempted for
        flags: ProgramFlags,
        /// Backend-provided reason
        reason: String,
    },
    /// The requested shader language is not available on this backend
    #[error("shader language not supported: {0}")]
    UnsupportedShaderLanguage(String),
}

/// Texture addressing mode along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureAddressing {
    /// Repeat the texture (tiling maps)
    Wrap,
    /// Clamp to the edge texel (non-tiling maps)
    Clamp,
}

/// Texture filtering policy applied uniformly to all bound units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFiltering {
    /// Nearest-neighbour sampling
    None,
    /// Bilinear sampling
    Bilinear,
    /// Anisotropic sampling with the given maximum anisotropy
    Anisotropic(u8),
}

impl TextureFiltering {
    /// Convert a numeric filtering level (0 = none, 1 = bilinear,
    /// N > 1 = anisotropic-N) into a filtering policy
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Self::None,
            1 => Self::Bilinear,
            n => Self::Anisotropic(n),
        }
    }
}

/// A uniform value as handed to the backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// Scalar
    F32(f32),
    /// Two scalars (scale/bias pairs, UV scales)
    Vec2(Vec2),
    /// RGB color
    Color(Color3),
    /// Four-component vector (clip planes)
    Vec4(Vec4),
}

/// Compiles GPU programs for flag sets and resolves their symbol locations
///
/// How the flag set is baked into generated shader source is entirely the
/// backend's business; this engine only keys on the flags.
pub trait ProgramGenerator {
    /// Compile and link a program variant for the given flag set
    ///
    /// # Errors
    /// Returns [`ProgramError`] when compilation or linking fails; callers
    /// treat this as "skip drawing with this material".
    fn generate_program(&mut self, flags: ProgramFlags) -> Result<ProgramHandle, ProgramError>;

    /// Resolve a uniform location by name; `None` when the program variant
    /// was compiled without that symbol
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    /// Resolve a vertex attribute location by name
    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<AttributeLocation>;
}

/// Imperative per-draw GPU state interface
pub trait RenderBackend {
    /// Make the given program current; `false` means the program cannot be
    /// used this frame and the draw should be skipped
    fn set_program(&mut self, program: ProgramHandle) -> bool;

    /// Bind a texture to the sampler uniform at `location`
    ///
    /// Returns the texture unit the texture was assigned to, or `None` when
    /// the binding failed.
    fn bind_texture(
        &mut self,
        location: UniformLocation,
        texture: TextureHandle,
    ) -> Option<u32>;

    /// Set the addressing mode of a texture unit
    fn set_sampler_address(&mut self, unit: u32, u: TextureAddressing, v: TextureAddressing);

    /// Set the filtering of a texture unit
    fn set_sampler_filtering(&mut self, unit: u32, filtering: TextureFiltering);

    /// Set a uniform value
    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue);
}
