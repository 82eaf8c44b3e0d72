//! Texture references as seen by the material system
//!
//! The material system never touches texel data. What it needs from a
//! texture is the opaque GPU handle plus the descriptor facts that drive
//! shader variant selection: dimensionality, component count and the
//! compression hint stored alongside the asset.

use crate::render::TextureHandle;

/// Texture dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    /// 1D texture
    D1,
    /// 2D texture
    D2,
    /// 3D (volume) texture
    D3,
    /// Cube map
    Cube,
}

/// Compression hint stored with a texture asset
///
/// Normal maps are commonly stored in two-channel compressed formats that
/// need a decoding variant baked into the fragment shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionHint {
    /// No special decoding required
    #[default]
    None,
    /// DXT5 with the xGxR channel swizzle
    Dxt5Xgxr,
    /// LATC2 with an XY swizzle (decoded by the same shader as DXT5 xGxR)
    Latc2XySwizzle,
    /// Plain LATC2
    Latc2,
}

/// A material parameter value referencing a GPU texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRef {
    /// Opaque handle of the GPU texture
    pub texture: TextureHandle,
    /// Dimensionality of the texture
    pub kind: TextureKind,
    /// Components per pixel (3 = RGB, 4 = RGBA)
    pub components: u8,
    /// Compression hint stored with the asset
    pub compression: CompressionHint,
}

impl TextureRef {
    /// Create a reference to an uncompressed 2D RGB texture
    pub fn rgb_2d(texture: TextureHandle) -> Self {
        Self {
            texture,
            kind: TextureKind::D2,
            components: 3,
            compression: CompressionHint::None,
        }
    }

    /// Create a reference to an uncompressed 2D RGBA texture
    pub fn rgba_2d(texture: TextureHandle) -> Self {
        Self {
            texture,
            kind: TextureKind::D2,
            components: 4,
            compression: CompressionHint::None,
        }
    }

    /// Set the compression hint
    pub fn with_compression(mut self, compression: CompressionHint) -> Self {
        self.compression = compression;
        self
    }

    /// Set the dimensionality
    pub fn with_kind(mut self, kind: TextureKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether the texture has an alpha channel
    pub fn has_alpha(&self) -> bool {
        self.components == 4
    }
}
