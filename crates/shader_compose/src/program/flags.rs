//! Shader capability flag sets used as program variant cache keys

use bitflags::bitflags;

bitflags! {
    /// Optional vertex-stage capabilities compiled into a program variant
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VertexFlags: u32 {
        /// Two sided material
        const TWO_SIDED = 1 << 0;
        /// Displacement mapping of the vertex position
        const DISPLACEMENT_MAP = 1 << 1;
        /// Pass through a second texture coordinate channel
        const SECOND_TEXTURE_COORDINATE = 1 << 2;
        /// Pass through tangent and binormal vectors
        const TANGENT_BINORMAL = 1 << 3;
        /// Calculate the view space position
        const VIEW_SPACE_POSITION = 1 << 4;
    }
}

bitflags! {
    /// Optional fragment-stage capabilities compiled into a program variant
    ///
    /// Several bits are only meaningful in combination: `ALPHA_TEST`
    /// requires `DIFFUSE_MAP`, the compression bits require their map bit,
    /// `DETAIL_NORMAL_MAP` requires `NORMAL_MAP`, and the reflection
    /// sub-bits require `REFLECTION`. Those prerequisites are not enforced
    /// here; the G-buffer synchronizer derives flag sets from decisions that
    /// make violations unrepresentable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FragmentFlags: u32 {
        /// Sample the diffuse map
        const DIFFUSE_MAP = 1 << 0;
        /// Discard fragments below the alpha reference
        const ALPHA_TEST = 1 << 1;
        /// Write specular properties
        const SPECULAR = 1 << 2;
        /// Sample the specular map
        const SPECULAR_MAP = 1 << 3;
        /// Sample the normal map
        const NORMAL_MAP = 1 << 4;
        /// Normal map is DXT5 xGxR compressed
        const NORMAL_MAP_DXT5_XGXR = 1 << 5;
        /// Normal map is LATC2 compressed
        const NORMAL_MAP_LATC2 = 1 << 6;
        /// Sample the detail normal map
        const DETAIL_NORMAL_MAP = 1 << 7;
        /// Detail normal map is DXT5 xGxR compressed
        const DETAIL_NORMAL_MAP_DXT5_XGXR = 1 << 8;
        /// Detail normal map is LATC2 compressed
        const DETAIL_NORMAL_MAP_LATC2 = 1 << 9;
        /// Perform parallax mapping
        const PARALLAX_MAPPING = 1 << 10;
        /// Sample the ambient occlusion map
        const AMBIENT_OCCLUSION_MAP = 1 << 11;
        /// Sample the light map
        const LIGHT_MAP = 1 << 12;
        /// Sample the emissive map
        const EMISSIVE_MAP = 1 << 13;
        /// Write glow intensity
        const GLOW = 1 << 14;
        /// Sample the glow map
        const GLOW_MAP = 1 << 15;
        /// Write reflection properties
        const REFLECTION = 1 << 16;
        /// Fresnel-driven reflection
        const FRESNEL_REFLECTION = 1 << 17;
        /// Sample the reflectivity map
        const REFLECTIVITY_MAP = 1 << 18;
        /// Sample a 2D reflection map
        const REFLECTION_MAP_2D = 1 << 19;
        /// Sample a cube reflection map
        const REFLECTION_MAP_CUBE = 1 << 20;
        /// Convert sampled sRGB colors to linear space
        const GAMMA_CORRECTION = 1 << 21;
    }
}

/// The flag set selecting one GPU program variant
///
/// Equality and hashing cover both stages exactly; this is the program
/// variant cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProgramFlags {
    /// Vertex-stage capability bits
    pub vertex: VertexFlags,
    /// Fragment-stage capability bits
    pub fragment: FragmentFlags,
}

impl ProgramFlags {
    /// Clear both stages
    pub fn reset(&mut self) {
        self.vertex = VertexFlags::empty();
        self.fragment = FragmentFlags::empty();
    }

    /// Enable a vertex-stage capability
    pub fn add_vertex(&mut self, flag: VertexFlags) {
        self.vertex |= flag;
    }

    /// Enable a fragment-stage capability
    pub fn add_fragment(&mut self, flag: FragmentFlags) {
        self.fragment |= flag;
    }
}
