//! Global feature disable toggles of the G-buffer fill pass

use bitflags::bitflags;

bitflags! {
    /// Renderer-wide disable bits applied on top of material parameters
    ///
    /// Each bit switches one optional feature off globally, regardless of
    /// what the material asks for. An empty set means "everything the
    /// material wants".
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GBufferFeatures: u32 {
        /// Disable vertex displacement mapping
        const NO_DISPLACEMENT_MAPPING = 1 << 0;
        /// Disable Fresnel-driven reflection
        const NO_FRESNEL_REFLECTION = 1 << 1;
        /// Disable 2D/cube reflection maps
        const NO_REFLECTION_MAP = 1 << 2;
        /// Disable per-texel reflectivity maps
        const NO_REFLECTIVITY_MAP = 1 << 3;
        /// Disable parallax mapping
        const NO_PARALLAX_MAPPING = 1 << 4;
        /// Disable glow entirely
        const NO_GLOW = 1 << 5;
        /// Disable glow maps (scalar glow still works)
        const NO_GLOW_MAP = 1 << 6;
        /// Disable ambient occlusion maps
        const NO_AMBIENT_OCCLUSION_MAP = 1 << 7;
        /// Disable diffuse maps
        const NO_DIFFUSE_MAP = 1 << 8;
        /// Disable specular lighting entirely
        const NO_SPECULAR = 1 << 9;
        /// Disable specular maps (specular color/exponent still work)
        const NO_SPECULAR_MAP = 1 << 10;
        /// Disable normal maps
        const NO_NORMAL_MAP = 1 << 11;
        /// Disable detail normal maps
        const NO_DETAIL_NORMAL_MAP = 1 << 12;
        /// Disable light maps
        const NO_LIGHT_MAP = 1 << 13;
        /// Disable emissive maps
        const NO_EMISSIVE_MAP = 1 << 14;
        /// Disable sRGB-to-linear conversion of sampled colors
        const NO_GAMMA_CORRECTION = 1 << 15;
    }
}

impl GBufferFeatures {
    /// Parse a single toggle by its configuration name
    pub fn from_toggle_name(name: &str) -> Option<Self> {
        match name {
            "NoDisplacementMapping" => Some(Self::NO_DISPLACEMENT_MAPPING),
            "NoFresnelReflection" => Some(Self::NO_FRESNEL_REFLECTION),
            "NoReflectionMap" => Some(Self::NO_REFLECTION_MAP),
            "NoReflectivityMap" => Some(Self::NO_REFLECTIVITY_MAP),
            "NoParallaxMapping" => Some(Self::NO_PARALLAX_MAPPING),
            "NoGlow" => Some(Self::NO_GLOW),
            "NoGlowMap" => Some(Self::NO_GLOW_MAP),
            "NoAmbientOcclusionMap" => Some(Self::NO_AMBIENT_OCCLUSION_MAP),
            "NoDiffuseMap" => Some(Self::NO_DIFFUSE_MAP),
            "NoSpecular" => Some(Self::NO_SPECULAR),
            "NoSpecularMap" => Some(Self::NO_SPECULAR_MAP),
            "NoNormalMap" => Some(Self::NO_NORMAL_MAP),
            "NoDetailNormalMap" => Some(Self::NO_DETAIL_NORMAL_MAP),
            "NoLightMap" => Some(Self::NO_LIGHT_MAP),
            "NoEmissiveMap" => Some(Self::NO_EMISSIVE_MAP),
            "NoGammaCorrection" => Some(Self::NO_GAMMA_CORRECTION),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toggle_name() {
        assert_eq!(
            GBufferFeatures::from_toggle_name("NoGlow"),
            Some(GBufferFeatures::NO_GLOW)
        );
        assert_eq!(
            GBufferFeatures::from_toggle_name("NoGammaCorrection"),
            Some(GBufferFeatures::NO_GAMMA_CORRECTION)
        );
        assert_eq!(GBufferFeatures::from_toggle_name("NoSuchFeature"), None);
    }
}
