//! Named material parameters with version-counted change tracking

use std::collections::HashMap;

use crate::foundation::math::{Color3, Vec2};

use super::texture::TextureRef;

/// Well-known material parameter names
///
/// Materials are free to carry arbitrary parameters; these are the names the
/// G-buffer synchronizer resolves.
pub mod param {
    /// Two sided rendering toggle (1.0 = enabled)
    pub const TWO_SIDED: &str = "TwoSided";
    /// Displacement map
    pub const DISPLACEMENT_MAP: &str = "DisplacementMap";
    /// Displacement scale
    pub const DISPLACEMENT_SCALE: &str = "DisplacementScale";
    /// Displacement bias
    pub const DISPLACEMENT_BIAS: &str = "DisplacementBias";
    /// Index of refraction driving Fresnel reflection
    pub const INDEX_OF_REFRACTION: &str = "IndexOfRefraction";
    /// Fresnel reflection power
    pub const FRESNEL_REFLECTION_POWER: &str = "FresnelReflectionPower";
    /// Reflection tint color
    pub const REFLECTION_COLOR: &str = "ReflectionColor";
    /// 2D or cube reflection map
    pub const REFLECTION_MAP: &str = "ReflectionMap";
    /// Scalar reflectivity factor
    pub const REFLECTIVITY: &str = "Reflectivity";
    /// Per-texel reflectivity map
    pub const REFLECTIVITY_MAP: &str = "ReflectivityMap";
    /// Parallax mapping scale
    pub const PARALLAX: &str = "Parallax";
    /// Height map used for parallax mapping
    pub const HEIGHT_MAP: &str = "HeightMap";
    /// Glow factor
    pub const GLOW: &str = "Glow";
    /// Glow map
    pub const GLOW_MAP: &str = "GlowMap";
    /// Ambient occlusion factor
    pub const AMBIENT_OCCLUSION_FACTOR: &str = "AmbientOcclusionFactor";
    /// Ambient occlusion map
    pub const AMBIENT_OCCLUSION_MAP: &str = "AmbientOcclusionMap";
    /// Diffuse color
    pub const DIFFUSE_COLOR: &str = "DiffuseColor";
    /// Diffuse map
    pub const DIFFUSE_MAP: &str = "DiffuseMap";
    /// Alpha test reference value
    pub const ALPHA_REFERENCE: &str = "AlphaReference";
    /// Specular color
    pub const SPECULAR_COLOR: &str = "SpecularColor";
    /// Specular exponent
    pub const SPECULAR_EXPONENT: &str = "SpecularExponent";
    /// Specular map
    pub const SPECULAR_MAP: &str = "SpecularMap";
    /// Normal map
    pub const NORMAL_MAP: &str = "NormalMap";
    /// Normal map bumpiness
    pub const NORMAL_MAP_BUMPINESS: &str = "NormalMapBumpiness";
    /// Detail normal map
    pub const DETAIL_NORMAL_MAP: &str = "DetailNormalMap";
    /// Detail normal map bumpiness
    pub const DETAIL_NORMAL_MAP_BUMPINESS: &str = "DetailNormalMapBumpiness";
    /// Detail normal map UV scale
    pub const DETAIL_NORMAL_MAP_UV_SCALE: &str = "DetailNormalMapUVScale";
    /// Light map
    pub const LIGHT_MAP: &str = "LightMap";
    /// Light map color
    pub const LIGHT_MAP_COLOR: &str = "LightMapColor";
    /// Emissive map
    pub const EMISSIVE_MAP: &str = "EmissiveMap";
    /// Emissive map color
    pub const EMISSIVE_MAP_COLOR: &str = "EmissiveMapColor";
}

/// A single material parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    /// Scalar value
    Float(f32),
    /// 2D vector value
    Vec2(Vec2),
    /// RGB color value
    Color(Color3),
    /// Texture reference
    Texture(TextureRef),
}

/// A material: a named, versioned collection of parameters
///
/// Mutations bump the version counter so derived caches can detect
/// staleness without holding a change-notification subscription.
#[derive(Debug, Clone, Default)]
pub struct Material {
    name: String,
    parameters: HashMap<String, ParameterValue>,
    version: u64,
}

impl Material {
    /// Create a new empty material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: HashMap::new(),
            version: 0,
        }
    }

    /// Material name, for diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current version of the parameter collection
    ///
    /// Incremented on every add, change or removal.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Set (or add) a parameter
    pub fn set_parameter(&mut self, name: impl Into<String>, value: ParameterValue) {
        self.parameters.insert(name.into(), value);
        self.version += 1;
    }

    /// Remove a parameter; returns the removed value if it existed
    pub fn remove_parameter(&mut self, name: &str) -> Option<ParameterValue> {
        let removed = self.parameters.remove(name);
        if removed.is_some() {
            self.version += 1;
        }
        removed
    }

    /// Raw parameter lookup
    pub fn parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }

    /// Scalar parameter lookup; `None` when absent or of another type
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        match self.parameters.get(name) {
            Some(ParameterValue::Float(value)) => Some(*value),
            _ => None,
        }
    }

    /// 2D vector parameter lookup
    pub fn get_vec2(&self, name: &str) -> Option<Vec2> {
        match self.parameters.get(name) {
            Some(ParameterValue::Vec2(value)) => Some(*value),
            _ => None,
        }
    }

    /// Color parameter lookup
    pub fn get_color(&self, name: &str) -> Option<Color3> {
        match self.parameters.get(name) {
            Some(ParameterValue::Color(value)) => Some(*value),
            _ => None,
        }
    }

    /// Texture reference parameter lookup
    pub fn get_texture(&self, name: &str) -> Option<TextureRef> {
        match self.parameters.get(name) {
            Some(ParameterValue::Texture(value)) => Some(*value),
            _ => None,
        }
    }

    /// Convenience setter for scalar parameters
    pub fn set_f32(&mut self, name: impl Into<String>, value: f32) {
        self.set_parameter(name, ParameterValue::Float(value));
    }

    /// Convenience setter for color parameters
    pub fn set_color(&mut self, name: impl Into<String>, value: Color3) {
        self.set_parameter(name, ParameterValue::Color(value));
    }

    /// Convenience setter for texture parameters
    pub fn set_texture(&mut self, name: impl Into<String>, value: TextureRef) {
        self.set_parameter(name, ParameterValue::Texture(value));
    }
}
