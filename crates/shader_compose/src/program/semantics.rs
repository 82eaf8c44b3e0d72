//! Semantic slots of a generated program and their resolved locations
//!
//! Every program variant exposes a subset of a closed set of uniform and
//! attribute slots. Instead of looking locations up by raw string name on
//! every use, the slots are enumerated once here and resolved in a single
//! pass into an enum-indexed table ([`ProgramBindings`]) after the program
//! first becomes current.

use crate::program::flags::{FragmentFlags, ProgramFlags, VertexFlags};
use crate::render::{AttributeLocation, ProgramGenerator, ProgramHandle, UniformLocation};

/// A semantic uniform or attribute slot of a generated G-buffer program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)] // slot names mirror their shader symbol names
#[repr(usize)]
pub enum Semantic {
    // Vertex attributes
    VertexPosition,
    VertexTexCoord0,
    VertexTexCoord1,
    VertexNormal,
    VertexTangent,
    VertexBinormal,
    // Vertex-stage uniforms
    NormalScale,
    EyePos,
    WorldVP,
    WorldV,
    DisplacementMap,
    DisplacementScaleBias,
    // Fragment-stage uniforms
    DiffuseColor,
    DiffuseMap,
    AlphaReference,
    SpecularColor,
    SpecularExponent,
    SpecularMap,
    NormalMap,
    NormalMapBumpiness,
    DetailNormalMap,
    DetailNormalMapBumpiness,
    DetailNormalMapUVScale,
    HeightMap,
    ParallaxScaleBias,
    AmbientOcclusionMap,
    AmbientOcclusionFactor,
    LightMap,
    LightMapColor,
    EmissiveMap,
    EmissiveMapColor,
    GlowFactor,
    GlowMap,
    ReflectionColor,
    Reflectivity,
    ReflectivityMap,
    FresnelConstants,
    ReflectionMap,
    ViewSpaceToWorldSpace,
}

impl Semantic {
    /// Number of semantic slots
    pub const COUNT: usize = 39;

    /// All slots, in declaration order
    pub const ALL: [Self; Self::COUNT] = [
        Self::VertexPosition,
        Self::VertexTexCoord0,
        Self::VertexTexCoord1,
        Self::VertexNormal,
        Self::VertexTangent,
        Self::VertexBinormal,
        Self::NormalScale,
        Self::EyePos,
        Self::WorldVP,
        Self::WorldV,
        Self::DisplacementMap,
        Self::DisplacementScaleBias,
        Self::DiffuseColor,
        Self::DiffuseMap,
        Self::AlphaReference,
        Self::SpecularColor,
        Self::SpecularExponent,
        Self::SpecularMap,
        Self::NormalMap,
        Self::NormalMapBumpiness,
        Self::DetailNormalMap,
        Self::DetailNormalMapBumpiness,
        Self::DetailNormalMapUVScale,
        Self::HeightMap,
        Self::ParallaxScaleBias,
        Self::AmbientOcclusionMap,
        Self::AmbientOcclusionFactor,
        Self::LightMap,
        Self::LightMapColor,
        Self::EmissiveMap,
        Self::EmissiveMapColor,
        Self::GlowFactor,
        Self::GlowMap,
        Self::ReflectionColor,
        Self::Reflectivity,
        Self::ReflectivityMap,
        Self::FresnelConstants,
        Self::ReflectionMap,
        Self::ViewSpaceToWorldSpace,
    ];

    /// The symbol name of this slot in generated shader source
    pub const fn name(self) -> &'static str {
        match self {
            Self::VertexPosition => "VertexPosition",
            Self::VertexTexCoord0 => "VertexTexCoord0",
            Self::VertexTexCoord1 => "VertexTexCoord1",
            Self::VertexNormal => "VertexNormal",
            Self::VertexTangent => "VertexTangent",
            Self::VertexBinormal => "VertexBinormal",
            Self::NormalScale => "NormalScale",
            Self::EyePos => "EyePos",
            Self::WorldVP => "WorldVP",
            Self::WorldV => "WorldV",
            Self::DisplacementMap => "DisplacementMap",
            Self::DisplacementScaleBias => "DisplacementScaleBias",
            Self::DiffuseColor => "DiffuseColor",
            Self::DiffuseMap => "DiffuseMap",
            Self::AlphaReference => "AlphaReference",
            Self::SpecularColor => "SpecularColor",
            Self::SpecularExponent => "SpecularExponent",
            Self::SpecularMap => "SpecularMap",
            Self::NormalMap => "NormalMap",
            Self::NormalMapBumpiness => "NormalMapBumpiness",
            Self::DetailNormalMap => "DetailNormalMap",
            Self::DetailNormalMapBumpiness => "DetailNormalMapBumpiness",
            Self::DetailNormalMapUVScale => "DetailNormalMapUVScale",
            Self::HeightMap => "HeightMap",
            Self::ParallaxScaleBias => "ParallaxScaleBias",
            Self::AmbientOcclusionMap => "AmbientOcclusionMap",
            Self::AmbientOcclusionFactor => "AmbientOcclusionFactor",
            Self::LightMap => "LightMap",
            Self::LightMapColor => "LightMapColor",
            Self::EmissiveMap => "EmissiveMap",
            Self::EmissiveMapColor => "EmissiveMapColor",
            Self::GlowFactor => "GlowFactor",
            Self::GlowMap => "GlowMap",
            Self::ReflectionColor => "ReflectionColor",
            Self::Reflectivity => "Reflectivity",
            Self::ReflectivityMap => "ReflectivityMap",
            Self::FresnelConstants => "FresnelConstants",
            Self::ReflectionMap => "ReflectionMap",
            Self::ViewSpaceToWorldSpace => "ViewSpaceToWorldSpace",
        }
    }

    /// Whether this slot is a vertex attribute (as opposed to a uniform)
    pub const fn is_attribute(self) -> bool {
        matches!(
            self,
            Self::VertexPosition
                | Self::VertexTexCoord0
                | Self::VertexTexCoord1
                | Self::VertexNormal
                | Self::VertexTangent
                | Self::VertexBinormal
        )
    }

    /// Whether a program variant compiled with `flags` exposes this slot
    ///
    /// Backends generating real shader source make this decision themselves
    /// when emitting symbols; the headless backend uses this table so that
    /// location lookups behave the way a driver would.
    pub fn required_by(self, flags: ProgramFlags) -> bool {
        let vs = flags.vertex;
        let fs = flags.fragment;
        match self {
            Self::VertexPosition
            | Self::VertexTexCoord0
            | Self::VertexNormal
            | Self::NormalScale
            | Self::WorldVP
            | Self::WorldV
            | Self::DiffuseColor => true,
            Self::VertexTexCoord1 => vs.contains(VertexFlags::SECOND_TEXTURE_COORDINATE),
            Self::VertexTangent | Self::VertexBinormal => {
                vs.contains(VertexFlags::TANGENT_BINORMAL)
            }
            Self::EyePos => {
                vs.contains(VertexFlags::DISPLACEMENT_MAP)
                    || vs.contains(VertexFlags::VIEW_SPACE_POSITION)
                    || fs.contains(FragmentFlags::PARALLAX_MAPPING)
            }
            Self::DisplacementMap | Self::DisplacementScaleBias => {
                vs.contains(VertexFlags::DISPLACEMENT_MAP)
            }
            Self::DiffuseMap => fs.contains(FragmentFlags::DIFFUSE_MAP),
            Self::AlphaReference => fs.contains(FragmentFlags::ALPHA_TEST),
            Self::SpecularColor | Self::SpecularExponent => fs.contains(FragmentFlags::SPECULAR),
            Self::SpecularMap => fs.contains(FragmentFlags::SPECULAR_MAP),
            Self::NormalMap | Self::NormalMapBumpiness => fs.contains(FragmentFlags::NORMAL_MAP),
            Self::DetailNormalMap
            | Self::DetailNormalMapBumpiness
            | Self::DetailNormalMapUVScale => fs.contains(FragmentFlags::DETAIL_NORMAL_MAP),
            Self::HeightMap | Self::ParallaxScaleBias => {
                fs.contains(FragmentFlags::PARALLAX_MAPPING)
            }
            Self::AmbientOcclusionMap | Self::AmbientOcclusionFactor => {
                fs.contains(FragmentFlags::AMBIENT_OCCLUSION_MAP)
            }
            Self::LightMap | Self::LightMapColor => fs.contains(FragmentFlags::LIGHT_MAP),
            Self::EmissiveMap | Self::EmissiveMapColor => fs.contains(FragmentFlags::EMISSIVE_MAP),
            Self::GlowFactor => fs.contains(FragmentFlags::GLOW),
            Self::GlowMap => fs.contains(FragmentFlags::GLOW_MAP),
            Self::ReflectionColor | Self::Reflectivity => fs.contains(FragmentFlags::REFLECTION),
            Self::ReflectivityMap => fs.contains(FragmentFlags::REFLECTIVITY_MAP),
            Self::FresnelConstants => fs.contains(FragmentFlags::FRESNEL_REFLECTION),
            Self::ReflectionMap => {
                fs.contains(FragmentFlags::REFLECTION_MAP_2D)
                    || fs.contains(FragmentFlags::REFLECTION_MAP_CUBE)
            }
            Self::ViewSpaceToWorldSpace => fs.contains(FragmentFlags::REFLECTION_MAP_CUBE),
        }
    }
}

/// Resolved uniform/attribute locations of one program variant
///
/// Built in one pass via [`ProgramBindings::resolve`]; a `None` entry means
/// the variant was compiled without that slot, and dependent bindings are
/// silently skipped at draw time.
#[derive(Debug, Clone)]
pub struct ProgramBindings {
    uniforms: [Option<UniformLocation>; Semantic::COUNT],
    attributes: [Option<AttributeLocation>; Semantic::COUNT],
}

impl ProgramBindings {
    /// Resolve every semantic slot of `program` through the generator
    pub fn resolve(generator: &dyn ProgramGenerator, program: ProgramHandle) -> Self {
        let mut uniforms = [None; Semantic::COUNT];
        let mut attributes = [None; Semantic::COUNT];
        for semantic in Semantic::ALL {
            let index = semantic as usize;
            if semantic.is_attribute() {
                attributes[index] = generator.attribute_location(program, semantic.name());
            } else {
                uniforms[index] = generator.uniform_location(program, semantic.name());
            }
        }
        Self { uniforms, attributes }
    }

    /// Resolved uniform location of a slot, if the variant exposes it
    pub fn uniform(&self, semantic: Semantic) -> Option<UniformLocation> {
        self.uniforms[semantic as usize]
    }

    /// Resolved attribute location of a slot, if the variant exposes it
    pub fn attribute(&self, semantic: Semantic) -> Option<AttributeLocation> {
        self.attributes[semantic as usize]
    }
}
