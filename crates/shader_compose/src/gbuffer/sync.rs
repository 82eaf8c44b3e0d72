//! Material parameter synchronization and program flag derivation
//!
//! [`MaterialSync`] keeps a derived snapshot ([`MaterialSyncState`]) of the
//! feature decisions for one material, plus the [`ProgramFlags`] those
//! decisions map to. The snapshot is rebuilt only when the material's
//! version counter or the global feature toggles change.
//!
//! Feature activation follows one policy everywhere: a feature is active
//! only if its global disable toggle is off, its driving scalar is present
//! and non-zero, and any texture it depends on exists with the expected
//! dimensionality. Prerequisites between features (detail normal map needs
//! the primary normal map, alpha test needs an RGBA diffuse map, the
//! reflectivity map needs reflection) are encoded in the shape of the state
//! types, so a violating combination cannot be represented.

use crate::foundation::math::{Color3, Vec2};
use crate::material::{param, CompressionHint, Material, TextureKind, TextureRef};
use crate::program::{FragmentFlags, ProgramFlags, VertexFlags};

use super::features::GBufferFeatures;

/// Normal map compression variant baked into the fragment shader
///
/// DXT5 xGxR and LATC2-XY-swizzle decode identically, so they share one
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalCompression {
    /// Uncompressed or a format needing no special decoding
    #[default]
    None,
    /// Two-channel swizzled compression (DXT5 xGxR or LATC2 XY-swizzle)
    Dxt5Xgxr,
    /// Plain LATC2
    Latc2,
}

impl NormalCompression {
    fn from_hint(hint: CompressionHint) -> Self {
        match hint {
            CompressionHint::Dxt5Xgxr | CompressionHint::Latc2XySwizzle => Self::Dxt5Xgxr,
            CompressionHint::Latc2 => Self::Latc2,
            CompressionHint::None => Self::None,
        }
    }
}

/// Active vertex displacement mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementState {
    /// 2D displacement map
    pub map: TextureRef,
    /// Displacement scale (non-zero)
    pub scale: f32,
    /// Displacement bias
    pub bias: f32,
}

/// Active diffuse map sampling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffuseMapState {
    /// Diffuse map
    pub map: TextureRef,
    /// Alpha test reference; present only when the map carries an alpha
    /// channel and the resolved reference is non-zero
    pub alpha_test: Option<f32>,
}

/// Active specular lighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecularState {
    /// Specular color (non-black)
    pub color: Color3,
    /// Specular exponent
    pub exponent: f32,
    /// Optional per-texel specular map
    pub map: Option<TextureRef>,
}

/// Active detail normal map, layered on top of the primary normal map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailNormalMapState {
    /// Detail normal map
    pub map: TextureRef,
    /// Detail bumpiness (non-zero)
    pub bumpiness: f32,
    /// UV tiling scale of the detail layer
    pub uv_scale: Vec2,
    /// Compression variant of the detail map
    pub compression: NormalCompression,
}

/// Active normal mapping
///
/// The detail layer lives inside this state, which is what makes
/// "detail normal map without primary normal map" unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalMapState {
    /// Primary normal map
    pub map: TextureRef,
    /// Bumpiness (non-zero)
    pub bumpiness: f32,
    /// Compression variant of the primary map
    pub compression: NormalCompression,
    /// Optional detail layer
    pub detail: Option<DetailNormalMapState>,
}

/// Active parallax mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxState {
    /// Height map driving the parallax offset
    pub height_map: TextureRef,
    /// Parallax scale (non-zero)
    pub parallax: f32,
}

/// Active ambient occlusion map sampling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientOcclusionState {
    /// Ambient occlusion map, addressed via the second UV channel
    pub map: TextureRef,
    /// Occlusion strength factor
    pub factor: f32,
}

/// Active light map sampling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightMapState {
    /// Light map, addressed via the second UV channel
    pub map: TextureRef,
    /// Light map modulation color
    pub color: Color3,
}

/// Active emissive map sampling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissiveMapState {
    /// Emissive map
    pub map: TextureRef,
    /// Emissive modulation color
    pub color: Color3,
}

/// Active glow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowState {
    /// Glow strength (non-zero)
    pub factor: f32,
    /// Optional per-texel glow map
    pub map: Option<TextureRef>,
}

/// An explicit reflection map with its dimensionality
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReflectionMap {
    /// Spherical environment map
    TwoDimensional(TextureRef),
    /// Cube environment map
    Cube(TextureRef),
}

/// What drives the reflection term
///
/// Fresnel reflection and explicit-map reflection are independent and can
/// combine; at least one is present whenever reflection is active at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReflectionMode {
    /// Fresnel reflection from the index of refraction
    Fresnel {
        /// Material index of refraction (positive)
        index_of_refraction: f32,
        /// Fresnel power (positive)
        power: f32,
    },
    /// Explicit environment map reflection
    Map(ReflectionMap),
    /// Both Fresnel and an explicit environment map
    Both {
        /// Material index of refraction (positive)
        index_of_refraction: f32,
        /// Fresnel power (positive)
        power: f32,
        /// Environment map
        map: ReflectionMap,
    },
}

/// Active reflection
///
/// The reflectivity map is a field of this state, so it can only exist
/// while reflection itself is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionState {
    /// What drives the reflection term
    pub mode: ReflectionMode,
    /// Reflection tint
    pub color: Color3,
    /// Scalar reflectivity
    pub reflectivity: f32,
    /// Optional per-texel reflectivity map
    pub reflectivity_map: Option<TextureRef>,
}

/// Derived per-material feature decisions
///
/// Inactive features are `None`; an active feature's state carries every
/// value the binding pass needs, already defaulted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialSyncState {
    /// Render back faces too
    pub two_sided: bool,
    /// Diffuse base color (always present)
    pub diffuse_color: Color3,
    /// Diffuse map sampling
    pub diffuse: Option<DiffuseMapState>,
    /// Vertex displacement mapping
    pub displacement: Option<DisplacementState>,
    /// Specular lighting
    pub specular: Option<SpecularState>,
    /// Normal mapping (with optional detail layer)
    pub normal: Option<NormalMapState>,
    /// Parallax mapping
    pub parallax: Option<ParallaxState>,
    /// Ambient occlusion map
    pub ambient_occlusion: Option<AmbientOcclusionState>,
    /// Light map
    pub light: Option<LightMapState>,
    /// Emissive map
    pub emissive: Option<EmissiveMapState>,
    /// Glow
    pub glow: Option<GlowState>,
    /// Reflection
    pub reflection: Option<ReflectionState>,
    /// Convert sampled sRGB colors to linear space
    pub gamma_correction: bool,
}

fn texture_2d(material: &Material, name: &str) -> Option<TextureRef> {
    material
        .get_texture(name)
        .filter(|texture| texture.kind == TextureKind::D2)
}

impl MaterialSyncState {
    /// Recompute every feature decision from the material parameters
    pub fn derive(material: &Material, features: GBufferFeatures) -> Self {
        let two_sided = material.get_f32(param::TWO_SIDED) == Some(1.0);

        let displacement = if features.contains(GBufferFeatures::NO_DISPLACEMENT_MAPPING) {
            None
        } else {
            let scale = material.get_f32(param::DISPLACEMENT_SCALE).unwrap_or(0.1);
            let bias = material.get_f32(param::DISPLACEMENT_BIAS).unwrap_or(0.0);
            if scale == 0.0 {
                None
            } else {
                texture_2d(material, param::DISPLACEMENT_MAP)
                    .map(|map| DisplacementState { map, scale, bias })
            }
        };

        // Fresnel term: a positive index of refraction switches it on; the
        // power is forced positive to keep pow() away from NaN
        let fresnel = if features.contains(GBufferFeatures::NO_FRESNEL_REFLECTION) {
            None
        } else {
            let index_of_refraction = material
                .get_f32(param::INDEX_OF_REFRACTION)
                .unwrap_or(0.0);
            (index_of_refraction > 0.0).then(|| {
                let power = material
                    .get_f32(param::FRESNEL_REFLECTION_POWER)
                    .unwrap_or(5.0)
                    .max(f32::MIN_POSITIVE);
                (index_of_refraction, power)
            })
        };

        // Reflection map: must be exactly 2D or exactly cube, anything
        // else counts as absent
        let reflection_map = if features.contains(GBufferFeatures::NO_REFLECTION_MAP) {
            None
        } else {
            material
                .get_texture(param::REFLECTION_MAP)
                .and_then(|texture| match texture.kind {
                    TextureKind::D2 => Some(ReflectionMap::TwoDimensional(texture)),
                    TextureKind::Cube => Some(ReflectionMap::Cube(texture)),
                    TextureKind::D1 | TextureKind::D3 => None,
                })
        };

        let mode = match (fresnel, reflection_map) {
            (Some((index_of_refraction, power)), Some(map)) => Some(ReflectionMode::Both {
                index_of_refraction,
                power,
                map,
            }),
            (Some((index_of_refraction, power)), None) => Some(ReflectionMode::Fresnel {
                index_of_refraction,
                power,
            }),
            (None, Some(map)) => Some(ReflectionMode::Map(map)),
            (None, None) => None,
        };
        let reflection = mode.map(|mode| ReflectionState {
            mode,
            color: material
                .get_color(param::REFLECTION_COLOR)
                .unwrap_or(Color3::WHITE),
            reflectivity: material.get_f32(param::REFLECTIVITY).unwrap_or(1.0),
            reflectivity_map: if features.contains(GBufferFeatures::NO_REFLECTIVITY_MAP) {
                None
            } else {
                material.get_texture(param::REFLECTIVITY_MAP)
            },
        });

        let parallax = if features.contains(GBufferFeatures::NO_PARALLAX_MAPPING) {
            None
        } else {
            let parallax = material.get_f32(param::PARALLAX).unwrap_or(0.04);
            if parallax == 0.0 {
                None
            } else {
                // No height map, no parallax mapping possible
                material
                    .get_texture(param::HEIGHT_MAP)
                    .map(|height_map| ParallaxState { height_map, parallax })
            }
        };

        let glow = if features.contains(GBufferFeatures::NO_GLOW) {
            None
        } else {
            let factor = material.get_f32(param::GLOW).unwrap_or(0.0);
            (factor != 0.0).then(|| GlowState {
                factor,
                map: if features.contains(GBufferFeatures::NO_GLOW_MAP) {
                    None
                } else {
                    material.get_texture(param::GLOW_MAP)
                },
            })
        };

        let ambient_occlusion = if features.contains(GBufferFeatures::NO_AMBIENT_OCCLUSION_MAP) {
            None
        } else {
            material
                .get_texture(param::AMBIENT_OCCLUSION_MAP)
                .map(|map| AmbientOcclusionState {
                    map,
                    factor: material
                        .get_f32(param::AMBIENT_OCCLUSION_FACTOR)
                        .unwrap_or(1.0),
                })
        };

        let diffuse_color = material
            .get_color(param::DIFFUSE_COLOR)
            .unwrap_or(Color3::WHITE);
        let diffuse = if features.contains(GBufferFeatures::NO_DIFFUSE_MAP) {
            None
        } else {
            material.get_texture(param::DIFFUSE_MAP).map(|map| {
                // Alpha test needs an alpha channel to test against
                let alpha_test = if map.has_alpha() {
                    let reference = material.get_f32(param::ALPHA_REFERENCE).unwrap_or(0.5);
                    (reference != 0.0).then_some(reference)
                } else {
                    None
                };
                DiffuseMapState { map, alpha_test }
            })
        };

        let specular = if features.contains(GBufferFeatures::NO_SPECULAR) {
            None
        } else {
            let color = material
                .get_color(param::SPECULAR_COLOR)
                .unwrap_or(Color3::WHITE);
            // Black kills the whole specular term, map and exponent included
            (!color.is_black()).then(|| SpecularState {
                color,
                exponent: material.get_f32(param::SPECULAR_EXPONENT).unwrap_or(45.0),
                map: if features.contains(GBufferFeatures::NO_SPECULAR_MAP) {
                    None
                } else {
                    material.get_texture(param::SPECULAR_MAP)
                },
            })
        };

        let normal = if features.contains(GBufferFeatures::NO_NORMAL_MAP) {
            None
        } else {
            material.get_texture(param::NORMAL_MAP).and_then(|map| {
                let bumpiness = material
                    .get_f32(param::NORMAL_MAP_BUMPINESS)
                    .unwrap_or(1.0);
                if bumpiness == 0.0 {
                    // Zero bumpiness means the map has no influence at all
                    return None;
                }
                let detail = if features.contains(GBufferFeatures::NO_DETAIL_NORMAL_MAP) {
                    None
                } else {
                    material
                        .get_texture(param::DETAIL_NORMAL_MAP)
                        .and_then(|detail_map| {
                            let detail_bumpiness = material
                                .get_f32(param::DETAIL_NORMAL_MAP_BUMPINESS)
                                .unwrap_or(1.0);
                            (detail_bumpiness != 0.0).then(|| DetailNormalMapState {
                                map: detail_map,
                                bumpiness: detail_bumpiness,
                                uv_scale: material
                                    .get_vec2(param::DETAIL_NORMAL_MAP_UV_SCALE)
                                    .unwrap_or_else(|| Vec2::new(4.0, 4.0)),
                                compression: NormalCompression::from_hint(detail_map.compression),
                            })
                        })
                };
                Some(NormalMapState {
                    map,
                    bumpiness,
                    compression: NormalCompression::from_hint(map.compression),
                    detail,
                })
            })
        };

        let light = if features.contains(GBufferFeatures::NO_LIGHT_MAP) {
            None
        } else {
            material.get_texture(param::LIGHT_MAP).map(|map| LightMapState {
                map,
                color: material
                    .get_color(param::LIGHT_MAP_COLOR)
                    .unwrap_or(Color3::WHITE),
            })
        };

        let emissive = if features.contains(GBufferFeatures::NO_EMISSIVE_MAP) {
            None
        } else {
            material
                .get_texture(param::EMISSIVE_MAP)
                .map(|map| EmissiveMapState {
                    map,
                    color: material
                        .get_color(param::EMISSIVE_MAP_COLOR)
                        .unwrap_or(Color3::WHITE),
                })
        };

        Self {
            two_sided,
            diffuse_color,
            diffuse,
            displacement,
            specular,
            normal,
            parallax,
            ambient_occlusion,
            light,
            emissive,
            glow,
            reflection,
            gamma_correction: !features.contains(GBufferFeatures::NO_GAMMA_CORRECTION),
        }
    }

    /// Map the feature decisions 1:1 onto program variant flags
    pub fn derive_flags(&self) -> ProgramFlags {
        let mut flags = ProgramFlags::default();

        if self.two_sided {
            flags.add_vertex(VertexFlags::TWO_SIDED);
        }
        if self.displacement.is_some() {
            flags.add_vertex(VertexFlags::DISPLACEMENT_MAP);
        }
        if self.ambient_occlusion.is_some() || self.light.is_some() {
            flags.add_vertex(VertexFlags::SECOND_TEXTURE_COORDINATE);
        }
        if self.normal.is_some() || self.parallax.is_some() {
            flags.add_vertex(VertexFlags::TANGENT_BINORMAL);
        }
        if self.reflection.is_some() {
            flags.add_vertex(VertexFlags::VIEW_SPACE_POSITION);
        }

        if let Some(diffuse) = &self.diffuse {
            flags.add_fragment(FragmentFlags::DIFFUSE_MAP);
            if diffuse.alpha_test.is_some() {
                flags.add_fragment(FragmentFlags::ALPHA_TEST);
            }
        }
        if let Some(specular) = &self.specular {
            flags.add_fragment(FragmentFlags::SPECULAR);
            if specular.map.is_some() {
                flags.add_fragment(FragmentFlags::SPECULAR_MAP);
            }
        }
        if let Some(normal) = &self.normal {
            flags.add_fragment(FragmentFlags::NORMAL_MAP);
            match normal.compression {
                NormalCompression::Dxt5Xgxr => {
                    flags.add_fragment(FragmentFlags::NORMAL_MAP_DXT5_XGXR);
                }
                NormalCompression::Latc2 => {
                    flags.add_fragment(FragmentFlags::NORMAL_MAP_LATC2);
                }
                NormalCompression::None => {}
            }
            if let Some(detail) = &normal.detail {
                flags.add_fragment(FragmentFlags::DETAIL_NORMAL_MAP);
                match detail.compression {
                    NormalCompression::Dxt5Xgxr => {
                        flags.add_fragment(FragmentFlags::DETAIL_NORMAL_MAP_DXT5_XGXR);
                    }
                    NormalCompression::Latc2 => {
                        flags.add_fragment(FragmentFlags::DETAIL_NORMAL_MAP_LATC2);
                    }
                    NormalCompression::None => {}
                }
            }
        }
        if self.parallax.is_some() {
            flags.add_fragment(FragmentFlags::PARALLAX_MAPPING);
        }
        if self.ambient_occlusion.is_some() {
            flags.add_fragment(FragmentFlags::AMBIENT_OCCLUSION_MAP);
        }
        if self.light.is_some() {
            flags.add_fragment(FragmentFlags::LIGHT_MAP);
        }
        if self.emissive.is_some() {
            flags.add_fragment(FragmentFlags::EMISSIVE_MAP);
        }
        if let Some(glow) = &self.glow {
            flags.add_fragment(FragmentFlags::GLOW);
            if glow.map.is_some() {
                flags.add_fragment(FragmentFlags::GLOW_MAP);
            }
        }
        if let Some(reflection) = &self.reflection {
            flags.add_fragment(FragmentFlags::REFLECTION);
            let (fresnel, map) = match &reflection.mode {
                ReflectionMode::Fresnel { .. } => (true, None),
                ReflectionMode::Map(map) => (false, Some(map)),
                ReflectionMode::Both { map, .. } => (true, Some(map)),
            };
            if fresnel {
                flags.add_fragment(FragmentFlags::FRESNEL_REFLECTION);
            }
            if reflection.reflectivity_map.is_some() {
                flags.add_fragment(FragmentFlags::REFLECTIVITY_MAP);
            }
            match map {
                Some(ReflectionMap::TwoDimensional(_)) => {
                    flags.add_fragment(FragmentFlags::REFLECTION_MAP_2D);
                }
                Some(ReflectionMap::Cube(_)) => {
                    flags.add_fragment(FragmentFlags::REFLECTION_MAP_CUBE);
                }
                None => {}
            }
        }
        if self.gamma_correction {
            flags.add_fragment(FragmentFlags::GAMMA_CORRECTION);
        }

        flags
    }
}

/// Keeps one material's derived state and flags in sync with its parameters
#[derive(Debug, Default)]
pub struct MaterialSync {
    features: GBufferFeatures,
    last_version: Option<u64>,
    state: MaterialSyncState,
    flags: ProgramFlags,
}

impl MaterialSync {
    /// Create a synchronizer with no derived state yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the derived state if the material version or the feature
    /// toggles changed since the last call; returns whether a recompute ran
    pub fn resynchronize(&mut self, material: &Material, features: GBufferFeatures) -> bool {
        if self.last_version == Some(material.version()) && self.features == features {
            return false;
        }
        log::debug!(
            "resynchronizing material '{}' (version {})",
            material.name(),
            material.version()
        );
        self.state = MaterialSyncState::derive(material, features);
        self.flags = self.state.derive_flags();
        self.features = features;
        self.last_version = Some(material.version());
        true
    }

    /// The derived feature decisions
    pub fn state(&self) -> &MaterialSyncState {
        &self.state
    }

    /// The program variant flags derived from the current state
    pub fn flags(&self) -> ProgramFlags {
        self.flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::CompressionHint;
    use crate::render::HeadlessBackend;
    use rand::prelude::*;

    fn backend() -> HeadlessBackend {
        HeadlessBackend::new()
    }

    fn sync(material: &Material) -> MaterialSyncState {
        MaterialSyncState::derive(material, GBufferFeatures::empty())
    }

    #[test]
    fn test_diffuse_map_only() {
        let mut backend = backend();
        let mut material = Material::new("stone");
        material.set_texture(
            param::DIFFUSE_MAP,
            TextureRef::rgb_2d(backend.create_texture("stone_d")),
        );

        // Specular is active even without parameters: the color defaults
        // to white, and only an explicit black switches it off.
        let flags = sync(&material).derive_flags();
        assert_eq!(
            flags.fragment,
            FragmentFlags::DIFFUSE_MAP | FragmentFlags::SPECULAR | FragmentFlags::GAMMA_CORRECTION
        );
        assert_eq!(flags.vertex, VertexFlags::empty());
    }

    #[test]
    fn test_displacement_map_defaults() {
        let mut backend = backend();
        let mut material = Material::new("terrain");
        material.set_texture(
            param::DISPLACEMENT_MAP,
            TextureRef::rgb_2d(backend.create_texture("terrain_h")),
        );

        let state = sync(&material);
        let displacement = state.displacement.unwrap();
        assert_eq!(displacement.scale, 0.1);
        assert_eq!(displacement.bias, 0.0);
        assert!(state
            .derive_flags()
            .vertex
            .contains(VertexFlags::DISPLACEMENT_MAP));
    }

    #[test]
    fn test_displacement_needs_2d_map_and_scale() {
        let mut backend = backend();

        let mut volume = Material::new("volume");
        volume.set_texture(
            param::DISPLACEMENT_MAP,
            TextureRef::rgb_2d(backend.create_texture("vol")).with_kind(TextureKind::D3),
        );
        assert!(sync(&volume).displacement.is_none());

        let mut flat = Material::new("flat");
        flat.set_texture(
            param::DISPLACEMENT_MAP,
            TextureRef::rgb_2d(backend.create_texture("flat_h")),
        );
        flat.set_f32(param::DISPLACEMENT_SCALE, 0.0);
        assert!(sync(&flat).displacement.is_none());
    }

    #[test]
    fn test_rgba_diffuse_map_enables_alpha_test() {
        let mut backend = backend();
        let mut material = Material::new("fence");
        material.set_texture(
            param::DIFFUSE_MAP,
            TextureRef::rgba_2d(backend.create_texture("fence_d")),
        );
        material.set_f32(param::ALPHA_REFERENCE, 0.5);

        let state = sync(&material);
        let diffuse = state.diffuse.unwrap();
        assert_eq!(diffuse.alpha_test, Some(0.5));
        assert!(state
            .derive_flags()
            .fragment
            .contains(FragmentFlags::ALPHA_TEST));
    }

    #[test]
    fn test_rgb_diffuse_map_never_alpha_tests() {
        let mut backend = backend();
        let mut material = Material::new("wall");
        material.set_texture(
            param::DIFFUSE_MAP,
            TextureRef::rgb_2d(backend.create_texture("wall_d")),
        );
        material.set_f32(param::ALPHA_REFERENCE, 0.5);

        let state = sync(&material);
        assert_eq!(state.diffuse.unwrap().alpha_test, None);
        assert!(!state
            .derive_flags()
            .fragment
            .contains(FragmentFlags::ALPHA_TEST));
    }

    #[test]
    fn test_missing_alpha_reference_defaults_when_rgba() {
        let mut backend = backend();
        let mut material = Material::new("leaves");
        material.set_texture(
            param::DIFFUSE_MAP,
            TextureRef::rgba_2d(backend.create_texture("leaves_d")),
        );

        let state = sync(&material);
        assert_eq!(state.diffuse.unwrap().alpha_test, Some(0.5));
    }

    #[test]
    fn test_detail_normal_map_with_active_primary() {
        let mut backend = backend();
        let mut material = Material::new("rock");
        material.set_texture(
            param::NORMAL_MAP,
            TextureRef::rgb_2d(backend.create_texture("rock_n"))
                .with_compression(CompressionHint::Dxt5Xgxr),
        );
        material.set_f32(param::NORMAL_MAP_BUMPINESS, 1.0);
        material.set_texture(
            param::DETAIL_NORMAL_MAP,
            TextureRef::rgb_2d(backend.create_texture("rock_dn"))
                .with_compression(CompressionHint::Latc2),
        );
        material.set_f32(param::DETAIL_NORMAL_MAP_BUMPINESS, 1.0);

        let flags = sync(&material).derive_flags();
        assert!(flags.fragment.contains(
            FragmentFlags::NORMAL_MAP
                | FragmentFlags::NORMAL_MAP_DXT5_XGXR
                | FragmentFlags::DETAIL_NORMAL_MAP
                | FragmentFlags::DETAIL_NORMAL_MAP_LATC2
        ));
        assert!(flags.vertex.contains(VertexFlags::TANGENT_BINORMAL));
    }

    #[test]
    fn test_zero_primary_bumpiness_kills_detail_too() {
        let mut backend = backend();
        let mut material = Material::new("rock");
        material.set_texture(
            param::NORMAL_MAP,
            TextureRef::rgb_2d(backend.create_texture("rock_n")),
        );
        material.set_f32(param::NORMAL_MAP_BUMPINESS, 0.0);
        material.set_texture(
            param::DETAIL_NORMAL_MAP,
            TextureRef::rgb_2d(backend.create_texture("rock_dn")),
        );
        material.set_f32(param::DETAIL_NORMAL_MAP_BUMPINESS, 1.0);

        let state = sync(&material);
        assert!(state.normal.is_none());
        let flags = state.derive_flags();
        assert!(!flags.fragment.contains(FragmentFlags::NORMAL_MAP));
        assert!(!flags.fragment.contains(FragmentFlags::DETAIL_NORMAL_MAP));
    }

    #[test]
    fn test_black_specular_color_short_circuits() {
        let mut backend = backend();
        let mut material = Material::new("cloth");
        material.set_color(param::SPECULAR_COLOR, Color3::BLACK);
        material.set_texture(
            param::SPECULAR_MAP,
            TextureRef::rgb_2d(backend.create_texture("cloth_s")),
        );

        let state = sync(&material);
        assert!(state.specular.is_none());
    }

    #[test]
    fn test_specular_defaults_to_white() {
        let material = Material::new("metal");
        let specular = sync(&material).specular.unwrap();
        assert_eq!(specular.color, Color3::WHITE);
        assert_eq!(specular.exponent, 45.0);
    }

    #[test]
    fn test_reflection_modes() {
        let mut backend = backend();

        let mut fresnel_only = Material::new("glass");
        fresnel_only.set_f32(param::INDEX_OF_REFRACTION, 1.5);
        let state = sync(&fresnel_only);
        assert!(matches!(
            state.reflection.unwrap().mode,
            ReflectionMode::Fresnel { .. }
        ));
        let flags = state.derive_flags();
        assert!(flags.fragment.contains(FragmentFlags::REFLECTION));
        assert!(flags.fragment.contains(FragmentFlags::FRESNEL_REFLECTION));
        assert!(flags.vertex.contains(VertexFlags::VIEW_SPACE_POSITION));

        let mut cube_only = Material::new("chrome");
        cube_only.set_texture(
            param::REFLECTION_MAP,
            TextureRef::rgb_2d(backend.create_texture("env")).with_kind(TextureKind::Cube),
        );
        let flags = sync(&cube_only).derive_flags();
        assert!(flags.fragment.contains(FragmentFlags::REFLECTION_MAP_CUBE));
        assert!(!flags.fragment.contains(FragmentFlags::FRESNEL_REFLECTION));

        let mut both = Material::new("lacquer");
        both.set_f32(param::INDEX_OF_REFRACTION, 1.3);
        both.set_texture(
            param::REFLECTION_MAP,
            TextureRef::rgb_2d(backend.create_texture("env2")),
        );
        let state = sync(&both);
        assert!(matches!(
            state.reflection.unwrap().mode,
            ReflectionMode::Both { .. }
        ));
        let flags = state.derive_flags();
        assert!(flags.fragment.contains(FragmentFlags::REFLECTION_MAP_2D));
        assert!(flags.fragment.contains(FragmentFlags::FRESNEL_REFLECTION));
    }

    #[test]
    fn test_volume_reflection_map_is_treated_as_absent() {
        let mut backend = backend();
        let mut material = Material::new("odd");
        material.set_texture(
            param::REFLECTION_MAP,
            TextureRef::rgb_2d(backend.create_texture("vol")).with_kind(TextureKind::D3),
        );
        assert!(sync(&material).reflection.is_none());
    }

    #[test]
    fn test_parallax_needs_height_map() {
        let mut material = Material::new("brick");
        material.set_f32(param::PARALLAX, 0.04);
        assert!(sync(&material).parallax.is_none());

        let mut backend = backend();
        material.set_texture(
            param::HEIGHT_MAP,
            TextureRef::rgb_2d(backend.create_texture("brick_h")),
        );
        let parallax = sync(&material).parallax.unwrap();
        assert_eq!(parallax.parallax, 0.04);
    }

    #[test]
    fn test_feature_toggles_override_parameters() {
        let mut backend = backend();
        let mut material = Material::new("full");
        material.set_texture(
            param::DIFFUSE_MAP,
            TextureRef::rgb_2d(backend.create_texture("d")),
        );
        material.set_f32(param::GLOW, 1.0);

        let features = GBufferFeatures::NO_DIFFUSE_MAP
            | GBufferFeatures::NO_GLOW
            | GBufferFeatures::NO_GAMMA_CORRECTION;
        let state = MaterialSyncState::derive(&material, features);
        assert!(state.diffuse.is_none());
        assert!(state.glow.is_none());
        assert!(!state.gamma_correction);
    }

    #[test]
    fn test_resynchronize_is_idempotent() {
        let mut backend = backend();
        let mut material = Material::new("stone");
        material.set_texture(
            param::DIFFUSE_MAP,
            TextureRef::rgba_2d(backend.create_texture("stone_d")),
        );
        material.set_f32(param::GLOW, 0.5);

        let mut sync = MaterialSync::new();
        assert!(sync.resynchronize(&material, GBufferFeatures::empty()));
        let first = sync.flags();

        // Same version, same toggles: no recompute, identical flags
        assert!(!sync.resynchronize(&material, GBufferFeatures::empty()));
        assert_eq!(sync.flags(), first);

        // A parameter change makes it stale again
        material.set_f32(param::GLOW, 0.0);
        assert!(sync.resynchronize(&material, GBufferFeatures::empty()));
        assert!(!sync.flags().fragment.contains(FragmentFlags::GLOW));

        // So does a toggle change
        assert!(sync.resynchronize(&material, GBufferFeatures::NO_GAMMA_CORRECTION));
    }

    #[test]
    fn test_prerequisite_invariants_hold_for_random_materials() {
        crate::foundation::logging::try_init();
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut backend = backend();

        for _ in 0..500 {
            let mut material = Material::new("random");
            if rng.gen_bool(0.5) {
                let components = if rng.gen_bool(0.5) { 3 } else { 4 };
                let mut map = TextureRef::rgb_2d(backend.create_texture("d"));
                map.components = components;
                material.set_texture(param::DIFFUSE_MAP, map);
            }
            if rng.gen_bool(0.5) {
                material.set_f32(param::ALPHA_REFERENCE, rng.gen_range(0.0..1.0));
            }
            if rng.gen_bool(0.5) {
                material.set_texture(
                    param::NORMAL_MAP,
                    TextureRef::rgb_2d(backend.create_texture("n")),
                );
            }
            if rng.gen_bool(0.5) {
                // Adversarial: detail map with non-zero bumpiness while the
                // primary map may be deactivated
                material.set_texture(
                    param::DETAIL_NORMAL_MAP,
                    TextureRef::rgb_2d(backend.create_texture("dn")),
                );
                material.set_f32(param::DETAIL_NORMAL_MAP_BUMPINESS, 1.0);
            }
            if rng.gen_bool(0.5) {
                material.set_f32(param::NORMAL_MAP_BUMPINESS, 0.0);
            }
            if rng.gen_bool(0.5) {
                let value = rng.gen_range(0.0..1.0f32);
                material.set_color(param::SPECULAR_COLOR, Color3::new(value, value, value));
            }
            if rng.gen_bool(0.3) {
                material.set_color(param::SPECULAR_COLOR, Color3::BLACK);
            }

            let state = sync(&material);
            let flags = state.derive_flags();

            // detail normal map implies primary normal map
            if flags.fragment.contains(FragmentFlags::DETAIL_NORMAL_MAP) {
                assert!(flags.fragment.contains(FragmentFlags::NORMAL_MAP));
            }
            // alpha test implies an RGBA diffuse map
            if flags.fragment.contains(FragmentFlags::ALPHA_TEST) {
                assert!(state.diffuse.is_some_and(|d| d.map.has_alpha()));
            }
            // specular implies a non-black specular color
            if flags.fragment.contains(FragmentFlags::SPECULAR) {
                assert!(state.specular.is_some_and(|s| !s.color.is_black()));
            }
            // reflectivity map implies reflection
            if flags.fragment.contains(FragmentFlags::REFLECTIVITY_MAP) {
                assert!(flags.fragment.contains(FragmentFlags::REFLECTION));
            }
        }
    }
}
