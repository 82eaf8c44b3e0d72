//! Per-draw texture and uniform binding from a derived material state
//!
//! Walks the active features of a [`MaterialSyncState`] and pushes their
//! textures, sampler states and accompanying uniforms into the backend.
//! Tiling maps use wrap addressing, screen- or environment-locked maps use
//! clamp; the caller's filtering policy applies uniformly to every bound
//! unit.
//!
//! A feature whose uniform location is missing from the binding table
//! (flags/program mismatch after a stale cache hit) is skipped silently;
//! the mismatch self-corrects on the next resynchronization.

use crate::foundation::math::{saturate, Vec2};
use crate::program::{ProgramBindings, Semantic};
use crate::render::{
    RenderBackend, TextureAddressing, TextureFiltering, TextureHandle, UniformValue,
};

use super::sync::{MaterialSyncState, ReflectionMap, ReflectionMode};

/// Index of refraction of the medium the ray comes from
const AIR_INDEX_OF_REFRACTION: f32 = 1.0;

/// Parallax bias paired with the material's parallax scale
const PARALLAX_BIAS: f32 = -0.02;

/// What the binding pass fed into the auxiliary accumulation target
///
/// Color target 3 collects light/emissive contributions in RGB and glow in
/// alpha; the render pass uses these to decide whether clearing/blending
/// that target can be skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindingEffects {
    /// The RGB channels of color target 3 received real data
    pub color_target3_used: bool,
    /// The alpha channel of color target 3 received real data
    pub color_target3_alpha_used: bool,
}

/// Fresnel reflectance at normal incidence for a material index of
/// refraction, with the air-to-material transition baked in
pub fn fresnel_r0(index_of_refraction: f32) -> f32 {
    let eta = AIR_INDEX_OF_REFRACTION / index_of_refraction;
    saturate((1.0 - eta).powi(2) / (1.0 + eta).powi(2))
}

fn bind_map(
    backend: &mut dyn RenderBackend,
    bindings: &ProgramBindings,
    semantic: Semantic,
    texture: TextureHandle,
    addressing: TextureAddressing,
    filtering: TextureFiltering,
) -> bool {
    let Some(location) = bindings.uniform(semantic) else {
        log::trace!("skipping {}: not exposed by this program variant", semantic.name());
        return false;
    };
    let Some(unit) = backend.bind_texture(location, texture) else {
        return false;
    };
    backend.set_sampler_address(unit, addressing, addressing);
    backend.set_sampler_filtering(unit, filtering);
    true
}

fn set_uniform(
    backend: &mut dyn RenderBackend,
    bindings: &ProgramBindings,
    semantic: Semantic,
    value: UniformValue,
) {
    if let Some(location) = bindings.uniform(semantic) {
        backend.set_uniform(location, value);
    }
}

/// Bind every active feature of `state` for the current program
///
/// The program selected from `state`'s derived flags must already be
/// current and `bindings` must belong to it.
pub fn apply(
    state: &MaterialSyncState,
    bindings: &ProgramBindings,
    backend: &mut dyn RenderBackend,
    filtering: TextureFiltering,
) -> BindingEffects {
    let mut effects = BindingEffects::default();

    if let Some(displacement) = &state.displacement {
        if bind_map(
            backend,
            bindings,
            Semantic::DisplacementMap,
            displacement.map.texture,
            TextureAddressing::Wrap,
            filtering,
        ) {
            set_uniform(
                backend,
                bindings,
                Semantic::DisplacementScaleBias,
                UniformValue::Vec2(Vec2::new(displacement.scale, displacement.bias)),
            );
        }
    }

    set_uniform(
        backend,
        bindings,
        Semantic::DiffuseColor,
        UniformValue::Color(state.diffuse_color),
    );

    if let Some(diffuse) = &state.diffuse {
        if bind_map(
            backend,
            bindings,
            Semantic::DiffuseMap,
            diffuse.map.texture,
            TextureAddressing::Wrap,
            filtering,
        ) {
            if let Some(reference) = diffuse.alpha_test {
                set_uniform(
                    backend,
                    bindings,
                    Semantic::AlphaReference,
                    UniformValue::F32(reference),
                );
            }
        }
    }

    if let Some(specular) = &state.specular {
        set_uniform(
            backend,
            bindings,
            Semantic::SpecularColor,
            UniformValue::Color(specular.color),
        );
        set_uniform(
            backend,
            bindings,
            Semantic::SpecularExponent,
            UniformValue::F32(specular.exponent),
        );
        if let Some(map) = &specular.map {
            bind_map(
                backend,
                bindings,
                Semantic::SpecularMap,
                map.texture,
                TextureAddressing::Wrap,
                filtering,
            );
        }
    }

    if let Some(normal) = &state.normal {
        if bind_map(
            backend,
            bindings,
            Semantic::NormalMap,
            normal.map.texture,
            TextureAddressing::Wrap,
            filtering,
        ) {
            set_uniform(
                backend,
                bindings,
                Semantic::NormalMapBumpiness,
                UniformValue::F32(normal.bumpiness),
            );
            if let Some(detail) = &normal.detail {
                if bind_map(
                    backend,
                    bindings,
                    Semantic::DetailNormalMap,
                    detail.map.texture,
                    TextureAddressing::Wrap,
                    filtering,
                ) {
                    set_uniform(
                        backend,
                        bindings,
                        Semantic::DetailNormalMapBumpiness,
                        UniformValue::F32(detail.bumpiness),
                    );
                    set_uniform(
                        backend,
                        bindings,
                        Semantic::DetailNormalMapUVScale,
                        UniformValue::Vec2(detail.uv_scale),
                    );
                }
            }
        }
    }

    if let Some(parallax) = &state.parallax {
        if bind_map(
            backend,
            bindings,
            Semantic::HeightMap,
            parallax.height_map.texture,
            TextureAddressing::Wrap,
            filtering,
        ) {
            set_uniform(
                backend,
                bindings,
                Semantic::ParallaxScaleBias,
                UniformValue::Vec2(Vec2::new(parallax.parallax, PARALLAX_BIAS)),
            );
        }
    }

    if let Some(ambient_occlusion) = &state.ambient_occlusion {
        if bind_map(
            backend,
            bindings,
            Semantic::AmbientOcclusionMap,
            ambient_occlusion.map.texture,
            TextureAddressing::Clamp,
            filtering,
        ) {
            set_uniform(
                backend,
                bindings,
                Semantic::AmbientOcclusionFactor,
                UniformValue::F32(ambient_occlusion.factor),
            );
        }
    }

    if let Some(light) = &state.light {
        if bind_map(
            backend,
            bindings,
            Semantic::LightMap,
            light.map.texture,
            TextureAddressing::Clamp,
            filtering,
        ) {
            set_uniform(
                backend,
                bindings,
                Semantic::LightMapColor,
                UniformValue::Color(light.color),
            );
            effects.color_target3_used = true;
        }
    }

    if let Some(emissive) = &state.emissive {
        if bind_map(
            backend,
            bindings,
            Semantic::EmissiveMap,
            emissive.map.texture,
            TextureAddressing::Clamp,
            filtering,
        ) {
            set_uniform(
                backend,
                bindings,
                Semantic::EmissiveMapColor,
                UniformValue::Color(emissive.color),
            );
            effects.color_target3_used = true;
        }
    }

    if let Some(glow) = &state.glow {
        set_uniform(
            backend,
            bindings,
            Semantic::GlowFactor,
            UniformValue::F32(glow.factor),
        );
        if let Some(map) = &glow.map {
            bind_map(
                backend,
                bindings,
                Semantic::GlowMap,
                map.texture,
                TextureAddressing::Clamp,
                filtering,
            );
        }
        effects.color_target3_alpha_used = true;
    }

    if let Some(reflection) = &state.reflection {
        set_uniform(
            backend,
            bindings,
            Semantic::ReflectionColor,
            UniformValue::Color(reflection.color),
        );
        set_uniform(
            backend,
            bindings,
            Semantic::Reflectivity,
            UniformValue::F32(reflection.reflectivity),
        );
        if let Some(map) = &reflection.reflectivity_map {
            bind_map(
                backend,
                bindings,
                Semantic::ReflectivityMap,
                map.texture,
                TextureAddressing::Wrap,
                filtering,
            );
        }

        let (fresnel, map) = match &reflection.mode {
            ReflectionMode::Fresnel {
                index_of_refraction,
                power,
            } => (Some((*index_of_refraction, *power)), None),
            ReflectionMode::Map(map) => (None, Some(map)),
            ReflectionMode::Both {
                index_of_refraction,
                power,
                map,
            } => (Some((*index_of_refraction, *power)), Some(map)),
        };

        if let Some((index_of_refraction, power)) = fresnel {
            set_uniform(
                backend,
                bindings,
                Semantic::FresnelConstants,
                UniformValue::Vec2(Vec2::new(fresnel_r0(index_of_refraction), power)),
            );
        }

        match map {
            Some(ReflectionMap::TwoDimensional(texture)) => {
                bind_map(
                    backend,
                    bindings,
                    Semantic::ReflectionMap,
                    texture.texture,
                    TextureAddressing::Wrap,
                    filtering,
                );
            }
            Some(ReflectionMap::Cube(texture)) => {
                bind_map(
                    backend,
                    bindings,
                    Semantic::ReflectionMap,
                    texture.texture,
                    TextureAddressing::Clamp,
                    filtering,
                );
            }
            None => {}
        }
    }

    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Color3;
    use crate::gbuffer::features::GBufferFeatures;
    use crate::material::{param, Material, TextureRef};
    use crate::program::ProgramVariantCache;
    use crate::render::HeadlessBackend;

    fn make_current(
        material: &Material,
        backend: &mut HeadlessBackend,
        filtering: TextureFiltering,
    ) -> (BindingEffects, crate::render::ProgramHandle) {
        let state = MaterialSyncState::derive(material, GBufferFeatures::empty());
        let flags = state.derive_flags();
        let mut cache = ProgramVariantCache::new();
        let cached = cache.get_or_create(flags, backend).unwrap();
        let program = cached.program();
        assert!(backend.set_program(program));
        let bindings = cached.ensure_bindings(backend).clone();
        (apply(&state, &bindings, backend, filtering), program)
    }

    #[test]
    fn test_diffuse_only_binding() {
        let mut backend = HeadlessBackend::new();
        let texture = backend.create_texture("d");
        let mut material = Material::new("stone");
        material.set_texture(param::DIFFUSE_MAP, TextureRef::rgb_2d(texture));
        material.set_color(param::DIFFUSE_COLOR, Color3::new(0.8, 0.7, 0.6));

        let (effects, program) =
            make_current(&material, &mut backend, TextureFiltering::Anisotropic(8));

        assert_eq!(backend.bound_unit_count(), 1);
        assert_eq!(backend.bound_texture(0), Some(texture));
        let sampler = backend.sampler_state(0).unwrap();
        assert_eq!(sampler.address_u, TextureAddressing::Wrap);
        assert_eq!(sampler.filtering, Some(TextureFiltering::Anisotropic(8)));
        assert_eq!(
            backend.uniform_value_by_name(program, "DiffuseColor"),
            Some(UniformValue::Color(Color3::new(0.8, 0.7, 0.6)))
        );
        assert_eq!(effects, BindingEffects::default());
    }

    #[test]
    fn test_light_and_emissive_use_color_target3() {
        let mut backend = HeadlessBackend::new();
        let light = backend.create_texture("l");
        let mut material = Material::new("lit");
        material.set_texture(param::LIGHT_MAP, TextureRef::rgb_2d(light));

        let (effects, _) = make_current(&material, &mut backend, TextureFiltering::Bilinear);
        assert!(effects.color_target3_used);
        assert!(!effects.color_target3_alpha_used);

        // Light map is clamped, not wrapped
        assert_eq!(
            backend.sampler_state(0).unwrap().address_u,
            TextureAddressing::Clamp
        );
    }

    #[test]
    fn test_displacement_scale_bias_binding() {
        let mut backend = HeadlessBackend::new();
        let height = backend.create_texture("disp");
        let mut material = Material::new("terrain");
        material.set_texture(param::DISPLACEMENT_MAP, TextureRef::rgb_2d(height));
        material.set_f32(param::DISPLACEMENT_SCALE, 0.3);
        material.set_f32(param::DISPLACEMENT_BIAS, 0.05);

        let (_, program) = make_current(&material, &mut backend, TextureFiltering::Bilinear);

        // The displacement map binds first, wrapped
        assert_eq!(backend.bound_texture(0), Some(height));
        assert_eq!(
            backend.sampler_state(0).unwrap().address_u,
            TextureAddressing::Wrap
        );
        assert_eq!(
            backend.uniform_value_by_name(program, "DisplacementScaleBias"),
            Some(UniformValue::Vec2(Vec2::new(0.3, 0.05)))
        );
    }

    #[test]
    fn test_glow_marks_alpha_channel() {
        let mut backend = HeadlessBackend::new();
        let mut material = Material::new("neon");
        material.set_f32(param::GLOW, 0.75);

        let (effects, program) = make_current(&material, &mut backend, TextureFiltering::None);
        assert!(effects.color_target3_alpha_used);
        assert!(!effects.color_target3_used);
        assert_eq!(
            backend.uniform_value_by_name(program, "GlowFactor"),
            Some(UniformValue::F32(0.75))
        );
    }

    #[test]
    fn test_fresnel_constants_for_unit_refraction() {
        let mut backend = HeadlessBackend::new();
        let mut material = Material::new("plain");
        material.set_f32(param::INDEX_OF_REFRACTION, 1.0);
        material.set_f32(param::FRESNEL_REFLECTION_POWER, 5.0);

        let (_, program) = make_current(&material, &mut backend, TextureFiltering::Bilinear);
        assert_eq!(
            backend.uniform_value_by_name(program, "FresnelConstants"),
            Some(UniformValue::Vec2(Vec2::new(0.0, 5.0)))
        );
    }

    #[test]
    fn test_fresnel_r0_stays_in_unit_interval() {
        let mut index_of_refraction = 0.01f32;
        while index_of_refraction <= 10.0 {
            let r0 = fresnel_r0(index_of_refraction);
            assert!((0.0..=1.0).contains(&r0), "r0 {r0} for ior {index_of_refraction}");
            index_of_refraction += 0.07;
        }

        // Glass: eta = 1/1.5, R0 = ((1 - eta) / (1 + eta))^2 = 0.04
        approx::assert_relative_eq!(fresnel_r0(1.5), 0.04, epsilon = 1e-6);
    }

    #[test]
    fn test_stale_program_skips_feature_silently() {
        let mut backend = HeadlessBackend::new();

        // Program compiled for an empty flag set: no diffuse map uniform
        let mut cache = ProgramVariantCache::new();
        let cached = cache
            .get_or_create(crate::program::ProgramFlags::default(), &mut backend)
            .unwrap();
        let program = cached.program();
        let bindings = cached.ensure_bindings(&backend).clone();

        // State that wants a diffuse map anyway
        let texture = backend.create_texture("d");
        let mut material = Material::new("stale");
        material.set_texture(param::DIFFUSE_MAP, TextureRef::rgb_2d(texture));
        let state = MaterialSyncState::derive(&material, GBufferFeatures::empty());

        assert!(backend.set_program(program));
        let effects = apply(&state, &bindings, &mut backend, TextureFiltering::Bilinear);
        assert_eq!(backend.bound_unit_count(), 0);
        assert_eq!(effects, BindingEffects::default());
    }

    #[test]
    fn test_stale_program_does_not_claim_color_target3() {
        let mut backend = HeadlessBackend::new();

        // Program compiled without light or emissive uniforms
        let mut cache = ProgramVariantCache::new();
        let cached = cache
            .get_or_create(crate::program::ProgramFlags::default(), &mut backend)
            .unwrap();
        let program = cached.program();
        let bindings = cached.ensure_bindings(&backend).clone();

        let mut material = Material::new("stale_lit");
        material.set_texture(
            param::LIGHT_MAP,
            TextureRef::rgb_2d(backend.create_texture("l")),
        );
        material.set_texture(
            param::EMISSIVE_MAP,
            TextureRef::rgb_2d(backend.create_texture("e")),
        );
        let state = MaterialSyncState::derive(&material, GBufferFeatures::empty());

        assert!(backend.set_program(program));
        let effects = apply(&state, &bindings, &mut backend, TextureFiltering::Bilinear);
        assert!(!effects.color_target3_used);
    }

    #[test]
    fn test_cube_reflection_map_is_clamped() {
        let mut backend = HeadlessBackend::new();
        let env = backend.create_texture("env");
        let mut material = Material::new("chrome");
        material.set_texture(
            param::REFLECTION_MAP,
            TextureRef::rgb_2d(env).with_kind(crate::material::TextureKind::Cube),
        );

        make_current(&material, &mut backend, TextureFiltering::Bilinear);
        assert_eq!(
            backend.sampler_state(0).unwrap().address_u,
            TextureAddressing::Clamp
        );
    }
}
