//! G-buffer material demo
//!
//! Runs the full per-draw pipeline against the headless backend: builds a
//! material with several maps, makes it current, and prints the derived
//! flags, bound units and composed clip-ray shader source.

use shader_compose::foundation::logging;
use shader_compose::material::CompressionHint;
use shader_compose::prelude::*;
use shader_compose::volume;

fn main() {
    logging::init();

    let mut backend = HeadlessBackend::new();
    let mut cache = ProgramVariantCache::new();

    // A material using most of the optional feature families
    let mut material = Material::new("crate_rusty");
    material.set_texture(
        param::DIFFUSE_MAP,
        TextureRef::rgba_2d(backend.create_texture("crate_d")),
    );
    material.set_color(param::DIFFUSE_COLOR, Color3::new(0.9, 0.85, 0.8));
    material.set_texture(
        param::NORMAL_MAP,
        TextureRef::rgb_2d(backend.create_texture("crate_n"))
            .with_compression(CompressionHint::Dxt5Xgxr),
    );
    material.set_f32(param::GLOW, 0.25);
    material.set_f32(param::INDEX_OF_REFRACTION, 1.33);

    let mut gbuffer = GBufferMaterial::new();
    let Some(current) = gbuffer.make_current(
        &material,
        GBufferFeatures::empty(),
        TextureFiltering::Anisotropic(8),
        &mut cache,
        &mut backend,
    ) else {
        log::error!("material could not be made current");
        return;
    };

    println!("material: {}", material.name());
    println!("vertex flags:   {:?}", current.flags.vertex);
    println!("fragment flags: {:?}", current.flags.fragment);
    println!("bound texture units: {}", backend.bound_unit_count());
    println!(
        "color target 3 used: {} (alpha: {})",
        current.effects.color_target3_used, current.effects.color_target3_alpha_used
    );
    if let Some(source) = backend.program_source(current.program) {
        println!("\ngenerated program variant:\n{source}");
    }

    // Compose the volume clip-ray shader for one depth texture and two
    // clip planes, then feed the planes in composition order
    let source = volume::compose(ShaderLanguage::Glsl, 2, 1);
    println!("composed clip-ray shader:\n{source}");

    let program = backend.create_program_from_source(
        source,
        &["ClipPlane_0_", "ClipPlane_1_", "DepthTexture_0_"],
    );
    volume::set_plane(&mut backend, program, 0, Vec4::new(0.0, 0.0, 1.0, -0.1));
    volume::set_plane(&mut backend, program, 1, Vec4::new(1.0, 0.0, 0.0, 0.5));
    log::info!("clip planes set on composed program");
}
