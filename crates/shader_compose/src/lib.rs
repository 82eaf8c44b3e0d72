//! # Shader Compose
//!
//! GPU program composition and material-state synchronization for a
//! deferred renderer.
//!
//! ## Features
//!
//! - **Program Variants**: flag-keyed cache of compiled GPU programs, one
//!   per capability combination, with lazily resolved binding tables
//! - **Material Sync**: derives feature activation decisions and program
//!   flags from material parameters, tracked by a version counter
//! - **Draw Binding**: binds textures, sampler state and uniforms per draw
//!   and reports auxiliary render-target usage back to the pass
//! - **Volume Clip-Ray**: composes the volume ray-caster's clip shader
//!   from per-plane and per-depth-texture instances
//! - **Headless Backend**: a recording backend for tests and tooling, no
//!   GPU required
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shader_compose::prelude::*;
//!
//! fn main() {
//!     let mut backend = HeadlessBackend::new();
//!     let mut cache = ProgramVariantCache::new();
//!
//!     let mut material = Material::new("crate");
//!     let diffuse = backend.create_texture("crate_diffuse");
//!     material.set_texture(param::DIFFUSE_MAP, TextureRef::rgb_2d(diffuse));
//!
//!     let mut gbuffer = GBufferMaterial::new();
//!     if let Some(current) = gbuffer.make_current(
//!         &material,
//!         GBufferFeatures::empty(),
//!         TextureFiltering::Anisotropic(8),
//!         &mut cache,
//!         &mut backend,
//!     ) {
//!         // issue the draw call for `current.program`
//!         let _ = current.effects;
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod gbuffer;
pub mod material;
pub mod program;
pub mod render;
pub mod volume;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{Config, RendererSettings},
        foundation::math::{Color3, Vec2, Vec3, Vec4},
        gbuffer::{BindingEffects, GBufferFeatures, GBufferMaterial, MaterialCurrent},
        material::{param, Material, ParameterValue, TextureKind, TextureRef},
        program::{FragmentFlags, ProgramFlags, ProgramVariantCache, VertexFlags},
        render::{
            HeadlessBackend, ProgramGenerator, RenderBackend, TextureFiltering, UniformValue,
        },
        volume::{compose, set_plane, ShaderLanguage},
    };
}
