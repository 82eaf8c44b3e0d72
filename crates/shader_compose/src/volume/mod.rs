//! Volume renderer shader composition
//!
//! The volume ray-caster assembles its fragment shader from small
//! per-concern functions. This module carries the clip-ray concern:
//! shortening the cast ray against scene depth and an arbitrary number of
//! clip planes, with the instance fragments spliced together at composition
//! time.

pub mod clip_ray;
mod sources_cg;
mod sources_glsl;
pub mod template;

pub use clip_ray::{compose, compose_named, set_plane, ShaderLanguage};
