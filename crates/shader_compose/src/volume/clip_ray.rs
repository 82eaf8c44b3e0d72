//! Clip-ray shader function composition
//!
//! Assembles the fragment-shader `ClipRay` entry point for a volume
//! renderer from pluggable per-instance clip functions: one instance per
//! depth texture, one per active clip plane. Composition is a pure function
//! of (shader language, instance counts); the caller caches the result per
//! distinct scene clip configuration.
//!
//! Ordering is position-correlated across three places: the instance
//! fragments above the dispatcher, the call statements inside it, and the
//! runtime [`set_plane`] calls all use the same depth-textures-then-planes
//! order, indexed per kind.

use crate::foundation::math::Vec4;
use crate::render::{ProgramGenerator, ProgramHandle, RenderBackend, UniformValue};

use super::template::{DispatcherTemplate, InstanceTemplate};
use super::{sources_cg, sources_glsl};

/// Shader languages the composer carries templates for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderLanguage {
    /// OpenGL Shading Language
    Glsl,
    /// NVIDIA Cg
    Cg,
}

impl ShaderLanguage {
    /// Parse a shader language token; `None` for anything unrecognized
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "GLSL" => Some(Self::Glsl),
            "Cg" => Some(Self::Cg),
            _ => None,
        }
    }

    /// The canonical token of this language
    pub const fn name(self) -> &'static str {
        match self {
            Self::Glsl => "GLSL",
            Self::Cg => "Cg",
        }
    }
}

struct LanguageTemplates {
    dispatcher: DispatcherTemplate,
    depth_texture_body: InstanceTemplate,
    depth_texture_call: InstanceTemplate,
    clip_plane_body: InstanceTemplate,
    clip_plane_call: InstanceTemplate,
}

const fn templates(language: ShaderLanguage) -> LanguageTemplates {
    match language {
        ShaderLanguage::Glsl => LanguageTemplates {
            dispatcher: sources_glsl::DISPATCHER,
            depth_texture_body: sources_glsl::DEPTH_TEXTURE_BODY,
            depth_texture_call: sources_glsl::DEPTH_TEXTURE_CALL,
            clip_plane_body: sources_glsl::CLIP_PLANE_BODY,
            clip_plane_call: sources_glsl::CLIP_PLANE_CALL,
        },
        ShaderLanguage::Cg => LanguageTemplates {
            dispatcher: sources_cg::DISPATCHER,
            depth_texture_body: sources_cg::DEPTH_TEXTURE_BODY,
            depth_texture_call: sources_cg::DEPTH_TEXTURE_CALL,
            clip_plane_body: sources_cg::CLIP_PLANE_BODY,
            clip_plane_call: sources_cg::CLIP_PLANE_CALL,
        },
    }
}

/// Compose the clip-ray shader source for the given instance counts
///
/// Depth-texture instances come first, then clip-plane instances, each kind
/// numbered from zero. The instance fragments are concatenated above the
/// dispatcher, whose body calls them in the same order.
pub fn compose(language: ShaderLanguage, clip_planes: usize, depth_textures: usize) -> String {
    let templates = templates(language);

    let mut source = String::new();
    let mut calls = Vec::with_capacity(depth_textures + clip_planes);
    for index in 0..depth_textures {
        source.push_str(&templates.depth_texture_body.render(index));
        calls.push(templates.depth_texture_call.render(index));
    }
    for index in 0..clip_planes {
        source.push_str(&templates.clip_plane_body.render(index));
        calls.push(templates.clip_plane_call.render(index));
    }
    source.push_str(&templates.dispatcher.render(&calls));
    source
}

/// Compose by language token; an unrecognized token yields an empty string,
/// meaning "no clip-ray capability for this language"
pub fn compose_named(language: &str, clip_planes: usize, depth_textures: usize) -> String {
    match ShaderLanguage::from_name(language) {
        Some(language) => compose(language, clip_planes, depth_textures),
        None => {
            log::warn!("unknown shader language '{language}', no clip-ray composition");
            String::new()
        }
    }
}

/// Set the view-space clip plane of instance `index` on a composed program
///
/// Must be called once per active clip plane, in composition order. A
/// program composed without that instance skips the call silently.
pub fn set_plane<B>(backend: &mut B, program: ProgramHandle, index: usize, plane: Vec4)
where
    B: ProgramGenerator + RenderBackend,
{
    let name = format!("ClipPlane_{index}_");
    match backend.uniform_location(program, &name) {
        Some(location) => backend.set_uniform(location, UniformValue::Vec4(plane)),
        None => log::trace!("clip plane uniform {name} not present, skipping"),
    }
}
