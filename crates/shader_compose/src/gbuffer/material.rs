//! Per-material entry point of the G-buffer fill pass

use crate::material::Material;
use crate::program::{ProgramFlags, ProgramVariantCache};
use crate::render::{ProgramGenerator, ProgramHandle, RenderBackend, TextureFiltering};

use super::binding::{self, BindingEffects};
use super::features::GBufferFeatures;
use super::sync::MaterialSync;

/// Result of making a material current for one draw
#[derive(Debug, Clone, Copy)]
pub struct MaterialCurrent {
    /// The program variant now current on the backend
    pub program: ProgramHandle,
    /// The flag set the program was selected by
    pub flags: ProgramFlags,
    /// What the binding pass fed into color target 3
    pub effects: BindingEffects,
}

/// One material's view into the G-buffer fill pass
///
/// Owns the synchronizer for a single material and drives the full
/// per-draw pipeline: resynchronize, select the program variant, make it
/// current, bind. The program cache is shared across all materials and
/// passed in by the owning render pass.
#[derive(Debug, Default)]
pub struct GBufferMaterial {
    sync: MaterialSync,
}

impl GBufferMaterial {
    /// Create the per-material state with nothing derived yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Derived feature decisions from the last synchronization
    pub fn sync(&self) -> &MaterialSync {
        &self.sync
    }

    /// Make the material current for the next draw call
    ///
    /// Resynchronizes if stale, fetches (or compiles) the program variant
    /// for the derived flags, makes it current and binds every active
    /// feature. Returns `None` when the variant cannot be compiled or made
    /// current; the caller skips this draw and continues with the next
    /// material.
    pub fn make_current<B>(
        &mut self,
        material: &Material,
        features: GBufferFeatures,
        filtering: TextureFiltering,
        cache: &mut ProgramVariantCache,
        backend: &mut B,
    ) -> Option<MaterialCurrent>
    where
        B: ProgramGenerator + RenderBackend,
    {
        self.sync.resynchronize(material, features);
        let flags = self.sync.flags();

        let cached = cache.get_or_create(flags, backend)?;
        let program = cached.program();
        if !backend.set_program(program) {
            log::warn!(
                "program variant for material '{}' could not be made current",
                material.name()
            );
            return None;
        }

        let bindings = cached.ensure_bindings(&*backend);
        let effects = binding::apply(self.sync.state(), bindings, backend, filtering);

        Some(MaterialCurrent {
            program,
            flags,
            effects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{param, TextureRef};
    use crate::program::FragmentFlags;
    use crate::render::HeadlessBackend;

    #[test]
    fn test_make_current_pipeline() {
        let mut backend = HeadlessBackend::new();
        let mut cache = ProgramVariantCache::new();

        let diffuse = backend.create_texture("d");
        let mut material = Material::new("crate");
        material.set_texture(param::DIFFUSE_MAP, TextureRef::rgba_2d(diffuse));
        material.set_f32(param::GLOW, 1.0);

        let mut gbuffer = GBufferMaterial::new();
        let current = gbuffer
            .make_current(
                &material,
                GBufferFeatures::empty(),
                TextureFiltering::Bilinear,
                &mut cache,
                &mut backend,
            )
            .unwrap();

        assert!(current.flags.fragment.contains(FragmentFlags::DIFFUSE_MAP));
        assert!(current.flags.fragment.contains(FragmentFlags::ALPHA_TEST));
        assert!(current.effects.color_target3_alpha_used);
        assert_eq!(backend.bound_texture(0), Some(diffuse));

        // Second draw with unchanged parameters reuses the cached variant
        let again = gbuffer
            .make_current(
                &material,
                GBufferFeatures::empty(),
                TextureFiltering::Bilinear,
                &mut cache,
                &mut backend,
            )
            .unwrap();
        assert_eq!(again.program, current.program);
        assert_eq!(backend.generated_program_count(), 1);
    }

    #[test]
    fn test_generation_failure_skips_draw() {
        let mut backend = HeadlessBackend::new();
        backend.fail_generation(true);
        let mut cache = ProgramVariantCache::new();
        let material = Material::new("broken");

        let mut gbuffer = GBufferMaterial::new();
        assert!(gbuffer
            .make_current(
                &material,
                GBufferFeatures::empty(),
                TextureFiltering::Bilinear,
                &mut cache,
                &mut backend,
            )
            .is_none());
    }
}
