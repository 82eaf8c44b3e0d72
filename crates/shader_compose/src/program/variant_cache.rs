//! Lazy cache of compiled GPU program variants
//!
//! One [`CachedProgram`] per distinct [`ProgramFlags`] value ever requested.
//! A cache miss compiles inline on the rendering thread — a one-time latency
//! spike per flag combination, amortized across frames. Entries are never
//! evicted; the flag space stays well under a few hundred live variants in
//! practice.

use std::collections::HashMap;

use crate::program::flags::ProgramFlags;
use crate::program::semantics::ProgramBindings;
use crate::render::{ProgramGenerator, ProgramHandle};

/// A compiled program variant plus its lazily resolved binding table
#[derive(Debug)]
pub struct CachedProgram {
    flags: ProgramFlags,
    program: ProgramHandle,
    bindings: Option<ProgramBindings>,
}

impl CachedProgram {
    /// The flag set this variant was compiled for
    pub fn flags(&self) -> ProgramFlags {
        self.flags
    }

    /// The opaque GPU program handle
    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    /// The binding table, if it has been resolved already
    pub fn bindings(&self) -> Option<&ProgramBindings> {
        self.bindings.as_ref()
    }

    /// Resolve the binding table on first use, returning it
    ///
    /// Resolution is a one-time cost per variant, not per draw call; callers
    /// invoke this right after the first successful make-current.
    pub fn ensure_bindings(&mut self, generator: &dyn ProgramGenerator) -> &ProgramBindings {
        let (flags, program) = (self.flags, self.program);
        self.bindings.get_or_insert_with(|| {
            log::debug!("resolving binding table for program variant {flags:?}");
            ProgramBindings::resolve(generator, program)
        })
    }
}

/// Cache mapping flag sets to compiled program variants
#[derive(Debug, Default)]
pub struct ProgramVariantCache {
    programs: HashMap<ProgramFlags, CachedProgram>,
}

impl ProgramVariantCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the variant for `flags`, compiling it on first request
    ///
    /// Returns `None` when the backend fails to compile or link the variant;
    /// the caller must skip drawing with this material rather than treat the
    /// failure as fatal. Failed generations are not cached, so a transient
    /// failure is retried on the next request.
    pub fn get_or_create(
        &mut self,
        flags: ProgramFlags,
        generator: &mut dyn ProgramGenerator,
    ) -> Option<&mut CachedProgram> {
        if !self.programs.contains_key(&flags) {
            log::debug!("program variant cache miss for {flags:?}");
            match generator.generate_program(flags) {
                Ok(program) => {
                    self.programs.insert(
                        flags,
                        CachedProgram {
                            flags,
                            program,
                            bindings: None,
                        },
                    );
                }
                Err(error) => {
                    log::warn!("program generation failed: {error}");
                    return None;
                }
            }
        }
        self.programs.get_mut(&flags)
    }

    /// Look up an already compiled variant without compiling
    pub fn get(&self, flags: ProgramFlags) -> Option<&CachedProgram> {
        self.programs.get(&flags)
    }

    /// Number of live program variants
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Whether no variant has been compiled yet
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Drop every cached variant
    ///
    /// The owning renderer calls this when the GPU context is lost and all
    /// program handles become stale.
    pub fn clear(&mut self) {
        self.programs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::flags::{FragmentFlags, VertexFlags};
    use crate::render::HeadlessBackend;

    fn flags(fragment: FragmentFlags) -> ProgramFlags {
        let mut flags = ProgramFlags::default();
        flags.add_fragment(fragment);
        flags
    }

    #[test]
    fn test_equal_flags_share_one_program() {
        let mut backend = HeadlessBackend::new();
        let mut cache = ProgramVariantCache::new();

        let first = cache
            .get_or_create(flags(FragmentFlags::DIFFUSE_MAP), &mut backend)
            .unwrap()
            .program();
        let second = cache
            .get_or_create(flags(FragmentFlags::DIFFUSE_MAP), &mut backend)
            .unwrap()
            .program();

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        assert_eq!(backend.generated_program_count(), 1);
    }

    #[test]
    fn test_unequal_flags_get_distinct_programs() {
        let mut backend = HeadlessBackend::new();
        let mut cache = ProgramVariantCache::new();

        let diffuse = cache
            .get_or_create(flags(FragmentFlags::DIFFUSE_MAP), &mut backend)
            .unwrap()
            .program();
        let glow = cache
            .get_or_create(flags(FragmentFlags::GLOW), &mut backend)
            .unwrap()
            .program();
        let mut vertex_only = ProgramFlags::default();
        vertex_only.add_vertex(VertexFlags::TWO_SIDED);
        let two_sided = cache
            .get_or_create(vertex_only, &mut backend)
            .unwrap()
            .program();

        assert_ne!(diffuse, glow);
        assert_ne!(diffuse, two_sided);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_generation_failure_returns_none_and_retries() {
        let mut backend = HeadlessBackend::new();
        backend.fail_generation(true);
        let mut cache = ProgramVariantCache::new();

        assert!(cache
            .get_or_create(flags(FragmentFlags::DIFFUSE_MAP), &mut backend)
            .is_none());
        assert!(cache.is_empty());

        // The failure was not cached; a later request succeeds
        backend.fail_generation(false);
        assert!(cache
            .get_or_create(flags(FragmentFlags::DIFFUSE_MAP), &mut backend)
            .is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_bindings_resolved_once() {
        let mut backend = HeadlessBackend::new();
        let mut cache = ProgramVariantCache::new();

        let cached = cache
            .get_or_create(flags(FragmentFlags::DIFFUSE_MAP), &mut backend)
            .unwrap();
        assert!(cached.bindings().is_none());

        cached.ensure_bindings(&backend);
        assert!(cached.bindings().is_some());
    }

    #[test]
    fn test_clear() {
        let mut backend = HeadlessBackend::new();
        let mut cache = ProgramVariantCache::new();
        cache
            .get_or_create(flags(FragmentFlags::DIFFUSE_MAP), &mut backend)
            .unwrap();
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
