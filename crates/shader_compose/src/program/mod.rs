//! GPU program variants keyed by capability flag sets
//!
//! A program variant is one compiled+linked GPU program corresponding to
//! exactly one [`ProgramFlags`] value. The [`ProgramVariantCache`] owns every
//! variant ever requested for the lifetime of the renderer; the flag space is
//! small and bounded, so there is no eviction.

pub mod flags;
pub mod semantics;
pub mod variant_cache;

pub use flags::{FragmentFlags, ProgramFlags, VertexFlags};
pub use semantics::{ProgramBindings, Semantic};
pub use variant_cache::{CachedProgram, ProgramVariantCache};
