//! Deferred G-buffer fill pass material handling
//!
//! The per-draw pipeline is strict: resynchronize the material state (if
//! stale), fetch or compile the program variant for the derived flags, make
//! it current, then bind the active features. [`GBufferMaterial`] drives
//! that sequence; the lower layers are exposed for render passes that need
//! finer control.

pub mod binding;
pub mod features;
pub mod material;
pub mod sync;

pub use binding::BindingEffects;
pub use features::GBufferFeatures;
pub use material::{GBufferMaterial, MaterialCurrent};
pub use sync::{MaterialSync, MaterialSyncState};
