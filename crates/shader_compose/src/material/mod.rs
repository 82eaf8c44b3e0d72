//! Material parameter collection
//!
//! A material is a flat set of named parameters (scalars, vectors, colors,
//! texture references). The renderer-facing modules never read parameters
//! directly per draw call; instead the G-buffer synchronizer resolves them
//! into a [`crate::gbuffer::MaterialSyncState`] snapshot and caches that
//! until the material changes.
//!
//! Change tracking uses an explicit version counter: every mutation of the
//! parameter collection bumps [`Material::version`], and consumers compare
//! the version they last resolved against instead of subscribing to change
//! callbacks.

pub mod parameters;
pub mod texture;

pub use parameters::{param, Material, ParameterValue};
pub use texture::{CompressionHint, TextureKind, TextureRef};
