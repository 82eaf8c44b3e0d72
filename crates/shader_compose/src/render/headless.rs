//! Headless backend implementing the renderer collaborator traits
//!
//! No GPU is involved: programs and textures live in slotmaps, "generated
//! source" is a `#define` listing of the requested flag set, and every
//! sampler/uniform call is recorded for inspection. Used by the test suite
//! and the demo binary, and useful as a null renderer when running tooling
//! on machines without graphics support.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::program::{ProgramFlags, Semantic};

use super::{
    AttributeLocation, ProgramError, ProgramGenerator, ProgramHandle, RenderBackend,
    TextureAddressing, TextureFiltering, TextureHandle, UniformLocation, UniformValue,
};

#[derive(Debug)]
struct ProgramRecord {
    source: String,
    uniforms: HashMap<String, UniformLocation>,
    attributes: HashMap<String, AttributeLocation>,
}

/// Recorded sampler state of one texture unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerState {
    /// Addressing along U
    pub address_u: TextureAddressing,
    /// Addressing along V
    pub address_v: TextureAddressing,
    /// Filtering policy
    pub filtering: Option<TextureFiltering>,
}

/// Recording no-op implementation of [`ProgramGenerator`] and
/// [`RenderBackend`]
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    programs: SlotMap<ProgramHandle, ProgramRecord>,
    textures: SlotMap<TextureHandle, String>,
    next_location: u32,
    generated_programs: usize,
    fail_generation: bool,
    current_program: Option<ProgramHandle>,
    next_texture_unit: u32,
    bound_textures: HashMap<u32, TextureHandle>,
    sampler_states: HashMap<u32, SamplerState>,
    uniform_values: HashMap<UniformLocation, UniformValue>,
}

impl HeadlessBackend {
    /// Create a fresh backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Force every following program generation to fail, for testing the
    /// compile-failure path
    pub fn fail_generation(&mut self, fail: bool) {
        self.fail_generation = fail;
    }

    /// Register a texture; the label is only used for diagnostics
    pub fn create_texture(&mut self, label: impl Into<String>) -> TextureHandle {
        self.textures.insert(label.into())
    }

    /// Register an externally composed program from full shader source
    ///
    /// Declares the given uniform names; used for composed volume shaders
    /// whose symbols are not derived from G-buffer flags.
    pub fn create_program_from_source(
        &mut self,
        source: impl Into<String>,
        uniform_names: &[&str],
    ) -> ProgramHandle {
        let mut uniforms = HashMap::new();
        for name in uniform_names {
            uniforms.insert((*name).to_string(), UniformLocation(self.next_location));
            self.next_location += 1;
        }
        self.programs.insert(ProgramRecord {
            source: source.into(),
            uniforms,
            attributes: HashMap::new(),
        })
    }

    /// Number of programs generated so far (cache-hit observability)
    pub fn generated_program_count(&self) -> usize {
        self.generated_programs
    }

    /// The synthesized source of a program
    pub fn program_source(&self, program: ProgramHandle) -> Option<&str> {
        self.programs.get(program).map(|record| record.source.as_str())
    }

    /// The texture currently bound to a unit
    pub fn bound_texture(&self, unit: u32) -> Option<TextureHandle> {
        self.bound_textures.get(&unit).copied()
    }

    /// Number of texture units bound since the last program change
    pub fn bound_unit_count(&self) -> u32 {
        self.next_texture_unit
    }

    /// The recorded sampler state of a unit
    pub fn sampler_state(&self, unit: u32) -> Option<SamplerState> {
        self.sampler_states.get(&unit).copied()
    }

    /// The last value set on a uniform location
    pub fn uniform_value(&self, location: UniformLocation) -> Option<UniformValue> {
        self.uniform_values.get(&location).copied()
    }

    /// The last value set on a named uniform of a program
    pub fn uniform_value_by_name(&self, program: ProgramHandle, name: &str) -> Option<UniformValue> {
        let location = self.uniform_location(program, name)?;
        self.uniform_value(location)
    }

    fn synthesize_source(flags: ProgramFlags) -> String {
        let mut source = String::from("// synthesized program variant\n");
        for (name, _) in flags.vertex.iter_names() {
            source.push_str("#define VS_");
            source.push_str(name);
            source.push('\n');
        }
        for (name, _) in flags.fragment.iter_names() {
            source.push_str("#define FS_");
            source.push_str(name);
            source.push('\n');
        }
        source
    }
}

impl ProgramGenerator for HeadlessBackend {
    fn generate_program(&mut self, flags: ProgramFlags) -> Result<ProgramHandle, ProgramError> {
        if self.fail_generation {
            return Err(ProgramError::GenerationFailed {
                flags,
                reason: "generation disabled".to_string(),
            });
        }

        // Expose exactly the symbols a driver would for this variant
        let mut uniforms = HashMap::new();
        let mut attributes = HashMap::new();
        for semantic in Semantic::ALL {
            if !semantic.required_by(flags) {
                continue;
            }
            if semantic.is_attribute() {
                attributes.insert(
                    semantic.name().to_string(),
                    AttributeLocation(self.next_location),
                );
            } else {
                uniforms.insert(
                    semantic.name().to_string(),
                    UniformLocation(self.next_location),
                );
            }
            self.next_location += 1;
        }

        self.generated_programs += 1;
        Ok(self.programs.insert(ProgramRecord {
            source: Self::synthesize_source(flags),
            uniforms,
            attributes,
        }))
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        self.programs
            .get(program)
            .and_then(|record| record.uniforms.get(name))
            .copied()
    }

    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<AttributeLocation> {
        self.programs
            .get(program)
            .and_then(|record| record.attributes.get(name))
            .copied()
    }
}

impl RenderBackend for HeadlessBackend {
    fn set_program(&mut self, program: ProgramHandle) -> bool {
        if !self.programs.contains_key(program) {
            return false;
        }
        self.current_program = Some(program);
        // Texture units are assigned per draw, starting over with each
        // program change
        self.next_texture_unit = 0;
        self.bound_textures.clear();
        true
    }

    fn bind_texture(&mut self, _location: UniformLocation, texture: TextureHandle) -> Option<u32> {
        if !self.textures.contains_key(texture) {
            return None;
        }
        let unit = self.next_texture_unit;
        self.next_texture_unit += 1;
        self.bound_textures.insert(unit, texture);
        Some(unit)
    }

    fn set_sampler_address(&mut self, unit: u32, u: TextureAddressing, v: TextureAddressing) {
        let state = self.sampler_states.entry(unit).or_insert(SamplerState {
            address_u: u,
            address_v: v,
            filtering: None,
        });
        state.address_u = u;
        state.address_v = v;
    }

    fn set_sampler_filtering(&mut self, unit: u32, filtering: TextureFiltering) {
        let state = self.sampler_states.entry(unit).or_insert(SamplerState {
            address_u: TextureAddressing::Wrap,
            address_v: TextureAddressing::Wrap,
            filtering: None,
        });
        state.filtering = Some(filtering);
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        self.uniform_values.insert(location, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::FragmentFlags;

    #[test]
    fn test_symbols_follow_flags() {
        let mut backend = HeadlessBackend::new();
        let mut flags = ProgramFlags::default();
        flags.add_fragment(FragmentFlags::DIFFUSE_MAP);
        let program = backend.generate_program(flags).unwrap();

        assert!(backend.uniform_location(program, "DiffuseMap").is_some());
        assert!(backend.uniform_location(program, "NormalMap").is_none());
        assert!(backend.attribute_location(program, "VertexPosition").is_some());
        assert!(backend.attribute_location(program, "VertexTangent").is_none());
    }

    #[test]
    fn test_texture_units_assigned_sequentially() {
        let mut backend = HeadlessBackend::new();
        let program = backend.generate_program(ProgramFlags::default()).unwrap();
        let texture_a = backend.create_texture("a");
        let texture_b = backend.create_texture("b");
        assert!(backend.set_program(program));

        let location = UniformLocation(0);
        assert_eq!(backend.bind_texture(location, texture_a), Some(0));
        assert_eq!(backend.bind_texture(location, texture_b), Some(1));

        // A new draw starts the unit assignment over
        assert!(backend.set_program(program));
        assert_eq!(backend.bind_texture(location, texture_b), Some(0));
    }

    #[test]
    fn test_set_program_rejects_unknown_handle() {
        let mut backend = HeadlessBackend::new();
        let program = backend.generate_program(ProgramFlags::default()).unwrap();

        // A handle minted by a different backend occupies a slot this
        // backend never allocated
        let mut other = HeadlessBackend::new();
        other.generate_program(ProgramFlags::default()).unwrap();
        let mut flags = ProgramFlags::default();
        flags.add_fragment(FragmentFlags::GLOW);
        let foreign = other.generate_program(flags).unwrap();

        assert!(backend.set_program(program));
        assert!(!backend.set_program(foreign));
    }
}
