//! Collaborator seam for bytecode compilation and introspection
//!
//! The pipeline treats the text-to-bytecode compiler and the bytecode
//! introspector as capability interfaces. The production implementation
//! (shaderc + spirq) lives in the `jasper_shaders_backend_shaderc` crate;
//! tests use a mock.

use crate::error::Result;
use crate::shader::stage::ShaderStage;
use crate::shader::types::ScalarKind;

/// Shader compilation target environment
///
/// Only Vulkan and OpenGL are supported; selecting anything else is a fatal
/// configuration error at compile time, not a runtime fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetEnvironment {
    None,
    Vulkan,
    OpenGl,
    DirectX,
}

/// Flags handed to the backend for every compilation
#[derive(Debug, Clone, Copy)]
pub struct CompilerFlags {
    /// Emit per-compilation debug log lines
    pub debug: bool,
    /// Target environment selector
    pub environment: TargetEnvironment,
}

impl Default for CompilerFlags {
    fn default() -> Self {
        Self {
            debug: true,
            environment: TargetEnvironment::None,
        }
    }
}

/// A single vertex-stage input reported by the introspector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageInput {
    /// Location decoration
    pub location: u32,
    /// Binding decoration (0 when the source declares none, which is the
    /// common case for GLSL vertex inputs)
    pub binding: u32,
    /// Declared variable name; None when stripped from the bytecode
    pub name: Option<String>,
    /// Component scalar kind
    pub scalar: ScalarKind,
    /// Component count (1 for scalars, 2-4 for vectors)
    pub components: u32,
}

/// A descriptor resource's set/binding decorations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorResource {
    /// Descriptor set decoration
    pub set: u32,
    /// Binding decoration
    pub binding: u32,
}

/// A push-constant block's declared layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushConstantBlock {
    /// Declared struct size in bytes
    pub size: u32,
    /// Byte offset of the block
    pub offset: u32,
}

/// Structured resource lists introspected from one stage's bytecode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleResources {
    /// Stage input variables (only consumed for the vertex stage)
    pub stage_inputs: Vec<StageInput>,
    /// Uniform buffer resources
    pub uniform_buffers: Vec<DescriptorResource>,
    /// Combined image sampler resources
    pub sampled_images: Vec<DescriptorResource>,
    /// Storage buffer resources
    pub storage_buffers: Vec<DescriptorResource>,
    /// Push-constant blocks; at most one is expected per stage, and when a
    /// stage declares several only the last one visited takes effect
    pub push_constants: Vec<PushConstantBlock>,
}

/// Bytecode compiler + introspector seam
///
/// Implemented by backend crates (e.g., ShadercBackend). The manager calls
/// `compile` only on cache misses; `introspect` runs for every stage of
/// every shader on every construction, since reflection output is never
/// cached.
pub trait ShaderBackend {
    /// Compile one stage's source text to SPIR-V words
    ///
    /// # Errors
    ///
    /// Returns a `Config` error for an unsupported target environment and a
    /// `Compile` error carrying the compiler's diagnostic verbatim when the
    /// source is rejected. Both are fatal to pipeline construction.
    fn compile(
        &self,
        source: &str,
        file_name: &str,
        stage: ShaderStage,
        flags: &CompilerFlags,
    ) -> Result<Vec<u32>>;

    /// Extract the structured resource lists from compiled bytecode
    ///
    /// # Errors
    ///
    /// Returns a `Reflection` error if the bytecode cannot be parsed.
    /// Well-formed bytecode (anything a successful `compile` produced) is
    /// expected to succeed.
    fn introspect(&self, spv: &[u32]) -> Result<ModuleResources>;
}
