/*!
# Jasper Shaders

Shader bytecode reflection and content-addressed compilation cache.

This crate turns a directory of per-stage GLSL sources into named
[`SpvShader`] records: compiled SPIR-V bytecode per stage plus a complete
resource-binding description (vertex attribute layout, descriptor set layout
bindings, push-constant range) recovered by reflection, sufficient to build a
graphics pipeline without hand-written binding tables. Unchanged sources are
not recompiled across runs; compiled bytecode is kept in an on-disk cache
keyed by a content hash.

## Architecture

- **ShaderBackend**: trait seam for the external compiler and introspector.
  The production implementation lives in `jasper_shaders_backend_shaderc`.
- **Reflector**: merges per-stage introspection results into one consistent
  layout (stage flags are OR-combined, offsets accumulate per binding).
- **CacheIndex**: flat-text `name: hash` index, self-healing against deleted
  bytecode files, persisted with an atomic rename.
- **ShaderManager**: discovers sources, decides compile-vs-reuse, drives the
  backend and the reflector, and owns the final named shader collection.
*/

// Internal modules
mod error;
pub mod log;
pub mod shader;

// Main jasper namespace module
pub mod jasper {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
    }

    // Shader pipeline sub-module with all shader types
    pub mod shader {
        pub use crate::shader::*;
    }
}

// Re-export the main types at the crate root
pub use error::{Error, Result};
pub use shader::{
    CacheIndex, CompilerFlags, DescriptorResource, DescriptorSetLayoutBinding, DescriptorType,
    Format, ModuleResources, PushConstantBlock, PushConstantRange, ScalarKind, ShaderBackend,
    ShaderManager, ShaderManagerSettings, ShaderStage, ShaderStageFlags, SpvShader,
    SpvShaderBuilder, StageInput, TargetEnvironment, VertexInputAttribute, VertexInputBinding,
    VertexInputRate,
};
