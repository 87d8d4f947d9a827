//! Shader module - bytecode reflection and content-addressed compilation cache
//!
//! Data flow: [`ShaderManager`] loads the [`CacheIndex`], enumerates source
//! files, and per file either reads cached bytecode or compiles through the
//! [`ShaderBackend`]; the stage's bytecode is then always reflected into the
//! named shader's builder (reflection is never cached). Builders are
//! finalized into immutable [`SpvShader`] records once every file has been
//! processed.

// Module declarations
pub mod backend;
pub mod cache;
pub mod manager;
pub mod reflect;
pub mod spv_shader;
pub mod stage;
pub mod types;

#[cfg(test)]
pub mod mock_backend;

// Re-export from other modules
pub use backend::*;
pub use cache::*;
pub use manager::*;
pub use reflect::*;
pub use spv_shader::*;
pub use stage::*;
pub use types::*;
