//! Production shader backend built on shaderc and spirq
//!
//! Implements the [`jasper_shaders::ShaderBackend`] seam: GLSL source is
//! compiled to SPIR-V through shaderc, and compiled bytecode is introspected
//! with spirq into the structured resource lists the reflection pass
//! consumes.

mod shaderc_backend;

pub use shaderc_backend::ShadercBackend;
