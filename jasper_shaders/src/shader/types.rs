//! Shared data model for reflected shader resources

use crate::shader::stage::ShaderStageFlags;
use std::fmt;

/// Scalar component kind of a vertex input
///
/// Every supported component type is 4 bytes wide; 8-byte and packed
/// formats are out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// 32-bit float
    Float,
    /// 32-bit signed integer
    Int,
    /// 32-bit unsigned integer
    UInt,
}

/// Vertex attribute data format (32-bit components only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Format {
    /// Unrecognized component layout
    Undefined,
    R32_SFLOAT,
    R32G32_SFLOAT,
    R32G32B32_SFLOAT,
    R32G32B32A32_SFLOAT,
    R32_SINT,
    R32G32_SINT,
    R32G32B32_SINT,
    R32G32B32A32_SINT,
    R32_UINT,
    R32G32_UINT,
    R32G32B32_UINT,
    R32G32B32A32_UINT,
}

impl Format {
    /// Format for a vector of `components` elements of the given scalar kind
    ///
    /// Component counts outside 1..=4 yield [`Format::Undefined`].
    pub fn from_scalar(scalar: ScalarKind, components: u32) -> Format {
        match (scalar, components) {
            (ScalarKind::Float, 1) => Format::R32_SFLOAT,
            (ScalarKind::Float, 2) => Format::R32G32_SFLOAT,
            (ScalarKind::Float, 3) => Format::R32G32B32_SFLOAT,
            (ScalarKind::Float, 4) => Format::R32G32B32A32_SFLOAT,
            (ScalarKind::Int, 1) => Format::R32_SINT,
            (ScalarKind::Int, 2) => Format::R32G32_SINT,
            (ScalarKind::Int, 3) => Format::R32G32B32_SINT,
            (ScalarKind::Int, 4) => Format::R32G32B32A32_SINT,
            (ScalarKind::UInt, 1) => Format::R32_UINT,
            (ScalarKind::UInt, 2) => Format::R32G32_UINT,
            (ScalarKind::UInt, 3) => Format::R32G32B32_UINT,
            (ScalarKind::UInt, 4) => Format::R32G32B32A32_UINT,
            _ => Format::Undefined,
        }
    }
}

impl fmt::Display for Format {
    /// GLSL type name, used in reflection debug output
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Undefined => "undefined",
            Format::R32_SFLOAT => "float",
            Format::R32G32_SFLOAT => "vec2",
            Format::R32G32B32_SFLOAT => "vec3",
            Format::R32G32B32A32_SFLOAT => "vec4",
            Format::R32_SINT => "int",
            Format::R32G32_SINT => "ivec2",
            Format::R32G32B32_SINT => "ivec3",
            Format::R32G32B32A32_SINT => "ivec4",
            Format::R32_UINT => "uint",
            Format::R32G32_UINT => "uvec2",
            Format::R32G32B32_UINT => "uvec3",
            Format::R32G32B32A32_UINT => "uvec4",
        };
        write!(f, "{}", name)
    }
}

/// Rate at which a vertex input binding is advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexInputRate {
    /// Advance per vertex
    PerVertex,
    /// Advance per instance (reflection never emits this; instance-rate
    /// input is out of scope)
    PerInstance,
}

/// Descriptor binding type
///
/// Only the three categories the reflector understands; the identity key
/// for merging is (binding, type) within one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorType {
    /// Uniform buffer object
    UniformBuffer,
    /// Combined image + sampler
    CombinedImageSampler,
    /// Storage buffer object
    StorageBuffer,
}

impl fmt::Display for DescriptorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DescriptorType::UniformBuffer => "Uniform Buffer",
            DescriptorType::CombinedImageSampler => "Combined Image Sampler",
            DescriptorType::StorageBuffer => "Storage Buffer",
        };
        write!(f, "{}", name)
    }
}

/// One vertex input attribute of a shader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexInputAttribute {
    /// Location decoration
    pub location: u32,
    /// Vertex buffer binding this attribute reads from
    pub binding: u32,
    /// Component layout
    pub format: Format,
    /// Byte offset within the binding's vertex record
    pub offset: u32,
}

/// One vertex buffer binding of a shader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexInputBinding {
    /// Binding index
    pub binding: u32,
    /// Bytes per vertex record
    pub stride: u32,
    /// Step rate
    pub input_rate: VertexInputRate,
}

/// One descriptor set layout binding of a shader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorSetLayoutBinding {
    /// Binding decoration
    pub binding: u32,
    /// Descriptor category
    pub descriptor_type: DescriptorType,
    /// Array element count (always 1; descriptor arrays are out of scope)
    pub count: u32,
    /// Stages that reference this binding
    pub stage_flags: ShaderStageFlags,
}

/// The shader's single logical push-constant block (union across stages)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PushConstantRange {
    /// Stages that declare the block
    pub stage_flags: ShaderStageFlags,
    /// Byte offset of the block
    pub offset: u32,
    /// Declared struct size in bytes
    pub size: u32,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
