//! Compiled shader record and its stage-by-stage builder

use crate::jasper_info;
use crate::shader::stage::{ShaderStage, ShaderStageFlags};
use crate::shader::types::{
    DescriptorSetLayoutBinding, PushConstantRange, VertexInputAttribute, VertexInputBinding,
    VertexInputRate,
};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Immutable compiled shader record
///
/// Holds the per-stage SPIR-V bytecode and the complete resource-binding
/// description merged across all stages: vertex attribute layout, descriptor
/// set layout bindings, and the push-constant range. Created through
/// [`SpvShaderBuilder`] and read-only thereafter.
#[derive(Debug, Clone)]
pub struct SpvShader {
    name: String,
    data: FxHashMap<ShaderStage, Vec<u32>>,
    vertex_attributes: Vec<VertexInputAttribute>,
    vertex_attribute_names: Vec<String>,
    vertex_bindings: Vec<VertexInputBinding>,
    descriptor_sets: BTreeMap<u32, Vec<DescriptorSetLayoutBinding>>,
    push_constant: PushConstantRange,
}

impl SpvShader {
    /// Logical shader name (source file name minus extensions)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// SPIR-V words for one stage, if that stage was discovered
    pub fn bytecode(&self, stage: ShaderStage) -> Option<&[u32]> {
        self.data.get(&stage).map(Vec::as_slice)
    }

    /// Stages this shader has bytecode for
    pub fn stages(&self) -> impl Iterator<Item = ShaderStage> + '_ {
        self.data.keys().copied()
    }

    /// Vertex input attributes, ordered by location
    pub fn vertex_attributes(&self) -> &[VertexInputAttribute] {
        &self.vertex_attributes
    }

    /// Source-level attribute names, parallel to [`Self::vertex_attributes`]
    pub fn vertex_attribute_names(&self) -> &[String] {
        &self.vertex_attribute_names
    }

    /// Vertex input bindings, ordered by binding index
    pub fn vertex_bindings(&self) -> &[VertexInputBinding] {
        &self.vertex_bindings
    }

    /// Descriptor set layout bindings, keyed by set index
    pub fn descriptor_sets(&self) -> &BTreeMap<u32, Vec<DescriptorSetLayoutBinding>> {
        &self.descriptor_sets
    }

    /// The shader's single logical push-constant block
    pub fn push_constant(&self) -> &PushConstantRange {
        &self.push_constant
    }

    /// Combined hash over all per-stage bytecode, usable as a pipeline
    /// cache key
    ///
    /// Stages are visited in flag-bit order so the hash is stable regardless
    /// of discovery order.
    pub fn bytecode_hash(&self) -> u64 {
        let mut stages: Vec<(&ShaderStage, &Vec<u32>)> = self.data.iter().collect();
        stages.sort_by_key(|(stage, _)| stage.flags().bits());

        let mut hash = 0u64;
        for (stage, words) in stages {
            hash = hash_combine(hash, u64::from(stage.flags().bits()));
            for word in words {
                hash = hash_combine(hash, u64::from(*word));
            }
        }
        hash
    }

    /// Print a formatted report of everything reflection recovered
    pub fn debug_print(&self) {
        const SOURCE: &str = "jasper::SpvShader";
        const BAR: &str = "==========================";

        jasper_info!(SOURCE, "");
        jasper_info!(SOURCE, "SPVShader '{}':", self.name);
        jasper_info!(SOURCE, "{}", BAR);

        if self.push_constant.size > 0 {
            jasper_info!(SOURCE, " [-] Push Constant");
            jasper_info!(SOURCE, "   [-] Size: {}", self.push_constant.size);
            jasper_info!(SOURCE, "   [-] Offset: {}", self.push_constant.offset);
        }

        if !self.descriptor_sets.is_empty() {
            jasper_info!(SOURCE, " [-] Descriptor Set Layout Bindings");
            for (set_index, bindings) in &self.descriptor_sets {
                for binding in bindings {
                    jasper_info!(
                        SOURCE,
                        "   [-] set = {}, binding = {}, type = {}, count = {}",
                        set_index,
                        binding.binding,
                        binding.descriptor_type,
                        binding.count
                    );
                }
            }
        }

        if !self.vertex_bindings.is_empty() {
            jasper_info!(SOURCE, " [-] Vertex Input Bindings");
            for binding in &self.vertex_bindings {
                jasper_info!(SOURCE, "   [-] Binding {}:", binding.binding);
                jasper_info!(SOURCE, "     [-] Stride: {}", binding.stride);
            }
        }

        if !self.vertex_attributes.is_empty() {
            jasper_info!(SOURCE, " [-] Vertex Attributes");
            for (attribute, name) in self.vertex_attributes.iter().zip(&self.vertex_attribute_names) {
                jasper_info!(
                    SOURCE,
                    "   [-] layout(location = {}, binding = {}, offset = {}) in {} {};",
                    attribute.location,
                    attribute.binding,
                    attribute.offset,
                    attribute.format,
                    name
                );
            }
        }

        jasper_info!(SOURCE, "{}", BAR);
    }
}

/// Per-name accumulator for reflection results
///
/// One builder exists per logical shader name while the manager processes
/// source files; each stage's reflection step mutates it through an
/// exclusive reference, and [`SpvShaderBuilder::finish`] freezes it into an
/// immutable [`SpvShader`].
#[derive(Debug)]
pub struct SpvShaderBuilder {
    pub(crate) name: String,
    pub(crate) data: FxHashMap<ShaderStage, Vec<u32>>,
    pub(crate) vertex_attributes: Vec<VertexInputAttribute>,
    pub(crate) vertex_attribute_names: Vec<String>,
    /// Running accumulated byte size per vertex buffer binding; becomes the
    /// binding strides at finish
    pub(crate) binding_strides: FxHashMap<u32, u32>,
    pub(crate) descriptor_sets: BTreeMap<u32, Vec<DescriptorSetLayoutBinding>>,
    pub(crate) push_constant: PushConstantRange,
}

impl SpvShaderBuilder {
    /// Create an empty builder for the given shader name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: FxHashMap::default(),
            vertex_attributes: Vec::new(),
            vertex_attribute_names: Vec::new(),
            binding_strides: FxHashMap::default(),
            descriptor_sets: BTreeMap::new(),
            push_constant: PushConstantRange::default(),
        }
    }

    /// Shader name this builder accumulates into
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store one stage's compiled bytecode
    pub fn set_bytecode(&mut self, stage: ShaderStage, words: Vec<u32>) {
        self.data.insert(stage, words);
    }

    /// Bytecode stored so far for one stage
    pub fn bytecode(&self, stage: ShaderStage) -> Option<&[u32]> {
        self.data.get(&stage).map(Vec::as_slice)
    }

    /// Stage mask accumulated into the push-constant range so far
    pub fn push_constant_stages(&self) -> ShaderStageFlags {
        self.push_constant.stage_flags
    }

    /// Freeze the accumulated state into an immutable [`SpvShader`]
    ///
    /// Emits one [`VertexInputBinding`] per distinct binding seen, with the
    /// binding's final accumulated size as its stride; bindings are sorted
    /// by index so the output is deterministic.
    pub fn finish(self) -> SpvShader {
        let mut vertex_bindings: Vec<VertexInputBinding> = self
            .binding_strides
            .into_iter()
            .map(|(binding, stride)| VertexInputBinding {
                binding,
                stride,
                input_rate: VertexInputRate::PerVertex,
            })
            .collect();
        vertex_bindings.sort_by_key(|binding| binding.binding);

        SpvShader {
            name: self.name,
            data: self.data,
            vertex_attributes: self.vertex_attributes,
            vertex_attribute_names: self.vertex_attribute_names,
            vertex_bindings,
            descriptor_sets: self.descriptor_sets,
            push_constant: self.push_constant,
        }
    }
}

/// Combine a value into a running hash (splitmix-style mixing constant)
pub(crate) fn hash_combine(seed: u64, value: u64) -> u64 {
    seed ^ (value
        .wrapping_add(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2))
}

#[cfg(test)]
#[path = "spv_shader_tests.rs"]
mod tests;
