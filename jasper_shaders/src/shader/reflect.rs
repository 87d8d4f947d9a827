//! The Reflector: merges one stage's introspection results into a shader
//! record
//!
//! Reflection only ever adds to the accumulated record; data merged from
//! other stages is never replaced. Descriptor bindings found again in a
//! later stage gain that stage's flag instead of producing a duplicate
//! entry.

use crate::jasper_info;
use crate::shader::backend::{DescriptorResource, ModuleResources, StageInput};
use crate::shader::spv_shader::SpvShaderBuilder;
use crate::shader::stage::ShaderStage;
use crate::shader::types::{DescriptorSetLayoutBinding, DescriptorType, Format, VertexInputAttribute};

/// Merge one stage's resource lists into the shader's builder
///
/// Vertex attribute layout is only computed for the vertex stage. Push
/// constants and descriptor bindings are merged for every stage.
pub fn reflect_stage(
    shader: &mut SpvShaderBuilder,
    stage: ShaderStage,
    resources: &ModuleResources,
    debug: bool,
) {
    if stage == ShaderStage::Vertex {
        reflect_vertex_inputs(shader, &resources.stage_inputs, debug);
    }

    // ===== Push constants =====
    if !resources.push_constants.is_empty() {
        shader.push_constant.stage_flags |= stage.flags();
        // At most one block per shader is assumed; a stage declaring several
        // keeps only the last one visited.
        for block in &resources.push_constants {
            shader.push_constant.size = block.size;
            shader.push_constant.offset = block.offset;

            if debug {
                jasper_info!(
                    "jasper::Reflector",
                    " [+] Found PushConstant: stage={}, size={}, offset={}",
                    stage,
                    block.size,
                    block.offset
                );
            }
        }
    }

    // ===== Descriptors =====
    for resource in &resources.uniform_buffers {
        merge_descriptor_binding(shader, resource, DescriptorType::UniformBuffer, stage, debug);
    }

    for resource in &resources.sampled_images {
        merge_descriptor_binding(
            shader,
            resource,
            DescriptorType::CombinedImageSampler,
            stage,
            debug,
        );
    }

    for resource in &resources.storage_buffers {
        merge_descriptor_binding(shader, resource, DescriptorType::StorageBuffer, stage, debug);
    }
}

/// Compute the vertex attribute layout from the stage's input variables
fn reflect_vertex_inputs(shader: &mut SpvShaderBuilder, stage_inputs: &[StageInput], debug: bool) {
    // Sort inputs by location: attribute offsets are computed by
    // accumulating per-binding byte size in visit order, so processing out
    // of location order would silently produce wrong offsets.
    let mut inputs: Vec<&StageInput> = stage_inputs.iter().collect();
    inputs.sort_by_key(|input| input.location);

    for input in inputs {
        let format = Format::from_scalar(input.scalar, input.components);
        let size = input.components * 4; // 4 bytes per component (float, int, uint)
        let offset = shader.binding_strides.get(&input.binding).copied().unwrap_or(0);

        shader.vertex_attributes.push(VertexInputAttribute {
            location: input.location,
            binding: input.binding,
            format,
            offset,
        });

        // Fall back to a compiler-assigned name when the original was
        // stripped from the bytecode
        let name = input
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("_{}", input.location));

        if debug {
            jasper_info!(
                "jasper::Reflector",
                " [+] Found VertexInputAttribute: layout(location = {}, binding = {}, offset = {}) in {} {};",
                input.location,
                input.binding,
                offset,
                format,
                name
            );
        }

        shader.vertex_attribute_names.push(name);
        *shader.binding_strides.entry(input.binding).or_insert(0) += size;
    }
}

/// Merge one descriptor resource into the set's binding list
///
/// The identity key is (binding, type) within one set: a match gains this
/// stage's flag, a miss appends a fresh entry with count 1.
fn merge_descriptor_binding(
    shader: &mut SpvShaderBuilder,
    resource: &DescriptorResource,
    descriptor_type: DescriptorType,
    stage: ShaderStage,
    debug: bool,
) {
    let bindings = shader.descriptor_sets.entry(resource.set).or_default();

    if let Some(existing) = bindings
        .iter_mut()
        .find(|b| b.binding == resource.binding && b.descriptor_type == descriptor_type)
    {
        existing.stage_flags |= stage.flags();

        if debug {
            jasper_info!(
                "jasper::Reflector",
                " [=] Updated DescriptorSetLayoutBinding ({}): stage={}, set={}, binding={}",
                existing.descriptor_type,
                stage,
                resource.set,
                resource.binding
            );
        }
    } else {
        bindings.push(DescriptorSetLayoutBinding {
            binding: resource.binding,
            descriptor_type,
            count: 1,
            stage_flags: stage.flags(),
        });

        if debug {
            jasper_info!(
                "jasper::Reflector",
                " [+] Found DescriptorSetLayoutBinding ({}): stage={}, set={}, binding={}",
                descriptor_type,
                stage,
                resource.set,
                resource.binding
            );
        }
    }
}

#[cfg(test)]
#[path = "reflect_tests.rs"]
mod tests;
