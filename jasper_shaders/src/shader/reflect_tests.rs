//! Unit tests for reflect.rs
//!
//! Tests vertex attribute offset accumulation, push-constant merging, and
//! descriptor binding merging across stages.

use super::*;
use crate::shader::backend::{DescriptorResource, ModuleResources, PushConstantBlock, StageInput};
use crate::shader::spv_shader::SpvShaderBuilder;
use crate::shader::stage::{ShaderStage, ShaderStageFlags};
use crate::shader::types::{DescriptorType, Format, ScalarKind, VertexInputRate};

fn input(location: u32, binding: u32, components: u32, name: &str) -> StageInput {
    StageInput {
        location,
        binding,
        name: Some(name.to_string()),
        scalar: ScalarKind::Float,
        components,
    }
}

// ============================================================================
// VERTEX ATTRIBUTE TESTS
// ============================================================================

#[test]
fn test_vertex_offsets_accumulate_per_binding() {
    // vec3 at location 0 and vec2 at location 1, both binding 0:
    // offsets 0 and 12, stride 20
    let mut builder = SpvShaderBuilder::new("quad");
    let resources = ModuleResources {
        stage_inputs: vec![input(0, 0, 3, "in_position"), input(1, 0, 2, "in_uv")],
        ..Default::default()
    };

    reflect_stage(&mut builder, ShaderStage::Vertex, &resources, false);
    let shader = builder.finish();

    let attributes = shader.vertex_attributes();
    assert_eq!(attributes.len(), 2);
    assert_eq!(attributes[0].offset, 0);
    assert_eq!(attributes[0].format, Format::R32G32B32_SFLOAT);
    assert_eq!(attributes[1].offset, 12);
    assert_eq!(attributes[1].format, Format::R32G32_SFLOAT);

    let bindings = shader.vertex_bindings();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].binding, 0);
    assert_eq!(bindings[0].stride, 20);
    assert_eq!(bindings[0].input_rate, VertexInputRate::PerVertex);
}

#[test]
fn test_vertex_inputs_sorted_by_location() {
    // Inputs reported out of location order must still produce offsets as
    // if visited in location order
    let mut builder = SpvShaderBuilder::new("sorted");
    let resources = ModuleResources {
        stage_inputs: vec![
            input(2, 0, 4, "in_color"),
            input(0, 0, 3, "in_position"),
            input(1, 0, 2, "in_uv"),
        ],
        ..Default::default()
    };

    reflect_stage(&mut builder, ShaderStage::Vertex, &resources, false);
    let shader = builder.finish();

    let attributes = shader.vertex_attributes();
    assert_eq!(attributes[0].location, 0);
    assert_eq!(attributes[0].offset, 0);
    assert_eq!(attributes[1].location, 1);
    assert_eq!(attributes[1].offset, 12);
    assert_eq!(attributes[2].location, 2);
    assert_eq!(attributes[2].offset, 20);
    assert_eq!(shader.vertex_bindings()[0].stride, 36);
}

#[test]
fn test_vertex_offsets_track_bindings_independently() {
    let mut builder = SpvShaderBuilder::new("two_buffers");
    let resources = ModuleResources {
        stage_inputs: vec![
            input(0, 0, 3, "in_position"),
            input(1, 1, 4, "in_color"),
            input(2, 0, 2, "in_uv"),
        ],
        ..Default::default()
    };

    reflect_stage(&mut builder, ShaderStage::Vertex, &resources, false);
    let shader = builder.finish();

    let attributes = shader.vertex_attributes();
    assert_eq!(attributes[0].offset, 0); // binding 0
    assert_eq!(attributes[1].offset, 0); // binding 1 starts fresh
    assert_eq!(attributes[2].offset, 12); // binding 0 resumes after vec3

    let bindings = shader.vertex_bindings();
    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings[0].binding, 0);
    assert_eq!(bindings[0].stride, 20);
    assert_eq!(bindings[1].binding, 1);
    assert_eq!(bindings[1].stride, 16);
}

#[test]
fn test_vertex_attribute_name_fallback() {
    let mut builder = SpvShaderBuilder::new("stripped");
    let resources = ModuleResources {
        stage_inputs: vec![StageInput {
            location: 3,
            binding: 0,
            name: None,
            scalar: ScalarKind::Float,
            components: 2,
        }],
        ..Default::default()
    };

    reflect_stage(&mut builder, ShaderStage::Vertex, &resources, false);
    let shader = builder.finish();

    assert_eq!(shader.vertex_attribute_names(), &["_3".to_string()]);
}

#[test]
fn test_non_vertex_stage_ignores_stage_inputs() {
    let mut builder = SpvShaderBuilder::new("frag_only");
    let resources = ModuleResources {
        stage_inputs: vec![input(0, 0, 4, "in_frag_color")],
        ..Default::default()
    };

    reflect_stage(&mut builder, ShaderStage::Fragment, &resources, false);
    let shader = builder.finish();

    assert!(shader.vertex_attributes().is_empty());
    assert!(shader.vertex_bindings().is_empty());
}

// ============================================================================
// PUSH CONSTANT TESTS
// ============================================================================

#[test]
fn test_push_constant_accumulates_stage_flags() {
    let mut builder = SpvShaderBuilder::new("pc");

    let vertex_resources = ModuleResources {
        push_constants: vec![PushConstantBlock { size: 64, offset: 0 }],
        ..Default::default()
    };
    let fragment_resources = ModuleResources {
        push_constants: vec![PushConstantBlock { size: 64, offset: 0 }],
        ..Default::default()
    };

    reflect_stage(&mut builder, ShaderStage::Vertex, &vertex_resources, false);
    reflect_stage(&mut builder, ShaderStage::Fragment, &fragment_resources, false);
    let shader = builder.finish();

    let push_constant = shader.push_constant();
    assert_eq!(
        push_constant.stage_flags,
        ShaderStageFlags::VERTEX | ShaderStageFlags::FRAGMENT
    );
    assert_eq!(push_constant.size, 64);
    assert_eq!(push_constant.offset, 0);
}

#[test]
fn test_push_constant_last_block_wins() {
    // Documented limitation: a stage declaring several blocks keeps only
    // the last one visited
    let mut builder = SpvShaderBuilder::new("pc_multi");
    let resources = ModuleResources {
        push_constants: vec![
            PushConstantBlock { size: 16, offset: 0 },
            PushConstantBlock { size: 128, offset: 0 },
        ],
        ..Default::default()
    };

    reflect_stage(&mut builder, ShaderStage::Vertex, &resources, false);
    let shader = builder.finish();

    assert_eq!(shader.push_constant().size, 128);
}

#[test]
fn test_no_push_constant_leaves_range_empty() {
    let mut builder = SpvShaderBuilder::new("no_pc");
    reflect_stage(&mut builder, ShaderStage::Vertex, &ModuleResources::default(), false);
    let shader = builder.finish();

    assert_eq!(shader.push_constant().stage_flags, ShaderStageFlags::empty());
    assert_eq!(shader.push_constant().size, 0);
}

// ============================================================================
// DESCRIPTOR MERGE TESTS
// ============================================================================

#[test]
fn test_descriptor_shared_across_stages_merges_flags() {
    // Uniform buffer at set 0, binding 0 in both vertex and fragment:
    // exactly one entry, stage flags OR-combined
    let mut builder = SpvShaderBuilder::new("shared_ubo");
    let resources = ModuleResources {
        uniform_buffers: vec![DescriptorResource { set: 0, binding: 0 }],
        ..Default::default()
    };

    reflect_stage(&mut builder, ShaderStage::Vertex, &resources, false);
    reflect_stage(&mut builder, ShaderStage::Fragment, &resources, false);
    let shader = builder.finish();

    let bindings = &shader.descriptor_sets()[&0];
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].binding, 0);
    assert_eq!(bindings[0].descriptor_type, DescriptorType::UniformBuffer);
    assert_eq!(bindings[0].count, 1);
    assert_eq!(
        bindings[0].stage_flags,
        ShaderStageFlags::VERTEX | ShaderStageFlags::FRAGMENT
    );
}

#[test]
fn test_descriptor_same_binding_different_type_not_merged() {
    // (binding, type) is the identity key: same binding index with a
    // different type is a distinct entry
    let mut builder = SpvShaderBuilder::new("mixed");
    let vertex_resources = ModuleResources {
        uniform_buffers: vec![DescriptorResource { set: 0, binding: 1 }],
        ..Default::default()
    };
    let fragment_resources = ModuleResources {
        sampled_images: vec![DescriptorResource { set: 0, binding: 1 }],
        ..Default::default()
    };

    reflect_stage(&mut builder, ShaderStage::Vertex, &vertex_resources, false);
    reflect_stage(&mut builder, ShaderStage::Fragment, &fragment_resources, false);
    let shader = builder.finish();

    let bindings = &shader.descriptor_sets()[&0];
    assert_eq!(bindings.len(), 2);
}

#[test]
fn test_descriptor_sets_kept_separate() {
    let mut builder = SpvShaderBuilder::new("two_sets");
    let resources = ModuleResources {
        uniform_buffers: vec![DescriptorResource { set: 0, binding: 0 }],
        storage_buffers: vec![DescriptorResource { set: 1, binding: 0 }],
        ..Default::default()
    };

    reflect_stage(&mut builder, ShaderStage::Compute, &resources, false);
    let shader = builder.finish();

    assert_eq!(shader.descriptor_sets().len(), 2);
    assert_eq!(
        shader.descriptor_sets()[&0][0].descriptor_type,
        DescriptorType::UniformBuffer
    );
    assert_eq!(
        shader.descriptor_sets()[&1][0].descriptor_type,
        DescriptorType::StorageBuffer
    );
}

#[test]
fn test_all_three_categories_merge() {
    let mut builder = SpvShaderBuilder::new("kitchen_sink");
    let resources = ModuleResources {
        uniform_buffers: vec![DescriptorResource { set: 0, binding: 0 }],
        sampled_images: vec![
            DescriptorResource { set: 0, binding: 1 },
            DescriptorResource { set: 0, binding: 2 },
        ],
        storage_buffers: vec![DescriptorResource { set: 0, binding: 3 }],
        ..Default::default()
    };

    reflect_stage(&mut builder, ShaderStage::Fragment, &resources, false);
    let shader = builder.finish();

    let bindings = &shader.descriptor_sets()[&0];
    assert_eq!(bindings.len(), 4);
    for binding in bindings {
        assert_eq!(binding.stage_flags, ShaderStageFlags::FRAGMENT);
        assert_eq!(binding.count, 1);
    }
}

#[test]
fn test_identical_resources_reflect_identically() {
    // Two builders fed the same resource lists must end up with identical
    // reflection output
    let resources = ModuleResources {
        stage_inputs: vec![input(0, 0, 3, "in_position"), input(1, 0, 2, "in_uv")],
        uniform_buffers: vec![DescriptorResource { set: 0, binding: 0 }],
        sampled_images: vec![DescriptorResource { set: 0, binding: 1 }],
        push_constants: vec![PushConstantBlock { size: 64, offset: 0 }],
        ..Default::default()
    };

    let mut builder_a = SpvShaderBuilder::new("twin");
    reflect_stage(&mut builder_a, ShaderStage::Vertex, &resources, false);
    let shader_a = builder_a.finish();

    let mut builder_b = SpvShaderBuilder::new("twin");
    reflect_stage(&mut builder_b, ShaderStage::Vertex, &resources, false);
    let shader_b = builder_b.finish();

    assert_eq!(shader_a.vertex_attributes(), shader_b.vertex_attributes());
    assert_eq!(shader_a.vertex_attribute_names(), shader_b.vertex_attribute_names());
    assert_eq!(shader_a.vertex_bindings(), shader_b.vertex_bindings());
    assert_eq!(shader_a.descriptor_sets(), shader_b.descriptor_sets());
    assert_eq!(shader_a.push_constant(), shader_b.push_constant());
}

#[test]
fn test_reflection_only_adds_never_replaces() {
    // A second stage must not disturb vertex data merged earlier
    let mut builder = SpvShaderBuilder::new("additive");
    let vertex_resources = ModuleResources {
        stage_inputs: vec![input(0, 0, 3, "in_position")],
        uniform_buffers: vec![DescriptorResource { set: 0, binding: 0 }],
        ..Default::default()
    };
    let fragment_resources = ModuleResources {
        sampled_images: vec![DescriptorResource { set: 0, binding: 1 }],
        ..Default::default()
    };

    reflect_stage(&mut builder, ShaderStage::Vertex, &vertex_resources, false);
    reflect_stage(&mut builder, ShaderStage::Fragment, &fragment_resources, false);
    let shader = builder.finish();

    assert_eq!(shader.vertex_attributes().len(), 1);
    assert_eq!(shader.descriptor_sets()[&0].len(), 2);
}
