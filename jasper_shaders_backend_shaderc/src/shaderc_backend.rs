//! shaderc compilation and spirq introspection

use jasper_shaders::shader::{
    CompilerFlags, DescriptorResource, ModuleResources, PushConstantBlock, ScalarKind,
    ShaderBackend, ShaderStage, StageInput, TargetEnvironment,
};
use jasper_shaders::{jasper_bail, jasper_debug, jasper_err, Result};

const LOG_SOURCE: &str = "jasper::ShadercBackend";

/// GLSL-to-SPIR-V compiler plus SPIR-V introspector
///
/// Owns a single shaderc compiler instance; per-call options are rebuilt for
/// each compilation from the supplied [`CompilerFlags`].
pub struct ShadercBackend {
    compiler: shaderc::Compiler,
}

impl ShadercBackend {
    /// Initialize the shaderc compiler
    ///
    /// # Errors
    ///
    /// Fails with a `Compile` error if the shaderc library cannot be
    /// initialized.
    pub fn new() -> Result<Self> {
        match shaderc::Compiler::new() {
            Some(compiler) => Ok(Self { compiler }),
            None => jasper_bail!(Compile, LOG_SOURCE, "Failed to initialize shaderc compiler"),
        }
    }
}

impl ShaderBackend for ShadercBackend {
    fn compile(
        &self,
        source: &str,
        file_name: &str,
        stage: ShaderStage,
        flags: &CompilerFlags,
    ) -> Result<Vec<u32>> {
        let mut options = match shaderc::CompileOptions::new() {
            Some(options) => options,
            None => jasper_bail!(
                Compile,
                LOG_SOURCE,
                "Failed to create shaderc compile options"
            ),
        };

        match flags.environment {
            TargetEnvironment::Vulkan => options.set_target_env(
                shaderc::TargetEnv::Vulkan,
                shaderc::EnvVersion::Vulkan1_2 as u32,
            ),
            TargetEnvironment::OpenGl => options.set_target_env(
                shaderc::TargetEnv::OpenGL,
                shaderc::EnvVersion::OpenGL4_5 as u32,
            ),
            other => jasper_bail!(
                Config,
                LOG_SOURCE,
                "Unsupported shader target environment: {:?}",
                other
            ),
        }

        if flags.debug {
            options.set_generate_debug_info();
        }

        let artifact = self
            .compiler
            .compile_into_spirv(
                source,
                shader_kind(stage),
                file_name,
                "main",
                Some(&options),
            )
            .map_err(|e| jasper_err!(Compile, LOG_SOURCE, "{}", e))?;

        if flags.debug {
            jasper_debug!(LOG_SOURCE, "Compiled {} ({} stage)", file_name, stage);
        }

        Ok(artifact.as_binary().to_vec())
    }

    fn introspect(&self, spv: &[u32]) -> Result<ModuleResources> {
        let entry_points = spirq::ReflectConfig::new()
            .spv(spv)
            .ref_all_rscs(true)
            .reflect()
            .map_err(|e| jasper_err!(Reflection, LOG_SOURCE, "{:?}", e))?;

        let mut resources = ModuleResources::default();

        for entry_point in &entry_points {
            for var in entry_point.vars.iter() {
                match var {
                    spirq::var::Variable::Input { name, location, ty } => {
                        // Only scalar and vector inputs participate in the
                        // vertex layout
                        if let Some((scalar, components)) = scalar_shape(ty) {
                            resources.stage_inputs.push(StageInput {
                                location: location.loc(),
                                binding: 0,
                                name: name.clone(),
                                scalar,
                                components,
                            });
                        }
                    }
                    spirq::var::Variable::Descriptor {
                        desc_bind, desc_ty, ..
                    } => {
                        let resource = DescriptorResource {
                            set: desc_bind.set(),
                            binding: desc_bind.bind(),
                        };
                        use spirq::ty::DescriptorType;
                        match desc_ty {
                            DescriptorType::UniformBuffer() => {
                                resources.uniform_buffers.push(resource);
                            }
                            DescriptorType::StorageBuffer(..) => {
                                resources.storage_buffers.push(resource);
                            }
                            DescriptorType::CombinedImageSampler()
                            | DescriptorType::SampledImage()
                            | DescriptorType::Sampler() => {
                                resources.sampled_images.push(resource);
                            }
                            _ => {}
                        }
                    }
                    spirq::var::Variable::PushConstant { ty, .. } => {
                        resources.push_constants.push(PushConstantBlock {
                            size: ty.nbyte().unwrap_or(0) as u32,
                            offset: block_offset(ty),
                        });
                    }
                    _ => {}
                }
            }
        }

        Ok(resources)
    }
}

/// Map a pipeline stage to the shaderc shader kind
fn shader_kind(stage: ShaderStage) -> shaderc::ShaderKind {
    match stage {
        ShaderStage::Vertex => shaderc::ShaderKind::Vertex,
        ShaderStage::TessellationControl => shaderc::ShaderKind::TessControl,
        ShaderStage::TessellationEvaluation => shaderc::ShaderKind::TessEvaluation,
        ShaderStage::Geometry => shaderc::ShaderKind::Geometry,
        ShaderStage::Fragment => shaderc::ShaderKind::Fragment,
        ShaderStage::Compute => shaderc::ShaderKind::Compute,
        ShaderStage::Task => shaderc::ShaderKind::Task,
        ShaderStage::Mesh => shaderc::ShaderKind::Mesh,
        ShaderStage::RayGen => shaderc::ShaderKind::RayGeneration,
        ShaderStage::AnyHit => shaderc::ShaderKind::AnyHit,
        ShaderStage::ClosestHit => shaderc::ShaderKind::ClosestHit,
        ShaderStage::Miss => shaderc::ShaderKind::Miss,
        ShaderStage::Intersection => shaderc::ShaderKind::Intersection,
        ShaderStage::Callable => shaderc::ShaderKind::Callable,
    }
}

/// Scalar kind and component count of a scalar or vector type
///
/// Matrices, structs, and opaque types have no vertex attribute format and
/// yield None.
fn scalar_shape(ty: &spirq::ty::Type) -> Option<(ScalarKind, u32)> {
    use spirq::ty::Type;
    match ty {
        Type::Scalar(scalar) => Some((scalar_kind(scalar)?, 1)),
        Type::Vector(vector) => Some((scalar_kind(&vector.scalar_ty)?, vector.nscalar)),
        _ => None,
    }
}

fn scalar_kind(scalar: &spirq::ty::ScalarType) -> Option<ScalarKind> {
    use spirq::ty::ScalarType;
    match scalar {
        ScalarType::Float { .. } => Some(ScalarKind::Float),
        ScalarType::Integer {
            is_signed: true, ..
        } => Some(ScalarKind::Int),
        ScalarType::Integer {
            is_signed: false, ..
        } => Some(ScalarKind::UInt),
        _ => None,
    }
}

/// Byte offset of a push-constant block: the lowest member offset of the
/// declared struct, 0 for anything else
fn block_offset(ty: &spirq::ty::Type) -> u32 {
    if let spirq::ty::Type::Struct(st) = ty {
        st.members
            .iter()
            .filter_map(|m| m.offset)
            .min()
            .unwrap_or(0) as u32
    } else {
        0
    }
}
