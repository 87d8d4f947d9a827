//! Shader stage identification and the filename-to-stage convention

use crate::error::Result;
use crate::jasper_err;
use bitflags::bitflags;
use std::fmt;
use std::path::Path;

/// Shader stage
///
/// Used as a map key (one bytecode blob per stage) and convertible to a
/// [`ShaderStageFlags`] bit for OR-combined stage masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Tessellation control shader
    TessellationControl,
    /// Tessellation evaluation shader
    TessellationEvaluation,
    /// Geometry shader
    Geometry,
    /// Fragment/Pixel shader
    Fragment,
    /// Compute shader
    Compute,
    /// Task shader
    Task,
    /// Mesh shader
    Mesh,
    /// Ray generation shader
    RayGen,
    /// Any-hit shader
    AnyHit,
    /// Closest-hit shader
    ClosestHit,
    /// Miss shader
    Miss,
    /// Intersection shader
    Intersection,
    /// Callable shader
    Callable,
}

bitflags! {
    /// Bit-set of shader stages, used to describe which stages reference a
    /// descriptor binding or push-constant block
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX = 0x0000_0001;
        const TESSELLATION_CONTROL = 0x0000_0002;
        const TESSELLATION_EVALUATION = 0x0000_0004;
        const GEOMETRY = 0x0000_0008;
        const FRAGMENT = 0x0000_0010;
        const COMPUTE = 0x0000_0020;
        const TASK = 0x0000_0040;
        const MESH = 0x0000_0080;
        const RAY_GEN = 0x0000_0100;
        const ANY_HIT = 0x0000_0200;
        const CLOSEST_HIT = 0x0000_0400;
        const MISS = 0x0000_0800;
        const INTERSECTION = 0x0000_1000;
        const CALLABLE = 0x0000_2000;
        const ALL_GRAPHICS = 0x0000_001F;
    }
}

/// Filename-extension convention: `name.<ext>[.glsl]` maps to a stage
const STAGE_EXTENSIONS: [(&str, ShaderStage); 14] = [
    (".vert", ShaderStage::Vertex),
    (".tesc", ShaderStage::TessellationControl),
    (".tese", ShaderStage::TessellationEvaluation),
    (".geom", ShaderStage::Geometry),
    (".frag", ShaderStage::Fragment),
    (".comp", ShaderStage::Compute),
    (".task", ShaderStage::Task),
    (".mesh", ShaderStage::Mesh),
    (".rgen", ShaderStage::RayGen),
    (".rahit", ShaderStage::AnyHit),
    (".rchit", ShaderStage::ClosestHit),
    (".rmiss", ShaderStage::Miss),
    (".rint", ShaderStage::Intersection),
    (".rcall", ShaderStage::Callable),
];

impl ShaderStage {
    /// Bit-flag representation of this stage
    pub fn flags(self) -> ShaderStageFlags {
        match self {
            ShaderStage::Vertex => ShaderStageFlags::VERTEX,
            ShaderStage::TessellationControl => ShaderStageFlags::TESSELLATION_CONTROL,
            ShaderStage::TessellationEvaluation => ShaderStageFlags::TESSELLATION_EVALUATION,
            ShaderStage::Geometry => ShaderStageFlags::GEOMETRY,
            ShaderStage::Fragment => ShaderStageFlags::FRAGMENT,
            ShaderStage::Compute => ShaderStageFlags::COMPUTE,
            ShaderStage::Task => ShaderStageFlags::TASK,
            ShaderStage::Mesh => ShaderStageFlags::MESH,
            ShaderStage::RayGen => ShaderStageFlags::RAY_GEN,
            ShaderStage::AnyHit => ShaderStageFlags::ANY_HIT,
            ShaderStage::ClosestHit => ShaderStageFlags::CLOSEST_HIT,
            ShaderStage::Miss => ShaderStageFlags::MISS,
            ShaderStage::Intersection => ShaderStageFlags::INTERSECTION,
            ShaderStage::Callable => ShaderStageFlags::CALLABLE,
        }
    }

    /// Derive the stage from a shader source file name
    ///
    /// The match is case-insensitive and a trailing `.glsl` is stripped
    /// first, so `Triangle.VERT.glsl` and `triangle.vert` both map to
    /// [`ShaderStage::Vertex`].
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the file name does not end in one of the
    /// recognized stage extensions.
    pub fn from_path(path: &Path) -> Result<ShaderStage> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let stem = file_name.strip_suffix(".glsl").unwrap_or(&file_name);

        for (extension, stage) in STAGE_EXTENSIONS {
            if stem.ends_with(extension) {
                return Ok(stage);
            }
        }

        Err(jasper_err!(
            Config,
            "jasper::ShaderStage",
            "Invalid shader file extension: {}",
            file_name
        ))
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "Vertex",
            ShaderStage::TessellationControl => "Tessellation Control",
            ShaderStage::TessellationEvaluation => "Tessellation Evaluation",
            ShaderStage::Geometry => "Geometry",
            ShaderStage::Fragment => "Fragment",
            ShaderStage::Compute => "Compute",
            ShaderStage::Task => "Task",
            ShaderStage::Mesh => "Mesh",
            ShaderStage::RayGen => "Ray Generation",
            ShaderStage::AnyHit => "Any Hit",
            ShaderStage::ClosestHit => "Closest Hit",
            ShaderStage::Miss => "Miss",
            ShaderStage::Intersection => "Intersection",
            ShaderStage::Callable => "Callable",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
