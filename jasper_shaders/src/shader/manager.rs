//! Central shader manager: discovery, cache decisions, compilation,
//! reflection
//!
//! The manager runs once, single-threaded, during application startup; the
//! resulting collection is immutable and only queried by name afterwards.

use crate::error::Result;
use crate::shader::backend::{CompilerFlags, ShaderBackend, TargetEnvironment};
use crate::shader::cache::{self, CacheIndex};
use crate::shader::reflect;
use crate::shader::spv_shader::{SpvShader, SpvShaderBuilder};
use crate::shader::stage::ShaderStage;
use crate::{jasper_bail, jasper_debug};
use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Cache index file name inside the cache directory
const CACHE_INDEX_FILE: &str = "jasper_shaders.cache";

/// Source extension accepted by discovery
const SOURCE_EXTENSION: &str = "glsl";

/// Shader manager construction settings
#[derive(Debug, Clone)]
pub struct ShaderManagerSettings {
    /// Emit per-file debug log lines
    pub debug: bool,
    /// Compilation target environment
    pub environment: TargetEnvironment,
    /// Root asset directory
    pub asset_directory: PathBuf,
    /// Shader directory name inside the asset directory
    pub shader_directory_name: String,
    /// Cache directory name inside the shader directory
    pub cache_directory_name: String,
}

impl Default for ShaderManagerSettings {
    fn default() -> Self {
        Self {
            debug: true,
            environment: TargetEnvironment::Vulkan,
            asset_directory: PathBuf::from("assets"),
            shader_directory_name: "shaders".to_string(),
            cache_directory_name: "cache".to_string(),
        }
    }
}

/// Owns the named collection of compiled, reflected shaders
///
/// Construction discovers `<asset_directory>/<shader_directory_name>/*.glsl`
/// (non-recursive), compiles what the cache cannot supply, reflects every
/// stage, and persists the updated cache index. Lookup afterwards is a
/// read-only [`ShaderManager::get`] by name.
pub struct ShaderManager {
    shaders: FxHashMap<String, SpvShader>,
}

impl ShaderManager {
    /// Build the full shader collection
    ///
    /// For each source file: derive name and stage from the file name, hash
    /// the source, reuse cached bytecode when the hash matches, compile and
    /// cache otherwise, and always reflect the stage's bytecode into the
    /// named shader's record (reflection output is never cached, even on a
    /// bytecode cache hit).
    ///
    /// # Errors
    ///
    /// Fails on an unusable cache directory, an unrecognized stage
    /// extension, an unreadable source file, a compiler diagnostic, or a
    /// corrupt cache artifact. Every failure is fatal; there is no partial
    /// shader collection.
    pub fn new(settings: ShaderManagerSettings, backend: &dyn ShaderBackend) -> Result<Self> {
        let shader_directory = settings
            .asset_directory
            .join(&settings.shader_directory_name);
        let cache_directory = shader_directory.join(&settings.cache_directory_name);

        if let Err(e) = fs::create_dir_all(&cache_directory) {
            jasper_bail!(
                Io,
                "jasper::ShaderManager",
                "Failed to create shader cache directory '{}': {}",
                cache_directory.display(),
                e
            );
        }

        let cache_file = cache_directory.join(CACHE_INDEX_FILE);
        let mut cache = CacheIndex::load(&cache_file, settings.debug);

        let flags = CompilerFlags {
            debug: settings.debug,
            environment: settings.environment,
        };

        // Get all the .glsl files from the shader directory (non-recursive)
        let mut source_files: Vec<PathBuf> = Vec::new();
        match fs::read_dir(&shader_directory) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.is_file()
                        && path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
                    {
                        source_files.push(path);
                    }
                }
            }
            Err(e) => jasper_bail!(
                Io,
                "jasper::ShaderManager",
                "Failed to enumerate shader directory '{}': {}",
                shader_directory.display(),
                e
            ),
        }
        source_files.sort();

        // Compile each shader stage or retrieve the cached bytecode
        let mut builders: FxHashMap<String, SpvShaderBuilder> = FxHashMap::default();
        for source_file in &source_files {
            let file_name = source_file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let shader_name = shader_name_from_path(source_file);
            let stage = ShaderStage::from_path(source_file)?;

            let source = match fs::read_to_string(source_file) {
                Ok(source) => source,
                Err(e) => jasper_bail!(
                    Io,
                    "jasper::ShaderManager",
                    "Could not read shader source '{}': {}",
                    source_file.display(),
                    e
                ),
            };
            let hash = cache::hash_source(&source);

            let builder = builders
                .entry(shader_name.clone())
                .or_insert_with(|| SpvShaderBuilder::new(shader_name.clone()));

            let spv_file = cache_directory.join(format!("{}.spv", file_name));
            let words = if cache.matches(&file_name, hash) {
                let words = cache::read_spv(&spv_file)?;
                if settings.debug {
                    jasper_debug!("jasper::ShaderManager", "{} read from cache", file_name);
                }
                words
            } else {
                let words = backend.compile(&source, &file_name, stage, &flags)?;
                cache::write_spv(&spv_file, &words)?;
                cache.insert(file_name.clone(), hash);
                if settings.debug {
                    jasper_debug!("jasper::ShaderManager", "{} written to cache", file_name);
                }
                words
            };

            // Always reflect, even on a cache hit; reflection output is not
            // cached
            let resources = backend.introspect(&words)?;
            reflect::reflect_stage(builder, stage, &resources, settings.debug);
            builder.set_bytecode(stage, words);
        }

        let shaders = builders
            .into_iter()
            .map(|(name, builder)| (name, builder.finish()))
            .collect();

        cache.save(&cache_file)?;

        Ok(Self { shaders })
    }

    /// Get a shader by name
    ///
    /// All shader names are known at build time from the asset directory
    /// contents, so an unknown name is a programming error.
    ///
    /// # Panics
    ///
    /// Panics if no shader with that name was discovered.
    pub fn get(&self, name: &str) -> &SpvShader {
        match self.shaders.get(name) {
            Some(shader) => shader,
            None => panic!("jasper::ShaderManager - unknown shader '{}'", name),
        }
    }

    /// Number of named shaders
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    /// All shader names
    pub fn shader_names(&self) -> Vec<&str> {
        self.shaders.keys().map(|k| k.as_str()).collect()
    }
}

/// Derive the logical shader name from a source file path
///
/// Strips the `.glsl` source extension, then the stage extension, so
/// `triangle.vert.glsl` and `triangle.frag.glsl` share the name `triangle`.
fn shader_name_from_path(path: &Path) -> String {
    let mut name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Some(stripped) = name.strip_suffix(".glsl") {
        name.truncate(stripped.len());
    }
    if let Some(dot) = name.rfind('.') {
        name.truncate(dot);
    }

    name
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
