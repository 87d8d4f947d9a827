//! On-disk shader cache: content-hash index and raw SPIR-V artifacts
//!
//! The index is a line-oriented text file (`name: hash`) living next to the
//! bytecode files it describes. An entry is only valid while its `.spv`
//! file exists; stale entries are dropped on load so a half-deleted cache
//! self-heals into recompilation.

use crate::error::Result;
use crate::{jasper_bail, jasper_info, jasper_warn};
use rustc_hash::{FxHashMap, FxHasher};
use std::fs;
use std::hash::Hasher;
use std::path::{Path, PathBuf};

/// Content hash of a shader source text
///
/// FxHasher is seed-free, so the hash is stable across processes; the
/// persisted index depends on that.
pub fn hash_source(source: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(source.as_bytes());
    hasher.finish()
}

/// Mapping from source-file name to content hash, persisted as flat text
#[derive(Debug, Clone, Default)]
pub struct CacheIndex {
    entries: FxHashMap<String, u64>,
}

impl CacheIndex {
    /// Load the index from disk
    ///
    /// A missing file is an empty cache, not an error. Lines that do not
    /// parse are skipped; entries whose `.spv` file no longer exists next
    /// to the index are dropped with a warning.
    pub fn load(cache_file: &Path, debug: bool) -> CacheIndex {
        let mut index = CacheIndex::default();

        let Ok(text) = fs::read_to_string(cache_file) else {
            return index;
        };
        let Some(cache_directory) = cache_file.parent() else {
            return index;
        };

        for line in text.lines() {
            let Some((name, hash_text)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim();
            let Ok(hash) = hash_text.trim().parse::<u64>() else {
                continue;
            };

            // Check that the cached file actually exists before trusting
            // the entry
            let spv_file = cache_directory.join(format!("{}.spv", name));
            if !spv_file.exists() {
                if debug {
                    jasper_warn!(
                        "jasper::CacheIndex",
                        "Cached SPIR-V file '{}' missing, but '{}' is a cache entry",
                        spv_file.display(),
                        name
                    );
                }
                continue;
            }

            index.entries.insert(name.to_string(), hash);
        }

        if debug {
            jasper_info!(
                "jasper::CacheIndex",
                "Loaded {} shader files from cache",
                index.entries.len()
            );
        }

        index
    }

    /// Persist every entry as `name: hash` lines
    ///
    /// Writes to a `.tmp` sibling first and atomically renames it over the
    /// destination, so a concurrent reader never observes a truncated file.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if the temporary file cannot be written or the
    /// rename fails.
    pub fn save(&self, cache_file: &Path) -> Result<()> {
        let mut temp_file = cache_file.as_os_str().to_owned();
        temp_file.push(".tmp");
        let temp_file = PathBuf::from(temp_file);

        // Sorted for a reproducible file
        let mut names: Vec<&String> = self.entries.keys().collect();
        names.sort();

        let mut contents = String::new();
        for name in names {
            contents.push_str(&format!("{}: {}\n", name, self.entries[name]));
        }

        if let Err(e) = fs::write(&temp_file, contents) {
            jasper_bail!(
                Io,
                "jasper::CacheIndex",
                "Failed to write temporary cache index '{}': {}",
                temp_file.display(),
                e
            );
        }

        if let Err(e) = fs::rename(&temp_file, cache_file) {
            jasper_bail!(
                Io,
                "jasper::CacheIndex",
                "Failed to replace cache index '{}': {}",
                cache_file.display(),
                e
            );
        }

        Ok(())
    }

    /// Whether the stored hash for `name` equals `hash`
    pub fn matches(&self, name: &str, hash: u64) -> bool {
        self.entries.get(name) == Some(&hash)
    }

    /// Stored hash for `name`
    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries.get(name).copied()
    }

    /// Insert or overwrite the entry for `name`
    pub fn insert(&mut self, name: impl Into<String>, hash: u64) {
        self.entries.insert(name.into(), hash);
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Write SPIR-V words as a raw binary file (no header, no length prefix)
///
/// # Errors
///
/// Returns an `Io` error if the file cannot be written.
pub fn write_spv(path: &Path, spv: &[u32]) -> Result<()> {
    let bytes: &[u8] = bytemuck::cast_slice(spv);
    if let Err(e) = fs::write(path, bytes) {
        jasper_bail!(
            Io,
            "jasper::CacheIndex",
            "Failed to write SPIR-V file '{}': {}",
            path.display(),
            e
        );
    }
    Ok(())
}

/// Read a raw SPIR-V binary file back into words
///
/// # Errors
///
/// Returns an `Io` error if the file cannot be read, and a `Cache` error if
/// its size is not a multiple of the 4-byte word width (the cache is
/// considered corrupt, not recoverable).
pub fn read_spv(path: &Path) -> Result<Vec<u32>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => jasper_bail!(
            Io,
            "jasper::CacheIndex",
            "Failed to read SPIR-V file '{}': {}",
            path.display(),
            e
        ),
    };

    if bytes.len() % 4 != 0 {
        jasper_bail!(
            Cache,
            "jasper::CacheIndex",
            "SPIR-V file '{}' size {} is not a multiple of 4 bytes",
            path.display(),
            bytes.len()
        );
    }

    Ok(bytemuck::pod_collect_to_vec(&bytes))
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
