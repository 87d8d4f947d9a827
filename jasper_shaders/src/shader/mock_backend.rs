//! Mock shader backend for unit tests (no compiler or GPU required)
//!
//! Compilation produces deterministic fake bytecode that embeds the stage's
//! flag bits, so introspection of cached bytecode can hand back the canned
//! per-stage resource lists the test configured.

use crate::error::Result;
use crate::shader::backend::{CompilerFlags, ModuleResources, ShaderBackend};
use crate::shader::stage::ShaderStage;
use rustc_hash::FxHashMap;
use std::cell::Cell;

/// SPIR-V magic number, first word of every mock module
pub const MOCK_MAGIC: u32 = 0x0723_0203;

/// Configurable fake compiler + introspector
pub struct MockBackend {
    resources: FxHashMap<u32, ModuleResources>,
    compile_count: Cell<u32>,
    introspect_count: Cell<u32>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            resources: FxHashMap::default(),
            compile_count: Cell::new(0),
            introspect_count: Cell::new(0),
        }
    }

    /// Canned introspection result for one stage
    pub fn with_resources(mut self, stage: ShaderStage, resources: ModuleResources) -> Self {
        self.resources.insert(stage.flags().bits(), resources);
        self
    }

    /// How many times `compile` ran
    pub fn compile_count(&self) -> u32 {
        self.compile_count.get()
    }

    /// How many times `introspect` ran
    pub fn introspect_count(&self) -> u32 {
        self.introspect_count.get()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderBackend for MockBackend {
    fn compile(
        &self,
        source: &str,
        _file_name: &str,
        stage: ShaderStage,
        _flags: &CompilerFlags,
    ) -> Result<Vec<u32>> {
        self.compile_count.set(self.compile_count.get() + 1);

        // Word 0: magic, word 1: stage bits, then the source bytes so that
        // different sources produce different bytecode
        let mut words = vec![MOCK_MAGIC, stage.flags().bits()];
        words.extend(source.bytes().map(u32::from));
        Ok(words)
    }

    fn introspect(&self, spv: &[u32]) -> Result<ModuleResources> {
        self.introspect_count.set(self.introspect_count.get() + 1);

        let stage_bits = spv.get(1).copied().unwrap_or(0);
        Ok(self
            .resources
            .get(&stage_bits)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend_has_no_recorded_calls() {
        let backend = MockBackend::default();
        assert_eq!(backend.compile_count(), 0);
        assert_eq!(backend.introspect_count(), 0);
    }
}
