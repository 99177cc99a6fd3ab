use crate::{default_patches, PatchContext, PatchError, Result};
use std::fmt;

/// A named change to the data file.
///
/// Patches are not idempotent: applying one twice applies its changes twice.
#[derive(Clone, Copy)]
pub struct DatPatch {
    /// Short name, used in logs and errors.
    pub name: &'static str,
    /// What the patch fixes.
    pub description: &'static str,
    /// Apply the patch.
    pub apply: fn(&mut PatchContext) -> Result<()>,
}

impl fmt::Debug for DatPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatPatch")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Where a pipeline is in its single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Not started yet.
    NotRun,
    /// Started, and not finished. A pipeline stays in this state if a patch fails.
    Running,
    /// All patches were applied.
    Done,
}

/// Applies patches in order, once.
#[derive(Debug, Clone)]
pub struct Pipeline {
    patches: Vec<DatPatch>,
    state: PipelineState,
}

impl Default for Pipeline {
    /// A pipeline with all the WololoKingdoms data fixes.
    fn default() -> Self {
        Self::new(default_patches())
    }
}

impl Pipeline {
    /// Create a pipeline that applies `patches` in order.
    pub fn new(patches: Vec<DatPatch>) -> Self {
        Self {
            patches,
            state: PipelineState::NotRun,
        }
    }

    /// Add a patch to the end of the pipeline.
    pub fn push(&mut self, patch: DatPatch) {
        self.patches.push(patch);
    }

    /// The patches this pipeline applies.
    pub fn patches(&self) -> &[DatPatch] {
        &self.patches
    }

    /// Where the pipeline is.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Apply all patches.
    ///
    /// If a patch fails, the remaining ones are not applied and the error names the failing
    /// patch. The data file is then partially patched and should be discarded.
    pub fn run(&mut self, ctx: &mut PatchContext) -> Result<()> {
        if self.state != PipelineState::NotRun {
            return Err(PatchError::AlreadyRun);
        }
        self.state = PipelineState::Running;
        for patch in &self.patches {
            log::info!("applying {}: {}", patch.name, patch.description);
            (patch.apply)(ctx).map_err(|source| PatchError::Patch {
                name: patch.name,
                source: Box::new(source),
            })?;
        }
        self.state = PipelineState::Done;
        log::info!("applied {} patches", self.patches.len());
        Ok(())
    }
}
