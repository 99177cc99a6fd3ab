//! Patches that adapt HD Edition game data for WololoKingdoms.
//!
//! A [`Pipeline`] applies a list of named [`DatPatch`]es to a [`PatchContext`], in order, once.
//! Patches are built from a few kinds of edits:
//!
//! - [`swap_units`] exchanges two unit types and rewrites every reference to them.
//! - [`GraphicDuplicator`] copies graphics for a civilization or civilization group, and records
//!   the SLP files the copies need.
//! - [`edit_units`] and friends change fields on known records.
//! - [`append_commands`] copies the commands of one effect into another.
//!
//! After patching, [`validate_references`] checks that every reference in the data file still
//! points at a record that exists.
//!
//! ```rust
//! use wololo_dat::DatFile;
//! use wololo_patch::{DatPatch, PatchContext, Pipeline};
//! # fn main() -> Result<(), wololo_patch::PatchError> {
//! let patch = DatPatch {
//!     name: "rename",
//!     description: "Rename all effects",
//!     apply: |ctx| {
//!         for effect in &mut ctx.dat.effects {
//!             effect.name.make_ascii_uppercase();
//!         }
//!         Ok(())
//!     },
//! };
//!
//! let mut ctx = PatchContext::new(DatFile::default());
//! let mut pipeline = Pipeline::new(vec![patch]);
//! pipeline.run(&mut ctx)?;
//! assert!(pipeline.run(&mut ctx).is_err());
//! # Ok(())
//! # }
//! ```

#![deny(future_incompatible)]
#![deny(nonstandard_style)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused)]

mod architecture;
mod context;
mod duplicate;
mod edit;
mod fixes;
mod flags;
mod pipeline;
mod swap;
mod validate;

pub use architecture::{
    patch_architectures, separate_civ_architectures, separate_group_graphics,
    separate_mediterranean_flags, ArchitectureSet, ARCHITECTURES,
};
pub use context::PatchContext;
pub use duplicate::{uses_civ_art, ArtScheme, GraphicDuplicator};
pub use edit::{append_commands, copy_tech, edit_units, push_retargeted};
pub use fixes::{
    default_patches, AI900_UNIT_IDS, BERBERS_UT, CUTTING, DEMOSHIP, DISABLE_NONWORKING_UNITS,
    ETHIOPIANS_FREE_PIKE,
};
pub use flags::{adjust_flags, parse_flag_offsets, FlagOffset};
pub use pipeline::{DatPatch, Pipeline, PipelineState};
pub use swap::swap_units;
pub use validate::validate_references;

use std::fmt;
use std::path::PathBuf;
use wololo_dat::{EffectID, GraphicID};

/// The kind of record a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A civilization.
    Civilization,
    /// A unit type.
    Unit,
    /// A unit type's task list.
    Task,
    /// A tech effect.
    Effect,
    /// A tech.
    Tech,
    /// A graphic.
    Graphic,
    /// A graphic delta, by index.
    GraphicDelta,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::Civilization => "civilization",
            RecordKind::Unit => "unit",
            RecordKind::Task => "task",
            RecordKind::Effect => "effect",
            RecordKind::Tech => "tech",
            RecordKind::Graphic => "graphic",
            RecordKind::GraphicDelta => "graphic delta",
        })
    }
}

/// Errors that may occur while patching a data file.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// A record refers to a record that does not exist.
    #[error("{kind} {id} does not exist")]
    InconsistentReference {
        /// What kind of record is missing.
        kind: RecordKind,
        /// The ID of the missing record.
        id: i64,
    },
    /// An effect has fewer commands than a patch expects.
    #[error("effect {effect} has no command #{index}")]
    MissingCommand {
        /// The effect.
        effect: EffectID,
        /// Index of the command.
        index: usize,
    },
    /// The SLP file for a graphic that needs to be duplicated does not exist.
    #[error("missing asset: {}", .path.display())]
    MissingAsset {
        /// Where the file was expected.
        path: PathBuf,
    },
    /// A graphic's SLP ID does not fit in the range reserved for the copies.
    #[error("graphic {graphic} uses SLP {slp}, which has no room for per-group copies")]
    SlpOutOfRange {
        /// The graphic.
        graphic: GraphicID,
        /// Its SLP ID.
        slp: i32,
    },
    /// A line in a flag offset table could not be parsed.
    #[error("invalid flag offset on line {line}: {text:?}")]
    InvalidFlagOffset {
        /// Line number, starting at 1.
        line: usize,
        /// The line.
        text: String,
    },
    /// The pipeline was started a second time.
    #[error("the patch pipeline has already run")]
    AlreadyRun,
    /// A patch failed. The data file is left partially patched.
    #[error("patch `{name}` failed")]
    Patch {
        /// Name of the patch.
        name: &'static str,
        /// Why it failed.
        #[source]
        source: Box<PatchError>,
    },
    /// Reading an input file failed.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// The data file could not be modified.
    #[error(transparent)]
    DatError(#[from] wololo_dat::Error),
}

impl PatchError {
    /// A reference to a record that does not exist.
    pub fn missing(kind: RecordKind, id: impl Into<i64>) -> Self {
        PatchError::InconsistentReference {
            kind,
            id: id.into(),
        }
    }
}

/// Result type for patch operations.
pub type Result<T> = std::result::Result<T, PatchError>;
