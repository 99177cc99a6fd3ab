use crate::{FlagOffset, PatchError, RecordKind, Result};
use std::path::PathBuf;
use wololo_dat::{
    CivilizationID, DatFile, Effect, EffectID, Graphic, GraphicID, Tech, TechID, Unit, UnitTypeID,
};
use wololo_drs::ResourceIndex;

/// Everything a patch may change: the data file, and the SLP files that must be added to the
/// graphics archive for it.
#[derive(Debug, Default)]
pub struct PatchContext {
    /// The data file being patched.
    pub dat: DatFile,
    /// New SLP files, by their ID in the output archive.
    pub slp_overrides: ResourceIndex,
    /// Flag positions applied before architectures are separated, to graphics that may still be
    /// shared between civilizations.
    pub shared_flags: Vec<FlagOffset>,
    /// Flag positions applied after architectures are separated, to each civilization's own
    /// flag graphics.
    pub civ_flags: Vec<FlagOffset>,
    graphics_dirs: Vec<PathBuf>,
}

impl PatchContext {
    /// Create a context for patching a data file.
    pub fn new(dat: DatFile) -> Self {
        Self {
            dat,
            ..Default::default()
        }
    }

    /// Add a directory to search for the SLP files of graphics that get duplicated.
    ///
    /// Directories are searched in the order they were added.
    pub fn with_graphics_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.graphics_dirs.push(dir.into());
        self
    }

    /// Set the flag positions to apply before and after separating architectures.
    pub fn with_flags(mut self, shared: Vec<FlagOffset>, civ: Vec<FlagOffset>) -> Self {
        self.shared_flags = shared;
        self.civ_flags = civ;
        self
    }

    /// The directories searched for SLP files.
    pub fn graphics_dirs(&self) -> &[PathBuf] {
        &self.graphics_dirs
    }

    /// Find the file for an SLP ID in the graphics directories.
    pub fn find_slp(&self, slp_id: i32) -> Result<PathBuf> {
        let name = format!("{}.slp", slp_id);
        self.graphics_dirs
            .iter()
            .map(|dir| dir.join(&name))
            .find(|path| path.is_file())
            .ok_or_else(|| PatchError::MissingAsset {
                path: self
                    .graphics_dirs
                    .first()
                    .map_or_else(|| PathBuf::from(&name), |dir| dir.join(&name)),
            })
    }

    /// Take the data file and the SLP overrides out of the context.
    pub fn into_parts(self) -> (DatFile, ResourceIndex) {
        (self.dat, self.slp_overrides)
    }

    /// Get a civilization's version of a unit type.
    pub fn unit(&self, civ: CivilizationID, id: UnitTypeID) -> Result<&Unit> {
        self.dat
            .unit(civ, id)
            .ok_or_else(|| PatchError::missing(RecordKind::Unit, u16::from(id)))
    }

    /// Get a mutable reference to a civilization's version of a unit type.
    pub fn unit_mut(&mut self, civ: CivilizationID, id: UnitTypeID) -> Result<&mut Unit> {
        self.dat
            .unit_mut(civ, id)
            .ok_or_else(|| PatchError::missing(RecordKind::Unit, u16::from(id)))
    }

    /// Get an effect.
    pub fn effect(&self, id: EffectID) -> Result<&Effect> {
        self.dat
            .effect(id)
            .ok_or_else(|| PatchError::missing(RecordKind::Effect, u16::from(id)))
    }

    /// Get a mutable reference to an effect.
    pub fn effect_mut(&mut self, id: EffectID) -> Result<&mut Effect> {
        self.dat
            .effect_mut(id)
            .ok_or_else(|| PatchError::missing(RecordKind::Effect, u16::from(id)))
    }

    /// Get a tech.
    pub fn tech(&self, id: TechID) -> Result<&Tech> {
        self.dat
            .tech(id)
            .ok_or_else(|| PatchError::missing(RecordKind::Tech, u16::from(id)))
    }

    /// Get a mutable reference to a tech.
    pub fn tech_mut(&mut self, id: TechID) -> Result<&mut Tech> {
        self.dat
            .tech_mut(id)
            .ok_or_else(|| PatchError::missing(RecordKind::Tech, u16::from(id)))
    }

    /// Get a graphic.
    pub fn graphic(&self, id: GraphicID) -> Result<&Graphic> {
        self.dat
            .graphic(id)
            .ok_or_else(|| PatchError::missing(RecordKind::Graphic, u16::from(id)))
    }

    /// Get a mutable reference to a graphic.
    pub fn graphic_mut(&mut self, id: GraphicID) -> Result<&mut Graphic> {
        self.dat
            .graphic_mut(id)
            .ok_or_else(|| PatchError::missing(RecordKind::Graphic, u16::from(id)))
    }
}
