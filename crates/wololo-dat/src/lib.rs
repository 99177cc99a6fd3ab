//! The game data graph that WololoKingdoms patches: units, civilizations, tech effects, techs,
//! the tech tree and graphics, each addressed by a small integer ID.
//!
//! Records reference each other by ID. A unit type references its graphics and the unit it
//! leaves behind when it dies, effect commands reference unit types, tech tree nodes reference
//! unit types and techs, and graphics reference other graphics through their deltas.
//!
//! Graphs are stored as deflate-compressed snapshots.
//!
//! ```rust
//! use wololo_dat::{DatFile, Graphic};
//! # fn main() -> Result<(), wololo_dat::Error> {
//! let mut dat = DatFile::default();
//! let id = dat.push_graphic(Graphic {
//!     name: "MONK_HEAL".into(),
//!     slp_id: 776,
//!     ..Default::default()
//! })?;
//!
//! let mut snapshot = vec![];
//! dat.write_to(&mut snapshot)?;
//! let dat = DatFile::read_from(&snapshot[..])?;
//! assert_eq!(dat.graphic(id).map(|g| g.slp_id), Some(776));
//! # Ok(())
//! # }
//! ```

#![deny(future_incompatible)]
#![deny(nonstandard_style)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_code)]
#![warn(unused)]

#[macro_use]
mod macros;
mod civ;
mod effect;
mod graphic;
mod ids;
mod tech;
mod tech_tree;
mod unit;

pub use civ::Civilization;
pub use effect::{Effect, EffectCommand};
pub use graphic::{Graphic, GraphicDelta};
pub use ids::{CivilizationID, EffectID, GraphicID, TechID, UnitTypeID};
pub use tech::{ResourceCost, Tech};
pub use tech_tree::{
    TechTree, TechTreeAge, TechTreeBuilding, TechTreeDependency, TechTreeTech, TechTreeUnit,
};
pub use unit::{DamageGraphic, Task, TaskList, Unit};

use flate2::{read::DeflateDecoder, write::DeflateEncoder, Compression};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Errors that may occur while loading or saving a data file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing the file failed.
    #[error(transparent)]
    IoError(#[from] io::Error),
    /// The snapshot could not be encoded or decoded.
    #[error("invalid data snapshot: {0}")]
    SnapshotError(#[from] bincode::Error),
    /// There is no ID left for a new graphic.
    #[error("too many graphics (at most {} are supported)", u16::MAX)]
    TooManyGraphics,
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatFile {
    pub civilizations: Vec<Civilization>,
    pub effects: Vec<Effect>,
    pub techs: Vec<Tech>,
    pub tech_tree: TechTree,
    /// Graphics indexed by ID. Empty slots are unused IDs.
    pub graphics: Vec<Option<Graphic>>,
    /// Task lists shared by all civilizations, indexed by unit type ID.
    pub task_lists: Vec<Option<TaskList>>,
}

impl DatFile {
    /// Read a data file snapshot.
    pub fn read_from(input: impl Read) -> Result<Self> {
        let input = DeflateDecoder::new(input);
        let dat: DatFile = bincode::deserialize_from(input)?;
        log::debug!(
            "read data file: {} civilizations, {} effects, {} techs, {} graphics",
            dat.civilizations.len(),
            dat.effects.len(),
            dat.techs.len(),
            dat.graphics.len()
        );
        Ok(dat)
    }

    /// Write a data file snapshot.
    pub fn write_to(&self, output: impl Write) -> Result<()> {
        let mut output = DeflateEncoder::new(output, Compression::default());
        bincode::serialize_into(&mut output, self)?;
        output.finish()?;
        Ok(())
    }

    /// Load a data file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_from(BufReader::new(File::open(path)?))
    }

    /// Save the data file to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut output = BufWriter::new(File::create(path)?);
        self.write_to(&mut output)?;
        output.flush()?;
        Ok(())
    }

    pub fn civilization(&self, id: CivilizationID) -> Option<&Civilization> {
        self.civilizations.get(usize::from(id))
    }

    pub fn civilization_mut(&mut self, id: CivilizationID) -> Option<&mut Civilization> {
        self.civilizations.get_mut(usize::from(id))
    }

    /// Get a civilization's version of a unit type.
    pub fn unit(&self, civ: CivilizationID, id: UnitTypeID) -> Option<&Unit> {
        self.civilization(civ).and_then(|civ| civ.unit(id))
    }

    pub fn unit_mut(&mut self, civ: CivilizationID, id: UnitTypeID) -> Option<&mut Unit> {
        self.civilization_mut(civ).and_then(|civ| civ.unit_mut(id))
    }

    /// Check if any civilization has a unit type.
    pub fn has_unit(&self, id: UnitTypeID) -> bool {
        self.civilizations.iter().any(|civ| civ.unit(id).is_some())
    }

    pub fn effect(&self, id: EffectID) -> Option<&Effect> {
        self.effects.get(usize::from(id))
    }

    pub fn effect_mut(&mut self, id: EffectID) -> Option<&mut Effect> {
        self.effects.get_mut(usize::from(id))
    }

    pub fn tech(&self, id: TechID) -> Option<&Tech> {
        self.techs.get(usize::from(id))
    }

    pub fn tech_mut(&mut self, id: TechID) -> Option<&mut Tech> {
        self.techs.get_mut(usize::from(id))
    }

    pub fn graphic(&self, id: GraphicID) -> Option<&Graphic> {
        self.graphics.get(usize::from(id)).and_then(Option::as_ref)
    }

    pub fn graphic_mut(&mut self, id: GraphicID) -> Option<&mut Graphic> {
        self.graphics.get_mut(usize::from(id)).and_then(Option::as_mut)
    }

    /// Add a graphic with the next free ID, and return that ID.
    pub fn push_graphic(&mut self, mut graphic: Graphic) -> Result<GraphicID> {
        let id = GraphicID::try_from(self.graphics.len()).map_err(|_| Error::TooManyGraphics)?;
        graphic.id = id;
        self.graphics.push(Some(graphic));
        Ok(id)
    }

    pub fn task_list(&self, id: UnitTypeID) -> Option<&TaskList> {
        self.task_lists.get(usize::from(id)).and_then(Option::as_ref)
    }

    pub fn task_list_mut(&mut self, id: UnitTypeID) -> Option<&mut TaskList> {
        self.task_lists
            .get_mut(usize::from(id))
            .and_then(Option::as_mut)
    }

    /// Put a task list in the slot for a unit type, growing the table if needed.
    pub fn set_task_list(&mut self, id: UnitTypeID, tasks: Option<TaskList>) -> Option<TaskList> {
        let index = usize::from(id);
        if index >= self.task_lists.len() {
            self.task_lists.resize_with(index + 1, Default::default);
        }
        std::mem::replace(&mut self.task_lists[index], tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> anyhow::Result<DatFile> {
        let mut dat = DatFile::default();
        let mut civ = Civilization::new("Gaia");
        let mut unit = Unit::new(4.into());
        unit.name = "ARCHR".into();
        unit.dead_unit_id = Some(3.into());
        civ.set_unit(unit);
        dat.civilizations.push(civ);
        dat.effects.push(Effect {
            name: "Chemistry".into(),
            commands: vec![EffectCommand {
                command_type: EffectCommand::ADD_ATTRIBUTE,
                target_unit: 4,
                attribute: 9,
                amount: 1.0,
                ..Default::default()
            }],
        });
        dat.techs.push(Tech {
            name: "Chemistry".into(),
            effect_id: Some(0.into()),
            ..Default::default()
        });
        dat.push_graphic(Graphic {
            name: "ARCHR_AN".into(),
            slp_id: 18000,
            ..Default::default()
        })?;
        dat.set_task_list(
            4.into(),
            Some(TaskList::from(vec![Task {
                action_type: 7,
                ..Default::default()
            }])),
        );
        Ok(dat)
    }

    #[test]
    fn snapshot_round_trip() -> anyhow::Result<()> {
        let dat = sample()?;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("empires2_x1_p1.dat");
        dat.save(&path)?;
        assert_eq!(DatFile::load(&path)?, dat);
        Ok(())
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(DatFile::read_from(&b"not a data file"[..]).is_err());
    }

    #[test]
    fn lookups() -> anyhow::Result<()> {
        let mut dat = sample()?;
        let gaia = CivilizationID::from(0);
        assert_eq!(dat.unit(gaia, 4.into()).map(|u| u.name.as_str()), Some("ARCHR"));
        assert!(dat.unit(gaia, 5.into()).is_none());
        assert!(dat.unit(1.into(), 4.into()).is_none());
        assert!(dat.has_unit(4.into()));
        assert!(!dat.has_unit(3.into()));
        assert_eq!(dat.effect(0.into()).map(|e| e.commands.len()), Some(1));
        assert_eq!(dat.task_list(4.into()).map(|t| t.len()), Some(1));
        assert!(dat.task_list(3.into()).is_none());

        let id = dat.push_graphic(Graphic::default())?;
        assert_eq!(id, GraphicID::from(1));
        assert_eq!(dat.graphic(id).map(|g| g.id), Some(id));
        if let Some(graphic) = dat.graphic_mut(0.into()) {
            graphic.frame_count = 10;
        }
        assert_eq!(dat.graphic(0.into()).map(|g| g.frame_count), Some(10));
        Ok(())
    }
}
