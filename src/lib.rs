//! Libraries for converting Age of Empires 2: HD Edition content for WololoKingdoms.
//!
//! ## DRS Archives
//!
//! > Supported version range: Age of Empires 2: Age of Kings, Age of Conquerors, HD Edition
//!
//! wololo-drs reads `.drs` archives through a memory map and writes new ones in a single pass.
//! Existing archives can be merged with loose files, keeping the old versions of some overridden
//! files under shifted IDs.
//!
//! ```rust
//! use wololo::drs::ResourceType;
//! use wololo::{DRSReader, DRSWriter};
//! # fn main() -> std::io::Result<()> {
//! let mut writer = DRSWriter::new(vec![]);
//! writer.add("slp", 15000, b"terrain".to_vec());
//! let archive = DRSReader::new(writer.commit()?);
//! assert_eq!(archive.read_resource(ResourceType::SLP, 15000)?, b"terrain");
//! # Ok(())
//! # }
//! ```
//!
//! ## Random Map Scripts
//!
//! wololo-rms rewrites HD Edition random map scripts that use terrains WololoKingdoms does not
//! have, and packages them with the terrain graphics they need.
//!
//! ## Data Files
//!
//! wololo-dat holds the game data as an object graph of civilizations, units, effects, techs and
//! graphics. wololo-patch applies the WololoKingdoms fixes to it: moving units to IDs the AI can
//! use, splitting the onager, and giving civilizations their own architecture.
//!
//! ```rust
//! use wololo::{DatFile, PatchContext, Pipeline};
//! let mut ctx = PatchContext::new(DatFile::default());
//! // The default fixes expect real game data.
//! assert!(Pipeline::default().run(&mut ctx).is_err());
//! ```

#![deny(future_incompatible)]
#![deny(nonstandard_style)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused)]

pub use wololo_dat as dat;
pub use wololo_drs as drs;
pub use wololo_patch as patch;
pub use wololo_rms as rms;

pub use wololo_dat::DatFile;
pub use wololo_drs::{DRSReader, DRSWriter};
pub use wololo_patch::{PatchContext, Pipeline};
pub use wololo_rms::{convert_maps, MapConverter, TerrainCatalog};
