//! Converts HD Edition random map scripts so they can be played in WololoKingdoms.
//!
//! HD Edition added terrains that WololoKingdoms has no slots for. Maps that use them get their
//! terrain constants pointed at a WololoKingdoms slot that the map does not use itself, and the
//! HD Edition graphic for the terrain is shipped along with the map in that slot. Maps that need
//! extra graphics are packaged as `ZR@` maps; other maps stay plain scripts.
//!
//! ```rust,no_run
//! use wololo_rms::{convert_maps, ConvertOptions};
//! use std::path::Path;
//! # fn main() -> Result<(), wololo_rms::ConvertError> {
//! let stats = convert_maps(
//!     "HD/resources/_common/random-map-scripts",
//!     "WK/Random",
//!     Path::new("HD/resources/_common/terrain/textures"),
//!     ConvertOptions::default(),
//! )?;
//! println!("{} maps converted", stats.converted);
//! # Ok(())
//! # }
//! ```

#![deny(future_incompatible)]
#![deny(nonstandard_style)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused)]

mod catalog;
mod convert;
mod graphics;
mod maps;
mod terrain;
pub mod text;
mod usage;

pub use catalog::{GroupMember, ReplacementRule, TerrainCatalog};
pub use convert::{Conversion, MapConverter, MapFiles};
pub use graphics::TerrainGraphics;
pub use maps::{convert_maps, read_zr_map, write_zr_map, ConvertOptions, ConvertStats};
pub use terrain::{Terrain, TerrainGroup};
pub use usage::TerrainUsage;

/// Errors that may occur while converting maps.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Reading a map or writing the result failed.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// A graphic or scenario that a map needs could not be found.
    #[error("missing asset: {name}")]
    MissingAsset {
        /// File name of the missing asset.
        name: String,
    },
    /// Packaging or reading a `ZR@` map failed.
    #[error(transparent)]
    ZipError(#[from] zip::result::ZipError),
    /// A pattern built from catalog constants did not compile.
    #[error(transparent)]
    PatternError(#[from] regex::Error),
}
