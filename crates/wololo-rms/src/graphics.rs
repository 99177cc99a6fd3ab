use crate::ConvertError;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Source of terrain graphics, looked up by file name such as `DLC_RAINFOREST.slp` or `15004.slp`.
pub trait TerrainGraphics {
    /// Read a graphic. Fails with [`ConvertError::MissingAsset`] if there is no such graphic.
    fn read(&self, name: &str) -> Result<Vec<u8>, ConvertError>;
}

fn read_file(path: &Path, name: &str) -> Result<Vec<u8>, ConvertError> {
    fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => ConvertError::MissingAsset {
            name: name.to_string(),
        },
        _ => err.into(),
    })
}

/// Graphics indexed by name, as produced by `wololo_drs::index_by_name`.
impl TerrainGraphics for BTreeMap<String, PathBuf> {
    fn read(&self, name: &str) -> Result<Vec<u8>, ConvertError> {
        let path = self.get(name).ok_or_else(|| ConvertError::MissingAsset {
            name: name.to_string(),
        })?;
        read_file(path, name)
    }
}

/// Graphics that are already in memory.
impl TerrainGraphics for BTreeMap<String, Vec<u8>> {
    fn read(&self, name: &str) -> Result<Vec<u8>, ConvertError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| ConvertError::MissingAsset {
                name: name.to_string(),
            })
    }
}

/// A flat directory of graphics.
impl TerrainGraphics for Path {
    fn read(&self, name: &str) -> Result<Vec<u8>, ConvertError> {
        read_file(&self.join(name), name)
    }
}
