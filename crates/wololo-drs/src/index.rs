use crate::{DRSWriter, ResourceType};
use std::collections::BTreeMap;
use std::io::{Result, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Loose resource files on disk, by type and ID.
///
/// Built from directory trees of files named `<id>.slp` and `<id>.wav`. Later insertions replace
/// earlier ones, so indexing several directories in order lets each one override the previous.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResourceIndex {
    files: BTreeMap<ResourceType, BTreeMap<u32, PathBuf>>,
}

impl ResourceIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every `<id>.slp` and `<id>.wav` file below `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut index = Self::new();
        index.add_dir(dir)?;
        Ok(index)
    }

    /// Index every `<id>.slp` and `<id>.wav` file below `dir` on top of the existing entries.
    ///
    /// Files with other extensions, or whose name is not a number, are ignored.
    pub fn add_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let mut count = 0;
        for entry in WalkDir::new(dir.as_ref()).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let resource_type = match extension(path).as_deref() {
                Some("slp") => ResourceType::SLP,
                Some("wav") => ResourceType::WAV,
                _ => continue,
            };
            match numeric_stem(path) {
                Some(id) => {
                    self.insert(resource_type, id, path.to_path_buf());
                    count += 1;
                }
                None => log::debug!("skipping {}: not a numeric id", path.display()),
            }
        }
        log::debug!("indexed {} files from {}", count, dir.as_ref().display());
        Ok(count)
    }

    /// Add a file, returning the path it replaces.
    pub fn insert(
        &mut self,
        resource_type: impl Into<ResourceType>,
        id: u32,
        path: impl Into<PathBuf>,
    ) -> Option<PathBuf> {
        self.files
            .entry(resource_type.into())
            .or_default()
            .insert(id, path.into())
    }

    /// Get the path of a file.
    pub fn get(&self, resource_type: impl Into<ResourceType>, id: u32) -> Option<&Path> {
        self.files
            .get(&resource_type.into())
            .and_then(|table| table.get(&id))
            .map(PathBuf::as_path)
    }

    /// Check if a file is indexed.
    pub fn contains(&self, resource_type: impl Into<ResourceType>, id: u32) -> bool {
        self.get(resource_type, id).is_some()
    }

    /// Remove a file from the index.
    pub fn remove(&mut self, resource_type: impl Into<ResourceType>, id: u32) -> Option<PathBuf> {
        let resource_type = resource_type.into();
        let table = self.files.get_mut(&resource_type)?;
        let removed = table.remove(&id);
        if table.is_empty() {
            self.files.remove(&resource_type);
        }
        removed
    }

    /// Add all files of `other`, replacing entries with the same type and ID.
    pub fn extend(&mut self, other: ResourceIndex) {
        for (resource_type, table) in other.files {
            self.files.entry(resource_type).or_default().extend(table);
        }
    }

    /// The number of indexed files.
    pub fn len(&self) -> usize {
        self.files.values().map(BTreeMap::len).sum()
    }

    /// Check if no files are indexed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all files, by type and then ID.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, u32, &Path)> + '_ {
        self.files.iter().flat_map(|(resource_type, table)| {
            table
                .iter()
                .map(move |(id, path)| (*resource_type, *id, path.as_path()))
        })
    }

    /// Add every indexed file to an archive writer. Returns the number of files added.
    pub fn add_to<W: Write>(&self, writer: &mut DRSWriter<W>) -> usize {
        let mut count = 0;
        for (resource_type, id, path) in self.iter() {
            writer.add(resource_type, id, path);
            count += 1;
        }
        count
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

fn numeric_stem(path: &Path) -> Option<u32> {
    path.file_stem()?.to_str()?.parse().ok()
}

/// Index files below `dir` with the extension `ext` by their file name, like `DLC_RAINFOREST.slp`.
pub fn index_by_name(dir: impl AsRef<Path>, ext: &str) -> Result<BTreeMap<String, PathBuf>> {
    let mut files = BTreeMap::new();
    for entry in WalkDir::new(dir.as_ref()).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !extension(path).map_or(false, |e| e.eq_ignore_ascii_case(ext)) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            files.insert(name.to_string(), path.to_path_buf());
        }
    }
    Ok(files)
}

/// Add every file directly inside `dir` to the `bina` table, using its numeric file stem as the
/// ID. Returns the number of files added.
///
/// This is how random map script archives are laid out: `54000.rms`, `54001.rms`, and so on.
pub fn build_archive<W: Write>(dir: impl AsRef<Path>, writer: &mut DRSWriter<W>) -> Result<usize> {
    let mut count = 0;
    for entry in WalkDir::new(dir.as_ref())
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        match numeric_stem(path) {
            Some(id) => {
                writer.add(ResourceType::BINA, id, path);
                count += 1;
            }
            None => log::warn!("skipping {}: not a numeric id", path.display()),
        }
    }
    Ok(count)
}
