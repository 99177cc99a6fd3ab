use crate::{DRSHeader, DRSResource, DRSTable, ResourceType, HEADER_SIZE, RESOURCE_SIZE, TABLE_SIZE};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Error, ErrorKind, Read, Result, Write};
use std::path::{Path, PathBuf};

/// Where the contents of an archive entry come from.
///
/// Nothing is read until the archive is committed. Paths are only opened then; streams are read
/// to the end then, because their size must be known before the directory is written.
pub enum Source {
    /// An open stream of unknown length.
    Stream(Box<dyn Read>),
    /// A file on disk.
    Path(PathBuf),
    /// Bytes that are already in memory.
    Bytes(Vec<u8>),
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stream(_) => f.write_str("Stream(..)"),
            Source::Path(path) => write!(f, "Path({})", path.display()),
            Source::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

impl From<Vec<u8>> for Source {
    fn from(bytes: Vec<u8>) -> Self {
        Source::Bytes(bytes)
    }
}

impl From<&[u8]> for Source {
    fn from(bytes: &[u8]) -> Self {
        Source::Bytes(bytes.to_vec())
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<Box<dyn Read>> for Source {
    fn from(stream: Box<dyn Read>) -> Self {
        Source::Stream(stream)
    }
}

/// An entry whose size is known.
enum Entry {
    Path(PathBuf, u32),
    Bytes(Vec<u8>),
}

impl Entry {
    fn resolve(source: Source) -> Result<Self> {
        match source {
            Source::Stream(mut stream) => {
                let mut bytes = vec![];
                stream.read_to_end(&mut bytes)?;
                Ok(Entry::Bytes(bytes))
            }
            Source::Path(path) => {
                let len = fs::metadata(&path)?.len();
                Ok(Entry::Path(path, to_u32(len, "file too large")?))
            }
            Source::Bytes(bytes) => Ok(Entry::Bytes(bytes)),
        }
    }

    fn size(&self) -> Result<u32> {
        match self {
            Entry::Path(_, size) => Ok(*size),
            Entry::Bytes(bytes) => to_u32(bytes.len() as u64, "file too large"),
        }
    }

    fn write_to<W: Write>(self, output: &mut W) -> Result<()> {
        match self {
            Entry::Path(path, size) => {
                let copied = io::copy(&mut File::open(&path)?, output)?;
                if copied != u64::from(size) {
                    return Err(Error::new(
                        ErrorKind::InvalidData,
                        format!(
                            "{} changed size while writing the archive ({} != {})",
                            path.display(),
                            copied,
                            size
                        ),
                    ));
                }
                Ok(())
            }
            Entry::Bytes(bytes) => output.write_all(&bytes),
        }
    }
}

fn to_u32(value: u64, msg: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::new(ErrorKind::InvalidInput, msg))
}

/// Generator for .drs archives.
///
/// Entries are collected per table and written out in one go by [`DRSWriter::commit`]. Tables
/// come out ordered by resource type and entries by ascending ID. Adding an entry with an ID that
/// is already present in its table replaces the earlier entry.
///
/// ```rust
/// use wololo_drs::DRSWriter;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut writer = DRSWriter::new(vec![]);
/// writer.add("bina", 50500, &b"JASC-PAL\r\n0100\r\n..."[..]);
/// writer.add("slp", 2, b"some bytes".to_vec());
/// let buf = writer.commit()?;
/// // → a Vec<u8> containing the DRS file
/// # Ok(()) }
/// ```
pub struct DRSWriter<W>
where
    W: Write,
{
    inner: W,
    tables: BTreeMap<ResourceType, BTreeMap<u32, Source>>,
}

impl<W> DRSWriter<W>
where
    W: Write,
{
    /// Create a writer that will write the archive to `output` when committed.
    pub fn new(output: W) -> Self {
        Self {
            inner: output,
            tables: BTreeMap::new(),
        }
    }

    /// Add a file to the archive.
    #[inline]
    pub fn add(&mut self, t: impl Into<ResourceType>, id: u32, source: impl Into<Source>) {
        self.add_inner(t.into(), id, source.into())
    }

    fn add_inner(&mut self, t: ResourceType, id: u32, source: Source) {
        let table = self.tables.entry(t).or_default();
        if table.insert(id, source).is_some() {
            log::debug!("{}.{} replaces an earlier entry", id, t);
        }
    }

    /// Check if an entry with this type and ID was added.
    pub fn contains(&self, t: impl Into<ResourceType>, id: u32) -> bool {
        self.tables
            .get(&t.into())
            .map_or(false, |table| table.contains_key(&id))
    }

    /// The number of entries across all tables.
    pub fn len(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    /// Check if nothing was added yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the archive and return the output handle.
    ///
    /// Every source is sized first, so the directory can be written up front and followed by the
    /// file contents in a single pass over the output.
    pub fn commit(mut self) -> Result<W> {
        let mut tables = Vec::with_capacity(self.tables.len());
        let mut num_files: u64 = 0;
        for (resource_type, entries) in std::mem::take(&mut self.tables) {
            let mut sized = Vec::with_capacity(entries.len());
            for (id, source) in entries {
                sized.push((id, Entry::resolve(source)?));
            }
            num_files += sized.len() as u64;
            tables.push((resource_type, sized));
        }

        let num_tables = to_u32(tables.len() as u64, "too many tables")?;
        let directory_size = to_u32(
            u64::from(HEADER_SIZE)
                + u64::from(TABLE_SIZE) * u64::from(num_tables)
                + u64::from(RESOURCE_SIZE) * num_files,
            "too many files",
        )?;
        let header = DRSHeader {
            num_resource_types: num_tables,
            directory_size,
            ..Default::default()
        };

        let mut table_records = Vec::with_capacity(tables.len());
        let mut resource_records = Vec::new();
        let mut records_offset = HEADER_SIZE + TABLE_SIZE * num_tables;
        let mut content_offset = u64::from(directory_size);
        for (resource_type, entries) in &tables {
            let num_resources = to_u32(entries.len() as u64, "too many files")?;
            table_records.push(DRSTable {
                resource_type: *resource_type,
                offset: records_offset,
                num_resources,
            });
            records_offset += RESOURCE_SIZE * num_resources;
            for (id, entry) in entries {
                let size = entry.size()?;
                resource_records.push(DRSResource {
                    id: *id,
                    offset: to_u32(content_offset, "archive too large")?,
                    size,
                });
                content_offset += u64::from(size);
            }
        }
        to_u32(content_offset, "archive too large")?;

        header.write_to(&mut self.inner)?;
        for table in &table_records {
            table.write_to(&mut self.inner)?;
        }
        for resource in &resource_records {
            resource.write_to(&mut self.inner)?;
        }
        for (_, entries) in tables {
            for (_, entry) in entries {
                entry.write_to(&mut self.inner)?;
            }
        }
        self.inner.flush()?;

        log::info!(
            "wrote archive: {} tables, {} files, directory size {}, total size {}",
            num_tables,
            num_files,
            directory_size,
            content_offset
        );
        Ok(self.inner)
    }
}

impl<W> fmt::Debug for DRSWriter<W>
where
    W: Write,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.tables
                    .iter()
                    .map(|(t, entries)| (t.to_string(), entries.len())),
            )
            .finish()
    }
}
