//! .drs is the resource archive file format for the Genie Engine, used by Age of Empires 1/2.
//! .drs files contain tables, each of which contain resources of a single type. Resources are
//! identified by a numeric identifier that is unique within its table.
//!
//! The layout is fixed and little-endian:
//!
//! ```text
//! header       64 bytes   banner (40), version (4), password (12), table count (4), directory size (4)
//! tables       12 bytes   each: type tag (4), offset of the resource records (4), resource count (4)
//! resources    12 bytes   each: id (4), absolute content offset (4), content size (4)
//! contents                in table order, then resource order
//! ```
//!
//! ## Example
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use wololo_drs::{DRSReader, DRSWriter, ResourceType};
//!
//! let mut writer = DRSWriter::new(vec![]);
//! writer.add(ResourceType::BINA, 54000, b"#const GRASS 0".to_vec());
//! writer.add("slp", 15001, vec![1, 2, 3]);
//! let bytes = writer.commit()?;
//!
//! let drs = DRSReader::new(bytes);
//! for table in drs.read_tables()? {
//!     for resource in drs.read_files(&table)? {
//!         let content = drs.read_file(&resource)?;
//!         println!("{}.{}: {} bytes", resource.id, table.resource_type, content.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![deny(future_incompatible)]
#![deny(nonstandard_style)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused)]

use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use std::cmp::Ordering;
use std::fmt;
use std::io::{Read, Result, Write};
use std::str;

mod index;
mod merge;
mod read;
mod write;

pub use index::{build_archive, index_by_name, ResourceIndex};
pub use merge::{merge_archive, MergeStats, RemapRule};
pub use read::DRSReader;
pub use write::{DRSWriter, Source};

/// Size in bytes of the archive header.
pub const HEADER_SIZE: u32 = 64;
/// Size in bytes of a single table record.
pub const TABLE_SIZE: u32 = 12;
/// Size in bytes of a single resource record.
pub const RESOURCE_SIZE: u32 = 12;

/// A DRS version string.
type DRSVersion = [u8; 4];

/// A resource type name.
///
/// In a .drs archive, type names are represented as 4 bytes. They are laid out in reverse order and
/// padded with ASCII space characters (`' '`). For example, the "slp" resource type is stored as `" pls"`.
///
/// Resource types are ordered by their little-endian integer value, which is the order tables are
/// written in: `bina`, then `slp`, then `wav`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceType([u8; 4]);

impl ResourceType {
    /// Binary files: palettes, random map scripts, interface definitions.
    pub const BINA: ResourceType = ResourceType(*b"anib");
    /// SLP sprite files.
    pub const SLP: ResourceType = ResourceType(*b" pls");
    /// WAV sound files.
    pub const WAV: ResourceType = ResourceType(*b" vaw");

    /// The raw 4-byte tag as it is stored in the archive.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    #[inline]
    fn as_u32(self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    #[inline]
    fn write_to<W: Write>(self, output: &mut W) -> Result<()> {
        output.write_all(&self.0)
    }
}

impl Ord for ResourceType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_u32().cmp(&other.as_u32())
    }
}

impl PartialOrd for ResourceType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bytes = self.0;
        bytes.reverse();
        f.write_str(String::from_utf8_lossy(&bytes).trim())
    }
}

/// An error occurred while parsing a resource type.
///
/// This may be caused by:
///   - The input string being longer than 4 characters
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("resource type names can be at most 4 bytes long")]
pub struct ParseResourceTypeError;

/// Parse a resource type from a string, with error handling.
impl str::FromStr for ResourceType {
    type Err = ParseResourceTypeError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() > 4 {
            Err(ParseResourceTypeError)
        } else {
            Ok(bytes.into())
        }
    }
}

impl From<[u8; 4]> for ResourceType {
    fn from(u: [u8; 4]) -> Self {
        Self(u)
    }
}

/// Parse a resource type from a byte slice, panics if the slice is too long to fit.
impl From<&[u8]> for ResourceType {
    fn from(u: &[u8]) -> Self {
        assert!(u.len() <= 4);
        let mut bytes = [b' '; 4];
        bytes[0..u.len()].copy_from_slice(u);
        bytes.reverse();
        Self(bytes)
    }
}

/// Parse a resource type from a string, panics if the string is too long to fit (>4 bytes).
impl From<&str> for ResourceType {
    fn from(s: &str) -> Self {
        s.as_bytes().into()
    }
}

/// The DRS archive header.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DRSHeader {
    /// A copyright message.
    banner_msg: [u8; 40],
    /// File version. (always "1.00")
    version: DRSVersion,
    /// File password / identifier.
    password: [u8; 12],
    /// The amount of resource types (tables).
    num_resource_types: u32,
    /// Size in bytes of the metadata and tables. Resource contents start at this offset.
    directory_size: u32,
}

impl Default for DRSHeader {
    fn default() -> Self {
        Self {
            banner_msg: *b"Copyright (c) 1997 Ensemble Studios.\x1a\x00\x00\x00",
            version: *b"1.00",
            password: *b"tribe\x00\x00\x00\x00\x00\x00\x00",
            num_resource_types: 0,
            directory_size: 0,
        }
    }
}

impl DRSHeader {
    /// Read a DRS archive header from a `Read`able handle.
    #[inline]
    fn from<R: Read>(source: &mut R) -> Result<DRSHeader> {
        let mut banner_msg = [0; 40];
        let mut version = [0; 4];
        let mut password = [0; 12];
        source.read_exact(&mut banner_msg)?;
        source.read_exact(&mut version)?;
        source.read_exact(&mut password)?;
        let num_resource_types = source.read_u32::<LE>()?;
        let directory_size = source.read_u32::<LE>()?;
        Ok(DRSHeader {
            banner_msg,
            version,
            password,
            num_resource_types,
            directory_size,
        })
    }

    #[inline]
    fn write_to<W: Write>(&self, output: &mut W) -> Result<()> {
        output.write_all(&self.banner_msg)?;
        output.write_all(&self.version)?;
        output.write_all(&self.password)?;
        output.write_u32::<LE>(self.num_resource_types)?;
        output.write_u32::<LE>(self.directory_size)?;
        Ok(())
    }

    /// The copyright banner, up to the first NUL byte.
    pub fn banner_msg(&self) -> &[u8] {
        trim_nul(&self.banner_msg)
    }

    /// The version tag, normally `1.00`.
    pub fn version(&self) -> &[u8] {
        &self.version
    }

    /// The password tag, up to the first NUL byte.
    pub fn password(&self) -> &[u8] {
        trim_nul(&self.password)
    }

    /// The amount of tables in the archive.
    pub fn num_resource_types(&self) -> u32 {
        self.num_resource_types
    }

    /// Offset where file contents start.
    pub fn directory_size(&self) -> u32 {
        self.directory_size
    }
}

fn trim_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}

impl fmt::Debug for DRSHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DRSHeader {{ banner_msg: '{}', version: '{}', password: '{}', num_resource_types: {}, directory_size: {} }}",
            String::from_utf8_lossy(self.banner_msg()),
            String::from_utf8_lossy(self.version()),
            String::from_utf8_lossy(self.password()),
            self.num_resource_types,
            self.directory_size
        )
    }
}

/// A table record, describing where the resource records of a single type can be found.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DRSTable {
    /// Type of the resources in this table.
    pub resource_type: ResourceType,
    /// Offset in the DRS archive where this table's resource records can be found.
    pub offset: u32,
    /// Number of resource records in this table.
    pub num_resources: u32,
}

impl DRSTable {
    /// Read a DRS table record from a `Read`able handle.
    #[inline]
    fn from<R: Read>(source: &mut R) -> Result<DRSTable> {
        let mut resource_type = [0; 4];
        source.read_exact(&mut resource_type)?;
        let offset = source.read_u32::<LE>()?;
        let num_resources = source.read_u32::<LE>()?;
        Ok(DRSTable {
            resource_type: resource_type.into(),
            offset,
            num_resources,
        })
    }

    #[inline]
    fn write_to<W: Write>(&self, output: &mut W) -> Result<()> {
        self.resource_type.write_to(output)?;
        output.write_u32::<LE>(self.offset)?;
        output.write_u32::<LE>(self.num_resources)?;
        Ok(())
    }

    /// Get the number of resources in this table.
    #[inline]
    pub fn len(&self) -> usize {
        self.num_resources as usize
    }

    /// Check if the table contains no resources.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_resources == 0
    }

    /// The file extension used for resources in this table.
    #[inline]
    pub fn resource_ext(&self) -> String {
        self.resource_type.to_string()
    }
}

impl fmt::Debug for DRSTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DRSTable {{ resource_type: '{}', offset: {}, num_resources: {} }}",
            self.resource_type, self.offset, self.num_resources
        )
    }
}

/// A single resource record in a DRS archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DRSResource {
    /// The resource ID.
    pub id: u32,
    /// The absolute offset into the DRS archive where the resource can be found.
    pub offset: u32,
    /// The size in bytes of the resource.
    pub size: u32,
}

impl DRSResource {
    /// Read DRS resource metadata from a `Read`able handle.
    #[inline]
    fn from<R: Read>(source: &mut R) -> Result<DRSResource> {
        let id = source.read_u32::<LE>()?;
        let offset = source.read_u32::<LE>()?;
        let size = source.read_u32::<LE>()?;
        Ok(DRSResource { id, offset, size })
    }

    #[inline]
    fn write_to<W: Write>(&self, output: &mut W) -> Result<()> {
        output.write_u32::<LE>(self.id)?;
        output.write_u32::<LE>(self.offset)?;
        output.write_u32::<LE>(self.size)?;
        Ok(())
    }
}
