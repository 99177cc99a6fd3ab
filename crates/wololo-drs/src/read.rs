use super::{DRSHeader, DRSResource, DRSTable, ResourceType, HEADER_SIZE, RESOURCE_SIZE, TABLE_SIZE};
use memmap2::Mmap;
use std::fs::File;
use std::io::{Error, ErrorKind, Result};
use std::path::Path;

/// A DRS archive reader.
///
/// The reader works on a borrowed view of the whole archive, normally a read-only memory map of
/// the file. Nothing is parsed up front; every method reads the records it needs from the view.
/// Headers and records are taken at face value: a malformed archive yields garbage fields, and
/// only reads past the end of the view fail.
#[derive(Debug)]
pub struct DRSReader<B = Mmap> {
    data: B,
}

impl DRSReader<Mmap> {
    /// Memory-map the archive at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        // The map is read-only and the archive is not expected to change while it is open.
        #[allow(unsafe_code)]
        let data = unsafe { Mmap::map(&file)? };
        log::debug!(
            "mapped {} ({} bytes)",
            path.as_ref().display(),
            data.len()
        );
        Ok(Self { data })
    }
}

impl<B> DRSReader<B>
where
    B: AsRef<[u8]>,
{
    /// Create a reader over archive bytes that are already in memory.
    pub fn new(data: B) -> Self {
        Self { data }
    }

    /// Get a view of `len` bytes at `offset`.
    fn slice(&self, offset: u32, len: u32) -> Result<&[u8]> {
        let bytes = self.data.as_ref();
        let start = offset as usize;
        let end = start
            .checked_add(len as usize)
            .ok_or_else(|| Error::new(ErrorKind::UnexpectedEof, "offset overflow"))?;
        bytes.get(start..end).ok_or_else(|| {
            Error::new(
                ErrorKind::UnexpectedEof,
                format!(
                    "range {}..{} is outside of the archive ({} bytes)",
                    start,
                    end,
                    bytes.len()
                ),
            )
        })
    }

    /// Read the DRS archive header.
    pub fn header(&self) -> Result<DRSHeader> {
        DRSHeader::from(&mut self.slice(0, HEADER_SIZE)?)
    }

    /// Read the list of tables, which directly follows the header.
    pub fn read_tables(&self) -> Result<Vec<DRSTable>> {
        let header = self.header()?;
        let len = header
            .num_resource_types
            .checked_mul(TABLE_SIZE)
            .ok_or_else(|| Error::new(ErrorKind::UnexpectedEof, "too many tables"))?;
        let mut input = self.slice(HEADER_SIZE, len)?;
        let mut tables = Vec::with_capacity(header.num_resource_types as usize);
        for _ in 0..header.num_resource_types {
            tables.push(DRSTable::from(&mut input)?);
        }
        Ok(tables)
    }

    /// Read the resource records of a table.
    pub fn read_files(&self, table: &DRSTable) -> Result<Vec<DRSResource>> {
        let len = table
            .num_resources
            .checked_mul(RESOURCE_SIZE)
            .ok_or_else(|| Error::new(ErrorKind::UnexpectedEof, "too many resources"))?;
        let mut input = self.slice(table.offset, len)?;
        let mut resources = Vec::with_capacity(table.len());
        for _ in 0..table.num_resources {
            resources.push(DRSResource::from(&mut input)?);
        }
        Ok(resources)
    }

    /// Borrow the contents of a resource without copying.
    pub fn resource_bytes(&self, resource: &DRSResource) -> Result<&[u8]> {
        self.slice(resource.offset, resource.size)
    }

    /// Copy the contents of a resource out of the archive.
    pub fn read_file(&self, resource: &DRSResource) -> Result<Vec<u8>> {
        self.resource_bytes(resource).map(<[u8]>::to_vec)
    }

    /// Get the table for the given resource type.
    pub fn get_table(&self, resource_type: ResourceType) -> Result<Option<DRSTable>> {
        Ok(self
            .read_tables()?
            .into_iter()
            .find(|table| table.resource_type == resource_type))
    }

    /// Get a resource of a given type and ID.
    ///
    /// If the table contains the ID more than once, the first record wins.
    pub fn get_resource(&self, resource_type: ResourceType, id: u32) -> Result<Option<DRSResource>> {
        match self.get_table(resource_type)? {
            Some(table) => Ok(self
                .read_files(&table)?
                .into_iter()
                .find(|resource| resource.id == id)),
            None => Ok(None),
        }
    }

    /// Read a resource by type and ID.
    pub fn read_resource(&self, resource_type: ResourceType, id: u32) -> Result<Vec<u8>> {
        let resource = self.get_resource(resource_type, id)?.ok_or_else(|| {
            Error::new(ErrorKind::NotFound, "Resource not found in this archive")
        })?;
        self.read_file(&resource)
    }
}
