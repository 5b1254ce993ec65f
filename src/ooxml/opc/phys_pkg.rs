//! Physical (ZIP) layer of an OPC package.
//!
//! Reading inflates every member up front: decks are small and every part is
//! written back on save anyway.

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// All members of a ZIP-based package, in archive order.
pub struct PhysPkgReader {
    members: Vec<(String, Vec<u8>)>,
}

impl PhysPkgReader {
    /// Read a package file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(OpcError::PackageNotFound(path.display().to_string()));
        }
        Self::from_bytes(std::fs::read(path)?)
    }

    /// Read a package from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Read a package from its bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut members = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut blob = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut blob)?;
            members.push((name, blob));
        }

        Ok(Self { members })
    }

    /// Content of a member, looked up by PackURI.
    pub fn blob_for(&self, pack_uri: &PackURI) -> Result<&[u8]> {
        let membername = pack_uri.membername();
        self.members
            .iter()
            .find(|(name, _)| name == membername)
            .map(|(_, blob)| blob.as_slice())
            .ok_or_else(|| OpcError::PartNotFound(pack_uri.to_string()))
    }

    pub fn contains(&self, pack_uri: &PackURI) -> bool {
        self.blob_for(pack_uri).is_ok()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Consume the reader, yielding `(membername, blob)` pairs.
    pub fn into_members(self) -> impl Iterator<Item = (String, Vec<u8>)> {
        self.members.into_iter()
    }
}

/// Writes parts into an in-memory ZIP archive with Deflate compression.
pub struct PhysPkgWriter {
    archive: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl PhysPkgWriter {
    pub fn new() -> Self {
        Self {
            archive: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Write a part under its member name.
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.archive.start_file(pack_uri.membername(), self.options)?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Finish the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.archive.finish()?.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}
