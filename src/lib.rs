#![doc = include_str!("../README.md")]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

#[macro_use]
extern crate hex_literal;
extern crate heapless;
#[macro_use]
extern crate log;

mod cluster_heap;
mod endian;
pub mod error;
mod fat;
pub(crate) mod fs;
pub mod io;
mod region;
pub mod types;
mod variant;

use alloc::vec;
use alloc::vec::Vec;

pub use cluster_heap::directory::Directory;
pub use cluster_heap::file::{File, SeekFrom};
use error::{Error, ImplementationError, OperationError};
pub use fat::{FatTable, NextCluster};
pub use fs::Geometry;
use io::{Region, RegionError};
use region::boot::{malformed, BOOT_SECTOR_SIZE};
pub use region::boot::BiosParameterBlock;
pub use region::data::entry::{Attributes, Date, DateTime, DirectoryRecord, Slot, Time};
pub use region::fat::ClusterRef;
use types::ClusterID;
pub use variant::{classify, FatVariant};

/// Mounted FAT12/16/32 volume, read-only once built
pub struct FileSystem<R> {
    region: R,
    offset: u64,
    bpb: BiosParameterBlock,
    geometry: Geometry,
    variant: FatVariant,
    fat: FatTable,
    root: Directory,
}

/// Mount the volume starting `offset` bytes into `region`
pub fn mount<R: Region>(region: R, offset: u64) -> Result<FileSystem<R>, Error<R::Error>> {
    FileSystem::new(region, offset)
}

impl<R: Region> FileSystem<R> {
    pub fn new(region: R, offset: u64) -> Result<Self, Error<R::Error>> {
        let size = region.size();
        let available = size.saturating_sub(offset);
        if available < BOOT_SECTOR_SIZE as u64 {
            let length = BOOT_SECTOR_SIZE as u64;
            return Err(Error::IO(RegionError::MapError { offset, length, size }.into()));
        }
        let mut sector = [0u8; BOOT_SECTOR_SIZE];
        region.read_at(offset, &mut sector).map_err(Error::IO)?;
        let bpb = BiosParameterBlock::decode(&sector)?;
        let variant = classify(&bpb)?;
        if variant == FatVariant::ExFAT {
            return Err(ImplementationError::UnsupportedVariant(variant).into());
        }
        let geometry = Geometry::new(&bpb)?;
        match (variant, bpb.root_entries) {
            (FatVariant::FAT32, 1..) => return Err(malformed!(root_entries).into()),
            (FatVariant::FAT12 | FatVariant::FAT16, 0) => {
                return Err(malformed!(root_entries).into())
            }
            _ => (),
        }
        debug!("{} volume at offset {}", variant, offset);
        debug!("Geometry {:?}", geometry);

        let fat_offset = offset + geometry.byte_offset(geometry.first_fat_sector());
        let fat_length = geometry.fat_size_sectors() as u64 * geometry.bytes_per_sector() as u64;
        io::check(fat_offset, fat_length, size).map_err(|e| Error::IO(e.into()))?;
        let mut bytes = vec![0u8; fat_length as usize];
        region.read_at(fat_offset, &mut bytes).map_err(Error::IO)?;
        let fat = FatTable::new(variant, bytes)?;
        let required = geometry.last_cluster();
        if fat.capacity() <= u32::from(required) {
            warn!("FAT holds {} entries, fewer than {} clusters", fat.capacity(), required);
        }

        let root = match variant.has_fixed_root() {
            true => {
                let sector = geometry.first_root_directory_sector();
                let root_offset = offset + geometry.byte_offset(sector);
                let length = geometry.root_dir_sectors() as usize * geometry.bytes_per_sector() as usize;
                Directory::read_fixed(&region, root_offset, length)?
            }
            false => {
                let cluster = ClusterID::from(bpb.root_cluster);
                if !cluster.valid() {
                    return Err(malformed!(fat32 root_cluster).into());
                }
                debug!("Root directory on cluster {}", cluster);
                Directory::read_chain(&region, offset, &geometry, &fat, cluster)?
            }
        };
        Ok(Self { region, offset, bpb, geometry, variant, fat, root })
    }

    pub(crate) fn read_volume(&self, position: u64, buf: &mut [u8]) -> Result<(), Error<R::Error>> {
        self.region.read_at(self.offset + position, buf).map_err(Error::IO)
    }

    pub fn bpb(&self) -> &BiosParameterBlock {
        &self.bpb
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn variant(&self) -> FatVariant {
        self.variant
    }

    pub fn fat_table(&self) -> &FatTable {
        &self.fat
    }

    pub fn root(&self) -> &Directory {
        &self.root
    }

    pub fn region(&self) -> &R {
        &self.region
    }

    /// Volume label record of root directory, otherwise label of boot sector
    pub fn volume_label(&self) -> Option<heapless::String<11>> {
        let raw = match self.root.volume_label() {
            Some(record) => record.raw_name(),
            None => self.bpb.volume_label.filter(|label| label != b"NO NAME    ")?,
        };
        let length = raw.len() - raw.iter().rev().take_while(|&&b| b == b' ').count();
        let mut label = heapless::String::new();
        for &b in raw[..length].iter() {
            label.push(if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' }).ok();
        }
        Some(label)
    }

    pub fn serial_number(&self) -> Option<u32> {
        self.bpb.volume_id
    }

    /// List a subdirectory, first cluster 0 stands for the root directory
    pub fn read_directory(&self, record: &DirectoryRecord) -> Result<Directory, Error<R::Error>> {
        if !record.is_directory() {
            return Err(OperationError::NotADirectory.into());
        }
        let cluster = record.first_cluster(self.variant);
        if u32::from(cluster) == 0 {
            return Ok(self.root.clone());
        }
        Directory::read_chain(&self.region, self.offset, &self.geometry, &self.fat, cluster)
    }

    /// Resolve a `/` separated path, `None` when any component is missing.
    /// The root directory has no record of its own, see [`FileSystem::list`]
    pub fn find(&self, path: &str) -> Result<Option<DirectoryRecord>, Error<R::Error>> {
        let mut components = path.split('/').filter(|c| !c.is_empty()).peekable();
        let mut directory = self.root.clone();
        let mut found = None;
        while let Some(name) = components.next() {
            let record = match directory.find(name) {
                Some(record) => *record,
                None => return Ok(None),
            };
            if components.peek().is_some() {
                directory = match self.read_directory(&record) {
                    Ok(directory) => directory,
                    Err(Error::Operation(OperationError::NotADirectory)) => return Ok(None),
                    Err(e) => return Err(e),
                };
            }
            found = Some(record);
        }
        Ok(found)
    }

    /// Entries of directory at `path`
    pub fn list(&self, path: &str) -> Result<Directory, Error<R::Error>> {
        if path.split('/').all(|c| c.is_empty()) {
            return Ok(self.root.clone());
        }
        let record = self.find(path)?.ok_or(Error::Operation(OperationError::NotFound))?;
        self.read_directory(&record)
    }

    pub fn open(&self, record: &DirectoryRecord) -> Result<File<'_, R>, Error<R::Error>> {
        if !record.is_file() {
            return Err(OperationError::NotAFile.into());
        }
        Ok(File::new(self, record.first_cluster(self.variant), record.size()))
    }

    pub fn read_to_vec(&self, record: &DirectoryRecord) -> Result<Vec<u8>, Error<R::Error>> {
        let mut file = self.open(record)?;
        let size = self.region.size().saturating_sub(self.offset);
        io::check(0, file.size(), size).map_err(|e| Error::IO(e.into()))?;
        let mut bytes = vec![0u8; file.size() as usize];
        file.read_exact(&mut bytes)?;
        Ok(bytes)
    }
}

impl<R> core::fmt::Debug for FileSystem<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FileSystem")
            .field("offset", &self.offset)
            .field("variant", &self.variant)
            .field("geometry", &self.geometry)
            .finish_non_exhaustive()
    }
}
