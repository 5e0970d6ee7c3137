#![allow(dead_code)]

use std::collections::BTreeMap;

use fat::io::{Region, RegionError};
use fat::{Attributes, DirectoryRecord, FatVariant};

const CHUNK_SIZE: u64 = 512;

/// Disk image keeping only the chunks ever written, the rest reads as zero
#[derive(Clone, Debug, Default)]
pub struct SparseImage {
    size: u64,
    chunks: BTreeMap<u64, [u8; CHUNK_SIZE as usize]>,
}

impl SparseImage {
    pub fn new(size: u64) -> Self {
        Self { size, chunks: BTreeMap::new() }
    }

    pub fn write(&mut self, offset: u64, bytes: &[u8]) {
        for (i, &b) in bytes.iter().enumerate() {
            let position = offset + i as u64;
            let chunk = self.chunks.entry(position / CHUNK_SIZE).or_insert([0; CHUNK_SIZE as usize]);
            chunk[(position % CHUNK_SIZE) as usize] = b;
        }
    }

    pub fn byte(&self, position: u64) -> u8 {
        match self.chunks.get(&(position / CHUNK_SIZE)) {
            Some(chunk) => chunk[(position % CHUNK_SIZE) as usize],
            None => 0,
        }
    }
}

impl Region for SparseImage {
    type Error = RegionError;

    fn size(&self) -> u64 {
        self.size
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<(), RegionError> {
        let length = buf.len() as u64;
        match offset.checked_add(length) {
            Some(end) if end <= self.size => (),
            _ => return Err(RegionError::OutOfRange { offset, length, size: self.size }),
        }
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.byte(offset + i as u64);
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Layout {
    pub variant: FatVariant,
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub number_of_fats: u8,
    pub root_entries: u16,
    pub total_sectors: u32,
    pub fat_size: u32,
}

impl Layout {
    /// 1.44M floppy, 2847 clusters
    pub fn fat12() -> Self {
        Self {
            variant: FatVariant::FAT12,
            bytes_per_sector: 512,
            sectors_per_cluster: 1,
            reserved_sectors: 1,
            number_of_fats: 2,
            root_entries: 224,
            total_sectors: 2880,
            fat_size: 9,
        }
    }

    /// 5000 clusters
    pub fn fat16() -> Self {
        Self {
            variant: FatVariant::FAT16,
            bytes_per_sector: 512,
            sectors_per_cluster: 1,
            reserved_sectors: 1,
            number_of_fats: 1,
            root_entries: 512,
            total_sectors: 5053,
            fat_size: 20,
        }
    }

    /// 70000 clusters
    pub fn fat32() -> Self {
        Self {
            variant: FatVariant::FAT32,
            bytes_per_sector: 512,
            sectors_per_cluster: 1,
            reserved_sectors: 32,
            number_of_fats: 2,
            root_entries: 0,
            total_sectors: 71126,
            fat_size: 547,
        }
    }

    pub fn sector_size(&self) -> u64 {
        self.bytes_per_sector as u64
    }

    pub fn cluster_size(&self) -> u64 {
        self.sector_size() * self.sectors_per_cluster as u64
    }

    pub fn root_dir_sectors(&self) -> u64 {
        (self.root_entries as u64 * 32).div_ceil(self.sector_size())
    }

    pub fn first_root_sector(&self) -> u64 {
        self.reserved_sectors as u64 + self.number_of_fats as u64 * self.fat_size as u64
    }

    pub fn first_data_sector(&self) -> u64 {
        self.first_root_sector() + self.root_dir_sectors()
    }

    fn boot_sector(&self) -> [u8; 512] {
        let mut bytes = [0u8; 512];
        bytes[..3].copy_from_slice(&[0xEB, 0x3C, 0x90]);
        bytes[3..11].copy_from_slice(b"MKFS.FAT");
        bytes[11..13].copy_from_slice(&self.bytes_per_sector.to_le_bytes());
        bytes[13] = self.sectors_per_cluster;
        bytes[14..16].copy_from_slice(&self.reserved_sectors.to_le_bytes());
        bytes[16] = self.number_of_fats;
        bytes[17..19].copy_from_slice(&self.root_entries.to_le_bytes());
        bytes[21] = 0xF8;
        bytes[24..26].copy_from_slice(&32u16.to_le_bytes());
        bytes[26..28].copy_from_slice(&64u16.to_le_bytes());
        let ebr = match self.variant {
            FatVariant::FAT32 => {
                bytes[32..36].copy_from_slice(&self.total_sectors.to_le_bytes());
                bytes[36..40].copy_from_slice(&self.fat_size.to_le_bytes());
                bytes[44..48].copy_from_slice(&2u32.to_le_bytes());
                bytes[48..50].copy_from_slice(&1u16.to_le_bytes());
                bytes[50..52].copy_from_slice(&6u16.to_le_bytes());
                bytes[82..90].copy_from_slice(b"FAT32   ");
                64
            }
            _ => {
                match u16::try_from(self.total_sectors) {
                    Ok(sectors) => bytes[19..21].copy_from_slice(&sectors.to_le_bytes()),
                    Err(_) => bytes[32..36].copy_from_slice(&self.total_sectors.to_le_bytes()),
                }
                bytes[22..24].copy_from_slice(&(self.fat_size as u16).to_le_bytes());
                let name = match self.variant {
                    FatVariant::FAT12 => b"FAT12   ",
                    _ => b"FAT16   ",
                };
                bytes[54..62].copy_from_slice(name);
                36
            }
        };
        bytes[ebr] = 0x80;
        bytes[ebr + 2] = 0x29;
        bytes[ebr + 3..ebr + 7].copy_from_slice(&0xCAFE_F00Du32.to_le_bytes());
        bytes[ebr + 7..ebr + 18].copy_from_slice(b"BOOT LABEL ");
        bytes[510..].copy_from_slice(&[0x55, 0xAA]);
        bytes
    }
}

pub fn archive() -> Attributes {
    let mut attributes = Attributes::default();
    attributes.set_archive(true);
    attributes
}

pub fn directory() -> Attributes {
    let mut attributes = Attributes::default();
    attributes.set_directory(true);
    attributes
}

pub fn file(name: &[u8; 11], cluster: u32, size: u32) -> DirectoryRecord {
    DirectoryRecord::new(*name, archive(), cluster, size)
}

pub fn subdirectory(name: &[u8; 11], cluster: u32) -> DirectoryRecord {
    DirectoryRecord::new(*name, directory(), cluster, 0)
}

pub fn label(name: &[u8; 11]) -> DirectoryRecord {
    DirectoryRecord::new(*name, Attributes::from(0x08), 0, 0)
}

/// Deterministic file content
pub fn pattern(length: usize) -> Vec<u8> {
    (0..length).map(|i| (i * 7 + i / 251) as u8).collect()
}

pub struct ImageBuilder {
    pub layout: Layout,
    offset: u64,
    image: SparseImage,
}

impl ImageBuilder {
    /// Volume placed `offset` bytes into the image
    pub fn new(layout: Layout, offset: u64) -> Self {
        let size = offset + layout.total_sectors as u64 * layout.sector_size();
        let mut image = SparseImage::new(size);
        image.write(offset, &layout.boot_sector());
        let mut builder = Self { layout, offset, image };
        let end_of_chain = builder.end_of_chain();
        builder.set_entry(0, end_of_chain & !0xFF | 0xF8);
        builder.set_entry(1, end_of_chain);
        builder
    }

    pub fn end_of_chain(&self) -> u32 {
        match self.layout.variant {
            FatVariant::FAT12 => 0xFFF,
            FatVariant::FAT16 => 0xFFFF,
            _ => 0x0FFF_FFFF,
        }
    }

    /// Write FAT entry into every FAT copy
    pub fn set_entry(&mut self, cluster: u32, value: u32) {
        let layout = self.layout;
        for copy in 0..layout.number_of_fats as u64 {
            let fat = self.offset
                + (layout.reserved_sectors as u64 + copy * layout.fat_size as u64) * layout.sector_size();
            let index = cluster as u64;
            match layout.variant {
                FatVariant::FAT12 => {
                    let position = fat + index + index / 2;
                    let old = [self.image.byte(position), self.image.byte(position + 1)];
                    let old = u16::from_le_bytes(old);
                    let value = value as u16 & 0xFFF;
                    let new = match index & 1 {
                        0 => (old & 0xF000) | value,
                        _ => (old & 0x000F) | (value << 4),
                    };
                    self.image.write(position, &new.to_le_bytes());
                }
                FatVariant::FAT16 => self.image.write(fat + index * 2, &(value as u16).to_le_bytes()),
                _ => self.image.write(fat + index * 4, &value.to_le_bytes()),
            }
        }
    }

    /// Link clusters in order, last one marked end-of-chain
    pub fn link(&mut self, clusters: &[u32]) {
        for pair in clusters.windows(2) {
            self.set_entry(pair[0], pair[1]);
        }
        if let Some(&last) = clusters.last() {
            let end_of_chain = self.end_of_chain();
            self.set_entry(last, end_of_chain);
        }
    }

    pub fn cluster_offset(&self, cluster: u32) -> u64 {
        let sector = self.layout.first_data_sector()
            + (cluster as u64 - 2) * self.layout.sectors_per_cluster as u64;
        self.offset + sector * self.layout.sector_size()
    }

    pub fn write_cluster(&mut self, cluster: u32, bytes: &[u8]) {
        assert!(bytes.len() as u64 <= self.layout.cluster_size());
        let offset = self.cluster_offset(cluster);
        self.image.write(offset, bytes);
    }

    /// Link `clusters` and spread `content` over them
    pub fn write_chain(&mut self, clusters: &[u32], content: &[u8]) {
        self.link(clusters);
        let cluster_size = self.layout.cluster_size() as usize;
        for (&cluster, chunk) in clusters.iter().zip(content.chunks(cluster_size)) {
            self.write_cluster(cluster, chunk);
        }
    }

    pub fn write_directory(&mut self, clusters: &[u32], records: &[DirectoryRecord]) {
        let bytes: Vec<u8> = records.iter().flat_map(|r| r.to_bytes()).collect();
        self.write_chain(clusters, &bytes);
    }

    /// Fixed root directory region of FAT12/16
    pub fn write_fixed_root(&mut self, records: &[DirectoryRecord]) {
        let offset = self.offset + self.layout.first_root_sector() * self.layout.sector_size();
        let bytes: Vec<u8> = records.iter().flat_map(|r| r.to_bytes()).collect();
        assert!(bytes.len() as u64 <= self.layout.root_dir_sectors() * self.layout.sector_size());
        self.image.write(offset, &bytes);
    }

    /// Raw write relative to volume start
    pub fn write(&mut self, offset: u64, bytes: &[u8]) {
        self.image.write(self.offset + offset, bytes);
    }

    pub fn build(self) -> SparseImage {
        self.image
    }
}
