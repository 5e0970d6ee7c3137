use crate::error::{DataError, InputError};
use crate::region::boot::{malformed, BiosParameterBlock};
use crate::region::data::ENTRY_SIZE;
use crate::types::{ClusterID, SectorID};

/// Region boundaries derived from [`BiosParameterBlock`], all in sectors unless noted
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Geometry {
    bytes_per_sector: u32,
    sectors_per_cluster: u32,
    reserved_sectors: u32,
    number_of_fats: u32,
    total_sectors: u32,
    fat_size: u32,
    root_dir_sectors: u32,
    total_clusters: u32,
}

impl Geometry {
    pub fn new(bpb: &BiosParameterBlock) -> Result<Self, DataError> {
        if !bpb.bytes_per_sector.is_power_of_two() {
            return Err(malformed!(bytes_per_sector));
        }
        if !bpb.sectors_per_cluster.is_power_of_two() {
            return Err(malformed!(sectors_per_cluster));
        }
        if bpb.reserved_sectors == 0 {
            return Err(malformed!(reserved_sectors));
        }
        if bpb.number_of_fats == 0 {
            return Err(malformed!(number_of_fats));
        }
        let fat_size = match bpb.fat_size_sectors() {
            Ok(sectors) => sectors as u32,
            Err(_) => bpb.fat32_size_sectors(),
        };
        if fat_size == 0 {
            return Err(malformed!(fat32 fat_size_32));
        }
        let total_sectors = bpb.total_sectors();
        if total_sectors == 0 {
            return Err(malformed!(total_sectors_32));
        }

        let bytes_per_sector = bpb.bytes_per_sector as u32;
        let root_dir_bytes = bpb.root_entries as u32 * ENTRY_SIZE as u32;
        let root_dir_sectors = root_dir_bytes.div_ceil(bytes_per_sector);
        let metadata_sectors = bpb.reserved_sectors as u64
            + bpb.number_of_fats as u64 * fat_size as u64
            + root_dir_sectors as u64;
        if metadata_sectors > total_sectors as u64 {
            return Err(match bpb.total_sectors_16 {
                0 => malformed!(total_sectors_32),
                _ => malformed!(total_sectors_16),
            });
        }
        let data_sectors = total_sectors - metadata_sectors as u32;
        Ok(Self {
            bytes_per_sector,
            sectors_per_cluster: bpb.sectors_per_cluster as u32,
            reserved_sectors: bpb.reserved_sectors as u32,
            number_of_fats: bpb.number_of_fats as u32,
            total_sectors,
            fat_size,
            root_dir_sectors,
            total_clusters: data_sectors / bpb.sectors_per_cluster as u32,
        })
    }

    pub fn bytes_per_sector(&self) -> u32 {
        self.bytes_per_sector
    }

    pub fn sectors_per_cluster(&self) -> u32 {
        self.sectors_per_cluster
    }

    /// In bytes
    pub fn cluster_size(&self) -> u32 {
        self.bytes_per_sector * self.sectors_per_cluster
    }

    pub fn number_of_fats(&self) -> u32 {
        self.number_of_fats
    }

    pub fn total_sectors(&self) -> u32 {
        self.total_sectors
    }

    /// Size of one FAT copy
    pub fn fat_size_sectors(&self) -> u32 {
        self.fat_size
    }

    /// Always 0 on FAT32
    pub fn root_dir_sectors(&self) -> u32 {
        self.root_dir_sectors
    }

    pub fn data_sectors(&self) -> u32 {
        self.total_sectors - self.first_data_sector_index()
    }

    pub fn total_clusters(&self) -> u32 {
        self.total_clusters
    }

    /// Highest cluster id addressing the data region
    pub fn last_cluster(&self) -> ClusterID {
        ClusterID::from(self.total_clusters.saturating_add(1))
    }

    pub fn first_fat_sector(&self) -> SectorID {
        SectorID::BOOT + self.reserved_sectors
    }

    /// FAT12/16 only, equals to first data sector on FAT32
    pub fn first_root_directory_sector(&self) -> SectorID {
        self.first_fat_sector() + self.number_of_fats * self.fat_size
    }

    fn first_data_sector_index(&self) -> u32 {
        self.reserved_sectors + self.number_of_fats * self.fat_size + self.root_dir_sectors
    }

    pub fn first_data_sector(&self) -> SectorID {
        SectorID::BOOT + self.first_data_sector_index()
    }

    /// Defined for clusters within `2..=last_cluster()` only
    pub fn first_sector_of_cluster(&self, cluster: ClusterID) -> Result<SectorID, InputError> {
        if !cluster.valid() || cluster > self.last_cluster() {
            return Err(InputError::InvalidCluster(cluster));
        }
        Ok(self.first_data_sector() + cluster.offset() * self.sectors_per_cluster)
    }

    /// Byte offset of sector relative to volume start
    pub fn byte_offset(&self, sector: SectorID) -> u64 {
        u32::from(sector) as u64 * self.bytes_per_sector as u64
    }
}
