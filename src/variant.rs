use derive_more::Display;

use crate::error::DataError;
use crate::fs::Geometry;
use crate::region::boot::{malformed, BiosParameterBlock};

const FAT12_MAX_CLUSTERS: u32 = 4085;
const FAT16_MAX_CLUSTERS: u32 = 65525;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum FatVariant {
    FAT12,
    FAT16,
    FAT32,
    ExFAT,
}

impl FatVariant {
    /// Cluster count alone decides the variant of a FAT volume
    pub fn from_cluster_count(total_clusters: u32) -> Self {
        match total_clusters {
            n if n < FAT12_MAX_CLUSTERS => Self::FAT12,
            n if n < FAT16_MAX_CLUSTERS => Self::FAT16,
            _ => Self::FAT32,
        }
    }

    /// Width of one FAT entry in bits
    pub fn entry_bits(&self) -> u32 {
        match self {
            Self::FAT12 => 12,
            Self::FAT16 => 16,
            Self::FAT32 | Self::ExFAT => 32,
        }
    }

    /// Root directory lives in a fixed region instead of a cluster chain
    pub fn has_fixed_root(&self) -> bool {
        matches!(self, Self::FAT12 | Self::FAT16)
    }
}

/// Classify a volume once its geometry is known to be consistent
pub fn classify(bpb: &BiosParameterBlock) -> Result<FatVariant, DataError> {
    if bpb.bytes_per_sector == 0 {
        // Root directory entries only exist on FAT12/16
        if bpb.root_entries != 0 {
            return Err(malformed!(bytes_per_sector));
        }
        if !bpb.has_exfat_signature() {
            debug!("Zero bytes per sector without ExFAT signature");
        }
        return Ok(FatVariant::ExFAT);
    }
    let geometry = Geometry::new(bpb)?;
    Ok(FatVariant::from_cluster_count(geometry.total_clusters()))
}
