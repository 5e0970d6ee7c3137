use alloc::vec::Vec;

use crate::error::{DataError, ImplementationError};
use crate::region::fat::ClusterRef;
use crate::types::ClusterID;
use crate::variant::FatVariant;

const FAT32_ENTRY_MASK: u32 = 0x0FFF_FFFF;

/// Anything able to resolve the successor of a cluster
pub trait NextCluster {
    fn next_cluster(&self, active: ClusterID) -> Result<ClusterRef, DataError>;
}

/// First copy of the FAT region, held in memory for the lifetime of a mount
#[derive(Clone, Debug)]
pub struct FatTable {
    variant: FatVariant,
    bytes: Vec<u8>,
}

impl FatTable {
    pub fn new(variant: FatVariant, bytes: Vec<u8>) -> Result<Self, ImplementationError> {
        if variant == FatVariant::ExFAT {
            return Err(ImplementationError::UnsupportedVariant(variant));
        }
        Ok(Self { variant, bytes })
    }

    pub fn variant(&self) -> FatVariant {
        self.variant
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of entries fully contained in the table
    pub fn capacity(&self) -> u32 {
        (self.bytes.len() as u64 * 8 / self.variant.entry_bits() as u64) as u32
    }

    /// Raw entry value, FAT32 entries are masked to their 28 significant bits
    pub fn entry(&self, active: ClusterID) -> Result<u32, DataError> {
        let index = u32::from(active) as u64;
        let (offset, width) = match self.variant {
            FatVariant::FAT12 => (index + index / 2, 2),
            FatVariant::FAT16 => (index * 2, 2),
            _ => (index * 4, 4),
        };
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let length = self.bytes.len();
        let option = offset.checked_add(width).and_then(|end| self.bytes.get(offset..end));
        let bytes = option.ok_or(DataError::FatTableOutOfBounds { cluster: active, offset, length })?;
        let value = match self.variant {
            FatVariant::FAT12 => {
                let value = u16::from_le_bytes([bytes[0], bytes[1]]) as u32;
                match index & 1 {
                    0 => value & 0xFFF,
                    _ => value >> 4,
                }
            }
            FatVariant::FAT16 => u16::from_le_bytes([bytes[0], bytes[1]]) as u32,
            _ => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) & FAT32_ENTRY_MASK,
        };
        Ok(value)
    }

    pub fn next_cluster(&self, active: ClusterID) -> Result<ClusterRef, DataError> {
        let value = self.entry(active)?;
        let entry = ClusterRef::decode(self.variant, value);
        trace!("FAT entry of cluster {} is {:X} ({})", active, value, entry);
        Ok(entry)
    }
}

impl NextCluster for FatTable {
    fn next_cluster(&self, active: ClusterID) -> Result<ClusterRef, DataError> {
        FatTable::next_cluster(self, active)
    }
}
