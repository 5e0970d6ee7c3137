// Boot sector of FAT12/16/32 volume

use core::mem::size_of;

use super::{decode, Plain};
use crate::endian::Little as LE;
use crate::error::{DataError, ImplementationError};
use crate::variant::FatVariant;

pub(crate) const BOOT_SECTOR_SIZE: usize = 512;

const EXTENDED_BOOT_SIGNATURE: u8 = 0x29;
const EXTENDED_BOOT_SIGNATURE_ID_ONLY: u8 = 0x28;

#[derive(Copy, Clone, Debug)]
#[repr(C, packed(1))]
pub(crate) struct BootSector {
    pub jump_boot: [u8; 3],
    pub oem_name: [u8; 8],
    pub bytes_per_sector: LE<u16>,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: LE<u16>,
    pub number_of_fats: u8,
    pub root_entries: LE<u16>, // 0 for FAT32
    pub total_sectors_16: LE<u16>,
    pub media: u8,
    pub fat_size_16: LE<u16>, // 0 for FAT32
    pub sectors_per_track: LE<u16>,
    pub number_of_heads: LE<u16>,
    pub hidden_sectors: LE<u32>,
    pub total_sectors_32: LE<u32>,
    // FAT12/16: ExtendedBootRecord
    // FAT32: Fat32Extension followed by ExtendedBootRecord
    pub extended: [u8; 54],
    pub bootcode: [u8; 420],
    pub boot_signature: [u8; 2],
}

unsafe impl Plain for BootSector {}

#[derive(Copy, Clone, Debug, Default)]
#[repr(C, packed(1))]
pub(crate) struct Fat32Extension {
    pub fat_size_32: LE<u32>,
    pub extended_flags: LE<u16>,
    pub filesystem_version: LE<u16>,
    pub root_cluster: LE<u32>,
    pub filesystem_info: LE<u16>,
    pub backup_boot_sector: LE<u16>,
    _reserved: [u8; 12],
}

unsafe impl Plain for Fat32Extension {}

#[derive(Copy, Clone, Debug, Default)]
#[repr(C, packed(1))]
pub(crate) struct ExtendedBootRecord {
    pub drive_number: u8,
    _reserved: u8,
    pub boot_signature: u8,
    pub volume_id: LE<u32>,
    pub volume_label: [u8; 11],
    pub filesystem_type: [u8; 8],
}

unsafe impl Plain for ExtendedBootRecord {}

const _: () = assert!(size_of::<BootSector>() == BOOT_SECTOR_SIZE);
const _: () = assert!(size_of::<Fat32Extension>() + size_of::<ExtendedBootRecord>() == 54);

/// Build a `MalformedBootSector` error pointing at a boot sector field
macro_rules! malformed {
    (fat32 $field:ident) => {
        $crate::error::DataError::MalformedBootSector {
            field: stringify!($field),
            offset: memoffset::offset_of!($crate::region::boot::BootSector, extended)
                + memoffset::offset_of!($crate::region::boot::Fat32Extension, $field),
        }
    };
    ($field:ident) => {
        $crate::error::DataError::MalformedBootSector {
            field: stringify!($field),
            offset: memoffset::offset_of!($crate::region::boot::BootSector, $field),
        }
    };
}

pub(crate) use malformed;

/// Volume geometry as recorded in boot sector, read once at mount time
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BiosParameterBlock {
    pub jump_boot: [u8; 3],
    pub oem_name: [u8; 8],
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub number_of_fats: u8,
    pub root_entries: u16,
    pub total_sectors_16: u16,
    pub media: u8,
    pub fat_size_16: u16,
    pub sectors_per_track: u16,
    pub number_of_heads: u16,
    pub hidden_sectors: u32,
    pub total_sectors_32: u32,
    /// Only recorded when `fat_size_16` is 0
    pub fat_size_32: u32,
    /// Only recorded when `fat_size_16` is 0
    pub root_cluster: u32,
    /// Only recorded when `fat_size_16` is 0
    pub backup_boot_sector: u16,
    pub drive_number: u8,
    pub volume_id: Option<u32>,
    pub volume_label: Option<[u8; 11]>,
    pub filesystem_type: Option<[u8; 8]>,
}

impl BiosParameterBlock {
    /// Decode without checking plausibility of any field
    pub fn decode(bytes: &[u8]) -> Result<Self, DataError> {
        let boot_sector: BootSector = decode(bytes).ok_or(DataError::MalformedBootSector {
            field: "boot_sector",
            offset: bytes.len(),
        })?;
        let bytes_per_sector = boot_sector.bytes_per_sector.to_ne();
        let fat_size_16 = boot_sector.fat_size_16.to_ne();
        let extended = &boot_sector.extended[..];
        let (fat32, ebr_offset) = match (bytes_per_sector, fat_size_16) {
            (1.., 0) => (decode::<Fat32Extension>(extended), size_of::<Fat32Extension>()),
            _ => (None, 0),
        };
        let fat32 = fat32.unwrap_or_default();
        let ebr: ExtendedBootRecord = decode(&extended[ebr_offset..]).unwrap_or_default();
        let volume_id = Some(ebr.volume_id.to_ne());
        let (volume_id, volume_label, filesystem_type) = match ebr.boot_signature {
            EXTENDED_BOOT_SIGNATURE => (volume_id, Some(ebr.volume_label), Some(ebr.filesystem_type)),
            EXTENDED_BOOT_SIGNATURE_ID_ONLY => (volume_id, None, None),
            _ => (None, None, None),
        };
        if boot_sector.boot_signature != hex!("55 AA") {
            debug!("Boot sector signature {:02X?} missing", boot_sector.boot_signature);
        }
        Ok(Self {
            jump_boot: boot_sector.jump_boot,
            oem_name: boot_sector.oem_name,
            bytes_per_sector,
            sectors_per_cluster: boot_sector.sectors_per_cluster,
            reserved_sectors: boot_sector.reserved_sectors.to_ne(),
            number_of_fats: boot_sector.number_of_fats,
            root_entries: boot_sector.root_entries.to_ne(),
            total_sectors_16: boot_sector.total_sectors_16.to_ne(),
            media: boot_sector.media,
            fat_size_16,
            sectors_per_track: boot_sector.sectors_per_track.to_ne(),
            number_of_heads: boot_sector.number_of_heads.to_ne(),
            hidden_sectors: boot_sector.hidden_sectors.to_ne(),
            total_sectors_32: boot_sector.total_sectors_32.to_ne(),
            fat_size_32: fat32.fat_size_32.to_ne(),
            root_cluster: fat32.root_cluster.to_ne(),
            backup_boot_sector: fat32.backup_boot_sector.to_ne(),
            drive_number: ebr.drive_number,
            volume_id,
            volume_label,
            filesystem_type,
        })
    }

    pub fn has_exfat_signature(&self) -> bool {
        self.jump_boot == hex!("EB 76 90") && &self.oem_name == b"EXFAT   "
    }

    /// 16-bit field when nonzero, otherwise the volume is too large for it
    pub fn total_sectors(&self) -> u32 {
        match self.total_sectors_16 {
            0 => self.total_sectors_32,
            sectors => sectors as u32,
        }
    }

    /// 16-bit FAT size, FAT32 volumes record 0 here and
    /// must use [`fat32_size_sectors`](Self::fat32_size_sectors) instead
    pub fn fat_size_sectors(&self) -> Result<u16, ImplementationError> {
        match self.fat_size_16 {
            0 => Err(ImplementationError::UnsupportedVariant(FatVariant::FAT32)),
            sectors => Ok(sectors),
        }
    }

    pub fn fat32_size_sectors(&self) -> u32 {
        self.fat_size_32
    }
}
