/// Boot sector, BIOS parameter block and extended boot record
/// 1 sector at the very beginning of reserved region
pub(crate) mod boot;

/// FAT region, [`number-of-fats`][link] copies of [`fat-size`][link] sectors each,
/// entries are 12, 16 or 28 bits wide depending on variant
///
/// [link]: boot::BootSector
pub(crate) mod fat;

/// Root directory region (FAT12/16 only) and data region
pub(crate) mod data;

use core::mem::size_of;
use core::slice;

/// Fixed-layout on-disk structure made only of bytes and [`Little`] integers,
/// so that every bit pattern is a valid value
///
/// [`Little`]: crate::endian::Little
pub(crate) unsafe trait Plain: Copy {}

/// Reinterpret leading bytes as `T`, `None` when too short
pub(crate) fn decode<T: Plain>(bytes: &[u8]) -> Option<T> {
    if bytes.len() < size_of::<T>() {
        return None;
    }
    Some(unsafe { core::ptr::read_unaligned(bytes.as_ptr() as *const T) })
}

pub(crate) fn encode<T: Plain>(value: &T) -> &[u8] {
    unsafe { slice::from_raw_parts(value as *const T as *const u8, size_of::<T>()) }
}
