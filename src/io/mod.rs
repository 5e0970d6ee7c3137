#[cfg(feature = "std")]
pub mod std;

use alloc::vec::Vec;
use core::fmt::{Debug, Display};

use displaydoc::Display;
use thiserror::Error;

#[derive(Copy, Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum RegionError {
    /// Read of {length} bytes at {offset} exceeds region of {size} bytes
    OutOfRange { offset: u64, length: u64, size: u64 },
    /// Cannot map {length} bytes at {offset} from region of {size} bytes
    MapError { offset: u64, length: u64, size: u64 },
}

/// Byte-addressable view of a disk image, the only thing a mount needs
pub trait Region {
    type Error: Debug + Display + From<RegionError>;

    fn size(&self) -> u64;
    /// Fill `buf` entirely or fail, partial reads are never reported
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// `offset..offset + length` lies within `size` bytes
pub(crate) fn check(offset: u64, length: u64, size: u64) -> Result<(), RegionError> {
    match offset.checked_add(length) {
        Some(end) if end <= size => Ok(()),
        _ => Err(RegionError::OutOfRange { offset, length, size }),
    }
}

impl Region for [u8] {
    type Error = RegionError;

    fn size(&self) -> u64 {
        self.len() as u64
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<(), RegionError> {
        check(offset, buf.len() as u64, self.size())?;
        let offset = offset as usize;
        buf.copy_from_slice(&self[offset..offset + buf.len()]);
        Ok(())
    }
}

impl Region for Vec<u8> {
    type Error = RegionError;

    fn size(&self) -> u64 {
        self.as_slice().size()
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<(), RegionError> {
        self.as_slice().read_at(offset, buf)
    }
}

impl<T: Region + ?Sized> Region for &T {
    type Error = T::Error;

    fn size(&self) -> u64 {
        (**self).size()
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<(), T::Error> {
        (**self).read_at(offset, buf)
    }
}

/// Window of `length` bytes starting at `offset` of another region
#[derive(Clone, Debug)]
pub struct Mapped<R> {
    region: R,
    offset: u64,
    length: u64,
}

impl<R: Region> Mapped<R> {
    pub fn into_inner(self) -> R {
        self.region
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl<R: Region> Region for Mapped<R> {
    type Error = R::Error;

    fn size(&self) -> u64 {
        self.length
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<(), R::Error> {
        check(offset, buf.len() as u64, self.length)?;
        self.region.read_at(self.offset + offset, buf)
    }
}

/// Map a window of `region`, failing with [`RegionError::MapError`]
/// when the region is shorter than `offset + length`
pub fn map<R: Region>(region: R, offset: u64, length: u64) -> Result<Mapped<R>, RegionError> {
    let size = region.size();
    match offset.checked_add(length) {
        Some(end) if end <= size => Ok(Mapped { region, offset, length }),
        _ => Err(RegionError::MapError { offset, length, size }),
    }
}
