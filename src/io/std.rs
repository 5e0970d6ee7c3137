use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Mutex;

use displaydoc::Display;
use thiserror::Error;

use super::{Region, RegionError};

#[derive(Debug, Display, Error)]
pub enum FileError {
    /// {0}
    Region(#[from] RegionError),
    /// {0}
    IO(#[from] std::io::Error),
}

/// Window of an image file, read with seek + read_exact
#[derive(Debug)]
pub struct FileRegion {
    file: Mutex<File>,
    offset: u64,
    length: u64,
}

impl FileRegion {
    /// Map the whole file
    pub fn open<P: AsRef<Path>>(filepath: P) -> Result<Self, FileError> {
        let file = File::open(filepath)?;
        let length = file.metadata()?.len();
        Ok(Self { file: Mutex::new(file), offset: 0, length })
    }

    /// Map `length` bytes at `offset`, the file must be long enough
    pub fn map(file: File, offset: u64, length: u64) -> Result<Self, FileError> {
        let size = file.metadata()?.len();
        match offset.checked_add(length) {
            Some(end) if end <= size => Ok(Self { file: Mutex::new(file), offset, length }),
            _ => Err(RegionError::MapError { offset, length, size }.into()),
        }
    }
}

impl Region for FileRegion {
    type Error = FileError;

    fn size(&self) -> u64 {
        self.length
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<(), FileError> {
        let length = buf.len() as u64;
        match offset.checked_add(length) {
            Some(end) if end <= self.length => (),
            _ => return Err(RegionError::OutOfRange { offset, length, size: self.length }.into()),
        }
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        file.seek(SeekFrom::Start(self.offset + offset))?;
        file.read_exact(buf)?;
        Ok(())
    }
}
