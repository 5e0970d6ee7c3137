use std::fs::File;

use derive_more::Display;
use fat::io::std::{FileError, FileRegion};
use fat::io::Region;
use fat::FileSystem;
use mbr_nostd::{MasterBootRecord, PartitionTable};
use thiserror::Error;

const MBR_SECTOR_SIZE: u64 = 512;

#[derive(Debug, Display, Error)]
pub enum Error {
    #[display("{_0}")]
    FS(#[from] fat::error::Error<FileError>),
    #[display("{_0}")]
    File(#[from] FileError),
    #[display("{_0}")]
    String(&'static str),
}

/// Locate MBR partition by index, returns byte offset and length
fn partition(device: &str, index: usize) -> Result<(u64, u64), Error> {
    let region = FileRegion::open(device)?;
    let mut buffer = [0u8; MBR_SECTOR_SIZE as usize];
    region.read_at(0, &mut buffer)?;
    let mbr = MasterBootRecord::from_bytes(&buffer).map_err(|_| Error::String("Not MBR"))?;
    let entries = mbr.partition_table_entries();
    let entry = entries.get(index).ok_or(Error::String("Partition out of range"))?;
    if entry.sector_count == 0 {
        return Err(Error::String("Invalid partition"));
    }
    let offset = entry.logical_block_address as u64 * MBR_SECTOR_SIZE;
    let length = entry.sector_count as u64 * MBR_SECTOR_SIZE;
    log::trace!("Partition {} offset {} length {}", index, offset, length);
    Ok((offset, length))
}

pub fn open(
    device: &str,
    offset: Option<u64>,
    index: Option<usize>,
) -> Result<FileSystem<FileRegion>, Error> {
    let region = match (index, offset) {
        (Some(_), Some(_)) => return Err(Error::String("Offset conflicts with partition")),
        (Some(index), None) => {
            let (offset, length) = partition(device, index)?;
            let file = File::open(device).map_err(FileError::from)?;
            FileRegion::map(file, offset, length)?
        }
        (None, offset) => {
            let region = FileRegion::open(device)?;
            return Ok(fat::mount(region, offset.unwrap_or(0))?);
        }
    };
    Ok(fat::mount(region, 0)?)
}
