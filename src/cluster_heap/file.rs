use super::chain::ClusterChain;
use crate::error::{DataError, Error, InputError};
use crate::fat::FatTable;
use crate::io::Region;
use crate::types::ClusterID;
use crate::FileSystem;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SeekFrom {
    Start(u64),
    End(i64),
    Current(i64),
}

/// Read cursor over the cluster chain of one file
pub struct File<'a, R> {
    fs: &'a FileSystem<R>,
    first: ClusterID,
    size: u64,
    cursor: u64,
    chain: Option<ClusterChain<'a, FatTable>>,
    /// Index within the chain and id of the cluster last resolved
    current: Option<(u64, ClusterID)>,
}

impl<'a, R: Region> File<'a, R> {
    pub(crate) fn new(fs: &'a FileSystem<R>, first: ClusterID, size: u32) -> Self {
        Self { fs, first, size: size as u64, cursor: 0, chain: None, current: None }
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn position(&self) -> u64 {
        self.cursor
    }

    /// Resolve the cluster holding byte `index * cluster_size`,
    /// restarting from the first cluster when moving backwards
    fn locate(&mut self, index: u64) -> Result<ClusterID, DataError> {
        let restart = match self.current {
            Some((current, cluster)) if current == index => return Ok(cluster),
            Some((current, _)) => current > index,
            None => true,
        };
        if restart || self.chain.is_none() {
            let fs: &'a FileSystem<R> = self.fs;
            let last_cluster = fs.geometry().last_cluster();
            self.chain = Some(ClusterChain::new(fs.fat_table(), self.first, last_cluster));
            self.current = None;
        }
        let chain = match self.chain.as_mut() {
            Some(chain) => chain,
            None => return Err(DataError::UnexpectedEndOfChain(self.cursor)),
        };
        loop {
            let next = match self.current {
                Some((current, _)) => current + 1,
                None => 0,
            };
            let cluster = match chain.next() {
                Ok(Some(cluster)) => cluster,
                Ok(None) => return Err(DataError::UnexpectedEndOfChain(self.cursor)),
                Err(e) => {
                    // Walk again on next read, so the same error is reported
                    self.chain = None;
                    self.current = None;
                    return Err(e);
                }
            };
            self.current = Some((next, cluster));
            if next == index {
                return Ok(cluster);
            }
        }
    }

    /// Read some bytes, at most up to the end of current cluster,
    /// 0 once the cursor reaches the file size
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error<R::Error>> {
        if self.cursor >= self.size || buf.is_empty() {
            return Ok(0);
        }
        let fs: &'a FileSystem<R> = self.fs;
        let geometry = fs.geometry();
        let cluster_size = geometry.cluster_size() as u64;
        let cluster = self.locate(self.cursor / cluster_size)?;
        let offset = self.cursor % cluster_size;
        let length = (buf.len() as u64).min(cluster_size - offset).min(self.size - self.cursor);
        let sector = geometry.first_sector_of_cluster(cluster)?;
        let position = geometry.byte_offset(sector) + offset;
        fs.read_volume(position, &mut buf[..length as usize])?;
        self.cursor += length;
        Ok(length as usize)
    }

    /// Fill `buf` entirely, short files fail with `UnexpectedEndOfChain`
    pub fn read_exact(&mut self, mut buf: &mut [u8]) -> Result<(), Error<R::Error>> {
        while !buf.is_empty() {
            let length = self.read(buf)?;
            if length == 0 {
                return Err(DataError::UnexpectedEndOfChain(self.cursor).into());
            }
            buf = &mut buf[length..];
        }
        Ok(())
    }

    /// Change cursor position, valid positions are `0..=size`
    pub fn seek(&mut self, seek_from: SeekFrom) -> Result<u64, Error<R::Error>> {
        let option = match seek_from {
            SeekFrom::Start(cursor) => i64::try_from(cursor).ok(),
            SeekFrom::End(offset) => (self.size as i64).checked_add(offset),
            SeekFrom::Current(offset) => (self.cursor as i64).checked_add(offset),
        };
        let cursor = option.ok_or(Error::Input(InputError::SeekPosition))?;
        if cursor < 0 || cursor > self.size as i64 {
            return Err(InputError::SeekPosition.into());
        }
        self.cursor = cursor as u64;
        Ok(self.cursor)
    }
}
