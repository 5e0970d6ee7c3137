use alloc::vec;
use alloc::vec::Vec;

use super::chain::ClusterChain;
use crate::error::Error;
use crate::fat::NextCluster;
use crate::fs::Geometry;
use crate::io::{self, Region};
use crate::region::data::entry::{DirectoryRecord, Slot};
use crate::region::data::{RawEntry, ENTRY_SIZE};
use crate::types::ClusterID;

/// Live records of one directory level, in on-disk order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directory {
    entries: Vec<DirectoryRecord>,
}

impl Directory {
    /// Every live record, including volume labels and long-name fragments
    pub fn entries(&self) -> &[DirectoryRecord] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &DirectoryRecord> {
        self.entries.iter()
    }

    /// Files and subdirectories only
    pub fn files(&self) -> impl Iterator<Item = &DirectoryRecord> {
        self.entries.iter().filter(|r| !r.is_volume_label() && !r.is_long_name())
    }

    pub fn volume_label(&self) -> Option<&DirectoryRecord> {
        self.entries.iter().find(|r| r.is_volume_label())
    }

    /// Case-insensitive match against `NAME.EXT`
    pub fn find(&self, name: &str) -> Option<&DirectoryRecord> {
        self.files().find(|r| r.name().as_str().eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode consecutive 32-byte slots, returns true once end of directory is seen
    pub(crate) fn scan(&mut self, bytes: &[u8]) -> bool {
        for chunk in bytes.chunks_exact(ENTRY_SIZE) {
            let mut raw: RawEntry = [0; ENTRY_SIZE];
            raw.copy_from_slice(chunk);
            match DirectoryRecord::decode(&raw) {
                Slot::Record(record) => self.entries.push(record),
                Slot::Deleted => continue,
                Slot::EndOfDirectory => return true,
            }
        }
        false
    }

    /// FAT12/16 root directory, a fixed region that never involves the FAT
    pub(crate) fn read_fixed<R: Region>(
        region: &R,
        offset: u64,
        length: usize,
    ) -> Result<Self, Error<R::Error>> {
        io::check(offset, length as u64, region.size()).map_err(|e| Error::IO(e.into()))?;
        let mut bytes = vec![0u8; length];
        region.read_at(offset, &mut bytes).map_err(Error::IO)?;
        let mut directory = Self::default();
        directory.scan(&bytes);
        debug!("Fixed root directory holds {} records", directory.len());
        Ok(directory)
    }

    /// Directory stored in a cluster chain, `base` being the volume offset
    pub(crate) fn read_chain<R: Region, T: NextCluster>(
        region: &R,
        base: u64,
        geometry: &Geometry,
        table: &T,
        first: ClusterID,
    ) -> Result<Self, Error<R::Error>> {
        let cluster_size = geometry.cluster_size() as u64;
        io::check(base, cluster_size, region.size()).map_err(|e| Error::IO(e.into()))?;
        let mut bytes = vec![0u8; cluster_size as usize];
        let mut chain = ClusterChain::new(table, first, geometry.last_cluster());
        let mut directory = Self::default();
        while let Some(cluster) = chain.next()? {
            let sector = geometry.first_sector_of_cluster(cluster)?;
            let offset = base + geometry.byte_offset(sector);
            region.read_at(offset, &mut bytes).map_err(Error::IO)?;
            if directory.scan(&bytes) {
                break;
            }
        }
        trace!("Directory at cluster {} holds {} records", first, directory.len());
        Ok(directory)
    }
}

impl<'a> IntoIterator for &'a Directory {
    type Item = &'a DirectoryRecord;
    type IntoIter = core::slice::Iter<'a, DirectoryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod test {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::Directory;
    use crate::cluster_heap::chain::test::MockTable;
    use crate::error::{DataError, Error};
    use crate::fs::Geometry;
    use crate::region::boot::test::floppy;
    use crate::region::boot::BiosParameterBlock;
    use crate::region::data::entry::{Attributes, DirectoryRecord};
    use crate::region::fat::ClusterRef;
    use crate::types::ClusterID;

    fn record(name: &[u8; 11]) -> DirectoryRecord {
        let mut attributes = Attributes::default();
        attributes.set_archive(true);
        DirectoryRecord::new(*name, attributes, 0, 0)
    }

    fn records(names: &[&[u8; 11]]) -> Vec<u8> {
        names.iter().flat_map(|name| record(name).to_bytes()).collect()
    }

    #[test]
    fn test_scan_stops_at_end() {
        let mut bytes = records(&[b"A          ", b"B          ", b"C          "]);
        bytes.extend_from_slice(&[0u8; 32]);
        bytes.extend(records(&[b"HIDDEN     "]));
        let mut directory = Directory::default();
        assert!(directory.scan(&bytes));
        assert_eq!(directory.len(), 3);
        let names: Vec<u8> = directory.iter().map(|r| r.raw_name()[0]).collect();
        assert_eq!(names, b"ABC");
    }

    #[test]
    fn test_scan_skips_deleted() {
        let mut bytes = records(&[b"A          ", b"B          ", b"C          "]);
        bytes[32] = 0xE5;
        let mut directory = Directory::default();
        assert!(!directory.scan(&bytes));
        assert_eq!(directory.len(), 2);
        assert!(directory.find("b").is_none());
        assert!(directory.find("c").is_some());
    }

    #[test]
    fn test_files_and_find() {
        let label = DirectoryRecord::new(*b"VOLUME     ", Attributes::from(0x08), 0, 0);
        let long_name = DirectoryRecord::new(*b"Ah\0i\0\0\0\0\0\0\0", Attributes::from(0x0F), 0, 0);
        let mut bytes = label.to_bytes().to_vec();
        bytes.extend_from_slice(&long_name.to_bytes());
        bytes.extend(records(&[b"HI      TXT"]));
        let mut directory = Directory::default();
        directory.scan(&bytes);
        assert_eq!(directory.len(), 3);
        assert_eq!(directory.files().count(), 1);
        assert_eq!(directory.volume_label(), Some(&label));
        assert_eq!(directory.find("hi.txt").map(|r| r.raw_name()), Some(*b"HI      TXT"));
        assert!(directory.find("VOLUME").is_none());
    }

    #[test]
    fn test_read_fixed() {
        let mut image = vec![0u8; 1024];
        image[512..512 + 64].copy_from_slice(&records(&[b"A          ", b"B          "]));
        let directory = Directory::read_fixed(&image, 512, 512).unwrap();
        assert_eq!(directory.len(), 2);
        assert!(matches!(Directory::read_fixed(&image, 1000, 512), Err(Error::IO(_))));
    }

    fn geometry() -> Geometry {
        // 1 sector per cluster, data region starts at sector 33
        Geometry::new(&BiosParameterBlock::decode(&floppy()).unwrap()).unwrap()
    }

    fn cluster_offset(cluster: u32) -> usize {
        (33 + cluster as usize - 2) * 512
    }

    #[test]
    fn test_read_chain() {
        let mut image = vec![0u8; cluster_offset(10)];
        let full: Vec<[u8; 11]> = (0..16u8)
            .map(|i| {
                let mut name = *b"FILE    BIN";
                name[4] = b'A' + i;
                name
            })
            .collect();
        let names: Vec<&[u8; 11]> = full.iter().collect();
        image[cluster_offset(3)..cluster_offset(4)].copy_from_slice(&records(&names));
        image[cluster_offset(7)..cluster_offset(7) + 32].copy_from_slice(&records(&[b"LAST       "]));

        // End of directory inside cluster 7 stops the walk before cluster 8 is looked up
        let table = MockTable::chain(&[3, 7, 8]);
        let directory = Directory::read_chain(&image, 0, &geometry(), &table, ClusterID::from(3));
        let directory = directory.unwrap();
        assert_eq!(directory.len(), 17);
        assert!(directory.find("LAST").is_some());
        assert!(directory.find("fileA.bin").is_some());
        assert_eq!(table.lookups.get(), 1);
    }

    #[test]
    fn test_read_chain_corrupt() {
        let mut image = vec![0u8; cluster_offset(10)];
        image[cluster_offset(3)..cluster_offset(4)].fill(b'X');
        let table = MockTable::new(&[(3, ClusterRef::Data(ClusterID::from(3)))]);
        let result = Directory::read_chain(&image, 0, &geometry(), &table, ClusterID::from(3));
        assert!(matches!(result, Err(Error::Data(DataError::CyclicChain(_)))));
    }
}
