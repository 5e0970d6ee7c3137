use core::fmt::{Debug, Display};

use displaydoc::Display;
use thiserror::Error;

use crate::region::fat::ClusterRef;
use crate::types::ClusterID;
use crate::variant::FatVariant;

/// On-disk structures are inconsistent or corrupted
#[derive(Copy, Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum DataError {
    /// Malformed boot sector: field {field} at offset {offset}
    MalformedBootSector { field: &'static str, offset: usize },
    /// FAT lookup of cluster {cluster} at byte {offset} exceeds table of {length} bytes
    FatTableOutOfBounds { cluster: ClusterID, offset: usize, length: usize },
    /// Cluster chain reaches {entry} entry of cluster {cluster}
    CorruptChain { cluster: ClusterID, entry: ClusterRef },
    /// Cluster chain revisits cluster {0}
    CyclicChain(ClusterID),
    /// Cluster {0} lies outside of data region
    ClusterOutOfRange(ClusterID),
    /// Cluster chain ends before byte {0}
    UnexpectedEndOfChain(u64),
}

#[derive(Copy, Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum ImplementationError {
    /// {0} not supported
    UnsupportedVariant(FatVariant),
}

#[derive(Copy, Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum InputError {
    /// Cluster {0} has no sector, data clusters start at 2
    InvalidCluster(ClusterID),
    /// Seek position out of range
    SeekPosition,
}

#[derive(Copy, Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum OperationError {
    /// No such file or directory
    NotFound,
    /// Not a directory
    NotADirectory,
    /// Not a file
    NotAFile,
}

/// Every failure surfaced by this crate, `E` being the error of the backing region
#[derive(Debug, Display, Error)]
pub enum Error<E: Debug + Display> {
    /// IO error: {0}
    IO(E),
    /// {0}
    Data(#[from] DataError),
    /// {0}
    Implementation(#[from] ImplementationError),
    /// {0}
    Input(#[from] InputError),
    /// {0}
    Operation(#[from] OperationError),
}
