use derive_more::Display;

use crate::types::ClusterID;
use crate::variant::FatVariant;

/// What a FAT entry says about the cluster following the active one
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum ClusterRef {
    #[display("next cluster {_0}")]
    Data(ClusterID),
    #[display("end-of-chain")]
    EndOfChain,
    #[display("free")]
    Free,
    #[display("bad")]
    Bad,
}

impl ClusterRef {
    /// `value` is expected to be masked to the entry width already
    pub(crate) fn decode(variant: FatVariant, value: u32) -> Self {
        let (bad, end_of_chain) = match variant {
            FatVariant::FAT12 => (0xFF7, 0xFF8),
            FatVariant::FAT16 => (0xFFF7, 0xFFF8),
            _ => (0x0FFF_FFF7, 0x0FFF_FFF8),
        };
        match value {
            0 => Self::Free,
            value if value == bad => Self::Bad,
            value if value >= end_of_chain => Self::EndOfChain,
            value => Self::Data(value.into()),
        }
    }
}
