use derive_more::{Display, From, Into};

#[derive(Copy, Clone, Debug, Default, Display, From, Into, Eq, Ord, PartialOrd, PartialEq)]
pub struct SectorID(u32);

impl SectorID {
    pub(crate) const BOOT: Self = Self(0);
}

impl<I: Into<u32>> core::ops::Add<I> for SectorID {
    type Output = Self;

    fn add(self, rhs: I) -> Self {
        Self(self.0 + rhs.into())
    }
}

#[derive(Copy, Clone, Debug, Default, Display, From, Into, Eq, Ord, PartialOrd, PartialEq)]
pub struct ClusterID(u32);

impl ClusterID {
    /// Clusters 0 and 1 are reserved, data region starts here
    pub const FIRST: Self = Self(2);

    pub fn valid(&self) -> bool {
        *self >= Self::FIRST
    }

    /// Cluster index relative to the start of data region
    pub(crate) fn offset(self) -> u32 {
        self.0 - Self::FIRST.0
    }
}

impl<I: Into<u32>> core::ops::Add<I> for ClusterID {
    type Output = Self;

    fn add(self, rhs: I) -> Self {
        Self(self.0 + rhs.into())
    }
}
