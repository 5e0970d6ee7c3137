use alloc::collections::BTreeSet;

use crate::error::DataError;
use crate::fat::NextCluster;
use crate::region::fat::ClusterRef;
use crate::types::ClusterID;

#[derive(Copy, Clone, Debug)]
enum State {
    Start(ClusterID),
    At(ClusterID),
    Done,
}

/// Walks a cluster chain through the FAT, refusing free, bad,
/// out-of-range and already visited clusters
pub(crate) struct ClusterChain<'a, T> {
    table: &'a T,
    state: State,
    last_cluster: ClusterID,
    visited: BTreeSet<ClusterID>,
    lookups: usize,
}

impl<'a, T: NextCluster> ClusterChain<'a, T> {
    pub fn new(table: &'a T, first: ClusterID, last_cluster: ClusterID) -> Self {
        Self {
            table,
            state: State::Start(first),
            last_cluster,
            visited: BTreeSet::new(),
            lookups: 0,
        }
    }

    fn in_range(&self, cluster: ClusterID) -> bool {
        cluster.valid() && cluster <= self.last_cluster
    }

    fn visit(&mut self, cluster: ClusterID) -> Result<ClusterID, DataError> {
        if !self.visited.insert(cluster) {
            warn!("Cluster chain revisits cluster {}", cluster);
            self.state = State::Done;
            return Err(DataError::CyclicChain(cluster));
        }
        self.state = State::At(cluster);
        Ok(cluster)
    }

    /// `None` once end-of-chain is reached, every error is final
    pub fn next(&mut self) -> Result<Option<ClusterID>, DataError> {
        let current = match self.state {
            State::Start(first) => {
                if !self.in_range(first) {
                    self.state = State::Done;
                    return Err(DataError::ClusterOutOfRange(first));
                }
                return self.visit(first).map(Some);
            }
            State::At(current) => current,
            State::Done => return Ok(None),
        };
        self.lookups += 1;
        let entry = match self.table.next_cluster(current) {
            Ok(entry) => entry,
            Err(e) => {
                self.state = State::Done;
                return Err(e);
            }
        };
        trace!("Cluster {} followed by {}", current, entry);
        match entry {
            ClusterRef::Data(next) if self.in_range(next) => self.visit(next).map(Some),
            ClusterRef::EndOfChain => {
                self.state = State::Done;
                Ok(None)
            }
            entry => {
                warn!("Cluster chain broken at cluster {}: {}", current, entry);
                self.state = State::Done;
                Err(DataError::CorruptChain { cluster: current, entry })
            }
        }
    }

    /// Number of FAT lookups so far
    pub fn lookups(&self) -> usize {
        self.lookups
    }
}
