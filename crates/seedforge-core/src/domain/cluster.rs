//! Store-to-cluster assignments.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeedForgeError};

/// One `store_id -> cluster_id` pair, the serialized form of an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterEntry {
    pub store_id: String,
    pub cluster_id: usize,
}

/// Ordered mapping from store id to cluster id.
///
/// Every store appears exactly once. Iteration follows insertion order,
/// which is the order the allocator visits stores in.
///
/// # Examples
///
/// ```
/// use seedforge_core::ClusterAssignment;
///
/// let mut clusters = ClusterAssignment::new();
/// clusters.insert("S2", 1).unwrap();
/// clusters.insert("S1", 0).unwrap();
///
/// let order: Vec<_> = clusters.iter().map(|(store, _)| store).collect();
/// assert_eq!(order, vec!["S2", "S1"]);
/// assert!(clusters.insert("S1", 1).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ClusterEntry>", into = "Vec<ClusterEntry>")]
pub struct ClusterAssignment {
    entries: Vec<ClusterEntry>,
    index: HashMap<String, usize>,
}

impl ClusterAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a store, rejecting ids that are already assigned.
    pub fn insert(&mut self, store_id: impl Into<String>, cluster_id: usize) -> Result<()> {
        let store_id = store_id.into();
        if self.index.contains_key(&store_id) {
            return Err(SeedForgeError::invalid_input(format!(
                "store '{}' is assigned to more than one cluster",
                store_id
            )));
        }
        self.index.insert(store_id.clone(), self.entries.len());
        self.entries.push(ClusterEntry {
            store_id,
            cluster_id,
        });
        Ok(())
    }

    /// Returns the cluster of a store.
    pub fn get(&self, store_id: &str) -> Option<usize> {
        self.index
            .get(store_id)
            .map(|&idx| self.entries[idx].cluster_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(store_id, cluster_id)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.entries
            .iter()
            .map(|e| (e.store_id.as_str(), e.cluster_id))
    }

    /// Number of distinct cluster ids in use.
    pub fn cluster_count(&self) -> usize {
        let mut ids: Vec<usize> = self.entries.iter().map(|e| e.cluster_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Store ids grouped by cluster, each group in insertion order.
    pub fn members(&self) -> BTreeMap<usize, Vec<&str>> {
        let mut groups: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
        for e in &self.entries {
            groups.entry(e.cluster_id).or_default().push(&e.store_id);
        }
        groups
    }
}

impl TryFrom<Vec<ClusterEntry>> for ClusterAssignment {
    type Error = SeedForgeError;

    fn try_from(entries: Vec<ClusterEntry>) -> Result<Self> {
        let mut assignment = ClusterAssignment::new();
        for e in entries {
            assignment.insert(e.store_id, e.cluster_id)?;
        }
        Ok(assignment)
    }
}

impl From<ClusterAssignment> for Vec<ClusterEntry> {
    fn from(assignment: ClusterAssignment) -> Self {
        assignment.entries
    }
}

/// Summary statistics for one cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterProfile {
    pub cluster_id: usize,
    pub store_count: usize,
    /// Mean of each clustering feature over the cluster's stores, in raw units.
    pub feature_means: BTreeMap<String, f64>,
}

/// Output of the cluster selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    pub assignment: ClusterAssignment,
    /// Number of clusters actually used.
    pub k: usize,
    /// Silhouette score in `[-1, 1]`, when it could be computed.
    pub silhouette: Option<f64>,
    pub profiles: Vec<ClusterProfile>,
}
