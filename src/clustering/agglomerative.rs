use tracing::debug;

use crate::scoring::cosine_distance;

use super::error::ClusteringError;

/// One merge step: cluster `absorbed` joined cluster `kept` at `distance`.
///
/// Cluster ids are the index of the lowest item the cluster started from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    pub kept: usize,
    pub absorbed: usize,
    pub distance: f64,
}

/// Result of one clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    labels: Vec<usize>,
    merges: Vec<Merge>,
}

impl ClusterAssignment {
    /// One label per input item. Labels are dense and numbered in order of
    /// first appearance.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Merges performed, in order.
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    pub fn cluster_count(&self) -> usize {
        self.labels.iter().max().map_or(0, |max| max + 1)
    }

    /// Item indices of every cluster with at least two members.
    ///
    /// Groups are ordered by first member, members by input position.
    pub fn groups(&self) -> Vec<Vec<usize>> {
        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); self.cluster_count()];
        for (index, label) in self.labels.iter().enumerate() {
            buckets[*label].push(index);
        }
        buckets.retain(|b| b.len() > 1);
        buckets
    }

    /// [`groups`](Self::groups) resolved against the clustered items.
    pub fn group_items<T: Clone>(&self, items: &[T]) -> Vec<Vec<T>> {
        self.groups()
            .into_iter()
            .map(|g| g.into_iter().filter_map(|i| items.get(i).cloned()).collect())
            .collect()
    }
}

/// Bottom-up clustering with average linkage over cosine distance.
///
/// No cluster count is fixed in advance; the two closest clusters are merged
/// for as long as their average distance is strictly below
/// `distance_threshold`.
#[derive(Debug, Clone, Copy)]
pub struct AgglomerativeClustering {
    distance_threshold: f64,
}

impl AgglomerativeClustering {
    pub fn new(distance_threshold: f64) -> Result<Self, ClusteringError> {
        if !distance_threshold.is_finite() || distance_threshold < 0.0 {
            return Err(ClusteringError::InvalidThreshold {
                value: distance_threshold,
            });
        }
        Ok(Self { distance_threshold })
    }

    /// Clustering whose stopping distance is `1 - similarity_threshold`.
    pub fn from_similarity_threshold(similarity_threshold: f64) -> Result<Self, ClusteringError> {
        Self::new(1.0 - similarity_threshold)
    }

    pub fn distance_threshold(&self) -> f64 {
        self.distance_threshold
    }

    pub fn fit(&self, vectors: &[Vec<f32>]) -> Result<ClusterAssignment, ClusteringError> {
        let n = vectors.len();
        if let Some(first) = vectors.first() {
            let expected = first.len();
            if let Some((index, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != expected) {
                return Err(ClusteringError::DimensionMismatch {
                    expected,
                    found: v.len(),
                    index,
                });
            }
        }

        let mut matrix = DistanceMatrix::new(vectors);
        let mut active = vec![true; n];
        let mut sizes = vec![1usize; n];
        let mut owner: Vec<usize> = (0..n).collect();
        let mut merges = Vec::new();

        let mut nearest: Vec<Option<(usize, f64)>> =
            (0..n).map(|i| matrix.nearest(i, &active)).collect();

        loop {
            let Some((a, b, distance)) = closest_pair(&nearest, &active) else {
                break;
            };
            if distance >= self.distance_threshold {
                break;
            }

            // Lance-Williams update for average linkage; `a < b`, `a` survives.
            let (size_a, size_b) = (sizes[a] as f64, sizes[b] as f64);
            for k in 0..n {
                if !active[k] || k == a || k == b {
                    continue;
                }
                let merged =
                    (size_a * matrix.get(k, a) + size_b * matrix.get(k, b)) / (size_a + size_b);
                matrix.set(k, a, merged);
            }
            active[b] = false;
            sizes[a] += sizes[b];
            nearest[b] = None;
            for o in owner.iter_mut().filter(|o| **o == b) {
                *o = a;
            }
            merges.push(Merge {
                kept: a,
                absorbed: b,
                distance,
            });

            for k in 0..n {
                if !active[k] {
                    continue;
                }
                let stale = k == a || matches!(nearest[k], Some((j, _)) if j == a || j == b);
                if stale {
                    nearest[k] = matrix.nearest(k, &active);
                    continue;
                }
                let to_a = matrix.get(k, a);
                if let Some((j, d)) = nearest[k]
                    && (to_a < d || (to_a == d && a < j))
                {
                    nearest[k] = Some((a, to_a));
                }
            }
        }

        let labels = dense_labels(&owner);
        debug!(
            items = n,
            clusters = labels.iter().max().map_or(0, |m| m + 1),
            merges = merges.len(),
            distance_threshold = self.distance_threshold,
            "Agglomerative clustering complete"
        );

        Ok(ClusterAssignment { labels, merges })
    }
}

/// Symmetric pairwise distances, stored in full.
struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    fn new(vectors: &[Vec<f32>]) -> Self {
        let n = vectors.len();
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = cosine_distance(&vectors[i], &vectors[j]);
                values[i * n + j] = d;
                values[j * n + i] = d;
            }
        }
        Self { n, values }
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.n + j] = value;
        self.values[j * self.n + i] = value;
    }

    /// Closest other active cluster to `i`; ties go to the lower index.
    fn nearest(&self, i: usize, active: &[bool]) -> Option<(usize, f64)> {
        (0..self.n)
            .filter(|&j| j != i && active[j])
            .map(|j| (j, self.get(i, j)))
            .fold(None, |best, (j, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((j, d)),
            })
    }
}

/// Globally closest active pair as `(low, high, distance)`; ties go to the
/// lowest `(low, high)`.
fn closest_pair(nearest: &[Option<(usize, f64)>], active: &[bool]) -> Option<(usize, usize, f64)> {
    nearest
        .iter()
        .enumerate()
        .filter(|(i, _)| active[*i])
        .filter_map(|(i, n)| n.map(|(j, d)| (i.min(j), i.max(j), d)))
        .fold(None, |best, (a, b, d)| match best {
            Some((ba, bb, bd)) if bd < d || (bd == d && (ba, bb) <= (a, b)) => best,
            _ => Some((a, b, d)),
        })
}

fn dense_labels(owner: &[usize]) -> Vec<usize> {
    let mut mapping: Vec<Option<usize>> = vec![None; owner.len()];
    let mut next = 0;
    owner
        .iter()
        .map(|&o| {
            *mapping[o].get_or_insert_with(|| {
                next += 1;
                next - 1
            })
        })
        .collect()
}
