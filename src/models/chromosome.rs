use const_fnv1a_hash::fnv1a_hash_64;

/// A single node index within a tour.
pub type Gene = usize;

/// An ordered visitation of all N nodes.
///
/// The tour is the source of truth; the hash is a content hash over the
/// ordered sequence so two chromosomes are equal iff their tours are
/// element-wise equal. When a fixed origin is configured, constructors
/// place it at position 0 and every operator preserves that.
#[derive(Debug, Clone)]
pub struct Chromosome {
    tour: Vec<Gene>,
    tour_hash: u64,
}

impl Chromosome {
    pub fn new(tour: Vec<Gene>) -> Self {
        let tour_hash = Self::compute_tour_hash(&tour);

        Self { tour, tour_hash }
    }

    /// FNV-1a over the canonical byte form of the ordered sequence.
    pub(crate) fn compute_tour_hash(tour: &[Gene]) -> u64 {
        let mut bytes = Vec::with_capacity(tour.len() * 8);
        for gene in tour {
            bytes.extend_from_slice(&(*gene as u64).to_le_bytes());
        }

        fnv1a_hash_64(&bytes, None)
    }

    pub fn genes(&self) -> &[Gene] {
        &self.tour
    }

    pub fn len(&self) -> usize {
        self.tour.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tour.is_empty()
    }

    pub(crate) fn tour_hash(&self) -> u64 {
        self.tour_hash
    }

    pub fn into_tour(self) -> Vec<Gene> {
        self.tour
    }
}

impl PartialEq for Chromosome {
    fn eq(&self, other: &Self) -> bool {
        self.tour == other.tour
    }
}

impl Eq for Chromosome {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_compares_by_ordered_sequence() {
        let a = Chromosome::new(vec![0, 1, 2, 3]);
        let b = Chromosome::new(vec![0, 1, 2, 3]);
        let c = Chromosome::new(vec![0, 3, 2, 1]);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn it_distinguishes_reordered_tours_by_hash() {
        // Same multiset of genes, different order - must not collide
        let a = Chromosome::new(vec![0, 1, 2, 3]);
        let b = Chromosome::new(vec![0, 2, 1, 3]);

        assert_ne!(a.tour_hash(), b.tour_hash());
    }

    #[test]
    fn it_hashes_deterministically() {
        let tour = vec![4, 0, 3, 1, 2];

        assert_eq!(
            Chromosome::new(tour.clone()).tour_hash(),
            Chromosome::new(tour).tour_hash()
        );
    }
}
