use crate::models::Chromosome;
use std::collections::HashSet;

/// A set of distinct chromosomes, keyed on the ordered tour sequence.
///
/// Tours stay ordered sequences; uniqueness is tracked in a separate set
/// of content hashes rather than by the container itself.
#[derive(Debug, Clone, Default)]
pub struct Population {
    members: Vec<Chromosome>,
    keys: HashSet<u64>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            keys: HashSet::with_capacity(capacity),
        }
    }

    /// Inserts a chromosome, returning false if an equal tour is already
    /// present.
    pub fn insert(&mut self, chromosome: Chromosome) -> bool {
        if !self.keys.insert(chromosome.tour_hash()) {
            return false;
        }

        self.members.push(chromosome);
        true
    }

    pub fn contains(&self, chromosome: &Chromosome) -> bool {
        self.keys.contains(&chromosome.tour_hash())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chromosome> {
        self.members.iter()
    }

    pub(crate) fn into_members(self) -> Vec<Chromosome> {
        self.members
    }
}

/// A population with a fitness attached to every member.
///
/// Entries keep their insertion order until sorted; the sorts used for
/// selection and survival are stable, which keeps tie-breaking
/// deterministic across a solve.
#[derive(Debug, Clone)]
pub struct EvaluatedPopulation {
    entries: Vec<(Chromosome, f64)>,
    keys: HashSet<u64>,
}

impl EvaluatedPopulation {
    pub(crate) fn from_entries(entries: Vec<(Chromosome, f64)>) -> Self {
        let keys = entries
            .iter()
            .map(|(chromosome, _)| chromosome.tour_hash())
            .collect();

        Self { entries, keys }
    }

    pub fn entries(&self) -> &[(Chromosome, f64)] {
        &self.entries
    }

    pub fn contains(&self, chromosome: &Chromosome) -> bool {
        self.keys.contains(&chromosome.tour_hash())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorts entries ascending by fitness, worst first, best last.
    pub(crate) fn sort_by_fitness(&mut self) {
        self.entries.sort_by(|(_, a), (_, b)| a.total_cmp(b));
    }

    pub(crate) fn total_fitness(&self) -> f64 {
        self.entries.iter().map(|(_, fitness)| fitness).sum()
    }

    pub(crate) fn replace(&mut self, index: usize, entry: (Chromosome, f64)) {
        self.keys.remove(&self.entries[index].0.tour_hash());
        self.keys.insert(entry.0.tour_hash());
        self.entries[index] = entry;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_rejects_duplicate_tours() {
        let mut population = Population::new();

        assert!(population.insert(Chromosome::new(vec![0, 1, 2])));
        assert!(!population.insert(Chromosome::new(vec![0, 1, 2])));
        assert!(population.insert(Chromosome::new(vec![0, 2, 1])));
        assert_eq!(population.len(), 2);
    }

    #[test]
    fn it_tracks_membership() {
        let mut population = Population::new();
        population.insert(Chromosome::new(vec![0, 1, 2]));

        assert!(population.contains(&Chromosome::new(vec![0, 1, 2])));
        assert!(!population.contains(&Chromosome::new(vec![2, 1, 0])));
    }

    #[test]
    fn it_sorts_entries_ascending_by_fitness() {
        let mut evaluated = EvaluatedPopulation::from_entries(vec![
            (Chromosome::new(vec![0, 1, 2]), 0.5),
            (Chromosome::new(vec![0, 2, 1]), 0.1),
            (Chromosome::new(vec![1, 0, 2]), 0.9),
        ]);

        evaluated.sort_by_fitness();

        let fitnesses: Vec<f64> = evaluated.entries().iter().map(|(_, f)| *f).collect();
        assert_eq!(fitnesses, vec![0.1, 0.5, 0.9]);
    }

    #[test]
    fn it_keeps_membership_in_sync_on_replace() {
        let mut evaluated = EvaluatedPopulation::from_entries(vec![
            (Chromosome::new(vec![0, 1, 2]), 0.5),
            (Chromosome::new(vec![0, 2, 1]), 0.1),
        ]);

        let incoming = Chromosome::new(vec![1, 2, 0]);
        evaluated.replace(0, (incoming.clone(), 0.7));

        assert!(evaluated.contains(&incoming));
        assert!(!evaluated.contains(&Chromosome::new(vec![0, 1, 2])));
    }
}
