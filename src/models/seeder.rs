use crate::models::{Chromosome, CostTable, Gene, Population, SolverConfig};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::instrument;

/// Builds the initial population from two pools: greedy nearest-neighbour
/// tours for a head start, topped up with uniform random permutations.
pub(crate) struct Seeder<'a> {
    table: &'a CostTable,
    config: &'a SolverConfig,
}

impl<'a> Seeder<'a> {
    pub(crate) fn new(table: &'a CostTable, config: &'a SolverConfig) -> Self {
        Self { table, config }
    }

    /// Produces exactly `population_size` distinct chromosomes. Random
    /// chromosomes are regenerated until the target is reached, which the
    /// permutation-space cap on the population size guarantees to finish.
    #[instrument(level = "debug", skip(self, rng), fields(population_size = self.config.population_size(), nna_pool = self.config.nna_pool_size()))]
    pub(crate) fn seed(&self, rng: &mut impl Rng) -> Population {
        let population_size = self.config.population_size();
        let mut population = Population::with_capacity(population_size);

        for start in self.nna_starts(rng) {
            population.insert(self.nearest_neighbour_tour(start));
        }

        while population.len() < population_size {
            population.insert(self.random_tour(rng));
        }

        population
    }

    /// Distinct starting nodes for the nearest-neighbour pool. The fixed
    /// origin is never a starting node, it is already placed at the tour
    /// head.
    fn nna_starts(&self, rng: &mut impl Rng) -> Vec<Gene> {
        let mut candidates: Vec<Gene> = (0..self.config.dimension())
            .filter(|&node| Some(node) != self.config.fixed_origin())
            .collect();
        candidates.shuffle(rng);

        candidates.truncate(self.config.nna_pool_size());
        candidates
    }

    /// Greedy construction: from the current tail, extend by the cheapest
    /// unvisited node, ties broken by the first found in scan order.
    fn nearest_neighbour_tour(&self, start: Gene) -> Chromosome {
        let n = self.config.dimension();
        let mut tour = Vec::with_capacity(n);
        let mut visited = vec![false; n];

        if let Some(origin) = self.config.fixed_origin() {
            tour.push(origin);
            visited[origin] = true;
        }

        tour.push(start);
        visited[start] = true;

        while tour.len() < n {
            let tail = tour[tour.len() - 1];

            let mut nearest: Option<(Gene, f64)> = None;
            for node in 0..n {
                if visited[node] {
                    continue;
                }

                let cost = self.table.cost(tail, node);
                if nearest.is_none_or(|(_, best)| cost < best) {
                    nearest = Some((node, cost));
                }
            }

            // n >= 3 leaves at least one unvisited node inside this loop
            if let Some((node, _)) = nearest {
                tour.push(node);
                visited[node] = true;
            }
        }

        Chromosome::new(tour)
    }

    /// Uniform random permutation with the fixed origin pinned up front.
    fn random_tour(&self, rng: &mut impl Rng) -> Chromosome {
        let mut tour: Vec<Gene> = (0..self.config.dimension())
            .filter(|&node| Some(node) != self.config.fixed_origin())
            .collect();
        tour.shuffle(rng);

        if let Some(origin) = self.config.fixed_origin() {
            tour.insert(0, origin);
        }

        Chromosome::new(tour)
    }
}
