use crate::models::{Chromosome, Cost, CostTable, EvaluatedPopulation, Population};
use tracing::instrument;

/// Assigns each chromosome of a population the reciprocal of its tour
/// cost, so that cheaper tours carry higher fitness.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    table: &'a CostTable,
    return_to_origin: bool,
}

impl<'a> Evaluator<'a> {
    pub fn new(table: &'a CostTable, return_to_origin: bool) -> Self {
        Self {
            table,
            return_to_origin,
        }
    }

    /// Total cost of the tour, including the closing last-to-first edge
    /// when the tour is a cycle.
    pub fn tour_cost(&self, chromosome: &Chromosome) -> Cost {
        let genes = chromosome.genes();

        let mut cost: Cost = genes
            .windows(2)
            .map(|edge| self.table.cost(edge[0], edge[1]))
            .sum();

        if self.return_to_origin {
            cost += self.table.cost(genes[genes.len() - 1], genes[0]);
        }

        cost
    }

    pub fn fitness(&self, chromosome: &Chromosome) -> f64 {
        let cost = self.tour_cost(chromosome);

        // A zero-cost tour implies a degenerate table; dimension >= 3 and
        // non-negative costs keep this out of reach in practice.
        debug_assert!(cost > 0.0, "tour cost must be positive");

        1.0 / cost
    }

    #[instrument(level = "debug", skip(self, population), fields(members = population.len()))]
    pub fn evaluate(&self, population: Population) -> EvaluatedPopulation {
        let entries = population
            .into_members()
            .into_iter()
            .map(|chromosome| {
                let fitness = self.fitness(&chromosome);
                (chromosome, fitness)
            })
            .collect();

        EvaluatedPopulation::from_entries(entries)
    }
}
