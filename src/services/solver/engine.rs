use crate::models::{
    Cost, CostTable, CrossoverError, EvaluatedPopulation, Evaluator, Gene, MutationError,
    Population, Seeder, SelectionError, SolvedProblem, SolverConfig, crossover, mutate,
    next_generation, select_random, select_roulette_pair,
};
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

/// Cooperative cancellation, checked together with the termination
/// predicate at generation boundaries. Cancelling mid-generation is not
/// supported; a cancelled solve concludes with the statistics gathered
/// so far.
pub trait Terminated: Send + Sync {
    fn is_terminated(&self) -> bool;
}

/// Shared flag for callers that want to cancel a running solve.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

impl Terminated for CancellationFlag {
    fn is_terminated(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("cost table dimension {table} does not match configured dimension {config}")]
    DimensionMismatch { table: usize, config: usize },
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error(transparent)]
    Crossover(#[from] CrossoverError),
}

/// Accumulated result state, threaded through the generation loop and
/// turned into the final record when the loop ends.
#[derive(Debug)]
struct SolveState {
    started: Instant,
    generations: u32,
    solution: Vec<Gene>,
    best_cost: Cost,
    best_cost_generation: usize,
    worst_cost: Cost,
    worst_cost_generation: usize,
    best_cost_history: Vec<Cost>,
    worst_cost_history: Vec<Cost>,
    solved_in_ms: u64,
}

impl SolveState {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            generations: 0,
            solution: Vec::new(),
            best_cost: Cost::INFINITY,
            best_cost_generation: 0,
            worst_cost: Cost::NEG_INFINITY,
            worst_cost_generation: 0,
            best_cost_history: Vec::new(),
            worst_cost_history: Vec::new(),
            solved_in_ms: 0,
        }
    }

    /// Sorts the generation ascending by fitness; the tail is the best
    /// tour (lowest cost), the head the worst. Records are updated only
    /// on strict improvement, histories on every registration.
    fn register(&mut self, generation: &mut EvaluatedPopulation, evaluator: &Evaluator<'_>) {
        generation.sort_by_fitness();

        let entries = generation.entries();
        let (worst_chromosome, _) = &entries[0];
        let (best_chromosome, _) = &entries[entries.len() - 1];

        let best_cost = evaluator.tour_cost(best_chromosome);
        let worst_cost = evaluator.tour_cost(worst_chromosome);

        if best_cost < self.best_cost {
            self.best_cost = best_cost;
            self.best_cost_generation = self.best_cost_history.len();
            self.solution = best_chromosome.genes().to_vec();
        }

        if worst_cost > self.worst_cost {
            self.worst_cost = worst_cost;
            self.worst_cost_generation = self.worst_cost_history.len();
        }

        self.best_cost_history.push(best_cost);
        self.worst_cost_history.push(worst_cost);
        self.solved_in_ms = self.started.elapsed().as_millis() as u64;
    }

    /// Age of the best tour: how many generations have passed since it
    /// was first observed.
    fn best_age(&self) -> u32 {
        self.generations - 1 - self.best_cost_generation as u32
    }

    fn into_solved(self) -> SolvedProblem {
        SolvedProblem {
            id: Uuid::now_v7(),
            solved_at: Utc::now(),
            solution: self.solution,
            best_cost: self.best_cost,
            best_cost_generation: self.best_cost_generation,
            worst_cost: self.worst_cost,
            worst_cost_generation: self.worst_cost_generation,
            best_cost_history: self.best_cost_history,
            worst_cost_history: self.worst_cost_history,
            generations: self.generations,
            solved_in_ms: self.solved_in_ms,
        }
    }
}

/// Single-threaded generational loop over one cost table.
///
/// Each step rebuilds the population from a mutation pool and crossover
/// offspring, evaluates it, applies elite survival and registers the
/// generation's statistics. The engine is pure CPU work; the caller owns
/// the RNG stream, so a seeded generator reproduces a solve exactly.
pub struct Engine<'a> {
    table: &'a CostTable,
    config: &'a SolverConfig,
}

impl<'a> Engine<'a> {
    pub fn new(table: &'a CostTable, config: &'a SolverConfig) -> Self {
        Self { table, config }
    }

    #[instrument(level = "info", skip(self, rng, cancelled), fields(dimension = self.config.dimension(), population_size = self.config.population_size()))]
    pub fn solve(
        &self,
        rng: &mut impl Rng,
        cancelled: Option<&dyn Terminated>,
    ) -> Result<SolvedProblem, EngineError> {
        if self.table.dimension() != self.config.dimension() {
            return Err(EngineError::DimensionMismatch {
                table: self.table.dimension(),
                config: self.config.dimension(),
            });
        }

        let evaluator = Evaluator::new(self.table, self.config.return_to_origin());
        let fixed_origin = self.config.fixed_origin().is_some();
        let population_size = self.config.population_size();

        // Offspring are deduplicated against the previous generation only
        // when the permutation space can supply a full fresh population;
        // tighter spaces would starve the fill loop below.
        let large = self.config.permutation_space() >= 2 * population_size as u64;

        let mut state = SolveState::new();

        let seeded = Seeder::new(self.table, self.config).seed(rng);
        let mut current = evaluator.evaluate(seeded);
        state.generations = 1;
        state.register(&mut current, &evaluator);

        loop {
            // A small problem was fully enumerated by the seeder; the
            // first registration already saw the optimum
            if self.config.is_small() {
                break;
            }
            if state.generations > self.config.max_generations() {
                break;
            }
            if state.best_age() > self.config.max_chromosome_age() {
                tracing::info!(
                    best_cost = state.best_cost,
                    age = state.best_age(),
                    "Best tour stopped improving"
                );
                break;
            }
            if cancelled.is_some_and(|flag| flag.is_terminated()) {
                tracing::info!(generation = state.generations, "Solve cancelled");
                break;
            }

            let mut next = Population::with_capacity(population_size);

            // Mutation pool
            while next.len() < self.config.mutation_pool_size() {
                let parent = select_random(&current, rng)?;
                let mutant = mutate(parent, fixed_origin, rng)?;

                if large && current.contains(&mutant) {
                    continue;
                }
                next.insert(mutant);
            }

            // Crossover fills the remainder
            while next.len() < population_size {
                let (parent_a, parent_b) = select_roulette_pair(&current, rng)?;
                let (child_a, child_b) = crossover(parent_a, parent_b, fixed_origin, rng)?;

                for child in [child_a, child_b] {
                    if next.len() >= population_size {
                        break;
                    }
                    if large && current.contains(&child) {
                        continue;
                    }
                    next.insert(child);
                }
            }

            let evolved = evaluator.evaluate(next);
            current = next_generation(current, evolved, self.config.elite_count());
            state.generations += 1;
            state.register(&mut current, &evaluator);
        }

        Ok(state.into_solved())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn symmetric_table_4() -> CostTable {
        CostTable::from_rows(vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![1.0, 0.0, 1.0, 2.0],
            vec![2.0, 1.0, 0.0, 1.0],
            vec![3.0, 2.0, 1.0, 0.0],
        ])
        .unwrap()
    }

    /// Line-shaped instance: cost(i, j) = |i - j|.
    fn symmetric_table_5() -> CostTable {
        let rows = (0..5)
            .map(|i: i64| (0..5).map(|j: i64| (i - j).abs() as Cost).collect())
            .collect();

        CostTable::from_rows(rows).unwrap()
    }

    #[test]
    fn it_finds_the_optimum_of_the_symmetric_four_node_instance() {
        let table = symmetric_table_4();
        let config = SolverConfig::new(4)
            .unwrap()
            .with_fixed_origin(0)
            .unwrap()
            .with_population_size(6)
            .unwrap()
            .with_max_generations(50);
        let mut rng = StdRng::seed_from_u64(42);

        let solved = Engine::new(&table, &config).solve(&mut rng, None).unwrap();

        assert_eq!(solved.best_cost, 6.0);
        assert!(
            solved.solution == vec![0, 1, 2, 3] || solved.solution == vec![0, 3, 2, 1],
            "unexpected optimal tour: {:?}",
            solved.solution
        );
    }

    #[test]
    fn it_terminates_small_problems_after_the_first_registration() {
        // 3 nodes without a fixed origin leave 3! = 6 tours <= P
        let table = CostTable::from_rows(vec![
            vec![0.0, 10.0, 15.0],
            vec![20.0, 0.0, 5.0],
            vec![8.0, 12.0, 0.0],
        ])
        .unwrap();
        let config = SolverConfig::new(3).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let solved = Engine::new(&table, &config).solve(&mut rng, None).unwrap();

        assert_eq!(solved.generations, 1);
        assert_eq!(solved.best_cost_history.len(), 1);
        // Exhaustive seed: the best of the six asymmetric tours costs 23
        assert_eq!(solved.best_cost, 23.0);
    }

    #[test]
    fn it_returns_seed_statistics_when_max_generations_is_zero() {
        let table = symmetric_table_4();
        let config = SolverConfig::new(4)
            .unwrap()
            .with_population_size(10)
            .unwrap()
            .with_max_generations(0);
        let mut rng = StdRng::seed_from_u64(42);

        let solved = Engine::new(&table, &config).solve(&mut rng, None).unwrap();

        assert_eq!(solved.generations, 1);
        assert_eq!(solved.best_cost_history.len(), 1);
        assert_eq!(solved.worst_cost_history.len(), 1);
    }

    #[test]
    fn it_tracks_record_costs_and_their_first_generations() {
        let table = symmetric_table_5();
        let config = SolverConfig::new(5)
            .unwrap()
            .with_population_size(10)
            .unwrap()
            .with_max_generations(30);
        let mut rng = StdRng::seed_from_u64(7);

        let solved = Engine::new(&table, &config).solve(&mut rng, None).unwrap();

        // The records are the extremes of the histories, anchored at the
        // generation that first observed them
        let min = solved.best_cost_history.iter().cloned().fold(Cost::INFINITY, Cost::min);
        let max = solved
            .worst_cost_history
            .iter()
            .cloned()
            .fold(Cost::NEG_INFINITY, Cost::max);

        assert_eq!(solved.best_cost, min);
        assert_eq!(solved.worst_cost, max);
        assert_eq!(
            solved.best_cost_history[solved.best_cost_generation],
            solved.best_cost
        );
        assert_eq!(
            solved.worst_cost_history[solved.worst_cost_generation],
            solved.worst_cost
        );
        assert_eq!(
            solved
                .best_cost_history
                .iter()
                .position(|&cost| cost == solved.best_cost),
            Some(solved.best_cost_generation)
        );
    }

    #[test]
    fn it_reports_population_wide_statistics() {
        let table = symmetric_table_5();
        let config = SolverConfig::new(5)
            .unwrap()
            .with_population_size(10)
            .unwrap()
            .with_max_generations(20);
        let mut rng = StdRng::seed_from_u64(3);

        let solved = Engine::new(&table, &config).solve(&mut rng, None).unwrap();

        assert!(solved.worst_cost >= solved.best_cost);
        assert_eq!(
            solved.best_cost_history.len(),
            solved.worst_cost_history.len()
        );
        assert_eq!(solved.best_cost_history.len() as u32, solved.generations);
    }

    #[test]
    fn it_rejects_mismatched_table_and_config_dimensions() {
        let table = symmetric_table_4();
        let config = SolverConfig::new(5).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let result = Engine::new(&table, &config).solve(&mut rng, None);

        assert!(matches!(
            result,
            Err(EngineError::DimensionMismatch { table: 4, config: 5 })
        ));
    }

    #[test]
    fn it_stops_at_a_generation_boundary_when_cancelled() {
        let table = symmetric_table_4();
        let config = SolverConfig::new(4)
            .unwrap()
            .with_population_size(10)
            .unwrap()
            .with_max_generations(1000);
        let mut rng = StdRng::seed_from_u64(42);

        let flag = CancellationFlag::new();
        flag.cancel();

        let solved = Engine::new(&table, &config)
            .solve(&mut rng, Some(&flag))
            .unwrap();

        // Cancelled before the first evolution step, seed stats remain
        assert_eq!(solved.generations, 1);
    }

    #[test]
    fn it_respects_the_fixed_origin_across_the_whole_solve() {
        let table = symmetric_table_4();
        let config = SolverConfig::new(4)
            .unwrap()
            .with_fixed_origin(2)
            .unwrap()
            .with_max_generations(10);
        let mut rng = StdRng::seed_from_u64(11);

        let solved = Engine::new(&table, &config).solve(&mut rng, None).unwrap();

        assert_eq!(solved.solution[0], 2);
    }
}
