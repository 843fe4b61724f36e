mod chromosome;
mod config;
mod coordinate;
mod cost_table;
mod crossover;
mod evaluator;
mod mutation;
mod population;
mod problem;
mod seeder;
mod selector;
mod solution;
mod survival;

pub use chromosome::{Chromosome, Gene};
pub use config::{ConfigError, SolverConfig};
pub use coordinate::{CoordinateError, GeoPoint, Point};
pub use cost_table::{Cost, CostTable, CostTableError};
pub use crossover::CrossoverError;
pub use evaluator::Evaluator;
pub use mutation::MutationError;
pub use population::{EvaluatedPopulation, Population};
pub use problem::{Algorithm, EdgeWeightType, Instance, Problem, ProblemError, ProblemType};
pub use selector::SelectionError;
pub use solution::SolvedProblem;

pub(crate) use crossover::crossover;
pub(crate) use mutation::mutate;
pub(crate) use seeder::Seeder;
pub(crate) use selector::{select_random, select_roulette_pair};
pub(crate) use survival::next_generation;
