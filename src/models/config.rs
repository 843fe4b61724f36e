use serde::{Deserialize, Serialize};
use tracing::instrument;

const MIN_DIMENSION: usize = 3;
const MAX_DIMENSION: usize = 100;

/// Solver parameters for one genetic-algorithm run.
///
/// Constructed with defaults via [`SolverConfig::new`] and refined through
/// the `with_*` methods; every mutation re-validates so an instance is
/// always internally consistent. `population_size` is capped to the size
/// of the permutation space so seeding can always reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
pub struct SolverConfig {
    dimension: usize,
    fixed_origin: Option<usize>,
    return_to_origin: bool,
    population_size: usize,
    nna_percentage: u8,
    max_generations: u32,
    max_chromosome_age: u32,
    mutation_rate: u8,
    elite_count: usize,
}

#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum ConfigError {
    #[error("dimension must be between {MIN_DIMENSION} and {MAX_DIMENSION}, got {0}")]
    DimensionOutOfRange(usize),
    #[error("fixed origin index {origin} is outside the node range 0..{dimension}")]
    OriginOutOfRange { origin: usize, dimension: usize },
    #[error("population size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    #[error("nearest-neighbour percentage must be between 0 and 100, got {0}")]
    NnaPercentageOutOfRange(u8),
    #[error("mutation rate percentage must be between 0 and 100, got {0}")]
    MutationRateOutOfRange(u8),
    #[error("elite count {elite_count} must not exceed population size {population_size}")]
    EliteCountTooLarge {
        elite_count: usize,
        population_size: usize,
    },
}

impl SolverConfig {
    /// Creates a configuration with the default parameters for the given
    /// problem dimension.
    #[instrument(level = "debug", fields(dimension = dimension))]
    pub fn new(dimension: usize) -> Result<Self, ConfigError> {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&dimension) {
            return Err(ConfigError::DimensionOutOfRange(dimension));
        }

        let config = Self {
            dimension,
            fixed_origin: None,
            return_to_origin: true,
            population_size: 100,
            nna_percentage: 40,
            max_generations: 1000,
            max_chromosome_age: 250,
            mutation_rate: 2,
            elite_count: 2,
        };

        config.validate()
    }

    pub fn with_fixed_origin(mut self, origin: usize) -> Result<Self, ConfigError> {
        self.fixed_origin = Some(origin);
        self.validate()
    }

    pub fn with_return_to_origin(mut self, return_to_origin: bool) -> Self {
        self.return_to_origin = return_to_origin;
        self
    }

    pub fn with_population_size(mut self, population_size: usize) -> Result<Self, ConfigError> {
        self.population_size = population_size;
        self.validate()
    }

    pub fn with_nna_percentage(mut self, nna_percentage: u8) -> Result<Self, ConfigError> {
        self.nna_percentage = nna_percentage;
        self.validate()
    }

    pub fn with_max_generations(mut self, max_generations: u32) -> Self {
        self.max_generations = max_generations;
        self
    }

    pub fn with_max_chromosome_age(mut self, max_chromosome_age: u32) -> Self {
        self.max_chromosome_age = max_chromosome_age;
        self
    }

    pub fn with_mutation_rate(mut self, mutation_rate: u8) -> Result<Self, ConfigError> {
        self.mutation_rate = mutation_rate;
        self.validate()
    }

    pub fn with_elite_count(mut self, elite_count: usize) -> Result<Self, ConfigError> {
        self.elite_count = elite_count;
        self.validate()
    }

    fn validate(mut self) -> Result<Self, ConfigError> {
        if let Some(origin) = self.fixed_origin {
            if origin >= self.dimension {
                return Err(ConfigError::OriginOutOfRange {
                    origin,
                    dimension: self.dimension,
                });
            }
        }

        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }

        if self.nna_percentage > 100 {
            return Err(ConfigError::NnaPercentageOutOfRange(self.nna_percentage));
        }

        if self.mutation_rate > 100 {
            return Err(ConfigError::MutationRateOutOfRange(self.mutation_rate));
        }

        // The seeder cannot produce more distinct tours than the permutation
        // space holds, so the requested size is capped rather than rejected.
        let space = self.permutation_space();
        if (self.population_size as u64) > space {
            self.population_size = space as usize;
        }

        if self.elite_count > self.population_size {
            return Err(ConfigError::EliteCountTooLarge {
                elite_count: self.elite_count,
                population_size: self.population_size,
            });
        }

        Ok(self)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn fixed_origin(&self) -> Option<usize> {
        self.fixed_origin
    }

    pub fn return_to_origin(&self) -> bool {
        self.return_to_origin
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn max_generations(&self) -> u32 {
        self.max_generations
    }

    pub fn max_chromosome_age(&self) -> u32 {
        self.max_chromosome_age
    }

    pub fn elite_count(&self) -> usize {
        self.elite_count
    }

    /// Number of distinct tours: (N-1)! with a fixed origin, N! otherwise.
    /// Saturates at u64::MAX, which only matters for comparisons against
    /// the (much smaller) population size.
    pub(crate) fn permutation_space(&self) -> u64 {
        let free_nodes = match self.fixed_origin {
            Some(_) => self.dimension - 1,
            None => self.dimension,
        };

        (1..=free_nodes as u64).fold(1u64, |space, k| space.saturating_mul(k))
    }

    /// A problem is small when the initial population already enumerates
    /// the whole permutation space.
    pub(crate) fn is_small(&self) -> bool {
        self.permutation_space() <= self.population_size as u64
    }

    /// Size of the per-generation mutation pool. Integer truncation with a
    /// floor of one mutant, so a zero rate still mutates.
    pub(crate) fn mutation_pool_size(&self) -> usize {
        (self.population_size * self.mutation_rate as usize / 100).max(1)
    }

    /// Target count for the nearest-neighbour seed pool, bounded by the
    /// number of distinct starting points.
    pub(crate) fn nna_pool_size(&self) -> usize {
        let target =
            (self.nna_percentage as f64 * self.population_size as f64 / 100.0).round() as usize;

        let starting_points = match self.fixed_origin {
            Some(_) => self.dimension - 1,
            None => self.dimension,
        };

        target.min(starting_points)
    }
}
