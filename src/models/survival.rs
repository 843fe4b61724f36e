use crate::models::EvaluatedPopulation;
use tracing::instrument;

/// Composes the next generation with elite preservation.
///
/// Both generations are sorted ascending by fitness and the bottom
/// `elite_count` entries of the evolved generation are replaced by the
/// top `elite_count` entries of the previous one, keeping the population
/// size unchanged. The sorts are stable, so equal fitnesses keep their
/// insertion order and the outcome is reproducible.
#[instrument(level = "debug", skip(previous, evolved), fields(population_size = evolved.len(), elite_count = elite_count))]
pub(crate) fn next_generation(
    mut previous: EvaluatedPopulation,
    mut evolved: EvaluatedPopulation,
    elite_count: usize,
) -> EvaluatedPopulation {
    previous.sort_by_fitness();
    evolved.sort_by_fitness();

    let elite_count = elite_count.min(previous.len()).min(evolved.len());
    let elite_start = previous.len() - elite_count;

    for offset in 0..elite_count {
        let elite = previous.entries()[elite_start + offset].clone();
        evolved.replace(offset, elite);
    }

    evolved
}
