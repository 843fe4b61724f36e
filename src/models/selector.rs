use crate::models::{Chromosome, EvaluatedPopulation};
use rand::Rng;

/// Pure function for a single roulette wheel spin.
///
/// Walks the entries in slice order, accumulating fitness, and returns the
/// first index whose running total reaches the spin. The order of the
/// slice must not change between the spins of one selection call.
fn spin_roulette(
    entries: &[(Chromosome, f64)],
    total_fitness: f64,
    rng: &mut impl Rng,
) -> Result<usize, SelectionError> {
    let spin = rng.random_range(0.0..total_fitness);
    let mut cumulative = 0.0;

    for (index, (_, fitness)) in entries.iter().enumerate() {
        cumulative += fitness;
        if cumulative >= spin {
            return Ok(index);
        }
    }

    // Unreachable when total_fitness is the true sum of the entries
    Err(SelectionError::RouletteSpinFailed)
}

#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum SelectionError {
    #[error("selection requires at least 2 evaluated chromosomes, got {0}")]
    PopulationTooSmall(usize),
    #[error("internal error: roulette wheel failed to select a chromosome")]
    RouletteSpinFailed,
}

/// Returns one uniformly chosen chromosome.
pub(crate) fn select_random<'a>(
    population: &'a EvaluatedPopulation,
    rng: &mut impl Rng,
) -> Result<&'a Chromosome, SelectionError> {
    if population.len() < 2 {
        return Err(SelectionError::PopulationTooSmall(population.len()));
    }

    let index = rng.random_range(0..population.len());
    Ok(&population.entries()[index].0)
}

/// Returns two distinct chromosomes by fitness-proportionate selection.
///
/// The second draw resamples until it lands on a different chromosome
/// than the first.
pub(crate) fn select_roulette_pair<'a>(
    population: &'a EvaluatedPopulation,
    rng: &mut impl Rng,
) -> Result<(&'a Chromosome, &'a Chromosome), SelectionError> {
    if population.len() < 2 {
        return Err(SelectionError::PopulationTooSmall(population.len()));
    }

    let entries = population.entries();
    let total_fitness = population.total_fitness();

    let first = spin_roulette(entries, total_fitness, rng)?;
    let second = loop {
        let candidate = spin_roulette(entries, total_fitness, rng)?;
        if candidate != first {
            break candidate;
        }
    };

    Ok((&entries[first].0, &entries[second].0))
}
