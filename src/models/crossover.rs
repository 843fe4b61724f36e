use crate::models::{Chromosome, Gene};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum CrossoverError {
    #[error("internal error: crossover hole count mismatch")]
    HoleCountMismatch,
}

/// Deletes, from a child, the gene a selected locus carries in the other
/// parent, leaving a hole to be refilled in locus order.
fn punch_hole(child: &mut [Option<Gene>], gene: Gene) -> Result<(), CrossoverError> {
    let position = child
        .iter()
        .position(|slot| *slot == Some(gene))
        .ok_or(CrossoverError::HoleCountMismatch)?;

    child[position] = None;
    Ok(())
}

/// Fills the first remaining hole of a child with the given gene.
fn fill_hole(child: &mut [Option<Gene>], gene: Gene) -> Result<(), CrossoverError> {
    let position = child
        .iter()
        .position(|slot| slot.is_none())
        .ok_or(CrossoverError::HoleCountMismatch)?;

    child[position] = Some(gene);
    Ok(())
}

/// Position-based partial crossover over an ordered parent pair.
///
/// A random set of loci is selected (never position 0 when the origin is
/// fixed). Each child starts as a copy of its like-indexed parent; at
/// every selected locus the gene the other parent carries there is
/// deleted from the child, and the holes are then refilled with those
/// genes in ascending locus order. Both children remain permutations.
#[instrument(level = "debug", skip(rng, parent_a, parent_b), fields(tour_length = parent_a.len(), fixed_origin = fixed_origin))]
pub(crate) fn crossover(
    parent_a: &Chromosome,
    parent_b: &Chromosome,
    fixed_origin: bool,
    rng: &mut impl Rng,
) -> Result<(Chromosome, Chromosome), CrossoverError> {
    let n = parent_a.len();
    let first_locus = if fixed_origin { 1 } else { 0 };

    let mut positions: Vec<usize> = (first_locus..n).collect();
    let count = rng.random_range(1..=positions.len());
    positions.shuffle(rng);

    let mut loci = positions[..count].to_vec();
    loci.sort_unstable();

    let mut child_a: Vec<Option<Gene>> = parent_a.genes().iter().copied().map(Some).collect();
    let mut child_b: Vec<Option<Gene>> = parent_b.genes().iter().copied().map(Some).collect();

    for &locus in &loci {
        punch_hole(&mut child_a, parent_b.genes()[locus])?;
        punch_hole(&mut child_b, parent_a.genes()[locus])?;
    }

    for &locus in &loci {
        fill_hole(&mut child_a, parent_b.genes()[locus])?;
        fill_hole(&mut child_b, parent_a.genes()[locus])?;
    }

    let child_a: Vec<Gene> = child_a
        .into_iter()
        .collect::<Option<_>>()
        .ok_or(CrossoverError::HoleCountMismatch)?;
    let child_b: Vec<Gene> = child_b
        .into_iter()
        .collect::<Option<_>>()
        .ok_or(CrossoverError::HoleCountMismatch)?;

    Ok((Chromosome::new(child_a), Chromosome::new(child_b)))
}
