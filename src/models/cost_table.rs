use tracing::instrument;

/// A single edge cost. Synthetic instances carry truncated Euclidean
/// distances, real instances carry provider-reported durations in seconds.
pub type Cost = f64;

/// Dense N×N cost matrix indexed by (origin, destination).
///
/// Stored row-major in a contiguous buffer of length N². Diagonal entries
/// are 0 by definition. The table is immutable for the duration of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct CostTable {
    dimension: usize,
    costs: Vec<Cost>,
}

#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq))]
pub enum CostTableError {
    #[error("cost table rows do not form a {expected}x{expected} matrix")]
    NotSquare { expected: usize },
    #[error("cost for ({from}, {to}) is negative: {cost}")]
    NegativeCost { from: usize, to: usize, cost: Cost },
    #[error("missing cost for pair ({from}, {to})")]
    MissingPair { from: usize, to: usize },
    #[error("duplicate cost for pair ({from}, {to})")]
    DuplicatePair { from: usize, to: usize },
}

impl CostTable {
    /// Builds a table from full rows, overwriting the diagonal with zeros.
    pub fn from_rows(rows: Vec<Vec<Cost>>) -> Result<Self, CostTableError> {
        let dimension = rows.len();

        if rows.iter().any(|row| row.len() != dimension) {
            return Err(CostTableError::NotSquare {
                expected: dimension,
            });
        }

        let mut costs = Vec::with_capacity(dimension * dimension);
        for (from, row) in rows.into_iter().enumerate() {
            for (to, cost) in row.into_iter().enumerate() {
                if from == to {
                    costs.push(0.0);
                    continue;
                }

                if cost < 0.0 {
                    return Err(CostTableError::NegativeCost { from, to, cost });
                }

                costs.push(cost);
            }
        }

        Ok(Self { dimension, costs })
    }

    /// Builds a table from the N(N-1) off-diagonal pairs, in any order.
    ///
    /// Entries are sorted lexicographically by (origin, destination) before
    /// assembly so consumers may assume contiguous row layout. Every
    /// off-diagonal pair must appear exactly once.
    #[instrument(level = "debug", skip(pairs), fields(dimension = dimension, pairs = pairs.len()))]
    pub fn from_pairs(
        dimension: usize,
        mut pairs: Vec<(usize, usize, Cost)>,
    ) -> Result<Self, CostTableError> {
        pairs.sort_by_key(|&(from, to, _)| (from, to));

        let mut costs = vec![0.0; dimension * dimension];
        let mut expected = pairs.iter();

        for from in 0..dimension {
            for to in 0..dimension {
                if from == to {
                    continue;
                }

                match expected.next() {
                    Some(&(f, t, cost)) if f == from && t == to => {
                        if cost < 0.0 {
                            return Err(CostTableError::NegativeCost { from, to, cost });
                        }
                        costs[from * dimension + to] = cost;
                    }
                    Some(&(f, t, _)) if (f, t) < (from, to) => {
                        return Err(CostTableError::DuplicatePair { from: f, to: t });
                    }
                    _ => return Err(CostTableError::MissingPair { from, to }),
                }
            }
        }

        if let Some(&(from, to, _)) = expected.next() {
            return Err(CostTableError::DuplicatePair { from, to });
        }

        Ok(Self { dimension, costs })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of entries, always dimension².
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn cost(&self, from: usize, to: usize) -> Cost {
        self.costs[from * self.dimension + to]
    }
}
