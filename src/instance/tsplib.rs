use crate::models::{CostTable, CostTableError, Point};
use tracing::instrument;

/// A parsed synthetic instance: node coordinates plus file metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TsplibInstance {
    pub name: String,
    pub problem_type: String,
    pub dimension: usize,
    pub nodes: Vec<Point>,
}

#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq))]
pub enum InstanceError {
    #[error("problem type not supported: edge weight type {0:?}")]
    UnsupportedEdgeWeightType(String),
    #[error("missing or invalid DIMENSION directive")]
    MissingDimension,
    #[error("malformed node line {line}: {content:?}")]
    MalformedNode { line: usize, content: String },
    #[error("expected {expected} node coordinates, found {found}")]
    NodeCountMismatch { expected: usize, found: usize },
    #[error(transparent)]
    CostTable(#[from] CostTableError),
}

/// The sections a TSPLIB file interleaves with its keyed directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    NodeCoords,
    EdgeWeights,
    DisplayData,
}

impl TsplibInstance {
    /// Parses the TSPLIB subset used for synthetic instances.
    ///
    /// Recognised directives are `NAME:`, `TYPE:`, `DIMENSION:` and
    /// `EDGE_WEIGHT_TYPE:`; recognised sections are `NODE_COORD_SECTION`,
    /// `EDGE_WEIGHT_SECTION`, `DISPLAY_DATA_SECTION` and the `EOF`
    /// sentinel. Only `EUC_2D` edge weights are supported. Node lines are
    /// 1-based in the file and stored 0-based.
    #[instrument(level = "debug", skip(content))]
    pub fn parse(content: &str) -> Result<Self, InstanceError> {
        let mut name = String::new();
        let mut problem_type = String::new();
        let mut dimension: Option<usize> = None;
        let mut nodes = Vec::new();
        let mut section = Section::Header;

        for (line_number, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if line == "EOF" {
                break;
            }

            match line {
                "NODE_COORD_SECTION" => {
                    section = Section::NodeCoords;
                    continue;
                }
                "EDGE_WEIGHT_SECTION" => {
                    section = Section::EdgeWeights;
                    continue;
                }
                "DISPLAY_DATA_SECTION" => {
                    section = Section::DisplayData;
                    continue;
                }
                _ => {}
            }

            match section {
                Section::Header => {
                    let Some((key, value)) = line.split_once(':') else {
                        continue;
                    };

                    match key.trim() {
                        "NAME" => name = value.trim().to_string(),
                        "TYPE" => problem_type = value.trim().to_string(),
                        "DIMENSION" => {
                            dimension = Some(value.trim().parse().map_err(|_| {
                                InstanceError::MissingDimension
                            })?);
                        }
                        "EDGE_WEIGHT_TYPE" => {
                            let value = value.trim();
                            if value != "EUC_2D" {
                                return Err(InstanceError::UnsupportedEdgeWeightType(
                                    value.to_string(),
                                ));
                            }
                        }
                        _ => {}
                    }
                }
                Section::NodeCoords => {
                    nodes.push(parse_node_line(line, line_number + 1)?);
                }
                // Explicit weights and display data never occur with
                // EUC_2D; their contents are skipped
                Section::EdgeWeights | Section::DisplayData => {}
            }
        }

        let dimension = dimension.ok_or(InstanceError::MissingDimension)?;
        if nodes.len() != dimension {
            return Err(InstanceError::NodeCountMismatch {
                expected: dimension,
                found: nodes.len(),
            });
        }

        Ok(Self {
            name,
            problem_type,
            dimension,
            nodes,
        })
    }

    /// Enumerates all ordered node pairs into a dense cost table with
    /// truncated Euclidean distances and a zero diagonal.
    pub fn cost_table(&self) -> Result<CostTable, InstanceError> {
        let rows = self
            .nodes
            .iter()
            .map(|from| self.nodes.iter().map(|to| from.distance(to)).collect())
            .collect();

        Ok(CostTable::from_rows(rows)?)
    }
}

/// Parses `<1-based index> x y [z]`.
fn parse_node_line(line: &str, line_number: usize) -> Result<Point, InstanceError> {
    let malformed = || InstanceError::MalformedNode {
        line: line_number,
        content: line.to_string(),
    };

    let mut parts = line.split_whitespace();

    let _index: usize = parts.next().ok_or_else(malformed)?.parse().map_err(|_| malformed())?;
    let x: f64 = parts.next().ok_or_else(malformed)?.parse().map_err(|_| malformed())?;
    let y: f64 = parts.next().ok_or_else(malformed)?.parse().map_err(|_| malformed())?;

    match parts.next() {
        Some(z) => {
            let z: f64 = z.parse().map_err(|_| malformed())?;
            Ok(Point::with_z(x, y, z))
        }
        None => Ok(Point::new(x, y)),
    }
}
