//! Text-format graph input with validation
//!
//! The exchange format is a header line `n m t` followed by exactly `m`
//! lines `u v w`. Every edge line creates the two mirrored records of an
//! undirected edge. All validation happens here, before any clustering
//! state exists.

use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::Result;
use thiserror::Error;

use crate::graph::MirroredGraph;

/// Parsed problem instance: the graph plus the requested stretch factor
#[derive(Debug)]
pub struct GraphInput {
    pub graph: MirroredGraph,
    pub stretch: u32,
}

/// Malformed-input failures
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing header line")]
    MissingHeader,

    #[error("malformed header: expected `n m t`, got {0:?}")]
    MalformedHeader(String),

    #[error("edge line {line}: expected `u v w`, got {text:?}")]
    MalformedEdge { line: usize, text: String },

    #[error("edge line {line}: vertex {vertex} out of range (n = {n})")]
    VertexOutOfRange { line: usize, vertex: i64, n: usize },

    #[error("edge line {line}: negative weight {weight}")]
    NegativeWeight { line: usize, weight: i64 },

    #[error("declared {declared} edges but found {found}")]
    EdgeCountMismatch { declared: usize, found: usize },

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse a problem instance from a reader
pub fn parse_graph<R: BufRead>(reader: R) -> Result<GraphInput, ParseError> {
    let mut lines = reader.lines();

    let header = loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Err(ParseError::MissingHeader),
        }
    };
    let (n, m, stretch) = parse_header(&header)?;

    let mut graph = MirroredGraph::new(n);
    let mut found = 0usize;
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if found < m {
            let (u, v, w) = parse_edge(found, &line, n)?;
            graph.add_edge(u, v, w);
        }
        found += 1;
    }
    if found != m {
        return Err(ParseError::EdgeCountMismatch {
            declared: m,
            found,
        });
    }

    Ok(GraphInput { graph, stretch })
}

/// Load a problem instance from a file, or from stdin when no path is given
pub fn load_input(path: Option<&str>) -> Result<GraphInput> {
    match path {
        Some(path) => {
            if !std::path::Path::new(path).exists() {
                return Err(anyhow::anyhow!("File not found: {}", path));
            }
            log::info!("Reading graph from {}", path);
            let file = File::open(path)?;
            Ok(parse_graph(BufReader::new(file))?)
        }
        None => {
            log::info!("Reading graph from stdin");
            let stdin = std::io::stdin();
            Ok(parse_graph(stdin.lock())?)
        }
    }
}

fn parse_header(line: &str) -> Result<(usize, usize, u32), ParseError> {
    let mut fields = line.split_whitespace();
    let n = fields.next().and_then(|s| s.parse::<usize>().ok());
    let m = fields.next().and_then(|s| s.parse::<usize>().ok());
    let t = fields.next().and_then(|s| s.parse::<u32>().ok());

    match (n, m, t, fields.next()) {
        (Some(n), Some(m), Some(t), None) => Ok((n, m, t)),
        _ => Err(ParseError::MalformedHeader(line.to_string())),
    }
}

fn parse_edge(index: usize, line: &str, n: usize) -> Result<(u32, u32, u64), ParseError> {
    // 1-based position in the input, counting the header
    let line_no = index + 2;

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(ParseError::MalformedEdge {
            line: line_no,
            text: line.to_string(),
        });
    }
    let values: Option<Vec<i64>> = fields.iter().map(|s| s.parse::<i64>().ok()).collect();
    let values = match values {
        Some(values) => values,
        None => {
            return Err(ParseError::MalformedEdge {
                line: line_no,
                text: line.to_string(),
            })
        }
    };

    let (u, v, w) = (values[0], values[1], values[2]);
    for vertex in [u, v] {
        if vertex < 0 || vertex as usize >= n {
            return Err(ParseError::VertexOutOfRange {
                line: line_no,
                vertex,
                n,
            });
        }
    }
    if w < 0 {
        return Err(ParseError::NegativeWeight {
            line: line_no,
            weight: w,
        });
    }

    Ok((u as u32, v as u32, w as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<GraphInput, ParseError> {
        parse_graph(text.as_bytes())
    }

    #[test]
    fn parses_a_small_instance() {
        let input = parse("3 2 3\n0 1 4\n1 2 6\n").unwrap();
        assert_eq!(input.stretch, 3);
        assert_eq!(input.graph.vertex_count(), 3);
        assert_eq!(input.graph.edge_list(), vec![(0, 1, 4), (1, 2, 6)]);
    }

    #[test]
    fn accepts_the_empty_graph() {
        let input = parse("1 0 5\n").unwrap();
        assert_eq!(input.graph.vertex_count(), 1);
        assert_eq!(input.graph.edge_count(), 0);
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(parse(""), Err(ParseError::MissingHeader)));
    }

    #[test]
    fn rejects_malformed_header() {
        assert!(matches!(
            parse("3 two 3\n"),
            Err(ParseError::MalformedHeader(_))
        ));
        assert!(matches!(
            parse("3 1 3 9\n0 1 2\n"),
            Err(ParseError::MalformedHeader(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_vertices() {
        let err = parse("3 1 3\n0 3 2\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::VertexOutOfRange {
                line: 2,
                vertex: 3,
                n: 3
            }
        ));
        assert!(matches!(
            parse("3 1 3\n-1 2 2\n"),
            Err(ParseError::VertexOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_negative_weights() {
        assert!(matches!(
            parse("3 1 3\n0 1 -5\n"),
            Err(ParseError::NegativeWeight {
                line: 2,
                weight: -5
            })
        ));
    }

    #[test]
    fn rejects_edge_count_mismatch() {
        assert!(matches!(
            parse("3 2 3\n0 1 4\n"),
            Err(ParseError::EdgeCountMismatch {
                declared: 2,
                found: 1
            })
        ));
        assert!(matches!(
            parse("3 1 3\n0 1 4\n1 2 6\n"),
            Err(ParseError::EdgeCountMismatch {
                declared: 1,
                found: 2
            })
        ));
    }

    #[test]
    fn rejects_garbage_edge_lines() {
        assert!(matches!(
            parse("3 1 3\n0 1\n"),
            Err(ParseError::MalformedEdge { line: 2, .. })
        ));
        assert!(matches!(
            parse("3 1 3\n0 1 x\n"),
            Err(ParseError::MalformedEdge { .. })
        ));
    }
}
