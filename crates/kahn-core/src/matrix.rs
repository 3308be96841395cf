//! Adjacency-matrix text import.
//!
//! The first whitespace-delimited token is the vertex count `n`. Every line
//! after the one holding `n` describes one source vertex, starting at vertex
//! 0: a `1` at byte position `j` is an edge to vertex `j`. Any other byte is
//! skipped, as is text following `n` on its own line.
//!
//! ```text
//! 3
//! 010
//! 001
//! 000
//! ```

use crate::graph::{Graph, GraphError};
use crate::id::VertexId;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while importing a matrix file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The input holds no tokens at all.
    #[error("missing vertex count")]
    MissingVertexCount,

    /// The first token does not start with a non-negative integer.
    #[error("invalid vertex count '{token}'")]
    InvalidVertexCount { token: String },

    /// The graph could not be constructed from the vertex count.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A `1` on the given (1-based) line was rejected by the graph.
    #[error("line {line}: {source}")]
    Edge {
        line: usize,
        #[source]
        source: GraphError,
    },

    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ===========================================================================
// Parsing
// ===========================================================================

/// Read and parse the matrix file at `path`.
pub fn read_graph(path: impl AsRef<Path>) -> Result<Graph, ParseError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bytes(&bytes)
}

pub fn parse(input: &str) -> Result<Graph, ParseError> {
    parse_bytes(input.as_bytes())
}

/// Parse matrix text. Column positions are byte offsets, so the input need
/// not be valid UTF-8.
#[instrument(skip(input), fields(bytes = input.len()))]
pub fn parse_bytes(input: &[u8]) -> Result<Graph, ParseError> {
    let mut lines = input
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .enumerate();

    // Blank lines before the count are skipped, like any other whitespace.
    let count = loop {
        let (_, line) = lines.next().ok_or(ParseError::MissingVertexCount)?;
        if let Some(token) = line
            .split(u8::is_ascii_whitespace)
            .find(|token| !token.is_empty())
        {
            break parse_count(token)?;
        }
    };

    let mut graph = Graph::new(count)?;

    for (row, (idx, line)) in lines.enumerate() {
        for (col, _) in line.iter().enumerate().filter(|&(_, &b)| b == b'1') {
            graph
                .add_edge(VertexId(row), VertexId(col))
                .map_err(|source| ParseError::Edge {
                    line: idx + 1,
                    source,
                })?;
        }
    }

    debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "parsed adjacency matrix"
    );
    Ok(graph)
}

/// Parse the leading integer of `token`; trailing junk is ignored.
fn parse_count(token: &[u8]) -> Result<usize, ParseError> {
    let invalid = || ParseError::InvalidVertexCount {
        token: String::from_utf8_lossy(token).into_owned(),
    };

    let unsigned = token.strip_prefix(b"+").unwrap_or(token);
    let digits = unsigned
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(unsigned, |end| &unsigned[..end]);

    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use crate::topo::detect;
    use std::io::Write;

    fn edges(graph: &Graph) -> Vec<(usize, usize)> {
        graph.edges().map(|(a, b)| (a.0, b.0)).collect()
    }

    #[test]
    fn parses_chain_and_sorts_it() {
        let graph = parse("3\n010\n001\n000\n").unwrap();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(edges(&graph), vec![(0, 1), (1, 2)]);
        assert_eq!(detect(&graph).to_string(), "0, 1, 2");
    }

    #[test]
    fn missing_trailing_newline_keeps_last_column() {
        let graph = parse("2\n01\n10").unwrap();
        assert_eq!(edges(&graph), vec![(0, 1), (1, 0)]);
        assert_eq!(detect(&graph).to_string(), "CYCLE DETECTED!");
    }

    #[test]
    fn crlf_line_endings() {
        let graph = parse("2\r\n01\r\n00\r\n").unwrap();
        assert_eq!(edges(&graph), vec![(0, 1)]);
    }

    #[test]
    fn non_one_bytes_are_skipped() {
        let graph = parse("4\n0a 1\n\n0-x1\n").unwrap();
        assert_eq!(edges(&graph), vec![(0, 3), (2, 3)]);
    }

    #[test]
    fn text_after_count_is_ignored() {
        let graph = parse("  \n 2 vertices 11\n01\n").unwrap();
        assert_eq!(edges(&graph), vec![(0, 1)]);
    }

    #[test]
    fn short_file_leaves_remaining_rows_empty() {
        let graph = parse("5\n01").unwrap();
        assert_eq!(graph.vertex_count(), 5);
        assert_eq!(edges(&graph), vec![(0, 1)]);
    }

    #[test]
    fn count_with_trailing_junk() {
        let graph = parse("3x\n").unwrap();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(parse("+2").unwrap().vertex_count(), 2);
    }

    #[test]
    fn column_out_of_range_names_line() {
        let err = parse("2\n011\n").unwrap_err();
        match err {
            ParseError::Edge { line, source } => {
                assert_eq!(line, 2);
                assert_eq!(
                    source,
                    GraphError::VertexOutOfRange {
                        vertex: VertexId(2),
                        count: 2
                    }
                );
            }
            other => panic!("expected Edge error, got {other:?}"),
        }
    }

    #[test]
    fn row_past_last_vertex_rejected() {
        let err = parse("1\n0\n1\n").unwrap_err();
        assert!(matches!(err, ParseError::Edge { line: 3, .. }));
    }

    #[test]
    fn rows_past_last_vertex_without_edges_are_fine() {
        let graph = parse("1\n0\n000\n\n").unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn missing_count() {
        assert!(matches!(parse(""), Err(ParseError::MissingVertexCount)));
        assert!(matches!(parse(" \n\t\n"), Err(ParseError::MissingVertexCount)));
    }

    #[test]
    fn invalid_counts() {
        assert!(matches!(
            parse("abc\n"),
            Err(ParseError::InvalidVertexCount { token }) if token == "abc"
        ));
        assert!(matches!(
            parse("-3\n"),
            Err(ParseError::InvalidVertexCount { .. })
        ));
        assert!(matches!(
            parse("0\n"),
            Err(ParseError::Graph(GraphError::NoVertices))
        ));
    }

    #[test]
    fn oversized_count_reports_allocation_failure() {
        assert!(matches!(
            parse("99999999999999999\n"),
            Err(ParseError::Graph(GraphError::Allocation(_)))
        ));
    }

    #[test]
    fn non_utf8_bytes_keep_column_positions() {
        let graph = parse_bytes(b"3\n\xff\xfe1\n").unwrap();
        assert_eq!(edges(&graph), vec![(0, 2)]);
    }

    #[test]
    fn reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "5\n00001\n00010\n00000\n01000\n00000\n").unwrap();

        let graph = read_graph(file.path()).unwrap();
        assert_eq!(edges(&graph), vec![(0, 4), (1, 3), (3, 1)]);
        assert!(!detect(&graph).is_acyclic());
        assert_eq!(graph.display().to_string().lines().next(), Some("number of vertices 5"));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let err = read_graph(&path).unwrap_err();
        assert!(matches!(err, ParseError::Io { path: ref p, .. } if *p == path));
        assert!(err.to_string().contains("absent.txt"));
    }

    #[test]
    fn parsed_matrix_matches_builder() {
        let from_text = parse("4\n0110\n0001\n0001\n0000\n").unwrap();
        assert_eq!(edges(&from_text), edges(&diamond()));
    }
}
