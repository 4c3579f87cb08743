//! Pairwise similarity table.
//!
//! Streams one TSV row per term pair with its MICA and similarity
//! (the MICA's information content). Rows are written as they are
//! computed, so large runs can be windowed with `skip`/`nmax` and resumed.

use std::borrow::Cow;
use std::io::Write;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::graph::{Dag, GraphError, NodeIndex};
use crate::mica::{MicaError, MicaFinder};

/// Column header of the similarity table.
pub const MATRIX_HEADER: &str =
    "nodeA_id\tnodeA_name\tnodeB_id\tnodeB_name\tmica_id\tmica_name\tsimilarity";

/// Replaces tabs and line breaks, which would shift TSV columns, with spaces.
pub fn tsv_field(value: &str) -> Cow<'_, str> {
    if value.contains(['\t', '\n', '\r']) {
        Cow::Owned(value.replace(['\t', '\n', '\r'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Mica(#[from] MicaError),

    #[error("Failed to write similarity row: {0}")]
    Io(#[from] std::io::Error),
}

/// Selection of the rows to emit.
#[derive(Debug, Clone, Default)]
pub struct MatrixOptions {
    /// Only emit pairs with this term as node A.
    pub node: Option<String>,
    /// Number of terms to skip: node-A terms in full mode, node-B terms
    /// when `node` is set.
    pub skip: usize,
    /// Maximum number of terms to process, counted like `skip`.
    pub nmax: Option<usize>,
    /// Emit pairs whose similarity is zero.
    pub include_zero: bool,
    /// Decimal places for the similarity column; full precision if unset.
    pub precision: Option<usize>,
}

/// Counters reported after a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatrixStats {
    pub pairs: usize,
    pub rows: usize,
    pub zero: usize,
    pub errors: usize,
}

/// Pairwise MICA similarity over a graph with computed information content.
pub struct SimilarityMatrix<'a> {
    finder: MicaFinder<'a>,
    options: MatrixOptions,
}

impl<'a> SimilarityMatrix<'a> {
    pub fn new(dag: &'a Dag, options: MatrixOptions) -> Result<Self, SimilarityError> {
        let finder = MicaFinder::new(dag)?;
        if let Some(id) = &options.node {
            dag.require(id)?;
        }
        Ok(Self { finder, options })
    }

    /// Node-A terms covered by the current options.
    pub fn row_nodes(&self) -> Vec<NodeIndex> {
        let dag = self.finder.dag();
        match &self.options.node {
            Some(id) => dag.index_of(id).into_iter().collect(),
            None => (0..dag.len())
                .skip(self.options.skip)
                .take(self.options.nmax.unwrap_or(usize::MAX))
                .collect(),
        }
    }

    /// Writes the header and every selected row to `out`.
    pub fn write_tsv<W: Write>(&self, out: W) -> Result<MatrixStats, SimilarityError> {
        self.write_tsv_with_progress(out, |_| {})
    }

    /// Like [`SimilarityMatrix::write_tsv`], calling `progress` after each
    /// node-A term is finished with the number finished so far.
    pub fn write_tsv_with_progress<W, F>(&self, mut out: W, mut progress: F) -> Result<MatrixStats, SimilarityError>
    where
        W: Write,
        F: FnMut(usize),
    {
        let dag = self.finder.dag();
        let single_row = self.options.node.is_some();
        let skip = self.options.skip;
        let nmax = self.options.nmax.unwrap_or(usize::MAX);
        let mut stats = MatrixStats::default();

        writeln!(out, "{MATRIX_HEADER}")?;

        for (done, a) in self.row_nodes().into_iter().enumerate() {
            // Full mode emits each unordered pair once.
            let partners: Box<dyn Iterator<Item = NodeIndex>> = if single_row {
                Box::new((0..dag.len()).filter(move |&b| b != a).skip(skip).take(nmax))
            } else {
                Box::new(a + 1..dag.len())
            };

            for b in partners {
                stats.pairs += 1;
                let mica = match self.finder.find(a, b) {
                    Ok(mica) => mica,
                    Err(e) => {
                        warn!(a = %dag.term(a).id, b = %dag.term(b).id, error = %e, "MICA lookup failed");
                        stats.errors += 1;
                        continue;
                    }
                };

                if mica.ic == 0.0 && !self.options.include_zero {
                    stats.zero += 1;
                    continue;
                }

                let (ta, tb, tm) = (dag.term(a), dag.term(b), dag.term(mica.node));
                let similarity = match self.options.precision {
                    Some(p) => format!("{:.*}", p, mica.ic),
                    None => format!("{}", mica.ic),
                };
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    tsv_field(&ta.id),
                    tsv_field(&ta.name),
                    tsv_field(&tb.id),
                    tsv_field(&tb.name),
                    tsv_field(&tm.id),
                    tsv_field(&tm.name),
                    similarity
                )?;
                stats.rows += 1;
            }

            debug!(node = %dag.term(a).id, rows = stats.rows, "Finished row");
            progress(done + 1);
        }

        out.flush()?;
        info!(
            pairs = stats.pairs,
            rows = stats.rows,
            zero = stats.zero,
            errors = stats.errors,
            "Similarity table written"
        );
        Ok(stats)
    }
}
