pub mod config;
pub mod fetch;
pub mod graph;
pub mod ic;
pub mod mica;
pub mod similarity;
pub mod storage;

pub use config::{Config, ConfigError, FetchConfig, GraphConfig, LogConfig, MatrixConfig};
pub use fetch::{FetchError, Fetcher};
pub use graph::{Dag, GraphError, NodeIndex, Term};
pub use ic::{compute_information_content, count_descendants, descendants, information_content, IcSummary};
pub use mica::{ancestors, common_ancestors, MicaError, MicaFinder, MicaResult};
pub use similarity::{tsv_field, MatrixOptions, MatrixStats, SimilarityError, SimilarityMatrix, MATRIX_HEADER};
pub use storage::{Format, GraphFile, GraphFormat, GraphMlFormat, JsonFormat, StorageError};
