pub use crate::clustering::kmeans::{kmeans, KmeansParams, KmeansResult};
pub use crate::clustering::labels::extract_clusters;
pub use crate::clustering::silhouette::silhouette_score;
pub use crate::data::init::{initialise_h, parse_h_initialisation, HInit, DEFAULT_SEED};
pub use crate::data::io::{format_matrix, read_points};
pub use crate::data::structures::{mat_to_rows, rows_to_mat};
pub use crate::error::{Result, SymNmfError};
pub use crate::training::symnmf_optimiser::{
    factorise_h, parse_factor_optimiser, FactorOptimiser, FactorParams,
};
pub use crate::training::{FactorState, FactorisationResult};
pub use crate::{symnmf, SymNmfParams, SymNmfResult};
