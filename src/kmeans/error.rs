use thiserror::Error;

pub type Result<T> = std::result::Result<T, KMeansError>;

/// Errors of the clustering engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansError {
    /// a parameter is out of its admissible range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// the data cannot be clustered
    #[error("invalid data: {0}")]
    InvalidData(String),
    /// a centroid got no member and the policy asks to stop
    #[error("empty cluster {cluster} at iteration {iteration}")]
    EmptyCluster { cluster: usize, iteration: usize },
}
