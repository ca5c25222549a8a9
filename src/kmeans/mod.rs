//! k-means clustering of labeled data and propagation of cluster labels.
//!
//! Centroids are initialized with the first k training points, so the result is fully determined
//! by k and the order of the training table. Each iteration moves centroids to the mean of their
//! members, then labels each centroid with the majority label of its members.

mod algorithm;
mod error;
mod params;

pub use algorithm::*;
pub use error::*;
pub use params::*;
