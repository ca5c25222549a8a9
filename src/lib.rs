//! Binary classification of unlabeled data by k-means clustering of labeled data.
//!
//! Training points are clustered with a deterministic k-means (the first k training points are the
//! initial centroids), each centroid receives the majority label of its training members, and each
//! unlabeled point receives the label of its nearest centroid.
//!
//! - [data] reads and writes the whitespace delimited tables and label files
//! - [kmeans] holds the clustering and labeling engine
//! - [merit] compares a labelling against a reference one

use lazy_static::lazy_static;

lazy_static! {
    static ref LOG: u64 = init_log();
}

// install a logger facility
fn init_log() -> u64 {
    let _res = env_logger::try_init();
    1
}

/// installs the logger once, further calls are no-op
pub fn install_logger() {
    lazy_static::initialize(&LOG);
}

pub mod data;
pub mod kmeans;
pub mod merit;
pub mod point;
