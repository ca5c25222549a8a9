//! parameters of the clustering

use num_traits::float::Float;

use super::error::{KMeansError, Result};

/// default bound on the number of iterations
pub const DEFAULT_MAX_ITER: usize = 300;

/// When do we stop iterating
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Convergence<T> {
    /// centroids must be bitwise identical between two iterations
    Exact,
    /// every centroid coordinate moved by at most the given amount
    Tolerance(T),
}

/// What to do with a centroid that has no training point as member
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EmptyClusterPolicy {
    /// the centroid keeps its previous position
    HoldPosition,
    /// iteration stops with [KMeansError::EmptyCluster]
    Fail,
}

/// Parameters of the clustering. Build with [KMeansParams::new] then the setters, and validate with [KMeansParams::check].
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansParams<T> {
    /// number of centroids
    nb_cluster: usize,
    //
    convergence: Convergence<T>,
    /// we exit the loop after max_iter iterations even if not converged
    max_iter: usize,
    //
    empty_cluster: EmptyClusterPolicy,
    // print centroids at each iteration
    trace: bool,
}

impl<T: Float> KMeansParams<T> {
    /// `nb_cluster` is mandatory.
    /// Defaults : exact convergence, max_iter = 300, empty clusters hold their position, no trace.
    pub fn new(nb_cluster: usize) -> Self {
        KMeansParams {
            nb_cluster,
            convergence: Convergence::Exact,
            max_iter: DEFAULT_MAX_ITER,
            empty_cluster: EmptyClusterPolicy::HoldPosition,
            trace: false,
        }
    }

    pub fn convergence(mut self, convergence: Convergence<T>) -> Self {
        self.convergence = convergence;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn empty_cluster(mut self, policy: EmptyClusterPolicy) -> Self {
        self.empty_cluster = policy;
        self
    }

    /// if true, centroids are printed on stdout at each iteration
    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn get_nb_cluster(&self) -> usize {
        self.nb_cluster
    }

    pub fn get_convergence(&self) -> Convergence<T> {
        self.convergence
    }

    pub fn get_max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn get_empty_cluster(&self) -> EmptyClusterPolicy {
        self.empty_cluster
    }

    pub fn get_trace(&self) -> bool {
        self.trace
    }

    /// checks parameters against the size of the training table
    pub fn check(&self, nb_data: usize) -> Result<()> {
        if self.nb_cluster == 0 {
            return Err(KMeansError::InvalidParameter(
                "number of clusters must be at least 1".into(),
            ));
        }
        if self.nb_cluster > nb_data {
            return Err(KMeansError::InvalidParameter(format!(
                "number of clusters {} exceeds number of training data {}",
                self.nb_cluster, nb_data
            )));
        }
        if self.max_iter == 0 {
            return Err(KMeansError::InvalidParameter(
                "max_iter must be at least 1".into(),
            ));
        }
        if let Convergence::Tolerance(eps) = self.convergence {
            if !(eps >= T::zero()) {
                return Err(KMeansError::InvalidParameter(
                    "tolerance must be non negative".into(),
                ));
            }
        }
        Ok(())
    } // end of check
} // end of impl KMeansParams

// end of mod tests
