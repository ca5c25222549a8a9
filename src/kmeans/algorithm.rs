//! The clustering engine.
//!
//! The iteration is the classical Lloyd step:
//!  1. each training point is affected to its nearest centroid (first minimum wins on ties)
//!  2. each centroid moves to the mean of its members
//!  3. convergence is checked between old and new positions
//!  4. each centroid is labeled by majority vote of its members, with respect to the new positions.
//!
//! All accumulators are local to an iteration, the only state kept between iterations is the centroid set.

use anyhow::Context;

use ndarray::{Array2, ArrayView1};
use num_traits::cast::{NumCast, ToPrimitive};
use num_traits::float::Float;

use std::fmt::Debug;
use std::path::Path;

use super::error::{KMeansError, Result};
use super::params::{Convergence, EmptyClusterPolicy, KMeansParams};
use crate::point::Point;

/// summary of a call to [KMeans::fit]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FitReport {
    /// number of iterations done by this fit
    pub nb_iter: usize,
    /// false if we stopped on max_iter
    pub converged: bool,
}

#[cfg_attr(doc, katexit::katexit)]
/// Euclidean distance between the features of a datum and a centroid:
/// $$ d(x, c) = \sqrt{\sum_i (x_i - c_i)^2} $$
/// Labels are never part of the features.
pub fn distance<T: Float>(datum: &[T], centroid: &[T]) -> T {
    l2_dist(datum, centroid.iter())
}

fn l2_dist<'a, T: Float + 'a>(datum: &[T], centroid: impl Iterator<Item = &'a T>) -> T {
    datum
        .iter()
        .zip(centroid)
        .fold(T::zero(), |acc, (a, b)| acc + (*a - *b) * (*a - *b))
        .sqrt()
}

/// label of a cluster with `positive` members labeled 1 and `negative` members labeled 0.
/// Ties (and empty clusters) give 0.
pub fn majority_label(positive: usize, negative: usize) -> u32 {
    if positive > negative { 1 } else { 0 }
}

/// k-means engine. Centroids are stored in a (nb_cluster, dim) array, row i is cluster i.
#[derive(Debug, Clone)]
pub struct KMeans<T> {
    params: KMeansParams<T>,
    // dimension of features
    dim: usize,
    //
    centroids: Array2<T>,
    // label of each centroid
    labels: Vec<u32>,
    // number of iterations done since construction
    nb_iter: usize,
}

impl<T> KMeans<T>
where
    T: Float + Debug,
{
    /// checks parameters and training data, and initializes centroids with the first nb_cluster training points
    /// (features and label).
    pub fn new(params: KMeansParams<T>, training: &[Point<T>]) -> Result<Self> {
        if training.is_empty() {
            return Err(KMeansError::InvalidData("training table is empty".into()));
        }
        params.check(training.len())?;
        let dim = training[0].get_dimension();
        if dim == 0 {
            return Err(KMeansError::InvalidData("training data have no feature".into()));
        }
        check_table(training, dim, true)?;
        //
        let nb_cluster = params.get_nb_cluster();
        let mut centroids = Array2::<T>::zeros((nb_cluster, dim));
        let mut labels = Vec::<u32>::with_capacity(nb_cluster);
        for (i, p) in training.iter().take(nb_cluster).enumerate() {
            centroids
                .row_mut(i)
                .assign(&ArrayView1::from(p.get_position()));
            labels.push(p.get_label().unwrap_or(0));
        }
        log::debug!("initialized {} centroids in dimension {}", nb_cluster, dim);
        //
        Ok(KMeans {
            params,
            dim,
            centroids,
            labels,
            nb_iter: 0,
        })
    } // end of new

    pub fn get_params(&self) -> &KMeansParams<T> {
        &self.params
    }

    pub fn get_nb_cluster(&self) -> usize {
        self.labels.len()
    }

    pub fn get_dimension(&self) -> usize {
        self.dim
    }

    /// centroids features, row i is centroid i
    pub fn get_centroids(&self) -> &Array2<T> {
        &self.centroids
    }

    /// centroids labels
    pub fn get_labels(&self) -> &[u32] {
        &self.labels
    }

    /// total number of iterations done
    pub fn get_nb_iter(&self) -> usize {
        self.nb_iter
    }

    /// returns the rank of the centroid nearest to datum.
    /// The scan is in centroid order with a strict comparison, so the first of equidistant centroids wins.
    pub fn nearest_centroid(&self, datum: &[T]) -> usize {
        nearest(&self.centroids, datum)
    }

    /// runs one iteration on training data, returns true if centroids did not move (according to the convergence rule)
    pub fn iterate(&mut self, training: &[Point<T>]) -> Result<bool> {
        check_table(training, self.dim, true)?;
        if self.params.get_trace() {
            self.dump_centroids();
        }
        let iteration = self.nb_iter + 1;
        let (nb_cluster, dim) = self.centroids.dim();
        // sum members into new centroids
        let mut new_centroids = Array2::<T>::zeros((nb_cluster, dim));
        let mut counts = vec![0usize; nb_cluster];
        for p in training {
            let c = nearest(&self.centroids, p.get_position());
            for (s, x) in new_centroids.row_mut(c).iter_mut().zip(p.get_position()) {
                *s = *s + *x;
            }
            counts[c] += 1;
        }
        // take means
        for (c, count) in counts.iter().enumerate() {
            if *count == 0 {
                match self.params.get_empty_cluster() {
                    EmptyClusterPolicy::HoldPosition => {
                        log::warn!(
                            "iteration {} : cluster {} has no member, keeping its position",
                            iteration,
                            c
                        );
                        new_centroids.row_mut(c).assign(&self.centroids.row(c));
                    }
                    EmptyClusterPolicy::Fail => {
                        log::error!("iteration {} : cluster {} has no member", iteration, c);
                        return Err(KMeansError::EmptyCluster {
                            cluster: c,
                            iteration,
                        });
                    }
                }
            } else {
                let n: T = <T as NumCast>::from(*count).ok_or_else(|| {
                    KMeansError::InvalidData(format!("cannot convert count {}", count))
                })?;
                new_centroids.row_mut(c).mapv_inplace(|s| s / n);
            }
        }
        //
        let converged = match self.params.get_convergence() {
            Convergence::Exact => new_centroids
                .iter()
                .zip(self.centroids.iter())
                .all(|(new, old)| new == old),
            Convergence::Tolerance(eps) => new_centroids
                .iter()
                .zip(self.centroids.iter())
                .all(|(new, old)| (*new - *old).abs() <= eps),
        };
        self.centroids = new_centroids;
        self.nb_iter = iteration;
        self.relabel(training);
        log::debug!(
            "iteration {} , cluster sizes {:?}, converged : {}",
            iteration,
            counts,
            converged
        );
        Ok(converged)
    } // end of iterate

    // majority vote of members of each centroid, members computed with current centroids
    fn relabel(&mut self, training: &[Point<T>]) {
        let nb_cluster = self.get_nb_cluster();
        let mut positive = vec![0usize; nb_cluster];
        let mut negative = vec![0usize; nb_cluster];
        for p in training {
            let c = nearest(&self.centroids, p.get_position());
            match p.get_label() {
                Some(1) => positive[c] += 1,
                _ => negative[c] += 1,
            }
        }
        for c in 0..nb_cluster {
            self.labels[c] = majority_label(positive[c], negative[c]);
        }
    } // end of relabel

    /// iterates until convergence or max_iter iterations
    pub fn fit(&mut self, training: &[Point<T>]) -> Result<FitReport> {
        let max_iter = self.params.get_max_iter();
        let mut nb_iter = 0;
        let mut converged = false;
        while nb_iter < max_iter && !converged {
            converged = self.iterate(training)?;
            nb_iter += 1;
        }
        if converged {
            log::info!("kmeans converged after {} iterations", nb_iter);
        } else {
            log::warn!("kmeans not converged after {} iterations", nb_iter);
        }
        if log::log_enabled!(log::Level::Info) {
            let cost = self.compute_cost(training);
            log::info!(
                "mean distance to centroid : {:.3e}",
                cost.to_f64().unwrap_or(f64::NAN)
            );
        }
        Ok(FitReport { nb_iter, converged })
    } // end of fit

    /// label of nearest centroid for each datum, in order
    pub fn predict(&self, data: &[Point<T>]) -> Result<Vec<u32>> {
        check_table(data, self.dim, false)?;
        let labels = data
            .iter()
            .map(|p| self.labels[nearest(&self.centroids, p.get_position())])
            .collect();
        Ok(labels)
    }

    /// mean distance of data to their nearest centroid
    pub fn compute_cost(&self, data: &[Point<T>]) -> T {
        if data.is_empty() {
            return T::zero();
        }
        let total = data.iter().fold(T::zero(), |acc, p| {
            let c = nearest(&self.centroids, p.get_position());
            acc + l2_dist(p.get_position(), self.centroids.row(c).iter())
        });
        total / <T as NumCast>::from(data.len()).unwrap_or_else(T::one)
    }

    /// prints centroids features, one list by centroid, then a separator line
    pub fn dump_centroids(&self) {
        for c in self.centroids.outer_iter() {
            println!("{:?}", c.to_vec());
        }
        println!("-------------------");
    }

    /// writes centroids in a csv file, one record by centroid : label then features
    pub fn dump_centroids_csv(&self, path: &Path) -> anyhow::Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("could not create {}", path.display()))?;
        for (c, row) in self.centroids.outer_iter().enumerate() {
            let mut record = Vec::<String>::with_capacity(self.dim + 1);
            record.push(self.labels[c].to_string());
            for x in row.iter() {
                record.push(format!("{}", x.to_f64().unwrap_or(f64::NAN)));
            }
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        log::info!("dumped {} centroids in {}", self.get_nb_cluster(), path.display());
        Ok(())
    } // end of dump_centroids_csv
} // end of impl KMeans

/// clusters training data and returns the label propagated to each test datum
pub fn classify<T>(params: KMeansParams<T>, training: &[Point<T>], test: &[Point<T>]) -> Result<Vec<u32>>
where
    T: Float + Debug,
{
    let mut kmeans = KMeans::new(params, training)?;
    kmeans.fit(training)?;
    kmeans.predict(test)
}

// first minimum under strict comparison
fn nearest<T: Float>(centroids: &Array2<T>, datum: &[T]) -> usize {
    let mut closest = 0;
    let mut min = T::max_value();
    for (i, c) in centroids.outer_iter().enumerate() {
        let d = l2_dist(datum, c.iter());
        if d < min {
            closest = i;
            min = d;
        }
    }
    closest
}

// all points must have dimension dim, and a binary label if labeled is asked
fn check_table<T: Float + Debug>(data: &[Point<T>], dim: usize, labeled: bool) -> Result<()> {
    for p in data {
        if p.get_dimension() != dim {
            return Err(KMeansError::InvalidData(format!(
                "datum {} has dimension {}, expected {}",
                p.get_id(),
                p.get_dimension(),
                dim
            )));
        }
        if p.get_position().iter().any(|x| !x.is_finite()) {
            return Err(KMeansError::InvalidData(format!(
                "datum {} has a non finite feature",
                p.get_id()
            )));
        }
        if labeled {
            match p.get_label() {
                Some(0) | Some(1) => {}
                Some(l) => {
                    return Err(KMeansError::InvalidData(format!(
                        "datum {} has label {}, expected 0 or 1",
                        p.get_id(),
                        l
                    )));
                }
                None => {
                    return Err(KMeansError::InvalidData(format!(
                        "training datum {} has no label",
                        p.get_id()
                    )));
                }
            }
        }
    }
    Ok(())
} // end of check_table

//========================================================

// end of mod tests
