//! defines data description

use num_traits::float::Float;

use std::fmt::Debug;

/// data identifier, the rank of the point in its table
pub type PointId = usize;

/// A row of a data table: a feature vector, with a binary label for training data.
#[derive(Debug, Clone)]
pub struct Point<T> {
    // rank in the table the point was read from
    id: PointId,
    /// features
    p: Vec<T>,
    /// ground truth label, 0 or 1. None for data to classify
    label: Option<u32>,
}

impl<T> Point<T>
where
    T: Float + Debug,
{
    /// a labeled point, as found in a training table
    pub fn new(id: PointId, p: Vec<T>, label: u32) -> Self {
        Point {
            id,
            p,
            label: Some(label),
        }
    }

    /// a point to classify
    pub fn new_unlabeled(id: PointId, p: Vec<T>) -> Self {
        Point { id, p, label: None }
    }

    /// get the original label if any
    pub fn get_label(&self) -> Option<u32> {
        self.label
    }

    /// get id
    pub fn get_id(&self) -> PointId {
        self.id
    }

    /// gets the points features
    pub fn get_position(&self) -> &[T] {
        &self.p
    }

    pub fn get_dimension(&self) -> usize {
        self.p.len()
    }
} // end of impl Point

// end of mod tests
