//! contingency table

use anyhow::anyhow;

use ndarray::{Array1, Array2, ArrayView1};
use std::hash::Hash;

use num_traits::int::PrimInt;
use std::marker::PhantomData;

use super::affect::*;
//================================================================================

/// Contingency table associated to the 2 affectations to compare.
/// The first affectation (the reference labels) indexes rows, the second (predicted labels) indexes columns.
pub struct Contingency<Clusterization, DataId, DataLabel>
where
    Clusterization: Affectation<DataId, DataLabel>,
    DataId: Hash + Eq + Copy + Clone + Send + Sync + std::fmt::Debug,
    DataLabel: PrimInt,
{
    // The contingency table. dimension (reference.nb_label, predicted.nb_label)
    table: Array2<usize>,
    // number of elements with each label of reference
    c1_size: Array1<usize>,
    // number of elements with each label of prediction
    c2_size: Array1<usize>,
    //
    _t_clust: PhantomData<Clusterization>,
    _t_id: PhantomData<DataId>,
    _t_label: PhantomData<DataLabel>,
}

impl<DataId, DataLabel, Clusterization> Contingency<Clusterization, DataId, DataLabel>
where
    Clusterization: Affectation<DataId, DataLabel>,
    DataId: Hash + Eq + Copy + Clone + Send + Sync + std::fmt::Debug,
    DataLabel: PrimInt + std::fmt::Debug,
{
    /// counts data by couple (reference label, predicted label). Both affectations must describe the same data.
    pub fn new(reference: Clusterization, predicted: Clusterization) -> anyhow::Result<Self> {
        if reference.get_nb_data() != predicted.get_nb_data() {
            return Err(anyhow!(
                "affectations have different sizes : {} and {}",
                reference.get_nb_data(),
                predicted.get_nb_data()
            ));
        }
        let nb_row = reference.get_nb_label();
        let nb_col = predicted.get_nb_label();
        let mut table = Array2::<usize>::zeros((nb_row, nb_col));
        //
        let rank = |label: DataLabel, nb: usize| -> anyhow::Result<usize> {
            match label.to_usize() {
                Some(r) if r < nb => Ok(r),
                _ => Err(anyhow!("label {:?} out of range 0..{}", label, nb)),
            }
        };
        for (id, l1) in reference.iter() {
            let l2 = predicted.get_affectation(id);
            table[[rank(l1, nb_row)?, rank(l2, nb_col)?]] += 1;
        }
        let c1_size = table.rows().into_iter().map(|r| r.sum()).collect();
        let c2_size = table.columns().into_iter().map(|c| c.sum()).collect();
        //
        Ok(Contingency {
            table,
            c1_size,
            c2_size,
            _t_clust: PhantomData,
            _t_id: PhantomData,
            _t_label: PhantomData,
        })
    } // end of new

    /// returns (nb_row, nb_col)
    pub fn get_dim(&self) -> (usize, usize) {
        self.table.dim()
    }

    /// row i : how reference label i was predicted
    pub fn get_row(&self, i: usize) -> ArrayView1<'_, usize> {
        self.table.row(i)
    }

    /// column j : the reference labels of data predicted as j
    pub fn get_col(&self, j: usize) -> ArrayView1<'_, usize> {
        self.table.column(j)
    }

    /// number of data having each reference label
    pub fn get_reference_sizes(&self) -> &Array1<usize> {
        &self.c1_size
    }

    /// number of data having each predicted label
    pub fn get_predicted_sizes(&self) -> &Array1<usize> {
        &self.c2_size
    }

    /// total number of data
    pub fn get_nb_data(&self) -> usize {
        self.c1_size.sum()
    }

    /// fraction of data whose predicted label equals the reference label
    pub fn get_accuracy(&self) -> f64 {
        let nb_data = self.get_nb_data();
        if nb_data == 0 {
            return 0.;
        }
        let (nb_row, nb_col) = self.get_dim();
        let agree: usize = (0..nb_row.min(nb_col)).map(|i| self.table[[i, i]]).sum();
        agree as f64 / nb_data as f64
    }

    /// logs the table, one line by reference label
    pub fn dump(&self) {
        log::info!("contingency table (rows : reference, columns : predicted)");
        for (i, row) in self.table.rows().into_iter().enumerate() {
            log::info!("label : {}, row : {}", i, row);
        }
        log::info!("accuracy : {:.3e}", self.get_accuracy());
    }
} // end of Contingency

// end of mod tests
