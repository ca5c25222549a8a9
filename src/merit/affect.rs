//! describes affectation of data to labels

use num_traits::int::PrimInt;

/// The output of a classification, or a reference labelling, should be able to provide a structure implementing this trait.
///
/// An affectation gives the label attached to a dataid.
/// Morally the label is a discrete value (satisfy the PrimInt trait) and labels are ranks in 0..get_nb_label().
///
pub trait Affectation<DataId, DataLabel> {
    /// given a dataId, returns its label
    fn get_affectation(&self, dataid: DataId) -> DataLabel;
    /// returns the number of labels
    fn get_nb_label(&self) -> usize;
    /// returns the number of data
    fn get_nb_data(&self) -> usize;
    /// iterator on couples (dataid, label)
    fn iter(&self) -> impl Iterator<Item = (DataId, DataLabel)>;
}

//===============================================================================

/// Labels defined by a slice, DataId is an usize and slice[i] gives the label of the i-th data
pub struct VecAffectation<'a, DataLabel> {
    affectation: &'a [DataLabel],
    nb_label: usize,
}

impl<'a, DataLabel> VecAffectation<'a, DataLabel>
where
    DataLabel: PrimInt,
{
    /// builds a vector affectation, the number of labels is deduced from the largest label
    pub fn new(affectation: &'a [DataLabel]) -> Self {
        let nb_label = affectation
            .iter()
            .filter_map(|l| l.to_usize())
            .max()
            .map_or(0, |l| l + 1);
        VecAffectation {
            affectation,
            nb_label,
        }
    }

    /// builds a vector affectation with a known number of labels (at least the one deduced from data)
    pub fn with_nb_label(affectation: &'a [DataLabel], nb_label: usize) -> Self {
        let mut aff = Self::new(affectation);
        aff.nb_label = aff.nb_label.max(nb_label);
        aff
    }
}

impl<DataLabel> Affectation<usize, DataLabel> for VecAffectation<'_, DataLabel>
where
    DataLabel: PrimInt,
{
    fn get_affectation(&self, id: usize) -> DataLabel {
        self.affectation[id]
    }

    fn get_nb_label(&self) -> usize {
        self.nb_label
    }

    fn get_nb_data(&self) -> usize {
        self.affectation.len()
    }

    fn iter(&self) -> impl Iterator<Item = (usize, DataLabel)> {
        self.affectation.iter().copied().enumerate()
    }
}

// end of mod tests
