//! Reading of training and test tables, writing of label files.
//!
//! Tables are plain text, one row per line, values separated by whitespace.
//! A training row holds the features followed by a label equal to 0 or 1, a test row holds only the features.
//! Blank lines are skipped. Any other deviation (unparseable token, nan or infinite value, wrong number of columns,
//! non binary label)
//! makes the load fail with an error naming the file and the line.

use anyhow::{anyhow, Context};

use num_traits::cast::NumCast;
use num_traits::float::Float;

use std::fmt::Debug;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::point::Point;

/// number of features of the reference data set
pub const NB_FEATURES: usize = 6;

/// Loader for fixed width numeric tables.
#[derive(Debug, Copy, Clone)]
pub struct DataSource {
    // number of feature columns, label excluded
    nb_features: usize,
    // if set, the number of rows a table must have
    expected_rows: Option<usize>,
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::new(NB_FEATURES)
    }
}

impl DataSource {
    pub fn new(nb_features: usize) -> Self {
        DataSource {
            nb_features,
            expected_rows: None,
        }
    }

    /// require loaded tables to have exactly `nb_rows` rows
    pub fn with_expected_rows(mut self, nb_rows: Option<usize>) -> Self {
        self.expected_rows = nb_rows;
        self
    }

    pub fn get_nb_features(&self) -> usize {
        self.nb_features
    }

    /// loads a training table: each row has nb_features values then a label in {0, 1}
    pub fn load_labeled<T>(&self, path: &Path) -> anyhow::Result<Vec<Point<T>>>
    where
        T: Float + Debug,
    {
        let rows = self.read_rows::<T>(path, self.nb_features + 1)?;
        let mut points = Vec::<Point<T>>::with_capacity(rows.len());
        for (rank, (lineno, mut values)) in rows.into_iter().enumerate() {
            let label_value = values.pop().ok_or_else(|| anyhow!("empty row"))?;
            let label = if label_value == T::zero() {
                0
            } else if label_value == T::one() {
                1
            } else {
                return Err(anyhow!(
                    "file {}, line {} : label {:?} is not 0 or 1",
                    path.display(),
                    lineno,
                    label_value
                ));
            };
            points.push(Point::new(rank, values, label));
        }
        log::info!(
            "loaded {} labeled rows from {}",
            points.len(),
            path.display()
        );
        Ok(points)
    } // end of load_labeled

    /// loads a table of data to classify, each row has nb_features values
    pub fn load_unlabeled<T>(&self, path: &Path) -> anyhow::Result<Vec<Point<T>>>
    where
        T: Float + Debug,
    {
        let rows = self.read_rows::<T>(path, self.nb_features)?;
        let points: Vec<Point<T>> = rows
            .into_iter()
            .enumerate()
            .map(|(rank, (_, values))| Point::new_unlabeled(rank, values))
            .collect();
        log::info!(
            "loaded {} unlabeled rows from {}",
            points.len(),
            path.display()
        );
        Ok(points)
    } // end of load_unlabeled

    // returns (line number, values) for each non blank line
    fn read_rows<T>(&self, path: &Path, nb_column: usize) -> anyhow::Result<Vec<(usize, Vec<T>)>>
    where
        T: Float + Debug,
    {
        let fileres = OpenOptions::new().read(true).open(path);
        if fileres.is_err() {
            log::error!("could not open file {:?}", path.as_os_str());
            return Err(anyhow!("could not open file {}", path.display()));
        }
        let bufreader = BufReader::new(fileres?);
        let mut rows = Vec::<(usize, Vec<T>)>::new();
        //
        for (i, line) in bufreader.lines().enumerate() {
            let lineno = i + 1;
            let line = line.with_context(|| format!("reading {} line {}", path.display(), lineno))?;
            if i == 0 {
                log::debug!("first line of {} : {}", path.display(), line);
            }
            if line.trim().is_empty() {
                continue;
            }
            let mut values = Vec::<T>::with_capacity(nb_column);
            for field in line.split_whitespace() {
                let val = field.parse::<f64>().map_err(|_| {
                    anyhow!(
                        "file {}, line {} : cannot decode field {:?}",
                        path.display(),
                        lineno,
                        field
                    )
                })?;
                let val = <T as NumCast>::from(val)
                    .ok_or_else(|| anyhow!("file {}, line {} : value out of range", path.display(), lineno))?;
                if !val.is_finite() {
                    return Err(anyhow!(
                        "file {}, line {} : field {:?} is not a finite number",
                        path.display(),
                        lineno,
                        field
                    ));
                }
                values.push(val);
            }
            if values.len() != nb_column {
                return Err(anyhow!(
                    "file {}, line {} has {} fields, expected {}",
                    path.display(),
                    lineno,
                    values.len(),
                    nb_column
                ));
            }
            rows.push((lineno, values));
        }
        //
        if rows.is_empty() {
            return Err(anyhow!("file {} contains no data", path.display()));
        }
        if let Some(expected) = self.expected_rows {
            if rows.len() != expected {
                return Err(anyhow!(
                    "file {} has {} rows, expected {}",
                    path.display(),
                    rows.len(),
                    expected
                ));
            }
        }
        Ok(rows)
    } // end of read_rows
} // end of impl DataSource

/// writes one label per line, in order, followed by an empty line
pub fn write_labels(path: &Path, labels: &[u32]) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("could not create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for l in labels {
        writeln!(writer, "{}", l)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    log::info!("wrote {} labels in {}", labels.len(), path.display());
    Ok(())
} // end of write_labels

/// reads a label file as written by [write_labels], blank lines are skipped
pub fn read_labels(path: &Path) -> anyhow::Result<Vec<u32>> {
    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("could not open label file {}", path.display()))?;
    let mut labels = Vec::<u32>::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let field = line.trim();
        if field.is_empty() {
            continue;
        }
        let label = field.parse::<u32>().map_err(|_| {
            anyhow!(
                "file {}, line {} : cannot decode label {:?}",
                path.display(),
                i + 1,
                field
            )
        })?;
        labels.push(label);
    }
    Ok(labels)
} // end of read_labels

//========================================================

// end of mod tests
