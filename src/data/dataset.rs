use crate::error::{Error, Result};

/// Rows of named numeric features with one numeric target.
///
/// A dataset is an immutable snapshot: there are no mutating accessors, and
/// subsets are new datasets. Every row carries the index it had in the
/// loaded source (`row_ids`), which is what splits preserve and what
/// disjointness is checked against.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    feature_names: Vec<String>,
    target_name: String,
    features: Vec<Vec<f64>>,
    targets: Vec<f64>,
    row_ids: Vec<usize>,
}

impl Dataset {
    /// Builds a dataset, numbering rows `0..n` in the order given.
    pub fn new(
        feature_names: Vec<String>,
        target_name: impl Into<String>,
        features: Vec<Vec<f64>>,
        targets: Vec<f64>,
    ) -> Result<Dataset> {
        if features.len() != targets.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} targets", features.len()),
                actual: format!("{} targets", targets.len()),
            });
        }
        if let Some((row, r)) = features.iter().enumerate().find(|(_, r)| r.len() != feature_names.len()) {
            return Err(Error::ShapeMismatch {
                expected: format!("{} features per row", feature_names.len()),
                actual: format!("{} features in row {}", r.len(), row),
            });
        }

        let row_ids = (0..features.len()).collect();
        Ok(Dataset { feature_names, target_name: target_name.into(), features, targets, row_ids })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub fn row_ids(&self) -> &[usize] {
        &self.row_ids
    }

    pub fn n_rows(&self) -> usize {
        self.targets.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.feature_names.iter().position(|n| n == name)
    }

    /// Values of a feature or of the target, looked up by name.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        if name == self.target_name {
            return Some(self.targets.clone());
        }
        self.feature_index(name)
            .map(|j| self.features.iter().map(|row| row[j]).collect())
    }

    /// New dataset holding the rows at `indices` (positions in `self`), in
    /// that order, with their original row ids.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            feature_names: self.feature_names.clone(),
            target_name: self.target_name.clone(),
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
            row_ids: indices.iter().map(|&i| self.row_ids[i]).collect(),
        }
    }
}
