use crate::data::dataset::Dataset;

/// Descriptive statistics of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Per-column statistics of a dataset: every feature, then the target.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub columns: Vec<ColumnSummary>,
}

impl DatasetSummary {
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }
}

pub fn describe(dataset: &Dataset) -> DatasetSummary {
    let mut columns: Vec<ColumnSummary> = dataset.feature_names().iter().enumerate()
        .map(|(j, name)| {
            let values: Vec<f64> = dataset.features().iter().map(|row| row[j]).collect();
            summarize(name, values)
        })
        .collect();
    columns.push(summarize(dataset.target_name(), dataset.targets().to_vec()));
    DatasetSummary { columns }
}

fn summarize(name: &str, mut values: Vec<f64>) -> ColumnSummary {
    let count = values.len();
    if count == 0 {
        return ColumnSummary {
            name: name.to_owned(),
            count,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        };
    }

    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    values.sort_by(|a, b| a.total_cmp(b));
    ColumnSummary {
        name: name.to_owned(),
        count,
        mean,
        std,
        min: values[0],
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values[count - 1],
    }
}

/// Linear interpolation between closest ranks of sorted, non-empty `sorted`.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_hand_computed_statistics() {
        let ds = Dataset::new(
            vec!["x".into()],
            "y",
            vec![vec![4.0], vec![1.0], vec![3.0], vec![2.0]],
            vec![1.0, 1.0, 1.0, 1.0],
        )
        .unwrap();

        let summary = describe(&ds);
        assert_eq!(summary.columns.len(), 2);

        let x = summary.column("x").unwrap();
        assert_eq!(x.count, 4);
        assert_eq!(x.mean, 2.5);
        assert!((x.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!((x.min, x.max), (1.0, 4.0));
        assert_eq!(x.q25, 1.75);
        assert_eq!(x.median, 2.5);
        assert_eq!(x.q75, 3.25);

        let y = summary.column("y").unwrap();
        assert_eq!(y.std, 0.0);
    }
}
