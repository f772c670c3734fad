/// Axis labels and title of one scatter plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotLabels {
    pub x: String,
    pub y: String,
    pub title: String,
}

impl PlotLabels {
    pub fn new(x: impl Into<String>, y: impl Into<String>, title: impl Into<String>) -> PlotLabels {
        PlotLabels { x: x.into(), y: y.into(), title: title.into() }
    }

    pub fn predicted_vs_actual() -> PlotLabels {
        PlotLabels::new(
            "Actual Median House Value (100k USD)",
            "Predicted Median House Value (100k USD)",
            "Predicted vs. Actual Median House Value",
        )
    }
}

pub const TARGET_AXIS_LABEL: &str = "Median House Value (100k USD)";

/// A feature column plotted against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturePlot {
    pub feature: &'static str,
    pub x_label: &'static str,
    pub title: &'static str,
}

impl FeaturePlot {
    pub fn labels(&self) -> PlotLabels {
        PlotLabels::new(self.x_label, TARGET_AXIS_LABEL, self.title)
    }
}

/// The fixed feature/target plots, in display order.
pub const FEATURE_PLOTS: [FeaturePlot; 8] = [
    FeaturePlot {
        feature: "MedInc",
        x_label: "Median Income (10k USD)",
        title: "Median Income vs. Median House Value",
    },
    FeaturePlot {
        feature: "HouseAge",
        x_label: "House Age in years",
        title: "House Age vs. Median House Value",
    },
    FeaturePlot {
        feature: "AveRooms",
        x_label: "Average Rooms",
        title: "Average Rooms vs. Median House Value",
    },
    FeaturePlot {
        feature: "AveBedrms",
        x_label: "Average Bed Rooms",
        title: "Average Bed Rooms vs. Median House Value",
    },
    FeaturePlot {
        feature: "Population",
        x_label: "Population",
        title: "Population vs. Median House Value",
    },
    FeaturePlot {
        feature: "AveOccup",
        x_label: "Average Occupancy",
        title: "Average Occupancy vs. Median House Value",
    },
    FeaturePlot {
        feature: "Latitude",
        x_label: "Latitude",
        title: "Latitude vs. Median House Value",
    },
    FeaturePlot {
        feature: "Longitude",
        x_label: "Longitude",
        title: "Longitude vs. Median House Value",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::FEATURE_NAMES;

    #[test]
    fn one_plot_per_feature_in_load_order() {
        let features: Vec<&str> = FEATURE_PLOTS.iter().map(|p| p.feature).collect();
        assert_eq!(features, FEATURE_NAMES);
        assert!(FEATURE_PLOTS.iter().all(|p| p.labels().y == TARGET_AXIS_LABEL));
    }

    #[test]
    fn target_axis_matches_the_target_units() {
        // Targets are stored in units of $100,000 on every chart.
        let actual = PlotLabels::predicted_vs_actual();
        assert!(TARGET_AXIS_LABEL.ends_with("(100k USD)"));
        assert!(actual.x.ends_with("(100k USD)"));
        assert!(actual.y.ends_with("(100k USD)"));
    }
}
