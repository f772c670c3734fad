use std::io::Write;
use std::path::PathBuf;

use housing_mlp::data::{Dataset, DatasetSummary};
use housing_mlp::model::RegressionMetricsOutput;
use housing_mlp::session::{FlashKind, FlashMessage, Frontend, PlotLabels};
use housing_mlp::Progress;

use crate::svg;

/// Rows shown by `dataset`; the full table is 20,640 rows long.
const PREVIEW_ROWS: usize = 10;
const BAR_WIDTH: usize = 40;

/// Prints to stdout and writes charts as SVG files.
pub struct TerminalFrontend {
    plot_dir: PathBuf,
    /// Paths written since the last `take_written`.
    written: Vec<PathBuf>,
}

impl TerminalFrontend {
    pub fn new(plot_dir: PathBuf) -> TerminalFrontend {
        TerminalFrontend { plot_dir, written: Vec::new() }
    }

    pub fn write_chart(&mut self, name: &str, svg: &str) -> housing_mlp::Result<PathBuf> {
        std::fs::create_dir_all(&self.plot_dir)?;
        let path = self.plot_dir.join(name);
        std::fs::write(&path, svg)?;
        self.written.push(path.clone());
        Ok(path)
    }

    pub fn take_written(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.written)
    }
}

impl Frontend for TerminalFrontend {
    fn show_dataset(&mut self, dataset: &Dataset) {
        println!("The California Housing Dataset ({} rows)", dataset.n_rows());
        let header: Vec<String> = dataset.feature_names().iter()
            .map(|n| format!("{:>11}", n))
            .chain(std::iter::once(format!("{:>11}", dataset.target_name())))
            .collect();
        println!("{:>6} {}", "", header.join(" "));

        for (i, (row, target)) in dataset.features().iter().zip(dataset.targets()).take(PREVIEW_ROWS).enumerate() {
            let cells: Vec<String> = row.iter().chain(std::iter::once(target))
                .map(|v| format!("{:>11.4}", v))
                .collect();
            println!("{:>6} {}", i, cells.join(" "));
        }
        if dataset.n_rows() > PREVIEW_ROWS {
            println!("{:>6} ... {} more rows", "", dataset.n_rows() - PREVIEW_ROWS);
        }
        println!();
    }

    fn show_summary(&mut self, summary: &DatasetSummary) {
        println!("Data Description");
        println!(
            "{:<12} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        );
        for c in &summary.columns {
            println!(
                "{:<12} {:>7} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                c.name, c.count, c.mean, c.std, c.min, c.q25, c.median, c.q75, c.max
            );
        }
        println!();
    }

    fn plot(&mut self, x: &[f64], y: &[f64], labels: &PlotLabels) -> housing_mlp::Result<()> {
        let chart = svg::build_svg_scatter(x, y, labels);
        let path = self.write_chart(&svg::file_name(&labels.title), &chart)?;
        println!("  {} -> {}", labels.title, path.display());
        Ok(())
    }

    fn progress(&mut self, progress: &Progress) {
        let filled = usize::from(progress.percent) * BAR_WIDTH / 100;
        print!(
            "\r[{}{}] {:>3}% {:<48}",
            "#".repeat(filled),
            " ".repeat(BAR_WIDTH - filled),
            progress.percent,
            progress.message
        );
        if progress.is_complete() {
            println!();
        }
        // Progress has no error path back through training; a failed flush
        // only delays the bar until the next newline.
        let _ = std::io::stdout().flush();
    }

    fn show_metrics(&mut self, m: &RegressionMetricsOutput) {
        println!("Performance on {} test rows", m.n);
        println!("  {:<14} {:>10.4}", "MSE", m.mse);
        println!("  {:<14} {:>10.4}", "RMSE", m.rmse);
        println!("  {:<14} {:>10.4}", "MAE", m.mae);
        println!("  {:<14} {:>10.4}", "R²", m.r2);
        println!("  {:<14} {:>10.4}", "Baseline MSE", m.baseline_mse);
        println!("  {:<14} {:>10.4}", "Baseline RMSE", m.baseline_rmse);
    }

    fn flash(&mut self, message: &FlashMessage) {
        match message.kind {
            FlashKind::Success => println!("✔ {}", message.text),
            FlashKind::Error => eprintln!("\n✖ {}", message.text),
        }
    }
}
