//! Runs the whole pipeline once without the studio front end:
//! load → describe → split → scale → build → train → evaluate.
//!
//!   cargo run --release --example pipeline -- path/to/cal_housing.data
//!
//! The path falls back to `$HOUSING_DATA`.

use std::path::PathBuf;

use housing_mlp::data::{describe, train_test_split, SPLIT_SEED, TEST_FRACTION};
use housing_mlp::model::evaluate;
use housing_mlp::{
    CaliforniaHousing, DatasetProvider, ModelConfig, ModelConfigurator, ProgressMode, Regressor,
    StandardScaler, TrainingController,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args().nth(1)
        .or_else(|| std::env::var(housing_mlp::config::DATA_ENV_VAR).ok())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("pass the dataset path or set HOUSING_DATA"))?;

    let dataset = CaliforniaHousing::from_path(path).load()?;
    for column in describe(&dataset).columns {
        println!("{:<12} mean {:>10.4}  std {:>10.4}", column.name, column.mean, column.std);
    }

    let split = train_test_split(&dataset, TEST_FRACTION, SPLIT_SEED)?;
    let mut scaler = StandardScaler::new();
    scaler.fit(split.train.features())?;
    let train_x = scaler.transform(split.train.features())?;
    let test_x = scaler.transform(split.test.features())?;

    let model = ModelConfigurator::new().build(&ModelConfig::default())?;
    let controller = TrainingController::new(ProgressMode::Iterations);
    let (model, report) = controller.train(model, &train_x, split.train.targets(), &mut |p| {
        if p.percent % 10 == 0 {
            println!("{:>3}% {}", p.percent, p.message);
        }
    })?;
    println!(
        "{} iterations in {:.2?}, final loss {:.4}, converged: {}",
        report.iterations, report.elapsed, report.final_loss, report.converged
    );

    let metrics = evaluate(&model.predict(&test_x)?, split.test.targets());
    println!(
        "test: mse {:.4}  rmse {:.4}  mae {:.4}  r2 {:.4}  (baseline mse {:.4})",
        metrics.mse, metrics.rmse, metrics.mae, metrics.r2, metrics.baseline_mse
    );
    Ok(())
}
