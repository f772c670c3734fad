/// housing-mlp Studio
///
/// An interactive terminal front end for the California housing MLP
/// regressor: explore the dataset, plot every feature against the median
/// house value, tune the hyperparameters, train, and score the model on the
/// held-out test split.
///
/// Run with:
///   cargo run --bin studio --release -- --data cal_housing.data
/// or non-interactively:
///   cargo run --bin studio --release -- dataset "set solver lbfgs" train evaluate
///
/// Logging goes through `RUST_LOG` (default `info`).

mod frontend;
mod repl;
mod svg;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;
use log::debug;

use housing_mlp::session::{Command, FlashMessage, Frontend, Page, Session};
use housing_mlp::{SourceFormat, StudioConfig};

use frontend::TerminalFrontend;
use repl::Input;

#[derive(Parser)]
#[command(name = "studio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Explore the California housing data and train an MLP regressor", long_about = None)]
struct Cli {
    /// JSON settings file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset file: raw `cal_housing.data` or a headered CSV
    #[arg(short, long, env = "HOUSING_DATA")]
    data: Option<PathBuf>,

    /// Dataset format (raw, csv); guessed from the extension when omitted
    #[arg(long)]
    format: Option<String>,

    /// Training progress signal (cosmetic, iterations)
    #[arg(long)]
    progress: Option<String>,

    /// Directory for the SVG charts
    #[arg(long)]
    plot_dir: Option<PathBuf>,

    /// Write the effective settings to this JSON file before starting
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Commands to run instead of the interactive prompt, one per argument
    commands: Vec<String>,
}

enum Flow {
    Continue,
    Quit,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = studio_config(&cli)?;
    if let Some(path) = &cli.save_config {
        config.save_json(path)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
    }

    let mut session = config.session().context("invalid settings")?;
    let mut frontend = TerminalFrontend::new(config.plot_dir.clone());

    println!("housing-mlp studio");
    println!("  data:     {}", session.source_name());
    println!("  progress: {}", session.progress_mode());
    println!("  plots:    {}", config.plot_dir.display());

    if cli.commands.is_empty() {
        println!("Type `help` for the list of commands.");
        interactive(&mut session, &mut frontend)
    } else {
        for line in &cli.commands {
            if let Flow::Quit = run_line(&mut session, &mut frontend, line)
                .with_context(|| format!("command `{}` failed", line))?
            {
                break;
            }
        }
        Ok(())
    }
}

/// Settings file (if any) with command-line flags and the environment applied.
fn studio_config(cli: &Cli) -> anyhow::Result<StudioConfig> {
    let mut config = match &cli.config {
        Some(path) => StudioConfig::load_json(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => StudioConfig::default(),
    };
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }
    if let Some(format) = &cli.format {
        config.data_format = Some(match format.to_ascii_lowercase().as_str() {
            "raw" => SourceFormat::Raw,
            "csv" => SourceFormat::Csv,
            other => return Err(anyhow!("unknown dataset format `{}` (expected raw or csv)", other)),
        });
    }
    if let Some(progress) = &cli.progress {
        config.progress = progress.parse()?;
    }
    if let Some(dir) = &cli.plot_dir {
        config.plot_dir = dir.clone();
    }
    Ok(config)
}

fn interactive(session: &mut Session, frontend: &mut TerminalFrontend) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        // Failures were already shown to the user; the prompt carries on.
        match run_line(session, frontend, &line?) {
            Ok(Flow::Quit) => return Ok(()),
            Ok(Flow::Continue) => {}
            Err(e) => debug!("{:#}", e),
        }
    }
}

fn run_line(session: &mut Session, frontend: &mut TerminalFrontend, line: &str) -> anyhow::Result<Flow> {
    let input = match repl::parse(line) {
        Ok(input) => input,
        Err(message) => {
            frontend.flash(&FlashMessage::error(message.clone()));
            return Err(anyhow!(message));
        }
    };

    match input {
        Input::Run(command) => {
            if let Some(page) = repl::locked_page(&command, session.state()) {
                let message = format!("The {} page is locked: train a model first", page.title());
                frontend.flash(&FlashMessage::error(message.clone()));
                return Err(anyhow!(message));
            }
            let trains = matches!(command, Command::StartTraining);
            session.dispatch(command, frontend)?;
            if trains {
                write_loss_curve(session, frontend)?;
            }
            let written = frontend.take_written();
            if !written.is_empty() {
                println!("Wrote {} chart(s).", written.len());
            }
        }
        Input::Set { field, value } => {
            let command = match repl::configure(session.model_config(), &field, &value) {
                Ok(command) => command,
                Err(e) => {
                    frontend.flash(&FlashMessage::error(e.to_string()));
                    return Err(e.into());
                }
            };
            session.dispatch(command, frontend)?;
        }
        Input::ShowConfig => {
            println!("{}", session.model_config());
            println!("progress={}", session.progress_mode());
        }
        Input::Pages => {
            for page in Page::ALL {
                let status = if session.state().is_unlocked(page) { "unlocked" } else { "locked" };
                println!("{:<12} {}", page.title(), status);
            }
        }
        Input::Help => println!("{}", repl::HELP),
        Input::Quit => return Ok(Flow::Quit),
        Input::Empty => {}
    }
    Ok(Flow::Continue)
}

fn write_loss_curve(session: &Session, frontend: &mut TerminalFrontend) -> anyhow::Result<()> {
    let model = session.state().model()?;
    if let Some(chart) = svg::build_svg_loss_curve(model.loss_curve()) {
        let path = frontend.write_chart("training_loss_curve.svg", &chart)?;
        println!("  Training Loss Curve -> {}", path.display());
    }
    Ok(())
}
