use housing_mlp::session::{Command, Page, SessionState};
use housing_mlp::ModelConfig;

pub const HELP: &str = "\
Commands:
  dataset               load, split and scale the data; show it with summary statistics
  graphs                write the feature vs. median house value scatter plots
  set <field> <value>   change a hyperparameter (activation, solver, width, alpha, max_iter)
  config                show the current hyperparameters
  pages                 show which pages are unlocked
  train                 train the MLP regressor with the current hyperparameters
  evaluate              score the trained model on the test split
  help                  show this message
  quit                  leave the studio";

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Run(Command),
    Set { field: String, value: String },
    ShowConfig,
    Pages,
    Help,
    Quit,
    Empty,
}

/// Parses a line typed at the prompt (or passed on the command line).
pub fn parse(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Input::Empty);
    };
    let rest: Vec<&str> = words.collect();

    let input = match head.to_ascii_lowercase().as_str() {
        "dataset" | "data" => Input::Run(Command::ShowDataset),
        "graphs" | "plots" => Input::Run(Command::ShowGraphs),
        "train" => Input::Run(Command::StartTraining),
        "evaluate" | "eval" | "performance" => Input::Run(Command::Evaluate),
        "config" => Input::ShowConfig,
        "pages" => Input::Pages,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        "set" => match rest.as_slice() {
            [field, value] => Input::Set { field: field.to_string(), value: value.to_string() },
            _ => return Err("usage: set <field> <value>".into()),
        },
        other => return Err(format!("unknown command `{}`; type `help`", other)),
    };
    if !rest.is_empty() && !matches!(input, Input::Set { .. }) {
        return Err(format!("`{}` takes no arguments", head));
    }
    Ok(input)
}

/// The page `command` belongs to, when that page is still locked.
pub fn locked_page(command: &Command, state: &SessionState) -> Option<Page> {
    let page = match command {
        Command::ShowDataset => Page::Dataset,
        Command::ShowGraphs => Page::Graphs,
        Command::Configure(_) | Command::StartTraining => Page::Training,
        Command::Evaluate => Page::Performance,
    };
    (!state.is_unlocked(page)).then_some(page)
}

/// Applies `set` to a copy of `current`, producing the command that installs it.
pub fn configure(current: &ModelConfig, field: &str, value: &str) -> housing_mlp::Result<Command> {
    let mut next = current.clone();
    next.set_field(field, value)?;
    Ok(Command::Configure(next))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_set() {
        assert_eq!(parse("  dataset ").unwrap(), Input::Run(Command::ShowDataset));
        assert_eq!(parse("TRAIN").unwrap(), Input::Run(Command::StartTraining));
        assert_eq!(parse("").unwrap(), Input::Empty);
        assert_eq!(
            parse("set alpha 0.5").unwrap(),
            Input::Set { field: "alpha".into(), value: "0.5".into() }
        );
        assert!(parse("set alpha").is_err());
        assert!(parse("train now").is_err());
        assert!(parse("fly").is_err());
    }

    #[test]
    fn performance_is_locked_until_a_model_exists() {
        let mut state = SessionState::new();
        assert_eq!(locked_page(&Command::Evaluate, &state), Some(Page::Performance));
        assert_eq!(locked_page(&Command::StartTraining, &state), None);
        assert_eq!(locked_page(&Command::ShowGraphs, &state), None);
        assert_eq!(parse("pages").unwrap(), Input::Pages);

        let model = housing_mlp::ModelConfigurator::new().build(&ModelConfig::default()).unwrap();
        state.set_model(model);
        assert_eq!(locked_page(&Command::Evaluate, &state), None);
    }

    #[test]
    fn configure_leaves_current_config_alone() {
        let current = ModelConfig::default();
        let command = configure(&current, "solver", "sgd").unwrap();
        match command {
            Command::Configure(next) => assert_eq!(next.solver, housing_mlp::Solver::Sgd),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(current, ModelConfig::default());
        assert!(configure(&current, "width", "2").is_err());
    }
}
