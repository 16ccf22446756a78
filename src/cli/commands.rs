//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{load_script, parse_script, replay, Outcome, ScriptLine, Session};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::OrgTree;
use crate::tree_traits::{branch_lines, TreeNodeConvert};

/// Chart built by `orgtree demo`.
pub const DEMO_SCRIPT: &str = "\
# three subordinates under the director
sub root
sub root
sub root
# two branch members under the second
branch Subordinate 2
branch Subordinate 2
# a nested subordinate under the first
sub Subordinate 1
";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Replay {
            script,
            steps,
            strict,
            branches,
        }) => cmd_replay(cli, script, *steps, *strict, *branches),
        Some(Commands::Demo { branches }) => cmd_demo(cli, *branches),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage("no command given, see --help".to_string())),
    }
}

/// Settings from files and env, with CLI flags applied last.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.nested_branches {
        settings.policy.allow_nested_branch_members = true;
    }
    debug!(?settings, "effective settings");
    Ok(settings)
}

#[instrument(skip(cli))]
fn cmd_replay(cli: &Cli, script: &Path, steps: bool, strict: bool, branches: bool) -> CliResult<()> {
    if steps && branches {
        return Err(CliError::InvalidArgs(
            "--steps prints the outline after each action and cannot be combined with --branches"
                .to_string(),
        ));
    }
    let content = load_script(script)?;
    let lines = parse_script(&content)?;
    let mut session = Session::from_settings(&load_settings(cli)?);

    let summary = replay(&mut session, &lines, strict, |line, action, outcome, tree| {
        if steps {
            print_step(line, &action.to_string(), outcome, tree);
        } else if let Outcome::Unchanged(reason) = outcome {
            output::warning(&format!("line {}: {}: {}", line.line, action, reason));
        }
    })?;

    if !steps {
        print_chart(session.tree(), branches);
    }
    output::success(&format!(
        "{} applied, {} ignored, {} nodes",
        summary.applied,
        summary.ignored,
        session.tree().node_count()
    ));
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_demo(cli: &Cli, branches: bool) -> CliResult<()> {
    let lines = parse_script(DEMO_SCRIPT)?;
    let mut session = Session::from_settings(&load_settings(cli)?);
    replay(&mut session, &lines, true, |_, _, _, _| {})?;
    print_chart(session.tree(), branches);
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => {
                return Err(CliError::Usage(
                    "cannot determine config directory on this platform".to_string(),
                ))
            }
        },
    }
    Ok(())
}

fn print_step(line: &ScriptLine, action: &str, outcome: &Outcome, tree: &OrgTree) {
    match outcome {
        Outcome::Applied => output::header(&format!("line {}: {}", line.line, action)),
        Outcome::Unchanged(reason) => {
            output::header(&format!("line {}: {}", line.line, action));
            output::failure(reason);
        }
    }
    output::info(&tree.to_tree_string());
}

fn print_chart(tree: &OrgTree, branches: bool) {
    if branches {
        for line in branch_lines(tree) {
            output::info(&line);
        }
    } else {
        output::info(&tree.to_tree_string());
    }
}
