//! TaskFlow CLI - a Kanban task board in your terminal.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use taskflow::assist::Assistant;
use taskflow::cli::{
    AiCommands, AuthCommands, Cli, Commands, CommentCommands, ConfigCommands, ProjectCommands,
    TaskCommands, UserCommands,
};
use taskflow::commands::{self, Output};
use taskflow::config::{ConfigOverrides, ConfigPaths, OutputFormat, ResolvedSettings};
use taskflow::storage::{FileStore, Persistence, get_data_dir};
use taskflow::{Board, Error};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `taskflow=trace`).
const LOG_ENV: &str = "TF_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let mut human = cli.human_readable;
    let result = resolve_settings(&cli).and_then(|(data_dir, settings)| {
        human = human || settings.output_format() == OutputFormat::Human;
        run_command(cli.command, &data_dir, &settings, human)
    });

    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_settings(cli: &Cli) -> Result<(PathBuf, ResolvedSettings), Error> {
    let data_dir = match cli.data_dir {
        Some(ref dir) => dir.clone(),
        None => get_data_dir()?,
    };

    let mut overrides = ConfigOverrides::new();
    if cli.human_readable {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }
    if cli.no_seed {
        overrides = overrides.with_seed_demo_data(false);
    }

    let settings = ResolvedSettings::resolve(&ConfigPaths::for_data_dir(&data_dir), &overrides)?;
    Ok((data_dir, settings))
}

fn open_board(data_dir: &Path, settings: &ResolvedSettings) -> Result<Board, Error> {
    let store = FileStore::open(data_dir)?;
    Ok(Board::open(
        Persistence::new(Box::new(store)),
        settings.board_config(),
    ))
}

fn run_command(
    command: Commands,
    data_dir: &Path,
    settings: &ResolvedSettings,
    human: bool,
) -> Result<(), Error> {
    // Config commands must work even when the store cannot be opened.
    if let Commands::Config { command } = command {
        return match command {
            ConfigCommands::Show => {
                let result = commands::config_show(data_dir, settings)?;
                output(&result, human);
                Ok(())
            }
        };
    }

    let mut board = open_board(data_dir, settings)?;

    match command {
        Commands::Auth { command } => match command {
            AuthCommands::Register {
                name,
                email,
                password,
            } => {
                let result = commands::auth_register(&mut board, &name, &email, &password)?;
                output(&result, human);
            }
            AuthCommands::Login { email, password } => {
                let result = commands::auth_login(&mut board, &email, &password)?;
                output(&result, human);
            }
            AuthCommands::Logout => {
                let result = commands::auth_logout(&mut board)?;
                output(&result, human);
            }
            AuthCommands::Whoami => {
                let result = commands::auth_whoami(&board)?;
                output(&result, human);
            }
        },

        Commands::Project { command } => match command {
            ProjectCommands::Create { title, description } => {
                let result = commands::project_create(&mut board, &title, &description)?;
                output(&result, human);
            }
            ProjectCommands::List => {
                let result = commands::project_list(&board)?;
                output(&result, human);
            }
            ProjectCommands::Board { id } => {
                let result = commands::project_board(&board, &id)?;
                output(&result, human);
            }
        },

        Commands::Task { command } => match command {
            TaskCommands::Create {
                project,
                title,
                description,
                status,
                assignee,
            } => {
                let result = commands::task_create(
                    &mut board,
                    &project,
                    &title,
                    &description,
                    &status,
                    assignee.as_deref(),
                )?;
                output(&result, human);
            }
            TaskCommands::Show { id } => {
                let result = commands::task_show(&board, &id)?;
                output(&result, human);
            }
            TaskCommands::Status { id, status } => {
                let result = commands::task_status(&mut board, &id, &status)?;
                output(&result, human);
            }
            TaskCommands::Assign { id, user } => {
                let result = commands::task_assign(&mut board, &id, user.as_deref())?;
                output(&result, human);
            }
            TaskCommands::Describe { id, text } => {
                let result = commands::task_describe(&mut board, &id, &text)?;
                output(&result, human);
            }
            TaskCommands::Delete { id } => {
                let result = commands::task_delete(&mut board, &id)?;
                output(&result, human);
            }
        },

        Commands::User { command } => match command {
            UserCommands::List => {
                let result = commands::user_list(&board)?;
                output(&result, human);
            }
        },

        Commands::Comment { command } => match command {
            CommentCommands::Add { task, text } => {
                let result = commands::comment_add(&mut board, &task, &text)?;
                output(&result, human);
            }
            CommentCommands::List { task } => {
                let result = commands::comment_list(&board, &task)?;
                output(&result, human);
            }
        },

        Commands::Ai { command } => {
            let assistant = Assistant::from_settings(&settings.assist);
            match command {
                AiCommands::Plan { project, apply } => {
                    let result = commands::ai_plan(&mut board, &assistant, &project, apply)?;
                    output(&result, human);
                }
                AiCommands::Improve { task, apply } => {
                    let result = commands::ai_improve(&mut board, &assistant, &task, apply)?;
                    output(&result, human);
                }
            }
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
