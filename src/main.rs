mod cli;
mod collection;
mod config;
mod drafts;
mod form;
mod models;
mod report;
mod sample;
mod suggest;
mod summary;
mod ui;
mod view;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, ListArgs};
use config::ConfigStore;
use models::{FeedbackStatus, Priority, ProjectStatus, QuestionType, Sentiment};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use ui::run_tui;
use view::{derive_view, feedback_rows, Facet, FilterValue, ListQuery, SortKey};

// Quiet by default; RUST_LOG=debug for details. The TUI owns the terminal,
// so it logs to a file instead of stderr.
fn init_logging(tui: bool, db_path: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if tui {
        let log_file = config::log_path(db_path);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .with_context(|| format!("failed to open log file {}", log_file.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
    } else {
        builder.with_writer(std::io::stderr).try_init()
    };
    if let Err(e) = installed {
        eprintln!("logging disabled: {}", e);
    }
    Ok(())
}

fn unknown_sort_notice(name: &str) -> String {
    format!(
        "Unknown sort key '{}'{}, keeping insertion order.",
        name,
        suggest::did_you_mean(name, &SortKey::names())
    )
}

// An explicit --sort wins over the stored preference for the page.
fn sort_key(requested: Option<&str>, store: &ConfigStore, preference: &str) -> Result<SortKey> {
    let name = match requested {
        Some(name) => name,
        None => return store.sort_for(preference),
    };
    match SortKey::from_name(name) {
        Some(key) => Ok(key),
        None => {
            eprintln!("{}", unknown_sort_notice(name));
            Ok(SortKey::Insertion)
        }
    }
}

fn base_query(list: &ListArgs, store: &ConfigStore, preference: &str) -> Result<ListQuery> {
    let sort = sort_key(list.sort.as_deref(), store, preference)?;
    Ok(ListQuery::new(sort)
        .with_search(list.search.as_str())
        .reversed(list.reverse))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let db_path = config::default_db_path();
    init_logging(matches!(cli.command, None | Some(Commands::Tui)), &db_path)?;
    let store = ConfigStore::open(&db_path)?;

    match cli.command {
        Some(Commands::Projects { list, status }) => {
            let projects = sample::projects();
            let query = base_query(&list, &store, config::PROJECTS_SORT)?
                .with_filter(
                    Facet::Status,
                    FilterValue::choice(Facet::Status, &status, ProjectStatus::ALL, ProjectStatus::parse, ProjectStatus::as_str)?,
                );
            let view = derive_view(&projects, &query);
            if list.json {
                report::print_json(&view)?;
            } else {
                let date_format = store.date_format()?;
                let lines = view.iter().map(|p| report::project_line(p, &date_format)).collect();
                report::print_lines("Projects:", lines, projects.len());
            }
        }
        Some(Commands::Feedback { list, status, priority, sentiment, category, project }) => {
            let feedback = sample::feedback();
            let projects = sample::projects();
            let questions = sample::questions();
            let rows = feedback_rows(&feedback, &projects, &questions);
            let query = base_query(&list, &store, config::FEEDBACK_SORT)?
                .with_filter(
                    Facet::Status,
                    FilterValue::choice(Facet::Status, &status, FeedbackStatus::ALL, FeedbackStatus::parse, FeedbackStatus::as_str)?,
                )
                .with_filter(
                    Facet::Priority,
                    FilterValue::choice(Facet::Priority, &priority, Priority::ALL, Priority::parse, Priority::as_str)?,
                )
                .with_filter(
                    Facet::Sentiment,
                    FilterValue::choice(Facet::Sentiment, &sentiment, Sentiment::ALL, Sentiment::parse, Sentiment::as_str)?,
                )
                .with_filter(Facet::Category, FilterValue::parse(&category))
                .with_filter(Facet::Project, FilterValue::parse(&project));
            let view = derive_view(&rows, &query);
            if list.json {
                report::print_json(&view)?;
            } else {
                let date_format = store.date_format()?;
                let lines = view.iter().map(|row| report::feedback_line(row, &date_format)).collect();
                report::print_lines("Feedback:", lines, rows.len());
            }
        }
        Some(Commands::Questions { list, kind, category, required }) => {
            let questions = sample::questions();
            let query = base_query(&list, &store, config::QUESTIONS_SORT)?
                .with_filter(
                    Facet::Type,
                    FilterValue::choice(Facet::Type, &kind, QuestionType::ALL, QuestionType::parse, QuestionType::as_str)?,
                )
                .with_filter(Facet::Category, FilterValue::parse(&category))
                .with_filter(
                    Facet::Required,
                    FilterValue::choice(Facet::Required, &required, &[true, false], models::parse_flag, models::flag_name)?,
                );
            let view = derive_view(&questions, &query);
            if list.json {
                report::print_json(&view)?;
            } else {
                let date_format = store.date_format()?;
                let lines = view.iter().map(|q| report::question_line(q, &date_format)).collect();
                report::print_lines("Questions:", lines, questions.len());
            }
        }
        Some(Commands::Summary { json }) => {
            let summary = summary::summarize(&sample::projects(), &sample::feedback(), &sample::questions());
            if json {
                report::print_json(&summary)?;
            } else {
                print!("{}", report::summary_text(&summary));
            }
        }
        Some(Commands::Set { key, value }) => {
            store.set(&key, &value)?;
            println!("{} set to '{}'", key, value.trim());
        }
        Some(Commands::Get { key }) => {
            println!("{}", store.get(&key)?);
        }
        Some(Commands::ConfigList) => {
            report::print_configs(&store.list()?);
        }
        Some(Commands::ConfigDelete { key }) => {
            if store.delete(&key)? {
                println!("{} restored to its default", key);
            } else {
                println!("{} was not set", key);
            }
        }
        Some(Commands::Completions { shell }) => {
            use clap_complete::{generate, Shell};
            let shell = shell.to_lowercase();
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "elvish" => Shell::Elvish,
                "powershell" => Shell::PowerShell,
                _ => {
                    println!("Unsupported shell: {}", shell);
                    return Ok(());
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "pulse", &mut std::io::stdout());
        }
        Some(Commands::Tui) | None => {
            run_tui(store)?;
        }
    }

    Ok(())
}
