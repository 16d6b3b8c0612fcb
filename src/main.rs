use clap::{Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use eyre::Result;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tasklist::config::Overrides;
use tasklist::{Action, Category, Config, Filter, Outcome, SqliteStorage, Task, TaskStore, Theme};
use tracing::{Level, debug};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "tasklist - Add, edit, complete, filter and delete tasks")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to a YAML config file (default: <config dir>/tasklist/tasklist.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the task database (default: <data dir>/tasklist/tasklist.db)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    /// Category for tasks added without one (personal, work, other)
    #[arg(short, long, value_parser = parse_category)]
    default_category: Option<Category>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task text
        #[arg(required = true)]
        text: Vec<String>,

        /// Category (personal, work, other)
        #[arg(short = 'C', long, value_parser = parse_category)]
        category: Option<Category>,
    },

    /// Change a task's text and category
    Edit {
        id: String,

        /// New task text
        #[arg(required = true)]
        text: Vec<String>,

        /// New category (default: keep the current one)
        #[arg(short = 'C', long, value_parser = parse_category)]
        category: Option<Category>,
    },

    /// Mark a task completed, or pending again
    Toggle { id: String },

    /// Delete a task
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List tasks, newest first
    List {
        /// "all" or a category
        #[arg(short, long, default_value = "all", value_parser = parse_filter)]
        filter: Filter,
    },

    /// Show task counts
    Count {
        /// "all" or a category
        #[arg(short, long, default_value = "all", value_parser = parse_filter)]
        filter: Filter,
    },

    /// Show or change the colour theme
    Theme { mode: Option<ThemeMode> },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeMode {
    Light,
    Dark,
    Toggle,
}

fn parse_category(s: &str) -> Result<Category, String> {
    s.parse().map_err(|e: eyre::Report| e.to_string())
}

fn parse_filter(s: &str) -> Result<Filter, String> {
    s.parse().map_err(|e: eyre::Report| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(io::stderr)
        .init();

    let config = Config::load(&Overrides {
        config: cli.config,
        store_path: cli.store_path,
        default_category: cli.default_category,
    })?;

    // Open store
    let storage = SqliteStorage::open(&config.store_path)?;
    debug!(path = ?storage.path(), "Opened task database");
    let mut store = TaskStore::new(storage).with_default_category(config.default_category);
    let theme = store.theme();

    match cli.command {
        Commands::Add { text, category } => {
            let category = category.unwrap_or(store.default_category());
            let outcome = store.dispatch(Action::Add {
                text: text.join(" "),
                category,
            })?;
            report_change(&store, &outcome, theme);
        }
        Commands::Edit { id, text, category } => {
            let Some(current) = store.get(&id) else {
                report(&Outcome::NotFound(id), theme);
                return Ok(());
            };
            let category = category.unwrap_or(current.category);
            let outcome = store.dispatch(Action::Edit {
                id,
                text: text.join(" "),
                category,
            })?;
            report_change(&store, &outcome, theme);
        }
        Commands::Toggle { id } => {
            let outcome = store.dispatch(Action::Toggle { id })?;
            report_change(&store, &outcome, theme);
        }
        Commands::Delete { id, yes } => {
            if !yes && !confirm("Are you sure you want to delete this task?")? {
                println!("Cancelled");
                return Ok(());
            }
            let outcome = store.dispatch(Action::Delete { id })?;
            report_change(&store, &outcome, theme);
        }
        Commands::List { filter } => {
            let tasks = store.filter(filter);
            if tasks.is_empty() {
                println!("{}", "No tasks yet. Add one to get started!".dimmed());
            }
            for task in tasks {
                println!("{}", render_task(task, theme));
            }
            println!("{}", store.count(filter).label(filter).bold());
        }
        Commands::Count { filter } => {
            println!("{}", store.count(filter).label(filter));
        }
        Commands::Theme { mode } => match mode {
            None => println!("{}", theme),
            Some(ThemeMode::Toggle) => {
                let outcome = store.dispatch(Action::ToggleTheme)?;
                report(&outcome, theme);
            }
            Some(ThemeMode::Light) => {
                store.set_theme(Theme::Light)?;
                report(&Outcome::Theme(Theme::Light), theme);
            }
            Some(ThemeMode::Dark) => {
                store.set_theme(Theme::Dark)?;
                report(&Outcome::Theme(Theme::Dark), theme);
            }
        },
    }

    Ok(())
}

fn report(outcome: &Outcome, theme: Theme) {
    match outcome {
        Outcome::Added(task) => println!("{} {}", "Added".green(), render_task(task, theme)),
        Outcome::Updated(task) => println!("{} {}", "Updated".green(), render_task(task, theme)),
        Outcome::Toggled(task) => println!("{} {}", "Toggled".green(), render_task(task, theme)),
        Outcome::Deleted(id) => println!("{} {}", "Deleted".green(), id),
        Outcome::Rejected => eprintln!("{}", "Task text cannot be empty".yellow()),
        Outcome::NotFound(id) => eprintln!("{} {}", "No task with id".yellow(), id),
        Outcome::Theme(theme) => println!("Theme set to {}", theme),
    }
}

/// Report a task mutation and, when something changed, the updated totals
fn report_change(store: &TaskStore<SqliteStorage>, outcome: &Outcome, theme: Theme) {
    report(outcome, theme);
    if outcome.is_change() {
        println!("{}", store.count(Filter::All).label(Filter::All).dimmed());
    }
}

fn render_task(task: &Task, theme: Theme) -> String {
    let checkbox = if task.completed { "[x]" } else { "[ ]" };
    let text = if task.completed {
        task.text.dimmed().strikethrough()
    } else {
        task.text.normal()
    };

    format!(
        "{} {} {} {}",
        checkbox,
        text,
        category_tag(task.category, theme),
        task.id.dimmed()
    )
}

fn category_tag(category: Category, theme: Theme) -> ColoredString {
    let tag = format!("#{}", category);
    match (category, theme) {
        (Category::Personal, Theme::Light) => tag.blue(),
        (Category::Personal, Theme::Dark) => tag.bright_blue(),
        (Category::Work, Theme::Light) => tag.magenta(),
        (Category::Work, Theme::Dark) => tag.bright_magenta(),
        (Category::Other, Theme::Light) => tag.yellow(),
        (Category::Other, Theme::Dark) => tag.bright_yellow(),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
