mod api;
mod app;
mod config;
mod error;
mod format;
mod grades_table;
mod model;
mod report;
mod screens;
mod student_portal;

use clap::{Parser, ValueEnum};

use app::{App, Route};

const LOG_ENV: &str = "GRADE_INSIGHT_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Page {
    Table,
    Portal,
}

/// Desktop grade viewer for a JSON grades API.
#[derive(Debug, Parser)]
#[command(name = "grade-insight", version, about)]
struct Cli {
    /// Page to open on startup.
    #[arg(long, value_enum, default_value_t = Page::Table)]
    page: Page,

    /// Open the student portal and look up this address immediately.
    #[arg(long)]
    email: Option<String>,

    /// Override the API base URL for this run.
    #[arg(long)]
    api_url: Option<String>,

    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn route(&self) -> Route {
        match (&self.email, self.page) {
            (Some(email), _) => Route::StudentPortal {
                email: Some(email.clone()),
            },
            (None, Page::Portal) => Route::StudentPortal { email: None },
            (None, Page::Table) => Route::GradesTable,
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if let Err(err) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("failed to initialize tracing subscriber: {err}");
    }
}

fn main() -> iced::Result {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let mut config = config::load_config();
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.trim().to_string();
    }
    let route = cli.route();
    tracing::debug!(?route, api = %config.api_base_url, "starting");

    iced::application("Grade Insight", App::update, App::view)
        .subscription(App::subscription)
        .theme(App::theme)
        .window_size(iced::Size::new(1400.0, 800.0))
        .run_with(move || App::new(config, route))
}
