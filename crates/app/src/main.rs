use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use graphamatics_core::{builtin_registry, run_application, AppConfig, VisualizationRegistry};
use tracing_subscriber::EnvFilter;

mod desktop;

use desktop::DesktopWindow;

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> graphamatics_core::Result<()> {
    show_banner();

    let config = cli.resolve_config()?;
    let mut registry = builtin_registry();
    if let Some(name) = config.visualization.as_deref() {
        registry.apply_selection(name)?;
    }

    if cli.list {
        print_registry(&registry);
        return Ok(());
    }

    let mut window = DesktopWindow::open(&config.window, config.keys)?;
    run_application(&mut window, registry, &config)?;

    tracing::info!("window closed, shutting down");
    Ok(())
}

fn show_banner() {
    println!("Graphamatics (Version {})\n", env!("CARGO_PKG_VERSION"));
}

fn print_registry(registry: &VisualizationRegistry) {
    for descriptor in registry.descriptors() {
        let marker = if descriptor.is_enabled() { '*' } else { ' ' };
        let name = descriptor.name().unwrap_or("<unnamed>");
        match descriptor.description() {
            Some(description) => println!("{marker} {name} - {description}"),
            None => println!("{marker} {name}"),
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Full-screen host for mathematical visualizations", long_about = None)]
struct Cli {
    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Open a regular window instead of going full screen.
    #[arg(long)]
    windowed: bool,
    /// Name of the visualization to enable instead of the built-in default.
    #[arg(short, long)]
    visualization: Option<String>,
    /// List the registered visualizations and exit.
    #[arg(long)]
    list: bool,
}

impl Cli {
    /// Loads the configuration file, if any, and applies flag overrides.
    fn resolve_config(&self) -> graphamatics_core::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_path(path)?,
            None => AppConfig::default(),
        };

        if self.windowed {
            config.window.fullscreen = false;
        }
        if let Some(name) = &self.visualization {
            config.visualization = Some(name.clone());
        }

        Ok(config)
    }
}
