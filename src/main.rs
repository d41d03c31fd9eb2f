use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use stampnav::ProviderKind;
use stampnav::catalogue::build_provider;
use stampnav::core::config::{self, CliOverrides};
use stampnav::core::controller::StackController;
use stampnav::core::state::Browser;
use stampnav::tui;

#[derive(Parser)]
#[command(name = "stampnav", about = "Drill-down browser for stamp catalogues")]
struct Args {
    /// Catalogue backend to use (overrides config and STAMPNAV_PROVIDER)
    #[arg(short, long, value_enum)]
    provider: Option<ProviderKind>,

    /// JSON catalogue for the fixture provider
    #[arg(short, long)]
    fixture: Option<PathBuf>,

    /// Composite code to open, e.g. NZ.014.1898
    #[arg(short, long)]
    open: Option<String>,

    /// Print the path and its options instead of starting the browser
    #[arg(long)]
    print: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to stampnav.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("stampnav.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let cli = CliOverrides {
        provider: args.provider.map(|p| p.config_name().to_string()),
        fixture_path: args.fixture,
        start_code: args.open,
    };
    let resolved = config::resolve(&file_config, &cli);
    log::info!("stampnav starting up with provider: {}", resolved.provider);

    let provider = match build_provider(&resolved) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if args.print {
        let mut controller = StackController::new(provider);
        return match print_path(&mut controller, resolved.start_code.as_deref()).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    match tui::run(Browser::new(provider), resolved.start_code) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// `--print`: breadcrumb, code and options of `code` (or the root catalogue).
async fn print_path(
    controller: &mut StackController,
    code: Option<&str>,
) -> Result<(), stampnav::core::NavError> {
    let options = match code {
        Some(code) => {
            let top = controller.restore(code).await?;
            if let Some(record) = &top.detail {
                println!("{}", serde_json::to_string_pretty(record).unwrap_or_default());
                return Ok(());
            }
            top.options.clone()
        }
        None => controller.root_options().await?,
    };

    let crumbs = controller.breadcrumb();
    if !crumbs.is_empty() {
        println!("{}", crumbs.join(" › "));
    }
    if let Some(top) = controller.top() {
        println!("[{}]", top.code);
    }
    for option in &options {
        match option.segment.as_deref() {
            Some(segment) if segment != option.label => println!("  {}  ({segment})", option.label),
            _ => println!("  {}", option.label),
        }
    }
    Ok(())
}
