use std::io::Write as _;
use std::path::Path;

use clap::Parser;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spectrace::service::ReportKind;
use spectrace::workflow::Confirmation;
use spectrace::{Config, WorkflowController};

/// Interactive client for the requirements-to-test-case traceability service.
#[derive(Debug, Parser)]
#[command(name = "spectrace", version, about)]
struct Cli {
    /// Base URL of the traceability service (overrides SPECTRACE_SERVICE_URL)
    #[arg(long)]
    service_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(url) = cli.service_url {
        config.service.base_url = url;
    }

    // Initialize logging
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        service = %config.service.base_url,
        "Spectrace starting..."
    );

    let controller = WorkflowController::from_config(&config)?;

    run_repl(controller).await
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        spectrace::config::LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        spectrace::config::LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

async fn run_repl(controller: WorkflowController) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("spectrace — type 'help' for commands, 'quit' to exit");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "help" => print_help(),
            "status" => {
                let stage = controller.stage().await;
                println!("stage: {stage}, busy: {}", controller.is_busy());
            }
            "ingest" => {
                if rest.is_empty() {
                    println!("usage: ingest <path-to-document>");
                    continue;
                }
                report(controller.ingest_document(Path::new(rest)).await);
            }
            "import" => {
                if rest.is_empty() {
                    println!("usage: import <path-to-test-case-json>");
                    continue;
                }
                report(controller.ingest_external_test_cases(Path::new(rest)).await);
            }
            "generate" => report(controller.generate_test_cases(rest).await),
            "validate" => report(controller.validate_all().await),
            "map" => report(controller.map_all().await),
            "trace" => report(controller.build_traceability().await),
            "cases" => match parse_filter(rest) {
                Ok(filter) => print_json(&controller.test_cases(filter).await),
                Err(e) => println!("error: {e}"),
            },
            "validation" => match parse_filter(rest) {
                Ok(filter) => print_json(&controller.validation(filter).await),
                Err(e) => println!("error: {e}"),
            },
            "mapping" => match parse_filter(rest) {
                Ok(filter) => print_json(&controller.mapping(filter).await),
                Err(e) => println!("error: {e}"),
            },
            "matrix" => match parse_filter(rest) {
                Ok(filter) => print_json(&controller.traceability(filter).await),
                Err(e) => println!("error: {e}"),
            },
            "export" => match parse_report_kind(rest) {
                Ok(kind) => report(controller.export_report(kind).await),
                Err(e) => println!("error: {e}"),
            },
            "excel" => report(controller.export_excel().await),
            "clear" => {
                let confirmation = confirm_clear(&mut lines).await?;
                report(controller.clear_all(confirmation).await);
            }
            "quit" | "exit" => break,
            other => println!("unknown command: {other} (try 'help')"),
        }
    }

    info!("Session ended");
    Ok(())
}

/// Ask for explicit acknowledgment before the irreversible clear.
async fn confirm_clear(lines: &mut Lines<BufReader<Stdin>>) -> anyhow::Result<Confirmation> {
    println!("This permanently deletes all test cases, validation results, mappings and the matrix.");
    print!("Type 'yes' to confirm: ");
    std::io::stdout().flush()?;

    let answer = lines.next_line().await?.unwrap_or_default();
    if answer.trim().eq_ignore_ascii_case("yes") {
        Ok(Confirmation::Confirmed)
    } else {
        println!("Clear declined, nothing changed.");
        Ok(Confirmation::Declined)
    }
}

fn parse_filter<F>(arg: &str) -> Result<F, String>
where
    F: std::str::FromStr<Err = String> + Default,
{
    if arg.is_empty() {
        Ok(F::default())
    } else {
        arg.parse()
    }
}

fn parse_report_kind(arg: &str) -> Result<ReportKind, String> {
    match arg {
        "" | "test_cases" => Ok(ReportKind::TestCases),
        "traceability" => Ok(ReportKind::Traceability),
        "validation" => Ok(ReportKind::Validation),
        other => Err(format!(
            "unknown report kind: {other} (expected test_cases, traceability or validation)"
        )),
    }
}

fn report<T: Serialize>(result: spectrace::AppResult<T>) {
    match result {
        Ok(outcome) => print_json(&outcome),
        Err(e) => println!("error: {e}"),
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => println!("error: failed to render output: {e}"),
    }
}

fn print_help() {
    println!(
        "\
commands:
  ingest <path>        upload a requirements document
  import <path>        upload an existing test case JSON file
  generate <query>     generate test cases for a query
  validate             validate all test cases
  map                  map test cases to requirements
  trace                build the traceability matrix
  cases [f]            list test cases (all|passed|failed|pending)
  validation [f]       list validation results (all|valid|invalid|high|low)
  mapping [f]          list mappings (all|mapped|unmapped|high|low)
  matrix [f]           list requirements (all|covered|uncovered)
  export [kind]        export a PDF (test_cases|traceability|validation)
  excel                export the matrix as a spreadsheet
  status               show the current workflow stage
  clear                delete all data (asks for confirmation)
  quit                 exit"
    );
}
