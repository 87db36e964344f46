//! Distill CLI - Run the synthesis pipeline over a directory of markdown notes.

use clap::Parser;
use distill_cli::{load_config, load_documents, Cli, CliError, Formatter, ReportWriter};
use distill_orchestrator::Orchestrator;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the summary
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let formatter = Formatter::new(!cli.no_color);

    if let Err(e) = run(cli, &formatter).await {
        eprintln!("{}", formatter.error(&e.to_string()));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, formatter: &Formatter) -> distill_cli::Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate().map_err(CliError::Config)?;

    println!("{}", formatter.info(&format!("Loading documents from: {}", cli.documents.display())));
    let documents = load_documents(&cli.documents)?;
    if documents.is_empty() {
        return Err(CliError::NoDocuments(cli.documents.clone()));
    }
    println!("{}", formatter.success(&format!("Loaded {} documents", documents.len())));

    let orchestrator = Orchestrator::new(config)?;

    let cancel = orchestrator.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current stage");
            cancel.cancel();
        }
    });

    println!("{}", formatter.info("Running synthesis workflow..."));
    let run = orchestrator.run(documents).await?;
    println!("{}", formatter.success("Synthesis workflow completed"));

    let writer = ReportWriter::new(&cli.output);
    for path in writer.write(&run.report, cli.format)? {
        println!("{}", formatter.success(&format!("Report written: {}", path.display())));
    }

    println!();
    println!("{}", formatter.run_summary(&run));
    Ok(())
}
