use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use inventory_report::export::{self, ExportOptions};
use inventory_report::io::excel_read;
use inventory_report::reports::ReportKind;
use inventory_report::{ReportError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ReportError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Export(args) => execute_export(args),
        Command::Inspect(args) => execute_inspect(args),
    }
}

fn execute_export(args: ExportArgs) -> Result<()> {
    let mut options = ExportOptions::default();
    if !args.report.is_empty() {
        options.reports = args.report.into_iter().map(ReportKind::from).collect();
    }
    if let Some(account) = args.account {
        options.account = account;
    }
    export::export(&args.input, &args.output, &options)
}

fn execute_inspect(args: InspectArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ReportError::MissingInput(args.input));
    }

    let sheet = match args.sheet {
        Some(sheet) => sheet,
        None => excel_read::sheet_names(&args.input)?
            .into_iter()
            .next()
            .ok_or_else(|| ReportError::MissingSheet("<first>".to_string()))?,
    };
    let contents = export::inspect(&args.input, &sheet)?;
    for row in &contents.rows {
        println!("{}", row.join("\t"));
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Render cloud inventory snapshots as grouped spreadsheet reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build reports from an inventory snapshot into an .xlsx workbook.
    Export(ExportArgs),
    /// Print the cells of a rendered report sheet.
    Inspect(InspectArgs),
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Inventory snapshot (JSON).
    #[arg(long)]
    input: PathBuf,

    /// Output workbook path.
    #[arg(long)]
    output: PathBuf,

    /// Report to include; repeat to select several. Defaults to all reports.
    #[arg(long, value_enum)]
    report: Vec<ReportArg>,

    /// Account label for the route table report.
    #[arg(long)]
    account: Option<String>,
}

#[derive(clap::Args)]
struct InspectArgs {
    /// Rendered workbook path.
    #[arg(long)]
    input: PathBuf,

    /// Sheet to print. Defaults to the first sheet.
    #[arg(long)]
    sheet: Option<String>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ReportArg {
    SecurityGroups,
    RouteTables,
    VpcEndpoints,
    SsoUsers,
}

impl From<ReportArg> for ReportKind {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::SecurityGroups => ReportKind::SecurityGroups,
            ReportArg::RouteTables => ReportKind::RouteTables,
            ReportArg::VpcEndpoints => ReportKind::VpcEndpoints,
            ReportArg::SsoUsers => ReportKind::SsoUsers,
        }
    }
}
