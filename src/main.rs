use clap::{Args, Parser, Subcommand};
use sheet_sieve::cli;
use sheet_sieve::filter::{FilterMode, FilterSpec};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sieve")]
#[command(about = "View, filter and export spreadsheet rows")]
#[command(long_about = "Sieve - spreadsheet row filter

Loads a workbook (.xlsx, .xlsm, .xlsb, .xls, .ods) from a local path or an
http(s) URL, shows the first sheet as a table, filters rows by whether the
chosen columns are empty, and exports the result as .xlsx or .csv.

COMMANDS:
  sheets  - List the primary sheet and subsheets
  view    - Show the primary sheet (or a subsheet)
  filter  - Keep rows whose columns are all empty (or all filled)
  export  - Write the rows (optionally filtered) to .xlsx or .csv

EXAMPLES:
  sieve sheets inventory.xlsx
  sieve view inventory.xlsx --sheet Suppliers
  sieve filter inventory.xlsx --primary sku --columns price,stock --mode null
  sieve export https://example.com/inventory.xlsx --columns price --format csv

Set RUST_LOG=sheet_sieve=debug for diagnostics.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct FilterArgs {
    /// Primary column (read for every row, does not decide inclusion)
    #[arg(short, long, default_value = "")]
    primary: String,

    /// Comma-separated operation columns
    #[arg(short, long)]
    columns: Option<String>,

    /// `null` keeps rows where every column is empty; anything else keeps
    /// rows where every column is filled
    #[arg(short, long, default_value = "not-null")]
    mode: String,

    /// Treat 0, empty text and FALSE as empty
    #[arg(long)]
    coerce_falsy: bool,
}

impl FilterArgs {
    fn into_spec(self) -> Option<FilterSpec> {
        let columns = self.columns?;
        Some(
            FilterSpec::new(&self.primary, &columns, FilterMode::parse(&self.mode))
                .with_coerce_falsy(self.coerce_falsy),
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the primary sheet and subsheets
    Sheets {
        /// Workbook path or http(s) URL
        #[arg(env = "SIEVE_SOURCE")]
        source: String,
    },

    /// Show the primary sheet, or a subsheet with --sheet
    View {
        /// Workbook path or http(s) URL
        #[arg(env = "SIEVE_SOURCE")]
        source: String,

        /// Subsheet to show instead of the primary sheet
        #[arg(short, long)]
        sheet: Option<String>,

        /// Write an HTML document instead of printing a table
        #[arg(long)]
        html: Option<PathBuf>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Filter the primary sheet by column presence.

A row is kept when EVERY operation column satisfies the mode:
  --mode null       the column is empty
  --mode not-null   the column has a value (default)

Unknown column names count as empty. Zero, empty text and FALSE are
values unless --coerce-falsy is given.

EXAMPLE:
  sieve filter book.xlsx --primary id --columns email,phone --mode null")]
    /// Keep rows by column presence/absence
    Filter {
        /// Workbook path or http(s) URL
        #[arg(env = "SIEVE_SOURCE")]
        source: String,

        #[command(flatten)]
        filter: FilterArgs,

        /// Write an HTML document instead of printing a table
        #[arg(long)]
        html: Option<PathBuf>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Export the primary sheet to .xlsx or .csv.

Pass --columns to export only the filtered rows. The file is named
<filename>.<format>; an empty filename gives download.<format>.
Formats other than xlsx and csv export nothing.

EXAMPLES:
  sieve export book.xlsx --format csv
  sieve export book.xlsx --columns email --mode null --format xlsx -f missing_email")]
    /// Export rows to .xlsx or .csv
    Export {
        /// Workbook path or http(s) URL
        #[arg(env = "SIEVE_SOURCE")]
        source: String,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output format: xlsx or csv
        #[arg(long, default_value = "xlsx")]
        format: String,

        /// Output file name without extension
        #[arg(short, long, default_value = "")]
        filename: String,

        /// Directory to write the file into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheet_sieve=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sheets { source } => cli::sheets(source)?,

        Commands::View {
            source,
            sheet,
            html,
            verbose,
        } => cli::view(source, sheet, html, verbose)?,

        Commands::Filter {
            source,
            filter,
            html,
            verbose,
        } => {
            let spec = filter
                .into_spec()
                .ok_or_else(|| anyhow::anyhow!("--columns is required for filter"))?;
            cli::filter(source, spec, html, verbose)?
        }

        Commands::Export {
            source,
            filter,
            format,
            filename,
            out_dir,
            verbose,
        } => cli::export(source, filter.into_spec(), format, filename, out_dir, verbose)?,
    }

    Ok(())
}
