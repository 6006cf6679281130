use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use manuscript_normalize::merge::{MERGED_FILE_NAME, merge_folder};
use manuscript_normalize::table::DATASET_DELIMITER;
use manuscript_normalize::{LookupTables, NormalizeReport, Result, Table, keywords, normalize};

#[derive(Parser)]
#[command(
    name = "manuscript_normalize",
    about = "Mandragore illuminated-manuscript metadata normalizer"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Derive century and country/region columns, overwriting the dataset
    Normalize {
        /// Merged `;`-delimited dataset
        file: PathBuf,
        /// JSON lookup tables replacing the built-in ones
        #[arg(long)]
        tables: Option<PathBuf>,
        /// Write a JSON run report here
        #[arg(long)]
        report: Option<PathBuf>,
        /// Write the result here instead of overwriting the input
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Merge per-keyword crawler files into one dataset
    Merge {
        /// Folder holding gallica_data_<keyword>.csv files
        folder: PathBuf,
        /// Defaults to <folder>/mandragore_nh_global.csv
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replace '+' with spaces in a keyword list, in place
    Keywords {
        file: PathBuf,
    },
    /// Print the built-in lookup tables as JSON
    Tables,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Normalize {
            file,
            tables,
            report,
            output,
        }) => run_normalize(&file, tables.as_deref(), report.as_deref(), output.as_deref()),
        Some(Command::Merge { folder, output }) => run_merge(&folder, output.as_deref()),
        Some(Command::Keywords { file }) => run_keywords(&file),
        Some(Command::Tables) => run_tables(),
        // Default: normalize the merged dataset in the current directory
        None => run_normalize(Path::new(MERGED_FILE_NAME), None, None, None),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  NORMALIZE
// ═══════════════════════════════════════════════════════════════════════

fn run_normalize(
    file: &Path,
    tables_path: Option<&Path>,
    report_path: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let tables = match tables_path {
        Some(p) => LookupTables::load(p)?,
        None => LookupTables::builtin(),
    };

    eprintln!("Reading dataset: {}", file.display());
    let table = Table::read(file, DATASET_DELIMITER)?;
    eprintln!("Loaded {} rows", table.len());

    let (table, report) = normalize(table, &tables)?;

    let target = output.unwrap_or(file);
    table.write(target, DATASET_DELIMITER)?;
    eprintln!("Wrote {}", target.display());

    print_report(&report);

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, &json)?;
        eprintln!("  {} ({} bytes)", path.display(), json.len());
    }
    Ok(())
}

fn print_report(report: &NormalizeReport) {
    eprintln!("\n══════════════════════════════════════════");
    eprintln!("  NORMALIZATION SUMMARY");
    eprintln!("══════════════════════════════════════════");

    eprintln!("\nFilled cells:");
    for (column, count) in &report.filled {
        eprintln!("  {column}: {count}");
    }

    eprintln!("\nDates:");
    eprintln!("  dynasty annotations: {}", report.dates.dynasty_annotated);
    eprintln!("  overrides applied:   {}", report.dates.overrides_applied);
    if !report.dates.overrides_missing.is_empty() {
        eprintln!(
            "  no override for:     {}",
            report.dates.overrides_missing.join(", ")
        );
    }

    eprintln!("\nBy century:");
    let mut centuries: Vec<_> = report.centuries.iter().collect();
    centuries.sort_by_key(|(_, c)| std::cmp::Reverse(**c));
    for (century, count) in &centuries {
        eprintln!("  {century}: {count}");
    }

    eprintln!(
        "\nCountries/regions: {} distinct ({} places learned from annotations)",
        report.countries.len(),
        report.learned_places
    );
    let mut countries: Vec<_> = report.countries.iter().collect();
    countries.sort_by_key(|(_, c)| std::cmp::Reverse(**c));
    for (country, count) in countries.iter().take(15) {
        eprintln!("  {country}: {count}");
    }
    if countries.len() > 15 {
        eprintln!("  ... and {} more", countries.len() - 15);
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  HOUSEKEEPING
// ═══════════════════════════════════════════════════════════════════════

fn run_merge(folder: &Path, output: Option<&Path>) -> Result<()> {
    eprintln!("Merging crawler files in: {}", folder.display());
    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| folder.join(MERGED_FILE_NAME));
    let merged = merge_folder(folder, Some(&target))?;
    merged.write(&target, DATASET_DELIMITER)?;
    eprintln!("Merged {} rows into {}", merged.len(), target.display());
    Ok(())
}

fn run_keywords(file: &Path) -> Result<()> {
    let changed = keywords::clean_keywords(file)?;
    eprintln!("Cleaned {} ({changed} lines changed)", file.display());
    Ok(())
}

fn run_tables() -> Result<()> {
    println!("{}", LookupTables::builtin().to_json_pretty()?);
    Ok(())
}
