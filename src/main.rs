use clap::Parser;
use labelsmith::{
    DatasetStore, DelimiterSpec, GenerationController, GenerationError, GenerationJob,
    GenerationRequest, JobDefinition, JobId, LabelsmithError, OwnerId, RowRange, SheetSelector,
    SourceFormat,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// Generates a multi-page label PDF from a tabular data file and a job
/// definition (template geometry, fields and column mappings).
#[derive(Parser, Debug)]
#[command(name = "labelsmith", version, about)]
struct Cli {
    /// Tabular data file (CSV/TSV or a spreadsheet).
    #[arg(long)]
    data: PathBuf,

    /// Delimiter for delimited input: `auto`, a single character, or `tab`.
    #[arg(long, default_value = "auto")]
    delimiter: String,

    /// Read this sheet of a spreadsheet (default: first sheet).
    #[arg(long)]
    sheet: Option<String>,

    /// Treat the first row as column headers.
    #[arg(long)]
    has_header: bool,

    /// Job definition JSON file.
    #[arg(long)]
    template: PathBuf,

    /// Output PDF path.
    #[arg(long)]
    output: PathBuf,

    /// First data row to render (1-based, inclusive).
    #[arg(long)]
    start_row: Option<u32>,

    /// Last data row to render (1-based, inclusive; default: last row).
    #[arg(long)]
    end_row: Option<u32>,

    /// Write the structured job log as JSON to this path instead of stdout.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Owner id recorded on the dataset and job.
    #[arg(long, default_value_t = 1)]
    owner: u64,
}

const SPREADSHEET_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb", "ods"];

fn source_format(cli: &Cli) -> Result<SourceFormat, LabelsmithError> {
    let extension = cli
        .data
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let is_spreadsheet = cli.sheet.is_some()
        || extension
            .as_deref()
            .is_some_and(|e| SPREADSHEET_EXTENSIONS.contains(&e));

    if is_spreadsheet {
        let sheet = match &cli.sheet {
            Some(name) => SheetSelector::Named(name.clone()),
            None => SheetSelector::First,
        };
        return Ok(SourceFormat::Spreadsheet { sheet });
    }

    let delimiter = match cli.delimiter.as_str() {
        "auto" => DelimiterSpec::Auto,
        "tab" | "\\t" => DelimiterSpec::Char(b'\t'),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => DelimiterSpec::Char(c as u8),
                _ => {
                    return Err(LabelsmithError::Definition(format!(
                        "delimiter must be 'auto', 'tab' or a single ASCII character, got '{other}'"
                    )));
                }
            }
        }
    };
    Ok(SourceFormat::Delimited { delimiter })
}

fn run(cli: Cli) -> Result<(), LabelsmithError> {
    let owner = OwnerId::new(cli.owner);

    let mut store = DatasetStore::new();
    let filename = cli
        .data
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("data")
        .to_string();
    let dataset = store.create_dataset(filename, source_format(&cli)?, cli.has_header, owner);
    let bytes = fs::read(&cli.data)?;
    let summary = store.ingest(dataset, &bytes)?;
    log::info!(
        "ingested {}: {} rows x {} columns",
        cli.data.display(),
        summary.row_count,
        summary.column_count
    );

    let definition = JobDefinition::from_file(&cli.template)?;
    let job_name = definition.name.clone();
    let base_dir = cli.template.parent().unwrap_or(Path::new("."));
    let (template, mappings) = definition.into_template(base_dir, owner)?;

    let mut request = GenerationRequest::new(job_name, dataset, template.id, owner);
    request.range = RowRange {
        start: cli.start_row,
        end: cli.end_row,
    };
    request.mappings = mappings;

    let controller = GenerationController::new(&store, &template);
    let mut job = GenerationJob::new(JobId::new(1), request);

    let outcome = match controller.run(&mut job) {
        Ok(outcome) => outcome,
        Err(GenerationError::Validation(reasons)) => {
            eprintln!("the job cannot start:");
            for reason in &reasons {
                eprintln!("  - {reason}");
            }
            return Err(GenerationError::Validation(reasons).into());
        }
        Err(e) => return Err(e.into()),
    };

    fs::write(&cli.output, &outcome.pdf)?;
    println!(
        "wrote {} ({} pages, {} bytes)",
        cli.output.display(),
        outcome.pages,
        outcome.pdf.len()
    );

    match &cli.log {
        Some(path) => {
            let json = serde_json::to_string_pretty(outcome.log.entries())?;
            fs::write(path, json)?;
        }
        None => {
            for entry in outcome.log.entries() {
                match entry.row {
                    Some(row) => println!("[{}] row {}: {}", entry.severity, row, entry.message),
                    None => println!("[{}] {}", entry.severity, entry.message),
                }
            }
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
