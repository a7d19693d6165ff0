use std::collections::BTreeMap;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use glob::glob;
use serde::Serialize;
use shpjson_core::{
    ConvertError, FeatureCollection, Header, Properties, ShapeFile, ShapeType, ShpDecoder,
    ShpError, combine,
};
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SHPJSON_BUILD_COMMIT"),
    " ",
    env!("SHPJSON_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "shpjson")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decode ESRI Shapefile (.shp) geometry into GeoJSON.",
    long_about = None,
    after_help = "Examples:\n  shpjson shp convert roads.shp -o roads.geojson\n  shpjson shp decode parcels.shp --stdout --pretty\n  shpjson shp info 'data/*.shp'"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on .shp inputs.
    Shp {
        #[command(subcommand)]
        command: ShpCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ShpCommands {
    /// Convert a shapefile into a GeoJSON FeatureCollection.
    #[command(alias = "decode")]
    #[command(
        after_help = "Examples:\n  shpjson shp convert roads.shp -o roads.geojson\n  shpjson shp decode roads.shp --stdout --properties roads.json"
    )]
    Convert {
        /// Path (or glob pattern matching one file) to a .shp file
        input: PathBuf,

        /// Output GeoJSON path
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        output: Option<PathBuf>,

        /// Write GeoJSON to stdout
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// JSON file holding an array of attribute objects, one per record
        #[arg(long, value_name = "JSON")]
        properties: Option<PathBuf>,

        /// Keep the records decoded before a corrupt record instead of failing
        #[arg(long)]
        lenient: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Print the header and record counts of a shapefile as JSON.
    Info {
        /// Path (or glob pattern matching one file) to a .shp file
        input: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let quiet = matches!(
        cli.command,
        Commands::Shp {
            command: ShpCommands::Convert { quiet: true, .. }
        }
    );
    init_logging(cli.verbose, quiet);

    let result = match cli.command {
        Commands::Shp { command } => match command {
            ShpCommands::Convert {
                input,
                output,
                stdout,
                pretty,
                compact,
                properties,
                lenient,
                quiet,
            } => cmd_shp_convert(ConvertArgs {
                input,
                output,
                stdout,
                pretty,
                compact,
                properties,
                lenient,
                quiet,
            }),
            ShpCommands::Info { input, pretty } => cmd_shp_info(input, pretty),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

/// `RUST_LOG` wins; otherwise warnings, raised by `-v` and lowered by `--quiet`.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

impl From<ShpError> for CliError {
    fn from(err: ShpError) -> Self {
        let hint = match &err {
            ShpError::TruncatedHeader { .. } => {
                "the file is shorter than the 100-byte shapefile header".to_string()
            }
            ShpError::CorruptRecord { .. } => {
                "use --lenient to keep the records decoded before the damaged one".to_string()
            }
            ShpError::UnsupportedShapeType { .. } => {
                "supported shape types: 1, 3, 5, 8, 11, 13, 15, 18 (and measured 21, 23, 25, 28)"
                    .to_string()
            }
        };
        CliError::new(format!("shapefile decoding failed: {}", err), Some(hint))
    }
}

impl From<ConvertError> for CliError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::Io(err) => CliError::new(
                format!("failed to read input file: {}", err),
                Some("check that the file exists and is readable".to_string()),
            ),
            ConvertError::Shp(err) => err.into(),
        }
    }
}

struct ConvertArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    properties: Option<PathBuf>,
    lenient: bool,
    quiet: bool,
}

fn cmd_shp_convert(args: ConvertArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    let output = if args.stdout {
        None
    } else {
        Some(args.output.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--output or --stdout".to_string()),
            )
        })?)
    };
    if let Some(output) = output.as_ref() {
        ensure_distinct_output(&resolved_input, output)?;
    }

    let rows = args
        .properties
        .as_deref()
        .map(load_properties)
        .transpose()?;

    let shapes = if args.lenient {
        decode_lenient(&resolved_input)?
    } else {
        shpjson_core::decode_shp_file(&resolved_input, None)?
    };
    if let Some(rows) = rows.as_ref() {
        if rows.len() != shapes.geometries.len() {
            tracing::warn!(
                rows = rows.len(),
                records = shapes.geometries.len(),
                "attribute row count differs from record count"
            );
        }
    }

    let collection = combine(shapes.geometries, rows.as_deref());
    let json = serialize_collection(&collection, args.pretty, args.compact)?;

    let Some(output) = output else {
        println!("{}", json);
        return Ok(());
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&output, json)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;

    if !args.quiet {
        eprintln!(
            "OK: {} features written -> {}",
            collection.features.len(),
            output.display()
        );
    }
    Ok(())
}

/// Decode record by record and keep what was decoded before the first error.
fn decode_lenient(input: &Path) -> Result<ShapeFile, CliError> {
    let bytes = fs::read(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let mut decoder = ShpDecoder::new(&bytes, None)?;
    let mut geometries = Vec::new();
    for result in decoder.by_ref() {
        match result {
            Ok(geometry) => geometries.push(geometry),
            Err(err) => {
                tracing::warn!(
                    kept = geometries.len(),
                    error = %err,
                    "stopped at corrupt record; keeping earlier records"
                );
                break;
            }
        }
    }
    Ok(ShapeFile {
        header: decoder.header().clone(),
        geometries,
    })
}

fn load_properties(path: &Path) -> Result<Vec<Properties>, CliError> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read properties file: {}", path.display()))?;
    serde_json::from_str(&text).map_err(|err| {
        CliError::new(
            format!("invalid properties file '{}': {}", path.display(), err),
            Some("expected a JSON array of objects, one per record".to_string()),
        )
    })
}

fn serialize_collection(
    collection: &FeatureCollection,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    to_json(collection, pretty)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

#[derive(Debug, Serialize)]
struct InfoReport {
    path: String,
    header: Header,
    shape_type: ShapeType,
    records: usize,
    null_records: usize,
    geometry_types: BTreeMap<&'static str, usize>,
}

fn cmd_shp_info(input: PathBuf, pretty: bool) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;

    let shapes = shpjson_core::decode_shp_file(&resolved_input, None)?;
    let shape_type = ShapeType::from_code(shapes.header.shape_type_code)?;
    let mut geometry_types = BTreeMap::new();
    for geometry in shapes.geometries.iter().flatten() {
        *geometry_types.entry(geometry.type_name()).or_insert(0) += 1;
    }

    let report = InfoReport {
        path: resolved_input.display().to_string(),
        records: shapes.geometries.len(),
        null_records: shapes.null_count(),
        header: shapes.header,
        shape_type,
        geometry_types,
    };
    println!("{}", to_json(&report, pretty)?);
    Ok(())
}

fn ensure_distinct_output(input: &Path, output: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let output_dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A missing output directory cannot contain the input.
    let Ok(output_dir) = fs::canonicalize(output_dir) else {
        return Ok(());
    };
    let file_name = output
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid output path: {}", output.display()))?;
    if output_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("output path must differ from input: {}", output.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .shp file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .shp file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "shp" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .shp file; .dbf and .shx companions are not decoded".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single .shp file, or run once per file".to_string()),
        ));
    }
    matches.pop().ok_or_else(|| {
        CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected a .shp file".to_string()),
        )
    })
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
