use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::{Args, Parser, Subcommand};
use glob::glob;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use sensorport_core::{FormatOptions, PORTS, Uplink};

#[derive(Parser, Debug)]
#[command(name = "sensorport")]
#[command(version)]
#[command(
    about = "Decoder for port-keyed LoRaWAN sensor payloads.",
    long_about = None,
    after_help = "Examples:\n  sensorport decode --port 1 0c80\n  sensorport uplink uplink.json -o document.json\n  sensorport ports"
)]
struct Cli {
    /// Log decoding steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a raw payload received on a given port.
    Decode(DecodeArgs),
    /// Turn a network-server uplink JSON file into a platform document.
    #[command(alias = "format")]
    #[command(
        after_help = "Examples:\n  sensorport uplink uplink.json -o document.json\n  sensorport uplink 'captures/*.json' --stdout --pretty"
    )]
    Uplink(UplinkArgs),
    /// List every defined port with its fields and payload size.
    Ports {
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// LoRaWAN port the payload arrived on
    #[arg(short, long)]
    port: u32,

    /// Payload as hex (default) or base64 with --base64
    payload: String,

    /// Treat the payload as base64 instead of hex
    #[arg(long)]
    base64: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct UplinkArgs {
    /// Path (or single-match glob) of an uplink JSON file
    input: PathBuf,

    /// Output document path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    output: Option<PathBuf>,

    /// Write JSON document to stdout
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Leave the gateway summary out of the document
    #[arg(long)]
    no_gateway_metadata: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let quiet = matches!(&cli.command, Commands::Uplink(args) if args.quiet);
    init_logging(cli.verbose, quiet);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode(args),
        Commands::Uplink(args) => cmd_uplink(args),
        Commands::Ports { pretty } => cmd_ports(pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = %err.message, "command failed");
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
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

fn cmd_decode(args: DecodeArgs) -> Result<(), CliError> {
    let payload = parse_payload(&args.payload, args.base64)?;
    let record = sensorport_core::decode(&payload, args.port).map_err(|err| {
        let hint = match err {
            sensorport_core::DecodeError::UnknownPort { .. } => {
                "run `sensorport ports` to list defined ports"
            }
            sensorport_core::DecodeError::BufferTooShort { .. }
            | sensorport_core::DecodeError::UnsupportedWidth { .. } => {
                "check the payload matches the port layout"
            }
        };
        CliError::new(format!("decode failed: {err}"), Some(hint.to_string()))
    })?;
    println!("{}", to_json(&record, args.pretty)?);
    Ok(())
}

fn parse_payload(payload: &str, base64: bool) -> Result<Vec<u8>, CliError> {
    let trimmed = payload.trim();
    if base64 {
        return STANDARD.decode(trimmed).map_err(|err| {
            CliError::new(
                format!("invalid base64 payload: {err}"),
                Some("drop --base64 to pass hex".to_string()),
            )
        });
    }
    let compact: String = trimmed
        .trim_start_matches("0x")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    hex::decode(&compact).map_err(|err| {
        CliError::new(
            format!("invalid hex payload: {err}"),
            Some("pass hex digits such as 0c80, or use --base64".to_string()),
        )
    })
}

fn cmd_uplink(args: UplinkArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
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

    if let Some(output_path) = output.as_ref() {
        // A parent that does not exist yet cannot alias the input.
        let output_dir = output_path.parent().and_then(|parent| {
            if parent.as_os_str().is_empty() {
                fs::canonicalize(".").ok()
            } else {
                fs::canonicalize(parent).ok()
            }
        });
        if let Some(output_dir) = output_dir {
            let output_target = output_dir.join(
                output_path
                    .file_name()
                    .ok_or_else(|| anyhow::anyhow!("Invalid output path"))?,
            );
            if output_target == input_abs {
                return Err(CliError::new(
                    format!(
                        "output path must differ from input: {}",
                        output_path.display()
                    ),
                    Some("choose a different output path".to_string()),
                ));
            }
        }
    }

    let raw = fs::read_to_string(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;
    let uplink = Uplink::from_json(&raw).map_err(|err| {
        CliError::new(
            format!("invalid uplink document: {}", resolved_input.display()),
            Some(err.to_string()),
        )
    })?;
    let options = FormatOptions {
        collect_gateway_metadata: !args.no_gateway_metadata,
    };
    let document = sensorport_core::format_uplink(&uplink, &options)
        .context("uplink formatting failed")?;
    let json = serialize_document(&document, args.pretty, args.compact)?;

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
        .with_context(|| format!("Failed to write document: {}", output.display()))?;

    if !args.quiet {
        eprintln!("OK: document written -> {}", output.display());
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct PortEntry {
    port: u32,
    fields: Vec<&'static str>,
    payload_len: usize,
}

fn cmd_ports(pretty: bool) -> Result<(), CliError> {
    let entries: Vec<PortEntry> = PORTS
        .iter()
        .map(|layout| PortEntry {
            port: layout.port,
            fields: layout.fields().map(|field| field.name()).collect(),
            payload_len: layout.payload_len(),
        })
        .collect();
    println!("{}", to_json(&entries, pretty)?);
    Ok(())
}

fn serialize_document(
    document: &serde_json::Map<String, serde_json::Value>,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    to_json(document, pretty)
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, CliError> {
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

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass an uplink .json file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass an uplink .json file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "json" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .json file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
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

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .json".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single uplink file, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>();
        message.push_str("; matches: ");
        message.push_str(&listed.join(", "));
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
