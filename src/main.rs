//! Purpose: `graphacean` CLI entry point.
//! Role: Binary crate root; parses args, initializes the math module adapter, emits JSON on stdout.
//! Invariants: Successful commands print exactly one JSON document on stdout.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: Logs go to stderr, filtered by `RUST_LOG` (default `warn`).
use std::error::Error as StdError;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use graphacean::api::{Error, ErrorKind, to_exit_code};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

#[derive(Parser)]
#[command(
    name = "graphacean",
    version,
    about = "Call complex and vector math through namespaced exports",
    long_about = r#"Initialize the graphacean math module and call its exports.

Grouped functions live in namespaces (ComplexFunctions, VectorFunctions) and are
addressed as `Namespace.Member`; everything else keeps its original name."#,
    after_help = r#"EXAMPLES
  $ graphacean exports
  $ graphacean call Complex 3 4
  $ graphacean call ComplexFunctions.Abs '{"re":3,"im":4}'
  $ graphacean call PowN '{"re":0,"im":1}' -1"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        value_name = "JSON",
        help = "Init config forwarded verbatim to the wrapped module",
        conflicts_with = "init_config_file"
    )]
    init_config: Option<String>,
    #[arg(
        long,
        value_name = "PATH",
        help = "Read the init config JSON from a file",
        value_hint = ValueHint::FilePath
    )]
    init_config_file: Option<PathBuf>,
    #[arg(long, help = "Pretty-print JSON output")]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "List pass-through exports and namespaces")]
    Exports,
    #[command(
        about = "Call an export",
        after_help = r#"EXAMPLES
  $ graphacean call Sqrt '{"re":-4,"im":0}'
  $ graphacean call VectorFunctions.Dot '{"x":1,"y":2}' '{"x":3,"y":4}'"#
    )]
    Call {
        #[arg(help = "Export name or Namespace.Member")]
        path: String,
        #[arg(
            help = "Arguments, one JSON value each",
            allow_hyphen_values = true
        )]
        args: Vec<String>,
    },
    #[command(about = "Generate shell completions")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
    #[command(about = "Print version info as JSON")]
    Version,
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Run `graphacean --help` for usage."));
            }
        },
    };

    let init_config = load_init_config(cli.init_config.as_deref(), cli.init_config_file.as_ref())?;
    command_dispatch::dispatch_command(cli.command, init_config, cli.pretty)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or("invalid arguments");
    first.trim_start_matches("error: ").trim().to_string()
}

fn load_init_config(
    inline: Option<&str>,
    file: Option<&PathBuf>,
) -> Result<Option<Value>, Error> {
    let (text, origin) = match (inline, file) {
        (Some(text), _) => (text.to_string(), "--init-config".to_string()),
        (None, Some(path)) => {
            let text = fs::read_to_string(path).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message(format!("failed to read {}", path.display()))
                    .with_source(err)
            })?;
            (text, path.display().to_string())
        }
        (None, None) => return Ok(None),
    };
    let value = parse_json_arg(&text, &origin)?;
    Ok(Some(value))
}

fn parse_json_arg(text: &str, origin: &str) -> Result<Value, Error> {
    serde_json::from_str(text).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("{origin} is not valid JSON"))
            .with_hint("Quote JSON objects for the shell, e.g. '{\"re\":1,\"im\":0}'.")
            .with_source(err)
    })
}

fn emit_json(value: Value, pretty: bool) {
    let encoded = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    match encoded {
        Ok(text) => println!("{text}"),
        Err(err) => emit_error(
            &Error::new(ErrorKind::Internal)
                .with_message("json encode failed")
                .with_source(err),
        ),
    }
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::NotCallable => "export is not callable".to_string(),
        ErrorKind::Initialization => "module initialization failed".to_string(),
        ErrorKind::Configuration => "module surface does not match the adapter".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(export) = err.export() {
        inner.insert("export".to_string(), json!(export));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error) -> String {
    let mut lines = vec![format!("error: {}", error_message(err))];
    if let Some(export) = err.export() {
        lines.push(format!("export: {export}"));
    }
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    for cause in error_causes(err) {
        lines.push(format!("caused by: {cause}"));
    }
    lines.join("\n")
}
