//! Purpose: Hold top-level CLI command dispatch for `graphacean`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Only `exports` and `call` initialize the wrapped module; the rest never touch it.

use super::*;

use graphacean::api::Exports;
use graphacean::math;

pub(super) fn dispatch_command(
    command: Command,
    init_config: Option<Value>,
    pretty: bool,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "graphacean", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_json(
                json!({
                    "name": "graphacean",
                    "version": env!("CARGO_PKG_VERSION"),
                }),
                pretty,
            );
            Ok(RunOutcome::ok())
        }
        Command::Exports => {
            let exports = initialize(init_config)?;
            emit_json(exports.describe(), pretty);
            Ok(RunOutcome::ok())
        }
        Command::Call { path, args } => {
            let args = args
                .iter()
                .enumerate()
                .map(|(idx, text)| parse_json_arg(text, &format!("argument {idx}")))
                .collect::<Result<Vec<_>, _>>()?;
            let exports = initialize(init_config)?;
            let result = exports.call(&path, &args)?;
            emit_json(json!({ "path": path, "result": result }), pretty);
            Ok(RunOutcome::ok())
        }
    }
}

fn initialize(init_config: Option<Value>) -> Result<&'static Exports, Error> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to start runtime")
                .with_source(err)
        })?;
    runtime.block_on(math::initialize(init_config))
}
