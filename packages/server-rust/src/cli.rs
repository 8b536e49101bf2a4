//! Command runner behind the `stringsvc-cli` binary.
//!
//! Arguments are consumed as `<op> <argument>` pairs and executed in order
//! against any `StringService`. A missing trailing argument is the empty
//! string.

use std::io::{self, Write};

use stringsvc_core::StringService;

/// Fatal CLI failures. Per-call service errors are not among them.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("unknown command {0}")]
    UnknownCommand(String),
    #[error("write output: {0}")]
    Io(#[from] io::Error),
}

/// Runs every command in `args`.
///
/// Results are written to `out` one per line; a failing call writes its
/// error to `err_out` and execution continues with the next command.
///
/// # Errors
///
/// Returns `CliError::UnknownCommand` at the first unrecognised op (the
/// commands before it have already run) and `CliError::Io` when a writer
/// fails.
pub async fn run_commands<S, W, E>(
    svc: &S,
    args: &[String],
    out: &mut W,
    err_out: &mut E,
) -> Result<(), CliError>
where
    S: StringService + ?Sized,
    W: Write,
    E: Write,
{
    let mut args = args.iter();
    while let Some(cmd) = args.next() {
        let arg = args.next().map_or("", String::as_str);
        let result = match cmd.as_str() {
            "tc" => svc.title_case(arg).await,
            "rw" => svc.remove_whitespace(arg).await,
            "c" => Ok(svc.count(arg).await.to_string()),
            other => return Err(CliError::UnknownCommand(other.to_string())),
        };
        match result {
            Ok(output) => writeln!(out, "{output}")?,
            Err(err) => writeln!(err_out, "{err}")?,
        }
    }
    Ok(())
}
