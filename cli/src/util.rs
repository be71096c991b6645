use std::path::Path;

use serde::Serialize;
use serde_json::json;
use sparkmail_core::history::load_seed;
use sparkmail_core::{ClassifyError, HistorySeed, HttpTransport, SessionConfig};

/// Exit codes: 0=success, 1=input rejected, 3=transport failure, 4=usage error
pub const EXIT_REJECTED: i32 = 1;
pub const EXIT_TRANSPORT: i32 = 3;
pub const EXIT_USAGE: i32 = 4;

pub fn exit_error(message: &str, docs_hint: Option<&str>) -> ! {
    let mut err = json!({
        "error": "cli_error",
        "message": message
    });
    if let Some(hint) = docs_hint {
        err["docs_hint"] = json!(hint);
    }
    eprintln!("{}", pretty(&err));
    std::process::exit(EXIT_USAGE);
}

pub fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

pub fn print_json<T: Serialize>(value: &T) {
    println!("{}", pretty(value));
}

/// Print a classification error on stderr and map it to an exit code.
pub fn report_error(err: &ClassifyError) -> i32 {
    eprintln!("{}", pretty(&err.report()));
    if err.is_local() {
        EXIT_REJECTED
    } else {
        EXIT_TRANSPORT
    }
}

pub fn history_seed(demo: bool, seed_file: Option<&Path>) -> HistorySeed {
    match seed_file {
        Some(path) => match load_seed(path) {
            Ok(entries) => HistorySeed::Entries(entries),
            Err(e) => exit_error(&e, Some("Provide a JSON array of history entries.")),
        },
        None if demo => HistorySeed::Demo,
        None => HistorySeed::Empty,
    }
}

pub fn transport(config: &SessionConfig) -> HttpTransport {
    match config.http_transport() {
        Ok(t) => t,
        Err(e) => exit_error(&e.to_string(), Some("Check --api-url or SPARKMAIL_API_URL.")),
    }
}
