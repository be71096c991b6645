use std::path::PathBuf;

use clap::Args;
use serde_json::json;
use sparkmail_core::{ClassificationSession, SessionConfig};

use crate::util::{exit_error, print_json, report_error, transport};

#[derive(Args)]
pub struct ClassifyArgs {
    /// Email body to classify
    #[arg(long, short = 't')]
    pub text: Option<String>,

    /// .txt or .pdf file to classify (max 5 MB). Takes precedence over --text
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

pub async fn run(config: &SessionConfig, args: ClassifyArgs) -> i32 {
    let session = ClassificationSession::new(transport(config), config);

    match (args.file, args.text) {
        (Some(path), text) => {
            if text.is_some() {
                tracing::warn!("both --text and --file given, classifying the file");
            }
            if let Err(e) = session.select_file_path(&path) {
                return report_error(&e);
            }
        }
        (None, Some(text)) => session.set_text(text),
        (None, None) => exit_error(
            "Nothing to classify",
            Some("Pass --text \"<email body>\" or --file <path>"),
        ),
    }

    match session.submit().await {
        Ok(result) => {
            print_json(&json!({
                "result": result,
                "history_entry": session.history().first(),
            }));
            0
        }
        Err(e) => report_error(&e),
    }
}
