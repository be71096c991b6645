use std::path::PathBuf;

use serde_json::json;
use sparkmail_core::{ClassificationSession, SessionConfig, Transport};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::util::{pretty, print_json, report_error, transport};

const HELP: &str = "\
text <body>     set the email text (discards a selected file)
file <path>     select a .txt/.pdf file (discards the text)
remove-file     drop the selected file
send            classify the current input
clear           drop the current result and input (history is kept)
status          show phase, loading flag and current result
history         show past classifications, most recent first
stats           count productive/unproductive classifications
help            show this help
quit            leave the shell";

#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Text(String),
    File(PathBuf),
    RemoveFile,
    Send,
    Clear,
    Status,
    History,
    Stats,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match word {
            "text" => Ok(Self::Text(rest.to_string())),
            "file" if rest.is_empty() => Err("Usage: file <path>".to_string()),
            "file" => Ok(Self::File(PathBuf::from(rest))),
            "remove-file" => Ok(Self::RemoveFile),
            "send" => Ok(Self::Send),
            "clear" => Ok(Self::Clear),
            "status" => Ok(Self::Status),
            "history" => Ok(Self::History),
            "stats" => Ok(Self::Stats),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("Unknown command: '{other}'. Type 'help' for commands.")),
        }
    }
}

pub async fn run(config: &SessionConfig) -> i32 {
    let session = ClassificationSession::new(transport(config), config);
    eprintln!("SparkMail shell. Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("{}", pretty(&json!({"error": "io_error", "message": e.to_string()})));
                return 4;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match ShellCommand::parse(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => execute(&session, command).await,
            Err(message) => {
                eprintln!("{}", pretty(&json!({"error": "cli_error", "message": message})));
            }
        }
    }
    0
}

async fn execute<T: Transport>(session: &ClassificationSession<T>, command: ShellCommand) {
    match command {
        ShellCommand::Text(body) => {
            session.set_text(body);
            print_json(&json!({"active_input": session.active_source(), "can_submit": session.can_submit()}));
        }
        ShellCommand::File(path) => match session.select_file_path(&path) {
            Ok(()) => print_json(&json!({"active_input": session.active_source(), "can_submit": session.can_submit()})),
            Err(e) => {
                report_error(&e);
            }
        },
        ShellCommand::RemoveFile => {
            session.remove_file();
            print_json(&json!({"active_input": session.active_source()}));
        }
        ShellCommand::Send => match session.submit().await {
            Ok(result) => print_json(&result),
            Err(e) => {
                report_error(&e);
            }
        },
        ShellCommand::Clear => {
            session.clear();
            print_json(&json!({"phase": session.phase()}));
        }
        ShellCommand::Status => {
            let snapshot = session.snapshot();
            print_json(&json!({
                "phase": snapshot.phase,
                "loading": snapshot.loading,
                "result": snapshot.result,
                "history_len": snapshot.history.len(),
            }));
        }
        ShellCommand::History => print_json(&session.history()),
        ShellCommand::Stats => print_json(&session.stats()),
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => {}
    }
}
