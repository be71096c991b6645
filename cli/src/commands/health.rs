use serde_json::json;
use sparkmail_core::SessionConfig;
use sparkmail_core::error::ErrorReport;

use crate::util::{EXIT_TRANSPORT, pretty, print_json, transport};

pub async fn run(config: &SessionConfig) -> i32 {
    let transport = transport(config);
    let api_url = transport.base_url().as_str();
    match transport.health().await {
        Ok(status) => {
            print_json(&json!({
                "api_url": api_url,
                "health": status,
            }));
            0
        }
        Err(e) => {
            let report = ErrorReport {
                error: "connection_error".to_string(),
                message: format!("{api_url}: {e}"),
                docs_hint: Some("Is the API server running? Check SPARKMAIL_API_URL.".to_string()),
            };
            eprintln!("{}", pretty(&report));
            EXIT_TRANSPORT
        }
    }
}
