use serde_json::json;
use sparkmail_core::SessionConfig;
use sparkmail_core::history::History;

use crate::util::print_json;

/// Print the history a new session would start with.
pub fn run(config: &SessionConfig) -> i32 {
    let history = initial_history(config);
    print_json(&json!({
        "history": history.to_vec(),
        "stats": history.stats(),
    }));
    0
}

fn initial_history(config: &SessionConfig) -> History {
    History::new(config.history_seed.entries(), config.history_cap)
}

#[cfg(test)]
mod tests {
    use sparkmail_core::{HistorySeed, SessionConfig};

    use super::initial_history;

    #[test]
    fn demo_history_respects_cap() {
        let config = SessionConfig {
            history_seed: HistorySeed::Demo,
            history_cap: Some(4),
            ..SessionConfig::default()
        };

        let history = initial_history(&config);
        assert_eq!(history.len(), 4);
        assert_eq!(history.stats().total, 4);
        assert_eq!(history.stats().unproductive, 4);
    }

    #[test]
    fn demo_history_is_unbounded_without_cap() {
        let config = SessionConfig {
            history_seed: HistorySeed::Demo,
            ..SessionConfig::default()
        };

        assert_eq!(initial_history(&config).stats().total, 13);
    }
}
