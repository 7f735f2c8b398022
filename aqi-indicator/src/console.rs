//! Terminal stand-in for the status-bar surface.
//!
//! Real platform rendering (menu bar icon, click-to-open-map) is out of
//! scope here; this sink prints the same `(label, color)` pairs a native
//! surface would receive, one line per update.

use tracing::info;

use aqi_core::{IndicatorSink, IndicatorState, Severity};

#[derive(Debug, Default)]
pub struct ConsoleIndicator {
    map_url: Option<String>,
}

fn ansi_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Neutral => "",
        Severity::Green => "\x1b[32m",
        Severity::Yellow => "\x1b[33m",
        Severity::Orange => "\x1b[38;5;208m",
        Severity::Red => "\x1b[31m",
    }
}

impl IndicatorSink for ConsoleIndicator {
    fn update(&mut self, state: &IndicatorState) {
        let color = ansi_color(state.severity);
        let reset = if color.is_empty() { "" } else { "\x1b[0m" };
        let marker = if state.stale { " (stale)" } else { "" };

        println!("{color}{}{reset}{marker}", state.label);
    }

    fn set_map_url(&mut self, url: &str) {
        info!(%url, "station map link available");
        self.map_url = Some(url.to_string());
    }
}
