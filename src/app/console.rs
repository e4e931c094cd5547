//! Console output for notable redirects.

use colored::*;

use crate::aggregate::NotableRedirect;
use crate::config::LogFormat;
use crate::host::RedirectKind;

/// Formats a notable redirect as `🔁 domain → final_host`.
///
/// With `colorize`, the destination is green when the redirect also upgraded
/// to https and yellow otherwise.
pub fn format_notable(notable: &NotableRedirect, colorize: bool) -> String {
    if !colorize {
        return format!("🔁 {} → {}", notable.domain, notable.final_host);
    }
    let destination = match notable.kind {
        RedirectKind::ProtocolUpgrade => notable.final_host.green(),
        RedirectKind::CrossHost => notable.final_host.yellow(),
    };
    format!("🔁 {} {} {}", notable.domain, "→".red(), destination)
}

/// Whether console lines should carry ANSI colors for `format`.
///
/// JSON log lines are meant for machines, so escape codes stay out of them.
pub fn colorize_for(format: &LogFormat) -> bool {
    matches!(format, LogFormat::Plain)
}

/// Logs a notable redirect as soon as it is recorded.
pub fn announce_notable(notable: &NotableRedirect, colorize: bool) {
    log::info!("{}", format_notable(notable, colorize));
}
