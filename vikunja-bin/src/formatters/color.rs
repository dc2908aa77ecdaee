//! Defines the colors used in the log and error output of the CLI.

use console::Style;
use log::Level;

/// Style of the `[LEVEL]` prefix of a log line
pub(crate) fn color_for_level(level: Level) -> Style {
    let style = Style::new().for_stderr();
    match level {
        Level::Error => style.color256(197).bold(),
        Level::Warn => style.yellow().bold().bright(),
        Level::Info => style.color256(2).bright(),
        Level::Debug => style.blue().bright(),
        Level::Trace => style.dim(),
    }
}

/// Style of the `[Kind code]` prefix of a failed request
pub(crate) fn error_style() -> Style {
    Style::new().for_stderr().color256(197).bold()
}
