use colored::*;
use macshift_common::{PRINT_TARGET, SUCCESS_TARGET};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::registry::LookupSpan;

/// Renders events as `[symbol] message`; raw prints get no symbol at all.
pub struct MacshiftFormatter;

fn status(target: &str, level: Level) -> Option<ColoredString> {
    let symbol = match (target, level) {
        (PRINT_TARGET, _) => return None,
        (SUCCESS_TARGET, _) => "[✓]".green().bold(),
        (_, Level::TRACE) => "[ ]".dimmed(),
        (_, Level::DEBUG) => "[?]".blue(),
        (_, Level::INFO) => "[+]".green().bold(),
        (_, Level::WARN) => "[*]".yellow().bold(),
        (_, Level::ERROR) => "[-]".red().bold(),
    };
    Some(symbol)
}

impl<S, N> FormatEvent<S, N> for MacshiftFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        if let Some(symbol) = status(meta.target(), *meta.level()) {
            write!(writer, "{symbol} ")?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `verbosity` when set.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .event_format(MacshiftFormatter)
        .with_env_filter(filter)
        .init();
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
