use colored::{ColoredString, Colorize};
use std::{fmt, time::Duration};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// How a duration is coloured: dimmed up to `slow`, yellow up to `very_slow`, red beyond.
#[derive(Debug, Clone, Copy)]
pub struct LatencyColors {
    pub slow: Duration,
    pub very_slow: Duration,
}

impl LatencyColors {
    pub const REQUEST: Self = Self {
        slow: Duration::from_millis(100),
        very_slow: Duration::from_millis(500),
    };

    pub const STARTUP: Self = Self {
        slow: Duration::from_secs(2),
        very_slow: Duration::from_secs(3),
    };

    pub fn paint(&self, elapsed: Duration) -> ColoredString {
        let text = human_duration(elapsed);
        if elapsed > self.very_slow {
            text.red()
        } else if elapsed > self.slow {
            text.yellow()
        } else {
            text.dimmed()
        }
    }
}

/// Largest whole unit: `2m5s`, `3s`, `42ms` or `250μs`.
pub fn human_duration(elapsed: Duration) -> String {
    match (elapsed.as_secs(), elapsed.as_millis()) {
        (secs, _) if secs >= 60 => format!("{}m{}s", secs / 60, secs % 60),
        (secs, _) if secs > 0 => format!("{}s", secs),
        (_, millis) if millis > 0 => format!("{}ms", millis),
        _ => format!("{}μs", elapsed.as_micros()),
    }
}

pub struct EventLoggerFormatter;

impl<S, N> FormatEvent<S, N> for EventLoggerFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        if std::env::args().any(|arg| arg == "--quiet") {
            return Ok(());
        }

        if event.metadata().name() == "SKIP_FORMAT" {
            ctx.field_format().format_fields(writer.by_ref(), event)?;
            return writeln!(writer);
        }

        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string().dimmed();

        // Unnamed events get a generated "event file:line" name, and everything bridged from `log` is "log event".
        let event_name = match event.metadata().name() {
            name if name.starts_with("event ") || name == "log event" => "",
            name => name,
        };

        let label = match *event.metadata().level() {
            Level::ERROR => format!(" {}", "error".bold().red()),
            Level::WARN => format!(" {}", "warn".bold().yellow()),
            _ if event_name.is_empty() => String::new(),
            _ => format!(
                " {}",
                event_name.to_ascii_lowercase().bold().bright_yellow()
            ),
        };

        write!(writer, "{}{} ", timestamp, label)?;

        // Write fields on the event
        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

pub fn init_logging() {
    let tracing_formatter = tracing_subscriber::fmt::layer().event_format(EventLoggerFormatter);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("folio=info,{}=info,tower_http=info", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_formatter)
        .init();
}
