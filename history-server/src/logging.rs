//! Development log format

use colored::Colorize;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    registry::LookupSpan,
};

/// Colored single-line event format for development
pub struct ColoredFormatter;

impl<S, N> FormatEvent<S, N> for ColoredFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        let metadata = event.metadata();

        write!(writer, "{} ", chrono::Utc::now().format("%H:%M:%S%.3f").to_string().bright_black())?;

        let level_str = match *metadata.level() {
            Level::TRACE => "TRACE".bright_purple(),
            Level::DEBUG => "DEBUG".bright_blue(),
            Level::INFO => " INFO".bright_green(),
            Level::WARN => " WARN".bright_yellow(),
            Level::ERROR => "ERROR".bright_red(),
        };
        write!(writer, "[{level_str}] ")?;

        if let Some(target) = metadata.target().split("::").last() {
            write!(writer, "{:<15} ", target.bright_cyan())?;
        }

        ctx.format_fields(writer.by_ref(), event)?;

        if metadata.level() <= &Level::DEBUG {
            if let (Some(file), Some(line)) = (metadata.file(), metadata.line()) {
                let file_short = file.rsplit('/').next().unwrap_or(file);
                write!(writer, " {}", format!("({file_short}:{line})").bright_black())?;
            }
        }

        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io,
        sync::{Arc, Mutex},
    };
    use tracing_subscriber::{fmt, layer::SubscriberExt};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(emit: impl FnOnce()) -> String {
        colored::control::set_override(false);
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(move || writer.clone())
                .event_format(ColoredFormatter),
        );

        tracing::subscriber::with_default(subscriber, emit);

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_event_is_one_line_with_fields() {
        let line = capture(|| tracing::info!(kind = "task", "History endpoints ready"));

        assert!(line.contains("[ INFO]"), "{line}");
        assert!(line.contains("History endpoints ready"), "{line}");
        assert!(line.contains("kind=\"task\""), "{line}");
        assert!(line.ends_with('\n'));
        assert_eq!(line.lines().count(), 1);
    }

    #[test]
    fn test_debug_events_carry_source_location() {
        let line = capture(|| tracing::debug!("looking up history"));

        assert!(line.contains("[DEBUG]"), "{line}");
        assert!(line.contains("(logging.rs:"), "{line}");
    }
}
