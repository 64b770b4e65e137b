use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::project_dirs;

/// Environment variable overriding the log filter, e.g. `YTWEB_LOG=ytweb=trace`.
const LOG_ENV: &str = "YTWEB_LOG";

/// Send logs to `ytweb.log` in the data directory so stdout stays clean for
/// command output. The returned guard flushes the writer when dropped.
/// Returns `None` (logging disabled) when no data directory is available.
pub fn init(verbose: u8) -> Option<WorkerGuard> {
  let log_dir = project_dirs()?.data_dir().to_path_buf();
  std::fs::create_dir_all(&log_dir).ok()?;

  let appender = tracing_appender::rolling::never(&log_dir, "ytweb.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let default_level = match verbose {
    0 => "ytweb=info",
    1 => "ytweb=debug",
    _ => "ytweb=trace",
  };
  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).try_init().ok()?;
  Some(guard)
}
