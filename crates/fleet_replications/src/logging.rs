//! Run logging: stdout plus a `logfile.txt` mirror in the output folder.

use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;

pub const LOGFILE_NAME: &str = "logfile.txt";

/// Install the global subscriber: human-readable output on stdout and the
/// same lines, without ansi codes, appended to `<output_dir>/logfile.txt`.
pub fn init_logging(output_dir: &Path) -> Result<(), Box<dyn Error>> {
    let file = File::create(output_dir.join(LOGFILE_NAME))?;
    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
