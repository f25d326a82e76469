//! Tracing setup for binaries and examples embedding this crate.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install a plain fmt subscriber at the given level. Returns an error if a
/// global subscriber is already set, which embedding applications may treat
/// as non-fatal.
pub fn init_tracing(level: Level) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("failed to set tracing subscriber: {e}"))
}
