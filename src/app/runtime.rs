use crate::error::Result;
use tokio::signal;
use tracing::info;

/// Wait for a shutdown signal and return its name.
///
/// SIGINT everywhere, SIGTERM (systemd stop) on Unix.
pub async fn wait_for_shutdown_signal() -> Result<&'static str> {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => {
                result?;
                info!("Received SIGINT signal (Ctrl+C)");
                Ok("SIGINT")
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM signal");
                Ok("SIGTERM")
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        info!("Received SIGINT signal (Ctrl+C)");
        Ok("SIGINT")
    }
}
