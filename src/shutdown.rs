use std::io;

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};
use tracing::{info, warn};

/// Resolves on Ctrl-C, or on SIGTERM where that exists.
///
/// The SIGTERM handler is registered in `install`, so a terminate sent any
/// time after that is caught instead of killing the process.
pub struct Shutdown {
    #[cfg(unix)]
    terminate: Signal,
}

impl Shutdown {
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: signal(SignalKind::terminate())?,
        })
    }

    pub async fn wait(self) {
        #[cfg(unix)]
        {
            let mut terminate = self.terminate;
            tokio::select! {
                _ = ctrl_c() => info!("received Ctrl-C"),
                _ = terminate.recv() => info!("received SIGTERM"),
            }
        }

        #[cfg(not(unix))]
        {
            ctrl_c().await;
            info!("received Ctrl-C");
        }

        info!("shutdown requested");
    }
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}
