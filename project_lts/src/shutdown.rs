use tokio::sync::watch;

/// Sender side, held by main and the console. Triggers shutdown.
#[derive(Clone)]
pub struct ShutdownTx(watch::Sender<bool>);

/// Receiver side, cloned to each subsystem.
#[derive(Clone)]
pub struct ShutdownRx(watch::Receiver<bool>);

pub fn shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTx(tx), ShutdownRx(rx))
}

impl ShutdownTx {
    pub fn trigger(&self) {
        let _ = self.0.send(true);
    }
}

impl ShutdownRx {
    /// Wait until shutdown is signaled or every sender is gone.
    pub async fn wait(&mut self) {
        while !*self.0.borrow() {
            if self.0.changed().await.is_err() {
                return;
            }
        }
    }

    /// Non-blocking check for the tick thread.
    pub fn is_shutdown(&self) -> bool {
        *self.0.borrow()
    }
}

/// Wait for SIGINT or SIGTERM (Unix) or Ctrl+C (all platforms).
/// If no handler can be installed this never returns.
pub async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => tracing::info!("received SIGINT"),
                    _ = sigterm.recv() => tracing::info!("received SIGTERM"),
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!(error = %e, "failed to register signal handlers");
                std::future::pending::<()>().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("received Ctrl+C"),
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_running() {
        let (_tx, rx) = shutdown_channel();
        assert!(!rx.is_shutdown());
    }

    #[test]
    fn trigger_reaches_every_clone() {
        let (tx, rx) = shutdown_channel();
        let rx2 = rx.clone();
        tx.trigger();
        assert!(rx.is_shutdown());
        assert!(rx2.is_shutdown());
    }

    #[tokio::test]
    async fn wait_returns_after_trigger() {
        let (tx, mut rx) = shutdown_channel();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            tx.trigger();
        });
        rx.wait().await;
        assert!(rx.is_shutdown());
    }
}
