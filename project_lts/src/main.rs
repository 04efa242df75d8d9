use std::sync::Arc;
use std::time::Duration;

use engine_core::{SystemClock, TickLoop};
use last_tank::MatchController;
use project_lts::config::{parse_cli_args, ServerConfig};
use project_lts::shutdown::{self, shutdown_channel, ShutdownRx, ShutdownTx};
use project_lts::{Arena, ConsoleServer};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[tokio::main]
async fn main() {
    observability::init_logging();

    let config = parse_cli_args();
    tracing::info!(tps = config.tick.tps, "LTS server starting...");

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (output_tx, output_rx) = mpsc::unbounded_channel();

    tokio::spawn(read_console(input_tx));
    tokio::spawn(write_console(output_rx));

    let tick_tx = shutdown_tx.clone();
    let tick_rx = shutdown_rx.clone();
    let tick_handle = std::thread::spawn(move || {
        run_tick_thread(config, input_rx, output_tx, tick_tx, tick_rx);
    });

    let mut quit_rx = shutdown_rx;
    tokio::select! {
        _ = shutdown::wait_for_signal() => {
            tracing::info!("Shutdown signal received, stopping server...");
            shutdown_tx.trigger();
        }
        _ = quit_rx.wait() => {}
    }

    if tick_handle.join().is_err() {
        tracing::error!("tick thread panicked");
    }
    // Let the writer flush the last lines.
    tokio::time::sleep(Duration::from_millis(100)).await;
    tracing::info!("Server stopped.");
    // The stdin reader may still be parked on a blocking read.
    std::process::exit(0);
}

/// Forward stdin lines to the tick thread until EOF.
async fn read_console(input_tx: UnboundedSender<String>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if input_tx.send(line).is_err() {
                    return;
                }
            }
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "console read failed");
                return;
            }
        }
    }
}

async fn write_console(mut output_rx: UnboundedReceiver<String>) {
    let mut stdout = tokio::io::stdout();
    while let Some(line) = output_rx.recv().await {
        let result = async {
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await
        }
        .await;
        if let Err(e) = result {
            tracing::warn!(error = %e, "console write failed");
            return;
        }
    }
}

fn run_tick_thread(
    config: ServerConfig,
    input_rx: UnboundedReceiver<String>,
    output_tx: UnboundedSender<String>,
    shutdown_tx: ShutdownTx,
    shutdown_rx: ShutdownRx,
) {
    let mut arena = Arena::new(Arc::new(SystemClock), config.to_host_settings());
    arena.load_plugin(
        Box::new(MatchController::new()),
        config.plugin.config_path.as_deref(),
    );

    let server = ConsoleServer::new(arena, input_rx, output_tx, shutdown_tx);
    let mut tick_loop = TickLoop::new(config.to_tick_config(), server);
    let ticks = tick_loop.run_until(|| shutdown_rx.is_shutdown());

    tick_loop.handler.stop();
    tracing::info!(ticks, "tick loop stopped");
}
