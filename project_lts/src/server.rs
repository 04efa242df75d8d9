use engine_core::TickHandler;
use plugin_runtime::{OutboundMessage, Recipient};
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver, UnboundedSender};

use crate::arena::Arena;
use crate::console::{parse_line, ConsoleInput};
use crate::shutdown::ShutdownTx;

/// Tick-thread side of the console server: applies operator lines that
/// arrived since the last tick, ticks the arena and forwards its messages.
pub struct ConsoleServer {
    arena: Arena,
    input_rx: UnboundedReceiver<String>,
    output_tx: UnboundedSender<String>,
    shutdown: ShutdownTx,
}

impl ConsoleServer {
    pub fn new(
        arena: Arena,
        input_rx: UnboundedReceiver<String>,
        output_tx: UnboundedSender<String>,
        shutdown: ShutdownTx,
    ) -> Self {
        Self {
            arena,
            input_rx,
            output_tx,
            shutdown,
        }
    }

    /// Unload plugins and flush their last messages.
    pub fn stop(&mut self) {
        self.arena.shutdown();
        self.flush_messages();
    }

    fn drain_input(&mut self) {
        loop {
            match self.input_rx.try_recv() {
                Ok(line) => self.handle_line(&line),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::info!("console closed");
                    self.shutdown.trigger();
                    break;
                }
            }
        }
    }

    fn handle_line(&mut self, line: &str) {
        let input = match parse_line(line) {
            Ok(Some(input)) => input,
            Ok(None) => return,
            Err(e) => {
                self.emit(format!("error: {}", e));
                return;
            }
        };
        if input == ConsoleInput::Quit {
            tracing::info!("quit requested from console");
            self.shutdown.trigger();
            return;
        }
        match input.apply(&mut self.arena) {
            Ok(lines) => {
                for line in lines {
                    self.emit(line);
                }
            }
            Err(e) => self.emit(format!("error: {}", e)),
        }
    }

    fn flush_messages(&mut self) {
        for message in self.arena.take_messages() {
            let line = format_message(&self.arena, &message);
            self.emit(line);
        }
    }

    fn emit(&self, line: String) {
        if self.output_tx.send(line).is_err() {
            tracing::debug!("console output closed");
        }
    }
}

impl TickHandler for ConsoleServer {
    fn on_tick(&mut self, tick: u64) -> usize {
        self.drain_input();
        let count = self.arena.on_tick(tick);
        self.flush_messages();
        count
    }

    fn player_count(&self) -> usize {
        self.arena.player_count()
    }
}

/// `[all] text` for broadcasts, `[to callsign] text` for direct messages.
pub fn format_message(arena: &Arena, message: &OutboundMessage) -> String {
    match message.to {
        Recipient::All => format!("[all] {}", message.text),
        Recipient::Player(id) => {
            let name = arena
                .host()
                .roster()
                .record(id)
                .map(|r| r.callsign)
                .unwrap_or_else(|| id.to_string());
            format!("[to {}] {}", name, message.text)
        }
    }
}
