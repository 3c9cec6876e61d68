use crate::app::session::SessionMessage;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use std::time::Duration;
use std::{io, thread};
use termion::event::Key;
use termion::input::TermRead;

pub enum Event {
    Input(Key),
    Tick,
    Response(SessionMessage),
}

/// Keyboard input, redraw ticks and service responses on one stream. Input
/// and ticks are produced on their own threads.
pub struct Events {
    rx: UnboundedReceiver<Event>,
    tx: UnboundedSender<Event>,
}

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub tick_rate: Duration,
}

impl Events {
    pub fn with_config(config: Config) -> Events {
        let (tx, rx) = mpsc::unbounded();

        {
            let tx = tx.clone();
            thread::spawn(move || {
                let stdin = io::stdin();
                for key in stdin.keys().flatten() {
                    if let Err(err) = tx.unbounded_send(Event::Input(key)) {
                        eprintln!("{}", err);
                        return;
                    }
                }
            });
        }
        {
            let tx = tx.clone();
            thread::spawn(move || loop {
                if tx.unbounded_send(Event::Tick).is_err() {
                    break;
                }
                thread::sleep(config.tick_rate);
            });
        }

        Events { rx, tx }
    }

    /// Handle for pushing service responses back into the loop.
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.next().await
    }
}
