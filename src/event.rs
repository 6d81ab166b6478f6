use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent};
use tokio::sync::mpsc;

use crate::error::{AppError, Result};

/// Events queued between the reader thread and the main loop.
pub const EVENT_QUEUE_CAPACITY: usize = 10;

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// Raw terminal input, translated by the view.
    Input(CrosstermEvent),
    /// A periodic tick for expiring status messages.
    Tick,
}

/// Relays events from a blocking source to the async main loop.
///
/// The source runs on its own thread and blocks once the queue is full, so
/// a slow consumer holds the producer back instead of growing the queue.
pub struct EventHandler<T> {
    rx: mpsc::Receiver<T>,
}

impl<T: Send + 'static> EventHandler<T> {
    /// Start relaying from `source` until it returns `None` or the handler
    /// is dropped.
    pub fn spawn<F>(mut source: F) -> Self
    where
        F: FnMut() -> Option<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        std::thread::spawn(move || {
            while let Some(event) = source() {
                if tx.blocking_send(event).is_err() {
                    break;
                }
            }
            log::debug!("event source finished");
        });
        Self { rx }
    }

    /// Receive the next event (blocks until available).
    pub async fn next(&mut self) -> Result<T> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| AppError::Terminal("Event channel closed".into()))
    }
}

/// Reads terminal input, yielding a tick when nothing arrives in `tick_rate`.
///
/// While `paused` is set the input belongs to a child program, so the
/// terminal is left alone and only ticks come through.
pub fn terminal_source(
    tick_rate: Duration,
    paused: Arc<AtomicBool>,
) -> impl FnMut() -> Option<Event> + Send + 'static {
    move || {
        if paused.load(Ordering::SeqCst) {
            std::thread::sleep(tick_rate);
            return Some(Event::Tick);
        }
        match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(input) => Some(Event::Input(input)),
                Err(e) => {
                    log::error!("reading terminal input: {}", e);
                    None
                }
            },
            Ok(false) => Some(Event::Tick),
            Err(e) => {
                log::error!("polling terminal input: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn relays_in_order_then_closes() {
        let mut items = vec![1, 2, 3].into_iter();
        let mut events = EventHandler::spawn(move || items.next());

        assert_eq!(events.next().await.unwrap(), 1);
        assert_eq!(events.next().await.unwrap(), 2);
        assert_eq!(events.next().await.unwrap(), 3);
        assert!(matches!(events.next().await, Err(AppError::Terminal(_))));
    }

    #[tokio::test]
    async fn producer_waits_for_a_full_queue() {
        let produced = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&produced);
        let mut events = EventHandler::spawn(move || Some(counter.fetch_add(1, Ordering::SeqCst)));

        tokio::time::sleep(Duration::from_millis(50)).await;
        // One more than the queue holds: the item stuck in blocking_send
        assert!(produced.load(Ordering::SeqCst) <= EVENT_QUEUE_CAPACITY + 1);

        assert_eq!(events.next().await.unwrap(), 0);
        assert_eq!(events.next().await.unwrap(), 1);
    }

    #[test]
    fn paused_source_only_ticks() {
        let paused = Arc::new(AtomicBool::new(true));
        let mut source = terminal_source(Duration::from_millis(1), Arc::clone(&paused));
        for _ in 0..3 {
            assert!(matches!(source(), Some(Event::Tick)));
        }
    }
}
