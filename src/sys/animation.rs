use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;
use std::time::Duration;

/// Stands in for the view's animation-end signal: posts `Settle` once the
/// spin duration has elapsed.
pub fn schedule_settle(tx: Sender<AppEvent>, duration: Duration) {
    thread::spawn(move || {
        thread::sleep(duration);
        if tx.send_blocking(AppEvent::Settle).is_err() {
            log::debug!("Event loop closed before the spin settled");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_arrives_after_duration() {
        let (tx, rx) = async_channel::unbounded();
        let started = std::time::Instant::now();
        schedule_settle(tx, Duration::from_millis(30));
        assert_eq!(rx.recv_blocking().unwrap(), AppEvent::Settle);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
