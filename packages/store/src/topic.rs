use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

use kvgrid_value::NativeValue;

/// A publish/subscribe topic.
///
/// Each subscriber gets its own channel. Subscribers whose receiver has been
/// dropped are forgotten on the next publish.
#[derive(Debug, Default)]
pub struct GridTopic {
    subscribers: Mutex<Vec<Sender<NativeValue>>>,
}

impl GridTopic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<NativeValue> {
        let (tx, rx) = channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }

    /// Deliver `message` to every live subscriber, returning how many got it.
    pub fn publish(&self, message: NativeValue) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(message.clone()).is_ok());
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_reaches_every_subscriber() {
        let topic = GridTopic::new();
        assert_eq!(topic.publish(NativeValue::from("ignored")), 0);

        let a = topic.subscribe();
        let b = topic.subscribe();
        assert_eq!(topic.publish(NativeValue::from("hello")), 2);

        assert_eq!(a.recv().unwrap(), NativeValue::from("hello"));
        assert_eq!(b.recv().unwrap(), NativeValue::from("hello"));
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let topic = GridTopic::new();
        let kept = topic.subscribe();
        drop(topic.subscribe());

        assert_eq!(topic.publish(NativeValue::from(1i64)), 1);
        assert_eq!(topic.subscriber_count(), 1);
        assert_eq!(kept.try_recv().unwrap(), NativeValue::from(1i64));
    }
}
