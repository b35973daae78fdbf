//! Marshalling of off-thread work back onto the owning loop.
//!
//! Dialog state lives in `Rc`/`RefCell` and never leaves the thread running
//! the terminal loop. Background work holds a [`Dispatcher`] instead, which is
//! `Send`, and posts plain messages; the loop receives them through its
//! [`Inbox`] and applies them where the dialog state is reachable.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

/// Sending half handed to background work.
pub struct Dispatcher<M> {
    sender: UnboundedSender<M>,
}

impl<M> Clone for Dispatcher<M> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<M: Send + 'static> Dispatcher<M> {
    /// Queues `message` for the owning loop. Returns `false` when the loop is
    /// gone; the message is dropped in that case.
    pub fn post(&self, message: M) -> bool {
        match self.sender.send(message) {
            Ok(()) => true,
            Err(_) => {
                warn!("owning loop has shut down; dropping posted message");
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Receiving half owned by the loop.
pub struct Inbox<M> {
    receiver: UnboundedReceiver<M>,
}

impl<M> Inbox<M> {
    pub async fn recv(&mut self) -> Option<M> {
        self.receiver.recv().await
    }

    /// Applies every message already queued without waiting for more.
    pub fn drain(&mut self, mut apply: impl FnMut(M)) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.receiver.try_recv() {
            apply(message);
            applied += 1;
        }
        applied
    }
}

pub fn channel<M>() -> (Dispatcher<M>, Inbox<M>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Dispatcher { sender }, Inbox { receiver })
}
