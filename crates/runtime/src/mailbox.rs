use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Marshals messages produced on foreign threads onto a single owner.
///
/// Senders are `Send + Clone` and may live anywhere. Only the owner holding
/// the `Mailbox` observes the messages, either by draining synchronously
/// between batches or by awaiting [`Mailbox::recv`] in its event loop.
#[derive(Debug)]
pub struct Mailbox<T> {
    tx: UnboundedSender<T>,
    rx: UnboundedReceiver<T>,
}

/// Cloneable producer half of a [`Mailbox`].
#[derive(Debug)]
pub struct MailboxSender<T> {
    tx: UnboundedSender<T>,
}

impl<T> Clone for MailboxSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> MailboxSender<T> {
    /// Posts a message. Returns `false` once the owning mailbox is gone.
    pub fn post(&self, message: T) -> bool {
        self.tx.send(message).is_ok()
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(&self) -> MailboxSender<T> {
        MailboxSender {
            tx: self.tx.clone(),
        }
    }

    /// Takes every message posted so far, in posting order.
    pub fn drain(&mut self) -> Vec<T> {
        let mut out = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            out.push(message);
        }
        out
    }

    /// Waits for the next message.
    ///
    /// The mailbox keeps a sender of its own, so this never observes a closed
    /// channel; it simply waits until something is posted.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }
}
