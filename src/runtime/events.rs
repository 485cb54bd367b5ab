use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::runtime::RuntimeSlot;

/// Events the VM posts to the launcher from its own threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// The VM announced it is about to stop.
    Stopped,
}

enum Message {
    Runtime(RuntimeEvent),
    Shutdown,
}

/// Sending half handed to the native stop callback.
///
/// Posting never blocks and never fails visibly: once the listener is gone
/// there is nobody left to tell.
#[derive(Clone)]
pub struct StopNotifier {
    tx: UnboundedSender<Message>,
}

impl StopNotifier {
    pub fn notify(&self, event: RuntimeEvent) {
        let _ = self.tx.send(Message::Runtime(event));
    }

    pub fn notify_stopped(&self) {
        self.notify(RuntimeEvent::Stopped);
    }
}

/// Thread applying [`RuntimeEvent`]s to the runtime slot.
pub struct StopListener {
    tx: UnboundedSender<Message>,
    thread: JoinHandle<()>,
}

impl StopListener {
    /// Drain every event posted so far, then stop the listener thread.
    pub fn shutdown(self) {
        let _ = self.tx.send(Message::Shutdown);
        if self.thread.join().is_err() {
            tracing::error!("runtime stop listener panicked");
        }
    }
}

/// Start the listener that clears `slot` when the VM posts
/// [`RuntimeEvent::Stopped`].
pub fn spawn_stop_listener<H>(
    slot: Arc<RuntimeSlot<H>>,
) -> io::Result<(StopNotifier, StopListener)>
where
    H: Send + Sync + 'static,
{
    let (tx, rx) = unbounded_channel();
    let thread = thread::Builder::new()
        .name("jvmlaunch-stop".to_string())
        .spawn(move || listen(rx, &slot))?;

    Ok((StopNotifier { tx: tx.clone() }, StopListener { tx, thread }))
}

fn listen<H>(mut rx: UnboundedReceiver<Message>, slot: &RuntimeSlot<H>) {
    while let Some(message) = rx.blocking_recv() {
        match message {
            Message::Runtime(RuntimeEvent::Stopped) => {
                if slot.clear() {
                    tracing::info!("runtime announced stop, handle cleared");
                }
            }
            Message::Shutdown => break,
        }
    }
}
