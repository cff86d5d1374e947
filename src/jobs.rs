use crossbeam_channel::{bounded, Receiver, Sender};
use rayon::ThreadPool;

use crate::error::{Result, SimulationError};

// JobHandle is the completion token of an asynchronous stage. The only way to reach the stage's
// output is through wait, so nothing can read it before the stage is done.
#[must_use = "dropping a JobHandle discards the output of the job"]
pub struct JobHandle<T> {
    receiver: Receiver<Result<T>>,
}

impl<T> JobHandle<T> {
    // A handle paired with the sender that will complete it
    pub fn pending() -> (JobCompleter<T>, Self) {
        let (sender, receiver) = bounded(1);

        (JobCompleter { sender }, JobHandle { receiver })
    }

    // A handle that is already satisfied
    pub fn completed(value: Result<T>) -> Self {
        let (completer, handle) = Self::pending();
        completer.complete(value);

        handle
    }

    pub fn is_complete(&self) -> bool {
        !self.receiver.is_empty()
    }

    // Blocks until the job has finished
    pub fn wait(self) -> Result<T> {
        self.receiver
            .recv()
            .map_err(|_| SimulationError::StageDisconnected)?
    }
}

pub struct JobCompleter<T> {
    sender: Sender<Result<T>>,
}

impl<T> JobCompleter<T> {
    pub fn complete(self, value: Result<T>) {
        // The handle may already be gone, then nobody wants the output
        let _ = self.sender.send(value);
    }
}

// Runs `job` on `pool` and returns its completion handle immediately
pub fn spawn<T, F>(pool: &ThreadPool, job: F) -> JobHandle<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (completer, handle) = JobHandle::pending();

    pool.spawn(move || completer.complete(Ok(job())));

    handle
}
