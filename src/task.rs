//! One-shot background jobs reporting back to the UI thread.
//!
//! The UI thread keeps the [`TaskHandle`] and polls it once per frame. There
//! is no cancellation and no timeout: a job that never finishes leaves its
//! handle pending forever.

use std::thread;

use futures::channel::oneshot;

use crate::error::CanvasResult;

/// What a poll found
#[derive(Debug)]
pub enum TaskStatus<T> {
    Pending,
    Finished(CanvasResult<T>),
    /// The worker went away without sending a result (it panicked)
    Lost,
}

/// Receiving end of a job started with [`spawn`]
#[derive(Debug)]
pub struct TaskHandle<T> {
    name: String,
    receiver: Option<oneshot::Receiver<CanvasResult<T>>>,
}

/// Run `job` on a fresh worker thread
pub fn spawn<T, F>(name: impl Into<String>, job: F) -> TaskHandle<T>
where
    T: Send + 'static,
    F: FnOnce() -> CanvasResult<T> + Send + 'static,
{
    let name = name.into();
    let (sender, receiver) = oneshot::channel();
    let worker_name = name.clone();
    let spawned = thread::Builder::new().name(name.clone()).spawn(move || {
        log::debug!("Task {worker_name} started");
        let result = job();
        if let Err(e) = &result {
            log::warn!("Task {worker_name} failed: {e}");
        }
        // The UI may have dropped the handle already
        let _ = sender.send(result);
    });

    match spawned {
        Ok(_) => TaskHandle {
            name,
            receiver: Some(receiver),
        },
        Err(e) => {
            log::error!("Could not start task {name}: {e}");
            TaskHandle { name, receiver: None }
        }
    }
}

impl<T> TaskHandle<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check for a result without blocking
    ///
    /// After `Finished` or `Lost` has been returned once, every further poll
    /// returns `Lost`.
    pub fn poll(&mut self) -> TaskStatus<T> {
        let Some(receiver) = &mut self.receiver else {
            return TaskStatus::Lost;
        };
        match receiver.try_recv() {
            Ok(None) => TaskStatus::Pending,
            Ok(Some(result)) => {
                self.receiver = None;
                TaskStatus::Finished(result)
            }
            Err(oneshot::Canceled) => {
                self.receiver = None;
                TaskStatus::Lost
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CanvasError;
    use std::sync::mpsc;
    use std::time::Duration;

    fn poll_until_done<T>(handle: &mut TaskHandle<T>) -> TaskStatus<T> {
        for _ in 0..500 {
            match handle.poll() {
                TaskStatus::Pending => thread::sleep(Duration::from_millis(10)),
                done => return done,
            }
        }
        panic!("task {} never finished", handle.name());
    }

    #[test]
    fn poll_reports_pending_then_result() {
        let (release, gate) = mpsc::channel::<()>();
        let mut handle = spawn("gated", move || {
            gate.recv().map_err(|_| CanvasError::TaskLost("gate".into()))?;
            Ok(42)
        });
        assert!(matches!(handle.poll(), TaskStatus::Pending));

        release.send(()).unwrap();
        assert!(matches!(poll_until_done(&mut handle), TaskStatus::Finished(Ok(42))));
        assert!(matches!(handle.poll(), TaskStatus::Lost));
    }

    #[test]
    fn errors_come_back_as_results() {
        let mut handle = spawn("failing", || -> CanvasResult<()> {
            Err(CanvasError::EmptySelection)
        });
        assert!(matches!(
            poll_until_done(&mut handle),
            TaskStatus::Finished(Err(CanvasError::EmptySelection))
        ));
    }

    #[test]
    fn panicking_worker_is_lost() {
        let mut handle = spawn("panicking", || -> CanvasResult<()> { panic!("worker blew up") });
        assert!(matches!(poll_until_done(&mut handle), TaskStatus::Lost));
    }
}
