//! Worker pool
//!
//! Fixed set of worker threads fed from a bounded job queue. When the queue
//! is full, `try_execute` reports the overflow so the acceptor can reject
//! the connection instead of queueing without bound.

use std::thread::{self, JoinHandle};

use crossbeam::channel::{bounded, Sender, TrySendError};

use crate::error::{FileHubError, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Bounded pool of connection-handling threads
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `worker_threads` workers sharing a queue of `queue_depth` jobs
    pub fn new(worker_threads: usize, queue_depth: usize) -> Result<Self> {
        let (sender, receiver) = bounded::<Job>(queue_depth.max(1));

        let mut workers = Vec::with_capacity(worker_threads.max(1));
        for i in 0..worker_threads.max(1) {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("filehub-worker-{}", i))
                .spawn(move || {
                    // Runs until the sender side is dropped
                    while let Ok(job) = receiver.recv() {
                        job();
                    }
                })?;
            workers.push(handle);
        }

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Submit a job; fails immediately when the queue is full
    pub fn try_execute<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| FileHubError::Network("worker pool is shut down".to_string()))?;

        match sender.try_send(Box::new(job)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                Err(FileHubError::Network("worker queue full".to_string()))
            }
            Err(TrySendError::Disconnected(_)) => {
                Err(FileHubError::Network("worker pool is shut down".to_string()))
            }
        }
    }

    /// Number of worker threads
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the channel lets each worker drain and exit. Workers are
        // not joined: shutdown is one-way and must not wait on a stalled
        // client that is pinning its worker.
        drop(self.sender.take());
    }
}
