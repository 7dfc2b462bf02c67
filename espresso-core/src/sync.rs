//! Ordered, fire-and-forget mirroring of local edits to the gateway.
//!
//! One worker thread drains a FIFO queue, so writes reach the gateway in
//! the order the local mutations were applied no matter how long each
//! call takes. Enqueueing never blocks the caller.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::gateway::{GatewayError, SyncGateway};
use crate::model::NoteId;

/// A write mirrored to the gateway after a local mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOp {
    UpdateTitle { id: NoteId, title: String },
    UpdateContent { id: NoteId, content: String },
    Delete { id: NoteId },
}

impl SyncOp {
    pub fn id(&self) -> NoteId {
        match self {
            SyncOp::UpdateTitle { id, .. }
            | SyncOp::UpdateContent { id, .. }
            | SyncOp::Delete { id } => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SyncOp::UpdateTitle { .. } => "update title",
            SyncOp::UpdateContent { .. } => "update content",
            SyncOp::Delete { .. } => "delete",
        }
    }

    fn apply(&self, gateway: &dyn SyncGateway) -> Result<(), GatewayError> {
        match self {
            SyncOp::UpdateTitle { id, title } => gateway.update_title(*id, title),
            SyncOp::UpdateContent { id, content } => gateway.update_content(*id, content),
            SyncOp::Delete { id } => gateway.delete(*id),
        }
    }
}

/// A write the gateway did not accept
#[derive(Debug)]
pub struct SyncFailure {
    /// Order in which the local mutation was applied
    pub seq: u64,
    pub op: SyncOp,
    pub attempts: u32,
    pub error: GatewayError,
}

enum Job {
    Write { seq: u64, op: SyncOp },
    Flush(Sender<()>),
}

/// Handle to the background writer. Dropping it drains the queue and
/// joins the thread.
pub struct SyncWorker {
    jobs: Option<Sender<Job>>,
    failures: Receiver<SyncFailure>,
    handle: Option<JoinHandle<()>>,
    next_seq: u64,
}

impl SyncWorker {
    pub fn spawn(gateway: Arc<dyn SyncGateway>, retry_attempts: u32) -> std::io::Result<Self> {
        let (jobs_tx, jobs_rx) = unbounded();
        let (failures_tx, failures_rx) = unbounded();

        let handle = thread::Builder::new()
            .name("espresso-sync".to_string())
            .spawn(move || run(gateway, retry_attempts, jobs_rx, failures_tx))?;

        Ok(Self {
            jobs: Some(jobs_tx),
            failures: failures_rx,
            handle: Some(handle),
            next_seq: 0,
        })
    }

    /// Queue a write behind every earlier one. Returns its sequence number.
    pub fn enqueue(&mut self, op: SyncOp) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;

        log::debug!("Queueing {} for note {} (#{})", op.kind(), op.id(), seq);
        let sent = self
            .jobs
            .as_ref()
            .map(|jobs| jobs.send(Job::Write { seq, op }).is_ok())
            .unwrap_or(false);
        if !sent {
            log::error!("Sync worker is gone; write #{} was dropped", seq);
        }
        seq
    }

    /// Block until every write queued so far has been attempted
    pub fn flush(&self) {
        let Some(jobs) = &self.jobs else {
            return;
        };
        let (ack_tx, ack_rx) = unbounded();
        if jobs.send(Job::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }

    /// Failures reported since the last call, oldest first
    pub fn take_failures(&self) -> Vec<SyncFailure> {
        self.failures.try_iter().collect()
    }
}

impl Drop for SyncWorker {
    fn drop(&mut self) {
        // Closing the channel lets the worker finish the queue and exit
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Sync worker panicked");
            }
        }
    }
}

fn run(
    gateway: Arc<dyn SyncGateway>,
    retry_attempts: u32,
    jobs: Receiver<Job>,
    failures: Sender<SyncFailure>,
) {
    for job in jobs {
        match job {
            Job::Write { seq, op } => {
                if let Err((attempts, error)) = write(gateway.as_ref(), &op, retry_attempts) {
                    log::error!(
                        "Giving up on {} for note {} (#{}) after {} attempt(s): {}",
                        op.kind(),
                        op.id(),
                        seq,
                        attempts,
                        error
                    );
                    // Nobody listening is fine; the failure is already logged
                    let _ = failures.send(SyncFailure {
                        seq,
                        op,
                        attempts,
                        error,
                    });
                }
            }
            Job::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    log::debug!("Sync worker stopped");
}

fn write(
    gateway: &dyn SyncGateway,
    op: &SyncOp,
    retry_attempts: u32,
) -> Result<(), (u32, GatewayError)> {
    let mut attempts = 0;
    loop {
        attempts += 1;
        match op.apply(gateway) {
            Ok(()) => return Ok(()),
            Err(e) if attempts <= retry_attempts => {
                log::warn!("{} for note {} failed, retrying: {}", op.kind(), op.id(), e);
            }
            Err(e) => return Err((attempts, e)),
        }
    }
}
