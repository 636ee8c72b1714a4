//! Bounded fan-out of network tasks.
//!
//! Jobs are pulled lazily from their source and a task is spawned only once
//! a ticket from the [`TicketPool`] is in hand, so at most `workers`
//! tasks exist at any time however large the source is. Waiting for a
//! ticket and the work itself both race the shared [`Deadline`]; once it
//! is done no further job is pulled.
//!
//! Results go through an unbounded channel (many writers, one reader) that is
//! drained once every task has been joined.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

use crate::deadline::Deadline;

#[derive(Debug, Clone)]
pub struct TicketPool {
    permits: Arc<Semaphore>,
}

impl TicketPool {
    pub fn new(workers: usize) -> Self {
        let size = workers.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            permits: Arc::new(Semaphore::new(size)),
        }
    }

    /// Waits for a ticket, or returns `None` once the deadline is done.
    /// The ticket goes back to the pool when dropped.
    pub async fn acquire(&self, deadline: &Deadline) -> Option<OwnedSemaphorePermit> {
        if deadline.is_done() {
            return None;
        }
        tokio::select! {
            biased;
            _ = deadline.done() => None,
            permit = self.permits.clone().acquire_owned() => permit.ok(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskEnd {
    Finished,
    Abandoned,
}

/// What a fan-out collected.
#[derive(Debug)]
pub struct Fanout<T> {
    pub results: Vec<T>,
    /// Started tasks that gave up because the deadline fired first.
    pub abandoned: usize,
    /// Jobs were left in the source when the deadline fired.
    pub unstarted: bool,
}

impl<T> Fanout<T> {
    /// Some job never got a complete answer.
    pub fn cut_short(&self) -> bool {
        self.abandoned > 0 || self.unstarted
    }
}

/// Runs `work` once per job with at most `workers` jobs in flight.
///
/// Returns after every started task has finished or been abandoned.
pub async fn fan_out<I, J, T, F, Fut>(
    jobs: I,
    workers: usize,
    deadline: &Deadline,
    work: F,
) -> Fanout<T>
where
    I: IntoIterator<Item = J>,
    J: Send + 'static,
    T: Send + 'static,
    F: Fn(J) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<T>> + Send + 'static,
{
    let pool = TicketPool::new(workers);
    let work = Arc::new(work);
    let (tx, mut rx) = mpsc::unbounded_channel::<T>();
    let mut tasks: JoinSet<TaskEnd> = JoinSet::new();
    let mut abandoned: usize = 0;
    let mut unstarted = false;

    for job in jobs {
        let Some(ticket) = pool.acquire(deadline).await else {
            unstarted = true;
            break;
        };

        let deadline = deadline.clone();
        let work = work.clone();
        let tx = tx.clone();

        tasks.spawn(async move {
            let _ticket = ticket;
            tokio::select! {
                biased;
                _ = deadline.done() => TaskEnd::Abandoned,
                found = work(job) => {
                    if let Some(result) = found {
                        let _ = tx.send(result);
                    }
                    TaskEnd::Finished
                }
            }
        });

        // Finished tasks are reaped as we go so the set stays small.
        while let Some(joined) = tasks.try_join_next() {
            abandoned += tally(joined);
        }
    }
    drop(tx);

    if unstarted {
        debug!("deadline reached before every job was started");
    }

    while let Some(joined) = tasks.join_next().await {
        abandoned += tally(joined);
    }

    let mut results: Vec<T> = Vec::new();
    while let Some(result) = rx.recv().await {
        results.push(result);
    }

    Fanout {
        results,
        abandoned,
        unstarted,
    }
}

fn tally(joined: Result<TaskEnd, JoinError>) -> usize {
    match joined {
        Ok(TaskEnd::Finished) => 0,
        Ok(TaskEnd::Abandoned) => 1,
        Err(e) => {
            warn!("sweep task failed: {e}");
            0
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
