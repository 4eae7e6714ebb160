//! Deferred task scheduling with cancellable handles.
//!
//! The scheduler defers one-shot tasks by a delay. It does not own a thread:
//! the host's event loop calls [`Scheduler::run_ready`] when
//! [`Scheduler::time_until_next`] says a task is due. Time is read from an
//! injected [`Clock`], so tests can advance time without sleeping.
//!
//! Every scheduled task is represented by a [`TaskHandle`]. Dropping the handle
//! cancels the task; call [`TaskHandle::detach`] for fire-and-forget work that
//! must outlive its creator (for example restoring focus after a region has
//! been torn down).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::time::Duration;
//! use nibble_core::{ManualClock, Scheduler};
//!
//! let clock = Arc::new(ManualClock::new());
//! let scheduler = Scheduler::new(clock.clone());
//!
//! let hits = Arc::new(AtomicUsize::new(0));
//! let hits_clone = hits.clone();
//! let handle = scheduler.schedule_once(Duration::from_millis(100), move || {
//!     hits_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! clock.advance(Duration::from_millis(100));
//! assert_eq!(scheduler.run_ready(), 1);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! assert!(!handle.is_pending());
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::clock::{Clock, SystemClock};
use crate::error::SchedulerError;
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a scheduled task.
    pub struct ScheduledTaskId;
}

/// A boxed task closure.
type BoxedScheduledTask = Box<dyn FnOnce() + Send + 'static>;

/// Internal scheduled task data.
struct ScheduledTaskData {
    /// When this task should execute.
    run_at: Instant,
    /// The task closure. Taken out when the task runs.
    task: BoxedScheduledTask,
}

/// An entry in the scheduler queue (min-heap by execution time).
#[derive(Debug, Clone, Copy)]
struct SchedulerQueueEntry {
    id: ScheduledTaskId,
    run_at: Instant,
    /// Insertion order; tasks due at the same instant run first-in first-out.
    seq: u64,
}

impl PartialEq for SchedulerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.run_at == other.run_at && self.seq == other.seq
    }
}

impl Eq for SchedulerQueueEntry {}

impl PartialOrd for SchedulerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SchedulerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .run_at
            .cmp(&self.run_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// The unsynchronized task queue behind a [`Scheduler`].
///
/// Tasks are never executed while this structure is borrowed: ready tasks are
/// popped out and run by the caller, so a task is free to schedule or cancel
/// other tasks.
pub struct TaskScheduler {
    /// All pending tasks.
    tasks: SlotMap<ScheduledTaskId, ScheduledTaskData>,
    /// Priority queue of pending executions (min-heap by run time).
    queue: BinaryHeap<SchedulerQueueEntry>,
    /// Sequence counter for FIFO ordering of simultaneous tasks.
    next_seq: u64,
    /// Deadline of the task currently being run by `run_ready`.
    running: Option<Instant>,
}

impl TaskScheduler {
    /// Create an empty task queue.
    pub fn new() -> Self {
        Self {
            tasks: SlotMap::with_key(),
            queue: BinaryHeap::new(),
            next_seq: 0,
            running: None,
        }
    }

    /// Queue a task to execute at a specific instant.
    pub fn schedule_at<F>(&mut self, run_at: Instant, task: F) -> ScheduledTaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.tasks.insert(ScheduledTaskData {
            run_at,
            task: Box::new(task),
        });

        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(SchedulerQueueEntry { id, run_at, seq });

        id
    }

    /// Remove a pending task, returning its closure.
    ///
    /// The closure is handed back so the caller can drop it after releasing
    /// any lock around this queue; closures may own values whose destructors
    /// cancel further tasks.
    fn take(&mut self, id: ScheduledTaskId) -> Option<BoxedScheduledTask> {
        // The stale heap entry is skipped lazily.
        self.tasks.remove(id).map(|data| data.task)
    }

    /// Cancel and remove a pending task.
    pub fn cancel(&mut self, id: ScheduledTaskId) -> Result<(), SchedulerError> {
        self.take(id).map(drop).ok_or(SchedulerError::InvalidTaskId)
    }

    /// Check if a task is still waiting to run.
    pub fn is_pending(&self, id: ScheduledTaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Drop heap entries whose task is gone.
    fn prune(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.tasks.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }

    /// The instant of the earliest pending task, if any.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.prune();
        self.queue.peek().map(|entry| entry.run_at)
    }

    /// Pop the earliest task due at or before `now`, with its deadline.
    pub fn pop_ready(&mut self, now: Instant) -> Option<(ScheduledTaskId, Instant, BoxedScheduledTask)> {
        self.prune();
        let entry = self.queue.peek().copied()?;
        if entry.run_at > now {
            return None;
        }
        self.queue.pop();
        let task = self.take(entry.id)?;
        Some((entry.id, entry.run_at, task))
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Remove every pending task, returning the closures for the caller to drop.
    fn drain(&mut self) -> Vec<BoxedScheduledTask> {
        self.queue.clear();
        self.tasks.drain().map(|(_, data)| data.task).collect()
    }
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaskScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("pending", &self.tasks.len())
            .finish()
    }
}

/// A cloneable handle to a shared task queue and its clock.
///
/// Clones share the same queue. The scheduler is meant to be created once by
/// the application context and passed to every component that defers work.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Mutex<TaskScheduler>>,
    clock: Arc<dyn Clock>,
}

impl Scheduler {
    /// Create a scheduler that reads time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TaskScheduler::new())),
            clock,
        }
    }

    /// Create a scheduler backed by the system clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// The clock this scheduler reads.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// The current instant according to this scheduler's clock.
    #[inline]
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Schedule a task to execute once after `delay`.
    ///
    /// A zero delay runs the task on the next [`run_ready`](Self::run_ready).
    ///
    /// Inside a running task the delay counts from that task's deadline
    /// rather than from the clock, so a chain of tasks keeps its spacing when
    /// the event loop wakes late.
    pub fn schedule_once<F>(&self, delay: Duration, task: F) -> TaskHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let id = {
            let mut queue = self.inner.lock();
            let base = queue.running.unwrap_or_else(|| self.clock.now());
            queue.schedule_at(base + delay, task)
        };
        tracing::trace!(target: targets::SCHEDULER, ?id, ?delay, "scheduled task");
        self.handle(id)
    }

    /// Schedule a task to execute once at `run_at`.
    ///
    /// An instant in the past runs the task on the next
    /// [`run_ready`](Self::run_ready).
    pub fn schedule_at<F>(&self, run_at: Instant, task: F) -> TaskHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.inner.lock().schedule_at(run_at, task);
        tracing::trace!(target: targets::SCHEDULER, ?id, ?run_at, "scheduled task");
        self.handle(id)
    }

    fn handle(&self, id: ScheduledTaskId) -> TaskHandle {
        TaskHandle {
            id,
            queue: Arc::downgrade(&self.inner),
            armed: true,
        }
    }

    /// The deadline of the task currently running, if called from inside one.
    pub fn current_deadline(&self) -> Option<Instant> {
        self.inner.lock().running
    }

    /// Cancel a task by id.
    pub fn cancel(&self, id: ScheduledTaskId) -> Result<(), SchedulerError> {
        let task = self.inner.lock().take(id);
        match task {
            Some(task) => {
                drop(task);
                tracing::trace!(target: targets::SCHEDULER, ?id, "cancelled task");
                Ok(())
            }
            None => Err(SchedulerError::InvalidTaskId),
        }
    }

    /// Check if a task is still waiting to run.
    pub fn is_pending(&self, id: ScheduledTaskId) -> bool {
        self.inner.lock().is_pending(id)
    }

    /// Get the duration until the next task is due.
    ///
    /// Returns `None` if nothing is pending, `Duration::ZERO` if a task is due.
    pub fn time_until_next(&self) -> Option<Duration> {
        let deadline = self.inner.lock().next_deadline()?;
        Some(deadline.saturating_duration_since(self.now()))
    }

    /// Check if any task is due now.
    pub fn has_ready(&self) -> bool {
        self.time_until_next().is_some_and(|d| d.is_zero())
    }

    /// Run every task due at the current instant, in deadline order.
    ///
    /// Tasks run without the queue locked. Tasks scheduled by a running task
    /// are picked up in the same pass if they are already due.
    ///
    /// Returns the number of tasks executed.
    #[tracing::instrument(skip(self), target = "nibble_core::scheduler", level = "trace")]
    pub fn run_ready(&self) -> usize {
        let now = self.now();
        let mut executed = 0;
        let _running = RunningDeadline(&self.inner);

        loop {
            let next = {
                let mut queue = self.inner.lock();
                let next = queue.pop_ready(now);
                queue.running = next.as_ref().map(|(_, run_at, _)| *run_at);
                next
            };
            let Some((id, run_at, task)) = next else {
                break;
            };
            tracing::trace!(target: targets::SCHEDULER, ?id, late = ?now.saturating_duration_since(run_at), "executing scheduled task");
            task();
            executed += 1;
        }

        executed
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending_count()
    }

    /// Cancel every pending task.
    pub fn clear(&self) {
        let tasks = self.inner.lock().drain();
        drop(tasks);
    }
}

/// Clears the running deadline when `run_ready` returns or unwinds.
struct RunningDeadline<'a>(&'a Mutex<TaskScheduler>);

impl Drop for RunningDeadline<'_> {
    fn drop(&mut self) {
        self.0.lock().running = None;
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending_count())
            .field("clock", &self.clock)
            .finish()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::system()
    }
}

/// Ownership of one scheduled task.
///
/// Dropping the handle cancels the task if it has not run yet. The handle
/// holds the queue weakly, so it never keeps a scheduler alive.
#[must_use = "dropping a TaskHandle cancels the task; call detach() to keep it"]
pub struct TaskHandle {
    id: ScheduledTaskId,
    queue: Weak<Mutex<TaskScheduler>>,
    armed: bool,
}

impl TaskHandle {
    /// The id of the underlying task.
    pub fn id(&self) -> ScheduledTaskId {
        self.id
    }

    /// Check if the task is still waiting to run.
    pub fn is_pending(&self) -> bool {
        self.queue
            .upgrade()
            .is_some_and(|queue| queue.lock().is_pending(self.id))
    }

    /// Cancel the task now.
    ///
    /// Returns `true` if the task was still pending.
    pub fn cancel(mut self) -> bool {
        self.armed = false;
        cancel_in(&self.queue, self.id)
    }

    /// Let the task run even after this handle is dropped.
    pub fn detach(mut self) -> ScheduledTaskId {
        self.armed = false;
        self.id
    }
}

fn cancel_in(queue: &Weak<Mutex<TaskScheduler>>, id: ScheduledTaskId) -> bool {
    let Some(queue) = queue.upgrade() else {
        return false;
    };
    let task = queue.lock().take(id);
    let was_pending = task.is_some();
    // Dropped outside the lock: the closure may own other handles.
    drop(task);
    was_pending
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if self.armed {
            cancel_in(&self.queue, self.id);
        }
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("armed", &self.armed)
            .finish()
    }
}

static_assertions::assert_impl_all!(Scheduler: Send, Sync);
static_assertions::assert_impl_all!(TaskHandle: Send, Sync);
