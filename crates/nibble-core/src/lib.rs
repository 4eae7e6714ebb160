//! Core systems for Nibble.
//!
//! This crate provides the foundational pieces shared by the Nibble
//! accessibility engine:
//!
//! - **Clock**: injectable monotonic time ([`SystemClock`], [`ManualClock`])
//! - **Scheduler**: one-shot deferred tasks with cancel-on-drop [`TaskHandle`]s
//! - **Types**: geometry ([`Point`], [`Size`], [`Rect`]) and sRGB colors ([`Rgb`])
//! - **Logging**: `tracing` targets and performance spans
//!
//! # Scheduler Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use nibble_core::{ManualClock, Scheduler};
//!
//! let clock = Arc::new(ManualClock::new());
//! let scheduler = Scheduler::new(clock.clone());
//!
//! // Dropping a handle cancels the task
//! let handle = scheduler.schedule_once(Duration::from_millis(100), || {});
//! drop(handle);
//! assert_eq!(scheduler.pending_count(), 0);
//!
//! // Detached tasks run even after their handle is gone
//! scheduler.schedule_once(Duration::ZERO, || {}).detach();
//! clock.advance(Duration::from_millis(1));
//! assert_eq!(scheduler.run_ready(), 1);
//! ```

mod clock;
mod error;
pub mod logging;
mod scheduler;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ColorParseError, NibbleError, Result, SchedulerError};
pub use logging::PerfSpan;
pub use scheduler::{ScheduledTaskId, Scheduler, TaskHandle, TaskScheduler};
pub use types::{Point, Rect, Rgb, Size};
