//! Periodic driver: scheduler, module tick and host loop.
//!
//! A single monotonic millisecond tick feeds a fixed table of periodic tasks.
//! Each due task invokes one controller entry point:
//!
//! | Task | Entry point | Default period |
//! |------|-------------|----------------|
//! | `OverrideCheck` | `check_for_operator_override` | 50 ms |
//! | `SensorFaultCheck` | `check_for_sensor_faults` | 250 ms |
//! | `OutputUpdate` | `update_output` | 20 ms |
//! | `ReportPublish` | `publish_report` | 100 ms |
//!
//! ## Pacing
//! Missed periods are skipped and counted as overruns, never replayed back
//! to back. Tasks due in the same tick run in registration order.
//!
//! ## RT Setup
//! With the `rt` feature the host calls `mlockall`, pins to a core and
//! switches to `SCHED_FIFO` before entering the loop. Without it these are
//! no-ops and the loop paces with `std::thread::sleep`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use dbw_common::actuator::config::TaskPeriods;
use dbw_common::actuator::profile::ActuatorProfile;
use dbw_common::hal::driver::ActuatorDriver;
use dbw_common::hal::report::ReportSink;
use static_assertions::const_assert;
use thiserror::Error;
use tracing::{debug, info};

use crate::controller::ActuatorController;

/// Capacity of the task table.
pub const MAX_TASKS: usize = 8;

const_assert!(MAX_TASKS >= 4);

// ─── Errors ─────────────────────────────────────────────────────────

/// Errors during RT setup or scheduler construction.
#[derive(Debug, Error)]
pub enum CycleError {
    /// RT system call failed.
    #[error("RT setup error: {0}")]
    RtSetup(String),

    /// Task table has no free slot.
    #[error("task table full ({} tasks)", MAX_TASKS)]
    TaskTableFull,

    /// The loop was started with no registered task.
    #[error("no tasks registered")]
    NoTasks,

    /// A task was registered with a zero period.
    #[error("task {0} has a zero period")]
    ZeroPeriod(TaskId),
}

// ─── Tasks ──────────────────────────────────────────────────────────

/// Periodic controller task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskId {
    /// Operator override check.
    OverrideCheck,
    /// Sensor validity check.
    SensorFaultCheck,
    /// Spoof output refresh.
    OutputUpdate,
    /// Status report publish.
    ReportPublish,
}

impl TaskId {
    /// Name used in logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OverrideCheck => "override_check",
            Self::SensorFaultCheck => "sensor_fault_check",
            Self::OutputUpdate => "output_update",
            Self::ReportPublish => "report_publish",
        }
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduler table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTask {
    /// Task identity.
    pub id: TaskId,
    /// Period [ms].
    pub period_ms: u32,
    /// Next due tick [ms].
    pub next_due_ms: u64,
    /// Times the task ran.
    pub runs: u64,
    /// Periods skipped because the tick arrived late.
    pub overruns: u64,
}

/// Due tasks of one tick, in registration order.
pub type DueTasks = heapless::Vec<TaskId, MAX_TASKS>;

/// Fixed-capacity periodic scheduler.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    tasks: heapless::Vec<PeriodicTask, MAX_TASKS>,
}

impl Scheduler {
    /// Empty scheduler.
    pub const fn new() -> Self {
        Self {
            tasks: heapless::Vec::new(),
        }
    }

    /// Scheduler with the four controller tasks, first due at `start_ms`.
    pub fn from_periods(periods: &TaskPeriods, start_ms: u64) -> Result<Self, CycleError> {
        let mut s = Self::new();
        s.register(TaskId::OverrideCheck, periods.override_check_ms, start_ms)?;
        s.register(TaskId::SensorFaultCheck, periods.sensor_check_ms, start_ms)?;
        s.register(TaskId::OutputUpdate, periods.output_update_ms, start_ms)?;
        s.register(TaskId::ReportPublish, periods.report_publish_ms, start_ms)?;
        Ok(s)
    }

    /// Append a task, first due at `start_ms`.
    pub fn register(&mut self, id: TaskId, period_ms: u32, start_ms: u64) -> Result<(), CycleError> {
        if period_ms == 0 {
            return Err(CycleError::ZeroPeriod(id));
        }
        self.tasks
            .push(PeriodicTask {
                id,
                period_ms,
                next_due_ms: start_ms,
                runs: 0,
                overruns: 0,
            })
            .map_err(|_| CycleError::TaskTableFull)
    }

    /// Registered tasks.
    #[inline]
    pub fn tasks(&self) -> &[PeriodicTask] {
        &self.tasks
    }

    /// Sum of skipped periods over all tasks.
    pub fn total_overruns(&self) -> u64 {
        self.tasks.iter().map(|t| t.overruns).sum()
    }

    /// Greatest common divisor of all periods: the coarsest tick that
    /// still hits every due time. `None` when empty.
    pub fn base_tick_ms(&self) -> Option<u32> {
        self.tasks
            .iter()
            .map(|t| t.period_ms)
            .reduce(gcd)
    }

    /// Earliest next due time. `None` when empty.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.tasks.iter().map(|t| t.next_due_ms).min()
    }

    /// Collect the tasks due at `now_ms` and advance them.
    pub fn poll(&mut self, now_ms: u64) -> DueTasks {
        let mut due = DueTasks::new();
        for task in self.tasks.iter_mut() {
            if now_ms < task.next_due_ms {
                continue;
            }
            let period = u64::from(task.period_ms);
            let skipped = (now_ms - task.next_due_ms) / period;
            task.overruns += skipped;
            task.next_due_ms += (skipped + 1) * period;
            task.runs += 1;
            // Capacity equals the table size.
            let _ = due.push(task.id);
        }
        due
    }
}

const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-tick timing statistics.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total ticks executed.
    pub cycle_count: u64,
    /// Last tick duration [ns].
    pub last_cycle_ns: u64,
    /// Minimum tick duration [ns].
    pub min_cycle_ns: u64,
    /// Maximum tick duration [ns].
    pub max_cycle_ns: u64,
    /// Running sum for average computation.
    pub sum_cycle_ns: u64,
    /// Ticks that took longer than the base tick.
    pub overruns: u64,
}

impl CycleStats {
    /// Create a new zeroed stats instance.
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: u64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
        }
    }

    /// Record a tick duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: u64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns = self.sum_cycle_ns.saturating_add(duration_ns);
    }

    /// Average tick time [ns] (returns 0 if no ticks).
    #[inline]
    pub fn avg_cycle_ns(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Actuator Module ────────────────────────────────────────────────

/// One controller driven by one scheduler.
pub struct ActuatorModule<D> {
    controller: ActuatorController<D>,
    scheduler: Scheduler,
    stats: CycleStats,
}

impl<D: ActuatorDriver> ActuatorModule<D> {
    /// Build a module with all four tasks first due at `start_ms`.
    pub fn new(
        profile: ActuatorProfile,
        periods: &TaskPeriods,
        driver: D,
        start_ms: u64,
    ) -> Result<Self, CycleError> {
        Ok(Self {
            controller: ActuatorController::new(profile, driver),
            scheduler: Scheduler::from_periods(periods, start_ms)?,
            stats: CycleStats::new(),
        })
    }

    /// Controller.
    #[inline]
    pub fn controller(&self) -> &ActuatorController<D> {
        &self.controller
    }

    /// Controller, mutable (external requests, driver access).
    #[inline]
    pub fn controller_mut(&mut self) -> &mut ActuatorController<D> {
        &mut self.controller
    }

    /// Scheduler.
    #[inline]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Host loop statistics.
    #[inline]
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Run every task due at `now_ms`. Sensor read failures go to
    /// `sink.report_fault`. Returns the tasks that ran.
    pub fn tick<S: ReportSink + ?Sized>(&mut self, now_ms: u64, sink: &mut S) -> DueTasks {
        let due = self.scheduler.poll(now_ms);
        let kind = self.controller.profile().kind;
        for &task in due.iter() {
            match task {
                TaskId::OverrideCheck => {
                    if let Err(e) = self.controller.check_for_operator_override() {
                        sink.report_fault(kind, &e);
                    }
                }
                TaskId::SensorFaultCheck => {
                    if let Err(e) = self.controller.check_for_sensor_faults() {
                        sink.report_fault(kind, &e);
                    }
                }
                TaskId::OutputUpdate => {
                    self.controller.update_output();
                }
                TaskId::ReportPublish => {
                    self.controller.publish_report(sink);
                }
            }
        }
        due
    }

    /// Host loop: pace ticks on the base tick until `running` clears or
    /// `duration_ms` elapses. `before_tick` runs ahead of each tick with the
    /// elapsed time, for upstream commands and test stimulus.
    pub fn run<S, F>(
        &mut self,
        sink: &mut S,
        running: &AtomicBool,
        duration_ms: Option<u64>,
        mut before_tick: F,
    ) -> Result<(), CycleError>
    where
        S: ReportSink + ?Sized,
        F: FnMut(u64, &mut ActuatorController<D>),
    {
        let tick_ms = self
            .scheduler
            .base_tick_ms()
            .ok_or(CycleError::NoTasks)?;
        let tick = Duration::from_millis(u64::from(tick_ms));
        let origin = Instant::now();
        let mut now_ms = 0u64;

        info!(
            kind = %self.controller.profile().kind,
            tick_ms,
            ?duration_ms,
            "Entering control loop"
        );

        while running.load(Ordering::SeqCst) {
            if duration_ms.is_some_and(|limit| now_ms >= limit) {
                break;
            }

            let cycle_start = Instant::now();
            before_tick(now_ms, &mut self.controller);
            self.tick(now_ms, sink);
            let elapsed = cycle_start.elapsed();

            let duration_ns = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
            self.stats.record(duration_ns);
            if elapsed > tick {
                self.stats.overruns += 1;
                debug!(duration_ns, tick_ms, "Tick overran its budget");
            }

            // Drift-free pacing against the loop origin.
            now_ms += u64::from(tick_ms);
            let target = origin + Duration::from_millis(now_ms);
            if let Some(remaining) = target.checked_duration_since(Instant::now()) {
                std::thread::sleep(remaining);
            }
        }

        info!(
            cycles = self.stats.cycle_count,
            avg_ns = self.stats.avg_cycle_ns(),
            max_ns = self.stats.max_cycle_ns,
            overruns = self.stats.overruns,
            task_overruns = self.scheduler.total_overruns(),
            "Control loop stopped"
        );
        Ok(())
    }
}

// ─── RT Setup ───────────────────────────────────────────────────────

/// Lock all current and future memory pages (prevent page faults in RT loop).
///
/// No-op when the `rt` feature is not enabled.
#[cfg(feature = "rt")]
fn rt_mlockall() -> Result<(), CycleError> {
    use nix::sys::mman::{MlockallFlags, mlockall};
    mlockall(MlockallFlags::MCL_CURRENT | MlockallFlags::MCL_FUTURE)
        .map_err(|e| CycleError::RtSetup(format!("mlockall failed: {e}")))
}

#[cfg(not(feature = "rt"))]
fn rt_mlockall() -> Result<(), CycleError> {
    Ok(())
}

/// Pin the current thread to a specific CPU core.
///
/// No-op when the `rt` feature is not enabled.
#[cfg(feature = "rt")]
fn rt_set_affinity(cpu: usize) -> Result<(), CycleError> {
    use nix::sched::{CpuSet, sched_setaffinity};
    use nix::unistd::Pid;

    let mut cpuset = CpuSet::new();
    cpuset
        .set(cpu)
        .map_err(|e| CycleError::RtSetup(format!("CpuSet::set({cpu}) failed: {e}")))?;
    sched_setaffinity(Pid::from_raw(0), &cpuset)
        .map_err(|e| CycleError::RtSetup(format!("sched_setaffinity failed: {e}")))
}

#[cfg(not(feature = "rt"))]
fn rt_set_affinity(_cpu: usize) -> Result<(), CycleError> {
    Ok(())
}

/// Set SCHED_FIFO with the given RT priority.
///
/// No-op when the `rt` feature is not enabled.
#[cfg(feature = "rt")]
fn rt_set_scheduler(priority: i32) -> Result<(), CycleError> {
    let param = libc::sched_param {
        sched_priority: priority,
    };
    // SAFETY: `param` is a valid, initialized sched_param for the duration of the call.
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(CycleError::RtSetup(format!(
            "sched_setscheduler(SCHED_FIFO, {priority}) failed: {err}"
        )));
    }
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_set_scheduler(_priority: i32) -> Result<(), CycleError> {
    Ok(())
}

/// Perform the RT setup sequence before entering the loop.
///
/// In simulation mode (no `rt` feature), all RT calls are no-ops.
pub fn rt_setup(cpu_core: usize, rt_priority: i32) -> Result<(), CycleError> {
    rt_mlockall()?;
    rt_set_affinity(cpu_core)?;
    rt_set_scheduler(rt_priority)?;
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────
