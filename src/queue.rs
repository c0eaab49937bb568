use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use crate::dates::DateUnit;
use crate::{Error, Result};

/// A date checked out of the queue. `attempt` starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    pub unit: DateUnit,
    pub attempt: u32,
}

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<Job>,
    in_flight: HashMap<DateUnit, usize>,
    in_flight_total: usize,
}

impl QueueState {
    fn is_drained(&self) -> bool {
        self.pending.is_empty() && self.in_flight_total == 0
    }

    /// Removes one checkout of `unit`. Must happen under the same lock as whatever
    /// the unit moves to next, so it's never uncounted.
    fn check_in(&mut self, unit: DateUnit) -> Result<()> {
        let count = self
            .in_flight
            .get_mut(&unit)
            .ok_or(Error::NotCheckedOut(unit))?;
        *count -= 1;
        if *count == 0 {
            self.in_flight.remove(&unit);
        }
        self.in_flight_total -= 1;
        Ok(())
    }
}

/// Backlog of dates still to fetch plus the dates workers are holding.
///
/// A unit is outstanding from `seed` until `complete`. Between `take` and
/// `complete`/`requeue` it is counted in flight, so [`WorkQueue::join_until_drained`]
/// can't return while any worker still holds one.
#[derive(Debug, Default)]
pub struct WorkQueue {
    state: Mutex<QueueState>,
    changed: Notify,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn seed(&self, units: impl IntoIterator<Item = DateUnit>) {
        {
            let mut state = self.lock();
            state
                .pending
                .extend(units.into_iter().map(|unit| Job { unit, attempt: 1 }));
        }
        self.changed.notify_waiters();
    }

    /// Waits for the next pending date.
    /// Returns `None` once nothing is pending or in flight, that's the signal to stop.
    pub async fn take(&self) -> Option<Job> {
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            // Register before looking at the state so a wakeup in between isn't lost.
            notified.as_mut().enable();
            {
                let mut state = self.lock();
                if let Some(job) = state.pending.pop_front() {
                    *state.in_flight.entry(job.unit).or_default() += 1;
                    state.in_flight_total += 1;
                    return Some(job);
                }
                if state.in_flight_total == 0 {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Marks a taken date as durably done.
    pub fn complete(&self, job: &Job) -> Result<()> {
        let drained = {
            let mut state = self.lock();
            state.check_in(job.unit)?;
            state.is_drained()
        };
        if drained {
            self.changed.notify_waiters();
        }
        Ok(())
    }

    /// Puts a taken date back for another attempt.
    pub fn requeue(&self, job: Job) -> Result<()> {
        {
            let mut state = self.lock();
            state.check_in(job.unit)?;
            state.pending.push_back(Job {
                unit: job.unit,
                attempt: job.attempt.saturating_add(1),
            });
        }
        self.changed.notify_waiters();
        Ok(())
    }

    /// Resolves once every seeded date has been completed.
    pub async fn join_until_drained(&self) {
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.lock().is_drained() {
                return;
            }
            notified.await;
        }
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.lock().in_flight_total
    }
}
