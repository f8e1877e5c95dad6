use std::collections::VecDeque;
use std::time::Duration;

use bevy::prelude::*;
use thiserror::Error;

use crate::game::command::UnitTypeId;

pub const DEFAULT_QUEUE_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnqueueError {
    #[error("build queue is full ({capacity} orders)")]
    QueueFull { capacity: usize },

    #[error("build queue was cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Order {
    unit: UnitTypeId,
    build_time: Duration,
}

/// Production orders of one building.
///
/// Only the head order's timer runs. When it fires, exactly one unit comes
/// out and the next order starts. Once cancelled (owner despawned) the queue
/// never produces again.
#[derive(Debug, Clone)]
pub struct BuildQueue {
    orders: VecDeque<Order>,
    capacity: usize,
    timer: Option<Timer>,
    cancelled: bool,
}

impl BuildQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            orders: VecDeque::with_capacity(capacity.min(DEFAULT_QUEUE_CAPACITY)),
            capacity,
            timer: None,
            cancelled: false,
        }
    }

    /// Append an order. Returns the queue length on success; a full queue is
    /// left untouched.
    pub fn enqueue(&mut self, unit: UnitTypeId, build_time: Duration) -> Result<usize, EnqueueError> {
        if self.cancelled {
            return Err(EnqueueError::Cancelled);
        }
        if self.orders.len() >= self.capacity {
            return Err(EnqueueError::QueueFull { capacity: self.capacity });
        }

        self.orders.push_back(Order { unit, build_time });
        if self.orders.len() == 1 {
            self.timer = Some(Timer::new(build_time, TimerMode::Once));
        }
        Ok(self.orders.len())
    }

    /// Advance the head order. At most one unit is produced per call; time
    /// past the finishing point carries into the next order.
    pub fn tick(&mut self, delta: Duration) -> Option<UnitTypeId> {
        if self.cancelled {
            return None;
        }
        let timer = self.timer.as_mut()?;

        let remaining = timer.remaining();
        timer.tick(delta);
        if !timer.just_finished() {
            return None;
        }

        let finished = self.orders.pop_front()?;
        let overshoot = delta.saturating_sub(remaining);

        self.timer = self.orders.front().map(|next| {
            let mut timer = Timer::new(next.build_time, TimerMode::Once);
            timer.set_elapsed(overshoot.min(next.build_time));
            timer
        });

        Some(finished.unit)
    }

    /// Drop every pending order and refuse new ones. Returns how many orders
    /// were dropped.
    pub fn cancel(&mut self) -> usize {
        let dropped = self.orders.len();
        self.orders.clear();
        self.timer = None;
        self.cancelled = true;
        dropped
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn head(&self) -> Option<UnitTypeId> {
        self.orders.front().map(|o| o.unit)
    }

    pub fn pending(&self) -> impl Iterator<Item = UnitTypeId> + '_ {
        self.orders.iter().map(|o| o.unit)
    }

    /// Completion of the head order in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.timer.as_ref().map_or(0.0, |t| t.fraction())
    }
}
