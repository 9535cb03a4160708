//! Generational timer arena on a virtual millisecond clock.
//!
//! # Invariants
//! - A handle is valid until its timer fires or is cancelled; after that the
//!   slot generation moves on and the handle no longer matches anything.
//! - Due timers pop in `(due, schedule order)` order.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Virtual clock value in milliseconds since engine start.
pub type Tick = u64;

/// Handle to one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    pending: Option<(Tick, T)>,
}

#[derive(Debug)]
pub struct TimerArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    // (due, seq, index, generation); stale entries are skipped lazily.
    queue: BinaryHeap<Reverse<(Tick, u64, u32, u32)>>,
    next_seq: u64,
    pending: usize,
}

impl<T> Default for TimerArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            queue: BinaryHeap::new(),
            next_seq: 0,
            pending: 0,
        }
    }

    /// Schedules `payload` to fire at `due`.
    pub fn schedule(&mut self, due: Tick, payload: T) -> TimerHandle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    pending: None,
                });
                // Slot count is bounded by concurrently pending timers.
                (self.slots.len() - 1) as u32
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.pending = Some((due, payload));
        let handle = TimerHandle {
            index,
            generation: slot.generation,
        };

        self.queue
            .push(Reverse((due, self.next_seq, index, handle.generation)));
        self.next_seq += 1;
        self.pending += 1;
        handle
    }

    /// Cancels a pending timer, returning its payload.
    ///
    /// Returns `None` for handles that already fired or were cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let (_, payload) = slot.pending.take()?;
        self.release(handle.index);
        Some(payload)
    }

    /// Due time of a pending timer.
    pub fn due(&self, handle: TimerHandle) -> Option<Tick> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.pending.as_ref().map(|(due, _)| *due)
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|slot| slot.generation == handle.generation && slot.pending.is_some())
    }

    /// Number of timers still waiting to fire.
    pub fn len(&self) -> usize {
        self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }

    /// Earliest due time among live timers.
    pub fn next_due(&mut self) -> Option<Tick> {
        self.drop_stale_head();
        self.queue.peek().map(|Reverse((due, ..))| *due)
    }

    /// Removes and returns the earliest live timer due at or before `now`.
    pub fn pop_due(&mut self, now: Tick) -> Option<(TimerHandle, Tick, T)> {
        self.drop_stale_head();
        let Reverse((due, _, index, generation)) = *self.queue.peek()?;
        if due > now {
            return None;
        }
        self.queue.pop();

        let slot = &mut self.slots[index as usize];
        let (due, payload) = slot.pending.take()?;
        self.release(index);
        Some((TimerHandle { index, generation }, due, payload))
    }

    fn release(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.pending -= 1;
    }

    fn drop_stale_head(&mut self) {
        while let Some(Reverse((_, _, index, generation))) = self.queue.peek().copied() {
            let slot = &self.slots[index as usize];
            if slot.generation == generation && slot.pending.is_some() {
                return;
            }
            self.queue.pop();
        }
    }
}
