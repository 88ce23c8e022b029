//! Coordination between neighbouring relights.
//!
//! A chunk may only recompute its skylight while none of its six face
//! neighbours is doing the same, because each pass reads the neighbours'
//! boundary light. Every [`ChunkSlot`] carries a [`RelightBarrier`]: a flag
//! plus a condition variable that is signalled when the flag drops.
//!
//! Claiming the flag locks the barrier mutexes of the chunk and all of its
//! neighbours, always in slot address order, so two adjacent chunks can never
//! both see "nobody busy" and start together. If someone is busy the claimant
//! releases everything, sleeps on that chunk's condition variable and retries.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use web_time::{Duration, Instant};

use crate::engine_state::voxels::chunk::ChunkSlot;

/// Relight flag and completion signal of one chunk.
#[derive(Debug, Default)]
pub struct RelightBarrier {
    relighting: Mutex<bool>,
    finished: Condvar,
}

impl RelightBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_relighting(&self) -> bool {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.relighting.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self) {
        *self.lock() = false;
        self.finished.notify_all();
    }

    /// Blocks until the flag is clear or `deadline` passes. Returns true if clear.
    fn wait_until_idle(&self, deadline: Instant) -> bool {
        let guard = self.lock();
        let remaining = deadline.saturating_duration_since(Instant::now());
        let (guard, _) = self
            .finished
            .wait_timeout_while(guard, remaining, |relighting| *relighting)
            .unwrap_or_else(PoisonError::into_inner);
        !*guard
    }
}

/// Proof that a chunk's relight flag is held. Dropping it clears the flag and
/// wakes every thread waiting on this chunk.
#[must_use = "the relight flag is released as soon as the guard is dropped"]
pub struct RelightGuard {
    slot: Arc<ChunkSlot>,
}

impl RelightGuard {
    pub fn slot(&self) -> &Arc<ChunkSlot> {
        &self.slot
    }
}

impl Drop for RelightGuard {
    fn drop(&mut self) {
        self.slot.barrier.release();
    }
}

/// The chunk that was still relighting when the wait gave up.
pub struct RelightWaitTimeout {
    pub busy: Arc<ChunkSlot>,
}

/// Claims `target`'s relight flag once neither it nor any of `neighbours` is
/// relighting, waiting at most `timeout` in total.
pub fn acquire(
    target: &Arc<ChunkSlot>,
    neighbours: &[Arc<ChunkSlot>],
    timeout: Duration,
) -> Result<RelightGuard, RelightWaitTimeout> {
    let deadline = Instant::now() + timeout;

    let mut members: Vec<(bool, &Arc<ChunkSlot>)> = std::iter::once((true, target))
        .chain(neighbours.iter().map(|slot| (false, slot)))
        .collect();
    members.sort_by_key(|(_, slot)| Arc::as_ptr(slot) as usize);
    members.dedup_by(|later, earlier| {
        let same = Arc::ptr_eq(later.1, earlier.1);
        if same {
            earlier.0 |= later.0;
        }
        same
    });

    loop {
        let busy = {
            let mut guards: Vec<(bool, &Arc<ChunkSlot>, MutexGuard<'_, bool>)> = members
                .iter()
                .map(|&(is_target, slot)| (is_target, slot, slot.barrier.lock()))
                .collect();

            match guards.iter().position(|(_, _, relighting)| **relighting) {
                Some(index) => Arc::clone(guards[index].1),
                None => {
                    for (is_target, _, relighting) in guards.iter_mut() {
                        if *is_target {
                            **relighting = true;
                        }
                    }
                    return Ok(RelightGuard {
                        slot: Arc::clone(target),
                    });
                }
            }
        };

        if !busy.barrier.wait_until_idle(deadline) {
            return Err(RelightWaitTimeout { busy });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    use super::*;

    #[test]
    fn guard_sets_and_clears_the_flag() {
        let slot = Arc::new(ChunkSlot::unloaded());
        let guard = acquire(&slot, &[], Duration::from_millis(10)).ok().unwrap();
        assert!(slot.is_calculating_sky_light());

        drop(guard);
        assert!(!slot.is_calculating_sky_light());
    }

    #[test]
    fn neighbour_waits_for_running_relight() {
        let a = Arc::new(ChunkSlot::unloaded());
        let b = Arc::new(ChunkSlot::unloaded());
        let a_finished = Arc::new(AtomicBool::new(false));

        let guard_a = acquire(&a, &[b.clone()], Duration::from_secs(1)).ok().unwrap();

        let waiter = {
            let (a, b, a_finished) = (a.clone(), b.clone(), a_finished.clone());
            thread::spawn(move || {
                let _guard_b = acquire(&b, &[a], Duration::from_secs(5)).ok().unwrap();
                a_finished.load(Ordering::SeqCst)
            })
        };

        thread::sleep(Duration::from_millis(100));
        a_finished.store(true, Ordering::SeqCst);
        drop(guard_a);

        assert!(waiter.join().unwrap(), "b started before a finished");
    }

    #[test]
    fn wait_gives_up_after_timeout() {
        let a = Arc::new(ChunkSlot::unloaded());
        let b = Arc::new(ChunkSlot::unloaded());
        let _guard_a = acquire(&a, &[], Duration::from_millis(10)).ok().unwrap();

        let result = acquire(&b, &[a.clone()], Duration::from_millis(30));
        match result {
            Err(timeout) => assert!(Arc::ptr_eq(&timeout.busy, &a)),
            Ok(_) => panic!("acquired while a neighbour was relighting"),
        }
        assert!(!b.is_calculating_sky_light());
    }
}
