//! Fixed worker pool for similarity computation.
//!
//! One pool lives for a single clustering run. The round driver is the only
//! producer: it pushes [`Task`]s into a bounded queue (blocking when the queue is
//! full) and then crosses [`Dispatcher::barrier`], which waits for one
//! acknowledgement per dispatched task. Workers only ever read the vector array and
//! write the single output slot named by their task.
//!
//! Slots are `AtomicU64`s holding `f64` bits, so a worker writes its slot without a
//! lock. Correctness relies on two things the caller guarantees: no two in-flight
//! tasks name the same slot, and the driver does not touch a slot with an in-flight
//! task until the next barrier. The ack channel publishes the slot writes to the
//! driver.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};

use parking_lot::{Mutex, RwLock};

use crate::vector::SparseVector;

/// Compute the similarity of vectors `a` and `b` into `slot`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Task {
    pub(crate) slot: usize,
    pub(crate) a: usize,
    pub(crate) b: usize,
}

/// Similarity output slots.
pub(crate) struct Slots(Vec<AtomicU64>);

impl Slots {
    pub(crate) fn new(len: usize) -> Self {
        Self((0..len).map(|_| AtomicU64::new(0)).collect())
    }

    #[inline]
    pub(crate) fn get(&self, slot: usize) -> f64 {
        f64::from_bits(self.0[slot].load(Ordering::Relaxed))
    }

    #[inline]
    pub(crate) fn set(&self, slot: usize, value: f64) {
        self.0[slot].store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Worker count used when none is configured.
pub(crate) fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Driver-side handle on a running pool.
pub(crate) struct Dispatcher {
    queue: SyncSender<Task>,
    acks: Receiver<()>,
    pending: usize,
}

impl Dispatcher {
    /// Queue a task, blocking while the queue is full.
    pub(crate) fn dispatch(&mut self, task: Task) {
        // Send only fails once every worker is gone; the scope join re-raises
        // the worker panic that caused it.
        if self.queue.send(task).is_ok() {
            self.pending += 1;
        }
    }

    /// Block until every dispatched task has been acknowledged.
    pub(crate) fn barrier(&mut self) {
        while self.pending > 0 {
            if self.acks.recv().is_err() {
                break;
            }
            self.pending -= 1;
        }
        self.pending = 0;
    }
}

/// Spawn `workers` threads over `vectors` and `slots`, run `driver`, then shut the
/// pool down.
///
/// The queue holds at most `capacity` pending tasks. Both `workers` and
/// `capacity` must be at least 1.
pub(crate) fn with_pool<R, F>(
    workers: usize,
    capacity: usize,
    vectors: &RwLock<&mut [SparseVector]>,
    slots: &Slots,
    driver: F,
) -> R
where
    F: FnOnce(&mut Dispatcher) -> R,
{
    debug_assert!(workers > 0 && capacity > 0);

    let (queue_tx, queue_rx) = mpsc::sync_channel::<Task>(capacity);
    let (ack_tx, ack_rx) = mpsc::channel::<()>();
    let queue_rx = Mutex::new(queue_rx);

    std::thread::scope(|s| {
        for _ in 0..workers {
            let ack_tx = ack_tx.clone();
            let queue_rx = &queue_rx;
            s.spawn(move || work(queue_rx, ack_tx, vectors, slots));
        }
        drop(ack_tx);

        let mut dispatcher = Dispatcher {
            queue: queue_tx,
            acks: ack_rx,
            pending: 0,
        };
        let out = driver(&mut dispatcher);
        dispatcher.barrier();
        // Dropping the sender closes the queue and lets the workers exit.
        drop(dispatcher);
        out
    })
}

fn work(
    queue: &Mutex<Receiver<Task>>,
    acks: Sender<()>,
    vectors: &RwLock<&mut [SparseVector]>,
    slots: &Slots,
) {
    loop {
        let next = queue.lock().recv();
        let Ok(task) = next else { break };

        let sim = {
            let vectors = vectors.read();
            vectors[task.a].similarity(&vectors[task.b])
        };
        slots.set(task.slot, sim);

        if acks.send(()).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::build_vector;

    #[test]
    fn barrier_waits_for_all_tasks() {
        let mut data = vec![
            build_vector(["a", "b"]),
            build_vector(["a", "b"]),
            build_vector(["c"]),
        ];
        let vectors = RwLock::new(&mut data[..]);
        let slots = Slots::new(3);
        let pairs = [(0, 1), (0, 2), (1, 2)];

        with_pool(2, 1, &vectors, &slots, |pool| {
            for (slot, &(a, b)) in pairs.iter().enumerate() {
                pool.dispatch(Task { slot, a, b });
            }
            pool.barrier();
        });

        assert!((slots.get(0) - 1.0).abs() < 1e-12);
        assert_eq!(slots.get(1), 0.0);
        assert_eq!(slots.get(2), 0.0);
    }

    #[test]
    fn driver_may_mutate_between_barriers() {
        let mut data = vec![build_vector(["a"]), build_vector(["b"])];
        let vectors = RwLock::new(&mut data[..]);
        let slots = Slots::new(1);

        let before = with_pool(1, 1, &vectors, &slots, |pool| {
            pool.dispatch(Task { slot: 0, a: 0, b: 1 });
            pool.barrier();
            let before = slots.get(0);

            vectors.write()[0].increment("b", 1);
            vectors.write()[0].renorm();

            pool.dispatch(Task { slot: 0, a: 0, b: 1 });
            pool.barrier();
            before
        });

        assert_eq!(before, 0.0);
        assert!(slots.get(0) > 0.0);
    }

    #[test]
    fn many_tasks_through_small_queue() {
        let mut data: Vec<SparseVector> = (0..20)
            .map(|i| build_vector([format!("t{}", i % 4)]))
            .collect();
        let n = data.len();
        let vectors = RwLock::new(&mut data[..]);
        let slots = Slots::new(n * n);

        with_pool(4, 2, &vectors, &slots, |pool| {
            for a in 0..n {
                for b in 0..n {
                    pool.dispatch(Task { slot: a * n + b, a, b });
                }
            }
        });

        for a in 0..n {
            for b in 0..n {
                let expected = if a % 4 == b % 4 { 1.0 } else { 0.0 };
                assert!((slots.get(a * n + b) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn default_workers_is_positive() {
        assert!(default_workers() >= 1);
    }
}
