// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A fixed set of indexed workers.  Each parallel phase of a frame
//! hands the pool one row-major buffer; the pool cuts it into
//! contiguous bands of whole rows, gives band `i` to worker `i` on a
//! crossbeam scoped thread, and returns whatever each worker produced
//! in worker order.  Bands never overlap, so nothing needs a lock, and
//! the scope closing is the barrier at the end of the phase.

use crossbeam::thread::ScopedJoinHandle;
use log::trace;

use crate::errors::RenderError;

/// The slice of a buffer one worker owns for the length of a phase.
pub struct Band<'a, T> {
    /// Index of the worker, fixed when the pool was built.
    pub worker: usize,
    /// The row of the full buffer that `cells` starts on.
    pub first_row: usize,
    /// The cells of the rows this worker writes.
    pub cells: &'a mut [T],
}

/// A worker pool whose size is decided once and never changes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// A pool of exactly `workers` workers.
    pub fn new(workers: usize) -> Result<Self, RenderError> {
        if workers == 0 {
            return Err(RenderError::NoWorkers);
        }
        Ok(WorkerPool { workers })
    }

    /// A pool with one worker per logical CPU.
    pub fn sized_to_machine() -> Self {
        WorkerPool {
            workers: num_cpus::get().max(1),
        }
    }

    /// The number of workers in the pool.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// How many rows each band gets for a buffer of `rows` rows.  The
    /// last band may be short, and when there are fewer rows than
    /// workers the trailing workers get nothing.
    pub fn rows_per_band(&self, rows: usize) -> usize {
        ((rows + self.workers - 1) / self.workers).max(1)
    }

    /// Run `job` once per band of `cells`, where a row is `row_len`
    /// cells long.  The returned vector is indexed by worker.
    pub fn bands<T, R, F>(&self, cells: &mut [T], row_len: usize, job: F) -> Result<Vec<R>, RenderError>
    where
        T: Send,
        R: Send,
        F: Fn(Band<T>) -> R + Sync,
    {
        if row_len == 0 || cells.is_empty() {
            return Ok(vec![]);
        }

        let rows_per_band = self.rows_per_band(cells.len() / row_len);
        trace!("splitting {} cells into bands of {} rows", cells.len(), rows_per_band);
        let job = &job;

        crossbeam::scope(|spawner| {
            let handles: Vec<ScopedJoinHandle<R>> = cells
                .chunks_mut(rows_per_band * row_len)
                .enumerate()
                .map(|(worker, cells)| {
                    spawner.spawn(move |_| {
                        job(Band {
                            worker,
                            first_row: worker * rows_per_band,
                            cells,
                        })
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().map_err(|_| RenderError::WorkerPanicked))
                .collect::<Result<Vec<R>, RenderError>>()
        })
        .map_err(|_| RenderError::WorkerPanicked)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pool_is_refused() {
        assert_eq!(WorkerPool::new(0), Err(RenderError::NoWorkers));
    }

    #[test]
    fn machine_pool_has_workers() {
        assert!(WorkerPool::sized_to_machine().workers() >= 1);
    }

    #[test]
    fn rows_are_split_into_ceiling_bands() {
        let pool = WorkerPool::new(4).unwrap();
        assert_eq!(pool.rows_per_band(10), 3);
        assert_eq!(pool.rows_per_band(8), 2);
        assert_eq!(pool.rows_per_band(2), 1);
        assert_eq!(pool.rows_per_band(0), 1);
    }

    #[test]
    fn every_cell_is_visited_once_by_its_own_worker() {
        let pool = WorkerPool::new(3).unwrap();
        let mut cells = vec![0usize; 7 * 5];
        let seen = pool
            .bands(&mut cells, 5, |band| {
                for (i, cell) in band.cells.iter_mut().enumerate() {
                    *cell = (band.first_row * 5 + i) * 10 + band.worker;
                }
                band.worker
            })
            .unwrap();
        assert_eq!(seen, vec![0, 1, 2]);
        for (i, cell) in cells.iter().enumerate() {
            assert_eq!(cell / 10, i);
            assert_eq!(cell % 10, (i / 5) / 3);
        }
    }

    #[test]
    fn more_workers_than_rows_leaves_workers_idle() {
        let pool = WorkerPool::new(8).unwrap();
        let mut cells = vec![0u8; 2 * 4];
        let results = pool.bands(&mut cells, 4, |band| band.cells.len()).unwrap();
        assert_eq!(results, vec![4, 4]);
    }

    #[test]
    fn empty_buffer_runs_nothing() {
        let pool = WorkerPool::new(2).unwrap();
        let mut cells: Vec<u8> = vec![];
        let results = pool.bands(&mut cells, 4, |_| 1).unwrap();
        assert!(results.is_empty());
    }
}
