// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The coordinator.  It owns the one and only result matrix and runs
//! the bag-of-tasks protocol over it: seed every worker with one row,
//! then hand the next unassigned row to whichever worker reports back
//! first, until the bag is empty and every seeded worker has been
//! released.  Slow rows therefore never hold up the rest of the pool;
//! a worker stuck on an expensive row simply stops being offered new
//! ones.

extern crate crossbeam;

use std::time::{Duration, Instant};

use crossbeam::channel::{unbounded, Receiver, Sender};

use error::Error;
use kernel::KernelParams;
use matrix::ConvergenceMatrix;
use messages::{RowResult, ToWorker};
use plane::Region;
use worker;

/// The coordinator's grip on one worker: the sending half of that
/// worker's private task channel, tagged with the worker's id.  Ids
/// double as positions in the link table, which is what lets a result
/// be answered straight back to whoever sent it.
pub struct WorkerLink {
    id: usize,
    tasks: Sender<ToWorker>,
}

impl WorkerLink {
    /// Wraps the sending half of a worker's task channel.
    pub fn new(id: usize, tasks: Sender<ToWorker>) -> WorkerLink {
        WorkerLink { id, tasks }
    }

    fn dispatch(&self, row: usize) {
        debug!("worker {}: row {}", self.id, row);
        self.tasks
            .send(ToWorker::Work { row })
            .expect("worker hung up before its row was dispatched");
    }

    fn release(&self) {
        debug!("worker {}: released", self.id);
        self.tasks
            .send(ToWorker::Terminate)
            .expect("worker hung up before it was released");
    }
}

/// Drives the row protocol to completion against an already-wired
/// pool.  Rows are dispatched in increasing order, each exactly once:
/// the first `min(workers, height)` workers get one seed row apiece,
/// and every result that comes back either earns its sender the next
/// row or, once the bag is empty, a terminate order.  The loop ends
/// when the last outstanding row has been received and acknowledged,
/// never before.
///
/// Links beyond the row count are dropped before anything is
/// dispatched; the workers behind them see their channel close and
/// exit without ever being spoken to.
pub fn run(matrix: &mut ConvergenceMatrix, mut links: Vec<WorkerLink>, results: &Receiver<RowResult>) {
    let height = matrix.height();
    links.truncate(height);

    let mut next_row = 0;
    let mut active = 0;
    for link in &links {
        link.dispatch(next_row);
        next_row += 1;
        active += 1;
    }
    info!("seeded {} workers, {} rows to go", active, height);

    while active > 0 {
        let result = results
            .recv()
            .expect("a worker disconnected with rows still outstanding");
        matrix.write_row(result.row, &result.counts);
        let link = &links[result.worker];
        if next_row < height {
            link.dispatch(next_row);
            next_row += 1;
        } else {
            link.release();
            active -= 1;
        }
    }
}

/// Computes the full convergence map for a region: spawns `workers`
/// row workers (each fanning its rows across `threads` local threads
/// when that is above one), wires them to a fresh coordinator, and
/// runs the protocol on the calling thread.  Returns the finished
/// matrix together with the wall-clock time of the distributed phase,
/// measured from the first dispatch to the last receive.
pub fn render(
    region: &Region,
    params: &KernelParams,
    workers: usize,
    threads: usize,
) -> Result<(ConvergenceMatrix, Duration), Error> {
    if workers == 0 {
        return Err(Error::Config(
            "the worker count must be greater than zero".to_string(),
        ));
    }
    if threads == 0 {
        return Err(Error::Config(
            "the per-worker thread count must be greater than zero".to_string(),
        ));
    }

    info!(
        "rendering {}x{} across {} workers with {} threads each",
        region.width, region.height, workers, threads
    );

    let done = crossbeam::scope(|spawner| {
        let (result_tx, result_rx) = unbounded();
        let links: Vec<WorkerLink> = (0..workers)
            .map(|id| {
                let (task_tx, task_rx) = unbounded();
                let results = result_tx.clone();
                spawner.spawn(move |_| worker::run(id, region, params, task_rx, results, threads));
                WorkerLink::new(id, task_tx)
            })
            .collect();
        drop(result_tx);

        let mut matrix = ConvergenceMatrix::new(region.width, region.height);
        let start = Instant::now();
        run(&mut matrix, links, &result_rx);
        (matrix, start.elapsed())
    });

    let (matrix, elapsed) = done.unwrap();
    Ok((matrix, elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use kernel::convergence;

    fn synthetic_counts(row: usize, width: usize) -> Vec<u32> {
        (0..width).map(|x| (row * 1_000 + x) as u32).collect()
    }

    struct Outcome {
        matrix: ConvergenceMatrix,
        work_per_worker: Vec<usize>,
        terminations: Vec<usize>,
        dispatch_order: Vec<usize>,
    }

    /// Plays the entire worker pool by hand.  Every work order is
    /// answered with a synthetic row, and `choose` picks which of the
    /// workers currently holding an order replies next, so a test can
    /// impose any completion schedule it likes and watch what the
    /// coordinator does under it.
    fn drive<F>(width: usize, height: usize, workers: usize, mut choose: F) -> Outcome
    where
        F: FnMut(&[usize]) -> usize,
    {
        let (result_tx, result_rx) = unbounded();
        let mut links = Vec::new();
        let mut task_rxs = Vec::new();
        for id in 0..workers {
            let (task_tx, task_rx) = unbounded();
            links.push(WorkerLink::new(id, task_tx));
            task_rxs.push(task_rx);
        }

        let mut work_per_worker = vec![0usize; workers];
        let mut terminations = vec![0usize; workers];
        let mut dispatch_order = Vec::new();
        let mut pending: Vec<Option<usize>> = vec![None; workers];

        let matrix = crossbeam::scope(|spawner| {
            let coordinator = spawner.spawn(move |_| {
                let mut matrix = ConvergenceMatrix::new(width, height);
                run(&mut matrix, links, &result_rx);
                matrix
            });

            let seeded = workers.min(height);
            for id in 0..seeded {
                match task_rxs[id].recv().unwrap() {
                    ToWorker::Work { row } => {
                        pending[id] = Some(row);
                        work_per_worker[id] += 1;
                        dispatch_order.push(row);
                    }
                    ToWorker::Terminate => panic!("worker {} released before any work", id),
                }
            }
            // the rest never hear anything; their channels just close
            for rx in &task_rxs[seeded..] {
                assert!(rx.recv().is_err());
            }

            let mut busy: Vec<usize> = (0..seeded).collect();
            while !busy.is_empty() {
                let pick = choose(&busy);
                let id = busy[pick];
                let row = pending[id].take().unwrap();
                result_tx
                    .send(RowResult {
                        worker: id,
                        row,
                        counts: synthetic_counts(row, width),
                    })
                    .unwrap();
                match task_rxs[id].recv().unwrap() {
                    ToWorker::Work { row } => {
                        pending[id] = Some(row);
                        work_per_worker[id] += 1;
                        dispatch_order.push(row);
                    }
                    ToWorker::Terminate => {
                        terminations[id] += 1;
                        busy.swap_remove(pick);
                    }
                }
            }

            coordinator.join().unwrap()
        })
        .unwrap();

        Outcome {
            matrix,
            work_per_worker,
            terminations,
            dispatch_order,
        }
    }

    #[test]
    fn every_row_is_dispatched_exactly_once_in_order() {
        for &(workers, height) in &[(1, 5), (3, 8), (4, 4), (6, 2)] {
            let outcome = drive(3, height, workers, |_| 0);
            assert_eq!(outcome.dispatch_order, (0..height).collect::<Vec<_>>());
            assert_eq!(outcome.work_per_worker.iter().sum::<usize>(), height);
        }
    }

    #[test]
    fn exactly_the_seeded_workers_are_released() {
        for &(workers, height) in &[(1, 5), (3, 8), (4, 4), (6, 2)] {
            let outcome = drive(3, height, workers, |_| 0);
            let seeded = workers.min(height);
            for id in 0..workers {
                let expected = if id < seeded { 1 } else { 0 };
                assert_eq!(outcome.terminations[id], expected, "worker {}", id);
            }
        }
    }

    #[test]
    fn results_land_in_their_own_rows() {
        let outcome = drive(4, 6, 2, |_| 0);
        for row in 0..6 {
            assert_eq!(outcome.matrix.row(row), &synthetic_counts(row, 4)[..]);
        }
    }

    #[test]
    fn reply_order_never_changes_the_matrix() {
        let eager = drive(4, 9, 3, |_| 0);
        let laggard = drive(4, 9, 3, |busy| busy.len() - 1);
        let mut rng = StdRng::seed_from_u64(0x00c0_ffee);
        let shuffled = drive(4, 9, 3, |busy| rng.gen_range(0, busy.len()));
        assert_eq!(eager.matrix, laggard.matrix);
        assert_eq!(eager.matrix, shuffled.matrix);
    }

    #[test]
    fn render_matches_the_kernel_pointwise() {
        let region = Region::new(-0.05, 0.05, -0.05, 0.05, 4, 2).unwrap();
        let params = KernelParams::default();
        let (matrix, _) = render(&region, &params, 2, 1).unwrap();
        assert_eq!(matrix.width(), 4);
        assert_eq!(matrix.height(), 2);

        // row 0 really does sit on im = -0.05, its columns a third of
        // the window apart
        assert_eq!(region.im_at(0), -0.05);
        assert_eq!(region.re_at(0), -0.05);
        assert!((region.re_at(1) - (-0.05 + 0.1 / 3.0)).abs() < 1e-15);
        assert!((region.re_at(2) - (-0.05 + 0.2 / 3.0)).abs() < 1e-15);
        assert!((region.re_at(3) - 0.05).abs() < 1e-15);

        for y in 0..2 {
            for x in 0..4 {
                assert_eq!(matrix.cell(x, y), convergence(region.point(x, y), &params));
            }
        }
    }

    #[test]
    fn render_is_invariant_across_pool_shapes() {
        let region = Region::new(-0.05, 0.05, -0.05, 0.05, 6, 3).unwrap();
        let params = KernelParams::default();
        let (reference, _) = render(&region, &params, 1, 1).unwrap();
        for &(workers, threads) in &[(2, 1), (3, 2), (7, 1), (2, 4)] {
            let (matrix, _) = render(&region, &params, workers, threads).unwrap();
            assert_eq!(matrix, reference, "{} workers x {} threads", workers, threads);
        }
    }

    #[test]
    fn render_pins_the_center_of_an_odd_grid_to_the_cap() {
        // A symmetric odd grid samples the origin, where the
        // derivative vanishes and the kernel rides to its cap.
        let region = Region::new(-0.05, 0.05, -0.05, 0.05, 5, 5).unwrap();
        let params = KernelParams::default();
        let (matrix, _) = render(&region, &params, 2, 2).unwrap();
        assert_eq!(matrix.cell(2, 2), params.max_iterations);
    }

    #[test]
    fn render_rejects_an_empty_pool() {
        let region = Region::base(1).unwrap();
        let params = KernelParams::default();
        match render(&region, &params, 0, 1) {
            Err(Error::Config(_)) => (),
            other => panic!("expected a configuration error, got {:?}", other),
        }
        match render(&region, &params, 4, 0) {
            Err(Error::Config(_)) => (),
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }
}
