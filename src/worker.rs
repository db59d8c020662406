//! The row worker.  Each worker blocks on its private task channel,
//! computes whatever row it is handed, sends the counts back on the
//! shared result channel, and goes back to blocking.  It never asks
//! for work and never decides when to stop; both are the
//! coordinator's call.

extern crate crossbeam;

use std::sync::{Arc, Mutex};

use crossbeam::channel::{Receiver, Sender};
use num::Complex;

use kernel::{convergence, KernelParams};
use messages::{RowResult, ToWorker};
use plane::Region;

/// The worker's receive loop.  Runs until a `Terminate` order
/// arrives, or until the task channel closes, which a worker that was
/// never handed a row treats the same way.  With `threads` above one,
/// each row is fanned out across that many local threads.
pub fn run(
    id: usize,
    region: &Region,
    params: &KernelParams,
    tasks: Receiver<ToWorker>,
    results: Sender<RowResult>,
    threads: usize,
) {
    loop {
        match tasks.recv() {
            Ok(ToWorker::Work { row }) => {
                let counts = if threads > 1 {
                    compute_row_pooled(region, params, row, threads)
                } else {
                    compute_row(region, params, row)
                };
                let reply = RowResult {
                    worker: id,
                    row,
                    counts,
                };
                if results.send(reply).is_err() {
                    break;
                }
            }
            Ok(ToWorker::Terminate) | Err(_) => break,
        }
    }
    debug!("worker {} stopped", id);
}

/// Computes every column of one row on the calling thread.
pub fn compute_row(region: &Region, params: &KernelParams, row: usize) -> Vec<u32> {
    let im = region.im_at(row);
    (0..region.width)
        .map(|x| convergence(Complex::new(region.re_at(x), im), params))
        .collect()
}

/// Computes one row with a pool of `threads` local threads.  The
/// columns sit behind a mutex-wrapped iterator; each thread locks it,
/// pulls the next unclaimed column, and computes it, so a column that
/// runs to the iteration cap never stalls more than one thread.
pub fn compute_row_pooled(
    region: &Region,
    params: &KernelParams,
    row: usize,
    threads: usize,
) -> Vec<u32> {
    let im = region.im_at(row);
    let mut counts = vec![0u32; region.width];
    {
        let columns = Arc::new(Mutex::new(counts.iter_mut().enumerate()));
        crossbeam::scope(|spawner| {
            for _ in 0..threads {
                let columns = columns.clone();
                spawner.spawn(move |_| loop {
                    let column = { columns.lock().unwrap().next() };
                    match column {
                        Some((x, slot)) => {
                            *slot = convergence(Complex::new(region.re_at(x), im), params);
                        }
                        None => break,
                    }
                });
            }
        })
        .unwrap();
    }
    counts
}
