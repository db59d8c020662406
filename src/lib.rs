#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Newton convergence-map renderer
//!
//! Newton's method hunts for a root of a function by repeatedly
//! sliding along the tangent: z' = z - f(z)/f'(z).  Applied to
//! f(z) = z^3 - 1 over the complex plane, almost every starting
//! point eventually lands on one of the three cube roots of unity,
//! but the *number of steps* it takes varies enormously, and near
//! the boundaries between the three basins of attraction it is
//! exquisitely sensitive to where you start.  Painting every point
//! of a grid with its step count renders those boundaries as bright
//! filaments against the fast-converging interior.
//!
//! Every point is independent of every other, so the map is computed
//! by scattering grid rows over a pool of workers with a bag-of-tasks
//! protocol: each worker holds exactly one row at a time, and
//! whichever worker reports back first is handed the next unassigned
//! row.  Row costs are wildly uneven (a row that crosses a basin
//! boundary costs many times one that does not), and the bag absorbs
//! exactly that imbalance.  Each worker can additionally fan its rows
//! out across a small local thread pool, mirroring a
//! process-plus-threads deployment on a single machine.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;

#[cfg(test)]
extern crate rand;

pub mod error;
pub mod kernel;
pub mod master;
pub mod matrix;
pub mod messages;
pub mod output;
pub mod plane;
pub mod worker;

pub use error::Error;
pub use kernel::{convergence, KernelParams};
pub use master::render;
pub use matrix::ConvergenceMatrix;
pub use plane::Region;
