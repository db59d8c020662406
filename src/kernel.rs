// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The numeric kernel: Newton-Raphson iteration of f(z) = z^3 - 1.
//! Every sample point gets an iteration count, and the counts are the
//! picture.  Points near one of the three cube roots of unity settle
//! almost immediately; points on the basin boundaries churn for a
//! long time, and the iteration cap shows up as the brightest bands.

use num::Complex;

/// Iteration cap and convergence tolerance for the kernel, carried as
/// one value so every worker answers from the same rulebook.
#[derive(Copy, Clone, Debug)]
pub struct KernelParams {
    /// Hard upper bound on the iteration count.  A point that has not
    /// converged by then is reported with exactly this value.
    pub max_iterations: u32,
    /// Convergence tolerance, applied to |f(z)| rather than to the
    /// step size.
    pub epsilon: f64,
}

impl Default for KernelParams {
    fn default() -> KernelParams {
        KernelParams {
            max_iterations: 1_000,
            epsilon: 1e-6,
        }
    }
}

/// Runs Newton-Raphson from `start` and reports how many iterations
/// were needed before |f(z)| fell under the tolerance.  The test runs
/// before the step, so a point already on a root reports zero.
///
/// There is no special case for a vanishing derivative: f'(0) = 0
/// turns the step into an IEEE division by zero, the iterate becomes
/// non-finite, and the point rides the loop to the cap.  The count is
/// still meaningful (the point converges to no root) and the arithmetic
/// never faults, so the loop needs no guard.
pub fn convergence(start: Complex<f64>, params: &KernelParams) -> u32 {
    let mut z = start;
    for i in 0..params.max_iterations {
        let f = z * z * z - 1.0;
        if f.norm() < params.epsilon {
            return i;
        }
        let f_prime = z * z * 3.0;
        z = z - f / f_prime;
    }
    params.max_iterations
}
