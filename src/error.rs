//! The crate's error taxonomy.  Configuration problems are caught
//! before any worker is spawned; output problems are only possible
//! after the computation has already finished, at which point the
//! computed map is lost.  Numeric non-convergence is *not* an error:
//! it surfaces as the iteration cap in the finished map.

use std::io;

/// Everything that can go wrong outside the numeric kernel.
#[derive(Debug, Fail)]
pub enum Error {
    /// A region, worker count, or thread count that cannot describe a
    /// runnable computation.  Rejected before any work is dispatched.
    #[fail(display = "configuration error: {}", _0)]
    Config(String),

    /// The output artifact could not be created or written.
    #[fail(display = "output error: {}", _0)]
    Output(#[cause] io::Error),

    /// A saved map file did not parse back as one.
    #[fail(display = "malformed map file: {}", _0)]
    Malformed(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Output(err)
    }
}
