pub mod connector;
mod model;
mod pool;
pub mod provider;

pub use model::{List, Pagination};
pub use pool::connection_manager;

use dsm_slo::errors::{self, WithBacktrace};

// Transient faults are surfaced separately so the host can retry;
// everything else is an internal error.
pub(crate) fn storage_err(err: sqlx::Error) -> WithBacktrace {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => errors::unavailable(&err),
        err => errors::any(err),
    }
}
