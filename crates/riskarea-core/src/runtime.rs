// crates/riskarea-core/src/runtime.rs

//! Blocking bridge for the async clients (sqlx, aws-sdk-s3).
//!
//! The pipeline is synchronous; the async collaborators run on one
//! process-wide current-thread runtime, created on first use.

use crate::error::Result;
use once_cell::sync::OnceCell;
use std::future::Future;
use tokio::runtime::{Builder, Runtime};

static RUNTIME: OnceCell<Runtime> = OnceCell::new();

pub(crate) fn shared() -> Result<&'static Runtime> {
    let runtime = RUNTIME.get_or_try_init(|| Builder::new_current_thread().enable_all().build())?;
    Ok(runtime)
}

/// Runs `future` to completion on the shared runtime, blocking the caller.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    Ok(shared()?.block_on(future))
}
