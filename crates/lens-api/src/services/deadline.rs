//! Time-bounded collaborator calls.

use std::future::Future;
use std::time::Duration;

use lens_inference::{InferenceError, InferenceResult};

use crate::metrics::observe_collaborator;

/// Run `call`, failing with [`InferenceError::Timeout`] once `deadline` passes.
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> InferenceResult<T>
where
    F: Future<Output = InferenceResult<T>>,
{
    tokio::time::timeout(deadline, call)
        .await
        .unwrap_or_else(|_| Err(InferenceError::Timeout(deadline)))
}

/// A deadline-bounded call, timed and counted under `collaborator`.
pub async fn bounded_call<T, F>(collaborator: &str, deadline: Duration, call: F) -> InferenceResult<T>
where
    F: Future<Output = InferenceResult<T>>,
{
    observe_collaborator(collaborator, with_deadline(deadline, call)).await
}
