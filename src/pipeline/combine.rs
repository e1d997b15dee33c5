// src/pipeline/combine.rs

//! Composition combinators over task futures.
//!
//! A task is an `async fn` returning `Result<()>`; composition operates on
//! boxed futures so groups of heterogeneous tasks can be built at runtime.
//!
//! Semantics:
//! - [`sequence`]: members run strictly in order, each must complete before
//!   the next starts; the first failure aborts the sequence without running
//!   the remaining members.
//! - [`parallel`]: all members start concurrently and the group completes
//!   only after every member has finished. The first failure is reported,
//!   but siblings are not cancelled and run to completion.

use std::future::Future;
use std::pin::Pin;

use anyhow::{anyhow, Result};

/// A boxed task future, ready for composition.
pub type StepFuture = Pin<Box<dyn Future<Output = Result<()>> + Send + 'static>>;

/// Box a task future for use in a composition group.
pub fn step<F>(fut: F) -> StepFuture
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    Box::pin(fut)
}

/// Run members strictly in order; abort on the first failure.
pub async fn sequence(steps: Vec<StepFuture>) -> Result<()> {
    for fut in steps {
        fut.await?;
    }
    Ok(())
}

/// Start all members concurrently; wait for every member, then report the
/// first failure if any occurred.
pub async fn parallel(steps: Vec<StepFuture>) -> Result<()> {
    let handles: Vec<_> = steps.into_iter().map(tokio::spawn).collect();

    let mut first_err = None;
    for handle in handles {
        let outcome = match handle.await {
            Ok(result) => result,
            Err(join_err) => Err(anyhow!("task panicked: {join_err}")),
        };
        if let Err(err) = outcome {
            if first_err.is_none() {
                first_err = Some(err);
            }
        }
    }

    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
