use std::error::Error;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use siteflow::pipeline::{parallel, sequence, step};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn sequence_runs_members_strictly_in_order() -> TestResult {
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    let mut steps = Vec::new();
    for i in 0..3 {
        let order = order.clone();
        steps.push(step(async move {
            order.lock().unwrap().push(i);
            Ok(())
        }));
    }

    sequence(steps).await?;
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    Ok(())
}

#[tokio::test]
async fn sequence_aborts_on_first_failure_without_running_later_members() -> TestResult {
    let later_ran = Arc::new(AtomicBool::new(false));

    let steps = vec![
        step(async { Ok(()) }),
        step(async { Err(anyhow!("boom")) }),
        step({
            let later_ran = later_ran.clone();
            async move {
                later_ran.store(true, Ordering::SeqCst);
                Ok(())
            }
        }),
    ];

    let result = sequence(steps).await;
    assert!(result.is_err());
    assert!(!later_ran.load(Ordering::SeqCst));
    Ok(())
}

#[tokio::test]
async fn parallel_completes_only_after_every_member_finished() -> TestResult {
    let done = Arc::new(AtomicUsize::new(0));

    let mut steps = Vec::new();
    for delay_ms in [0u64, 10, 50] {
        let done = done.clone();
        steps.push(step(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            done.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));
    }

    parallel(steps).await?;
    assert_eq!(done.load(Ordering::SeqCst), 3);
    Ok(())
}

#[tokio::test]
async fn parallel_failure_does_not_cancel_slower_siblings() -> TestResult {
    let slow_finished = Arc::new(AtomicBool::new(false));

    let steps = vec![
        step(async { Err(anyhow!("fast failure")) }),
        step({
            let slow_finished = slow_finished.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                slow_finished.store(true, Ordering::SeqCst);
                Ok(())
            }
        }),
    ];

    let result = parallel(steps).await;
    assert!(result.is_err());
    assert_eq!(result.unwrap_err().to_string(), "fast failure");
    // The group only returns once the slow member has finished its work.
    assert!(slow_finished.load(Ordering::SeqCst));
    Ok(())
}

#[tokio::test]
async fn parallel_reports_the_first_failure_in_member_order() -> TestResult {
    let steps = vec![
        step(async { Err(anyhow!("first")) }),
        step(async { Err(anyhow!("second")) }),
    ];

    let err = parallel(steps).await.unwrap_err();
    assert_eq!(err.to_string(), "first");
    Ok(())
}
