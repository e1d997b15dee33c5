#![cfg(unix)]

use std::error::Error;

use siteflow::exec::{run_tool, StepClass};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn successful_tool_completes_the_step() -> TestResult {
    run_tool("styles", "true", StepClass::Fatal).await?;
    Ok(())
}

#[tokio::test]
async fn fatal_tool_failure_propagates_the_exit_code() -> TestResult {
    let err = run_tool("scripts", "exit 3", StepClass::Fatal)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("exit code 3"), "{err}");
    Ok(())
}

#[tokio::test]
async fn lint_findings_are_reported_but_never_fatal() -> TestResult {
    // A linter exits non-zero when it has findings; the step still succeeds.
    run_tool("styles_lint", "echo 'a.scss:1 no-important'; exit 2", StepClass::Advisory).await?;
    Ok(())
}

#[tokio::test]
async fn tool_output_does_not_block_completion() -> TestResult {
    // Enough output to overflow an unconsumed OS pipe buffer.
    run_tool("assets", "yes x | head -n 100000", StepClass::Fatal).await?;
    Ok(())
}
