// tests/pipeline_sequential.rs

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::bail;
use dagpipe::errors::DagpipeError;
use dagpipe::pipeline::{Task, TaskPipelineBuilder, TaskRunState};
use dagpipe_test_utils::init_tracing;
use dagpipe_test_utils::sink::Sink;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn test_runs_in_dependency_order() -> TestResult {
    init_tracing();
    let sink = Sink::new();
    let (a, b, c, d) = (sink.task("A"), sink.task("B"), sink.task("C"), sink.task("D"));

    let mut builder = TaskPipelineBuilder::new();
    builder.task(&d).add();
    builder.task(&c).add_dependency(&b).add_dependent(&d).add();
    builder.task(&a).add_dependent(&b).add_dependent(&d).add();

    let pipeline = builder.create()?;
    assert!(!pipeline.is_parallel());
    pipeline.call()?;

    assert_eq!(sink.contents(), "ABCD");
    Ok(())
}

#[test]
fn test_failure_cancels_descendants_only() -> TestResult {
    init_tracing();
    let sink = Sink::new();
    let a = sink.task("A");
    let c = sink.task("C");
    let d = sink.task("D");
    let throw = sink.failing_task("THROW_1");

    let mut builder = TaskPipelineBuilder::new();
    builder.task(&throw).add_dependency(&d).add_dependent(&a).add();
    builder.task(&c).add_dependent(&throw).add();

    let pipeline = builder.create()?;
    let err = pipeline.call().expect_err("THROW_1 should fail the run");

    assert_eq!(err.to_string(), "THROW_1 failed");
    assert_eq!(sink.contents(), "DC");

    let report = pipeline.execute();
    assert_eq!(report.state_of(&a), Some(TaskRunState::Cancelled));
    assert_eq!(report.state_of(&throw), Some(TaskRunState::DoneFailed));
    assert_eq!(report.completed(), vec![&d, &c]);
    assert_eq!(report.cancelled(), vec![&a]);
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].task, throw);
    Ok(())
}

#[test]
fn test_task_error_is_returned_unchanged() -> TestResult {
    #[derive(Debug, thiserror::Error)]
    #[error("disk full on {0}")]
    struct DiskFull(&'static str);

    let task = Task::new("write", || Err(DiskFull("/dev/sda").into()));
    let mut builder = TaskPipelineBuilder::new();
    builder.task(&task).add();

    let err = builder.create()?.call().expect_err("task fails");
    let disk_full = err.downcast_ref::<DiskFull>().expect("original error type survives");
    assert_eq!(disk_full.0, "/dev/sda");
    assert!(err.downcast_ref::<DagpipeError>().is_none());
    Ok(())
}

#[test]
fn test_independent_branches_keep_running_after_failure() -> TestResult {
    let sink = Sink::new();
    let bad = sink.failing_task("X");
    let bad_child = sink.task("Y");
    let good = sink.task("G");
    let good_child = sink.task("H");
    let join = sink.task("J");

    let mut builder = TaskPipelineBuilder::new();
    builder.task(&bad).add_dependent(&bad_child).add();
    builder.task(&good).add_dependent(&good_child).add();
    builder.task(&join).add_dependencies([&bad_child, &good_child]).add();

    let report = builder.create()?.execute();

    assert_eq!(sink.sorted(), "GH");
    assert_eq!(report.cancelled(), vec![&bad_child, &join]);
    assert!(!report.is_success());
    assert_eq!(report.into_result().unwrap_err().to_string(), "X failed");
    Ok(())
}

#[test]
fn test_first_failure_is_reported() -> TestResult {
    let sink = Sink::new();
    let first = sink.failing_task("first");
    let second = sink.failing_task("second");

    let mut builder = TaskPipelineBuilder::new();
    builder.task(&first).add();
    builder.task(&second).add();

    let report = builder.create()?.execute();
    assert_eq!(report.failures().len(), 2);
    assert_eq!(report.into_result().unwrap_err().to_string(), "first failed");
    Ok(())
}

#[test]
fn test_panicking_task_is_a_failure() -> TestResult {
    let sink = Sink::new();
    let boom = Task::new("boom", || panic!("kaboom"));
    let after = sink.task("after");

    let mut builder = TaskPipelineBuilder::new();
    builder.task(&boom).add_dependent(&after).add();

    let err = builder.create()?.call().expect_err("panic becomes an error");
    assert_eq!(err.to_string(), "task 'boom' panicked: kaboom");
    assert_eq!(sink.contents(), "");
    Ok(())
}

#[test]
fn test_pipeline_can_be_called_again() -> TestResult {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let counted = Task::new("counted", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let flaky_runs = Arc::new(AtomicUsize::new(0));
    let flaky_counter = Arc::clone(&flaky_runs);
    let flaky = Task::new("flaky", move || {
        if flaky_counter.fetch_add(1, Ordering::SeqCst) == 0 {
            bail!("first attempt fails");
        }
        Ok(())
    });

    let mut builder = TaskPipelineBuilder::new();
    builder.task(&flaky).add_dependent(&counted).add();
    let pipeline = builder.create()?;

    // No retries: the first run fails and `counted` never runs.
    assert!(pipeline.call().is_err());
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    // A fresh run starts from a clean ledger.
    pipeline.call()?;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(flaky_runs.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn test_referenced_tasks_run_without_registration() -> TestResult {
    let sink = Sink::new();
    let (a, b, c) = (sink.task("a"), sink.task("b"), sink.task("c"));

    let mut builder = TaskPipelineBuilder::new();
    builder.task(&b).add_dependency(&a).add_dependent(&c).add();

    let pipeline = builder.create()?;
    assert_eq!(pipeline.dag().node_count(), 3);
    pipeline.call()?;
    assert_eq!(sink.contents(), "abc");
    Ok(())
}

#[test]
fn test_tasks_with_equal_names_are_distinct() -> TestResult {
    let sink = Sink::new();
    let first = sink.task("x");
    let second = sink.task("x");

    let mut builder = TaskPipelineBuilder::new();
    builder.task(&first).add_dependent(&second).add();

    builder.create()?.call()?;
    assert_eq!(sink.contents(), "xx");
    Ok(())
}

#[test]
fn test_duplicate_registration_is_rejected() {
    let sink = Sink::new();
    let a = sink.task("A");
    let b = sink.task("B");

    let mut builder = TaskPipelineBuilder::new();
    builder.task(&a).add();
    builder.task(&b).add_dependency(&a).add();
    builder.task(&a).add_dependent(&b).add();

    match builder.create() {
        Err(DagpipeError::DuplicateTask(name)) => assert_eq!(name, "A"),
        other => panic!("expected DuplicateTask, got {other:?}"),
    }
    assert_eq!(sink.contents(), "");
}

#[test]
fn test_cyclic_declaration_is_rejected_at_build_time() {
    let sink = Sink::new();
    let a = sink.task("A");
    let b = sink.task("B");
    let c = sink.task("C");

    let mut builder = TaskPipelineBuilder::new();
    builder.task(&a).add_dependent(&b).add();
    builder.task(&b).add_dependent(&c).add();
    builder.task(&c).add_dependent(&a).add();

    assert!(matches!(builder.create(), Err(DagpipeError::Cycle(_))));
    assert_eq!(sink.contents(), "");
}

#[test]
fn test_empty_pipeline_is_rejected() {
    let builder = TaskPipelineBuilder::new();
    assert!(matches!(builder.create(), Err(DagpipeError::EmptyGraph)));
}
