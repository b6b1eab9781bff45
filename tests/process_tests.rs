//! External program execution against real child processes.
#![cfg(unix)]

mod common;

use common::{ctx_with, linux_ctx};
use jet_bundler::bundler::{Environment, Error, Level, ProcessRunner, process};

#[tokio::test]
async fn large_output_on_both_streams_does_not_deadlock() {
    let (ctx, sink) = linux_ctx();
    // 2000 lines of 100 bytes on each stream, well past any pipe buffer.
    let script = r#"
        i=0
        line=$(printf '%0100d' 0)
        while [ $i -lt 2000 ]; do
            echo "out $line"
            echo "err $line" >&2
            i=$((i + 1))
        done
        exit 7
    "#;
    let code = ProcessRunner::new("/bin/sh")
        .args(["-c", script])
        .execute(&ctx)
        .await
        .unwrap();

    assert_eq!(code, 7);
    assert_eq!(sink.lines_at(Level::Info).len(), 2000);
    assert_eq!(sink.lines_at(Level::Error).len(), 2000);
    assert!(sink.lines_at(Level::Error)[0].starts_with("err "));
}

#[tokio::test]
async fn missing_program_is_a_launch_failure() {
    let (ctx, _) = linux_ctx();
    let err = ProcessRunner::new("/no/such/program")
        .execute(&ctx)
        .await
        .unwrap_err();
    assert!(err.is_launch_failure());
    assert!(matches!(err, Error::CommandFailed { .. }));
}

#[tokio::test]
async fn nonzero_exit_is_reported_by_execute_checked() {
    let (ctx, _) = linux_ctx();
    let err = ProcessRunner::new("/bin/sh")
        .args(["-c", "exit 4"])
        .execute_checked(&ctx, "build failed")
        .await
        .unwrap_err();
    assert!(!err.is_launch_failure());
    match err {
        Error::CommandExit { context, code, .. } => {
            assert_eq!(context, "build failed");
            assert_eq!(code, 4);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn killed_child_reports_minus_one() {
    let (ctx, _) = linux_ctx();
    let code = ProcessRunner::new("/bin/sh")
        .args(["-c", "kill -9 $$"])
        .execute(&ctx)
        .await
        .unwrap();
    assert_eq!(code, process::SIGNALLED_EXIT_CODE);
}

#[tokio::test]
async fn child_sees_context_environment_and_overrides() {
    let env = Environment::empty()
        .with_var("GREETING", "hello")
        .with_var("TARGET", "world");
    let (ctx, sink) = ctx_with(env);

    let code = ProcessRunner::new("/bin/sh")
        .args(["-c", "echo \"$GREETING $TARGET\""])
        .env("TARGET", "jet")
        .execute(&ctx)
        .await
        .unwrap();

    assert_eq!(code, 0);
    assert_eq!(sink.lines_at(Level::Info), vec!["hello jet"]);
}

#[tokio::test]
async fn runs_in_the_requested_directory() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, sink) = linux_ctx();
    ProcessRunner::new("/bin/sh")
        .args(["-c", "pwd"])
        .current_dir(dir.path())
        .execute_checked(&ctx, "pwd failed")
        .await
        .unwrap();

    let expected = dir.path().canonicalize().unwrap();
    let printed = std::path::PathBuf::from(&sink.lines_at(Level::Info)[0]);
    assert_eq!(printed.canonicalize().unwrap(), expected);
}

#[tokio::test]
async fn argument_vector_form_needs_a_program() {
    let (ctx, _) = linux_ctx();
    assert!(process::execute(&[], None, &[], &ctx).await.is_err());

    let args = vec!["/bin/sh".to_string(), "-c".to_string(), "exit 2".to_string()];
    assert_eq!(process::execute(&args, None, &[], &ctx).await.unwrap(), 2);
}
