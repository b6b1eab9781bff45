//! External program execution with concurrent output draining.
//!
//! Every toolchain invocation (`jc`, `xpack`, `xjava`, `codesign`, `productbuild`) goes
//! through [`ProcessRunner`]. Both pipes are drained by dedicated tasks for the whole
//! lifetime of the child: a child that fills either OS pipe buffer would otherwise
//! block forever.

use super::{
    context::{Context, OutputSink},
    error::{Error, Result},
};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
    sync::Arc,
    time::Duration,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
    task::JoinHandle,
};

/// Upper bound on waiting for a drain task after the child has exited.
pub const READER_JOIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Exit code reported for a child terminated by a signal.
pub const SIGNALLED_EXIT_CODE: i32 = -1;

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Builder for a single external program invocation.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: PathBuf,
    args: Vec<OsString>,
    working_dir: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl ProcessRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Add an environment override merged onto the inherited environment.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Human readable command line, arguments containing spaces are quoted.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|part| {
                let part = part.to_string_lossy();
                if part.contains(' ') {
                    format!("\"{part}\"")
                } else {
                    part.into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Run the program to completion and return its exit code.
    ///
    /// A program that cannot be spawned or awaited yields [`Error::CommandFailed`]; a
    /// non-zero exit is a normal completion.
    pub async fn execute(&self, ctx: &Context) -> Result<i32> {
        log::debug!("Executing: {}", self.command_line());

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .env_clear()
            .envs(merge_environment(
                ctx.env().vars().iter().cloned(),
                &self.env,
                ctx.os().env_case_insensitive(),
            ));
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|error| Error::CommandFailed {
            command: self.program_name(),
            error,
        })?;

        let stdout = child
            .stdout
            .take()
            .map(|out| tokio::spawn(drain(out, Arc::clone(ctx.sink()), Stream::Stdout)));
        let stderr = child
            .stderr
            .take()
            .map(|err| tokio::spawn(drain(err, Arc::clone(ctx.sink()), Stream::Stderr)));

        let status = child.wait().await;

        join_reader(stdout, Stream::Stdout).await;
        join_reader(stderr, Stream::Stderr).await;

        let status = status.map_err(|error| Error::CommandFailed {
            command: self.program_name(),
            error,
        })?;
        let code = status.code().unwrap_or(SIGNALLED_EXIT_CODE);
        log::debug!("{} exited with code {code}", self.program_name());
        Ok(code)
    }

    /// Run the program and turn a non-zero exit into [`Error::CommandExit`].
    pub async fn execute_checked(&self, ctx: &Context, failure: &str) -> Result<()> {
        match self.execute(ctx).await? {
            0 => Ok(()),
            code => Err(Error::CommandExit {
                context: failure.to_string(),
                command: self.program_name(),
                code,
            }),
        }
    }
}

/// Run `args[0]` with the remaining arguments.
pub async fn execute(
    args: &[String],
    working_dir: Option<&Path>,
    env_overrides: &[(String, String)],
    ctx: &Context,
) -> Result<i32> {
    let Some((program, rest)) = args.split_first() else {
        crate::bail!("no program given to execute");
    };
    let mut runner = ProcessRunner::new(program).args(rest);
    if let Some(dir) = working_dir {
        runner = runner.current_dir(dir);
    }
    for (key, value) in env_overrides {
        runner = runner.env(key.clone(), value.clone());
    }
    runner.execute(ctx).await
}

/// Merge environment overrides onto an inherited environment.
///
/// With `case_insensitive`, an override replaces the value of any existing key that
/// differs only in case, keeping the existing spelling, and removes further duplicates.
pub fn merge_environment<I>(
    inherited: I,
    overrides: &[(String, String)],
    case_insensitive: bool,
) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut merged: Vec<(String, String)> = inherited.into_iter().collect();
    let same_key = |a: &str, b: &str| {
        if case_insensitive {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    };

    for (key, value) in overrides {
        match merged.iter().position(|(k, _)| same_key(k, key)) {
            Some(first) => {
                merged[first].1 = value.clone();
                let mut index = 0;
                merged.retain(|(k, _)| {
                    let keep = index == first || !same_key(k, key);
                    index += 1;
                    keep
                });
            }
            None => merged.push((key.clone(), value.clone())),
        }
    }
    merged
}

async fn drain<R>(stream: R, sink: Arc<dyn OutputSink>, kind: Stream)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buffer);
                let line = line.trim_end_matches(['\n', '\r']);
                match kind {
                    Stream::Stdout => sink.info(line),
                    Stream::Stderr => sink.error(line),
                }
            }
            Err(e) => {
                log::debug!("Stopped reading {kind:?}: {e}");
                break;
            }
        }
    }
}

async fn join_reader(handle: Option<JoinHandle<()>>, kind: Stream) {
    let Some(mut handle) = handle else {
        return;
    };
    match tokio::time::timeout(READER_JOIN_TIMEOUT, &mut handle).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::warn!("{kind:?} reader task failed: {e}"),
        Err(_) => {
            log::warn!(
                "{kind:?} reader did not finish within {}s, abandoning it",
                READER_JOIN_TIMEOUT.as_secs()
            );
            handle.abort();
        }
    }
}
