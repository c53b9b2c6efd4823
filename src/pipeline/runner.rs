//! 外部阶段进程的执行。

use crate::error::{Result, VideoError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{info, warn};

/// 一条外部命令：程序、参数和工作目录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I, working_dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: working_dir.into(),
        }
    }
}

/// 执行一条外部命令，退出码为 0 才算成功
#[async_trait]
pub trait StageRunner: Send + Sync {
    async fn execute(&self, spec: &CommandSpec) -> Result<()>;
}

/// 用 tokio 子进程执行命令，stdout/stderr 逐行转发到日志
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

#[async_trait]
impl StageRunner for ProcessRunner {
    async fn execute(&self, spec: &CommandSpec) -> Result<()> {
        info!(
            program = %spec.program,
            args = ?spec.args,
            cwd = %spec.working_dir.display(),
            "Starting stage process"
        );

        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| VideoError::ProcessLaunch {
                program: spec.program.clone(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // 输出边读边打，同时等待进程退出
        let (status, _, _) = tokio::join!(
            child.wait(),
            forward_lines(stdout, &spec.program, Stream::Stdout),
            forward_lines(stderr, &spec.program, Stream::Stderr),
        );
        let status = status?;

        if status.success() {
            info!(program = %spec.program, "Stage process finished");
            Ok(())
        } else {
            Err(VideoError::ProcessExited {
                program: spec.program.clone(),
                code: status.code(),
            })
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

async fn forward_lines<R>(reader: Option<R>, program: &str, stream: Stream)
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return;
    };

    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match stream {
                Stream::Stdout => info!(program, "{}", line),
                Stream::Stderr => warn!(program, "{}", line),
            },
            Ok(None) => break,
            Err(e) => {
                warn!(program, "Stopped reading {:?}: {}", stream, e);
                break;
            }
        }
    }
}
