//! 任务状态和阶段状态机。
//!
//! 状态只由编排器写入，其它地方通过 [`StatusHandle::snapshot`] 读取快照。

use crate::error::{Result, VideoError};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Processing,
    Done,
    Error,
}

/// 流水线阶段，按固定顺序执行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Captions,
    SceneVideos,
    Concat,
}

impl Stage {
    pub const FIRST: Stage = Stage::Captions;

    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Captions => Some(Stage::SceneVideos),
            Stage::SceneVideos => Some(Stage::Concat),
            Stage::Concat => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Captions => "captions",
            Stage::SceneVideos => "scene_videos",
            Stage::Concat => "concat",
        }
    }

    /// 进入阶段时展示的消息
    pub fn message(self) -> &'static str {
        match self {
            Stage::Captions => "Generating captions",
            Stage::SceneVideos => "Rendering scene videos",
            Stage::Concat => "Combining scenes",
        }
    }
}

/// 阶段结束后的下一步
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Next(Stage),
    Finished,
    Failed(String),
}

/// 状态机转移：(当前阶段, 阶段结果) → 下一步
pub fn transition(current: Stage, result: &Result<()>) -> Transition {
    match result {
        Err(e) => Transition::Failed(e.to_string()),
        Ok(()) => match current.next() {
            Some(stage) => Transition::Next(stage),
            None => Transition::Finished,
        },
    }
}

pub const DONE_MESSAGE: &str = "Video ready";

/// 对外暴露的任务状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub status: RunState,
    pub stage: Option<Stage>,
    pub message: String,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Default for JobStatus {
    fn default() -> Self {
        Self {
            status: RunState::Idle,
            stage: None,
            message: String::new(),
            started_at: None,
            finished_at: None,
        }
    }
}

impl JobStatus {
    pub fn is_processing(&self) -> bool {
        self.status == RunState::Processing
    }

    fn begin(&mut self, now: DateTime<Utc>) {
        self.status = RunState::Processing;
        self.stage = None;
        self.message = "Starting pipeline".to_string();
        self.started_at = Some(now);
        self.finished_at = None;
    }

    fn enter(&mut self, stage: Stage) {
        self.stage = Some(stage);
        self.message = stage.message().to_string();
    }

    fn complete(&mut self, now: DateTime<Utc>) {
        self.status = RunState::Done;
        self.stage = None;
        self.message = DONE_MESSAGE.to_string();
        self.finished_at = Some(now);
    }

    fn fail(&mut self, message: String, now: DateTime<Utc>) {
        self.status = RunState::Error;
        self.stage = None;
        self.message = message;
        self.finished_at = Some(now);
    }
}

/// 共享的任务状态。写操作只对 pipeline 模块可见。
#[derive(Debug, Clone, Default)]
pub struct StatusHandle {
    inner: Arc<RwLock<JobStatus>>,
}

impl StatusHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> JobStatus {
        self.inner.read().clone()
    }

    /// 检查并进入 processing，同一次加锁内完成
    pub(super) fn try_begin(&self) -> Result<DateTime<Utc>> {
        let mut status = self.inner.write();
        if status.is_processing() {
            return Err(VideoError::AlreadyRunning);
        }
        let now = Utc::now();
        status.begin(now);
        Ok(now)
    }

    pub(super) fn enter(&self, stage: Stage) {
        self.inner.write().enter(stage);
    }

    pub(super) fn complete(&self) {
        self.inner.write().complete(Utc::now());
    }

    pub(super) fn fail(&self, message: String) {
        self.inner.write().fail(message, Utc::now());
    }
}
