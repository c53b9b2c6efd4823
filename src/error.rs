use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VideoError {
    /// 已有任务在运行（single-flight）
    #[error("A video is already being generated. Please wait.")]
    AlreadyRunning,

    #[error("Invalid scene data: {0}")]
    InvalidScenes(String),

    #[error("scenes.json not found at {}", .0.display())]
    ScenesNotFound(PathBuf),

    #[error("Audio file not found: {}", .0.display())]
    AudioNotFound(PathBuf),

    #[error("Could not read audio duration for {}: {reason}", .path.display())]
    DurationUnreadable { path: PathBuf, reason: String },

    #[error("Invalid audio duration for scene {scene_id}: {duration}")]
    InvalidDuration { scene_id: u32, duration: f64 },

    #[error("Narration for scene {scene_id} has no words")]
    EmptyNarration { scene_id: u32 },

    #[error("{program} exited with code {}", exit_code(.code))]
    ProcessExited { program: String, code: Option<i32> },

    #[error("Failed to launch {program}: {source}")]
    ProcessLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {what}: {source}")]
    Format {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VideoError>;

// 被信号终止的进程没有退出码
fn exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}
