use crate::captions::timing::round2;
use crate::error::{Result, VideoError};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// 读取音频时长（秒）
#[async_trait]
pub trait AudioProbe: Send + Sync {
    async fn duration(&self, audio_path: &Path) -> Result<f64>;
}

/// 通过 ffprobe 读取时长
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    program: String,
}

impl FfprobeProbe {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl AudioProbe for FfprobeProbe {
    async fn duration(&self, audio_path: &Path) -> Result<f64> {
        if tokio::fs::metadata(audio_path).await.is_err() {
            return Err(VideoError::AudioNotFound(audio_path.to_path_buf()));
        }

        let unreadable = |reason: String| VideoError::DurationUnreadable {
            path: audio_path.to_path_buf(),
            reason,
        };

        let output = Command::new(&self.program)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(audio_path)
            .output()
            .await
            .map_err(|e| unreadable(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(unreadable(format!("ffprobe failed: {}", stderr.trim())));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let duration = parse_duration(&stdout).ok_or_else(|| {
            unreadable(format!("unexpected ffprobe output {:?}", stdout.trim()))
        })?;

        debug!(path = %audio_path.display(), duration, "Probed audio duration");
        Ok(duration)
    }
}

/// 解析 ffprobe 输出，只接受正数，保留两位小数
fn parse_duration(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    if value.is_finite() && value > 0.0 {
        Some(round2(value))
    } else {
        None
    }
}
