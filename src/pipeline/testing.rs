//! 测试用的替身实现。

use crate::captions::AudioProbe;
use crate::config::PipelineConfig;
use crate::error::{Result, VideoError};
use crate::pipeline::runner::{CommandSpec, StageRunner};
use crate::scene::{Scene, SceneScript};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Notify;

/// 固定时长；音频文件不存在时报错
pub struct FixedProbe(pub f64);

#[async_trait]
impl AudioProbe for FixedProbe {
    async fn duration(&self, audio_path: &Path) -> Result<f64> {
        if !audio_path.exists() {
            return Err(VideoError::AudioNotFound(audio_path.to_path_buf()));
        }
        Ok(self.0)
    }
}

/// 记录调用的 runner，可按脚本名失败，也可阻塞到放行
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: Mutex<Vec<CommandSpec>>,
    fail_script: Option<(String, i32)>,
    gate: Option<Arc<Notify>>,
}

impl RecordingRunner {
    pub fn failing_on(script: &str, code: i32) -> Self {
        Self {
            fail_script: Some((script.to_string(), code)),
            ..Self::default()
        }
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn scripts(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|spec| spec.args.first().cloned())
            .collect()
    }
}

#[async_trait]
impl StageRunner for RecordingRunner {
    async fn execute(&self, spec: &CommandSpec) -> Result<()> {
        self.calls.lock().push(spec.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match &self.fail_script {
            Some((script, code)) if spec.args.first() == Some(script) => {
                Err(VideoError::ProcessExited {
                    program: spec.program.clone(),
                    code: Some(*code),
                })
            }
            _ => Ok(()),
        }
    }
}

/// 写出 scenes.json 和每个场景的音频占位文件
pub fn write_project(config: &PipelineConfig, narrations: &[&str]) {
    let script = SceneScript {
        scenes: narrations
            .iter()
            .enumerate()
            .map(|(i, narration)| Scene::new(i as u32 + 1, *narration))
            .collect(),
    };

    std::fs::create_dir_all(config.scenes_path().parent().unwrap()).unwrap();
    std::fs::write(
        config.scenes_path(),
        serde_json::to_string_pretty(&script).unwrap(),
    )
    .unwrap();

    std::fs::create_dir_all(config.audio_dir()).unwrap();
    for scene in &script.scenes {
        std::fs::write(config.audio_path(scene.scene_id), b"mp3").unwrap();
    }
}
