use crate::error::{Result, VideoError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// 表示一个场景/分镜
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// 场景序号（从 1 开始，连续）
    pub scene_id: u32,
    /// 旁白文本
    pub narration: String,
    /// 短字幕
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// 图片提示词
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    /// 预估时长（秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_sec: Option<f64>,
}

impl Scene {
    pub fn new(scene_id: u32, narration: impl Into<String>) -> Self {
        Self {
            scene_id,
            narration: narration.into(),
            caption: None,
            image_prompt: None,
            duration_sec: None,
        }
    }
}

/// scenes.json 的内容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneScript {
    pub scenes: Vec<Scene>,
}

impl SceneScript {
    /// 读取并校验分镜文件
    pub async fn load(path: &Path) -> Result<Self> {
        if tokio::fs::metadata(path).await.is_err() {
            return Err(VideoError::ScenesNotFound(path.to_path_buf()));
        }

        let raw = tokio::fs::read_to_string(path).await?;
        let script = Self::parse(&raw)?;
        info!(path = %path.display(), scenes = script.scenes.len(), "Loaded scene script");
        Ok(script)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let script: SceneScript = serde_json::from_str(raw).map_err(|source| VideoError::Format {
            what: "scenes.json".to_string(),
            source,
        })?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<()> {
        if self.scenes.is_empty() {
            return Err(VideoError::InvalidScenes("no scenes".to_string()));
        }

        for (idx, scene) in self.scenes.iter().enumerate() {
            let expected = idx as u32 + 1;
            if scene.scene_id != expected {
                return Err(VideoError::InvalidScenes(format!(
                    "expected scene_id {} at position {}, found {}",
                    expected, idx, scene.scene_id
                )));
            }
            if scene.narration.trim().is_empty() {
                return Err(VideoError::InvalidScenes(format!(
                    "scene {} has no narration",
                    scene.scene_id
                )));
            }
        }

        Ok(())
    }
}
