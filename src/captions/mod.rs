//! 字幕阶段：逐个场景读取音频时长，生成并保存字幕时间轴。

pub mod audio;
pub mod timing;

pub use audio::{AudioProbe, FfprobeProbe};
pub use timing::{generate, CaptionBlock, CaptionDocument, CaptionStyle, TimedWord};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::scene::SceneScript;
use std::path::PathBuf;
use tracing::info;

/// 为 scenes.json 中的每个场景生成字幕文件，返回写出的文件路径
pub async fn generate_all(
    config: &PipelineConfig,
    probe: &dyn AudioProbe,
) -> Result<Vec<PathBuf>> {
    let script = SceneScript::load(&config.scenes_path()).await?;

    tokio::fs::create_dir_all(config.captions_dir()).await?;

    // 场景按顺序逐个处理
    let mut written = Vec::with_capacity(script.scenes.len());
    for scene in &script.scenes {
        info!("Generating captions for scene {}...", scene.scene_id);

        let audio_path = config.audio_path(scene.scene_id);
        let duration = probe.duration(&audio_path).await?;
        let document = generate(&scene.narration, duration, scene.scene_id)?;

        let output_path = config.caption_path(scene.scene_id);
        let json = serde_json::to_string_pretty(&document)?;
        tokio::fs::write(&output_path, json).await?;

        info!(
            words = document.word_count(),
            blocks = document.captions.len(),
            "Saved {}",
            output_path.display()
        );
        written.push(output_path);
    }

    info!("Captions generated for {} scenes", written.len());
    Ok(written)
}
