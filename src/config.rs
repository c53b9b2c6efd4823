use std::path::{Path, PathBuf};

/// 流水线目录布局和外部工具路径
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 项目根目录（data/、assets/、captions/ 所在目录）
    pub project_dir: PathBuf,
    /// 渲染引擎目录（main.py、concat.py 所在目录）
    pub engine_dir: PathBuf,
    /// 运行渲染脚本的 Python 解释器
    pub python: String,
    /// ffprobe 可执行文件
    pub ffprobe: String,
}

impl PipelineConfig {
    /// 引擎目录默认为项目根目录的同级目录 video-engine
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let engine_dir = project_dir.join("..").join("video-engine");
        Self {
            project_dir,
            engine_dir,
            python: "python3".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }

    pub fn with_engine_dir(mut self, engine_dir: impl Into<PathBuf>) -> Self {
        self.engine_dir = engine_dir.into();
        self
    }

    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    pub fn with_ffprobe(mut self, ffprobe: impl Into<String>) -> Self {
        self.ffprobe = ffprobe.into();
        self
    }

    pub fn scenes_path(&self) -> PathBuf {
        self.project_dir.join("data").join("scenes.json")
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.project_dir.join("assets").join("audio")
    }

    pub fn captions_dir(&self) -> PathBuf {
        self.project_dir.join("captions")
    }

    pub fn audio_path(&self, scene_id: u32) -> PathBuf {
        self.audio_dir().join(scene_file(scene_id, "mp3"))
    }

    pub fn caption_path(&self, scene_id: u32) -> PathBuf {
        self.captions_dir().join(scene_file(scene_id, "json"))
    }

    pub fn engine_dir(&self) -> &Path {
        &self.engine_dir
    }

    /// 渲染引擎输出目录（场景片段和最终视频）
    pub fn output_dir(&self) -> PathBuf {
        self.engine_dir.join("output")
    }
}

fn scene_file(scene_id: u32, ext: &str) -> String {
    format!("scene_{}.{}", scene_id, ext)
}
