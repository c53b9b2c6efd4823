use crate::config::PipelineConfig;
use crate::pipeline::runner::CommandSpec;
use std::path::PathBuf;

const RENDER_SCRIPT: &str = "main.py";
const CONCAT_SCRIPT: &str = "concat.py";

#[derive(Debug, Clone)]
pub struct VideoEngine {
    python: String,
    engine_dir: PathBuf,
}

impl VideoEngine {
    pub fn new(python: impl Into<String>, engine_dir: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            engine_dir: engine_dir.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.python.clone(), config.engine_dir())
    }

    /// 渲染每个场景的视频片段
    pub fn render_scenes(&self) -> CommandSpec {
        self.script(RENDER_SCRIPT)
    }

    /// 拼接所有片段为最终视频
    pub fn concat(&self) -> CommandSpec {
        self.script(CONCAT_SCRIPT)
    }

    fn script(&self, name: &str) -> CommandSpec {
        CommandSpec::new(self.python.clone(), [name], self.engine_dir.clone())
    }
}
