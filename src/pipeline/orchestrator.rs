use crate::captions::{self, AudioProbe};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::runner::StageRunner;
use crate::pipeline::status::{transition, JobStatus, Stage, StatusHandle, Transition};
use crate::video::VideoEngine;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 流水线编排器，持有任务状态的唯一写入权
pub struct Orchestrator {
    config: PipelineConfig,
    engine: VideoEngine,
    runner: Arc<dyn StageRunner>,
    probe: Arc<dyn AudioProbe>,
    status: StatusHandle,
}

/// 后台运行被接受后的凭据
#[derive(Debug)]
pub struct RunTicket {
    pub started_at: DateTime<Utc>,
    pub handle: JoinHandle<()>,
}

impl Orchestrator {
    pub fn new(
        config: PipelineConfig,
        runner: Arc<dyn StageRunner>,
        probe: Arc<dyn AudioProbe>,
    ) -> Self {
        let engine = VideoEngine::from_config(&config);
        Self {
            config,
            engine,
            runner,
            probe,
            status: StatusHandle::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn status(&self) -> JobStatus {
        self.status.snapshot()
    }

    /// 运行整条流水线直到结束。
    ///
    /// 只有在已有运行处于 processing 时返回错误，此时状态不变。阶段失败不会
    /// 作为错误返回，只体现在状态里。
    pub async fn run(&self) -> Result<()> {
        self.status.try_begin()?;
        self.drive().await;
        Ok(())
    }

    /// 接受运行请求后立即返回，流水线在后台任务中继续执行
    pub fn trigger(self: &Arc<Self>) -> Result<RunTicket> {
        let started_at = self.status.try_begin()?;

        let this = Arc::clone(self);
        let handle = tokio::spawn(async move { this.drive().await });

        Ok(RunTicket { started_at, handle })
    }

    async fn drive(&self) {
        info!("Pipeline started");

        let mut stage = Stage::FIRST;
        loop {
            self.status.enter(stage);
            info!(stage = stage.name(), "{}", stage.message());

            let result = self.execute_stage(stage).await;
            match transition(stage, &result) {
                Transition::Next(next) => stage = next,
                Transition::Finished => {
                    self.status.complete();
                    info!("Pipeline finished");
                    break;
                }
                Transition::Failed(message) => {
                    error!(stage = stage.name(), "Pipeline failed: {}", message);
                    self.status.fail(message);
                    break;
                }
            }
        }
    }

    async fn execute_stage(&self, stage: Stage) -> Result<()> {
        match stage {
            Stage::Captions => {
                captions::generate_all(&self.config, self.probe.as_ref()).await?;
                Ok(())
            }
            Stage::SceneVideos => self.runner.execute(&self.engine.render_scenes()).await,
            Stage::Concat => self.runner.execute(&self.engine.concat()).await,
        }
    }
}
