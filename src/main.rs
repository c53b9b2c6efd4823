use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use story_shorts::api::{create_router, ApiState};
use story_shorts::captions::{self, FfprobeProbe};
use story_shorts::config::PipelineConfig;
use story_shorts::pipeline::{Orchestrator, ProcessRunner, RunState};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "story-shorts")]
#[command(about = "Turns a short story into a vertical short-form video", long_about = None)]
struct Args {
    /// Project directory holding data/, assets/ and captions/
    #[arg(short = 'p', long, env = "STORY_PROJECT_DIR", default_value = ".", global = true)]
    project_dir: PathBuf,

    /// Video engine directory (defaults to ../video-engine next to the project)
    #[arg(long, env = "STORY_ENGINE_DIR", global = true)]
    engine_dir: Option<PathBuf>,

    /// Python interpreter used to run the video engine
    #[arg(long, env = "STORY_PYTHON", default_value = "python3", global = true)]
    python: String,

    /// ffprobe executable used to read audio durations
    #[arg(long, env = "STORY_FFPROBE", default_value = "ffprobe", global = true)]
    ffprobe: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the status/trigger HTTP API
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "STORY_BIND", default_value = "0.0.0.0:5000")]
        bind: String,
    },

    /// Run the whole pipeline in the foreground
    Run,

    /// Print the caption timing for a single narration
    Captions {
        /// Narration text
        #[arg(short, long)]
        narration: String,

        /// Audio duration in seconds
        #[arg(short, long)]
        duration: f64,

        #[arg(short, long, default_value_t = 1)]
        scene_id: u32,
    },
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        let config = PipelineConfig::new(&self.project_dir)
            .with_python(&self.python)
            .with_ffprobe(&self.ffprobe);
        match &self.engine_dir {
            Some(dir) => config.with_engine_dir(dir),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    let args = Args::parse();
    let config = args.pipeline_config();

    match args.command {
        Command::Serve { bind } => serve(config, &bind).await,
        Command::Run => run_foreground(config).await,
        Command::Captions {
            narration,
            duration,
            scene_id,
        } => {
            let document = captions::generate(&narration, duration, scene_id)?;
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
    }
}

fn build_orchestrator(config: PipelineConfig) -> Arc<Orchestrator> {
    let probe = Arc::new(FfprobeProbe::new(config.ffprobe.clone()));
    Arc::new(Orchestrator::new(config, Arc::new(ProcessRunner), probe))
}

async fn serve(config: PipelineConfig, bind: &str) -> anyhow::Result<()> {
    info!(
        project = %config.project_dir.display(),
        engine = %config.engine_dir().display(),
        "Pipeline configured"
    );

    let orchestrator = build_orchestrator(config);
    let router = create_router(ApiState::new(orchestrator));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .context(format!("Failed to bind {}", bind))?;
    info!("API listening on {}", bind);

    axum::serve(listener, router).await.context("API server stopped")?;
    Ok(())
}

async fn run_foreground(config: PipelineConfig) -> anyhow::Result<()> {
    info!("Starting story-shorts pipeline...");

    let orchestrator = build_orchestrator(config);
    orchestrator.run().await?;

    let status = orchestrator.status();
    println!("{}", serde_json::to_string_pretty(&status)?);

    if status.status == RunState::Error {
        error!("Video generation failed: {}", status.message);
        std::process::exit(1);
    }

    info!("Video generation completed successfully!");
    Ok(())
}
