//! 流水线编排：captions → scene_videos → concat，同一时间只允许一次运行。

pub mod orchestrator;
pub mod runner;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use orchestrator::{Orchestrator, RunTicket};
pub use runner::{CommandSpec, ProcessRunner, StageRunner};
pub use status::{JobStatus, RunState, Stage};
