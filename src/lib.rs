//! 故事文本 → 竖屏短视频流水线。
//!
//! 核心是字幕时间轴生成（[`captions`]）和阶段编排（[`pipeline`]），
//! 其余阶段通过外部进程完成。

pub mod api;
pub mod captions;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod scene;
pub mod video;

pub use error::{Result, VideoError};
