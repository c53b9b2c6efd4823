//! 渲染引擎的外部命令。场景渲染和最终拼接都由引擎目录下的 Python 脚本完成，
//! 这里只负责拼出固定的命令行。

mod generator;

pub use generator::VideoEngine;
