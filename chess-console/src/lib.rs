//! 国际象棋控制台
//!
//! 包含:
//! - 命令解析
//! - 棋盘显示
//! - 设置持久化
//! - 走法通知

pub mod command;
pub mod notifier;
pub mod render;
pub mod session;
pub mod settings;

pub use command::{Command, Target, HELP};
pub use notifier::ConsoleNotifier;
pub use session::{Reply, Session};
pub use settings::ConsoleSettings;
