//! 错误类型定义
//!
//! 非法走法不是错误：`Game::attempt_move` 以 `MoveOutcome::Rejected` 表示。
//! 这里只收录摆子、FEN、棋谱等真正的失败。

use thiserror::Error;

use crate::piece::Square;

/// 象棋规则错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChessError {
    /// 无效的位置
    #[error("Invalid square: rank {rank}, file {file}")]
    InvalidSquare { rank: i32, file: i32 },

    /// 无法解析的格子记号
    #[error("Invalid square notation: {text:?}")]
    InvalidNotation { text: String },

    /// 摆子时目标格已有棋子
    #[error("Square {square} is already occupied")]
    SquareOccupied { square: Square },

    /// 无效的 FEN 字符串
    #[error("Invalid FEN string: {reason}")]
    InvalidFen { reason: String },

    /// 棋谱中的走法被规则拒绝
    #[error("Recorded move #{index} ({notation}) is illegal")]
    IllegalRecordedMove { index: usize, notation: String },

    /// 棋谱序列化错误
    #[error("Record serialization error: {0}")]
    Record(String),

    /// 棋谱文件读写错误
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for ChessError {
    fn from(err: serde_json::Error) -> Self {
        ChessError::Record(err.to_string())
    }
}

impl From<std::io::Error> for ChessError {
    fn from(err: std::io::Error) -> Self {
        ChessError::Io(err.to_string())
    }
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, ChessError>;
