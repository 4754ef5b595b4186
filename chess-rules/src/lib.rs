//! 国际象棋规则引擎
//!
//! 包含:
//! - 棋子、格子、棋盘等核心数据结构
//! - 只追加的棋盘历史快照
//! - 走法验证（王车易位、吃过路兵、兵升变）和格子威胁检查
//! - 对局控制与走法观察者
//! - 棋谱格式 (JSON, FEN 摆子)

mod board;
mod constants;
mod error;
mod fen;
mod game;
mod history;
mod moves;
mod piece;
mod record;

pub use board::{Board, BoardState};
pub use constants::*;
pub use error::{ChessError, Result};
pub use fen::{Fen, INITIAL_PLACEMENT};
pub use game::{Game, MoveObserver, RulesConfig};
pub use history::{History, Snapshot};
pub use moves::{AppliedMove, CastleSide, MoveKind, MoveOutcome, MoveValidator, PawnMove};
pub use piece::{Color, Piece, PieceId, PieceKind, Square};
pub use record::{GameMetadata, GameRecord, MoveRecord, RECORD_VERSION};
