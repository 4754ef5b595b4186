//! 棋谱记录格式
//!
//! 以 JSON 保存开局摆子和走法列表，可以重新回放成对局。

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChessError, Result};
use crate::fen::{Fen, INITIAL_PLACEMENT};
use crate::game::{Game, RulesConfig};
use crate::moves::{AppliedMove, MoveKind, MoveOutcome};
use crate::piece::Square;

/// 棋谱版本
pub const RECORD_VERSION: &str = "1.0";

/// 对局元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    /// 白方玩家名
    pub white_player: String,
    /// 黑方玩家名
    pub black_player: String,
    /// 对局日期
    pub date: String,
    /// 对局使用的规则配置
    #[serde(default)]
    pub rules: RulesConfig,
}

/// 走法记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 起始格 [rank, file]
    pub from: Square,
    /// 目标格 [rank, file]
    pub to: Square,
    /// 走法类型
    pub kind: MoveKind,
    /// 长代数记法
    pub notation: String,
}

impl From<&AppliedMove> for MoveRecord {
    fn from(mv: &AppliedMove) -> Self {
        Self {
            from: mv.from,
            to: mv.to,
            kind: mv.kind,
            notation: mv.notation(),
        }
    }
}

/// 完整的棋谱记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// 版本号
    pub version: String,
    /// 元数据
    pub metadata: GameMetadata,
    /// 开局摆子（FEN 第一段）
    pub initial_placement: String,
    /// 走法列表
    pub moves: Vec<MoveRecord>,
}

impl GameRecord {
    /// 创建标准开局的空棋谱
    pub fn new(white_player: String, black_player: String) -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            metadata: GameMetadata {
                white_player,
                black_player,
                date: Utc::now().format("%Y-%m-%d").to_string(),
                rules: RulesConfig::default(),
            },
            initial_placement: INITIAL_PLACEMENT.to_string(),
            moves: Vec::new(),
        }
    }

    /// 从当前对局生成棋谱
    pub fn from_game(game: &Game, white_player: String, black_player: String) -> Self {
        let mut record = Self::new(white_player, black_player);
        record.metadata.rules = game.config();
        record.initial_placement = game.initial_placement().to_string();
        record.moves = game.moves().iter().map(MoveRecord::from).collect();
        record
    }

    /// 添加走法
    pub fn add_move(&mut self, mv: MoveRecord) {
        self.moves.push(mv);
    }

    /// 在开局摆子上依次重放所有走法
    ///
    /// 走法被拒绝或类型与记录不符时返回 [`ChessError::IllegalRecordedMove`]。
    pub fn replay(&self) -> Result<Game> {
        let board = Fen::parse_board(&self.initial_placement)?;
        let mut game = Game::from_board(board, self.metadata.rules);

        for (index, mv) in self.moves.iter().enumerate() {
            let illegal = || ChessError::IllegalRecordedMove {
                index,
                notation: mv.notation.clone(),
            };

            let piece = game.board().occupant_at(mv.from).ok_or_else(illegal)?;
            match game.attempt_move(piece, mv.to.rank() as i32, mv.to.file() as i32) {
                MoveOutcome::Applied(applied) if applied.kind == mv.kind => {}
                _ => return Err(illegal()),
            }
        }

        debug!(moves = self.moves.len(), "棋谱回放完成");
        Ok(game)
    }

    /// 按回合排列的走法列表
    pub fn to_move_list(&self) -> String {
        let mut output = String::new();

        for (i, mv) in self.moves.iter().enumerate() {
            let round = i / 2 + 1;
            if i % 2 == 0 {
                output.push_str(&format!("{}. {}", round, mv.notation));
            } else {
                output.push_str(&format!("  {}\n", mv.notation));
            }
        }
        if self.moves.len() % 2 == 1 {
            output.push('\n');
        }

        output
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 保存到文件
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), "棋谱已保存");
        Ok(())
    }

    /// 从文件读取
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
