//! 对局控制
//!
//! `Game` 持有棋盘状态，负责校验走法、执行副作用、记录快照并通知观察者。

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{Board, BoardState};
use crate::constants::PROMOTION_KIND;
use crate::fen::Fen;
use crate::history::History;
use crate::moves::{AppliedMove, MoveKind, MoveOutcome, MoveValidator, PlannedMove, Rejection};
use crate::piece::{Color, PieceId, Square};

/// 规则配置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// 是否要求双方轮流走棋（默认不要求）
    pub enforce_turn_order: bool,
}

/// 走法结果的观察者
pub trait MoveObserver {
    /// 走法执行完毕
    fn on_move_applied(&mut self, mv: &AppliedMove);

    /// 走法被拒绝，棋子留在原位
    fn on_move_rejected(&mut self, _piece: PieceId) {}
}

/// 一局棋
pub struct Game {
    state: BoardState,
    config: RulesConfig,
    /// 开局摆子（FEN 第一段）
    initial_placement: String,
    /// 已执行的走法
    moves: Vec<AppliedMove>,
    observers: Vec<Box<dyn MoveObserver>>,
}

impl Game {
    /// 标准开局
    pub fn new() -> Self {
        Self::with_config(RulesConfig::default())
    }

    pub fn with_config(config: RulesConfig) -> Self {
        Self::from_board(Board::initial(), config)
    }

    /// 从任意摆子开始，当前局面作为历史第一项
    pub fn from_board(board: Board, config: RulesConfig) -> Self {
        let initial_placement = Fen::board_to_string(&board);
        Self {
            state: BoardState::from_board(board),
            config,
            initial_placement,
            moves: Vec::new(),
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn MoveObserver>) {
        self.observers.push(observer);
    }

    pub fn config(&self) -> RulesConfig {
        self.config
    }

    pub fn set_config(&mut self, config: RulesConfig) {
        self.config = config;
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn history(&self) -> &History {
        self.state.history()
    }

    pub fn initial_placement(&self) -> &str {
        &self.initial_placement
    }

    /// 已执行的走法（按顺序）
    pub fn moves(&self) -> &[AppliedMove] {
        &self.moves
    }

    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move()
    }

    /// 尝试走子
    ///
    /// 坐标可以超出棋盘范围，非法走法返回 [`MoveOutcome::Rejected`]，
    /// 棋盘和历史保持不变。
    pub fn attempt_move(&mut self, piece: PieceId, to_rank: i32, to_file: i32) -> MoveOutcome {
        let planned = self
            .check_turn(piece)
            .and_then(|_| MoveValidator::plan(&self.state, piece, to_rank, to_file));

        match planned {
            Ok(planned) => {
                let applied = self.apply(planned);
                info!(
                    piece = %applied.piece,
                    kind = ?applied.kind,
                    from = %applied.from,
                    to = %applied.to,
                    "执行走法 {}",
                    applied
                );
                for observer in &mut self.observers {
                    observer.on_move_applied(&applied);
                }
                self.moves.push(applied.clone());
                MoveOutcome::Applied(applied)
            }
            Err(reason) => {
                debug!(piece = %piece, to_rank, to_file, ?reason, "拒绝走法");
                for observer in &mut self.observers {
                    observer.on_move_rejected(piece);
                }
                MoveOutcome::Rejected
            }
        }
    }

    /// 检查 `color` 一方的格子是否受到对方威胁
    pub fn is_square_threatened(&self, square: Square, color: Color) -> bool {
        MoveValidator::is_square_threatened(&self.state, square, color)
    }

    /// 棋子所有合法的目标格
    pub fn legal_destinations(&self, piece: PieceId) -> Vec<Square> {
        if self.check_turn(piece).is_err() {
            return Vec::new();
        }
        MoveValidator::legal_destinations(&self.state, piece)
    }

    fn check_turn(&self, piece: PieceId) -> Result<(), Rejection> {
        if !self.config.enforce_turn_order {
            return Ok(());
        }
        let color = self
            .state
            .board
            .piece(piece)
            .map(|p| p.color())
            .ok_or(Rejection::UnknownPiece)?;
        if color != self.state.side_to_move() {
            return Err(Rejection::NotYourTurn);
        }
        Ok(())
    }

    /// 执行已校验的走法：先吃子，再移动车（易位），最后移动棋子并升变
    fn apply(&mut self, planned: PlannedMove) -> AppliedMove {
        let board = &mut self.state.board;
        let mut changed = vec![planned.from, planned.to];

        let captured = planned.capture_square.and_then(|sq| board.capture(sq));
        if let Some(sq) = planned.capture_square {
            if sq != planned.to {
                changed.push(sq);
            }
        }

        if let Some((rook_from, rook_to)) = planned.rook_move {
            if let Some(rook) = board.occupant_at(rook_from) {
                board.place(rook_to, Some(rook));
            }
            changed.extend([rook_from, rook_to]);
        }

        board.place(planned.to, Some(planned.piece));
        if planned.kind == MoveKind::Promotion {
            board.promote(planned.piece, PROMOTION_KIND);
        }

        self.state.record_snapshot();

        AppliedMove {
            piece: planned.piece,
            kind: planned.kind,
            from: planned.from,
            to: planned.to,
            captured,
            changed,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
