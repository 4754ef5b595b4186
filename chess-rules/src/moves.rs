//! 走法验证与分类

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardState};
use crate::constants::{KING_SIDE_ROOK_FILE, QUEEN_SIDE_ROOK_FILE};
use crate::history::History;
use crate::piece::{Color, Piece, PieceId, PieceKind, Square};

/// 走法类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// 普通走子或吃子
    Normal,
    /// 王车易位
    Castle,
    /// 吃过路兵
    EnPassant,
    /// 兵升变
    Promotion,
}

/// 王车易位方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    /// 根据王的横向位移判断方向
    fn from_file_delta(d_file: i32) -> Option<CastleSide> {
        match d_file {
            2 => Some(CastleSide::KingSide),
            -2 => Some(CastleSide::QueenSide),
            _ => None,
        }
    }

    /// 参与易位的车所在列
    pub fn rook_file(&self) -> u8 {
        match self {
            CastleSide::KingSide => KING_SIDE_ROOK_FILE,
            CastleSide::QueenSide => QUEEN_SIDE_ROOK_FILE,
        }
    }
}

/// 兵的走法分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PawnMove {
    /// 直进一格
    Forward,
    /// 从初始行直进两格
    DoubleStep,
    /// 斜进吃子
    Capture,
    /// 吃过路兵
    EnPassant,
}

/// 走法被拒绝的原因（只用于日志，不返回给调用方）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejection {
    /// 棋子不在棋盘上
    UnknownPiece,
    /// 不是该方走棋
    NotYourTurn,
    /// 目标格在棋盘外
    OffBoard,
    /// 目标格就是当前格
    NoMovement,
    /// 目标格有己方棋子
    OwnPieceOnTarget,
    /// 不符合该兵种的走法
    IllegalPattern,
}

/// 走法的具体形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Classified {
    /// 王走一格或后、象、马、车的走法
    Plain,
    Castle(CastleSide),
    Pawn(PawnMove),
}

/// 通过校验、等待执行的走法
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlannedMove {
    pub piece: PieceId,
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
    /// 被吃棋子所在格（吃过路兵时不是目标格）
    pub capture_square: Option<Square>,
    /// 易位时车的起止格
    pub rook_move: Option<(Square, Square)>,
}

/// 已执行的走法
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMove {
    pub piece: PieceId,
    pub kind: MoveKind,
    pub from: Square,
    pub to: Square,
    /// 被吃掉的棋子
    pub captured: Option<PieceId>,
    /// 棋子发生变化的格子（供界面重绘）
    pub changed: Vec<Square>,
}

impl AppliedMove {
    /// 长代数记法，如 `e2-e4`、`e5xd6 e.p.`、`O-O`
    pub fn notation(&self) -> String {
        match self.kind {
            MoveKind::Castle => {
                if self.to.file() > self.from.file() {
                    "O-O".to_string()
                } else {
                    "O-O-O".to_string()
                }
            }
            MoveKind::EnPassant => format!("{}x{} e.p.", self.from, self.to),
            MoveKind::Promotion => {
                let sep = if self.captured.is_some() { 'x' } else { '-' };
                format!("{}{}{}=Q", self.from, sep, self.to)
            }
            MoveKind::Normal => {
                let sep = if self.captured.is_some() { 'x' } else { '-' };
                format!("{}{}{}", self.from, sep, self.to)
            }
        }
    }
}

impl fmt::Display for AppliedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation())
    }
}

/// 一次走子尝试的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// 非法走法，棋盘未改变
    Rejected,
    /// 合法走法，已执行
    Applied(AppliedMove),
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied(_))
    }

    pub fn applied(&self) -> Option<&AppliedMove> {
        match self {
            MoveOutcome::Applied(mv) => Some(mv),
            MoveOutcome::Rejected => None,
        }
    }

    /// 已执行走法的类型
    pub fn kind(&self) -> Option<MoveKind> {
        self.applied().map(|mv| mv.kind)
    }
}

/// 走法验证器
pub struct MoveValidator;

impl MoveValidator {
    /// 检查走法是否合法（不考虑走棋顺序）
    pub fn is_legal(state: &BoardState, piece: PieceId, to_rank: i32, to_file: i32) -> bool {
        Self::plan(state, piece, to_rank, to_file).is_ok()
    }

    /// 校验走法并给出执行计划
    pub(crate) fn plan(
        state: &BoardState,
        id: PieceId,
        to_rank: i32,
        to_file: i32,
    ) -> Result<PlannedMove, Rejection> {
        let piece = state.board.piece(id).ok_or(Rejection::UnknownPiece)?;
        let to = Self::check_destination(&state.board, piece, to_rank, to_file)?;
        let from = piece.square();
        let classified = Self::classify(state, piece, to, true).ok_or(Rejection::IllegalPattern)?;

        let occupied = state.board.occupant_at(to).map(|_| to);
        let mut planned = PlannedMove {
            piece: id,
            from,
            to,
            kind: MoveKind::Normal,
            capture_square: occupied,
            rook_move: None,
        };

        match classified {
            Classified::Plain => {}
            Classified::Castle(side) => {
                let step = (to.file() as i32 - from.file() as i32).signum();
                let rook_from = Square::new(from.rank() as i32, side.rook_file() as i32);
                let rook_to = from.offset(0, step);
                planned.kind = MoveKind::Castle;
                planned.rook_move = rook_from.zip(rook_to);
            }
            Classified::Pawn(PawnMove::EnPassant) => {
                planned.kind = MoveKind::EnPassant;
                planned.capture_square = Square::new(from.rank() as i32, to.file() as i32);
            }
            Classified::Pawn(_) => {
                if to.rank() == piece.color().promotion_rank() {
                    planned.kind = MoveKind::Promotion;
                }
            }
        }

        Ok(planned)
    }

    /// 列出棋子所有合法的目标格（按行优先顺序）
    pub fn legal_destinations(state: &BoardState, piece: PieceId) -> Vec<Square> {
        Square::all()
            .filter(|sq| Self::is_legal(state, piece, sq.rank() as i32, sq.file() as i32))
            .collect()
    }

    /// 检查 `color` 一方的格子是否受到对方任一棋子的威胁
    ///
    /// 对方棋子按普通走法规则判断能否走到该格；王只看走一格，不考虑易位。
    pub fn is_square_threatened(state: &BoardState, square: Square, color: Color) -> bool {
        state.board.pieces(color.opponent()).into_iter().any(|piece| {
            Self::check_destination(
                &state.board,
                piece,
                square.rank() as i32,
                square.file() as i32,
            )
            .is_ok()
                && Self::classify(state, piece, square, false).is_some()
        })
    }

    /// 通用前置检查：棋盘内、确实移动、目标格不是己方棋子
    fn check_destination(
        board: &Board,
        piece: &Piece,
        to_rank: i32,
        to_file: i32,
    ) -> Result<Square, Rejection> {
        let to = Square::new(to_rank, to_file).ok_or(Rejection::OffBoard)?;
        if to == piece.square() {
            return Err(Rejection::NoMovement);
        }
        if board
            .piece_at(to)
            .is_some_and(|target| target.color() == piece.color())
        {
            return Err(Rejection::OwnPieceOnTarget);
        }
        Ok(to)
    }

    /// 按兵种判断走法形态
    fn classify(
        state: &BoardState,
        piece: &Piece,
        to: Square,
        allow_castle: bool,
    ) -> Option<Classified> {
        let board = &state.board;
        let legal = match piece.kind() {
            PieceKind::King => {
                if Self::is_king_step(piece, to) {
                    true
                } else if allow_castle {
                    return Self::castle_side(state, piece, to).map(Classified::Castle);
                } else {
                    false
                }
            }
            PieceKind::Queen => Self::is_queen_move(board, piece, to),
            PieceKind::Bishop => Self::is_bishop_move(board, piece, to),
            PieceKind::Knight => Self::is_knight_move(piece, to),
            PieceKind::Rook => Self::is_rook_move(board, piece, to),
            PieceKind::Pawn => return Self::pawn_move(state, piece, to).map(Classified::Pawn),
        };
        legal.then_some(Classified::Plain)
    }

    fn deltas(piece: &Piece, to: Square) -> (i32, i32) {
        (
            to.rank() as i32 - piece.square().rank() as i32,
            to.file() as i32 - piece.square().file() as i32,
        )
    }

    fn is_king_step(king: &Piece, to: Square) -> bool {
        let (d_rank, d_file) = Self::deltas(king, to);
        d_rank.abs() <= 1 && d_file.abs() <= 1
    }

    /// 检查王车易位
    fn castle_side(state: &BoardState, king: &Piece, to: Square) -> Option<CastleSide> {
        let (d_rank, d_file) = Self::deltas(king, to);
        if d_rank != 0 {
            return None;
        }
        let side = CastleSide::from_file_delta(d_file)?;
        let board = &state.board;
        let from = king.square();

        let rook_square = Square::new(from.rank() as i32, side.rook_file() as i32)?;
        let rook = board.piece_at(rook_square)?;
        if rook.kind() != PieceKind::Rook || rook.color() != king.color() {
            return None;
        }

        // 王和车都必须从未离开过原位
        if !Self::never_left(state.history(), king.id(), from)
            || !Self::never_left(state.history(), rook.id(), rook_square)
        {
            return None;
        }

        let passed = from.offset(0, d_file.signum())?;
        if Self::is_square_threatened(state, from, king.color())
            || Self::is_square_threatened(state, passed, king.color())
        {
            return None;
        }

        Self::path_is_clear(board, from, rook_square).then_some(side)
    }

    /// 历史中每个快照的该格子都是这枚棋子
    fn never_left(history: &History, id: PieceId, square: Square) -> bool {
        history
            .iter()
            .rev()
            .all(|snapshot| snapshot.occupant(square) == Some(id))
    }

    fn is_queen_move(board: &Board, queen: &Piece, to: Square) -> bool {
        let (d_rank, d_file) = Self::deltas(queen, to);
        let straight = d_rank == 0 || d_file == 0;
        let diagonal = d_rank.abs() == d_file.abs();
        (straight || diagonal) && Self::path_is_clear(board, queen.square(), to)
    }

    fn is_bishop_move(board: &Board, bishop: &Piece, to: Square) -> bool {
        let (d_rank, d_file) = Self::deltas(bishop, to);
        d_rank.abs() == d_file.abs() && Self::path_is_clear(board, bishop.square(), to)
    }

    fn is_knight_move(knight: &Piece, to: Square) -> bool {
        let (d_rank, d_file) = Self::deltas(knight, to);
        matches!((d_rank.abs(), d_file.abs()), (1, 2) | (2, 1))
    }

    fn is_rook_move(board: &Board, rook: &Piece, to: Square) -> bool {
        let (d_rank, d_file) = Self::deltas(rook, to);
        (d_rank == 0) != (d_file == 0) && Self::path_is_clear(board, rook.square(), to)
    }

    /// 兵的走法分类
    pub fn pawn_move(state: &BoardState, pawn: &Piece, to: Square) -> Option<PawnMove> {
        let board = &state.board;
        let color = pawn.color();
        let step = color.pawn_direction();
        let from = pawn.square();
        let (d_rank, d_file) = Self::deltas(pawn, to);
        let target = board.piece_at(to);

        // 直进一格
        if d_rank == step && d_file == 0 && target.is_none() {
            return Some(PawnMove::Forward);
        }

        // 初始行直进两格，中间格也必须为空
        if from.rank() == color.pawn_start_rank()
            && d_rank == 2 * step
            && d_file == 0
            && target.is_none()
            && from
                .offset(step, 0)
                .is_some_and(|mid| board.occupant_at(mid).is_none())
        {
            return Some(PawnMove::DoubleStep);
        }

        if d_rank != step || d_file.abs() != 1 {
            return None;
        }

        // 斜进吃子
        if target.is_some_and(|t| t.color() != color) {
            return Some(PawnMove::Capture);
        }

        // 吃过路兵：旁边的敌兵必须是上一步刚从初始行走两格过来的
        if from.rank() != color.en_passant_rank() {
            return None;
        }
        let adjacent = board.piece_at(Square::new(from.rank() as i32, to.file() as i32)?)?;
        if adjacent.kind() != PieceKind::Pawn || adjacent.color() == color {
            return None;
        }
        let enemy_origin = Square::new(from.rank() as i32 + 2 * step, to.file() as i32)?;
        let before_last_ply = state.history().plies_ago(1)?;
        let just_double_stepped = before_last_ply.occupant(enemy_origin) == Some(adjacent.id());
        just_double_stepped.then_some(PawnMove::EnPassant)
    }

    /// 起点和终点之间（不含两端）的格子是否都为空
    ///
    /// 只对横、竖、斜线上的两点有意义。
    fn path_is_clear(board: &Board, from: Square, to: Square) -> bool {
        let d_rank = to.rank() as i32 - from.rank() as i32;
        let d_file = to.file() as i32 - from.file() as i32;
        let steps = d_rank.abs().max(d_file.abs());
        (1..steps).all(|i| {
            from.offset(i * d_rank.signum(), i * d_file.signum())
                .is_some_and(|sq| board.occupant_at(sq).is_none())
        })
    }
}
