//! 棋盘状态

use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;

use crate::constants::{BACK_RANK, BOARD_SIZE, SQUARE_COUNT};
use crate::error::{ChessError, Result};
use crate::history::{History, Snapshot};
use crate::piece::{Color, Piece, PieceId, PieceKind, Square};

/// 棋盘
///
/// 64 个格子保存棋子身份，棋子本身保存在 `pieces` 中。
/// 所有格子写入都经过 [`Board::place`]，它同时维护棋子记录的所在格子。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// 8x8 棋盘，索引为 (rank - 1) * 8 + (file - 1)
    cells: [Option<PieceId>; SQUARE_COUNT],
    /// 仍在棋盘上的棋子
    pieces: BTreeMap<PieceId, Piece>,
    next_id: u16,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            cells: [None; SQUARE_COUNT],
            pieces: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// 创建初始棋盘
    pub fn initial() -> Self {
        let mut board = Self::empty();

        for color in [Color::White, Color::Black] {
            // 底线：车马象后王象马车
            for (file, kind) in BACK_RANK.iter().enumerate() {
                let square = Square::new_unchecked(color.back_rank(), file as u8 + 1);
                board.insert_piece(*kind, color, square);
            }
            for file in 1..=BOARD_SIZE as u8 {
                let square = Square::new_unchecked(color.pawn_start_rank(), file);
                board.insert_piece(PieceKind::Pawn, color, square);
            }
        }

        board
    }

    /// 在空格上摆放新棋子
    pub fn spawn(&mut self, kind: PieceKind, color: Color, square: Square) -> Result<PieceId> {
        if self.occupant_at(square).is_some() {
            return Err(ChessError::SquareOccupied { square });
        }
        Ok(self.insert_piece(kind, color, square))
    }

    fn insert_piece(&mut self, kind: PieceKind, color: Color, square: Square) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        self.pieces.insert(id, Piece::new(id, kind, color, square));
        self.place(square, Some(id));
        id
    }

    /// 获取指定格子的棋子身份
    pub fn occupant_at(&self, square: Square) -> Option<PieceId> {
        self.cells[square.to_index()]
    }

    /// 获取指定格子的棋子
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.occupant_at(square).and_then(|id| self.pieces.get(&id))
    }

    /// 按身份获取棋子，已被吃掉的棋子返回 `None`
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    /// 设置指定格子的棋子
    ///
    /// 放入棋子时更新其所在格子，并清空它原来的格子；
    /// 被挤掉的其他棋子（以及 `None` 清掉的棋子）离开棋盘。
    pub fn place(&mut self, square: Square, occupant: Option<PieceId>) {
        let index = square.to_index();

        if let Some(id) = occupant {
            if !self.pieces.contains_key(&id) {
                trace!(piece = %id, %square, "忽略不在棋盘上的棋子");
                return;
            }
        }

        if let Some(previous) = self.cells[index] {
            if Some(previous) != occupant {
                self.pieces.remove(&previous);
                trace!(piece = %previous, %square, "棋子离开棋盘");
            }
        }

        if let Some(piece) = occupant.and_then(|id| self.pieces.get_mut(&id)) {
            let origin = piece.square();
            piece.set_square(square);
            if origin != square && self.cells[origin.to_index()] == Some(piece.id()) {
                self.cells[origin.to_index()] = None;
            }
        }

        self.cells[index] = occupant;
    }

    /// 吃掉指定格子的棋子
    pub fn capture(&mut self, square: Square) -> Option<PieceId> {
        let captured = self.occupant_at(square)?;
        self.place(square, None);
        Some(captured)
    }

    /// 原地改变棋子类型（升变），身份不变
    pub fn promote(&mut self, id: PieceId, kind: PieceKind) -> bool {
        match self.pieces.get_mut(&id) {
            Some(piece) => {
                piece.set_kind(kind);
                true
            }
            None => false,
        }
    }

    /// 复制当前格子（只复制身份）
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_cells(self.cells)
    }

    /// 获取指定阵营的所有棋子（按行优先顺序）
    pub fn pieces(&self, color: Color) -> Vec<&Piece> {
        self.all_pieces()
            .into_iter()
            .filter(|piece| piece.color() == color)
            .collect()
    }

    /// 获取所有棋子（按行优先顺序）
    pub fn all_pieces(&self) -> Vec<&Piece> {
        Square::all().filter_map(|sq| self.piece_at(sq)).collect()
    }

    /// 棋盘上的棋子数
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

/// 第 8 行在上，空格用 `.` 表示
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (1..=BOARD_SIZE as u8).rev() {
            let row: String = (1..=BOARD_SIZE as u8)
                .map(|file| {
                    self.piece_at(Square::new_unchecked(rank, file))
                        .map_or('.', |piece| piece.to_fen_char())
                })
                .collect();
            writeln!(f, "{} {}", rank, row)?;
        }
        write!(f, "  abcdefgh")
    }
}

/// 规则引擎读取的完整状态：棋盘与历史
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    /// 棋盘
    pub board: Board,
    /// 历史快照，首项为初始局面
    history: History,
}

impl BoardState {
    /// 创建初始状态
    pub fn initial() -> Self {
        Self::from_board(Board::initial())
    }

    /// 从棋盘创建状态，当前局面作为历史的第一项
    pub fn from_board(board: Board) -> Self {
        let history = History::new(board.snapshot());
        Self { board, history }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// 把当前局面追加到历史
    pub fn record_snapshot(&mut self) {
        self.history.push(self.board.snapshot());
        trace!(plies = self.history.plies(), "记录快照");
    }

    /// 轮到走棋的一方（已完成步数为偶数时白方走）
    pub fn side_to_move(&self) -> Color {
        if self.history.plies() % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::initial()
    }
}
