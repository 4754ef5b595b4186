//! 棋子与格子定义

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZE, MAX_COORD, MIN_COORD, SQUARE_COUNT};
use crate::error::ChessError;

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl PieceKind {
    /// 获取 FEN 字符（白方大写，黑方小写）
    pub fn to_fen_char(&self, color: Color) -> char {
        let c = match self {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Rook => 'r',
            PieceKind::Pawn => 'p',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'r' => PieceKind::Rook,
            'p' => PieceKind::Pawn,
            _ => return None,
        };
        Some((kind, color))
    }

    /// 获取 Unicode 棋子符号
    pub fn symbol(&self, color: Color) -> char {
        match (self, color) {
            (PieceKind::King, Color::White) => '♔',
            (PieceKind::Queen, Color::White) => '♕',
            (PieceKind::Rook, Color::White) => '♖',
            (PieceKind::Bishop, Color::White) => '♗',
            (PieceKind::Knight, Color::White) => '♘',
            (PieceKind::Pawn, Color::White) => '♙',
            (PieceKind::King, Color::Black) => '♚',
            (PieceKind::Queen, Color::Black) => '♛',
            (PieceKind::Rook, Color::Black) => '♜',
            (PieceKind::Bishop, Color::Black) => '♝',
            (PieceKind::Knight, Color::Black) => '♞',
            (PieceKind::Pawn, Color::Black) => '♟',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::King => "King",
            PieceKind::Queen => "Queen",
            PieceKind::Bishop => "Bishop",
            PieceKind::Knight => "Knight",
            PieceKind::Rook => "Rook",
            PieceKind::Pawn => "Pawn",
        };
        f.pad(name)
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// 白方（先手，在第 1、2 行）
    White,
    /// 黑方（后手，在第 7、8 行）
    Black,
}

impl Color {
    /// 获取对方阵营
    pub fn opponent(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 兵的前进方向（行号增量）
    pub fn pawn_direction(&self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// 底线所在行
    pub fn back_rank(&self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 8,
        }
    }

    /// 兵的初始行（可以走两步的行）
    pub fn pawn_start_rank(&self) -> u8 {
        match self {
            Color::White => 2,
            Color::Black => 7,
        }
    }

    /// 吃过路兵时本方兵必须所在的行（第五行）
    pub fn en_passant_rank(&self) -> u8 {
        match self {
            Color::White => 5,
            Color::Black => 4,
        }
    }

    /// 兵的升变行
    pub fn promotion_rank(&self) -> u8 {
        match self {
            Color::White => 8,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Color::White => "White",
            Color::Black => "Black",
        })
    }
}

/// 棋子身份
///
/// 从摆子到被吃掉始终不变，升变也不改变身份。历史快照只记录身份。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub(crate) u16);

impl PieceId {
    /// 内部编号
    pub fn index(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 棋子
///
/// 所在格子是缓存字段，只能通过 `Board::place` 修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    color: Color,
    square: Square,
}

impl Piece {
    pub(crate) fn new(id: PieceId, kind: PieceKind, color: Color, square: Square) -> Self {
        Self {
            id,
            kind,
            color,
            square,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// 当前所在格子
    pub fn square(&self) -> Square {
        self.square
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        self.kind.to_fen_char(self.color)
    }

    pub(crate) fn set_square(&mut self, square: Square) {
        self.square = square;
    }

    pub(crate) fn set_kind(&mut self, kind: PieceKind) {
        self.kind = kind;
    }
}

/// 棋盘格子
///
/// 行、列编号均为 1-8，无法构造出棋盘外的格子。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    /// 创建新格子，超出棋盘返回 `None`
    pub fn new(rank: i32, file: i32) -> Option<Self> {
        if Self::in_range(rank, file) {
            Some(Self {
                rank: rank as u8,
                file: file as u8,
            })
        } else {
            None
        }
    }

    /// 创建新格子（不检查边界，内部使用）
    pub(crate) const fn new_unchecked(rank: u8, file: u8) -> Self {
        Self { rank, file }
    }

    /// 检查坐标是否在棋盘内
    pub fn in_range(rank: i32, file: i32) -> bool {
        (MIN_COORD..=MAX_COORD).contains(&rank) && (MIN_COORD..=MAX_COORD).contains(&file)
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    /// 获取偏移后的格子
    pub fn offset(&self, d_rank: i32, d_file: i32) -> Option<Square> {
        Self::new(self.rank as i32 + d_rank, self.file as i32 + d_file)
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> usize {
        (self.rank as usize - 1) * BOARD_SIZE + (self.file as usize - 1)
    }

    /// 按行优先顺序遍历全部 64 个格子
    pub fn all() -> impl Iterator<Item = Square> {
        (0..SQUARE_COUNT).map(|index| {
            Square::new_unchecked((index / BOARD_SIZE) as u8 + 1, (index % BOARD_SIZE) as u8 + 1)
        })
    }
}

impl TryFrom<(u8, u8)> for Square {
    type Error = ChessError;

    fn try_from((rank, file): (u8, u8)) -> Result<Self, Self::Error> {
        Square::new(rank as i32, file as i32).ok_or(ChessError::InvalidSquare {
            rank: rank as i32,
            file: file as i32,
        })
    }
}

impl From<Square> for (u8, u8) {
    fn from(square: Square) -> Self {
        (square.rank, square.file)
    }
}

/// 代数记号，如 `e4` 表示第 4 行第 5 列
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file - 1) as char;
        write!(f, "{}{}", file, self.rank)
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChessError::InvalidNotation {
            text: s.to_string(),
        };
        let mut chars = s.trim().chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            return Err(invalid());
        }
        let rank = rank.to_digit(10).ok_or_else(invalid)? as i32;
        Square::new(rank, (file as u8 - b'a') as i32 + 1).ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_valid() {
        assert!(Square::new(1, 1).is_some());
        assert!(Square::new(8, 8).is_some());
        assert!(Square::new(0, 5).is_none());
        assert!(Square::new(5, 9).is_none());
        assert!(Square::new(-3, 4).is_none());
    }

    #[test]
    fn test_square_index() {
        assert_eq!(Square::new(4, 5).unwrap().to_index(), 28);
        assert_eq!(Square::all().count(), 64);
        assert_eq!(Square::all().next(), Square::new(1, 1));
        assert!(Square::all().enumerate().all(|(i, sq)| sq.to_index() == i));
    }

    #[test]
    fn test_square_notation() {
        let e4 = Square::new(4, 5).unwrap();
        assert_eq!(e4.to_string(), "e4");
        assert_eq!("e4".parse::<Square>(), Ok(e4));
        assert_eq!("A1".parse::<Square>().ok(), Square::new(1, 1));
        assert!("i1".parse::<Square>().is_err());
        assert!("e9".parse::<Square>().is_err());
        assert!("e44".parse::<Square>().is_err());
    }

    #[test]
    fn test_square_offset() {
        let a1 = Square::new(1, 1).unwrap();
        assert_eq!(a1.offset(1, 2), Square::new(2, 3));
        assert!(a1.offset(-1, 0).is_none());
    }

    #[test]
    fn test_square_serde_rejects_off_board() {
        let json = serde_json::to_string(&Square::new(2, 7).unwrap()).unwrap();
        assert_eq!(json, "[2,7]");
        assert!(serde_json::from_str::<Square>("[9,1]").is_err());
    }

    #[test]
    fn test_piece_fen_char() {
        assert_eq!(PieceKind::King.to_fen_char(Color::White), 'K');
        assert_eq!(PieceKind::Knight.to_fen_char(Color::Black), 'n');
        assert_eq!(PieceKind::from_fen_char('Q'), Some((PieceKind::Queen, Color::White)));
        assert_eq!(PieceKind::from_fen_char('p'), Some((PieceKind::Pawn, Color::Black)));
        assert_eq!(PieceKind::from_fen_char('x'), None);
    }

    #[test]
    fn test_color_ranks() {
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::White.pawn_direction(), 1);
        assert_eq!(Color::Black.pawn_direction(), -1);
        assert_eq!(Color::White.en_passant_rank(), 5);
        assert_eq!(Color::Black.en_passant_rank(), 4);
        assert_eq!(Color::Black.promotion_rank(), 1);
    }
}
