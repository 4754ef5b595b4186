//! 规则常量定义

use crate::piece::PieceKind;

/// 棋盘边长（行数与列数相同）
pub const BOARD_SIZE: usize = 8;

/// 格子总数
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 最小行/列编号
pub const MIN_COORD: i32 = 1;

/// 最大行/列编号
pub const MAX_COORD: i32 = BOARD_SIZE as i32;

/// 后翼车所在列
pub const QUEEN_SIDE_ROOK_FILE: u8 = 1;

/// 王翼车所在列
pub const KING_SIDE_ROOK_FILE: u8 = 8;

/// 兵升变的目标兵种（不支持低升变）
pub const PROMOTION_KIND: PieceKind = PieceKind::Queen;

/// 底线棋子排列（从第 1 列到第 8 列）
pub const BACK_RANK: [PieceKind; BOARD_SIZE] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];
