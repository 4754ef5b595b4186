//! FEN 摆子解析和生成
//!
//! 只处理 FEN 的第一段（棋盘摆子），例如：
//! `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR`
//!
//! 走子方、易位权、过路兵等后续字段会被忽略。

use crate::board::Board;
use crate::constants::BOARD_SIZE;
use crate::error::{ChessError, Result};
use crate::piece::{PieceKind, Square};

/// 初始局面的摆子
pub const INITIAL_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// FEN 格式处理
pub struct Fen;

impl Fen {
    /// 解析摆子为棋盘
    ///
    /// 可以传入完整的 FEN，只读取第一段。棋子身份按从第 8 行到第 1 行、
    /// 从 a 列到 h 列的顺序分配。
    pub fn parse_board(fen: &str) -> Result<Board> {
        let placement = fen.split_whitespace().next().ok_or_else(|| ChessError::InvalidFen {
            reason: "Empty FEN string".to_string(),
        })?;

        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != BOARD_SIZE {
            return Err(ChessError::InvalidFen {
                reason: format!("Expected {} ranks, got {}", BOARD_SIZE, rows.len()),
            });
        }

        let mut board = Board::empty();

        // FEN 从上到下是第 8 行到第 1 行
        for (row_idx, row) in rows.iter().enumerate() {
            let rank = (BOARD_SIZE - row_idx) as i32;
            let mut file = 1i32;

            for c in row.chars() {
                if let Some(empty_count) = c.to_digit(10) {
                    if empty_count == 0 {
                        return Err(ChessError::InvalidFen {
                            reason: format!("Rank {} has a zero skip count", rank),
                        });
                    }
                    file += empty_count as i32;
                } else if let Some((kind, color)) = PieceKind::from_fen_char(c) {
                    let square = Square::new(rank, file).ok_or_else(|| ChessError::InvalidFen {
                        reason: format!("Rank {} has too many files", rank),
                    })?;
                    board.spawn(kind, color, square)?;
                    file += 1;
                } else {
                    return Err(ChessError::InvalidFen {
                        reason: format!("Invalid piece character: {}", c),
                    });
                }
            }

            if file != BOARD_SIZE as i32 + 1 {
                return Err(ChessError::InvalidFen {
                    reason: format!("Rank {} has {} files, expected {}", rank, file - 1, BOARD_SIZE),
                });
            }
        }

        Ok(board)
    }

    /// 将棋盘转换为 FEN 摆子
    pub fn board_to_string(board: &Board) -> String {
        let mut rows = Vec::with_capacity(BOARD_SIZE);

        for rank in (1..=BOARD_SIZE as u8).rev() {
            let mut row = String::new();
            let mut empty_count = 0;

            for file in 1..=BOARD_SIZE as u8 {
                if let Some(piece) = board.piece_at(Square::new_unchecked(rank, file)) {
                    if empty_count > 0 {
                        row.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row.push(piece.to_fen_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                row.push_str(&empty_count.to_string());
            }

            rows.push(row);
        }

        rows.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Color;

    fn sq(rank: i32, file: i32) -> Square {
        Square::new(rank, file).unwrap()
    }

    #[test]
    fn test_parse_initial_placement() {
        let board = Fen::parse_board(INITIAL_PLACEMENT).unwrap();
        assert_eq!(board.piece_count(), 32);

        let king = board.piece_at(sq(1, 5)).unwrap();
        assert_eq!((king.kind(), king.color()), (PieceKind::King, Color::White));

        let queen = board.piece_at(sq(8, 4)).unwrap();
        assert_eq!((queen.kind(), queen.color()), (PieceKind::Queen, Color::Black));

        // 和标准开局的摆子一致
        assert_eq!(board.to_string(), Board::initial().to_string());
    }

    #[test]
    fn test_board_to_string_initial() {
        assert_eq!(Fen::board_to_string(&Board::initial()), INITIAL_PLACEMENT);
    }

    #[test]
    fn test_parse_full_fen_ignores_trailing_fields() {
        let board = Fen::parse_board("4k3/8/8/3pP3/8/8/8/4K2R w K d6 0 1").unwrap();
        assert_eq!(board.piece_count(), 5);
        assert_eq!(board.piece_at(sq(5, 4)).unwrap().color(), Color::Black);
        assert_eq!(board.piece_at(sq(1, 8)).unwrap().kind(), PieceKind::Rook);
        assert_eq!(Fen::board_to_string(&board), "4k3/8/8/3pP3/8/8/8/4K2R");
    }

    #[test]
    fn test_invalid_fen() {
        // 空串
        assert!(Fen::parse_board("   ").is_err());

        // 行数不对
        assert!(Fen::parse_board("8/8/8").is_err());

        // 列数不对
        assert!(Fen::parse_board("4k4/8/8/8/8/8/8/4K3").is_err());
        assert!(Fen::parse_board("4k2/8/8/8/8/8/8/4K3").is_err());

        // 无效字符
        assert!(matches!(
            Fen::parse_board("4x3/8/8/8/8/8/8/4K3"),
            Err(ChessError::InvalidFen { .. })
        ));
    }
}
