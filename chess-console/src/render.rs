//! 棋盘与走法的文字显示

use chess_rules::{AppliedMove, Board, MoveKind, Square, BOARD_SIZE};

use crate::settings::ConsoleSettings;

/// 绘制棋盘，第 8 行在上；`highlights` 中的空格用 `*` 标出
pub fn render_board(board: &Board, settings: &ConsoleSettings, highlights: &[Square]) -> String {
    let mut output = String::new();

    for rank in (1..=BOARD_SIZE as i32).rev() {
        if settings.show_coordinates {
            output.push_str(&format!("{} ", rank));
        }
        for file in 1..=BOARD_SIZE as i32 {
            let Some(square) = Square::new(rank, file) else {
                continue;
            };
            let c = match board.piece_at(square) {
                Some(piece) if settings.unicode_pieces => piece.kind().symbol(piece.color()),
                Some(piece) => piece.to_fen_char(),
                None if highlights.contains(&square) => '*',
                None => '.',
            };
            output.push(c);
            output.push(' ');
        }
        // 去掉行尾空格
        output.pop();
        output.push('\n');
    }

    if settings.show_coordinates {
        output.push_str("  a b c d e f g h\n");
    }

    output
}

/// 描述已执行的走法
pub fn describe_move(mv: &AppliedMove) -> String {
    let kind = match mv.kind {
        MoveKind::Normal if mv.captured.is_some() => "吃子",
        MoveKind::Normal => "走子",
        MoveKind::Castle => "王车易位",
        MoveKind::EnPassant => "吃过路兵",
        MoveKind::Promotion => "升变",
    };
    let changed: Vec<String> = mv.changed.iter().map(Square::to_string).collect();
    format!("{} {}（变化的格子: {}）", kind, mv, changed.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_rules::{Game, MoveOutcome};

    fn sq(rank: i32, file: i32) -> Square {
        Square::new(rank, file).unwrap()
    }

    #[test]
    fn test_render_initial_board() {
        let text = render_board(&Board::initial(), &ConsoleSettings::default(), &[]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8 r n b q k b n r");
        assert_eq!(lines[4], "4 . . . . . . . .");
        assert_eq!(lines[8], "  a b c d e f g h");
    }

    #[test]
    fn test_render_unicode_without_coordinates() {
        let settings = ConsoleSettings {
            unicode_pieces: true,
            show_coordinates: false,
            ..ConsoleSettings::default()
        };
        let text = render_board(&Board::initial(), &settings, &[sq(3, 1)]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[7], "♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖");
        assert_eq!(lines[5], "* . . . . . . .");
    }

    #[test]
    fn test_describe_move() {
        let mut game = Game::new();
        let pawn = game.board().occupant_at(sq(2, 5)).unwrap();
        let MoveOutcome::Applied(mv) = game.attempt_move(pawn, 4, 5) else {
            panic!("e2-e4 should be legal");
        };
        assert_eq!(describe_move(&mv), "走子 e2-e4（变化的格子: e2 e4）");
    }
}
