//! 走法通知

use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;

use chess_rules::{AppliedMove, MoveObserver, PieceId};
use tracing::{debug, info};

/// 控制台通知：记录日志，按设置响铃
pub struct ConsoleNotifier {
    /// 与会话共享，`set bell` 立即生效
    bell: Rc<Cell<bool>>,
}

impl ConsoleNotifier {
    pub fn new(bell: Rc<Cell<bool>>) -> Self {
        Self { bell }
    }

    /// 写出响铃字符，失败时记录日志并返回 `false`
    fn ring(out: &mut impl Write) -> bool {
        match out.write_all(b"\x07").and_then(|_| out.flush()) {
            Ok(()) => true,
            Err(e) => {
                debug!("响铃失败: {}", e);
                false
            }
        }
    }
}

impl MoveObserver for ConsoleNotifier {
    fn on_move_applied(&mut self, mv: &AppliedMove) {
        info!(kind = ?mv.kind, "走子完成: {}", mv);
        if self.bell.get() {
            Self::ring(&mut io::stdout());
        }
    }

    fn on_move_rejected(&mut self, piece: PieceId) {
        debug!(%piece, "棋子退回原位");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_ring_writes_bell() {
        let mut out = Vec::new();
        assert!(ConsoleNotifier::ring(&mut out));
        assert_eq!(out, b"\x07");
    }

    #[test]
    fn test_ring_failure_is_reported() {
        assert!(!ConsoleNotifier::ring(&mut BrokenPipe));
    }
}
