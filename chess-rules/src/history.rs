//! 棋盘历史快照

use crate::constants::SQUARE_COUNT;
use crate::piece::{PieceId, Square};

/// 某一步之后的棋盘快照
///
/// 只复制格子里的棋子身份，不复制棋子本身。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    cells: [Option<PieceId>; SQUARE_COUNT],
}

impl Snapshot {
    pub(crate) fn from_cells(cells: [Option<PieceId>; SQUARE_COUNT]) -> Self {
        Self { cells }
    }

    /// 获取快照中指定格子的棋子
    pub fn occupant(&self, square: Square) -> Option<PieceId> {
        self.cells[square.to_index()]
    }

    /// 快照中棋子的个数
    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}

/// 只追加的快照序列，第一项是开局局面
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    snapshots: Vec<Snapshot>,
}

impl History {
    /// 以初始局面创建历史
    pub fn new(initial: Snapshot) -> Self {
        Self {
            snapshots: vec![initial],
        }
    }

    /// 追加快照
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// 已完成的步数（不含初始局面）
    pub fn plies(&self) -> usize {
        self.snapshots.len().saturating_sub(1)
    }

    /// 最新的快照
    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// 倒数第 `n + 1` 个快照，`plies_ago(0)` 即最新快照
    pub fn plies_ago(&self, n: usize) -> Option<&Snapshot> {
        let len = self.snapshots.len();
        if n < len {
            self.snapshots.get(len - 1 - n)
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Snapshot> {
        self.snapshots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(square: Square, id: u16) -> Snapshot {
        let mut cells = [None; SQUARE_COUNT];
        cells[square.to_index()] = Some(PieceId(id));
        Snapshot::from_cells(cells)
    }

    #[test]
    fn test_history_plies_ago() {
        let e2 = Square::new(2, 5).unwrap();
        let e4 = Square::new(4, 5).unwrap();

        let mut history = History::new(snapshot_with(e2, 1));
        history.push(snapshot_with(e4, 1));

        assert_eq!(history.len(), 2);
        assert_eq!(history.plies(), 1);
        assert_eq!(history.plies_ago(0).unwrap().occupant(e4), Some(PieceId(1)));
        assert_eq!(history.plies_ago(1).unwrap().occupant(e2), Some(PieceId(1)));
        assert!(history.plies_ago(2).is_none());
    }

    #[test]
    fn test_snapshot_piece_count() {
        let snapshot = snapshot_with(Square::new(1, 1).unwrap(), 0);
        assert_eq!(snapshot.piece_count(), 1);
        assert_eq!(snapshot.occupant(Square::new(1, 2).unwrap()), None);
    }
}
