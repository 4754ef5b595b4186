//! 控制台命令解析

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chess_rules::Square;

/// 走子目标，数字形式允许超出棋盘
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub rank: i32,
    pub file: i32,
}

impl From<Square> for Target {
    fn from(square: Square) -> Self {
        Self {
            rank: square.rank() as i32,
            file: square.file() as i32,
        }
    }
}

/// 控制台命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 走子：`e2 e4` 或 `2,5 4,5`
    Move { from: Square, to: Target },
    /// 列出合法目标格
    Moves(Square),
    /// 显示走法记录
    History,
    /// 保存棋谱
    Save(PathBuf),
    /// 读取棋谱
    Load(PathBuf),
    /// 修改并保存设置：`set unicode on`
    Set { key: String, value: String },
    /// 重新显示棋盘
    Board,
    Help,
    Quit,
}

/// 命令帮助
pub const HELP: &str = "\
命令:
  <起点> <终点>   走子，格子写作 e2 或 rank,file（如 2,5）
  moves <格子>    列出该棋子的合法目标格
  history         显示走法记录
  save <路径>     保存棋谱
  load <路径>     读取棋谱并回放
  set <项> on|off  修改设置（unicode coordinates bell turn-order）
  board           显示棋盘
  help            显示帮助
  quit            退出";

impl Command {
    /// 解析一行输入，空行返回 `None`
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match (head.to_ascii_lowercase().as_str(), args) {
            ("help" | "?", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            ("board", []) => Command::Board,
            ("history", []) => Command::History,
            ("moves", [square]) => Command::Moves(parse_square(square)?),
            ("save", [path]) => Command::Save(PathBuf::from(path)),
            ("load", [path]) => Command::Load(PathBuf::from(path)),
            ("set", [key, value]) => Command::Set {
                key: key.to_ascii_lowercase(),
                value: value.to_string(),
            },
            (_, [to]) => Command::Move {
                from: parse_square(head)?,
                to: parse_target(to)?,
            },
            _ => bail!("无法识别的命令: {}", line.trim()),
        };

        Ok(Some(command))
    }
}

/// 解析棋盘内的格子
fn parse_square(text: &str) -> Result<Square> {
    let target = parse_target(text)?;
    Square::new(target.rank, target.file).ok_or_else(|| anyhow!("格子不在棋盘上: {}", text))
}

/// 解析走子目标，`rank,file` 形式不检查范围
fn parse_target(text: &str) -> Result<Target> {
    match text.split_once(',') {
        Some((rank, file)) => {
            let rank = rank
                .trim()
                .parse()
                .with_context(|| format!("无效的行号: {}", text))?;
            let file = file
                .trim()
                .parse()
                .with_context(|| format!("无效的列号: {}", text))?;
            Ok(Target { rank, file })
        }
        None => {
            let square: Square = text.parse()?;
            Ok(square.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(rank: i32, file: i32) -> Square {
        Square::new(rank, file).unwrap()
    }

    #[test]
    fn test_parse_algebraic_move() {
        assert_eq!(
            Command::parse("e2 e4").unwrap(),
            Some(Command::Move {
                from: sq(2, 5),
                to: Target { rank: 4, file: 5 },
            })
        );
    }

    #[test]
    fn test_parse_numeric_move_out_of_range() {
        assert_eq!(
            Command::parse("1,2 0,9").unwrap(),
            Some(Command::Move {
                from: sq(1, 2),
                to: Target { rank: 0, file: 9 },
            })
        );
        // 起点必须在棋盘上
        assert!(Command::parse("0,1 3,3").is_err());
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(Command::parse("  ").unwrap(), None);
        assert_eq!(Command::parse("HELP").unwrap(), Some(Command::Help));
        assert_eq!(Command::parse("quit").unwrap(), Some(Command::Quit));
        assert_eq!(Command::parse("history").unwrap(), Some(Command::History));
        assert_eq!(Command::parse("moves g1").unwrap(), Some(Command::Moves(sq(1, 7))));
        assert_eq!(
            Command::parse("save game.json").unwrap(),
            Some(Command::Save(PathBuf::from("game.json")))
        );
        assert_eq!(
            Command::parse("set Bell on").unwrap(),
            Some(Command::Set {
                key: "bell".to_string(),
                value: "on".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("e2").is_err());
        assert!(Command::parse("z9 e4").is_err());
        assert!(Command::parse("e2 x,4").is_err());
        assert!(Command::parse("moves").is_err());
        assert!(Command::parse("board now").is_err());
    }
}
