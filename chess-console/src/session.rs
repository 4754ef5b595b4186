//! 控制台对局会话

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use chess_rules::{Game, GameRecord, MoveOutcome, Square};
use tracing::info;

use crate::command::{Command, HELP};
use crate::notifier::ConsoleNotifier;
use crate::render::{describe_move, render_board};
use crate::settings::ConsoleSettings;

/// 命令执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// 输出文字，继续读取命令
    Output(String),
    Quit,
}

/// 一局控制台对局
pub struct Session {
    game: Game,
    settings: ConsoleSettings,
    /// `set` 写回的位置，`None` 时只在本次运行生效
    settings_path: Option<PathBuf>,
    bell: Rc<Cell<bool>>,
}

impl Session {
    pub fn new(settings: ConsoleSettings, settings_path: Option<PathBuf>) -> Self {
        let bell = Rc::new(Cell::new(settings.bell_on_move));
        let game = Self::attach(Game::with_config(settings.rules()), &bell);
        Self {
            game,
            settings,
            settings_path,
            bell,
        }
    }

    fn attach(mut game: Game, bell: &Rc<Cell<bool>>) -> Game {
        game.add_observer(Box::new(ConsoleNotifier::new(Rc::clone(bell))));
        game
    }

    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    /// 修改设置，立即应用并写回设置文件
    fn update_setting(&mut self, key: &str, value: &str) -> Result<String> {
        self.settings.set(key, value)?;
        self.bell.set(self.settings.bell_on_move);
        self.game.set_config(self.settings.rules());

        match &self.settings_path {
            Some(path) => {
                self.settings
                    .write(path)
                    .with_context(|| format!("保存设置失败: {}", path.display()))?;
                info!(key, value, "设置已保存");
                Ok(format!("{} = {}，已保存到 {}", key, value, path.display()))
            }
            None => Ok(format!("{} = {}（找不到配置目录，未保存）", key, value)),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// 当前棋盘
    pub fn board_text(&self) -> String {
        render_board(self.game.board(), &self.settings, &[])
    }

    /// 执行一条命令
    pub fn execute(&mut self, command: Command) -> Result<Reply> {
        let output = match command {
            Command::Move { from, to } => {
                let piece = self
                    .game
                    .board()
                    .occupant_at(from)
                    .with_context(|| format!("{} 上没有棋子", from))?;
                match self.game.attempt_move(piece, to.rank, to.file) {
                    MoveOutcome::Applied(mv) => {
                        format!("{}\n{}", describe_move(&mv), self.board_text())
                    }
                    MoveOutcome::Rejected => format!("非法走法，棋子退回 {}", from),
                }
            }
            Command::Moves(square) => {
                let piece = self
                    .game
                    .board()
                    .occupant_at(square)
                    .with_context(|| format!("{} 上没有棋子", square))?;
                let targets = self.game.legal_destinations(piece);
                if targets.is_empty() {
                    format!("{} 没有合法走法", square)
                } else {
                    let names: Vec<String> = targets.iter().map(Square::to_string).collect();
                    format!(
                        "{}\n{}",
                        names.join(" "),
                        render_board(self.game.board(), &self.settings, &targets)
                    )
                }
            }
            Command::History => {
                let record = self.record();
                if record.moves.is_empty() {
                    "还没有走法".to_string()
                } else {
                    record.to_move_list()
                }
            }
            Command::Save(path) => {
                self.record()
                    .save(&path)
                    .with_context(|| format!("保存棋谱失败: {}", path.display()))?;
                format!("棋谱已保存: {}", path.display())
            }
            Command::Load(path) => {
                let record = GameRecord::load(&path)
                    .with_context(|| format!("读取棋谱失败: {}", path.display()))?;
                let game = record.replay().context("回放棋谱失败")?;
                self.game = Self::attach(game, &self.bell);
                info!(moves = record.moves.len(), "已读取棋谱");
                format!("已读取 {} 步\n{}", record.moves.len(), self.board_text())
            }
            Command::Set { key, value } => self.update_setting(&key, &value)?,
            Command::Board => self.board_text(),
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Output(output))
    }

    fn record(&self) -> GameRecord {
        GameRecord::from_game(&self.game, "White".to_string(), "Black".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_rules::MoveKind;
    use tempfile::TempDir;

    fn run(session: &mut Session, line: &str) -> Result<Reply> {
        let command = Command::parse(line)?.expect("non-empty command");
        session.execute(command)
    }

    fn output(session: &mut Session, line: &str) -> String {
        match run(session, line).unwrap() {
            Reply::Output(text) => text,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_move_and_reject() {
        let mut session = Session::new(ConsoleSettings::default(), None);

        let text = output(&mut session, "e2 e4");
        assert!(text.starts_with("走子 e2-e4"));
        assert_eq!(session.game().moves().len(), 1);

        let text = output(&mut session, "8,4 6,5");
        assert_eq!(text, "非法走法，棋子退回 d8");

        let text = output(&mut session, "b1 0,9");
        assert_eq!(text, "非法走法，棋子退回 b1");
        assert_eq!(session.game().history().len(), 2);
    }

    #[test]
    fn test_move_from_empty_square() {
        let mut session = Session::new(ConsoleSettings::default(), None);
        assert!(run(&mut session, "e4 e5").is_err());
    }

    #[test]
    fn test_moves_lists_targets() {
        let mut session = Session::new(ConsoleSettings::default(), None);
        let text = output(&mut session, "moves g1");
        assert!(text.starts_with("f3 h3"));
        assert_eq!(output(&mut session, "moves a1"), "a1 没有合法走法");
    }

    #[test]
    fn test_history_and_quit() {
        let mut session = Session::new(ConsoleSettings::default(), None);
        assert_eq!(output(&mut session, "history"), "还没有走法");
        output(&mut session, "e2 e4");
        output(&mut session, "e7 e5");
        assert_eq!(output(&mut session, "history"), "1. e2-e4  e7-e5\n");
        assert_eq!(run(&mut session, "quit").unwrap(), Reply::Quit);
    }

    #[test]
    fn test_turn_order_setting() {
        let settings = ConsoleSettings {
            enforce_turn_order: true,
            ..ConsoleSettings::default()
        };
        let mut session = Session::new(settings, None);
        assert!(output(&mut session, "e7 e5").starts_with("非法走法"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("game.json");

        let mut session = Session::new(ConsoleSettings::default(), None);
        output(&mut session, "d7 d5");
        output(&mut session, "d5 d4");
        output(&mut session, "e2 e4");
        assert!(output(&mut session, "d4 e3").starts_with("吃过路兵"));
        output(&mut session, &format!("save {}", path.display()));

        let mut restored = Session::new(ConsoleSettings::default(), None);
        let text = output(&mut restored, &format!("load {}", path.display()));
        assert!(text.starts_with("已读取 4 步"));
        assert_eq!(restored.board_text(), session.board_text());
        assert_eq!(restored.game().moves()[3].kind, MoveKind::EnPassant);
    }

    #[test]
    fn test_set_persists_and_applies() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chess-console").join("settings.json");
        let mut session = Session::new(ConsoleSettings::default(), Some(path.clone()));

        let text = output(&mut session, "set turn-order on");
        assert!(text.starts_with("turn-order = on"));
        assert!(session.game().config().enforce_turn_order);
        assert!(output(&mut session, "e7 e5").starts_with("非法走法"));

        output(&mut session, "set unicode on");
        assert!(session.board_text().contains('♔'));

        let saved = ConsoleSettings::load_or_default(Some(&path));
        assert_eq!(&saved, session.settings());
        assert!(saved.enforce_turn_order);
        assert!(saved.unicode_pieces);
    }

    #[test]
    fn test_set_invalid_leaves_settings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        let mut session = Session::new(ConsoleSettings::default(), Some(path.clone()));

        assert!(run(&mut session, "set bell loud").is_err());
        assert!(run(&mut session, "set volume on").is_err());
        assert_eq!(session.settings(), &ConsoleSettings::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_set_without_config_dir() {
        let mut session = Session::new(ConsoleSettings::default(), None);
        assert!(output(&mut session, "set bell on").contains("未保存"));
        assert!(session.settings().bell_on_move);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = Session::new(ConsoleSettings::default(), None);
        let line = format!("load {}", temp_dir.path().join("missing.json").display());
        assert!(run(&mut session, &line).is_err());
    }
}
