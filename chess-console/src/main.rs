use std::io::{self, BufRead, Write};

use anyhow::Result;
use chess_console::{Command, ConsoleSettings, Reply, Session, HELP};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let settings_path = ConsoleSettings::default_path();
    let settings = ConsoleSettings::load_or_default(settings_path.as_deref());

    // 初始化日志，RUST_LOG 未设置时使用设置中的过滤
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&settings.log_filter))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    info!("国际象棋控制台启动");

    let mut session = Session::new(settings, settings_path);
    println!("{}", session.board_text());
    println!("输入 help 查看命令");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}\n{}", e, HELP);
                continue;
            }
        };

        match session.execute(command) {
            Ok(Reply::Output(text)) => println!("{}", text),
            Ok(Reply::Quit) => break,
            Err(e) => {
                warn!("命令失败: {:#}", e);
                println!("{:#}", e);
            }
        }
    }

    info!("国际象棋控制台退出");
    Ok(())
}
