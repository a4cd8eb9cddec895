use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

mod app;
mod cli;
mod clock;
mod config;
mod input;
mod logging;
mod models;
mod projection;
mod storage;
mod store;
mod suggestions;
mod ui;

use app::{App, AppStore};
use cli::{Cli, Commands};
use clock::{Clock, SystemClock};
use storage::{FileStore, KeyValueStore, MemoryStore};
use store::EntityStore;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 配置命令不需要加载数据
    let command = match cli.command {
        Some(Commands::Config(cmd)) => return cli::run_config(cmd),
        other => other,
    };

    let config = config::load_config()?;
    let data_dir = config.resolve_data_dir(cli.data_dir.as_deref())?;

    // 日志初始化失败不影响运行
    let _logger = match logging::init_logging(&config.log_level, &data_dir) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("warning: logging disabled: {:#}", e);
            None
        }
    };

    let storage: Box<dyn KeyValueStore> = if cli.ephemeral {
        info!("event=storage_open backend=memory");
        Box::new(MemoryStore::new())
    } else {
        let files = FileStore::new(&data_dir);
        info!("event=storage_open backend=file dir={}", files.dir().display());
        Box::new(files)
    };
    let clock: Box<dyn Clock> = Box::new(SystemClock);
    let (mut store, loaded): (AppStore, _) = EntityStore::open(storage, clock);

    match command {
        Some(command) => {
            if loaded.is_seeded() {
                eprintln!("note: {}", loaded.describe());
            }
            if let Some(err) = store.last_persist_error() {
                eprintln!("warning: could not save sample data: {}", err);
            }
            cli::run(command, &mut store, &config, &mut io::stdout().lock())
        }
        None => run_tui(App::new(store, config, loaded)),
    }
}

fn run_tui(mut app: App) -> Result<()> {
    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 运行应用
    let res = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // 退出前再保存一次
    if app.store.is_read_only() {
        eprintln!("note: saved data could not be read, so this session's changes were not written");
    } else if !app.store.save() {
        let reason = app.store.take_persist_error().unwrap_or_default();
        eprintln!("Error: could not save your data: {}", reason);
    }

    if let Err(err) = res {
        error!("event=tui_exit status=error error={:#}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.clear_expired_notification();
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if !app.handle_key(key) {
                    info!("event=tui_exit status=ok");
                    return Ok(());
                }
            }
        }
    }
}
