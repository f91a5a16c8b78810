mod app;
mod config;
mod models;
mod system;
mod ui;
mod utils;

use anyhow::Context;
use app::App;
use config::{Config, APP_DIR_NAME};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::{
    calculate_areas, ArchiveTable, CommandBar, Dialog, JobsPanel, LayoutMode, SearchBar,
    StatusBar, Theme, WarningScreen,
};
use utils::error::Result;

/// 로그 필터를 지정하는 환경 변수
const LOG_ENV_VAR: &str = "TOOLSHELF_LOG";
const LOG_FILE_NAME: &str = "toolshelf.log";

fn main() -> Result<()> {
    if let Err(err) = init_logging() {
        eprintln!("Warning: logging disabled: {:#}", err);
    }

    let (config, config_path) = match Config::load() {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("Error: {}", err);
            return Err(err);
        }
    };
    tracing::info!(
        config = %config_path.display(),
        root = %config.root.display(),
        tmp = %config.tmp.display(),
        "starting"
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    let res = run_app(&mut terminal, &mut app);

    // 오류로 빠져나온 경우에도 작업 스레드를 정리
    if !app.should_quit() {
        app.quit();
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal loop failed");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// 캐시 디렉토리의 로그 파일로 tracing 출력 (터미널은 UI가 사용)
fn init_logging() -> anyhow::Result<()> {
    let dir = dirs::cache_dir()
        .context("no cache directory")?
        .join(APP_DIR_NAME);
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let theme = Theme::default();
    loop {
        terminal.draw(|f| render_main_ui(f, app, &theme))?;

        // 압축 해제 중에는 짧은 타임아웃으로 진행률 갱신
        let poll_timeout = if app.is_extracting() {
            Duration::from_millis(30)
        } else {
            Duration::from_millis(100)
        };

        if event::poll(poll_timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        app.quit();
                    } else if app.is_dialog_active() {
                        handle_dialog_keys(app, key.code);
                    } else if app.filter_editing {
                        handle_filter_keys(app, key.code);
                    } else {
                        handle_normal_keys(app, key.code);
                    }
                }
            }
        }

        app.process_scheduler_events();

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// 일반 모드 키 처리
fn handle_normal_keys(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        KeyCode::Enter => app.extract_selected(),
        KeyCode::Char('o') => app.toggle_open_after_extract(),
        KeyCode::Char('/') => app.start_filter(),
        KeyCode::Char('r') | KeyCode::F(5) => app.rescan(),
        KeyCode::Char('c') => app.cancel_latest_job(),
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

/// 검색어 입력 중 키 처리
fn handle_filter_keys(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => app.finish_filter(),
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Down => app.select_next(),
        KeyCode::Up => app.select_prev(),
        KeyCode::Char(c) => app.push_filter_char(c),
        _ => {}
    }
}

/// 다이얼로그 키 처리
fn handle_dialog_keys(app: &mut App, code: KeyCode) {
    if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
        app.close_dialog();
    }
}

fn render_main_ui(f: &mut ratatui::Frame<'_>, app: &mut App, theme: &Theme) {
    let size = f.area();
    let jobs = app.active_jobs().len();
    let (mode, areas) = calculate_areas(size, jobs);

    if mode == LayoutMode::TooSmall {
        f.render_widget(WarningScreen::new(size.width, size.height).theme(theme), size);
        return;
    }

    app.set_viewport_rows(ArchiveTable::body_height(areas.table.height));

    let root = app.config.root.display().to_string();
    let search = SearchBar::new(&app.filter)
        .editing(app.filter_editing)
        .root(&root)
        .theme(theme);
    f.render_widget(search, areas.search);

    let table = ArchiveTable::new(&app.catalog, &app.visible)
        .selected(app.selected)
        .scroll_offset(app.scroll_offset)
        .focused(!app.filter_editing)
        .theme(theme);
    f.render_widget(table, areas.table);

    let active_jobs = app.active_jobs();
    if !active_jobs.is_empty() {
        f.render_widget(JobsPanel::new(&active_jobs).theme(theme), areas.jobs);
    }

    let status_bar = StatusBar::new()
        .counts(app.visible.len(), app.catalog.len())
        .active_jobs(active_jobs.len())
        .open_after_extract(app.open_after_extract)
        .toast(app.toast_display())
        .theme(theme);
    f.render_widget(status_bar, areas.status_bar);

    let commands = if app.is_dialog_active() {
        CommandBar::dialog_commands()
    } else if app.filter_editing {
        CommandBar::search_commands()
    } else {
        CommandBar::browse_commands(app.selected_record().is_some(), !active_jobs.is_empty())
    };
    f.render_widget(CommandBar::new().commands(commands).theme(theme), areas.command_bar);

    if let Some(ref dialog_kind) = app.dialog {
        f.render_widget(Dialog::new(dialog_kind).theme(theme), size);
    }
}
