use std::io::{IsTerminal, Write, stdout};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::Context;
use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use tracing_subscriber::EnvFilter;

use super::{App, AppAction, KeyInput, view};
use crate::config::AppConfig;

/// Log to stderr, filtered by `RUST_LOG`, quiet (`warn`) otherwise.
///
/// stderr shares the tty with the alternate screen, so events are only
/// written when it is redirected (`wavesaver 2>wavesaver.log`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt = tracing_subscriber::fmt().with_env_filter(filter);
    let _ = if std::io::stderr().is_terminal() {
        fmt.with_writer(std::io::sink).try_init()
    } else {
        fmt.with_writer(std::io::stderr).try_init()
    };
}

/// Take over the terminal, animate until quit, and hand the terminal back.
pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&shutdown))
            .with_context(|| format!("register handler for signal {signal}"))?;
    }

    enable_raw_mode().context("enable raw mode")?;
    let mut out = stdout();
    let entered = out
        .execute(EnterAlternateScreen)
        .and_then(|out| out.execute(Hide))
        .map(|_| ())
        .context("enter alternate screen");
    if let Err(err) = entered {
        restore();
        return Err(err);
    }

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        default_hook(info);
    }));

    let result = run_app(config, &shutdown);
    let restored = teardown(&mut out);

    result.and(restored)
}

/// Every step runs even when an earlier one fails; the first failure is reported.
fn teardown<W: Write>(out: &mut W) -> anyhow::Result<()> {
    let shown = out.execute(Show).map(|_| ()).context("show cursor");
    let left = out
        .execute(LeaveAlternateScreen)
        .map(|_| ())
        .context("leave alternate screen");
    let cooked = disable_raw_mode().context("disable raw mode");
    shown.and(left).and(cooked)
}

fn restore() {
    let _ = teardown(&mut stdout());
}

fn run_app(config: AppConfig, shutdown: &AtomicBool) -> anyhow::Result<()> {
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    let size = terminal.size().context("query terminal size")?;

    let mut app = App::new(config, size.width, size.height).context("build wave surface")?;
    let frame_delay = app.config.frame_delay;
    tracing::debug!(
        width = size.width,
        height = size.height,
        surface = ?app.surface.kind(),
        "animation started"
    );

    let mut next_tick = Instant::now();
    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::debug!("termination signal received");
            break;
        }

        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_input(map_key(key)) == Some(AppAction::Quit) {
                        break;
                    }
                }
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
            continue;
        }

        app.tick();
        terminal.draw(|frame| view(frame, &app))?;
        next_tick = Instant::now() + frame_delay;
    }

    tracing::debug!(frames = app.frames, "animation stopped");
    Ok(())
}

fn map_key(key: KeyEvent) -> KeyInput {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyInput::CtrlC,
        KeyCode::Char(ch) => KeyInput::Char(ch),
        KeyCode::Esc => KeyInput::Esc,
        _ => KeyInput::Other,
    }
}
