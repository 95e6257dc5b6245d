use wavesaver::{config::AppConfig, tui};

/// A start-up failure comes back as `Err`, printed once with its context
/// chain after the terminal has been restored, and exits non-zero.
fn main() -> anyhow::Result<()> {
    tui::init_tracing();
    tui::run(AppConfig::ribbon())
}
