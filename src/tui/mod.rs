use ratatui::{
    Frame,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Widget},
};

use crate::config::{AppConfig, SurfaceConfig};
use crate::error::ConfigError;
use crate::render::Rasterizer;
use crate::wave::Surface;

mod session;

pub use session::{init_tracing, run};

#[derive(Debug)]
pub struct App {
    pub config: AppConfig,
    pub surface: Surface,
    pub rasterizer: Rasterizer,
    /// Animation clock, advanced by `config.time_step` each tick.
    pub t: f64,
    pub frames: u64,
}

impl App {
    pub fn new(config: AppConfig, width: u16, height: u16) -> Result<Self, ConfigError> {
        let surface = match &config.surface {
            SurfaceConfig::Gerstner(cfg) => Surface::gerstner(cfg.clone())?,
            SurfaceConfig::Ribbon(cfg) => Surface::ribbon(cfg.clone())?,
        };
        let rasterizer = Rasterizer::new(width, height).with_projection(config.projection);
        Ok(Self {
            config,
            surface,
            rasterizer,
            t: 0.0,
            frames: 0,
        })
    }

    pub fn handle_input(&mut self, key: KeyInput) -> Option<AppAction> {
        match key {
            KeyInput::Char('q' | 'Q') | KeyInput::Esc | KeyInput::CtrlC => Some(AppAction::Quit),
            KeyInput::Char(_) | KeyInput::Other => None,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.rasterizer.resize(width, height);
    }

    /// Compute the surface at the current time, rasterize it, then advance the clock.
    pub fn tick(&mut self) {
        self.surface.update(self.t);
        self.rasterizer.clear();
        self.rasterizer.render_surface(&self.surface);
        tracing::trace!(
            frame = self.frames,
            t = self.t,
            particles = self.surface.particles().len(),
            "frame rasterized"
        );
        self.t += self.config.time_step;
        self.frames = self.frames.saturating_add(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Esc,
    CtrlC,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
}

/// Paint the current frame into a standalone buffer, without a terminal.
pub fn render_to_buffer(app: &App, width_cells: u16, height_cells: u16) -> Buffer {
    let mut buffer = Buffer::empty(Rect::new(0, 0, width_cells, height_cells));
    paint(app, buffer.area, &mut buffer);
    buffer
}

pub fn view(frame: &mut Frame, app: &App) {
    let area = frame.area();
    paint(app, area, frame.buffer_mut());
}

/// Black backdrop, then the rasterized surface on top.
fn paint(app: &App, area: Rect, buffer: &mut Buffer) {
    Block::default()
        .style(Style::default().bg(Color::Black))
        .render(area, buffer);
    app.rasterizer.flush(buffer);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(width: u16, height: u16) -> App {
        App::new(AppConfig::default(), width, height).unwrap()
    }

    #[test]
    fn quit_keys() {
        let mut app = app(10, 10);
        for key in [
            KeyInput::Char('q'),
            KeyInput::Char('Q'),
            KeyInput::Esc,
            KeyInput::CtrlC,
        ] {
            assert_eq!(app.handle_input(key), Some(AppAction::Quit));
        }
        assert_eq!(app.handle_input(KeyInput::Char('w')), None);
        assert_eq!(app.handle_input(KeyInput::Other), None);
    }

    #[test]
    fn tick_advances_clock() {
        let mut app = app(40, 12);
        app.tick();
        app.tick();
        assert_eq!(app.frames, 2);
        assert!((app.t - 2.0 * app.config.time_step).abs() < 1e-12);
        assert!(app.rasterizer.buffer().occupied().count() > 0);
    }

    #[test]
    fn view_copies_frame_onto_black() {
        let mut app = app(60, 20);
        app.tick();
        let buffer = render_to_buffer(&app, 60, 20);

        for (x, y, cell) in app.rasterizer.buffer().occupied() {
            let out = &buffer[(x as u16, y as u16)];
            assert_eq!(out.symbol(), cell.glyph.to_string());
            assert_eq!(out.fg, Color::from(cell.color));
        }
        assert!(buffer.content().iter().all(|c| c.bg == Color::Black));
    }

    #[test]
    fn view_and_standalone_buffer_agree() {
        use ratatui::{Terminal, backend::TestBackend};

        let mut app = app(50, 16);
        app.tick();
        let mut terminal = Terminal::new(TestBackend::new(50, 16)).unwrap();
        terminal.draw(|frame| view(frame, &app)).unwrap();
        assert_eq!(terminal.backend().buffer(), &render_to_buffer(&app, 50, 16));
    }

    #[test]
    fn resize_reallocates_buffer() {
        let mut app = app(80, 24);
        app.tick();
        app.resize(20, 5);
        assert_eq!(app.rasterizer.buffer().width(), 20);
        assert_eq!(app.rasterizer.buffer().height(), 5);
        assert_eq!(app.rasterizer.buffer().occupied().count(), 0);
    }

    #[test]
    fn ribbon_app_runs() {
        let mut app = App::new(AppConfig::ribbon(), 80, 24).unwrap();
        app.tick();
        let buffer = render_to_buffer(&app, 80, 24);
        assert!(buffer.content().iter().any(|c| c.fg != Color::Reset));
    }
}
