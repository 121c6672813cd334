use std::io::{self, Stdout};

use crossterm::{
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::app::App;
use crate::error::Result;
use crate::ui;

/// Terminal wrapper that draws the tree and owns raw mode.
///
/// Raw mode and the alternate screen are left again on [`restore`](Self::restore)
/// or on drop, whichever comes first.
pub struct Tui<B: Backend = CrosstermBackend<Stdout>> {
    terminal: Terminal<B>,
    raw_mode: bool,
}

impl Tui {
    /// Initialize the terminal: enter alternate screen and enable raw mode.
    pub fn new() -> Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            raw_mode: true,
        })
    }
}

impl<B: Backend> Tui<B> {
    /// Wrap a backend that needs no terminal mode changes.
    #[cfg(test)]
    pub fn with_backend(backend: B) -> Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            raw_mode: false,
        })
    }

    /// Render one frame of the app.
    pub fn draw(&mut self, app: &mut App) -> Result<()> {
        self.terminal.draw(|frame| ui::render(app, frame))?;
        Ok(())
    }

    /// Restore the terminal to its original state. Safe to call twice.
    pub fn restore(&mut self) -> Result<()> {
        if !self.raw_mode {
            return Ok(());
        }
        self.raw_mode = false;
        terminal::disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl<B: Backend> Drop for Tui<B> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
    }
}

/// Install a panic hook that restores the terminal before printing panic info.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        tracing::error!("panic: {panic_info}");
        original_hook(panic_info);
    }));
}
