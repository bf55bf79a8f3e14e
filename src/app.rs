use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, prelude::Frame, Terminal};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::controller::Controller;
use crate::screens::{self, ConfirmQuitScreen};
use crate::tutorial::Prefs;

const IDLE_POLL: Duration = Duration::from_millis(250);

pub enum Transition {
    Stay,
    /// Open an overlay above the current screen.
    Push(Box<dyn ScreenWidget>),
    /// Close the top overlay.
    Pop,
    Quit,
}

pub struct AppCtx {
    pub controller: Controller,
    pub prefs: Prefs,
}

#[async_trait]
pub trait ScreenWidget: Send {
    fn title(&self) -> &str {
        "TaskTribe"
    }
    fn draw(&self, f: &mut Frame<'_>, area: Rect, ctx: &AppCtx);
    async fn on_key(&mut self, key: KeyEvent, ctx: &mut AppCtx) -> Result<Transition>;
}

type Term = Terminal<CrosstermBackend<io::Stdout>>;

pub async fn run_app(mut ctx: AppCtx) -> Result<()> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &mut ctx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn event_loop(terminal: &mut Term, ctx: &mut AppCtx) -> Result<()> {
    let mut shown = ctx.controller.screen().name();
    let mut base: Box<dyn ScreenWidget> = screens::build(ctx);
    let mut overlays: Vec<Box<dyn ScreenWidget>> = Vec::new();
    info!("interactive session started");

    loop {
        // The controller decides the screen; rebuild the widget when it moves.
        let current = ctx.controller.screen().name();
        if current != shown {
            base = screens::build(ctx);
            shown = current;
        }

        terminal.draw(|f| {
            let size = f.size();
            base.draw(f, size, ctx);
            for overlay in &overlays {
                overlay.draw(f, size, ctx);
            }
        })?;

        // The guard screen is on the terminal now; do the slow part.
        if ctx.controller.pending().is_some() {
            ctx.controller.run_pending().await;
            continue;
        }

        let wait = ctx
            .controller
            .scheduled()
            .map(|s| s.due.saturating_duration_since(Instant::now()))
            .map_or(IDLE_POLL, |d| d.min(IDLE_POLL));

        if event::poll(wait)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press {
                    if k.modifiers.contains(KeyModifiers::CONTROL) && matches!(k.code, KeyCode::Char('q' | 'Q')) {
                        overlays.push(Box::new(ConfirmQuitScreen::new()));
                        continue;
                    }

                    let top = match overlays.last_mut() {
                        Some(overlay) => overlay,
                        None => &mut base,
                    };
                    match top.on_key(k, ctx).await? {
                        Transition::Stay => {}
                        Transition::Push(s) => overlays.push(s),
                        Transition::Pop => {
                            overlays.pop();
                        }
                        Transition::Quit => break,
                    }
                }
            }
        }

        ctx.controller.tick(Instant::now());
    }

    debug!(screen = ctx.controller.screen().name(), "leaving interactive session");
    Ok(())
}
