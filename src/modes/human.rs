use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, interval, interval_at};

use crate::game::{GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Render at 30 FPS (33ms per frame)
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    /// Period the tick timer was last built with
    tick_period: Duration,
}

impl HumanMode {
    /// Create a game; a seed makes fruit placement reproducible
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let engine = match seed {
            Some(seed) => GameEngine::with_seed(config, seed),
            None => GameEngine::from_entropy(config),
        }
        .context("Failed to create game")?;
        let tick_period = engine.tick_interval();

        Ok(Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            tick_period,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.tick_period);
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.engine, &self.metrics, self.paused);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("Quitting with score {}", self.engine.score());
                break;
            }

            self.retime(&mut tick_timer);
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(direction) => {
                    if !self.paused {
                        self.engine.set_new_direction(direction);
                    }
                }
                KeyAction::TogglePause => self.toggle_pause(),
                KeyAction::Restart => self.reset_game()?,
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn update_game(&mut self) {
        if self.paused || self.engine.is_game_over() {
            return;
        }

        let result = self.engine.tick();
        if result.terminated {
            self.metrics.on_game_over(self.engine.score());
        }
    }

    fn toggle_pause(&mut self) {
        if self.engine.is_game_over() {
            return;
        }

        self.paused = !self.paused;
        if self.paused {
            self.metrics.pause();
        } else {
            self.metrics.resume();
        }
        debug!("Paused: {}", self.paused);
    }

    fn reset_game(&mut self) -> Result<()> {
        self.engine.restart().context("Failed to restart game")?;
        self.metrics.on_game_start();
        self.paused = false;
        Ok(())
    }

    /// Rebuild the tick timer when the engine wants a different period
    fn retime(&mut self, tick_timer: &mut Interval) {
        let wanted = self.engine.tick_interval();
        if wanted == self.tick_period {
            return;
        }

        debug!(
            "Tick period {}ms -> {}ms",
            self.tick_period.as_millis(),
            wanted.as_millis()
        );
        self.tick_period = wanted;
        *tick_timer = interval_at(Instant::now() + wanted, wanted);
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
