use rand::Rng;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Cell, CollisionType, GameEngine};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<R: Rng>(
        &self,
        frame: &mut Frame,
        engine: &GameEngine<R>,
        metrics: &GameMetrics,
        paused: bool,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(engine, metrics), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if engine.is_game_over() {
            frame.render_widget(self.render_game_over(engine, metrics), game_area);
        } else {
            frame.render_widget(self.render_grid(engine, paused), game_area);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid<R: Rng>(&self, engine: &GameEngine<R>, paused: bool) -> Paragraph<'static> {
        let size = engine.config().field_size as i32;
        let head = engine.snake().head().coords();
        let special = engine.fruit_is_special();

        let mut lines = Vec::with_capacity(size as usize);
        for y in 0..size {
            let spans: Vec<Span> = (0..size)
                .map(|x| match engine.classify_cell(x, y) {
                    Cell::Snake if (x, y) == head => Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Cell::Snake => Span::styled("□ ", Style::default().fg(Color::Green)),
                    Cell::Fruit if special => Span::styled(
                        "★ ",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Cell::Fruit => Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                })
                .collect();
            lines.push(Line::from(spans));
        }

        let (title, border) = if paused {
            (" Snake (paused) ", Color::Yellow)
        } else {
            (" Snake ", Color::White)
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(border))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats<R: Rng>(&self, engine: &GameEngine<R>, metrics: &GameMetrics) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                engine.score().to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Fruits: ", label),
            Span::styled(engine.fruits_eaten().to_string(), value),
            Span::raw("    "),
            Span::styled("Tick: ", label),
            Span::styled(format!("{}ms", engine.tick_interval().as_millis()), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over<R: Rng>(&self, engine: &GameEngine<R>, metrics: &GameMetrics) -> Paragraph<'static> {
        let (headline, reason) = if engine.is_board_cleared() {
            ("BOARD CLEARED", "The snake fills the whole field")
        } else {
            match engine.snake().collision() {
                Some(CollisionType::Wall) => ("GAME OVER", "You ran into the wall"),
                Some(CollisionType::SelfCollision) => ("GAME OVER", "You bit your own tail"),
                None => ("GAME OVER", ""),
            }
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                headline,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    engine.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Games: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.games_played.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Yellow)),
            Span::raw(" to pause | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(engine: &GameEngine, paused: bool) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let renderer = Renderer::new();
        let metrics = GameMetrics::new();
        terminal
            .draw(|frame| renderer.render(frame, engine, &metrics, paused))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_running_game_shows_board() {
        let engine = GameEngine::with_seed(GameConfig::small(), 5).unwrap();
        let screen = draw(&engine, false);

        assert!(screen.contains("Score: 0"));
        assert!(screen.contains(" Snake "));
        assert!(screen.contains('■'));
        assert!(!screen.contains("GAME OVER"));
    }

    #[test]
    fn test_paused_title() {
        let engine = GameEngine::with_seed(GameConfig::small(), 5).unwrap();
        assert!(draw(&engine, true).contains("paused"));
    }

    #[test]
    fn test_game_over_screen() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 5).unwrap();
        engine.place_fruit(0, 9).unwrap();
        while !engine.tick().terminated {}

        let screen = draw(&engine, false);
        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("wall"));
    }

    fn eat_five(engine: &mut GameEngine) {
        for i in 0..5 {
            let next = engine.snake().next_head().unwrap();
            engine.place_fruit(next.x(), next.y()).unwrap();
            assert!(engine.tick().info.ate_fruit);
            engine.set_new_direction(if i % 2 == 0 {
                Direction::East
            } else {
                Direction::North
            });
        }
    }

    #[test]
    fn test_special_fruit_is_starred() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 5).unwrap();
        assert!(!draw(&engine, false).contains('★'));

        eat_five(&mut engine);
        assert!(engine.fruit_is_special());
        assert!(draw(&engine, false).contains('★'));
    }

    #[test]
    fn test_special_fruit_worth_less_is_still_starred() {
        let config = GameConfig {
            normal_fruit_value: 4,
            special_fruit_value: 2,
            ..GameConfig::small()
        };
        let mut engine = GameEngine::with_seed(config, 5).unwrap();
        assert!(!draw(&engine, false).contains('★'));

        eat_five(&mut engine);
        assert_eq!(engine.fruit().value(), 2);
        assert!(draw(&engine, false).contains('★'));
    }

    #[test]
    fn test_board_cleared_screen() {
        let config = GameConfig {
            field_size: 2,
            initial_snake_length: 1,
            ..Default::default()
        };
        let mut engine = GameEngine::with_seed(config, 5).unwrap();
        engine.place_fruit(1, 0).unwrap();
        engine.tick();
        engine.place_fruit(0, 0).unwrap();
        engine.set_new_direction(Direction::West);
        engine.tick();
        engine.set_new_direction(Direction::South);
        assert!(engine.tick().board_cleared);

        let screen = draw(&engine, false);
        assert!(screen.contains("BOARD CLEARED"));
        assert!(!screen.contains("GAME OVER"));
    }
}
