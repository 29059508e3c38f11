//! The snake game as an application [`Model`].
//!
//! Row 0 of the screen is the status line; the playfield fills the rows
//! below it. Field coordinates start at (0, 0) and are shifted down by one
//! row when drawn.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use snakepath_core::{
    AttrMask, Cell, Color, Effect, Grid, Key, ModMask, Model, Msg, Point, Range, Style,
};
use snakepath_paths::{Direction, Steering};

use crate::autopilot::Autopilot;
use crate::config::{SnakeConfig, SteeringPolicy};
use crate::snake::Snake;

const STATUS_ROWS: i32 = 1;
const FOOD_ATTEMPTS: usize = 100;

const FOOD: char = '●';
const TRAIL: char = '·';

const BODY_STYLE: Style = Style {
    fg: Color::Rgb(0x4c, 0xaf, 0x50),
    bg: Color::Default,
    attrs: AttrMask::REVERSE,
};
const HEAD_STYLE: Style = Style {
    fg: Color::Rgb(0x8b, 0xc3, 0x4a),
    bg: Color::Default,
    attrs: AttrMask::REVERSE,
};
const FOOD_STYLE: Style = Style {
    fg: Color::Rgb(0xe5, 0x39, 0x35),
    bg: Color::Default,
    attrs: AttrMask::BOLD,
};
const TRAIL_STYLE: Style = Style {
    fg: Color::Default,
    bg: Color::Default,
    attrs: AttrMask::DIM,
};
const STATUS_STYLE: Style = Style {
    fg: Color::Default,
    bg: Color::Default,
    attrs: AttrMask::BOLD,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Paused,
    Over,
}

/// Game state. Owned by the app loop; every change goes through
/// [`Model::update`].
pub struct Game {
    config: SnakeConfig,
    field: Range,
    snake: Snake,
    steering: Steering,
    food: Option<Point>,
    score: u32,
    best: u32,
    ticks: u64,
    phase: Phase,
    autopilot: Autopilot,
    autopilot_on: bool,
    show_path: bool,
    rng: StdRng,
}

impl Game {
    pub fn new(config: SnakeConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let field = Range::sized(config.width.max(1), config.height.max(1));
        let mut game = Self {
            field,
            snake: Snake::new(Point::ZERO, Direction::Right, 1),
            steering: Steering::new(Direction::Right),
            food: None,
            score: 0,
            best: 0,
            ticks: 0,
            phase: Phase::Playing,
            autopilot: Autopilot::new(config.replan, config.max_expansions),
            autopilot_on: config.autopilot,
            show_path: false,
            rng,
            config,
        };
        game.restart();
        game
    }

    /// Start a new round on the current field.
    pub fn restart(&mut self) {
        let length = self.config.initial_length.min(self.field.width() as usize);
        self.snake = Snake::centered(self.field, length);
        self.steering = Steering::new(Direction::Right);
        self.score = 0;
        self.ticks = 0;
        self.phase = Phase::Playing;
        self.autopilot.invalidate();
        self.food = self.spawn_food();
        log::info!(
            "new round on {}x{} field",
            self.field.width(),
            self.field.height()
        );
    }

    pub fn field(&self) -> Range {
        self.field
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Highest score over all rounds so far.
    pub fn best(&self) -> u32 {
        self.best.max(self.score)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn heading(&self) -> Direction {
        self.steering.heading()
    }

    pub fn autopilot_on(&self) -> bool {
        self.autopilot_on
    }

    pub fn autopilot(&self) -> &Autopilot {
        &self.autopilot
    }

    /// Advance the game by one tick.
    pub fn step(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        let Some(food) = self.food else {
            self.game_over("no room left for food");
            return;
        };
        self.ticks += 1;

        if self.autopilot_on {
            if let Some(d) = self
                .autopilot
                .decide(self.field, &self.snake, food, self.config.wrap)
            {
                match self.config.steering {
                    SteeringPolicy::Direct => self.steering.set(d),
                    SteeringPolicy::NoReverse => {
                        self.steering.turn(d);
                    }
                }
            }
        }

        let mut next = self.snake.head() + self.steering.heading().delta();
        if self.config.wrap {
            next = next.wrap(self.field);
        } else if !self.field.contains(next) {
            self.game_over("hit the wall");
            return;
        }

        let grow = next == food;
        if self.snake.would_bite(next, grow) {
            self.game_over("bit itself");
            return;
        }
        self.snake.advance(next, grow);

        if grow {
            self.score += 1;
            log::debug!("ate food at {food}, score {}", self.score);
            self.autopilot.invalidate();
            self.food = self.spawn_food();
        }
    }

    fn game_over(&mut self, why: &str) {
        log::info!("game over after {} ticks: {why}, score {}", self.ticks, self.score);
        self.best = self.best.max(self.score);
        self.phase = Phase::Over;
    }

    /// A random free cell not touching the body. Falls back to any free cell
    /// when the field is too crowded.
    fn spawn_food(&mut self) -> Option<Point> {
        let (w, h) = (self.field.width(), self.field.height());
        for _ in 0..FOOD_ATTEMPTS {
            let p = Point::new(self.rng.random_range(0..w), self.rng.random_range(0..h));
            if !self.snake.contains(p) && !self.snake.touches(p) {
                return Some(p);
            }
        }

        let spaced: Vec<Point> = self
            .field
            .iter()
            .filter(|&p| !self.snake.contains(p) && !self.snake.touches(p))
            .collect();
        let free: Vec<Point> = if spaced.is_empty() {
            self.field.iter().filter(|&p| !self.snake.contains(p)).collect()
        } else {
            spaced
        };
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.random_range(0..free.len())])
    }

    fn resize(&mut self, width: i32, height: i32) {
        self.field = Range::sized(width.max(1), (height - STATUS_ROWS).max(1));
        self.best = self.best();
        self.restart();
    }

    fn steer_by_hand(&mut self, d: Direction) {
        if self.autopilot_on {
            log::debug!("manual input, autopilot off");
            self.autopilot_on = false;
            self.autopilot.invalidate();
        }
        self.steering.turn(d);
    }

    fn on_key(&mut self, key: Key, modifiers: ModMask) -> Option<Effect> {
        if modifiers.contains(ModMask::CTRL) && key == Key::Char('c') {
            return Some(Effect::End);
        }
        match (self.phase, key) {
            (_, Key::Escape | Key::Char('q')) => return Some(Effect::End),
            (Phase::Over, Key::Char('y')) => {
                self.best = self.best();
                self.restart();
            }
            (Phase::Over, Key::Char('n')) => return Some(Effect::End),
            (Phase::Over, _) => {}
            (_, Key::Char('p')) => {
                self.autopilot_on = !self.autopilot_on;
                self.autopilot.invalidate();
                log::debug!("autopilot {}", on_off(self.autopilot_on));
            }
            (_, Key::Char('o')) => self.show_path = !self.show_path,
            (Phase::Playing, Key::Space) => self.phase = Phase::Paused,
            (Phase::Paused, Key::Space) => self.phase = Phase::Playing,
            (Phase::Playing, k) => {
                if let Some(d) = key_direction(k) {
                    self.steer_by_hand(d);
                }
            }
            (Phase::Paused, _) => {}
        }
        None
    }

    fn draw_status(&self, grid: &mut Grid) {
        let mut status = format!(
            "Score: {}  Best: {}  Autopilot: {}",
            self.score,
            self.best(),
            on_off(self.autopilot_on)
        );
        if self.phase == Phase::Paused {
            status.push_str("  [paused]");
        }
        let n = grid.draw_text(Point::ZERO, &status, STATUS_STYLE);
        let help = "p pilot  o path  space pause  q quit";
        let x = grid.width() - help.chars().count() as i32;
        if x > n as i32 + 1 {
            grid.draw_text(Point::new(x, 0), help, TRAIL_STYLE);
        }
    }
}

fn on_off(b: bool) -> &'static str {
    if b { "on" } else { "off" }
}

fn key_direction(key: Key) -> Option<Direction> {
    match key {
        Key::Char('w') | Key::ArrowUp => Some(Direction::Up),
        Key::Char('s') | Key::ArrowDown => Some(Direction::Down),
        Key::Char('a') | Key::ArrowLeft => Some(Direction::Left),
        Key::Char('d') | Key::ArrowRight => Some(Direction::Right),
        _ => None,
    }
}

/// Field coordinates to screen coordinates.
#[inline]
fn screen(p: Point) -> Point {
    p.shift(0, STATUS_ROWS)
}

impl Model for Game {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Tick { .. } => {
                self.step();
                None
            }
            Msg::KeyDown { key, modifiers, .. } => self.on_key(key, modifiers),
            Msg::Screen { width, height, .. } => {
                self.resize(width, height);
                None
            }
            Msg::Quit => Some(Effect::End),
            Msg::Init => None,
        }
    }

    fn draw(&self, grid: &mut Grid) {
        grid.fill(Cell::default());
        self.draw_status(grid);

        if self.show_path {
            for p in self.autopilot.plan().skip(1) {
                grid.set(screen(p), Cell::new(TRAIL, TRAIL_STYLE));
            }
        }
        if let Some(food) = self.food {
            grid.set(screen(food), Cell::new(FOOD, FOOD_STYLE));
        }
        for p in self.snake.iter() {
            grid.set(screen(p), Cell::new(' ', BODY_STYLE));
        }
        grid.set(screen(self.snake.head()), Cell::new(' ', HEAD_STYLE));

        if self.phase == Phase::Over {
            let text = format!("Game Over, Score: {}, Play Again? y/n", self.score);
            let x = ((grid.width() - text.chars().count() as i32) / 2).max(0);
            let y = STATUS_ROWS + self.field.height() / 2;
            grid.draw_text(Point::new(x, y), &text, STATUS_STYLE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::ReplanPolicy;

    fn manual(width: i32, height: i32) -> Game {
        Game::new(SnakeConfig {
            autopilot: false,
            seed: Some(1),
            ..SnakeConfig::new(width, height)
        })
    }

    fn text_at(grid: &Grid, y: i32) -> String {
        (0..grid.width())
            .map(|x| grid.at(Point::new(x, y)).ch)
            .collect::<String>()
    }

    #[test]
    fn new_round_layout() {
        let game = manual(20, 10);
        assert_eq!(game.snake().len(), 3);
        assert_eq!(game.snake().head(), Point::new(10, 5));
        assert_eq!(game.heading(), Direction::Right);
        let food = game.food().unwrap();
        assert!(game.field().contains(food));
        assert!(!game.snake().contains(food));
        assert!(!game.snake().touches(food));
    }

    #[test]
    fn moves_one_cell_per_tick() {
        let mut game = manual(20, 10);
        game.food = Some(Point::new(0, 0));
        game.update(Msg::tick(0));
        assert_eq!(game.snake().head(), Point::new(11, 5));
        assert_eq!(game.snake().len(), 3);
        assert_eq!(game.ticks(), 1);
    }

    #[test]
    fn eating_grows_and_scores() {
        let mut game = manual(20, 10);
        game.food = Some(Point::new(11, 5));
        game.step();
        assert_eq!(game.score(), 1);
        assert_eq!(game.snake().len(), 4);
        let food = game.food().unwrap();
        assert_ne!(food, Point::new(11, 5));
        assert!(!game.snake().contains(food));
    }

    #[test]
    fn reversal_is_refused() {
        let mut game = manual(20, 10);
        game.food = Some(Point::new(0, 0));
        game.update(Msg::key(Key::Char('a')));
        assert_eq!(game.heading(), Direction::Right);
        game.update(Msg::key(Key::ArrowUp));
        assert_eq!(game.heading(), Direction::Up);
        game.step();
        assert_eq!(game.snake().head(), Point::new(10, 4));
    }

    #[test]
    fn manual_key_disables_autopilot() {
        let mut game = Game::new(SnakeConfig::small(3));
        assert!(game.autopilot_on());
        game.update(Msg::key(Key::Char('w')));
        assert!(!game.autopilot_on());
        game.update(Msg::key(Key::Char('p')));
        assert!(game.autopilot_on());
    }

    #[test]
    fn wraps_at_edges() {
        let mut game = manual(6, 4);
        game.food = Some(Point::new(0, 0));
        // head starts at (3, 2), heading right
        for _ in 0..3 {
            game.step();
        }
        assert_eq!(game.snake().head(), Point::new(0, 2));
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn walls_kill_without_wrap() {
        let mut game = Game::new(SnakeConfig {
            autopilot: false,
            wrap: false,
            seed: Some(1),
            ..SnakeConfig::new(6, 4)
        });
        game.food = Some(Point::new(0, 0));
        game.step();
        game.step();
        assert_eq!(game.phase(), Phase::Playing);
        game.step();
        assert_eq!(game.phase(), Phase::Over);
        assert_eq!(game.snake().head(), Point::new(5, 2));
    }

    #[test]
    fn biting_ends_the_round() {
        let mut game = Game::new(SnakeConfig {
            autopilot: false,
            initial_length: 5,
            seed: Some(1),
            ..SnakeConfig::new(20, 10)
        });
        game.food = Some(Point::new(0, 0));
        for key in ['w', 'a', 's'] {
            game.update(Msg::key(Key::Char(key)));
            game.step();
        }
        assert_eq!(game.phase(), Phase::Over);
        // ticks stop once the round is over
        let head = game.snake().head();
        game.step();
        assert_eq!(game.snake().head(), head);
    }

    #[test]
    fn restart_and_quit_after_game_over() {
        let mut game = manual(20, 10);
        game.phase = Phase::Over;
        game.score = 4;
        assert!(game.update(Msg::key(Key::Char('x'))).is_none());
        assert!(game.update(Msg::key(Key::Char('y'))).is_none());
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.best(), 4);

        game.phase = Phase::Over;
        assert!(matches!(
            game.update(Msg::key(Key::Char('n'))),
            Some(Effect::End)
        ));
    }

    #[test]
    fn quit_keys() {
        let mut game = manual(20, 10);
        assert!(matches!(game.update(Msg::key(Key::Escape)), Some(Effect::End)));
        assert!(matches!(game.update(Msg::key(Key::Char('q'))), Some(Effect::End)));
        assert!(matches!(
            game.update(Msg::key_mod(Key::Char('c'), ModMask::CTRL)),
            Some(Effect::End)
        ));
        assert!(matches!(game.update(Msg::Quit), Some(Effect::End)));
    }

    #[test]
    fn pause_stops_ticks() {
        let mut game = manual(20, 10);
        game.food = Some(Point::new(0, 0));
        game.update(Msg::key(Key::Space));
        game.step();
        assert_eq!(game.ticks(), 0);
        game.update(Msg::key(Key::Space));
        game.step();
        assert_eq!(game.ticks(), 1);
    }

    #[test]
    fn resize_restarts_on_new_field() {
        let mut game = manual(20, 10);
        game.update(Msg::Screen {
            width: 30,
            height: 12,
            time: std::time::Instant::now(),
        });
        assert_eq!(game.field(), Range::sized(30, 11));
        assert_eq!(game.snake().head(), Point::new(15, 5));
    }

    #[test]
    fn food_fills_the_last_free_cell() {
        let mut game = manual(4, 1);
        // snake of three in a row of four leaves one free cell, next to the head
        assert_eq!(game.food(), Some(Point::new(3, 0)));
        game.snake = Snake::new(Point::new(3, 0), Direction::Right, 4);
        assert_eq!(game.spawn_food(), None);
    }

    #[test]
    fn autopilot_scores() {
        for replan in [ReplanPolicy::EveryTick, ReplanPolicy::Cached] {
            let mut game = Game::new(SnakeConfig {
                replan,
                seed: Some(42),
                ..SnakeConfig::new(20, 20)
            });
            for _ in 0..2000 {
                game.step();
                if game.phase() == Phase::Over {
                    break;
                }
            }
            assert!(game.best() >= 3, "{replan:?} scored {}", game.best());
        }
    }

    #[test]
    fn autopilot_respects_no_reverse_steering() {
        let mut game = Game::new(SnakeConfig {
            steering: SteeringPolicy::NoReverse,
            seed: Some(5),
            ..SnakeConfig::new(16, 12)
        });
        let mut last = game.heading();
        for _ in 0..300 {
            game.step();
            if game.phase() == Phase::Over {
                break;
            }
            assert!(!game.heading().is_opposite(last));
            last = game.heading();
        }
        assert!(game.best() >= 1);
    }

    #[test]
    fn draws_status_snake_and_food() {
        let mut game = manual(40, 6);
        game.food = Some(Point::new(1, 1));
        let mut grid = Grid::new(40, 7);
        game.draw(&mut grid);
        assert!(text_at(&grid, 0).starts_with("Score: 0  Best: 0  Autopilot: off"));
        assert_eq!(grid.at(Point::new(1, 2)).ch, FOOD);
        let head = screen(game.snake().head());
        assert!(grid.at(head).style.attrs.contains(AttrMask::REVERSE));
        assert_eq!(grid.at(head.shift(-1, 0)).style, BODY_STYLE);
    }

    #[test]
    fn path_overlay_toggles() {
        let mut game = Game::new(SnakeConfig {
            replan: ReplanPolicy::Cached,
            seed: Some(9),
            ..SnakeConfig::new(20, 10)
        });
        game.food = Some(Point::new(15, 5));
        game.step();
        game.update(Msg::key(Key::Char('o')));
        let mut grid = Grid::new(20, 11);
        game.draw(&mut grid);
        // head at (11, 5), remaining plan runs to the food
        assert_eq!(grid.at(screen(Point::new(12, 5))).ch, TRAIL);
        assert_eq!(grid.at(screen(Point::new(15, 5))).ch, FOOD);
    }

    #[test]
    fn game_over_banner() {
        let mut game = manual(40, 6);
        game.phase = Phase::Over;
        game.score = 2;
        let mut grid = Grid::new(40, 7);
        game.draw(&mut grid);
        assert!(text_at(&grid, 4).contains("Game Over, Score: 2, Play Again? y/n"));
    }
}
