//! Dino Run effects playground.
//!
//! A bare-bones runner scene in the terminal wired into the particle system:
//! jumping kicks up dust, landing puffs dust, running into an obstacle throws
//! sparks.
//!
//! Keys: Space/Up jump, Down duck, C crash burst, P random power-up, Q/Esc quit.

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use dino_fx::catalog::{ActivePowerUp, ObstacleKind, PowerUpKind};
use dino_fx::{
    build_info, Clock, EffectsConfig, ParticleKind, ParticleLayer, ParticleSystem, SystemClock,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// World units per terminal cell.
const CELL_WIDTH: f64 = 10.0;
const CELL_HEIGHT: f64 = 20.0;

const RUNNER_X: f64 = 60.0;
const RUNNER_HEIGHT: f64 = 40.0;
const DUCK_HEIGHT: f64 = 20.0;
const DUCK_MS: f64 = 500.0;
const RUNNER_GRAVITY: f64 = 0.6;
const JUMP_VELOCITY: f64 = -10.0;

const START_SPEED: f64 = 6.0;
const MAX_SPEED: f64 = 13.0;
const ACCELERATION: f64 = 0.001;

/// Narrowest playfield the scene simulates, whatever the terminal size.
const MIN_FIELD_WIDTH: f64 = 20.0 * CELL_WIDTH;

const FRAME: Duration = Duration::from_millis(16);

type Effects = ParticleSystem<ParticleLayer, SystemClock>;

struct Options {
    config_path: Option<PathBuf>,
    seed: Option<u64>,
}

fn print_help() {
    println!("dino-fx - Dino Run particle effects playground\n");
    println!("Usage: dino-fx [options]\n");
    println!("Options:");
    println!("  --config <path>  Load effect tuning from a JSON file");
    println!("  --seed <n>       Seed particle and obstacle randomness");
    println!("  --version        Show version information");
    println!("  --help           Show this help message");
}

fn parse_args() -> Options {
    let mut options = Options {
        config_path: None,
        seed: None,
    };
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => match args.next() {
                Some(path) => options.config_path = Some(PathBuf::from(path)),
                None => fail("--config needs a path"),
            },
            "--seed" => match args.next().and_then(|s| s.parse().ok()) {
                Some(seed) => options.seed = Some(seed),
                None => fail("--seed needs an integer"),
            },
            "--version" | "-v" => {
                println!("dino-fx {}", build_info::version_line());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => fail(&format!("Unknown option: {}", other)),
        }
    }
    options
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    eprintln!("Run 'dino-fx --help' for usage.");
    std::process::exit(1);
}

struct Obstacle {
    kind: ObstacleKind,
    x: f64,
    hit: bool,
    cleared: bool,
}

/// Minimal runner state; just enough to produce gameplay events.
struct Scene {
    width: f64,
    ground_y: f64,
    runner_y: f64,
    runner_vy: f64,
    speed: f64,
    obstacles: Vec<Obstacle>,
    next_obstacle: f64,
    power_up: Option<ActivePowerUp>,
    ducking_until: f64,
    hits: u32,
    score: u64,
    rng: StdRng,
}

impl Scene {
    fn new(width: f64, ground_y: f64, seed: Option<u64>) -> Self {
        let width = width.max(MIN_FIELD_WIDTH);
        Self {
            width,
            ground_y,
            runner_y: ground_y,
            runner_vy: 0.0,
            speed: START_SPEED,
            obstacles: Vec::new(),
            next_obstacle: width * 0.5,
            power_up: None,
            ducking_until: 0.0,
            hits: 0,
            score: 0,
            rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
        }
    }

    fn on_ground(&self) -> bool {
        self.runner_y >= self.ground_y
    }

    fn is_ducking(&self, now_ms: f64) -> bool {
        self.on_ground() && now_ms < self.ducking_until
    }

    fn runner_height(&self, now_ms: f64) -> f64 {
        if self.is_ducking(now_ms) {
            DUCK_HEIGHT
        } else {
            RUNNER_HEIGHT
        }
    }

    fn jump(&mut self, fx: &mut Effects) {
        if self.on_ground() {
            self.ducking_until = 0.0;
            self.runner_vy = JUMP_VELOCITY;
            fx.emit_jump(RUNNER_X, self.ground_y);
        }
    }

    /// Crouch for a moment; terminals report no key release.
    fn duck(&mut self, now_ms: f64) {
        if self.on_ground() {
            self.ducking_until = now_ms + DUCK_MS;
        }
    }

    fn grant_power_up(&mut self, now_ms: f64) {
        let kind = PowerUpKind::roll(&mut self.rng);
        self.power_up = Some(ActivePowerUp::new(kind, now_ms));
    }

    fn step(&mut self, fx: &mut Effects, now_ms: f64) {
        let was_airborne = !self.on_ground();
        if was_airborne || self.runner_vy < 0.0 {
            self.runner_y += self.runner_vy;
            self.runner_vy += RUNNER_GRAVITY;
        }
        if self.runner_y >= self.ground_y {
            self.runner_y = self.ground_y;
            self.runner_vy = 0.0;
            if was_airborne {
                fx.emit_land(RUNNER_X, self.ground_y);
            }
        }

        if self.power_up.is_some_and(|p| p.is_expired(now_ms)) {
            self.power_up = None;
        }
        let speed_factor = self.power_up.map_or(1.0, |p| p.kind.speed_factor());
        let speed = self.speed * speed_factor;
        let multiplier = self.power_up.map_or(1, |p| p.kind.score_multiplier());

        for obstacle in &mut self.obstacles {
            obstacle.x -= speed;
            if !obstacle.hit && !obstacle.cleared && obstacle.x + obstacle.kind.width() < RUNNER_X
            {
                obstacle.cleared = true;
                self.score += u64::from(multiplier);
            }
        }
        self.obstacles.retain(|o| o.x + o.kind.width() > 0.0);

        self.next_obstacle -= speed;
        if self.next_obstacle <= 0.0 {
            let kind = ObstacleKind::roll(&mut self.rng, self.speed);
            self.obstacles.push(Obstacle {
                kind,
                x: self.width,
                hit: false,
                cleared: false,
            });
            self.next_obstacle = self.rng.gen_range(self.width * 0.4..self.width * 0.9);
        }
        self.speed = (self.speed + ACCELERATION).min(MAX_SPEED);

        self.check_hits(fx, now_ms);
    }

    /// Throw sparks the first time an obstacle overlaps the runner.
    fn check_hits(&mut self, fx: &mut Effects, now_ms: f64) {
        let ducking = self.is_ducking(now_ms);
        let runner_bottom = self.runner_y;
        let runner_top = self.runner_y - self.runner_height(now_ms);
        let shielded = self
            .power_up
            .is_some_and(|p| p.kind == PowerUpKind::Shield);

        for obstacle in &mut self.obstacles {
            if obstacle.hit || (ducking && obstacle.kind.duck_to_avoid()) {
                continue;
            }
            let left = obstacle.x;
            let right = obstacle.x + obstacle.kind.width();
            let bottom = self.ground_y - obstacle.kind.ground_offset();
            let top = bottom - obstacle.kind.height();
            let overlaps_x = RUNNER_X >= left && RUNNER_X <= right;
            let overlaps_y = runner_bottom > top && runner_top < bottom;
            if overlaps_x && overlaps_y {
                obstacle.hit = true;
                if shielded {
                    fx.emit_default(RUNNER_X, runner_top, ParticleKind::Dust);
                } else {
                    self.hits += 1;
                    fx.emit(
                        RUNNER_X,
                        runner_top,
                        ParticleKind::Impact,
                        obstacle.kind.impact_particles(),
                    );
                }
            }
        }
    }

    fn draw(&self, area: Rect, buf: &mut Buffer, now_ms: f64) {
        let ground_row = (self.ground_y / CELL_HEIGHT) as u16;
        if ground_row < area.height {
            for x in area.left()..area.right() {
                buf.get_mut(x, area.y + ground_row)
                    .set_char('▓')
                    .set_fg(Color::Rgb(90, 70, 50));
            }
        }

        for obstacle in &self.obstacles {
            let bottom = self.ground_y - obstacle.kind.ground_offset();
            let rows = (obstacle.kind.height() / CELL_HEIGHT).ceil().max(1.0) as i32;
            let cols = (obstacle.kind.width() / CELL_WIDTH).ceil().max(1.0) as i32;
            let col0 = (obstacle.x / CELL_WIDTH).floor() as i32;
            let row_bottom = (bottom / CELL_HEIGHT).floor() as i32 - 1;
            let (ch, fg) = if obstacle.kind.is_flying() {
                ('v', Color::Rgb(160, 160, 170))
            } else {
                ('#', Color::Rgb(60, 140, 60))
            };
            for dy in 0..rows {
                for dx in 0..cols {
                    put(area, buf, col0 + dx, row_bottom - dy, ch, fg);
                }
            }
        }

        let col = (RUNNER_X / CELL_WIDTH) as i32;
        let feet = (self.runner_y / CELL_HEIGHT).floor() as i32 - 1;
        if self.is_ducking(now_ms) {
            put(area, buf, col, feet, '▬', Color::LightYellow);
        } else {
            put(area, buf, col, feet, 'Λ', Color::LightYellow);
            put(area, buf, col, feet - 1, '●', Color::LightYellow);
        }
    }
}

fn put(area: Rect, buf: &mut Buffer, col: i32, row: i32, ch: char, fg: Color) {
    if col < 0 || row < 0 || col >= area.width as i32 || row >= area.height as i32 {
        return;
    }
    buf.get_mut(area.x + col as u16, area.y + row as u16)
        .set_char(ch)
        .set_fg(fg);
}

/// Bar of `width` cells, filled in proportion to `fraction`.
fn gauge(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn status_line(scene: &Scene, fx: &Effects, now_ms: f64) -> Line<'static> {
    let power = match scene.power_up {
        Some(active) => format!(
            "{} {} {} {:.1}s",
            active.kind.glyph(),
            active.kind.name(),
            gauge(active.progress_remaining(now_ms), 8),
            active.remaining_ms(now_ms) / 1000.0
        ),
        None => "none".to_string(),
    };
    Line::from(format!(
        " score: {}  particles: {}  speed: {:.1}  hits: {}  power-up: {}  [Space] jump [Down] duck [C] crash [P] power-up [Q] quit",
        scene.score,
        fx.len(),
        scene.speed,
        scene.hits,
        power
    ))
}

fn main() -> io::Result<()> {
    let options = parse_args();

    let config = match &options.config_path {
        Some(path) => match EffectsConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            }
        },
        None => EffectsConfig::default(),
    };

    let layer = ParticleLayer::with_cell_size(CELL_WIDTH, CELL_HEIGHT);
    let mut fx = match ParticleSystem::new(layer).with_config(config) {
        Ok(fx) => fx,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };
    if let Some(seed) = options.seed {
        fx = fx.with_seed(seed);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut fx, options.seed);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    fx: &mut Effects,
    seed: Option<u64>,
) -> io::Result<()> {
    let size = terminal.size()?;
    let play_rows = size.height.saturating_sub(3).max(4);
    let width = size.width.saturating_sub(2) as f64 * CELL_WIDTH;
    let ground_y = (play_rows - 1) as f64 * CELL_HEIGHT;
    let mut scene = Scene::new(width, ground_y, seed);

    loop {
        let now_ms = fx.clock().now_ms();

        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(4), Constraint::Length(1)])
                .split(f.size());

            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightYellow))
                .title(" Dino Run FX ");
            let field = block.inner(chunks[0]);
            f.render_widget(block, chunks[0]);

            scene.draw(field, f.buffer_mut(), now_ms);
            f.render_widget(fx.sink(), field);

            f.render_widget(
                Paragraph::new(status_line(&scene, fx, now_ms))
                    .style(Style::default().fg(Color::DarkGray)),
                chunks[1],
            );
        })?;

        if event::poll(FRAME)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char(' ') | KeyCode::Up => scene.jump(fx),
                        KeyCode::Down => scene.duck(now_ms),
                        KeyCode::Char('c') => {
                            fx.emit_collision(RUNNER_X, scene.runner_y - RUNNER_HEIGHT)
                        }
                        KeyCode::Char('p') => scene.grant_power_up(now_ms),
                        _ => {}
                    }
                }
            }
        }

        let now_ms = fx.clock().now_ms();
        scene.step(fx, now_ms);
        fx.update();
    }
}
