use std::{
    io,
    time::{Duration, Instant},
};

use blockdrop_engine::{
    GameConfig, GameKey, GameSession, PieceGenerator, PieceSeed, SessionState, SoundCue,
};
use crossterm::{
    event::{
        Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};
use rand::Rng as _;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Flex, Layout},
    style::{Color, Style, Stylize as _},
    text::{Line, Text},
    widgets::{Block as BlockWidget, Clear},
};

use crate::{
    event_loop::{EventLoop, TuiEvent},
    widgets::{BoardDisplay, style},
};

const TICK_RATE: f64 = 60.0;
/// How long a key still counts as held after its last press/repeat event,
/// on terminals that do not report key releases.
const SYNTHETIC_RELEASE_AFTER: f64 = 0.15;
/// How long a sound cue banner stays on screen, in seconds.
const BANNER_SECS: f64 = 0.8;

/// Top-level application: title screen, game screen, main loop.
#[derive(Debug)]
pub struct BlockdropApp {
    config: GameConfig,
    seed: PieceSeed,
    screen: Screen,
    release_events: bool,
    exiting: bool,
}

#[derive(Debug, derive_more::IsVariant)]
enum Screen {
    Title,
    Playing(PlayScreen),
}

impl BlockdropApp {
    pub fn new(config: GameConfig, seed: PieceSeed) -> Self {
        Self {
            config,
            seed,
            screen: Screen::Title,
            release_events: false,
            exiting: false,
        }
    }

    /// Runs the application until the player quits.
    ///
    /// Terminals speaking the kitty keyboard protocol report key releases
    /// directly; those are enabled here and undone on exit. Everywhere
    /// else, held keys are tracked per press/repeat event and released
    /// synthetically after a short quiet period (see
    /// [`PlayScreen::handle_key`]).
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        self.release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.release_events {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        let result = self.event_loop(terminal);
        if self.release_events {
            execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
        }
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        let mut events = EventLoop::new(TICK_RATE);
        while !self.exiting {
            match events.next()? {
                TuiEvent::Tick(dt) => self.update(dt),
                TuiEvent::Render => {
                    terminal.draw(|frame| self.draw(frame))?;
                }
                TuiEvent::Crossterm(event) => self.handle_event(&event),
            }
        }
        Ok(())
    }

    fn update(&mut self, dt: Duration) {
        if let Screen::Playing(play) = &mut self.screen {
            play.tick(dt);
        }
    }

    fn handle_event(&mut self, event: &Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        if key.kind == KeyEventKind::Press {
            match key.code {
                KeyCode::Char('q') => {
                    self.exiting = true;
                    return;
                }
                KeyCode::Enter if self.screen.is_title() || self.is_game_over() => {
                    if !self.screen.is_title() {
                        // Restarts get a fresh piece sequence.
                        self.seed = rand::rng().random();
                    }
                    self.start_game();
                    return;
                }
                _ => {}
            }
        }
        if let Screen::Playing(play) = &mut self.screen {
            play.handle_key(key);
        }
    }

    fn is_game_over(&self) -> bool {
        matches!(&self.screen, Screen::Playing(play) if play.session.state().is_game_over())
    }

    fn start_game(&mut self) {
        let session = GameSession::new(self.config, PieceGenerator::with_seed(self.seed));
        self.screen = Screen::Playing(PlayScreen::new(session, self.release_events));
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        match &self.screen {
            Screen::Title => self.draw_title(frame),
            Screen::Playing(play) => play.draw(frame),
        }
    }

    fn draw_title(&self, frame: &mut Frame<'_>) {
        let text = Text::from(vec![
            Line::from("B L O C K D R O P").bold(),
            Line::default(),
            Line::from(format!("seed: {}", self.seed)),
            Line::default(),
            Line::from("Enter (Start) | Q (Quit)").dark_gray(),
        ])
        .centered();
        let area = frame.area().centered_vertically(Constraint::Length(5));
        frame.render_widget(text, area);
    }
}

/// One game in progress, plus its transient presentation state.
#[derive(Debug)]
struct PlayScreen {
    session: GameSession,
    /// Most recent sound cue and when it fired; drawn as a banner.
    banner: Option<(SoundCue, Instant)>,
    /// Last press/repeat instant per held key, for terminals that do not
    /// report key releases.
    synthetic_holds: Vec<(GameKey, Instant)>,
    release_events: bool,
}

impl PlayScreen {
    fn new(session: GameSession, release_events: bool) -> Self {
        Self {
            session,
            banner: None,
            synthetic_holds: Vec::new(),
            release_events,
        }
    }

    fn handle_key(&mut self, event: KeyEvent) {
        let Some(key) = map_key(event.code) else {
            return;
        };
        match event.kind {
            KeyEventKind::Press => {
                self.session.key_pressed(key);
                if !self.release_events {
                    self.note_key_activity(key);
                }
            }
            KeyEventKind::Repeat => {
                if !self.release_events {
                    self.note_key_activity(key);
                }
            }
            KeyEventKind::Release => self.session.key_released(key),
        }
    }

    fn note_key_activity(&mut self, key: GameKey) {
        let now = Instant::now();
        if let Some(entry) = self.synthetic_holds.iter_mut().find(|(held, _)| *held == key) {
            entry.1 = now;
        } else {
            self.synthetic_holds.push((key, now));
        }
    }

    fn tick(&mut self, dt: Duration) {
        let now = Instant::now();
        for i in (0..self.synthetic_holds.len()).rev() {
            let (key, last_seen) = self.synthetic_holds[i];
            if now.duration_since(last_seen).as_secs_f64() > SYNTHETIC_RELEASE_AFTER {
                self.synthetic_holds.swap_remove(i);
                self.session.key_released(key);
            }
        }

        self.session.tick(dt.as_secs_f64());

        if let Some(cue) = self.session.take_sound_cues().pop() {
            self.banner = Some((cue, Instant::now()));
        }
        if let Some((_, since)) = self.banner
            && since.elapsed().as_secs_f64() > BANNER_SECS
        {
            self.banner = None;
        }
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let border_style = match self.session.state() {
            SessionState::Running => Style::new().fg(Color::White),
            SessionState::GameOver => Style::new().fg(Color::Red),
        };
        let board = BoardDisplay::new(self.session.board())
            .falling_squares(self.session.falling_squares())
            .block(
                BlockWidget::bordered()
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );

        let mut stats = vec![
            Line::from(format!("lines: {}", self.session.lines_cleared())),
            Line::from(format!("fall:  {:.2}s", self.session.fall_interval())),
        ];
        if let Some((cue, _)) = &self.banner {
            stats.push(Line::default());
            stats.push(Line::from(format!("♪ {cue}")).bold());
        }

        let help_text = match self.session.state() {
            SessionState::Running => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ X (Rotate) | + - (Speed) | Q (Quit)"
            }
            SessionState::GameOver => "Controls: Enter (Restart) | Q (Quit)",
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(board.height()), Constraint::Length(1)])
                .areas::<2>(frame.area());
        let [board_area, stats_area] = Layout::horizontal([
            Constraint::Length(board.width()),
            Constraint::Length(20),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas::<2>(main_area);

        let board_width = board.width();
        frame.render_widget(&board, board_area);
        frame.render_widget(Text::from(stats), stats_area);
        frame.render_widget(help_text, help_area);

        if self.session.state().is_game_over() {
            let popup_style = Style::new().fg(Color::White).bg(Color::Red);
            let area = board_area
                .centered(Constraint::Length(board_width), Constraint::Length(3));
            let block = BlockWidget::new().style(popup_style);
            let inner = block.inner(area);
            frame.render_widget(Clear, area);
            frame.render_widget(block, area);
            frame.render_widget(
                Text::styled("GAME OVER!!", popup_style).centered(),
                inner.centered_vertically(Constraint::Length(1)),
            );
        }
    }
}

fn map_key(code: KeyCode) -> Option<GameKey> {
    match code {
        KeyCode::Up | KeyCode::Char('x') => Some(GameKey::RotateCw),
        KeyCode::Left => Some(GameKey::Left),
        KeyCode::Right => Some(GameKey::Right),
        KeyCode::Down => Some(GameKey::SoftDrop),
        KeyCode::Char('+') => Some(GameKey::SpeedUp),
        KeyCode::Char('-') => Some(GameKey::SpeedDown),
        _ => None,
    }
}
