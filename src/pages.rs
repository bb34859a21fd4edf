/// Menu and story screens, and the factory that builds every screen.

use crossterm::style::Color;

use crate::display::{self, Canvas};
use crate::input::{InputEvent, MoveVector};
use crate::level::LevelSession;
use crate::screens::{Screen, ScreenFactory, ScreenId, ScreenStack, Transition};
use crate::session::{GameSession, MAX_NICKNAME_CHARS};

const C_TITLE: Color = Color::Yellow;
const C_BODY: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

// ── Factory ──────────────────────────────────────────────────────────────────

/// Builds the stock screens.
pub struct GameScreens;

impl ScreenFactory for GameScreens {
    fn build(&self, id: ScreenId, session: &mut GameSession) -> Option<Box<dyn Screen>> {
        let screen: Box<dyn Screen> = match id {
            ScreenId::Cover => Box::new(CoverScreen),
            ScreenId::Customize => Box::new(CustomizeScreen::new()),
            ScreenId::Tips => Box::new(TipsScreen),
            ScreenId::Intro => Box::new(IntroScreen::new()),
            ScreenId::Level(index) => Box::new(LevelSession::new(index, session)?),
            ScreenId::Finale => Box::new(FinaleScreen),
        };
        Some(screen)
    }
}

/// A stack with the cover screen at the bottom.
pub fn new_game_stack() -> ScreenStack {
    ScreenStack::new(Box::new(CoverScreen), Box::new(GameScreens))
}

// ── Cover ────────────────────────────────────────────────────────────────────

pub struct CoverScreen;

impl Screen for CoverScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Cover
    }

    fn handle_input(&mut self, event: &InputEvent, _session: &mut GameSession) -> Transition {
        match event {
            InputEvent::Confirm => Transition::Push(ScreenId::Customize),
            InputEvent::Back => Transition::Quit,
            _ => Transition::None,
        }
    }

    fn draw(&self, _session: &GameSession, canvas: &mut Canvas) {
        canvas.clear();
        let mid = canvas.rows() as i32 / 2;
        canvas.put_centered(mid - 4, "PARAGUAYITO", C_TITLE);
        canvas.put_centered(mid - 2, "Children of Tau and Kerana", C_BODY);
        canvas.put_centered(mid, "Paraguayan mythology - the seven sons", C_HINT);
        canvas.put_centered(mid + 4, "ENTER : Start adventure   ESC : Quit", C_HINT);
    }
}

// ── Character naming ─────────────────────────────────────────────────────────

pub struct CustomizeScreen {
    text: String,
    cursor_visible: bool,
    cursor_timer: f32,
}

impl CustomizeScreen {
    pub fn new() -> Self {
        CustomizeScreen {
            text: String::new(),
            cursor_visible: true,
            cursor_timer: 0.0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for CustomizeScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for CustomizeScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Customize
    }

    fn handle_input(&mut self, event: &InputEvent, session: &mut GameSession) -> Transition {
        match event {
            InputEvent::Char(c) => {
                if !c.is_control() && self.text.chars().count() < MAX_NICKNAME_CHARS {
                    self.text.push(*c);
                }
                Transition::None
            }
            InputEvent::Erase => {
                self.text.pop();
                Transition::None
            }
            InputEvent::Confirm => {
                session.begin(&self.text);
                Transition::Push(ScreenId::Tips)
            }
            InputEvent::Back => Transition::Pop,
            _ => Transition::None,
        }
    }

    fn update(&mut self, dt: f32, _movement: MoveVector, _session: &mut GameSession) -> Transition {
        self.cursor_timer += dt;
        if self.cursor_timer > 0.5 {
            self.cursor_visible = !self.cursor_visible;
            self.cursor_timer = 0.0;
        }
        Transition::None
    }

    fn draw(&self, _session: &GameSession, canvas: &mut Canvas) {
        canvas.clear();
        let mid = canvas.rows() as i32 / 2;
        canvas.put_centered(mid - 4, "CHARACTER SETUP", C_TITLE);
        canvas.put_centered(mid - 2, "Type your name:", C_BODY);
        let cursor = if self.cursor_visible { "_" } else { " " };
        let shown = if self.text.is_empty() && !self.cursor_visible {
            "Your name...".to_string()
        } else {
            format!("{}{}", self.text, cursor)
        };
        canvas.put_centered(mid, &shown, C_BODY);
        canvas.put_centered(mid + 4, "ENTER : Continue   ESC : Back", C_HINT);
    }
}

// ── Survival tips ────────────────────────────────────────────────────────────

pub struct TipsScreen;

const TIPS: &[&str] = &["\"Don't all run off\"", "", "\"Don't give yourselves away\""];

const CONTROLS: &[&str] = &[
    "CONTROLS:",
    "W A S D / arrows - Move",
    "ENTER - Confirm",
    "SPACE - Attack",
    "ESC - Back",
];

impl Screen for TipsScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Tips
    }

    fn handle_input(&mut self, event: &InputEvent, _session: &mut GameSession) -> Transition {
        match event {
            InputEvent::Confirm => Transition::Push(ScreenId::Intro),
            InputEvent::Back => Transition::Pop,
            _ => Transition::None,
        }
    }

    fn draw(&self, _session: &GameSession, canvas: &mut Canvas) {
        canvas.clear();
        canvas.put_centered(2, "SURVIVAL TIPS", C_TITLE);
        let mut row = 4;
        for line in TIPS.iter().chain(std::iter::once(&"")).chain(CONTROLS) {
            canvas.put_centered(row, line, C_BODY);
            row += 1;
        }
        canvas.put_centered(row + 2, "ENTER : Continue   ESC : Back", C_HINT);
    }
}

// ── Story intro ──────────────────────────────────────────────────────────────

const STORY: &[&str] = &[
    "Generations ago, the seven sons of Tau and Kerana",
    "left their mark upon the Paraguayan land.",
    "",
    "You are Paraguayito, wielding an inherited machete.",
    "Cross the Chaco, face the creatures of the wild",
    "and defeat what waits in the caves to save the villages.",
    "",
    "The forest spirits are watching...",
];

pub struct IntroScreen {
    text_alpha: f32,
}

impl IntroScreen {
    pub fn new() -> Self {
        IntroScreen { text_alpha: 0.0 }
    }

    pub fn text_alpha(&self) -> f32 {
        self.text_alpha
    }
}

impl Default for IntroScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for IntroScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Intro
    }

    fn handle_input(&mut self, event: &InputEvent, _session: &mut GameSession) -> Transition {
        match event {
            InputEvent::Confirm => Transition::Push(ScreenId::Level(0)),
            InputEvent::Back => Transition::Pop,
            _ => Transition::None,
        }
    }

    fn update(&mut self, dt: f32, _movement: MoveVector, _session: &mut GameSession) -> Transition {
        self.text_alpha = (self.text_alpha + dt * 150.0).min(255.0);
        Transition::None
    }

    fn draw(&self, _session: &GameSession, canvas: &mut Canvas) {
        canvas.clear();
        let lines: Vec<String> = STORY.iter().map(|s| s.to_string()).collect();
        display::draw_story(canvas, &lines, self.text_alpha, 20.0);
        let row = canvas.rows() as i32 - 2;
        canvas.put_centered(row, "ENTER : Continue   ESC : Back", C_HINT);
    }
}

// ── Final victory ────────────────────────────────────────────────────────────

pub struct FinaleScreen;

impl Screen for FinaleScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Finale
    }

    fn handle_input(&mut self, event: &InputEvent, session: &mut GameSession) -> Transition {
        match event {
            InputEvent::Confirm | InputEvent::Back => {
                session.restart();
                Transition::PopToRoot
            }
            _ => Transition::None,
        }
    }

    fn draw(&self, session: &GameSession, canvas: &mut Canvas) {
        canvas.clear();
        let mid = canvas.rows() as i32 / 2;
        canvas.put_centered(mid - 6, "VICTORY!", C_TITLE);
        canvas.put_centered(mid - 3, "The cycle of myths has been broken.", C_BODY);
        canvas.put_centered(mid - 2, "The Luison lies defeated deep in the woods.", C_BODY);
        canvas.put_centered(mid - 1, "But his legend will live on... in your name.", C_BODY);
        canvas.put_centered(
            mid + 1,
            &format!("FINAL SCORE: {}", session.score()),
            Color::White,
        );
        canvas.put_centered(mid + 4, "ENTER : Play again   ESC : Back to start", C_HINT);
    }
}
