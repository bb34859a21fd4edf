/// Screen stack: the active screen is the last one pushed.
///
/// Screens never hold references to each other.  They ask for a change by
/// returning a `Transition`, naming targets by `ScreenId`, and the stack
/// builds the new screen through its `ScreenFactory`.

use crate::display::Canvas;
use crate::input::{InputEvent, MoveVector};
use crate::session::GameSession;

/// Every concrete screen the game can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenId {
    Cover,
    Customize,
    Tips,
    Intro,
    /// Zero-based index into the configured levels.
    Level(usize),
    Finale,
}

/// What the active screen wants to happen after handling a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    None,
    Push(ScreenId),
    Pop,
    /// Drop everything above the bottom screen.
    PopToRoot,
    Quit,
}

/// An interactive state.  Only the top of the stack receives calls.
pub trait Screen {
    fn id(&self) -> ScreenId;

    fn handle_input(&mut self, _event: &InputEvent, _session: &mut GameSession) -> Transition {
        Transition::None
    }

    fn update(&mut self, _dt: f32, _movement: MoveVector, _session: &mut GameSession) -> Transition {
        Transition::None
    }

    fn draw(&self, _session: &GameSession, _canvas: &mut Canvas) {}
}

/// Builds screens from ids.  Returns `None` for ids it cannot build
/// (e.g. a level index past the configured table).
pub trait ScreenFactory {
    fn build(&self, id: ScreenId, session: &mut GameSession) -> Option<Box<dyn Screen>>;
}

pub struct ScreenStack {
    screens: Vec<Box<dyn Screen>>,
    factory: Box<dyn ScreenFactory>,
    quit: bool,
}

impl ScreenStack {
    pub fn new(root: Box<dyn Screen>, factory: Box<dyn ScreenFactory>) -> Self {
        ScreenStack {
            screens: vec![root],
            factory,
            quit: false,
        }
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn current(&self) -> Option<&dyn Screen> {
        self.screens.last().map(|s| s.as_ref())
    }

    /// Ids from bottom to top.
    pub fn ids(&self) -> Vec<ScreenId> {
        self.screens.iter().map(|s| s.id()).collect()
    }

    /// Make `screen` active.  The previous top keeps its state but stops
    /// receiving calls until it is on top again.
    pub fn push(&mut self, screen: Box<dyn Screen>) {
        tracing::debug!(screen = ?screen.id(), depth = self.screens.len() + 1, "push");
        self.screens.push(screen);
    }

    /// Discard the top screen.  The bottom screen is never removed, so this
    /// is a no-op on a single-screen stack.  Returns whether anything was
    /// popped.
    pub fn pop(&mut self) -> bool {
        if self.screens.len() <= 1 {
            return false;
        }
        if let Some(screen) = self.screens.pop() {
            tracing::debug!(screen = ?screen.id(), depth = self.screens.len(), "pop");
        }
        true
    }

    pub fn pop_to_root(&mut self) {
        while self.pop() {}
    }

    pub fn handle_input(&mut self, event: &InputEvent, session: &mut GameSession) {
        let transition = match self.screens.last_mut() {
            Some(screen) => screen.handle_input(event, session),
            None => Transition::None,
        };
        self.apply(transition, session);
    }

    pub fn update(&mut self, dt: f32, movement: MoveVector, session: &mut GameSession) {
        let transition = match self.screens.last_mut() {
            Some(screen) => screen.update(dt, movement, session),
            None => Transition::None,
        };
        self.apply(transition, session);
    }

    pub fn draw(&self, session: &GameSession, canvas: &mut Canvas) {
        if let Some(screen) = self.current() {
            screen.draw(session, canvas);
        }
    }

    /// Carry out a transition immediately.
    pub fn apply(&mut self, transition: Transition, session: &mut GameSession) {
        match transition {
            Transition::None => {}
            Transition::Push(id) => match self.factory.build(id, session) {
                Some(screen) => self.push(screen),
                None => tracing::warn!(screen = ?id, "no such screen, push ignored"),
            },
            Transition::Pop => {
                self.pop();
            }
            Transition::PopToRoot => self.pop_to_root(),
            Transition::Quit => {
                tracing::info!("quit requested");
                self.quit = true;
            }
        }
    }
}
