use std::cell::RefCell;
use std::rc::Rc;

use myth_brawler::config::GameConfig;
use myth_brawler::display::Canvas;
use myth_brawler::input::{InputEvent, MoveVector};
use myth_brawler::pages::*;
use myth_brawler::screens::*;
use myth_brawler::session::{GameSession, DEFAULT_NICKNAME};

type Log = Rc<RefCell<Vec<ScreenId>>>;

/// Records every update it receives and answers input with fixed transitions.
struct Recorder {
    id: ScreenId,
    log: Log,
}

impl Screen for Recorder {
    fn id(&self) -> ScreenId {
        self.id
    }

    fn handle_input(&mut self, event: &InputEvent, _session: &mut GameSession) -> Transition {
        match event {
            InputEvent::Confirm => Transition::Push(ScreenId::Tips),
            InputEvent::Back => Transition::Pop,
            InputEvent::Char('r') => Transition::PopToRoot,
            InputEvent::Char('q') => Transition::Quit,
            InputEvent::Char('f') => Transition::Push(ScreenId::Finale),
            _ => Transition::None,
        }
    }

    fn update(&mut self, _dt: f32, _movement: MoveVector, _session: &mut GameSession) -> Transition {
        self.log.borrow_mut().push(self.id);
        Transition::None
    }
}

/// Builds recorders for everything except the finale.
struct RecorderFactory {
    log: Log,
}

impl ScreenFactory for RecorderFactory {
    fn build(&self, id: ScreenId, _session: &mut GameSession) -> Option<Box<dyn Screen>> {
        if id == ScreenId::Finale {
            return None;
        }
        Some(Box::new(Recorder { id, log: self.log.clone() }))
    }
}

fn make_session() -> GameSession {
    GameSession::new(GameConfig::default(), Some(1))
}

fn recorder_stack() -> (ScreenStack, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let root = Box::new(Recorder { id: ScreenId::Cover, log: log.clone() });
    let stack = ScreenStack::new(root, Box::new(RecorderFactory { log: log.clone() }));
    (stack, log)
}

fn press(stack: &mut ScreenStack, session: &mut GameSession, event: InputEvent) {
    stack.handle_input(&event, session);
}

fn type_text(stack: &mut ScreenStack, session: &mut GameSession, text: &str) {
    for c in text.chars() {
        press(stack, session, InputEvent::Char(c));
    }
}

// ── Stack mechanics ───────────────────────────────────────────────────────────

#[test]
fn pop_on_single_screen_is_noop() {
    let (mut stack, _) = recorder_stack();
    assert!(!stack.pop());
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.ids(), vec![ScreenId::Cover]);
}

#[test]
fn push_and_pop_through_transitions() {
    let (mut stack, _) = recorder_stack();
    let mut session = make_session();

    press(&mut stack, &mut session, InputEvent::Confirm);
    assert_eq!(stack.ids(), vec![ScreenId::Cover, ScreenId::Tips]);
    assert_eq!(stack.current().map(|s| s.id()), Some(ScreenId::Tips));

    press(&mut stack, &mut session, InputEvent::Back);
    assert_eq!(stack.ids(), vec![ScreenId::Cover]);
    press(&mut stack, &mut session, InputEvent::Back);
    assert_eq!(stack.len(), 1);
}

#[test]
fn pop_to_root_keeps_bottom_screen() {
    let (mut stack, _) = recorder_stack();
    let mut session = make_session();
    for _ in 0..3 {
        press(&mut stack, &mut session, InputEvent::Confirm);
    }
    assert_eq!(stack.len(), 4);
    press(&mut stack, &mut session, InputEvent::Char('r'));
    assert_eq!(stack.ids(), vec![ScreenId::Cover]);
}

#[test]
fn quit_is_flagged() {
    let (mut stack, _) = recorder_stack();
    let mut session = make_session();
    assert!(!stack.should_quit());
    press(&mut stack, &mut session, InputEvent::Char('q'));
    assert!(stack.should_quit());
    assert_eq!(stack.len(), 1);
}

#[test]
fn only_top_screen_updates() {
    let (mut stack, log) = recorder_stack();
    let mut session = make_session();
    stack.update(0.016, MoveVector::default(), &mut session);
    press(&mut stack, &mut session, InputEvent::Confirm);
    stack.update(0.016, MoveVector::default(), &mut session);
    stack.update(0.016, MoveVector::default(), &mut session);
    assert_eq!(*log.borrow(), vec![ScreenId::Cover, ScreenId::Tips, ScreenId::Tips]);
}

#[test]
fn unbuildable_push_is_ignored() {
    let (mut stack, _) = recorder_stack();
    let mut session = make_session();
    press(&mut stack, &mut session, InputEvent::Char('f'));
    assert_eq!(stack.ids(), vec![ScreenId::Cover]);
}

// ── Game screens ──────────────────────────────────────────────────────────────

#[test]
fn cover_to_first_level() {
    let mut stack = new_game_stack();
    let mut session = make_session();

    press(&mut stack, &mut session, InputEvent::Confirm);
    type_text(&mut stack, &mut session, "Ana");
    press(&mut stack, &mut session, InputEvent::Confirm);
    assert_eq!(session.nickname(), "Ana");

    press(&mut stack, &mut session, InputEvent::Confirm);
    press(&mut stack, &mut session, InputEvent::Confirm);
    assert_eq!(
        stack.ids(),
        vec![
            ScreenId::Cover,
            ScreenId::Customize,
            ScreenId::Tips,
            ScreenId::Intro,
            ScreenId::Level(0),
        ]
    );

    press(&mut stack, &mut session, InputEvent::Back);
    assert_eq!(stack.current().map(|s| s.id()), Some(ScreenId::Intro));
}

#[test]
fn empty_name_gets_default() {
    let mut stack = new_game_stack();
    let mut session = make_session();
    press(&mut stack, &mut session, InputEvent::Confirm);
    type_text(&mut stack, &mut session, "   ");
    press(&mut stack, &mut session, InputEvent::Confirm);
    assert_eq!(session.nickname(), DEFAULT_NICKNAME);
}

#[test]
fn name_entry_edits() {
    let mut screen = CustomizeScreen::new();
    let mut session = make_session();
    for c in "Tupa".chars() {
        screen.handle_input(&InputEvent::Char(c), &mut session);
    }
    screen.handle_input(&InputEvent::Erase, &mut session);
    assert_eq!(screen.text(), "Tup");

    for _ in 0..40 {
        screen.handle_input(&InputEvent::Char('x'), &mut session);
    }
    assert_eq!(screen.text().chars().count(), 16);
}

#[test]
fn cover_back_quits() {
    let mut stack = new_game_stack();
    let mut session = make_session();
    press(&mut stack, &mut session, InputEvent::Back);
    assert!(stack.should_quit());
}

#[test]
fn finale_restarts_the_run() {
    let mut stack = new_game_stack();
    let mut session = make_session();
    session.begin("Ana");
    stack.apply(Transition::Push(ScreenId::Level(0)), &mut session);
    stack.apply(Transition::Push(ScreenId::Finale), &mut session);
    session.add_score(420);
    session.player.health = 12.0;

    let mut canvas = Canvas::new(80, 24, session.config.field);
    stack.draw(&session, &mut canvas);
    assert!(canvas.contains("FINAL SCORE: 420"));

    press(&mut stack, &mut session, InputEvent::Confirm);
    assert_eq!(stack.ids(), vec![ScreenId::Cover]);
    assert_eq!(session.score(), 0);
    assert_eq!(session.player.health, 100.0);
    assert_eq!(session.nickname(), "Ana");
}

#[test]
fn missing_level_is_not_pushed() {
    let mut stack = new_game_stack();
    let mut session = make_session();
    stack.apply(Transition::Push(ScreenId::Level(9)), &mut session);
    assert_eq!(stack.len(), 1);
}

#[test]
fn intro_text_fades_in() {
    let mut screen = IntroScreen::new();
    let mut session = make_session();
    screen.update(1.0, MoveVector::default(), &mut session);
    assert_eq!(screen.text_alpha(), 150.0);
    screen.update(1.0, MoveVector::default(), &mut session);
    assert_eq!(screen.text_alpha(), 255.0);
}

#[test]
fn cover_draws_title() {
    let stack = new_game_stack();
    let session = make_session();
    let mut canvas = Canvas::new(80, 24, session.config.field);
    stack.draw(&session, &mut canvas);
    assert!(canvas.contains("PARAGUAYITO"));
}
