/// Device-independent input contract.
///
/// The front-end samples held directions into a `MoveVector` once per frame
/// and turns discrete key presses into `InputEvent`s.

/// Edge-triggered actions delivered to the active screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Attack,
    Confirm,
    Back,
    /// Level-skip shortcut; only honoured when enabled in the config.
    DebugAdvance,
    /// A printable character, for name entry.
    Char(char),
    /// Delete the last typed character.
    Erase,
}

/// Continuous per-frame direction sample, each axis in `[-1, 1]`.
/// Positive `dy` points down the screen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveVector {
    pub dx: f32,
    pub dy: f32,
}

impl MoveVector {
    /// Horizontal input beyond this turns the player around.
    pub const FACING_THRESHOLD: f32 = 0.2;

    const DIAGONAL: f32 = 0.7071;

    pub fn new(dx: f32, dy: f32) -> Self {
        MoveVector {
            dx: dx.clamp(-1.0, 1.0),
            dy: dy.clamp(-1.0, 1.0),
        }
    }

    /// Build a sample from four held/not-held direction flags.
    pub fn from_held(up: bool, down: bool, left: bool, right: bool) -> Self {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        MoveVector::new(axis(left, right), axis(up, down))
    }

    pub fn is_idle(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }

    /// Scale both axes by 1/√2 when moving diagonally.
    pub fn normalized(&self) -> Self {
        if self.dx != 0.0 && self.dy != 0.0 {
            MoveVector {
                dx: self.dx * Self::DIAGONAL,
                dy: self.dy * Self::DIAGONAL,
            }
        } else {
            *self
        }
    }
}
