#![forbid(unsafe_code)]

//! Terminal control code provider.
//!
//! The render loop never hard-codes escape sequences. It asks a
//! [`ControlCodes`] implementation for them, which keeps the diff pass
//! testable with readable markers and lets hosts swap the dialect.
//!
//! # Sequence Reference
//!
//! | Operation | Sequence | Description |
//! |-----------|----------|-------------|
//! | `hide_cursor` | `CSI ? 25 l` | DECTCEM off |
//! | `show_cursor` | `CSI ? 25 h` | DECTCEM on |
//! | `erase_line` | `CSI 2 K` | EL, whole line |
//! | `erase_down` | `CSI J` | ED, cursor to end of screen |
//! | `cursor_move` | `CSI n D/C/A/B` | CUB/CUF/CUU/CUD, relative only |
//! | `clear_screen` | `CSI 2 J`, `CSI 3 J`, `CSI H` | ED all + purge scrollback + home |

use std::fmt;

use crossterm::Command;
use crossterm::cursor::{Hide, MoveDown, MoveLeft, MoveRight, MoveTo, MoveUp, Show};
use crossterm::terminal::{Clear, ClearType};

use crate::terminal;

/// Provider of raw escape sequences and of the terminal's column count.
///
/// Sequences are returned as owned strings so implementations are free to
/// compute them (relative moves depend on their arguments).
pub trait ControlCodes: Send + Sync {
    /// Hide the text cursor.
    fn hide_cursor(&self) -> String;

    /// Show the text cursor.
    fn show_cursor(&self) -> String;

    /// Erase the whole line the cursor is on, leaving the cursor column alone.
    fn erase_line(&self) -> String;

    /// Erase from the cursor to the bottom of the screen.
    fn erase_down(&self) -> String;

    /// Move the cursor relative to its current position.
    ///
    /// Negative `dx` moves left, negative `dy` moves up. A zero component
    /// produces no sequence for that axis.
    fn cursor_move(&self, dx: i32, dy: i32) -> String;

    /// Clear the visible screen and scrollback, homing the cursor.
    fn clear_screen(&self) -> String;

    /// Current terminal width in columns.
    fn columns(&self) -> u16;
}

/// ANSI/VT control codes generated through crossterm commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiCodes;

impl AnsiCodes {
    /// Create the provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn ansi(commands: &[&dyn AnsiCommand]) -> String {
    let mut out = String::new();
    for command in commands {
        // Writing into a String cannot fail.
        let _ = command.write_into(&mut out);
    }
    out
}

/// Object-safe view of [`crossterm::Command::write_ansi`].
trait AnsiCommand {
    fn write_into(&self, out: &mut String) -> fmt::Result;
}

impl<C: Command> AnsiCommand for C {
    fn write_into(&self, out: &mut String) -> fmt::Result {
        self.write_ansi(out)
    }
}

/// Saturating conversion of a relative distance into a crossterm step.
fn steps(distance: i32) -> u16 {
    u16::try_from(distance.unsigned_abs()).unwrap_or(u16::MAX)
}

impl ControlCodes for AnsiCodes {
    fn hide_cursor(&self) -> String {
        ansi(&[&Hide])
    }

    fn show_cursor(&self) -> String {
        ansi(&[&Show])
    }

    fn erase_line(&self) -> String {
        ansi(&[&Clear(ClearType::CurrentLine)])
    }

    fn erase_down(&self) -> String {
        ansi(&[&Clear(ClearType::FromCursorDown)])
    }

    fn cursor_move(&self, dx: i32, dy: i32) -> String {
        // CSI 0 D is treated as a one-cell move by most emulators, so zero
        // components must not emit anything.
        let mut out = String::new();
        match dx.signum() {
            -1 => out.push_str(&ansi(&[&MoveLeft(steps(dx))])),
            1 => out.push_str(&ansi(&[&MoveRight(steps(dx))])),
            _ => {}
        }
        match dy.signum() {
            -1 => out.push_str(&ansi(&[&MoveUp(steps(dy))])),
            1 => out.push_str(&ansi(&[&MoveDown(steps(dy))])),
            _ => {}
        }
        out
    }

    fn clear_screen(&self) -> String {
        ansi(&[
            &Clear(ClearType::All),
            &Clear(ClearType::Purge),
            &MoveTo(0, 0),
        ])
    }

    fn columns(&self) -> u16 {
        terminal::columns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn cursor_visibility_sequences() {
        let codes = AnsiCodes::new();
        assert_eq!(codes.hide_cursor(), "\x1b[?25l");
        assert_eq!(codes.show_cursor(), "\x1b[?25h");
    }

    #[test]
    fn erase_sequences() {
        let codes = AnsiCodes::new();
        assert_eq!(codes.erase_line(), "\x1b[2K");
        assert_eq!(codes.erase_down(), "\x1b[J");
    }

    #[test]
    fn zero_move_is_empty() {
        assert!(AnsiCodes::new().cursor_move(0, 0).is_empty());
    }

    #[test]
    fn horizontal_only_move() {
        assert_eq!(AnsiCodes::new().cursor_move(-999, 0), "\x1b[999D");
        assert_eq!(AnsiCodes::new().cursor_move(3, 0), "\x1b[3C");
    }

    #[test]
    fn combined_move_emits_both_axes() {
        assert_eq!(AnsiCodes::new().cursor_move(-999, -2), "\x1b[999D\x1b[2A");
        assert_eq!(AnsiCodes::new().cursor_move(0, 1), "\x1b[1B");
    }

    #[test]
    fn huge_distances_saturate() {
        let seq = AnsiCodes::new().cursor_move(i32::MIN, 0);
        assert_eq!(seq, format!("\x1b[{}D", u16::MAX));
    }

    fn expected_move(dx: i32, dy: i32) -> String {
        let mut out = String::new();
        if dx < 0 {
            out.push_str(&format!("\x1b[{}D", -dx));
        } else if dx > 0 {
            out.push_str(&format!("\x1b[{dx}C"));
        }
        if dy < 0 {
            out.push_str(&format!("\x1b[{}A", -dy));
        } else if dy > 0 {
            out.push_str(&format!("\x1b[{dy}B"));
        }
        out
    }

    proptest! {
        #[test]
        fn move_direction_follows_sign(dx in -2000i32..2000, dy in -2000i32..2000) {
            prop_assert_eq!(AnsiCodes::new().cursor_move(dx, dy), expected_move(dx, dy));
        }

        #[test]
        fn zero_axes_emit_nothing(d in -2000i32..2000) {
            let codes = AnsiCodes::new();
            prop_assert!(!codes.cursor_move(d, 0).contains(['A', 'B']));
            prop_assert!(!codes.cursor_move(0, d).contains(['C', 'D']));
        }
    }

    #[test]
    fn clear_screen_homes_cursor() {
        let seq = AnsiCodes::new().clear_screen();
        assert!(seq.starts_with("\x1b[2J"));
        assert!(seq.ends_with("\x1b[1;1H"));
    }
}
