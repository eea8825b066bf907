//! Key and mouse bindings.

use crate::area::Pixel;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Action from a key press or mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Pick up the piece in home slot N (0-based).
    PickSlot(usize),
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    /// Drop the floating piece / confirm.
    Drop,
    /// Return the floating piece to its slot / back.
    Cancel,
    NewGame,
    Pause,
    Quit,
    /// Pointer pressed at a screen position.
    Press(Pixel),
    /// Pointer dragged to a screen position.
    DragTo(Pixel),
    /// Pointer released at a screen position.
    Release(Pixel),
    None,
}

/// Map key event to game action. Supports arrows and vim-style hjkl.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Char('p') | KeyCode::Char('P') => Action::Pause,
        KeyCode::Char('r') | KeyCode::Char('R') => Action::NewGame,
        KeyCode::Char(c @ '1'..='9') => Action::PickSlot(c as usize - '1' as usize),
        KeyCode::Left | KeyCode::Char('h') => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::MoveRight,
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Drop,
        _ => Action::None,
    }
}

/// Map mouse event to game action. Left button drags; right button cancels.
pub fn mouse_to_action(mouse: MouseEvent) -> Action {
    let px = Pixel::new(i32::from(mouse.row), i32::from(mouse.column));
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Action::Press(px),
        MouseEventKind::Drag(MouseButton::Left) => Action::DragTo(px),
        MouseEventKind::Up(MouseButton::Left) => Action::Release(px),
        MouseEventKind::Down(MouseButton::Right) => Action::Cancel,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_slot_keys() {
        assert_eq!(key_to_action(key(KeyCode::Char('1'))), Action::PickSlot(0));
        assert_eq!(key_to_action(key(KeyCode::Char('9'))), Action::PickSlot(8));
        assert_eq!(key_to_action(key(KeyCode::Char('0'))), Action::None);
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(key_to_action(key(KeyCode::Left)), Action::MoveLeft);
        assert_eq!(key_to_action(key(KeyCode::Char('j'))), Action::MoveDown);
        assert_eq!(key_to_action(key(KeyCode::Enter)), Action::Drop);
        assert_eq!(key_to_action(key(KeyCode::Esc)), Action::Cancel);
    }

    #[test]
    fn test_ctrl_c_quits_other_modifiers_ignored() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_c), Action::Quit);
        let alt_h = KeyEvent::new(KeyCode::Char('h'), KeyModifiers::ALT);
        assert_eq!(key_to_action(alt_h), Action::None);
    }

    #[test]
    fn test_mouse_row_col_order() {
        let down = mouse(MouseEventKind::Down(MouseButton::Left), 12, 3);
        assert_eq!(mouse_to_action(down), Action::Press(Pixel::new(3, 12)));
        let drag = mouse(MouseEventKind::Drag(MouseButton::Left), 5, 7);
        assert_eq!(mouse_to_action(drag), Action::DragTo(Pixel::new(7, 5)));
        let up = mouse(MouseEventKind::Up(MouseButton::Left), 0, 0);
        assert_eq!(mouse_to_action(up), Action::Release(Pixel::new(0, 0)));
        let right = mouse(MouseEventKind::Down(MouseButton::Right), 1, 1);
        assert_eq!(mouse_to_action(right), Action::Cancel);
        assert_eq!(mouse_to_action(mouse(MouseEventKind::Moved, 1, 1)), Action::None);
    }
}
