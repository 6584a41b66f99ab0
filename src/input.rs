//! Keyboard mapping with press-edge detection.

use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the game itself understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Flip,
    Up,
    Down,
    Confirm,
    Back,
}

/// Everything a key can mean, including things the frame loop handles
/// outside the game (quitting, audio).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Game(Input),
    Quit,
    ToggleMute,
    VolumeUp,
    VolumeDown,
}

/// Turns key events into commands, one per physical press.
///
/// Auto-repeat events are always dropped. When the terminal reports key
/// releases, a key also stays latched until it is released, so holding
/// Space flips exactly once.
#[derive(Debug, Default)]
pub struct KeyLatch {
    release_events: bool,
    held: HashSet<KeyCode>,
}

impl KeyLatch {
    pub fn new(release_events: bool) -> Self {
        KeyLatch {
            release_events,
            held: HashSet::new(),
        }
    }

    pub fn accept(&mut self, key: &KeyEvent) -> Option<Command> {
        match key.kind {
            KeyEventKind::Release => {
                self.held.remove(&key.code);
                None
            }
            KeyEventKind::Repeat => None,
            KeyEventKind::Press => {
                if self.release_events && !self.held.insert(key.code) {
                    return None;
                }
                map_key(key)
            }
        }
    }
}

pub fn map_key(key: &KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    let cmd = match key.code {
        KeyCode::Char(' ') => Command::Game(Input::Flip),
        KeyCode::Up | KeyCode::Char('k') => Command::Game(Input::Up),
        KeyCode::Down | KeyCode::Char('j') => Command::Game(Input::Down),
        KeyCode::Enter => Command::Game(Input::Confirm),
        KeyCode::Esc => Command::Game(Input::Back),
        KeyCode::Char('q') => Command::Quit,
        KeyCode::Char('m') => Command::ToggleMute,
        KeyCode::Char('+') | KeyCode::Char('=') => Command::VolumeUp,
        KeyCode::Char('-') => Command::VolumeDown,
        _ => return None,
    };
    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    fn repeat(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Repeat)
    }

    #[test]
    fn space_flips() {
        assert_eq!(
            map_key(&press(KeyCode::Char(' '))),
            Some(Command::Game(Input::Flip))
        );
    }

    #[test]
    fn ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&key), Some(Command::Quit));
        assert_eq!(map_key(&press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn repeats_are_ignored() {
        let mut latch = KeyLatch::new(false);
        assert!(latch.accept(&press(KeyCode::Char(' '))).is_some());
        assert_eq!(latch.accept(&repeat(KeyCode::Char(' '))), None);
    }

    #[test]
    fn held_key_fires_once_until_released() {
        let mut latch = KeyLatch::new(true);
        let space = KeyCode::Char(' ');
        assert_eq!(latch.accept(&press(space)), Some(Command::Game(Input::Flip)));
        assert_eq!(latch.accept(&press(space)), None);
        assert_eq!(latch.accept(&release(space)), None);
        assert_eq!(latch.accept(&press(space)), Some(Command::Game(Input::Flip)));
    }

    #[test]
    fn without_release_reporting_every_press_counts() {
        let mut latch = KeyLatch::new(false);
        let space = KeyCode::Char(' ');
        assert!(latch.accept(&press(space)).is_some());
        assert!(latch.accept(&press(space)).is_some());
    }

    #[test]
    fn latches_are_per_key() {
        let mut latch = KeyLatch::new(true);
        assert!(latch.accept(&press(KeyCode::Char(' '))).is_some());
        assert_eq!(
            latch.accept(&press(KeyCode::Up)),
            Some(Command::Game(Input::Up))
        );
    }
}
