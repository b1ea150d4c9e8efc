//! Manual key bindings

use crate::command::MovementCommand;

/// Result of one manual key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Command(MovementCommand),
    Quit,
}

/// Map a key to a command. Case-insensitive; unbound keys stop the robot.
///
/// The bindings follow the rover's wiring, where the letters do not line up
/// with the usual WASD directions.
pub fn map_key(key: char) -> KeyInput {
    match key.to_ascii_lowercase() {
        'w' => KeyInput::Command(MovementCommand::Left),
        'a' => KeyInput::Command(MovementCommand::Backward),
        's' => KeyInput::Command(MovementCommand::Right),
        'd' => KeyInput::Command(MovementCommand::Forward),
        'q' => KeyInput::Quit,
        _ => KeyInput::Command(MovementCommand::Idle),
    }
}

/// Map one line of terminal input: its first non-blank character is the key
pub fn map_line(line: &str) -> KeyInput {
    match line.trim().chars().next() {
        Some(key) => map_key(key),
        None => KeyInput::Command(MovementCommand::Idle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings() {
        assert_eq!(map_key('w'), KeyInput::Command(MovementCommand::Left));
        assert_eq!(map_key('a'), KeyInput::Command(MovementCommand::Backward));
        assert_eq!(map_key('s'), KeyInput::Command(MovementCommand::Right));
        assert_eq!(map_key('d'), KeyInput::Command(MovementCommand::Forward));
        assert_eq!(map_key('q'), KeyInput::Quit);
    }

    #[test]
    fn test_uppercase_and_unbound() {
        assert_eq!(map_key('D'), KeyInput::Command(MovementCommand::Forward));
        assert_eq!(map_key('Q'), KeyInput::Quit);
        assert_eq!(map_key('x'), KeyInput::Command(MovementCommand::Idle));
        assert_eq!(map_key(' '), KeyInput::Command(MovementCommand::Idle));
    }

    #[test]
    fn test_lines() {
        assert_eq!(map_line("  d\n"), KeyInput::Command(MovementCommand::Forward));
        assert_eq!(map_line(""), KeyInput::Command(MovementCommand::Idle));
        assert_eq!(map_line("quit"), KeyInput::Quit);
    }
}
