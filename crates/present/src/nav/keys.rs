/// Keys the controller reacts to. Hosts map their own key events onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    H,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn with_shift(key: Key) -> Self {
        Self { key, shift: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Forward,
    Backward,
    DismissHelp,
}

/// Map a key press to a navigation command.
///
/// Arrow keys ignore modifiers; Space goes backward with Shift held.
pub fn command_for(input: KeyInput) -> Command {
    match input.key {
        Key::ArrowRight => Command::Forward,
        Key::ArrowLeft => Command::Backward,
        Key::Space if input.shift => Command::Backward,
        Key::Space => Command::Forward,
        Key::H => Command::DismissHelp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows() {
        assert_eq!(command_for(KeyInput::new(Key::ArrowRight)), Command::Forward);
        assert_eq!(command_for(KeyInput::new(Key::ArrowLeft)), Command::Backward);
        assert_eq!(
            command_for(KeyInput::with_shift(Key::ArrowRight)),
            Command::Forward
        );
    }

    #[test]
    fn test_space() {
        assert_eq!(command_for(KeyInput::new(Key::Space)), Command::Forward);
        assert_eq!(
            command_for(KeyInput::with_shift(Key::Space)),
            Command::Backward
        );
    }

    #[test]
    fn test_help() {
        assert_eq!(command_for(KeyInput::new(Key::H)), Command::DismissHelp);
        assert_eq!(command_for(KeyInput::with_shift(Key::H)), Command::DismissHelp);
    }
}
