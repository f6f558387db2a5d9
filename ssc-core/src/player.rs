/// Direction the listener is moving through the queue. Skips of deleted
/// tracks continue in the same direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackDirection {
    #[default]
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Other,
}

/// User input on the page that reveals the intended direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    PreviousClicked,
    NextClicked,
    KeyDown { key: Key, shift: bool, repeat: bool },
}

/// Command issued to the page's player controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Previous,
    Next,
}

#[derive(Debug, Default)]
pub struct PlayerState {
    direction: PlaybackDirection,
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(&self) -> PlaybackDirection {
        self.direction
    }

    pub fn handle_input(&mut self, input: PlayerInput) {
        let direction = match input {
            PlayerInput::PreviousClicked => PlaybackDirection::Backward,
            PlayerInput::NextClicked => PlaybackDirection::Forward,
            PlayerInput::KeyDown { key, shift, repeat } => {
                if repeat || !shift {
                    return;
                }
                match key {
                    Key::ArrowLeft => PlaybackDirection::Backward,
                    Key::ArrowRight => PlaybackDirection::Forward,
                    Key::Other => return,
                }
            }
        };
        if direction != self.direction {
            log::debug!("playback direction: {:?}", direction);
        }
        self.direction = direction;
    }

    /// The control that skips the current track without reversing.
    pub fn skip(&self) -> PlayerCommand {
        match self.direction {
            PlaybackDirection::Forward => PlayerCommand::Next,
            PlaybackDirection::Backward => PlayerCommand::Previous,
        }
    }
}
