//! Input commands and the state they drive.

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::Key;

use crate::audio::{AudioBackend, MusicState};
use crate::config::KeyBindings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    ToggleMusic,
    PlaySound,
}

impl KeyBindings {
    pub fn command_for(&self, key: &Key) -> Option<Command> {
        let Key::Character(ch) = key else {
            return None;
        };
        if ch.eq_ignore_ascii_case(&self.toggle_music) {
            Some(Command::ToggleMusic)
        } else if ch.eq_ignore_ascii_case(&self.play_sound) {
            Some(Command::PlaySound)
        } else {
            None
        }
    }

    /// Only fresh presses count; releases and auto-repeat map to nothing.
    pub fn key_command(&self, state: ElementState, repeat: bool, key: &Key) -> Option<Command> {
        if state != ElementState::Pressed || repeat {
            return None;
        }
        self.command_for(key)
    }

    /// The command a window event maps to.
    pub fn translate(&self, event: &WindowEvent) -> Option<Command> {
        match event {
            WindowEvent::CloseRequested => Some(Command::Quit),
            WindowEvent::KeyboardInput { event, .. } => {
                self.key_command(event.state, event.repeat, &event.logical_key)
            }
            _ => None,
        }
    }
}

/// Running flag plus music state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controller {
    running: bool,
    music: MusicState,
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            running: true,
            music: MusicState::Stopped,
        }
    }
}

impl Controller {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn music(&self) -> MusicState {
        self.music
    }

    pub fn apply(&mut self, command: Command, audio: &mut impl AudioBackend) {
        match command {
            Command::Quit => self.running = false,
            Command::ToggleMusic => self.music.toggle(audio),
            Command::PlaySound => audio.play_sample(),
        }
    }

    /// Apply a whole batch of pending commands and report whether the loop
    /// should keep going.
    pub fn drain(
        &mut self,
        commands: impl IntoIterator<Item = Command>,
        audio: &mut impl AudioBackend,
    ) -> bool {
        for command in commands {
            self.apply(command, audio);
        }
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::tests::{Call, RecordingAudio};
    use crate::config::Config;
    use winit::keyboard::{NamedKey, SmolStr};

    fn bindings() -> KeyBindings {
        Config::builtin().unwrap().keys
    }

    fn char_key(s: &str) -> Key {
        Key::Character(SmolStr::new(s))
    }

    #[test]
    fn keys_map_case_insensitively() {
        let keys = bindings();
        assert_eq!(keys.command_for(&char_key("p")), Some(Command::ToggleMusic));
        assert_eq!(keys.command_for(&char_key("P")), Some(Command::ToggleMusic));
        assert_eq!(keys.command_for(&char_key("s")), Some(Command::PlaySound));
        assert_eq!(keys.command_for(&char_key("q")), None);
        assert_eq!(keys.command_for(&Key::Named(NamedKey::Escape)), None);
        assert_eq!(keys.command_for(&Key::Named(NamedKey::Space)), None);
    }

    #[test]
    fn held_key_repeat_is_ignored() {
        let keys = bindings();
        let p = char_key("p");

        assert_eq!(
            keys.key_command(ElementState::Pressed, false, &p),
            Some(Command::ToggleMusic)
        );
        assert_eq!(keys.key_command(ElementState::Pressed, true, &p), None);
        assert_eq!(
            keys.key_command(ElementState::Pressed, true, &char_key("s")),
            None
        );
        assert_eq!(keys.key_command(ElementState::Released, false, &p), None);
    }

    #[test]
    fn close_request_is_quit() {
        assert_eq!(
            bindings().translate(&WindowEvent::CloseRequested),
            Some(Command::Quit)
        );
        assert_eq!(bindings().translate(&WindowEvent::Focused(true)), None);
    }

    #[test]
    fn batches_without_quit_keep_running() {
        let mut controller = Controller::default();
        let mut audio = RecordingAudio::default();
        let batches = [
            vec![],
            vec![Command::ToggleMusic],
            vec![Command::PlaySound, Command::PlaySound, Command::ToggleMusic],
        ];
        for batch in batches {
            assert!(controller.drain(batch, &mut audio));
        }
        assert!(controller.is_running());
    }

    #[test]
    fn quit_anywhere_in_batch_stops() {
        for position in 0..4 {
            let mut batch = vec![Command::PlaySound, Command::ToggleMusic, Command::PlaySound];
            batch.insert(position, Command::Quit);

            let mut controller = Controller::default();
            let mut audio = RecordingAudio::default();
            assert!(!controller.drain(batch, &mut audio));
            assert!(!controller.is_running());
        }
    }

    #[test]
    fn quit_is_terminal() {
        let mut controller = Controller::default();
        let mut audio = RecordingAudio::default();
        controller.drain([Command::Quit], &mut audio);
        assert!(!controller.drain([Command::ToggleMusic], &mut audio));
    }

    #[test]
    fn sample_key_leaves_music_state_alone() {
        let mut controller = Controller::default();
        let mut audio = RecordingAudio::default();

        controller.drain([Command::PlaySound], &mut audio);
        assert_eq!(controller.music(), MusicState::Stopped);

        controller.drain([Command::ToggleMusic, Command::PlaySound], &mut audio);
        assert_eq!(controller.music(), MusicState::Playing);

        controller.drain([Command::ToggleMusic, Command::PlaySound], &mut audio);
        assert_eq!(controller.music(), MusicState::Paused);

        controller.drain([Command::PlaySound, Command::ToggleMusic], &mut audio);
        assert_eq!(controller.music(), MusicState::Playing);

        assert_eq!(
            audio.calls,
            vec![
                Call::Sample,
                Call::Start,
                Call::Sample,
                Call::Pause,
                Call::Sample,
                Call::Sample,
                Call::Resume
            ]
        );
    }
}
