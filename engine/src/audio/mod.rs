//! Music state and the playback seam.

pub mod rodio_backend;

pub use rodio_backend::{Mixer, Music, Playback, Sample};

/// Playback commands the shell issues. Runtime playback failures are logged by
/// the backend, never returned.
pub trait AudioBackend {
    /// Begin the music track, looping forever.
    fn start_music(&mut self);
    fn pause_music(&mut self);
    fn resume_music(&mut self);
    /// Fire the sample once on a free voice.
    fn play_sample(&mut self);
}

/// Background music state. Once started the track never returns to `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl MusicState {
    /// Advance one press of the toggle key, driving `audio` accordingly.
    pub fn toggle(&mut self, audio: &mut impl AudioBackend) {
        *self = match *self {
            MusicState::Stopped => {
                audio.start_music();
                MusicState::Playing
            }
            MusicState::Playing => {
                audio.pause_music();
                MusicState::Paused
            }
            MusicState::Paused => {
                audio.resume_music();
                MusicState::Playing
            }
        };
    }
}
