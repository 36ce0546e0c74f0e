//! Rodio-backed mixer, music track and sound sample.
//!
//! The mixer owns the output stream; it has to outlive every sink created on
//! it. The music track sits paused in its own sink from the moment it loads,
//! so "start" and "resume" are both a `play` on that sink.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::{debug, info, warn};
use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::AudioBackend;
use crate::assets::AssetKind;
use crate::error::{Result, ShellError};
use crate::lifecycle::InitStage;

/// The opened audio output device.
pub struct Mixer {
    // must be kept alive for `handle` to produce sound
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl Mixer {
    /// Open the default output device.
    pub fn open() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| ShellError::init(InitStage::Audio, e))?;
        info!("Audio output opened");
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

/// A streamed, endlessly looping music track.
pub struct Music {
    sink: Sink,
}

impl Music {
    pub fn load(path: &Path, mixer: &Mixer) -> Result<Self> {
        let fail = |e: &dyn std::fmt::Display| ShellError::asset(AssetKind::Music, path, e);

        let file = File::open(path).map_err(|e| fail(&e))?;
        let track = Decoder::new_looped(BufReader::new(file)).map_err(|e| fail(&e))?;
        let sink = Sink::try_new(&mixer.handle).map_err(|e| fail(&e))?;
        sink.pause();
        sink.append(track);

        Ok(Self { sink })
    }
}

type Clip = Buffered<Decoder<BufReader<File>>>;

/// A short clip decoded up front. Every play clones the buffered source,
/// which shares the decoded frames instead of copying them.
#[derive(Clone)]
pub struct Sample {
    clip: Clip,
}

impl Sample {
    pub fn load(path: &Path) -> Result<Self> {
        let fail = |e: &dyn std::fmt::Display| ShellError::asset(AssetKind::Sample, path, e);

        let file = File::open(path).map_err(|e| fail(&e))?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| fail(&e))?;
        if decoder.channels() == 0 || decoder.sample_rate() == 0 {
            return Err(fail(&"stream reports no channels or a zero sample rate"));
        }

        let clip = decoder.buffered();
        // walking one clone decodes the whole file into the shared frames
        let samples = clip.clone().count();
        debug!("Decoded {samples} samples from {}", path.display());

        Ok(Self { clip })
    }

    pub fn channels(&self) -> u16 {
        self.clip.channels()
    }

    pub fn sample_rate(&self) -> u32 {
        self.clip.sample_rate()
    }

    /// Mix one copy of the clip into the output. Overlapping plays each get
    /// their own voice.
    fn play_on(&self, mixer: &Mixer) -> Result<(), rodio::PlayError> {
        mixer
            .handle
            .play_raw(self.clip.clone().convert_samples::<f32>())
    }
}

/// Borrowed view over the loaded audio used while the loop runs.
pub struct Playback<'a> {
    pub mixer: &'a Mixer,
    pub music: &'a Music,
    pub sample: &'a Sample,
}

impl AudioBackend for Playback<'_> {
    fn start_music(&mut self) {
        info!("Music started");
        self.music.sink.play();
    }

    fn pause_music(&mut self) {
        info!("Music paused");
        self.music.sink.pause();
    }

    fn resume_music(&mut self) {
        info!("Music resumed");
        self.music.sink.play();
    }

    fn play_sample(&mut self) {
        if let Err(err) = self.sample.play_on(self.mixer) {
            warn!("Sound effect playback failed: {err}");
        }
    }
}
