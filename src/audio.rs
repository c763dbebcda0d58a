//! Audio system: click, background loop and lose loop behind one mute switch

use crate::game::GameEvent;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Background music is kept quieter than the effects
const BACKGROUND_VOLUME: f32 = 0.5;
const FULL_VOLUME: f32 = 1.0;

/// The three sound handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Click,
    Background,
    Lose,
}

impl Sound {
    fn filename(&self) -> &'static str {
        match self {
            Sound::Click => "click.wav",
            Sound::Background => "background.wav",
            Sound::Lose => "lose.wav",
        }
    }

    fn volume(&self) -> f32 {
        match self {
            Sound::Background => BACKGROUND_VOLUME,
            Sound::Click | Sound::Lose => FULL_VOLUME,
        }
    }
}

/// An open output device plus the location of the sound files
struct Output {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    assets_path: PathBuf,
}

/// Audio manager handles all sound playback.
///
/// Without an output device or asset files every call is a no-op, but the
/// mute state is still tracked so the UI stays consistent.
pub struct AudioManager {
    output: Option<Output>,
    muted: bool,
    background: Option<Sink>,
    lose: Option<Sink>,
    /// The loop that should be playing, tracked even without a device
    active_loop: Option<Sound>,
}

impl AudioManager {
    /// Open the default output device. Sound starts muted.
    pub fn new() -> Self {
        let output = Self::open_output();
        if output.is_none() {
            tracing::warn!("Audio unavailable, continuing without sound");
        }
        Self {
            output,
            muted: true,
            background: None,
            lose: None,
            active_loop: None,
        }
    }

    /// A manager that never touches an audio device
    pub fn silent() -> Self {
        Self {
            output: None,
            muted: true,
            background: None,
            lose: None,
            active_loop: None,
        }
    }

    fn open_output() -> Option<Output> {
        let (stream, stream_handle) = OutputStream::try_default().ok()?;
        let assets_path = Self::find_assets_path()?;
        Some(Output {
            _stream: stream,
            stream_handle,
            assets_path,
        })
    }

    fn find_assets_path() -> Option<PathBuf> {
        let paths = [
            PathBuf::from("assets"),
            std::env::current_exe().ok()?.parent()?.join("assets"),
        ];

        paths
            .iter()
            .find(|p| p.join("sounds").exists())
            .map(|p| p.join("sounds"))
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Flip the global mute flag. Returns true when sound is now enabled.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        for (sink, sound) in [
            (&self.background, Sound::Background),
            (&self.lose, Sound::Lose),
        ] {
            if let Some(sink) = sink {
                sink.set_volume(self.effective_volume(sound));
            }
        }
        tracing::debug!(muted = self.muted, "sound toggled");
        !self.muted
    }

    fn effective_volume(&self, sound: Sound) -> f32 {
        if self.muted { 0.0 } else { sound.volume() }
    }

    /// Stop the lose loop and start the background loop
    pub fn start_background(&mut self) {
        self.stop(Sound::Lose);
        self.stop(Sound::Background);
        self.background = self.play_loop(Sound::Background);
        self.active_loop = Some(Sound::Background);
    }

    /// Stop the background loop and start the lose loop
    pub fn start_lose(&mut self) {
        self.stop(Sound::Background);
        self.stop(Sound::Lose);
        self.lose = self.play_loop(Sound::Lose);
        self.active_loop = Some(Sound::Lose);
    }

    pub fn active_loop(&self) -> Option<Sound> {
        self.active_loop
    }

    pub fn stop(&mut self, sound: Sound) {
        if self.active_loop == Some(sound) {
            self.active_loop = None;
        }
        let sink = match sound {
            Sound::Background => self.background.take(),
            Sound::Lose => self.lose.take(),
            Sound::Click => None,
        };
        if let Some(sink) = sink {
            sink.stop();
        }
    }

    /// Play the click once. Skipped entirely while muted.
    pub fn play_click(&mut self) {
        if self.muted {
            return;
        }
        if let Some((sink, decoder)) = self.open(Sound::Click) {
            sink.append(decoder);
            sink.detach();
        }
    }

    /// React to a simulation event
    pub fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PieceFixed(_) => self.play_click(),
            GameEvent::GameOver => self.start_lose(),
            GameEvent::LinesCleared(_) => {}
        }
    }

    /// Loops keep running while muted, at zero volume, so unmuting resumes them
    fn play_loop(&self, sound: Sound) -> Option<Sink> {
        let (sink, decoder) = self.open(sound)?;
        sink.append(decoder.repeat_infinite());
        Some(sink)
    }

    /// Decode a sound file and create a sink for it at the current volume
    fn open(&self, sound: Sound) -> Option<(Sink, Decoder<BufReader<File>>)> {
        let output = self.output.as_ref()?;
        let path = output.assets_path.join(sound.filename());
        let file = File::open(&path).ok()?;
        let decoder = Decoder::new(BufReader::new(file)).ok()?;
        let sink = Sink::try_new(&output.stream_handle).ok()?;
        sink.set_volume(self.effective_volume(sound));
        Some((sink, decoder))
    }
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}
