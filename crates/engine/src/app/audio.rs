use std::collections::HashMap;
use std::path::PathBuf;

use kira::manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings};
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings};
use kira::tween::Tween;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::content::resolve_audio_file;

/// Background music and ending stingers.
pub const MUSIC_CHANNEL: u32 = 0;
/// Score pickups.
pub const STINGER_CHANNEL: u32 = 1;
/// First of the rotating effect channels.
pub const FIRST_SFX_CHANNEL: u32 = 2;
const SFX_CHANNEL_COUNT: u64 = 48;

/// Effect channel for a sound fired on `frame`. Rotating through the pool
/// lets overlapping effects play without cutting each other off.
pub fn rotating_sfx_channel(frame: u64) -> u32 {
    (frame % SFX_CHANNEL_COUNT) as u32 + FIRST_SFX_CHANNEL
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Once,
    Looping,
}

/// Fire-and-forget sound output addressed by channel. Starting a sound on a
/// busy channel replaces whatever was playing there.
pub trait AudioSink {
    fn play(&mut self, sound: &str, channel: u32, playback: Playback);
    fn halt(&mut self, channel: u32);
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to initialize audio backend: {0}")]
    Backend(String),
}

/// Opens the default output device, falling back to silence when there is none.
pub fn open_audio(audio_dir: PathBuf) -> Box<dyn AudioSink> {
    match KiraAudio::new(audio_dir) {
        Ok(audio) => {
            info!("audio_ready");
            Box::new(audio)
        }
        Err(error) => {
            warn!(error = %error, "audio_unavailable_using_silent_sink");
            Box::new(SilentAudio)
        }
    }
}

pub struct KiraAudio {
    manager: AudioManager,
    audio_dir: PathBuf,
    sounds: HashMap<String, Option<StaticSoundData>>,
    channels: HashMap<u32, StaticSoundHandle>,
}

impl KiraAudio {
    pub fn new(audio_dir: PathBuf) -> Result<Self, AudioError> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|error| AudioError::Backend(error.to_string()))?;
        Ok(Self {
            manager,
            audio_dir,
            sounds: HashMap::new(),
            channels: HashMap::new(),
        })
    }

    fn sound_data(&mut self, sound: &str) -> Option<StaticSoundData> {
        if !self.sounds.contains_key(sound) {
            let loaded = self.load(sound);
            self.sounds.insert(sound.to_string(), loaded);
        }
        self.sounds.get(sound).and_then(Clone::clone)
    }

    fn load(&self, sound: &str) -> Option<StaticSoundData> {
        let Some(path) = resolve_audio_file(&self.audio_dir, sound) else {
            warn!(sound, dir = %self.audio_dir.display(), "audio_file_missing");
            return None;
        };
        match StaticSoundData::from_file(&path) {
            Ok(data) => Some(data),
            Err(error) => {
                warn!(sound, path = %path.display(), error = %error, "audio_decode_failed");
                None
            }
        }
    }
}

impl AudioSink for KiraAudio {
    fn play(&mut self, sound: &str, channel: u32, playback: Playback) {
        let Some(data) = self.sound_data(sound) else {
            return;
        };
        self.halt(channel);

        let settings = match playback {
            Playback::Once => StaticSoundSettings::new(),
            Playback::Looping => StaticSoundSettings::new().loop_region(0.0..),
        };
        match self.manager.play(data.with_settings(settings)) {
            Ok(handle) => {
                self.channels.insert(channel, handle);
            }
            Err(error) => warn!(sound, channel, error = %error, "audio_play_failed"),
        }
    }

    fn halt(&mut self, channel: u32) {
        if let Some(mut handle) = self.channels.remove(&channel) {
            handle.stop(Tween::default());
        }
    }
}

/// Sink used when no audio device is available.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, sound: &str, channel: u32, playback: Playback) {
        debug!(sound, channel, ?playback, "silent_audio_play");
    }

    fn halt(&mut self, _channel: u32) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCommand {
    Play {
        sound: String,
        channel: u32,
        playback: Playback,
    },
    Halt {
        channel: u32,
    },
}

/// Sink that keeps every command it receives. Handy for headless runs and
/// for asserting what a tick asked to hear.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    commands: Vec<AudioCommand>,
}

impl RecordingAudio {
    pub fn commands(&self) -> &[AudioCommand] {
        &self.commands
    }

    pub fn played_sounds(&self) -> Vec<(&str, u32)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                AudioCommand::Play { sound, channel, .. } => Some((sound.as_str(), *channel)),
                AudioCommand::Halt { .. } => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, sound: &str, channel: u32, playback: Playback) {
        self.commands.push(AudioCommand::Play {
            sound: sound.to_string(),
            channel,
            playback,
        });
    }

    fn halt(&mut self, channel: u32) {
        self.commands.push(AudioCommand::Halt { channel });
    }
}
