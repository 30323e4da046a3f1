//! Sound effect routing
//!
//! The simulation only requests sounds; a `SampleBackend` does the playing.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Block dropped into its matching hole
    Destroy,
    /// Block dropped into a wrong hole
    Failure,
    /// Sliding block stopped against something
    Hit,
}

impl SoundEffect {
    /// Asset name of the sample
    pub fn sample_name(&self) -> &'static str {
        match self {
            SoundEffect::Destroy => "destroy",
            SoundEffect::Failure => "failure",
            SoundEffect::Hit => "hit",
        }
    }

    /// Volume before the sfx setting is applied (0 - 100)
    pub fn base_volume(&self) -> u8 {
        match self {
            SoundEffect::Destroy => 50,
            SoundEffect::Failure => 60,
            SoundEffect::Hit => 40,
        }
    }
}

/// Something that can play a named sample
pub trait SampleBackend {
    fn play_sample(&mut self, name: &str, volume: u8);
}

/// Backend that only logs what would play
#[derive(Debug, Default)]
pub struct LogBackend;

impl SampleBackend for LogBackend {
    fn play_sample(&mut self, name: &str, volume: u8) {
        log::debug!("play sample \"{name}\" at volume {volume}");
    }
}

/// Audio manager for the game
pub struct AudioManager<B> {
    backend: B,
    sfx_volume: u8,
    muted: bool,
}

impl<B: SampleBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            sfx_volume: 100,
            muted: false,
        }
    }

    pub fn from_settings(backend: B, settings: &Settings) -> Self {
        let mut audio = Self::new(backend);
        audio.set_sfx_volume(settings.sfx_volume as i32);
        audio
    }

    /// Set SFX volume (0 - 100)
    pub fn set_sfx_volume(&mut self, vol: i32) {
        self.sfx_volume = vol.clamp(0, 100) as u8;
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Final sample volume: base volume scaled by the sfx setting
    pub fn effective_volume(&self, effect: SoundEffect) -> u8 {
        if self.muted {
            return 0;
        }
        (effect.base_volume() as u32 * self.sfx_volume as u32 / 100) as u8
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(effect);
        if vol == 0 {
            return;
        }
        self.backend.play_sample(effect.sample_name(), vol);
    }

    /// Play every sound request in `events`
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::PlaySound(effect) = event {
                self.play(*effect);
            }
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        played: Vec<(String, u8)>,
    }

    impl SampleBackend for Recorder {
        fn play_sample(&mut self, name: &str, volume: u8) {
            self.played.push((name.to_string(), volume));
        }
    }

    #[test]
    fn test_volume_scaling() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_sfx_volume(50);
        assert_eq!(audio.effective_volume(SoundEffect::Failure), 30);
        audio.set_sfx_volume(500);
        assert_eq!(audio.effective_volume(SoundEffect::Hit), 40);
        audio.set_muted(true);
        assert_eq!(audio.effective_volume(SoundEffect::Hit), 0);
    }

    #[test]
    fn test_dispatch_plays_sound_events_only() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.dispatch(&[
            GameEvent::MoveCounted { total: 1 },
            GameEvent::PlaySound(SoundEffect::Hit),
            GameEvent::StageReset,
            GameEvent::PlaySound(SoundEffect::Destroy),
        ]);
        assert_eq!(
            audio.backend().played,
            vec![("hit".to_string(), 40), ("destroy".to_string(), 50)]
        );
    }

    #[test]
    fn test_silent_requests_are_skipped() {
        let settings = Settings {
            sfx_volume: 0,
            ..Settings::default()
        };
        let mut audio = AudioManager::from_settings(Recorder::default(), &settings);
        audio.play(SoundEffect::Failure);
        assert!(audio.backend().played.is_empty());

        // The music setting does not scale effects
        let settings = Settings {
            music_volume: 0,
            ..Settings::default()
        };
        let audio = AudioManager::from_settings(Recorder::default(), &settings);
        assert_eq!(audio.effective_volume(SoundEffect::Failure), 60);
    }
}
