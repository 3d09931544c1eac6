//! Audio service interface
//!
//! The simulation never talks to a sound device directly. It queues
//! [`SoundEffect`]s, and the frame tick plays them through whatever
//! [`AudioBackend`] the host injected.

use std::collections::HashMap;

/// Handle to a loaded sound asset
pub type SoundId = usize;
/// Handle to one playing instance of a sound
pub type PlaybackId = usize;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ship fires
    Shoot,
    /// Bullet damages something
    Hit,
    /// Asteroid, beetle or wasp destroyed
    EnemyExplode,
    /// Player ship takes damage
    PlayerHit,
    /// Player ship destroyed
    PlayerExplode,
    /// Player ship respawns
    Respawn,
    /// Power-up collected
    PowerUpCollect,
    /// Shield raised
    ShieldUp,
    /// New wave begins
    WaveStart,
    /// Last wave cleared
    Victory,
    /// All players out of lives
    GameOver,
    /// Looping ship engine
    Engine,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 12] = [
        SoundEffect::Shoot,
        SoundEffect::Hit,
        SoundEffect::EnemyExplode,
        SoundEffect::PlayerHit,
        SoundEffect::PlayerExplode,
        SoundEffect::Respawn,
        SoundEffect::PowerUpCollect,
        SoundEffect::ShieldUp,
        SoundEffect::WaveStart,
        SoundEffect::Victory,
        SoundEffect::GameOver,
        SoundEffect::Engine,
    ];

    /// Asset path handed to the backend
    pub fn asset_path(&self) -> &'static str {
        match self {
            SoundEffect::Shoot => "Data/Audio/PlayerShootNormal.ogg",
            SoundEffect::Hit => "Data/Audio/EnemyHit.wav",
            SoundEffect::EnemyExplode => "Data/Audio/EnemyDied.wav",
            SoundEffect::PlayerHit => "Data/Audio/PlayerHit.wav",
            SoundEffect::PlayerExplode => "Data/Audio/PlayerDied.wav",
            SoundEffect::Respawn => "Data/Audio/PlayerRespawn.wav",
            SoundEffect::PowerUpCollect => "Data/Audio/PowerUp.wav",
            SoundEffect::ShieldUp => "Data/Audio/ShieldUp.wav",
            SoundEffect::WaveStart => "Data/Audio/NewWave.wav",
            SoundEffect::Victory => "Data/Audio/Victory.mp3",
            SoundEffect::GameOver => "Data/Audio/GameOver.mp3",
            SoundEffect::Engine => "Data/Audio/Engine.wav",
        }
    }

    /// Per-effect mix level
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundEffect::Shoot => 0.4,
            SoundEffect::Hit => 0.5,
            SoundEffect::Engine => 0.6,
            _ => 1.0,
        }
    }
}

/// Parameters for starting a playback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackParams {
    pub looped: bool,
    pub volume: f32,
    /// -1 (left) to +1 (right)
    pub balance: f32,
    pub speed: f32,
    pub paused: bool,
}

impl Default for PlaybackParams {
    fn default() -> Self {
        Self {
            looped: false,
            volume: 1.0,
            balance: 0.0,
            speed: 1.0,
            paused: false,
        }
    }
}

/// Sound device provided by the host
pub trait AudioBackend {
    fn create_or_get_sound(&mut self, path: &str) -> SoundId;
    fn start_sound(&mut self, sound: SoundId, params: PlaybackParams) -> PlaybackId;
    fn stop_sound(&mut self, playback: PlaybackId);
    fn set_sound_playback_volume(&mut self, playback: PlaybackId, volume: f32);
    fn set_sound_playback_balance(&mut self, playback: PlaybackId, balance: f32);
}

/// Sound ids for every effect, resolved once at game creation
#[derive(Debug, Clone)]
pub struct SoundBank {
    ids: HashMap<SoundEffect, SoundId>,
}

impl SoundBank {
    pub fn load(audio: &mut dyn AudioBackend) -> Self {
        let ids = SoundEffect::ALL
            .iter()
            .map(|effect| (*effect, audio.create_or_get_sound(effect.asset_path())))
            .collect();
        Self { ids }
    }

    pub fn id(&self, effect: SoundEffect) -> Option<SoundId> {
        self.ids.get(&effect).copied()
    }
}

/// A started playback as seen by [`NullAudio`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackRecord {
    pub sound: SoundId,
    pub params: PlaybackParams,
    pub stopped: bool,
}

/// Silent backend that remembers what it was asked to do
///
/// Used by the headless runner and by tests that assert on sounds.
#[derive(Debug, Default)]
pub struct NullAudio {
    sounds: Vec<String>,
    pub playbacks: Vec<PlaybackRecord>,
}

impl NullAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of one-shot starts of a given asset
    pub fn starts_of(&self, path: &str) -> usize {
        let Some(id) = self.sounds.iter().position(|s| s == path) else {
            return 0;
        };
        self.playbacks.iter().filter(|p| p.sound == id).count()
    }

    /// Playbacks that are still running
    pub fn active_playbacks(&self) -> usize {
        self.playbacks.iter().filter(|p| !p.stopped).count()
    }
}

impl AudioBackend for NullAudio {
    fn create_or_get_sound(&mut self, path: &str) -> SoundId {
        if let Some(id) = self.sounds.iter().position(|s| s == path) {
            return id;
        }
        self.sounds.push(path.to_string());
        self.sounds.len() - 1
    }

    fn start_sound(&mut self, sound: SoundId, params: PlaybackParams) -> PlaybackId {
        self.playbacks.push(PlaybackRecord {
            sound,
            params,
            stopped: false,
        });
        self.playbacks.len() - 1
    }

    fn stop_sound(&mut self, playback: PlaybackId) {
        if let Some(record) = self.playbacks.get_mut(playback) {
            record.stopped = true;
        }
    }

    fn set_sound_playback_volume(&mut self, playback: PlaybackId, volume: f32) {
        if let Some(record) = self.playbacks.get_mut(playback) {
            record.params.volume = volume;
        }
    }

    fn set_sound_playback_balance(&mut self, playback: PlaybackId, balance: f32) {
        if let Some(record) = self.playbacks.get_mut(playback) {
            record.params.balance = balance;
        }
    }
}
