// src/audio.rs - Sound cues emitted by the game loop
use crate::actor::Actor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Throw,
    ThrowAlt,
    Hit,
    Win,
}

impl AudioCue {
    pub fn throw_by(actor: Actor) -> Self {
        match actor {
            Actor::Player1 => AudioCue::Throw,
            Actor::Player2 | Actor::Ai => AudioCue::ThrowAlt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCommand {
    Play,
    Pause,
    Resume,
    Stop,
}

pub trait AudioSink {
    fn cue(&mut self, cue: AudioCue);
    fn music(&mut self, command: MusicCommand);
}

// Stand-in mixer that only reports what would be played.
#[derive(Default)]
pub struct LogAudio {
    music_playing: bool,
}

impl AudioSink for LogAudio {
    fn cue(&mut self, cue: AudioCue) {
        tracing::debug!(?cue, "sound cue");
    }

    fn music(&mut self, command: MusicCommand) {
        let was_playing = self.music_playing;
        self.music_playing = matches!(command, MusicCommand::Play | MusicCommand::Resume);
        tracing::info!(?command, was_playing, playing = self.music_playing, "background music");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throw_cue_by_owner() {
        assert_eq!(AudioCue::throw_by(Actor::Player1), AudioCue::Throw);
        assert_eq!(AudioCue::throw_by(Actor::Player2), AudioCue::ThrowAlt);
        assert_eq!(AudioCue::throw_by(Actor::Ai), AudioCue::ThrowAlt);
    }

    #[test]
    fn music_state_follows_commands() {
        let mut audio = LogAudio::default();
        audio.music(MusicCommand::Play);
        assert!(audio.music_playing);
        audio.music(MusicCommand::Pause);
        assert!(!audio.music_playing);
        audio.music(MusicCommand::Resume);
        assert!(audio.music_playing);
    }
}
