//! External collaborators: audio, UI and scene loading.
//!
//! The board pushes to these and never reads anything back. Every hook is
//! best-effort; the null implementations do nothing and are the defaults.

use glam::Vec2;

use crate::core::SceneError;
use crate::dispatch::MinigameId;
use crate::effects::Prompt;
use crate::turns::GameOutcome;

/// Fire-and-forget sound playback.
pub trait SoundPlayer {
    /// Play a named sound.
    fn play(&mut self, name: &str);
}

/// Receives pushed UI updates.
///
/// All hooks default to doing nothing; implement the ones you display.
pub trait BoardObserver {
    fn score_changed(&mut self, _score: i64) {}

    fn turn_changed(&mut self, _turn: u32) {}

    /// An effect summary or story result to show in the notification panel.
    fn notify(&mut self, _title: &str, _message: &str) {}

    /// A quiz or story prompt needs an answer.
    fn prompt_opened(&mut self, _prompt: &Prompt) {}

    fn token_moved(&mut self, _position: Vec2) {}

    /// Show the end panel.
    fn game_ended(&mut self, _outcome: GameOutcome, _score: i64) {}
}

/// Loads the minigame and board scenes.
pub trait SceneLoader {
    /// Switch to a minigame scene.
    fn load_minigame(&mut self, minigame: &MinigameId) -> Result<(), SceneError>;

    /// Switch back to the board scene.
    fn load_board(&mut self) -> Result<(), SceneError>;
}

/// Plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSound;

impl SoundPlayer for NullSound {
    fn play(&mut self, _name: &str) {}
}

/// Displays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl BoardObserver for NullObserver {}

/// Scene loader that always succeeds without doing anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullScenes;

impl SceneLoader for NullScenes {
    fn load_minigame(&mut self, _minigame: &MinigameId) -> Result<(), SceneError> {
        Ok(())
    }

    fn load_board(&mut self) -> Result<(), SceneError> {
        Ok(())
    }
}

/// The collaborators a board talks to.
pub struct Collaborators {
    pub sound: Box<dyn SoundPlayer>,
    pub observer: Box<dyn BoardObserver>,
    pub scenes: Box<dyn SceneLoader>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            sound: Box::new(NullSound),
            observer: Box::new(NullObserver),
            scenes: Box::new(NullScenes),
        }
    }
}

impl Collaborators {
    /// Replace the sound player.
    #[must_use]
    pub fn with_sound(mut self, sound: impl SoundPlayer + 'static) -> Self {
        self.sound = Box::new(sound);
        self
    }

    /// Replace the UI observer.
    #[must_use]
    pub fn with_observer(mut self, observer: impl BoardObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Replace the scene loader.
    #[must_use]
    pub fn with_scenes(mut self, scenes: impl SceneLoader + 'static) -> Self {
        self.scenes = Box::new(scenes);
        self
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_scenes_succeed() {
        let mut scenes = NullScenes;
        assert!(scenes.load_minigame(&MinigameId::new("memory")).is_ok());
        assert!(scenes.load_board().is_ok());
    }

    #[test]
    fn test_default_hooks_are_noops() {
        let mut collab = Collaborators::default();
        collab.sound.play("hop");
        collab.observer.score_changed(10);
        collab.observer.game_ended(GameOutcome::Victory, 10);
    }
}
