//! Run orchestration
//!
//! Owns the [`GameState`] and reacts to the simulation's win/lose outcomes:
//! level advance, game over, restarts, saves. Side effects that leave the
//! process (narration fetches, toasts) are queued as [`Effect`]s for the
//! platform layer to carry out.

use crate::consts::INITIAL_LEVEL;
use crate::narration::{INITIAL_LINE, NarrationEvent, NarrationRequest};
use crate::persistence::{self, SaveData, SaveStore};
use crate::settings::Settings;
use crate::sim::levels;
use crate::sim::{
    Accessory, Customization, GameState, GameStatus, Helm, LossCause, TickInput, TickOutcome,
    tick,
};

/// Side effects requested by the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the narrator for a line
    Narrate(NarrationRequest),
    /// Flash the "progress saved" toast
    SaveToast,
}

/// Everything the frame loop and the menu talk to
pub struct App {
    pub state: GameState,
    /// Locker-room choices; mirrored onto the player
    pub custom: Customization,
    /// Latest narrator line
    pub narration: String,
    pub has_saved_progress: bool,
    pub settings: Settings,
    store: Box<dyn SaveStore>,
    effects: Vec<Effect>,
}

impl App {
    /// Start on the title screen, restoring cosmetics from any saved run
    pub fn new(store: Box<dyn SaveStore>, settings: Settings) -> Self {
        let saved = persistence::load_save(store.as_ref());
        let custom = saved
            .as_ref()
            .map(|s| s.custom.clone())
            .unwrap_or_default();
        if let Some(save) = &saved {
            log::info!("Found saved progress at level {}", save.level);
        }

        Self {
            state: GameState::new(custom.clone()),
            custom,
            narration: INITIAL_LINE.to_string(),
            has_saved_progress: saved.is_some(),
            settings,
            store,
            effects: Vec::new(),
        }
    }

    /// Level stored in the save, if any
    pub fn saved_level(&self) -> Option<u32> {
        persistence::load_save(self.store.as_ref()).map(|s| s.level)
    }

    /// Leave the menu and begin playing
    pub fn start(&mut self, from_save: bool) {
        let level = if from_save {
            self.saved_level().unwrap_or(INITIAL_LEVEL)
        } else {
            INITIAL_LEVEL
        };

        self.state.player.custom = self.custom.clone();
        self.state.load_level(level);
        self.state.status = GameStatus::Playing;
        self.state.message = if from_save {
            format!("Resuming from Level {}.", self.state.level)
        } else {
            "The journey begins.".to_string()
        };
        log::info!("Run started at level {}", self.state.level);
        self.narrate(NarrationEvent::Start);
    }

    /// Run one animation frame and apply any terminal outcome
    pub fn frame(&mut self, input: &TickInput) -> TickOutcome {
        let outcome = tick(&mut self.state, input);
        match outcome {
            TickOutcome::Won => self.handle_win(),
            TickOutcome::Lost(cause) => self.handle_game_over(cause),
            TickOutcome::Idle | TickOutcome::Continue => {}
        }
        outcome
    }

    fn handle_win(&mut self) {
        // Narrate about the level just cleared
        self.narrate(NarrationEvent::Win);

        let cleared = self.state.level;
        if levels::has_next(cleared) {
            let next = cleared + 1;
            self.state.load_level(next);
            self.state.message = format!("Level {next} reached!");
            log::info!("Level {cleared} cleared, advancing to {next}");
            self.save_progress(Some(next));
        } else {
            self.state.status = GameStatus::Won;
            self.state.message = "You've ascended to godhood!".to_string();
            log::info!("Final level cleared");
        }
    }

    fn handle_game_over(&mut self, cause: LossCause) {
        self.state.status = GameStatus::GameOver;
        self.state.message = "Gravity won this round.".to_string();
        log::info!("Game over on level {} ({cause:?})", self.state.level);
        self.narrate(NarrationEvent::Fail);
    }

    /// Start a fresh run from level 1 ("Revive" / "Go again")
    pub fn reset_run(&mut self) {
        self.narrate(NarrationEvent::Fail);
        self.state = GameState::new(self.custom.clone());
        self.state.status = GameStatus::Playing;
        self.state.message = "Restarting... Try again.".to_string();
    }

    /// Respawn on the current level without losing progress
    pub fn restart_level(&mut self) {
        if self.state.status != GameStatus::Playing {
            return;
        }
        self.state.restart_level();
        self.state.message = format!("Level {} restarted.", self.state.level);
        self.narrate(NarrationEvent::Stuck);
    }

    /// Persist the current (or given) level and cosmetics
    pub fn save_progress(&mut self, level: Option<u32>) {
        let save = SaveData {
            level: level.unwrap_or(self.state.level),
            custom: self.custom.clone(),
        };
        match persistence::write_save(self.store.as_ref(), &save) {
            Ok(()) => {
                self.has_saved_progress = true;
                self.effects.push(Effect::SaveToast);
            }
            Err(e) => log::warn!("Save failed: {e:#}"),
        }
    }

    /// Forget saved progress and cosmetics, then start over
    pub fn delete_progress(&mut self) {
        if let Err(e) = persistence::clear_save(self.store.as_ref()) {
            log::warn!("Could not clear save: {e:#}");
        }
        self.has_saved_progress = false;
        self.custom = Customization::default();
        self.reset_run();
    }

    pub fn set_color(&mut self, hex: &str) {
        self.custom.color = hex.to_string();
        self.sync_custom();
    }

    pub fn set_helm(&mut self, helm: Helm) {
        self.custom.helm = helm;
        self.sync_custom();
    }

    pub fn set_accessory(&mut self, accessory: Accessory) {
        self.custom.accessory = accessory;
        self.sync_custom();
    }

    fn sync_custom(&mut self) {
        self.state.player.custom = self.custom.clone();
    }

    /// Replace the narrator line with a resolved response
    pub fn set_narration(&mut self, line: String) {
        self.narration = line;
    }

    /// Settings store shared with saves
    pub fn store(&self) -> &dyn SaveStore {
        self.store.as_ref()
    }

    /// Take queued effects
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    fn narrate(&mut self, event: NarrationEvent) {
        if !self.settings.narration {
            return;
        }
        self.effects.push(Effect::Narrate(NarrationRequest {
            event,
            level: self.state.level,
            custom: self.custom.clone(),
        }));
    }
}
