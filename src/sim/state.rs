//! Game state and core simulation types
//!
//! Everything the frame step reads or writes lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::levels;
use crate::consts::*;

/// Current status of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Locker room / title screen
    #[default]
    Menu,
    /// Active gameplay, physics runs every frame
    Playing,
    /// Final level cleared
    Won,
    /// Run ended (hazard or fall)
    #[serde(rename = "gameover")]
    GameOver,
}

/// What a rectangle does when the player touches it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// Solid ground
    #[default]
    Platform,
    /// Touching it ends the run
    Hazard,
    /// Touching it clears the level
    Goal,
}

/// A static axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PlatformKind,
}

impl Platform {
    pub const fn new(x: f32, y: f32, w: f32, h: f32, kind: PlatformKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            kind,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Horizontal facing of the stick figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Headgear options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Helm {
    #[default]
    None,
    Knight,
    Viking,
    Wizard,
}

impl Helm {
    pub const ALL: [Helm; 4] = [Helm::None, Helm::Knight, Helm::Viking, Helm::Wizard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Helm::None => "none",
            Helm::Knight => "knight",
            Helm::Viking => "viking",
            Helm::Wizard => "wizard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.as_str() == s)
    }
}

/// Accessory options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessory {
    #[default]
    None,
    Cape,
    Scarf,
}

impl Accessory {
    pub const ALL: [Accessory; 3] = [Accessory::None, Accessory::Cape, Accessory::Scarf];

    pub fn as_str(&self) -> &'static str {
        match self {
            Accessory::None => "none",
            Accessory::Cape => "cape",
            Accessory::Scarf => "scarf",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }
}

/// Named body colors offered in the locker room
pub const PALETTE: [(&str, &str); 6] = [
    ("Pure", "#ffffff"),
    ("Fire", "#ef4444"),
    ("Nature", "#22c55e"),
    ("Void", "#8b5cf6"),
    ("Sun", "#eab308"),
    ("Cyan", "#06b6d4"),
];

/// Cosmetic choices. Color is kept as the hex string the save format uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customization {
    pub color: String,
    pub helm: Helm,
    pub accessory: Accessory,
}

impl Default for Customization {
    fn default() -> Self {
        Self {
            color: PALETTE[0].1.to_string(),
            helm: Helm::None,
            accessory: Accessory::None,
        }
    }
}

impl Customization {
    /// Body color as linear RGBA. Unparseable hex falls back to white.
    pub fn rgba(&self) -> [f32; 4] {
        parse_hex_color(&self.color).unwrap_or([1.0, 1.0, 1.0, 1.0])
    }
}

/// Parse `#rrggbb` into RGBA floats
pub fn parse_hex_color(hex: &str) -> Option<[f32; 4]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| -> Option<f32> {
        let byte = u8::from_str_radix(digits.get(i..i + 2)?, 16).ok()?;
        Some(byte as f32 / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?, 1.0])
}

/// The stick figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
    pub facing: Facing,
    /// Walk cycle phase in [0, ANIM_CYCLE)
    pub anim_frame: f32,
    pub custom: Customization,
}

impl Player {
    pub fn new(spawn: Vec2, custom: Customization) -> Self {
        Self {
            pos: spawn,
            size: PLAYER_SIZE,
            vel: Vec2::ZERO,
            grounded: false,
            facing: Facing::Right,
            anim_frame: 0.0,
            custom,
        }
    }

    /// Put the player back at a spawn point with zero velocity
    pub fn respawn(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub platforms: &'static [Platform],
    /// 1-based level number
    pub level: u32,
    pub status: GameStatus,
    /// Short system message for the HUD
    pub message: String,
}

impl GameState {
    /// Fresh state on the title screen
    pub fn new(custom: Customization) -> Self {
        let level = levels::level_or_first(INITIAL_LEVEL);
        Self {
            player: Player::new(level.spawn, custom),
            platforms: level.platforms,
            level: INITIAL_LEVEL,
            status: GameStatus::Menu,
            message: "Welcome, Stick Hero. Reach the goal to ascend.".to_string(),
        }
    }

    /// Swap in a level's platforms and respawn the player there.
    /// Unknown levels load the first level.
    pub fn load_level(&mut self, number: u32) {
        let (number, level) = match levels::level(number) {
            Some(level) => (number, level),
            None => (INITIAL_LEVEL, levels::level_or_first(INITIAL_LEVEL)),
        };
        self.level = number;
        self.platforms = level.platforms;
        self.player.respawn(level.spawn);
    }

    /// Respawn at the current level's spawn point
    pub fn restart_level(&mut self) {
        self.load_level(self.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ffffff"), Some([1.0, 1.0, 1.0, 1.0]));
        let fire = parse_hex_color("#ef4444").unwrap();
        assert!((fire[0] - 239.0 / 255.0).abs() < 1e-6);
        assert_eq!(parse_hex_color("ef4444"), None);
        assert_eq!(parse_hex_color("#ef44"), None);
        assert_eq!(parse_hex_color("#zz4444"), None);
    }

    #[test]
    fn test_customization_serializes_like_save_format() {
        let custom = Customization {
            color: "#8b5cf6".to_string(),
            helm: Helm::Viking,
            accessory: Accessory::Cape,
        };
        let json = serde_json::to_string(&custom).unwrap();
        assert_eq!(json, r##"{"color":"#8b5cf6","helm":"viking","accessory":"cape"}"##);
    }

    #[test]
    fn test_helm_and_accessory_parse() {
        assert_eq!(Helm::parse("wizard"), Some(Helm::Wizard));
        assert_eq!(Helm::parse("crown"), None);
        assert_eq!(Accessory::parse("scarf"), Some(Accessory::Scarf));
    }

    #[test]
    fn test_load_unknown_level_falls_back_to_first() {
        let mut state = GameState::new(Customization::default());
        state.load_level(99);
        assert_eq!(state.level, INITIAL_LEVEL);
        assert_eq!(state.platforms, levels::level_or_first(1).platforms);
    }

    #[test]
    fn test_restart_level_resets_to_spawn() {
        let mut state = GameState::new(Customization::default());
        state.load_level(2);
        state.player.pos = Vec2::new(400.0, 123.0);
        state.player.vel = Vec2::new(5.0, -7.0);

        state.restart_level();

        assert_eq!(state.level, 2);
        assert_eq!(state.player.pos, levels::level(2).unwrap().spawn);
        assert_eq!(state.player.vel, Vec2::ZERO);
    }
}
