//! Hand-authored level tables

use glam::Vec2;

use super::state::{Platform, PlatformKind};
use crate::consts::SPAWN_POINT;

use PlatformKind::{Goal, Hazard, Platform as Solid};

/// A level: where the player appears and what they can stand on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub spawn: Vec2,
    pub platforms: &'static [Platform],
}

const LEVEL_1: &[Platform] = &[
    Platform::new(0.0, 550.0, 800.0, 50.0, Solid),
    Platform::new(200.0, 450.0, 150.0, 20.0, Solid),
    Platform::new(450.0, 350.0, 150.0, 20.0, Solid),
    Platform::new(700.0, 250.0, 100.0, 20.0, Goal),
];

const LEVEL_2: &[Platform] = &[
    Platform::new(0.0, 550.0, 200.0, 50.0, Solid),
    Platform::new(250.0, 500.0, 100.0, 20.0, Solid),
    Platform::new(400.0, 450.0, 100.0, 20.0, Solid),
    Platform::new(550.0, 400.0, 100.0, 20.0, Solid),
    Platform::new(300.0, 300.0, 200.0, 20.0, Solid),
    Platform::new(100.0, 200.0, 50.0, 20.0, Goal),
    Platform::new(300.0, 530.0, 500.0, 20.0, Hazard),
];

const LEVEL_3: &[Platform] = &[
    Platform::new(0.0, 550.0, 100.0, 50.0, Solid),
    Platform::new(150.0, 450.0, 50.0, 20.0, Solid),
    Platform::new(300.0, 350.0, 50.0, 20.0, Solid),
    Platform::new(450.0, 250.0, 50.0, 20.0, Solid),
    Platform::new(600.0, 150.0, 50.0, 20.0, Solid),
    Platform::new(750.0, 100.0, 50.0, 20.0, Goal),
    Platform::new(100.0, 580.0, 700.0, 20.0, Hazard),
];

const LEVELS: [Level; 3] = [
    Level { spawn: SPAWN_POINT, platforms: LEVEL_1 },
    Level { spawn: SPAWN_POINT, platforms: LEVEL_2 },
    Level { spawn: SPAWN_POINT, platforms: LEVEL_3 },
];

/// Number of levels in the game
pub const LEVEL_COUNT: u32 = LEVELS.len() as u32;

/// Look up a level by its 1-based number
pub fn level(number: u32) -> Option<Level> {
    let index = number.checked_sub(1)? as usize;
    LEVELS.get(index).copied()
}

/// Look up a level, falling back to level 1 for unknown numbers
pub fn level_or_first(number: u32) -> Level {
    level(number).unwrap_or(LEVELS[0])
}

/// Whether another level follows this one
pub fn has_next(number: u32) -> bool {
    number < LEVEL_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PLAYER_SIZE, WORLD_HEIGHT, WORLD_WIDTH};

    #[test]
    fn test_level_lookup() {
        assert!(level(0).is_none());
        assert!(level(1).is_some());
        assert!(level(LEVEL_COUNT).is_some());
        assert!(level(LEVEL_COUNT + 1).is_none());
        assert_eq!(level_or_first(42), LEVELS[0]);
    }

    #[test]
    fn test_has_next() {
        assert!(has_next(1));
        assert!(has_next(LEVEL_COUNT - 1));
        assert!(!has_next(LEVEL_COUNT));
    }

    #[test]
    fn test_every_level_has_exactly_one_goal() {
        for n in 1..=LEVEL_COUNT {
            let goals = level(n)
                .unwrap()
                .platforms
                .iter()
                .filter(|p| p.kind == PlatformKind::Goal)
                .count();
            assert_eq!(goals, 1, "level {n}");
        }
    }

    #[test]
    fn test_spawn_rests_on_ground() {
        // Spawn sits exactly on top of the first platform of every level
        for n in 1..=LEVEL_COUNT {
            let lvl = level(n).unwrap();
            let ground = lvl.platforms[0];
            assert_eq!(lvl.spawn.y + PLAYER_SIZE.y, ground.top(), "level {n}");
            assert!(lvl.spawn.x >= ground.pos.x);
            assert!(lvl.spawn.x + PLAYER_SIZE.x <= ground.pos.x + ground.size.x);
        }
    }

    #[test]
    fn test_platforms_inside_world() {
        for n in 1..=LEVEL_COUNT {
            for p in level(n).unwrap().platforms {
                assert!(p.pos.x >= 0.0 && p.pos.x + p.size.x <= WORLD_WIDTH);
                assert!(p.pos.y >= 0.0 && p.bottom() <= WORLD_HEIGHT);
            }
        }
    }
}
