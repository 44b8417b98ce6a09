//! Per-frame simulation step
//!
//! One call advances the player by exactly one animation frame. There is no
//! variable timestep: velocities are in pixels per frame.

use glam::Vec2;

use super::collision::{Contact, classify_contact, overlaps_platform};
use super::state::{Facing, GameState, GameStatus, Platform, PlatformKind, Player};
use crate::consts::*;

/// Held inputs sampled for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossCause {
    /// Touched a hazard rectangle
    Hazard,
    /// Dropped below the fall threshold
    Fell,
}

/// Result of stepping the player once
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// No terminal condition; the new player value should be committed
    Moved(Player),
    /// Overlapped a goal
    Won,
    /// Overlapped a hazard or fell out of the world
    Lost(LossCause),
}

/// What happened to the game state during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing simulated
    Idle,
    /// Player moved, state committed
    Continue,
    /// Goal reached; state untouched this frame
    Won,
    /// Run lost; state untouched this frame
    Lost(LossCause),
}

/// Velocity after gravity, run input/friction and jump, before any collision
pub fn integrate_velocity(player: &Player, input: &TickInput) -> Vec2 {
    let mut vel_x = player.vel.x;
    let mut vel_y = player.vel.y + GRAVITY;

    if input.left {
        vel_x = -RUN_SPEED;
    } else if input.right {
        vel_x = RUN_SPEED;
    } else {
        vel_x *= FRICTION;
    }

    if input.jump && player.grounded {
        vel_y = JUMP_FORCE;
    }

    Vec2::new(vel_x, vel_y)
}

/// Advance the player one frame against a static platform list
pub fn step_player(player: &Player, platforms: &[Platform], input: &TickInput) -> Step {
    let mut vel = integrate_velocity(player, input);
    let mut pos = player.pos + vel;
    let mut grounded = false;

    let mut facing = player.facing;
    if vel.x > FACING_DEAD_ZONE {
        facing = Facing::Right;
    }
    if vel.x < -FACING_DEAD_ZONE {
        facing = Facing::Left;
    }

    // First matching rule per platform, in list order. Later platforms see
    // the position as adjusted by earlier ones.
    for platform in platforms {
        if !overlaps_platform(pos, player.size, platform) {
            continue;
        }
        match platform.kind {
            PlatformKind::Goal => return Step::Won,
            PlatformKind::Hazard => return Step::Lost(LossCause::Hazard),
            PlatformKind::Platform => match classify_contact(player.pos, player.size, platform) {
                Contact::Landing => {
                    pos.y = platform.top() - player.size.y;
                    vel.y = 0.0;
                    grounded = true;
                }
                Contact::Ceiling => {
                    pos.y = platform.bottom();
                    vel.y = 0.0;
                }
                Contact::Side => {
                    pos.x = player.pos.x;
                    vel.x = 0.0;
                }
            },
        }
    }

    pos.x = pos.x.clamp(0.0, WORLD_WIDTH - player.size.x);

    if pos.y + player.size.y > FALL_THRESHOLD {
        return Step::Lost(LossCause::Fell);
    }

    Step::Moved(Player {
        pos,
        vel,
        grounded,
        facing,
        anim_frame: (player.anim_frame + vel.x.abs() * ANIM_RATE) % ANIM_CYCLE,
        ..player.clone()
    })
}

/// Advance the game state by one frame
///
/// Terminal outcomes leave the state exactly as it was; the caller owns the
/// transition (next level, game over).
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    if state.status != GameStatus::Playing {
        return TickOutcome::Idle;
    }

    match step_player(&state.player, state.platforms, input) {
        Step::Moved(player) => {
            state.player = player;
            TickOutcome::Continue
        }
        Step::Won => TickOutcome::Won,
        Step::Lost(cause) => TickOutcome::Lost(cause),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::levels;
    use crate::sim::state::Customization;
    use proptest::prelude::*;

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), Customization::default())
    }

    fn playing_state() -> GameState {
        let mut state = GameState::new(Customization::default());
        state.status = GameStatus::Playing;
        state
    }

    const RIGHT: TickInput = TickInput {
        left: false,
        right: true,
        jump: false,
    };

    #[test]
    fn test_tick_idle_outside_playing() {
        let mut state = GameState::new(Customization::default());
        let before = state.clone();
        assert_eq!(tick(&mut state, &RIGHT), TickOutcome::Idle);
        assert_eq!(state, before);
    }

    #[test]
    fn test_standing_on_ground_stays_grounded() {
        let mut state = playing_state();
        for _ in 0..10 {
            assert_eq!(tick(&mut state, &TickInput::default()), TickOutcome::Continue);
        }
        assert!(state.player.grounded);
        assert_eq!(state.player.pos, SPAWN_POINT);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut player = player_at(50.0, 100.0);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        assert_eq!(integrate_velocity(&player, &jump).y, GRAVITY);

        player.grounded = true;
        assert_eq!(integrate_velocity(&player, &jump).y, JUMP_FORCE);
    }

    #[test]
    fn test_left_wins_over_right() {
        let player = player_at(50.0, 100.0);
        let both = TickInput {
            left: true,
            right: true,
            jump: false,
        };
        assert_eq!(integrate_velocity(&player, &both).x, -RUN_SPEED);
    }

    #[test]
    fn test_friction_decays_horizontal_velocity() {
        let mut player = player_at(50.0, 100.0);
        player.vel.x = 5.0;
        assert_eq!(integrate_velocity(&player, &TickInput::default()).x, 4.0);
    }

    #[test]
    fn test_facing_follows_velocity_with_dead_zone() {
        let mut player = player_at(300.0, 100.0);
        player.facing = Facing::Left;
        player.vel.x = 0.1; // decays to 0.08, inside the dead zone
        let Step::Moved(next) = step_player(&player, &[], &TickInput::default()) else {
            panic!("expected move");
        };
        assert_eq!(next.facing, Facing::Left);

        let Step::Moved(next) = step_player(&player, &[], &RIGHT) else {
            panic!("expected move");
        };
        assert_eq!(next.facing, Facing::Right);
    }

    #[test]
    fn test_head_bump_zeroes_vertical_velocity() {
        let ceiling = [Platform::new(0.0, 100.0, 800.0, 20.0, PlatformKind::Platform)];
        let mut player = player_at(300.0, 125.0);
        player.vel.y = -12.0;
        let Step::Moved(next) = step_player(&player, &ceiling, &TickInput::default()) else {
            panic!("expected move");
        };
        assert_eq!(next.pos.y, 120.0);
        assert_eq!(next.vel.y, 0.0);
        assert!(!next.grounded);
    }

    #[test]
    fn test_side_contact_reverts_horizontal_position() {
        let wall = [Platform::new(335.0, 0.0, 20.0, 500.0, PlatformKind::Platform)];
        let player = player_at(302.0, 200.0);
        let Step::Moved(next) = step_player(&player, &wall, &RIGHT) else {
            panic!("expected move");
        };
        assert_eq!(next.pos.x, 302.0);
        assert_eq!(next.vel.x, 0.0);
        // Facing is decided before collisions
        assert_eq!(next.facing, Facing::Right);
    }

    #[test]
    fn test_hazard_loses_without_mutation() {
        let mut state = playing_state();
        state.load_level(2);
        state.player.pos = Vec2::new(400.0, 481.0);
        let before = state.clone();

        assert_eq!(
            tick(&mut state, &TickInput::default()),
            TickOutcome::Lost(LossCause::Hazard)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_goal_wins_before_later_hazard() {
        let platforms = [
            Platform::new(0.0, 0.0, 800.0, 600.0, PlatformKind::Goal),
            Platform::new(0.0, 0.0, 800.0, 600.0, PlatformKind::Hazard),
        ];
        assert_eq!(
            step_player(&player_at(100.0, 100.0), &platforms, &TickInput::default()),
            Step::Won
        );
    }

    #[test]
    fn test_list_order_decides_terminal_signal() {
        let platforms = [
            Platform::new(0.0, 0.0, 800.0, 600.0, PlatformKind::Hazard),
            Platform::new(0.0, 0.0, 800.0, 600.0, PlatformKind::Goal),
        ];
        assert_eq!(
            step_player(&player_at(100.0, 100.0), &platforms, &TickInput::default()),
            Step::Lost(LossCause::Hazard)
        );
    }

    #[test]
    fn test_fall_example_at_590() {
        let mut state = playing_state();
        state.platforms = &[];
        state.player.pos = Vec2::new(400.0, 590.0);
        assert_eq!(
            tick(&mut state, &TickInput::default()),
            TickOutcome::Lost(LossCause::Fell)
        );
    }

    #[test]
    fn test_anim_frame_wraps() {
        let mut player = player_at(300.0, 100.0);
        player.anim_frame = 9.8;
        let Step::Moved(next) = step_player(&player, &[], &RIGHT) else {
            panic!("expected move");
        };
        assert!((next.anim_frame - 0.3).abs() < 1e-4);
    }

    #[test]
    fn test_jump_from_ground_lands_on_first_ledge() {
        let mut state = playing_state();
        // Settle onto the ground so the jump is allowed
        tick(&mut state, &TickInput::default());
        assert!(state.player.grounded);

        let jump = TickInput {
            right: true,
            jump: true,
            left: false,
        };
        assert_eq!(tick(&mut state, &jump), TickOutcome::Continue);
        assert_eq!(state.player.vel.y, JUMP_FORCE);

        let mut frames = 0;
        while !state.player.grounded {
            assert_eq!(tick(&mut state, &RIGHT), TickOutcome::Continue);
            frames += 1;
            assert!(frames < 100, "never landed");
        }

        // Ledge at (200, 450) is 150 wide
        assert_eq!(state.player.pos.y, 400.0);
        assert_eq!(state.player.pos.x, 245.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing_state();
        let mut b = playing_state();
        let inputs = [
            RIGHT,
            TickInput {
                jump: true,
                ..Default::default()
            },
            RIGHT,
            TickInput::default(),
        ];
        for _ in 0..20 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }
        assert_eq!(a, b);
        assert_eq!(a.platforms, levels::level_or_first(1).platforms);
    }

    proptest! {
        #[test]
        fn prop_gravity_applied_before_collision(
            vx in -10.0f32..10.0,
            vy in -20.0f32..20.0,
            left in any::<bool>(),
            right in any::<bool>(),
            grounded in any::<bool>(),
        ) {
            let mut player = player_at(300.0, 200.0);
            player.vel = Vec2::new(vx, vy);
            player.grounded = grounded;
            let input = TickInput { left, right, jump: false };
            prop_assert_eq!(integrate_velocity(&player, &input).y, vy + GRAVITY);
        }

        #[test]
        fn prop_landing_from_above_grounds(
            px in 0.0f32..600.0,
            py in 100.0f32..550.0,
            width in 40.0f32..200.0,
            offset in 0.0f32..1.0,
            gap in 0.01f32..5.0,
            vy in 0.0f32..10.0,
        ) {
            let platform = Platform::new(px, py, width, 20.0, PlatformKind::Platform);
            let x = px + offset * (width - PLAYER_SIZE.x);
            let mut player = player_at(x, py - PLAYER_SIZE.y - gap);
            // Make sure the predicted bottom actually reaches the platform
            player.vel.y = vy.max(gap);

            let Step::Moved(next) = step_player(&player, &[platform], &TickInput::default()) else {
                panic!("expected move");
            };
            prop_assert_eq!(next.vel.y, 0.0);
            prop_assert!(next.grounded);
            prop_assert_eq!(next.pos.y, py - PLAYER_SIZE.y);
        }

        #[test]
        fn prop_horizontal_position_clamped(
            x in -500.0f32..1500.0,
            vx in -50.0f32..50.0,
            left in any::<bool>(),
            right in any::<bool>(),
        ) {
            let mut player = player_at(x, 100.0);
            player.vel.x = vx;
            let input = TickInput { left, right, jump: false };
            let Step::Moved(next) = step_player(&player, &[], &input) else {
                panic!("expected move");
            };
            prop_assert!(next.pos.x >= 0.0);
            prop_assert!(next.pos.x <= WORLD_WIDTH - PLAYER_SIZE.x);
        }

        #[test]
        fn prop_falling_out_always_loses(
            x in -100.0f32..900.0,
            y in 551.0f32..2000.0,
            vx in -10.0f32..10.0,
        ) {
            let mut player = player_at(x, y);
            player.vel.x = vx;
            prop_assert_eq!(
                step_player(&player, &[], &TickInput::default()),
                Step::Lost(LossCause::Fell)
            );
        }

        #[test]
        fn prop_goal_overlap_never_loses(
            x in 100.0f32..650.0,
            y in 100.0f32..400.0,
        ) {
            let goal = Platform::new(0.0, 0.0, 800.0, 600.0, PlatformKind::Goal);
            prop_assert_eq!(
                step_player(&player_at(x, y), &[goal], &TickInput::default()),
                Step::Won
            );
        }
    }
}
