//! Scene building: game state in, triangles out
//!
//! Pure function of state so it can be checked without a GPU.

use glam::Vec2;

use super::shapes::{line, rect, ring, stroke, triangle};
use super::vertex::{Vertex, colors};
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::settings::Settings;
use crate::sim::{Accessory, Facing, GameState, Helm, Platform, PlatformKind, Player};

/// Background grid spacing
const GRID_STEP: f32 = 40.0;
/// Stick figure stroke width
const LIMB_WIDTH: f32 = 3.0;
/// Head radius
const HEAD_RADIUS: f32 = 8.0;
/// Glow halo layers around goals/hazards
const GLOW_LAYERS: u32 = 3;

/// Build the full frame
pub fn build(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(2048);

    if settings.show_grid {
        grid(&mut out);
    }
    for platform in state.platforms {
        draw_platform(&mut out, platform, settings.glow);
    }
    stick_figure(&mut out, &state.player);

    out
}

fn grid(out: &mut Vec<Vertex>) {
    let mut x = 0.0;
    while x < WORLD_WIDTH {
        line(out, Vec2::new(x, 0.0), Vec2::new(x, WORLD_HEIGHT), 1.0, colors::GRID);
        x += GRID_STEP;
    }
    let mut y = 0.0;
    while y < WORLD_HEIGHT {
        line(out, Vec2::new(0.0, y), Vec2::new(WORLD_WIDTH, y), 1.0, colors::GRID);
        y += GRID_STEP;
    }
}

/// Fill color for a platform kind
pub fn platform_color(kind: PlatformKind) -> [f32; 4] {
    match kind {
        PlatformKind::Platform => colors::PLATFORM,
        PlatformKind::Goal => colors::GOAL,
        PlatformKind::Hazard => colors::HAZARD,
    }
}

fn draw_platform(out: &mut Vec<Vertex>, platform: &Platform, glow: bool) {
    let color = platform_color(platform.kind);

    // Goal blur is stronger than hazard blur
    let glow_radius = match platform.kind {
        PlatformKind::Goal => 15.0,
        PlatformKind::Hazard => 10.0,
        PlatformKind::Platform => 0.0,
    };
    if glow && glow_radius > 0.0 {
        for layer in (1..=GLOW_LAYERS).rev() {
            let grow = glow_radius * layer as f32 / GLOW_LAYERS as f32;
            rect(
                out,
                platform.pos - Vec2::splat(grow),
                platform.size + Vec2::splat(grow * 2.0),
                colors::with_alpha(color, 0.08),
            );
        }
    }

    rect(out, platform.pos, platform.size, color);
    rect(
        out,
        platform.pos,
        Vec2::new(platform.size.x, 2.0),
        colors::HIGHLIGHT,
    );
}

/// Draw the player. Coordinates follow the hitbox: head at the top, feet at
/// the bottom edge.
pub fn stick_figure(out: &mut Vec<Vertex>, player: &Player) {
    let body = player.custom.rgba();
    let x = player.pos.x + player.size.x / 2.0;
    let y = player.pos.y;
    let head = Vec2::new(x, y + 10.0);

    // Walk cycle only while actually moving
    let walk = player.anim_frame.sin();
    let moving = player.vel.x.abs() > 0.5;
    let leg_angle = if moving { walk * 0.5 } else { 0.0 };
    let arm_angle = if moving { -walk * 0.4 } else { 0.0 };
    let arm_raise = if player.vel.y < 0.0 { -15.0 } else { 0.0 };

    if player.custom.accessory == Accessory::Cape {
        let flow = (player.anim_frame * 0.5).sin() * 3.0;
        triangle(
            out,
            Vec2::new(x, y + 18.0),
            Vec2::new(x - 10.0 - flow, y + 45.0),
            Vec2::new(x + 10.0 + flow, y + 45.0),
            colors::with_alpha(body, 0.5),
        );
    }

    // Head
    let half = LIMB_WIDTH / 2.0;
    ring(out, head, HEAD_RADIUS - half, HEAD_RADIUS + half, body, 20);

    // Body
    stroke(out, Vec2::new(x, y + 18.0), Vec2::new(x, y + 35.0), LIMB_WIDTH, body);

    // Legs
    let hip = Vec2::new(x, y + 35.0);
    stroke(out, hip, Vec2::new(x - 10.0 - leg_angle * 10.0, y + 50.0), LIMB_WIDTH, body);
    stroke(out, hip, Vec2::new(x + 10.0 + leg_angle * 10.0, y + 50.0), LIMB_WIDTH, body);

    // Arms
    let shoulder = Vec2::new(x, y + 22.0);
    let hand_y = y + 25.0 + arm_raise;
    stroke(out, shoulder, Vec2::new(x - 15.0 - arm_angle * 15.0, hand_y), LIMB_WIDTH, body);
    stroke(out, shoulder, Vec2::new(x + 15.0 + arm_angle * 15.0, hand_y), LIMB_WIDTH, body);

    // Eye
    let eye_color = if body == colors::WHITE {
        colors::BLACK
    } else {
        colors::WHITE
    };
    let eye_x = match player.facing {
        Facing::Right => x + 3.0,
        Facing::Left => x - 5.0,
    };
    rect(out, Vec2::new(eye_x, y + 8.0), Vec2::splat(2.0), eye_color);

    helm(out, player.custom.helm, head, body);

    if player.custom.accessory == Accessory::Scarf {
        line(
            out,
            Vec2::new(x - 6.0, y + 19.0),
            Vec2::new(x + 6.0, y + 19.0),
            4.0,
            colors::SCARF,
        );
    }
}

fn helm(out: &mut Vec<Vertex>, helm: Helm, head: Vec2, body: [f32; 4]) {
    match helm {
        Helm::None => {}
        Helm::Knight => rect(
            out,
            head + Vec2::new(-10.0, -12.0),
            Vec2::new(20.0, 9.0),
            colors::HELM,
        ),
        Helm::Viking => {
            for side in [-1.0, 1.0] {
                stroke(
                    out,
                    head + Vec2::new(7.0 * side, -5.0),
                    head + Vec2::new(12.0 * side, -15.0),
                    LIMB_WIDTH,
                    body,
                );
            }
        }
        Helm::Wizard => triangle(
            out,
            head + Vec2::new(-11.0, -5.0),
            head + Vec2::new(0.0, -23.0),
            head + Vec2::new(11.0, -5.0),
            colors::HELM,
        ),
    }
}
