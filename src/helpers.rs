use macroquad::prelude::*;

use crate::hitbox::Direction;
use crate::player::{AdjacentHitboxes, Player};

const OUTLINE: f32 = 1.5;

pub fn direction_color(direction: Direction) -> Color {
    match direction {
        Direction::Top => GREEN,
        Direction::Bottom => RED,
        Direction::Left => BLUE,
        Direction::Right => WHITE,
    }
}

pub fn draw_hitbox(hitbox: Rect, color: Color) {
    draw_rectangle_lines(hitbox.x, hitbox.y, hitbox.w, hitbox.h, OUTLINE, color);
}

pub fn draw_player_hitboxes(player: &Player) {
    for (direction, strip) in player.hitboxes().iter() {
        draw_hitbox(strip, direction_color(direction));
    }
}

/// Outlines the tiles the player queried this frame, coloured by side.
pub fn draw_adjacent_hitboxes(adjacent: &AdjacentHitboxes) {
    let sides = [
        (Direction::Top, adjacent.top),
        (Direction::Left, adjacent.left),
        (Direction::Right, adjacent.right),
        (Direction::Bottom, adjacent.ground),
    ];
    for (direction, hitbox) in sides {
        if let Some(hitbox) = hitbox {
            draw_hitbox(hitbox, direction_color(direction));
        }
    }
}
