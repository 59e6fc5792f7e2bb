use macroquad::prelude::*;
use tracing::{debug, warn};

use crate::animation::{Animation, Easing};
use crate::config::PlayerParams;
use crate::hitbox::{overlaps, Direction, DirectionalHitboxes, HITBOX_THICKNESS};
use crate::tile::Tile;

/// Side strips start this far above the feet so the floor never reads as a wall.
const SIDE_INSET: f32 = 4.0;
const FAST_FALL_GRAVITY_SCALE: f32 = 4.0;
/// Largest distance a single `fall_faster` call may move the player.
const FAST_FALL_MAX_STEP: f32 = 64.0;
const DASH_END_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionState {
    Grounded,
    Jumping,
    Falling,
    Dashing,
}

/// Nearest tile bounds around the player, one per direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AdjacentHitboxes {
    pub ground: Option<Rect>,
    pub top: Option<Rect>,
    pub left: Option<Rect>,
    pub right: Option<Rect>,
}

/// The controllable entity. World space is y-up and `pos` is the bottom-left
/// corner of the bounding box; directional strips are always derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pos: Vec2,
    size: Vec2,
    params: PlayerParams,
    fall_speed: f32,
    jump_speed: f32,
    is_jumping: bool,
    is_falling: bool,
    is_dashing: bool,
    dash_direction: f32,
    dash_time_remaining: f32,
    time_since_last_dash: f32,
    has_dashed: bool,
    animation: Animation,
    state_time: f32,
}

impl Player {
    pub fn new(bounds: Rect, animation: Animation, params: PlayerParams) -> Self {
        Self {
            pos: vec2(bounds.x, bounds.y),
            size: vec2(bounds.w.max(0.0), bounds.h.max(0.0)),
            params,
            fall_speed: 0.0,
            jump_speed: 0.0,
            is_jumping: false,
            is_falling: false,
            is_dashing: false,
            dash_direction: 0.0,
            dash_time_remaining: 0.0,
            time_since_last_dash: params.dash_cooldown,
            has_dashed: false,
            animation,
            state_time: 0.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn hitboxes(&self) -> DirectionalHitboxes {
        DirectionalHitboxes::from_bounds(self.bounds(), SIDE_INSET)
    }

    pub fn hitbox(&self, direction: Direction) -> Rect {
        self.hitboxes().get(direction)
    }

    pub fn params(&self) -> &PlayerParams {
        &self.params
    }

    pub fn set_params(&mut self, params: PlayerParams) {
        self.params = params;
    }

    pub fn fall_speed(&self) -> f32 {
        self.fall_speed
    }

    pub fn jump_speed(&self) -> f32 {
        self.jump_speed
    }

    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    pub fn is_falling(&self) -> bool {
        self.is_falling
    }

    pub fn is_dashing(&self) -> bool {
        self.is_dashing
    }

    pub fn has_dashed(&self) -> bool {
        self.has_dashed
    }

    pub fn dash_direction(&self) -> f32 {
        self.dash_direction
    }

    pub fn dash_time_remaining(&self) -> f32 {
        self.dash_time_remaining
    }

    pub fn time_since_last_dash(&self) -> f32 {
        self.time_since_last_dash
    }

    pub fn motion_state(&self) -> MotionState {
        if self.is_dashing {
            MotionState::Dashing
        } else if self.is_jumping {
            MotionState::Jumping
        } else if self.is_falling {
            MotionState::Falling
        } else {
            MotionState::Grounded
        }
    }

    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    pub fn key_frame(&self, easing: Easing, looping: bool) -> usize {
        self.animation.sample(self.state_time, easing, looping)
    }

    pub fn is_colliding(&self, rect: &Rect) -> bool {
        self.hitboxes().touching(rect)
    }

    pub fn is_colliding_dir(&self, rect: &Rect, direction: Direction) -> bool {
        self.hitboxes().touching_dir(rect, direction)
    }

    /// First tile (by list order) whose vertical span holds the player's feet
    /// and whose horizontal span overlaps them.
    pub fn ground_hitbox(&self, tiles: &[Tile]) -> Option<Rect> {
        let feet = self.hitbox(Direction::Bottom);
        tiles
            .iter()
            .filter_map(Tile::bounds)
            .filter(|t| t.y <= feet.y && t.y + t.h >= feet.y)
            .find(|t| overlaps(&feet, &Rect::new(t.x, feet.y, t.w, t.h)))
    }

    /// First tile (by list order) whose underside lies within the player's
    /// height plus the top strip, overlapping the player horizontally.
    pub fn top_hitbox(&self, tiles: &[Tile]) -> Option<Rect> {
        let body = self.bounds();
        let reach = body.y + body.h + HITBOX_THICKNESS;
        tiles
            .iter()
            .filter_map(Tile::bounds)
            .filter(|t| t.y >= body.y && t.y <= reach)
            .find(|t| overlaps(&body, &Rect::new(t.x, body.y, t.w, t.h)))
    }

    /// Closest tile beside the left edge. The probe starts at the side strip,
    /// so the tile under the feet is skipped even when the feet have sunk
    /// into it.
    pub fn left_hitbox(&self, tiles: &[Tile]) -> Option<Rect> {
        let body = self.bounds();
        let strip = self.hitbox(Direction::Left);
        let probe = Rect::new(body.x - HITBOX_THICKNESS, strip.y, HITBOX_THICKNESS, strip.h);
        closest_tile(tiles, &probe, |t| body.x - (t.x + t.w))
    }

    pub fn right_hitbox(&self, tiles: &[Tile]) -> Option<Rect> {
        let strip = self.hitbox(Direction::Right);
        let probe = Rect::new(strip.x, strip.y, HITBOX_THICKNESS, strip.h);
        closest_tile(tiles, &probe, |t| t.x - strip.x)
    }

    pub fn adjacent_hitboxes(&self, tiles: &[Tile]) -> AdjacentHitboxes {
        AdjacentHitboxes {
            ground: self.ground_hitbox(tiles),
            top: self.top_hitbox(tiles),
            left: self.left_hitbox(tiles),
            right: self.right_hitbox(tiles),
        }
    }

    /// Queries the tiles around the player and advances one frame.
    pub fn step(&mut self, dt: f32, tiles: &[Tile]) -> AdjacentHitboxes {
        let adjacent = self.adjacent_hitboxes(tiles);
        self.update_position(dt, adjacent.ground, adjacent.top, adjacent.left, adjacent.right);
        adjacent
    }

    pub fn update_position(
        &mut self,
        dt: f32,
        ground: Option<Rect>,
        top: Option<Rect>,
        left: Option<Rect>,
        right: Option<Rect>,
    ) {
        self.update_dash(dt);
        if self.is_dashing {
            return;
        }

        self.update_cooldown(dt);
        self.bonk_on_ceiling(top);
        self.handle_falling(dt, ground);
        self.handle_jumping(dt);
        self.resolve_collisions(ground, top, left, right);
        self.state_time += dt;
    }

    fn update_dash(&mut self, dt: f32) {
        if !self.is_dashing {
            return;
        }
        let speed = self.params.dash_distance / self.params.dash_duration;
        let step = dt.min(self.dash_time_remaining);
        self.pos.x += speed * step * self.dash_direction;
        self.dash_time_remaining -= step;

        if self.dash_time_remaining <= DASH_END_EPSILON {
            self.is_dashing = false;
            self.dash_time_remaining = 0.0;
            debug!(x = self.pos.x, "dash finished");
        }
    }

    fn update_cooldown(&mut self, dt: f32) {
        if self.time_since_last_dash < self.params.dash_cooldown {
            self.time_since_last_dash += dt;
        }
    }

    fn bonk_on_ceiling(&mut self, top: Option<Rect>) {
        if top.is_some_and(|t| self.is_colliding_dir(&t, Direction::Top)) {
            self.jump_speed = 0.0;
            self.is_jumping = false;
            self.is_falling = true;
        }
    }

    fn handle_falling(&mut self, dt: f32, ground: Option<Rect>) {
        if self.is_jumping {
            return;
        }
        let supported = ground.is_some_and(|g| self.is_colliding_dir(&g, Direction::Bottom));
        if supported {
            if self.is_falling {
                debug!(y = self.pos.y, "landed");
            }
            self.fall_speed = 0.0;
            self.is_falling = false;
            self.has_dashed = false;
        } else {
            self.fall_speed += self.params.gravity * dt;
            self.pos.y -= self.fall_speed * dt;
            self.is_falling = true;
        }
    }

    fn handle_jumping(&mut self, dt: f32) {
        if !self.is_jumping {
            return;
        }
        self.pos.y += self.jump_speed * dt;
        self.jump_speed -= self.params.gravity * dt;

        if self.jump_speed <= 0.0 {
            self.is_jumping = false;
            self.is_falling = true;
            debug!(y = self.pos.y, "jump apex");
        }
    }

    /// Snaps the player onto the contact plane of every touching neighbour.
    pub fn resolve_collisions(
        &mut self,
        ground: Option<Rect>,
        top: Option<Rect>,
        left: Option<Rect>,
        right: Option<Rect>,
    ) {
        if let Some(g) = ground.filter(|g| self.is_colliding_dir(g, Direction::Bottom)) {
            self.pos.y = g.y + g.h;
            self.fall_speed = 0.0;
            self.is_falling = false;
        }
        if let Some(t) = top.filter(|t| self.is_colliding_dir(t, Direction::Top)) {
            self.pos.y = t.y - self.size.y;
            self.jump_speed = 0.0;
            self.is_jumping = false;
            self.is_falling = true;
        }
        if let Some(l) = left.filter(|l| self.is_colliding_dir(l, Direction::Left)) {
            self.pos.x = l.x + l.w;
        }
        if let Some(r) = right.filter(|r| self.is_colliding_dir(r, Direction::Right)) {
            self.pos.x = r.x - self.size.x;
        }
    }

    pub fn move_left(&mut self, dt: f32, left: Option<Rect>) {
        match left.filter(|l| self.is_colliding_dir(l, Direction::Left)) {
            Some(wall) => self.pos.x = wall.x + wall.w,
            None => self.pos.x -= self.params.movement_speed * dt,
        }
    }

    pub fn move_right(&mut self, dt: f32, right: Option<Rect>) {
        match right.filter(|r| self.is_colliding_dir(r, Direction::Right)) {
            Some(wall) => self.pos.x = wall.x - self.size.x,
            None => self.pos.x += self.params.movement_speed * dt,
        }
    }

    pub fn jump(&mut self) {
        if self.is_jumping || self.is_falling {
            return;
        }
        self.jump_speed = self.params.initial_jump_speed + self.params.jump_height;
        self.is_jumping = true;
        debug!(speed = self.jump_speed, "jump");
    }

    pub fn dash_left(&mut self) {
        self.start_dash(-1.0);
    }

    pub fn dash_right(&mut self) {
        self.start_dash(1.0);
    }

    fn can_dash(&self) -> bool {
        self.time_since_last_dash >= self.params.dash_cooldown
            && !self.is_dashing
            && !self.has_dashed
    }

    fn start_dash(&mut self, direction: f32) {
        if !self.can_dash() {
            return;
        }
        if !(self.params.dash_duration > 0.0) || !self.params.dash_distance.is_finite() {
            warn!(duration = self.params.dash_duration, "dash ignored: bad dash tuning");
            return;
        }
        self.is_dashing = true;
        self.dash_time_remaining = self.params.dash_duration;
        self.dash_direction = direction;
        self.time_since_last_dash = 0.0;
        self.has_dashed = true;
        debug!(direction, "dash");
    }

    /// Cancels a jump and pulls the player down at four times gravity.
    /// Ignored while grounded or dashing.
    pub fn fall_faster(&mut self, dt: f32) {
        if self.is_dashing || !(self.is_falling || self.is_jumping) {
            return;
        }
        self.is_jumping = false;
        self.is_falling = true;
        self.fall_speed += self.params.gravity * dt * FAST_FALL_GRAVITY_SCALE;
        if dt > 0.0 {
            self.fall_speed = self.fall_speed.min(FAST_FALL_MAX_STEP / dt);
        }
        self.pos.y -= self.fall_speed * dt;
    }
}

/// Tile overlapping `probe` with the smallest signed gap; ties keep list order.
fn closest_tile(tiles: &[Tile], probe: &Rect, gap: impl Fn(&Rect) -> f32) -> Option<Rect> {
    let mut best: Option<(f32, Rect)> = None;
    for tile in tiles.iter().filter_map(Tile::bounds) {
        if !overlaps(probe, &tile) {
            continue;
        }
        let distance = gap(&tile);
        if best.is_none_or(|(closest, _)| distance < closest) {
            best = Some((distance, tile));
        }
    }
    best.map(|(_, tile)| tile)
}
