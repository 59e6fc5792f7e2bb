use macroquad::prelude::*;
use thiserror::Error;
use tracing::warn;

use crate::animation::{Animation, AtlasError, Easing};
use crate::hitbox::{Direction, DirectionalHitboxes};

#[derive(Debug, Error, PartialEq)]
pub enum TileError {
    #[error("tile has no bounding box")]
    MissingBounds,
    #[error(transparent)]
    Animation(#[from] AtlasError),
}

/// Static collidable cell. Tiles never move and never start an interaction.
///
/// A tile built from bad data is kept as an inert placeholder: it has no
/// hitboxes and no animation, never collides and is skipped by queries.
#[derive(Clone, Debug)]
pub struct Tile {
    hitboxes: Option<DirectionalHitboxes>,
    animation: Option<Animation>,
    state_time: f32,
}

impl Tile {
    pub fn try_new(
        bounds: Option<Rect>,
        frame_count: usize,
        frame_duration: f32,
    ) -> Result<Self, TileError> {
        let animation = Animation::new(frame_count, frame_duration)?;
        let bounds = bounds.ok_or(TileError::MissingBounds)?;
        Ok(Self {
            hitboxes: Some(DirectionalHitboxes::from_bounds(bounds, 0.0)),
            animation: Some(animation),
            state_time: 0.0,
        })
    }

    pub fn new(bounds: Option<Rect>, frame_count: usize, frame_duration: f32) -> Self {
        Self::try_new(bounds, frame_count, frame_duration).unwrap_or_else(|err| {
            warn!(?bounds, "tile kept as inert placeholder: {err}");
            Self::inert()
        })
    }

    pub fn inert() -> Self {
        Self {
            hitboxes: None,
            animation: None,
            state_time: 0.0,
        }
    }

    pub fn is_inert(&self) -> bool {
        self.hitboxes.is_none()
    }

    pub fn hitboxes(&self) -> Option<&DirectionalHitboxes> {
        self.hitboxes.as_ref()
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.hitboxes.map(|hb| hb.bounds())
    }

    pub fn x(&self) -> Option<f32> {
        self.bounds().map(|b| b.x)
    }

    pub fn y(&self) -> Option<f32> {
        self.bounds().map(|b| b.y)
    }

    pub fn width(&self) -> Option<f32> {
        self.bounds().map(|b| b.w)
    }

    pub fn height(&self) -> Option<f32> {
        self.bounds().map(|b| b.h)
    }

    pub fn is_colliding(&self, rect: &Rect) -> bool {
        self.hitboxes.is_some_and(|hb| hb.touching(rect))
    }

    pub fn is_colliding_dir(&self, rect: &Rect, direction: Direction) -> bool {
        self.hitboxes
            .is_some_and(|hb| hb.touching_dir(rect, direction))
    }

    pub fn update_sprite(&mut self, dt: f32) {
        self.state_time += dt;
    }

    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    pub fn key_frame(&self, easing: Easing, looping: bool) -> Option<usize> {
        self.animation
            .map(|anim| anim.sample(self.state_time, easing, looping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> Tile {
        Tile::new(Some(Rect::new(100.0, 100.0, 64.0, 64.0)), 2, 0.5)
    }

    #[test]
    fn valid_tile_exposes_bounds() {
        let tile = block();
        assert!(!tile.is_inert());
        assert_eq!(tile.bounds(), Some(Rect::new(100.0, 100.0, 64.0, 64.0)));
        assert_eq!(tile.x(), Some(100.0));
        assert_eq!(tile.height(), Some(64.0));
    }

    #[test]
    fn degenerate_inputs_give_inert_tiles() {
        let inert = [
            Tile::new(Some(Rect::new(0.0, 0.0, 64.0, 64.0)), 0, 0.5),
            Tile::new(Some(Rect::new(0.0, 0.0, 64.0, 64.0)), 3, 0.0),
            Tile::new(Some(Rect::new(0.0, 0.0, 64.0, 64.0)), 3, -0.1),
            Tile::new(None, 3, 0.5),
        ];
        for tile in &inert {
            assert!(tile.is_inert());
            assert_eq!(tile.bounds(), None);
            assert!(!tile.is_colliding(&Rect::new(0.0, 0.0, 64.0, 64.0)));
            assert_eq!(tile.key_frame(Easing::Linear, true), None);
        }
    }

    #[test]
    fn try_new_reports_the_reason() {
        assert_eq!(
            Tile::try_new(None, 1, 0.5).unwrap_err(),
            TileError::MissingBounds
        );
        assert_eq!(
            Tile::try_new(Some(Rect::new(0.0, 0.0, 1.0, 1.0)), 0, 0.5).unwrap_err(),
            TileError::Animation(AtlasError::NoFrames)
        );
    }

    #[test]
    fn collides_with_rect_touching_top() {
        let tile = block();
        let feet = Rect::new(110.0, 164.0, 20.0, 1.0);

        assert!(tile.is_colliding(&feet));
        assert!(tile.is_colliding_dir(&feet, Direction::Top));
        assert!(!tile.is_colliding_dir(&feet, Direction::Bottom));
    }

    #[test]
    fn far_rect_does_not_collide() {
        let tile = block();
        assert!(!tile.is_colliding(&Rect::new(300.0, 300.0, 10.0, 10.0)));
    }

    #[test]
    fn sprite_clock_drives_key_frame() {
        let mut tile = block();
        assert_eq!(tile.key_frame(Easing::Linear, true), Some(0));
        tile.update_sprite(0.6);
        assert_eq!(tile.key_frame(Easing::Linear, true), Some(1));
        tile.update_sprite(0.5);
        assert_eq!(tile.key_frame(Easing::Linear, true), Some(0));
    }
}
