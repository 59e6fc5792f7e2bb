use macroquad::prelude::*;

/// Thickness of every directional strip, in world units.
pub const HITBOX_THICKNESS: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
    ];
}

/// Open-interval AABB test: rectangles that only share an edge do not overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Closed-interval AABB test: a shared edge counts as contact.
pub fn touches(a: &Rect, b: &Rect) -> bool {
    a.x <= b.x + b.w && a.x + a.w >= b.x && a.y <= b.y + b.h && a.y + a.h >= b.y
}

/// Four thin strips along the edges of a bounding box (y-up world).
///
/// The strips are always derived from a bounding box and never edited on
/// their own. `side_inset` lifts the left/right strips so that a floor the
/// entity stands on is not mistaken for a wall.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalHitboxes {
    top: Rect,
    bottom: Rect,
    left: Rect,
    right: Rect,
}

impl DirectionalHitboxes {
    pub fn from_bounds(bounds: Rect, side_inset: f32) -> Self {
        let t = HITBOX_THICKNESS;
        Self {
            top: Rect::new(bounds.x, bounds.y + bounds.h, bounds.w, t),
            bottom: Rect::new(bounds.x, bounds.y, bounds.w, t),
            left: Rect::new(bounds.x, bounds.y + side_inset, t, bounds.h),
            right: Rect::new(bounds.x + bounds.w, bounds.y + side_inset, t, bounds.h),
        }
    }

    pub fn get(&self, direction: Direction) -> Rect {
        match direction {
            Direction::Top => self.top,
            Direction::Bottom => self.bottom,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Bounding box rebuilt from the strips: `x, y, w` from the bottom strip,
    /// `h` from the left one.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.bottom.x, self.bottom.y, self.bottom.w, self.left.h)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, Rect)> + '_ {
        Direction::ALL.into_iter().map(|dir| (dir, self.get(dir)))
    }

    pub fn touching(&self, rect: &Rect) -> bool {
        self.iter().any(|(_, strip)| touches(&strip, rect))
    }

    pub fn touching_dir(&self, rect: &Rect, direction: Direction) -> bool {
        touches(&self.get(direction), rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_follow_bounding_box_edges() {
        let hb = DirectionalHitboxes::from_bounds(Rect::new(10.0, 20.0, 64.0, 128.0), 4.0);

        assert_eq!(hb.get(Direction::Bottom), Rect::new(10.0, 20.0, 64.0, 1.0));
        assert_eq!(hb.get(Direction::Top), Rect::new(10.0, 148.0, 64.0, 1.0));
        assert_eq!(hb.get(Direction::Left), Rect::new(10.0, 24.0, 1.0, 128.0));
        assert_eq!(hb.get(Direction::Right), Rect::new(74.0, 24.0, 1.0, 128.0));
    }

    #[test]
    fn bounds_round_trip_through_strips() {
        let bounds = Rect::new(-3.5, 7.0, 16.0, 32.0);
        let hb = DirectionalHitboxes::from_bounds(bounds, 4.0);
        assert_eq!(hb.bounds(), bounds);
    }

    #[test]
    fn shared_edge_touches_but_does_not_overlap() {
        let floor = Rect::new(0.0, 0.0, 64.0, 64.0);
        let feet = Rect::new(10.0, 64.0, 20.0, 1.0);

        assert!(touches(&feet, &floor));
        assert!(!overlaps(&feet, &floor));
    }

    #[test]
    fn separated_rects_neither_touch_nor_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.5, 0.0, 10.0, 10.0);
        assert!(!touches(&a, &b));
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn touching_dir_only_checks_one_strip() {
        let hb = DirectionalHitboxes::from_bounds(Rect::new(0.0, 0.0, 64.0, 64.0), 0.0);
        let above = Rect::new(0.0, 65.0, 64.0, 10.0);

        assert!(hb.touching_dir(&above, Direction::Top));
        assert!(!hb.touching_dir(&above, Direction::Bottom));
        assert!(hb.touching(&above));
    }
}
