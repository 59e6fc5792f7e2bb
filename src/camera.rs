use macroquad::prelude::*;
use serde::Deserialize;

const FOLLOW_LERP: f32 = 0.1;
const DEAD_ZONE: Vec2 = Vec2::new(200.0, 150.0);
const ZOOM_STEP: f32 = 0.02;
const ZOOM_MIN: f32 = 0.5;
const ZOOM_MAX: f32 = 2.0;
const SHAKE_INTENSITY: f32 = 1.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    Follow,
    FollowNoY,
    FollowAsOutOfScreen,
    #[default]
    FollowSmooth,
    FollowSmoothNoY,
    DeadZone,
    Zoom,
    Shake,
}

/// Cosmetic camera state. It reads the player's bounds and never feeds back
/// into physics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    pub position: Vec2,
    /// World units visible at zoom 1.
    pub viewport: Vec2,
    pub zoom: f32,
    pending_zoom: f32,
}

impl CameraRig {
    pub fn new(position: Vec2, viewport: Vec2) -> Self {
        Self {
            position,
            viewport,
            zoom: 1.0,
            pending_zoom: 0.0,
        }
    }

    /// Queues a zoom step (`+1` out, `-1` in) for the next `Zoom` update.
    pub fn nudge_zoom(&mut self, direction: f32) {
        self.pending_zoom += direction.signum();
    }

    pub fn follow(&mut self, mode: CameraMode, target: Rect) {
        let center = target.center();
        match mode {
            CameraMode::Follow => self.position = center,
            CameraMode::FollowNoY => self.position.x = center.x,
            CameraMode::FollowAsOutOfScreen => self.follow_out_of_screen(target),
            CameraMode::FollowSmooth => self.position += (center - self.position) * FOLLOW_LERP,
            CameraMode::FollowSmoothNoY => {
                self.position.x += (center.x - self.position.x) * FOLLOW_LERP;
            }
            CameraMode::DeadZone => {
                let half = DEAD_ZONE * 0.5;
                if (center.x - self.position.x).abs() > half.x {
                    self.position.x = center.x;
                }
                if (center.y - self.position.y).abs() > half.y {
                    self.position.y = center.y;
                }
            }
            CameraMode::Zoom => {
                self.zoom = (self.zoom + self.pending_zoom * ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
            }
            CameraMode::Shake => {
                self.position.x += macroquad::rand::gen_range(-SHAKE_INTENSITY, SHAKE_INTENSITY);
                self.position.y += macroquad::rand::gen_range(-SHAKE_INTENSITY, SHAKE_INTENSITY);
            }
        }
        self.pending_zoom = 0.0;
    }

    /// Jumps by half a body once the player's corner leaves the viewport.
    fn follow_out_of_screen(&mut self, target: Rect) {
        let half_view = self.viewport * 0.5;
        if target.x < self.position.x - half_view.x {
            self.position.x = target.x + target.w / 2.0;
        } else if target.x > self.position.x + half_view.x {
            self.position.x = target.x - target.w / 2.0;
        }
        if target.y < self.position.y - half_view.y {
            self.position.y = target.y + target.h / 2.0;
        } else if target.y > self.position.y + half_view.y {
            self.position.y = target.y - target.h / 2.0;
        }
    }

    /// World rectangle currently on screen.
    pub fn view_rect(&self) -> Rect {
        let size = self.viewport * self.zoom;
        Rect::new(
            self.position.x - size.x * 0.5,
            self.position.y - size.y * 0.5,
            size.x,
            size.y,
        )
    }

    /// y-up macroquad camera looking at the rig.
    pub fn to_camera2d(&self) -> Camera2D {
        let size = (self.viewport * self.zoom).max(Vec2::ONE);
        Camera2D {
            target: self.position,
            zoom: vec2(2.0 / size.x, 2.0 / size.y),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(vec2(960.0, 540.0), vec2(1920.0, 1080.0))
    }

    fn body(x: f32, y: f32) -> Rect {
        Rect::new(x, y, 64.0, 128.0)
    }

    #[test]
    fn follow_centers_on_player() {
        let mut cam = rig();
        cam.follow(CameraMode::Follow, body(100.0, 200.0));
        assert_eq!(cam.position, vec2(132.0, 264.0));
    }

    #[test]
    fn follow_no_y_keeps_height() {
        let mut cam = rig();
        cam.follow(CameraMode::FollowNoY, body(100.0, 200.0));
        assert_eq!(cam.position, vec2(132.0, 540.0));
    }

    #[test]
    fn smooth_follow_moves_a_tenth_of_the_way() {
        let mut cam = rig();
        cam.follow(CameraMode::FollowSmooth, body(-32.0, -64.0));
        assert!((cam.position.x - 864.0).abs() < 1e-3);
        assert!((cam.position.y - 486.0).abs() < 1e-3);

        let mut cam = rig();
        cam.follow(CameraMode::FollowSmoothNoY, body(-32.0, -64.0));
        assert_eq!(cam.position.y, 540.0);
    }

    #[test]
    fn dead_zone_ignores_small_moves() {
        let mut cam = rig();
        cam.follow(CameraMode::DeadZone, body(960.0 - 32.0 + 90.0, 540.0 - 64.0 - 70.0));
        assert_eq!(cam.position, vec2(960.0, 540.0));

        cam.follow(CameraMode::DeadZone, body(960.0 - 32.0 + 150.0, 540.0 - 64.0));
        assert_eq!(cam.position, vec2(1110.0, 540.0));
    }

    #[test]
    fn out_of_screen_follow_only_reacts_outside_view() {
        let mut cam = rig();
        cam.follow(CameraMode::FollowAsOutOfScreen, body(500.0, 500.0));
        assert_eq!(cam.position, vec2(960.0, 540.0));

        cam.follow(CameraMode::FollowAsOutOfScreen, body(2000.0, 500.0));
        assert_eq!(cam.position.x, 2000.0 - 32.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = rig();
        for _ in 0..200 {
            cam.nudge_zoom(1.0);
            cam.follow(CameraMode::Zoom, body(0.0, 0.0));
        }
        assert_eq!(cam.zoom, ZOOM_MAX);

        cam.nudge_zoom(-1.0);
        cam.follow(CameraMode::Zoom, body(0.0, 0.0));
        assert!((cam.zoom - (ZOOM_MAX - ZOOM_STEP)).abs() < 1e-6);
    }

    #[test]
    fn pending_zoom_is_dropped_by_other_modes() {
        let mut cam = rig();
        cam.nudge_zoom(1.0);
        cam.follow(CameraMode::Follow, body(0.0, 0.0));
        cam.follow(CameraMode::Zoom, body(0.0, 0.0));
        assert_eq!(cam.zoom, 1.0);
    }

    #[test]
    fn shake_stays_within_intensity() {
        macroquad::rand::srand(7);
        let mut cam = rig();
        for _ in 0..50 {
            let before = cam.position;
            cam.follow(CameraMode::Shake, body(0.0, 0.0));
            let delta = cam.position - before;
            assert!(delta.x.abs() <= SHAKE_INTENSITY + 1e-3);
            assert!(delta.y.abs() <= SHAKE_INTENSITY + 1e-3);
        }
    }

    #[test]
    fn camera2d_covers_viewport() {
        let mut cam = rig();
        cam.zoom = 2.0;
        let c = cam.to_camera2d();
        assert_eq!(c.target, vec2(960.0, 540.0));
        assert!((c.zoom.x - 2.0 / 3840.0).abs() < 1e-9);
        assert_eq!(cam.view_rect().w, 3840.0);
    }
}
