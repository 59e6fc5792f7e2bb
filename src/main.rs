use std::sync::OnceLock;

use macroquad::miniquad::conf::Platform;
use macroquad::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use floorcollision::animation::{Animation, SpriteFrames};
use floorcollision::camera::CameraRig;
use floorcollision::config::GameConfig;
use floorcollision::helpers;
use floorcollision::map::{TileMap, TileSprites};
use floorcollision::player::Player;

const CONFIG_PATH: &str = "config.yaml";
const SKY: Color = Color::new(0.53, 0.81, 0.92, 1.0);

static CONFIG: OnceLock<GameConfig> = OnceLock::new();

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already installed");
    }
}

fn config() -> &'static GameConfig {
    CONFIG.get_or_init(|| {
        init_logging();
        match GameConfig::load(CONFIG_PATH) {
            Ok(cfg) => {
                info!(path = CONFIG_PATH, "config loaded");
                cfg
            }
            Err(err) => {
                warn!("config load failed ({CONFIG_PATH}): {err}; using defaults");
                GameConfig::default()
            }
        }
    })
}

fn window_conf() -> Conf {
    let cfg = config();
    Conf {
        window_title: cfg.window.title.clone(),
        window_width: cfg.window.width,
        window_height: cfg.window.height,
        sample_count: 1,
        platform: Platform {
            linux_wm_class: "floorcollision",
            ..Default::default()
        },
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let cfg = config();

    let mut tiles = match cfg.level.as_deref() {
        Some(path) => TileMap::load(path).await.unwrap_or_else(|err| {
            warn!("level load failed: {err}; using the demo level");
            TileMap::demo()
        }),
        None => TileMap::demo(),
    };
    let tile_sprites = TileSprites::load(&tiles).await;

    let sprite = &cfg.player_sprite;
    let player_sprites = match SpriteFrames::load_atlas(
        &sprite.path,
        sprite.frame_width,
        sprite.frame_height,
        sprite.padding,
    )
    .await
    {
        Ok(frames) => Some(frames),
        Err(err) => {
            warn!("player sprite load failed: {err}");
            None
        }
    };
    let frame_count = player_sprites.as_ref().map_or(1, SpriteFrames::len);
    let animation = Animation::new(frame_count, sprite.frame_duration).unwrap_or_else(|err| {
        warn!("player animation rejected: {err}");
        Animation::still()
    });

    let [x, y, w, h] = cfg.player_bounds;
    let mut player = Player::new(Rect::new(x, y, w, h), animation, cfg.player);
    let mut rig = CameraRig::new(
        player.bounds().center(),
        viewport_for_screen(cfg.window.view_height),
    );
    let mut show_hitboxes = cfg.debug_hitboxes;

    let mut i: f32 = 0.0;
    let mut fps: i32 = 0;

    loop {
        let dt = get_frame_time();

        let dash = is_key_down(KeyCode::LeftShift);
        let left = is_key_down(KeyCode::Left);
        let right = is_key_down(KeyCode::Right);
        if dash && left {
            player.dash_left();
        } else if dash && right {
            player.dash_right();
        } else if left {
            let wall = player.left_hitbox(tiles.tiles());
            player.move_left(dt, wall);
        } else if right {
            let wall = player.right_hitbox(tiles.tiles());
            player.move_right(dt, wall);
        }
        if is_key_down(KeyCode::Space) {
            player.jump();
        }
        if is_key_down(KeyCode::Down) {
            player.fall_faster(dt);
        }
        if is_key_down(KeyCode::Z) {
            rig.nudge_zoom(1.0);
        } else if is_key_down(KeyCode::X) {
            rig.nudge_zoom(-1.0);
        }
        if is_key_pressed(KeyCode::F1) {
            show_hitboxes = !show_hitboxes;
        }

        let adjacent = player.step(dt, tiles.tiles());
        tiles.update_sprites(dt);

        rig.viewport = viewport_for_screen(cfg.window.view_height);
        rig.follow(cfg.camera, player.bounds());

        set_camera(&rig.to_camera2d());
        clear_background(SKY);

        tile_sprites.draw(&tiles, rig.view_rect());

        let body = player.bounds();
        match player_sprites.as_ref() {
            Some(frames) => frames.draw(player.key_frame(sprite.easing, sprite.looping), body),
            None => draw_rectangle(body.x, body.y, body.w, body.h, ORANGE),
        }

        if show_hitboxes {
            helpers::draw_player_hitboxes(&player);
            helpers::draw_adjacent_hitboxes(&adjacent);
        }

        set_default_camera();

        i += dt;
        if i >= 1.0 {
            fps = get_fps();
            i = 0.0;
        }
        draw_text(&format!("FPS: {fps}"), 20.0, 40.0, 30.0, WHITE);
        draw_text(
            &format!(
                "{:?}  x {:.1}  y {:.1}",
                player.motion_state(),
                body.x,
                body.y
            ),
            20.0,
            70.0,
            24.0,
            WHITE,
        );

        next_frame().await;
    }
}

/// World-space size of the view for the current window aspect.
fn viewport_for_screen(view_height: f32) -> Vec2 {
    let view_h = view_height.max(1.0);
    let aspect = screen_width().max(1.0) / screen_height().max(1.0);
    vec2(view_h * aspect, view_h)
}
