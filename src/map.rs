use macroquad::file::load_string;
use macroquad::prelude::*;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::animation::{Easing, SpriteFrames};
use crate::tile::Tile;

const DEMO_TILE_SIZE: f32 = 64.0;
const DEMO_FRAME_DURATION: f32 = 0.5;

#[derive(Debug, Error)]
pub enum MapLoadError {
    #[error("level '{path}' could not be read: {message}")]
    File { path: String, message: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level declares {expected} {axis} but has {found}")]
    Shape {
        axis: &'static str,
        expected: usize,
        found: usize,
    },
}

#[derive(Deserialize)]
struct LevelFile {
    width: usize,
    height: usize,
    tiles: Vec<Vec<Option<CellFile>>>,
}

#[derive(Deserialize)]
struct CellFile {
    #[serde(default)]
    sprites: Vec<SpriteFile>,
    #[serde(alias = "frameDuration")]
    frame_duration: f32,
}

#[derive(Deserialize)]
struct SpriteFile {
    file: String,
    width: f32,
    height: f32,
}

/// Ordered tile list of a level. Order matters: ground and ceiling queries
/// return the first matching tile.
pub struct TileMap {
    tiles: Vec<Tile>,
    sprites: Vec<Vec<String>>,
}

impl TileMap {
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            sprites: Vec::new(),
        }
    }

    pub fn push(&mut self, tile: Tile, sprites: Vec<String>) {
        self.tiles.push(tile);
        self.sprites.push(sprites);
    }

    /// Row-major grid; row 0 sits at `y = 0` and rows grow upward. The last
    /// sprite of a cell decides the cell size. `null` cells are empty.
    pub fn from_json_str(raw: &str) -> Result<Self, MapLoadError> {
        let parsed: LevelFile = serde_json::from_str(raw)?;
        if parsed.tiles.len() != parsed.height {
            return Err(MapLoadError::Shape {
                axis: "rows",
                expected: parsed.height,
                found: parsed.tiles.len(),
            });
        }

        let mut map = Self::new();
        for (row_idx, row) in parsed.tiles.into_iter().enumerate() {
            if row.len() != parsed.width {
                return Err(MapLoadError::Shape {
                    axis: "columns",
                    expected: parsed.width,
                    found: row.len(),
                });
            }
            for (col_idx, cell) in row.into_iter().enumerate() {
                let Some(cell) = cell else {
                    continue;
                };
                let bounds = cell.sprites.last().map(|s| {
                    Rect::new(
                        col_idx as f32 * s.width,
                        row_idx as f32 * s.height,
                        s.width,
                        s.height,
                    )
                });
                let tile = Tile::new(bounds, cell.sprites.len(), cell.frame_duration);
                map.push(tile, cell.sprites.into_iter().map(|s| s.file).collect());
            }
        }
        Ok(map)
    }

    pub async fn load(path: &str) -> Result<Self, MapLoadError> {
        let raw = load_string(path).await.map_err(|err| MapLoadError::File {
            path: path.to_string(),
            message: err.to_string(),
        })?;
        let map = Self::from_json_str(&raw)?;
        info!(path, tiles = map.len(), "level loaded");
        Ok(map)
    }

    /// The sandbox level: a floor strip, three blocks and one broken tile.
    pub fn demo() -> Self {
        let block = "assets/Blocco1.png".to_string();
        let test = "assets/TileTest.png".to_string();
        let s = DEMO_TILE_SIZE;
        let mut map = Self::new();

        let mut place = |x: f32, y: f32, frames: usize, sprite: &String| {
            let tile = Tile::new(Some(Rect::new(x, y, s, s)), frames, DEMO_FRAME_DURATION);
            let sprites = if frames == 0 { Vec::new() } else { vec![sprite.clone()] };
            map.push(tile, sprites);
        };
        place(100.0, 100.0, 1, &block);
        place(600.0, 400.0, 1, &test);
        place(800.0, 600.0, 1, &test);
        place(400.0, 400.0, 0, &test);
        for i in (0..=1920).step_by(DEMO_TILE_SIZE as usize) {
            place(i as f32, 0.0, 1, &test);
        }
        map
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn sprite_paths(&self, index: usize) -> &[String] {
        self.sprites.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn update_sprites(&mut self, dt: f32) {
        for tile in &mut self.tiles {
            tile.update_sprite(dt);
        }
    }
}

impl Default for TileMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Textures for each tile of a [`TileMap`], by tile index.
pub struct TileSprites {
    frames: Vec<Option<SpriteFrames>>,
}

impl TileSprites {
    pub async fn load(map: &TileMap) -> Self {
        let mut frames = Vec::with_capacity(map.len());
        for index in 0..map.len() {
            let paths = map.sprite_paths(index);
            if paths.is_empty() {
                frames.push(None);
                continue;
            }
            match SpriteFrames::load_files(paths).await {
                Ok(sprites) => frames.push(Some(sprites)),
                Err(err) => {
                    warn!(index, "tile sprites unavailable: {err}");
                    frames.push(None);
                }
            }
        }
        Self { frames }
    }

    /// Draws every tile inside `view`; tiles without textures are outlined.
    pub fn draw(&self, map: &TileMap, view: Rect) {
        for (index, tile) in map.tiles().iter().enumerate() {
            let Some(bounds) = tile.bounds() else {
                continue;
            };
            if !bounds.overlaps(&view) {
                continue;
            }
            let sprites = self.frames.get(index).and_then(Option::as_ref);
            match (sprites, tile.key_frame(Easing::Linear, true)) {
                (Some(sprites), Some(frame)) => sprites.draw(frame, bounds),
                _ => draw_rectangle_lines(bounds.x, bounds.y, bounds.w, bounds.h, 2.0, GRAY),
            }
        }
    }
}
