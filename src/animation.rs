use macroquad::prelude::*;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AtlasError {
    #[error("animation needs at least one frame")]
    NoFrames,
    #[error("frame duration must be positive, got {0}")]
    BadFrameDuration(f32),
    #[error("frame size must be positive, got {width}x{height}")]
    BadFrameSize { width: f32, height: f32 },
    #[error("texture '{path}' failed to load: {message}")]
    Texture { path: String, message: String },
}

/// Time remapping applied before a key frame is looked up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseInOut,
    EaseIn,
    EaseOut,
}

impl Easing {
    /// Maps elapsed playback time onto the time fed to frame lookup.
    /// Non-linear modes normalise against `duration` and saturate at the end.
    pub fn remap(self, state_time: f32, duration: f32) -> f32 {
        if duration <= 0.0 {
            return state_time;
        }
        let t = (state_time / duration).min(1.0);
        let eased = match self {
            Easing::Linear => return state_time,
            Easing::EaseInOut => -0.5 * ((std::f32::consts::PI * t).cos() - 1.0),
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        };
        eased * duration
    }
}

/// Frame timing of a sprite animation, independent of any texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animation {
    frame_count: usize,
    frame_duration: f32,
}

impl Animation {
    pub fn new(frame_count: usize, frame_duration: f32) -> Result<Self, AtlasError> {
        if frame_count == 0 {
            return Err(AtlasError::NoFrames);
        }
        if !(frame_duration > 0.0) {
            return Err(AtlasError::BadFrameDuration(frame_duration));
        }
        Ok(Self {
            frame_count,
            frame_duration,
        })
    }

    /// Single-frame animation, used when no sprite sheet is available.
    pub fn still() -> Self {
        Self {
            frame_count: 1,
            frame_duration: 1.0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn frame_duration(&self) -> f32 {
        self.frame_duration
    }

    pub fn duration(&self) -> f32 {
        self.frame_count as f32 * self.frame_duration
    }

    pub fn key_frame_index(&self, time: f32, looping: bool) -> usize {
        if self.frame_count == 1 {
            return 0;
        }
        let n = (time / self.frame_duration) as usize;
        if looping {
            n % self.frame_count
        } else {
            n.min(self.frame_count - 1)
        }
    }

    /// Picks the frame to show after `state_time` seconds of playback.
    pub fn sample(&self, state_time: f32, easing: Easing, looping: bool) -> usize {
        let time = easing.remap(state_time, self.duration());
        self.key_frame_index(time, looping)
    }
}

/// Row-major source rectangles of a sprite sheet.
pub fn atlas_frames(
    sheet_width: f32,
    sheet_height: f32,
    frame_width: f32,
    frame_height: f32,
    padding: f32,
) -> Result<Vec<Rect>, AtlasError> {
    if frame_width <= 0.0 || frame_height <= 0.0 || padding < 0.0 {
        return Err(AtlasError::BadFrameSize {
            width: frame_width,
            height: frame_height,
        });
    }
    let columns = ((sheet_width + padding) / (frame_width + padding)).floor() as usize;
    let rows = ((sheet_height + padding) / (frame_height + padding)).floor() as usize;
    if columns == 0 || rows == 0 {
        return Err(AtlasError::NoFrames);
    }

    let mut frames = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for col in 0..columns {
            frames.push(Rect::new(
                col as f32 * (frame_width + padding),
                row as f32 * (frame_height + padding),
                frame_width,
                frame_height,
            ));
        }
    }
    Ok(frames)
}

/// Textures backing an [`Animation`]; each frame is a texture plus a source rect.
#[derive(Clone)]
pub struct SpriteFrames {
    frames: Vec<(Texture2D, Rect)>,
}

impl SpriteFrames {
    pub async fn load_atlas(
        path: &str,
        frame_width: f32,
        frame_height: f32,
        padding: f32,
    ) -> Result<Self, AtlasError> {
        let texture = load_nearest(path).await?;
        let size = texture.size();
        let rects = atlas_frames(size.x, size.y, frame_width, frame_height, padding)?;
        Ok(Self {
            frames: rects.into_iter().map(|r| (texture.clone(), r)).collect(),
        })
    }

    pub async fn load_files(paths: &[String]) -> Result<Self, AtlasError> {
        let mut frames = Vec::with_capacity(paths.len());
        for path in paths {
            let texture = load_nearest(path).await?;
            let size = texture.size();
            frames.push((texture, Rect::new(0.0, 0.0, size.x, size.y)));
        }
        if frames.is_empty() {
            return Err(AtlasError::NoFrames);
        }
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Draws one frame over `dest`. World space is y-up, so the image is flipped.
    pub fn draw(&self, index: usize, dest: Rect) {
        let Some((texture, source)) = self.frames.get(index) else {
            return;
        };
        draw_texture_ex(
            texture,
            dest.x,
            dest.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(dest.w, dest.h)),
                source: Some(*source),
                flip_y: true,
                ..Default::default()
            },
        );
    }
}

async fn load_nearest(path: &str) -> Result<Texture2D, AtlasError> {
    let texture = load_texture(path).await.map_err(|err| AtlasError::Texture {
        path: path.to_string(),
        message: err.to_string(),
    })?;
    texture.set_filter(FilterMode::Nearest);
    Ok(texture)
}
