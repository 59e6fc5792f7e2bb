//! Platformer prototype: a player that runs, jumps, dashes and falls onto
//! static tiles, with camera follow modes and sprite animation on macroquad.

pub mod animation;
pub mod camera;
pub mod config;
pub mod helpers;
pub mod hitbox;
pub mod map;
pub mod player;
pub mod tile;
