pub mod board;
pub mod config;
pub mod controller;
pub mod coord;
pub mod events;
pub mod input;
pub mod parse_rle;
pub mod render;
pub mod rule_set;
pub mod viewport;

mod parse_util;

pub type ScreenSize = u16;
pub type WorldOffset = i64;
