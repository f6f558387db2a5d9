#![allow(clippy::new_without_default)]

pub mod cleaner;
pub mod deleted;
pub mod dom;
pub mod engine;
pub mod error;
pub mod player;
pub mod render;
pub mod resource;
pub mod settings;
pub mod storage;
