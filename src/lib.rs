use bevy::prelude::*;

pub mod layout_format;
pub mod motion;
pub mod scene;

/// Marker for the player-driven kart entity.
#[derive(Component)]
pub struct PlayerKart;
