use crate::browser;
use crate::sprite::{SheetLayout, StripDirection};
use serde::Deserialize;

/// Tunable constants, read once at startup and never changed afterwards.
///
/// Every field may be left out of `config.json`, the missing ones keep
/// their default value.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sprite: SpriteConfig,
    pub physics: PhysicsConfig,
    pub gestures: GestureConfig,
    pub world: WorldConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    pub layout: SheetLayout,
    /// ticks per frame advance, lower = faster animation
    pub frame_speed: u32,
    /// display size = frame size * scale
    pub scale: f64,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        SpriteConfig {
            layout: SheetLayout::Strip {
                frame_count: 9,
                direction: StripDirection::Horizontal,
            },
            frame_speed: 6,
            scale: 0.35,
        }
    }
}

// negative is up : top left is origin
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f64,
    pub jump_force: f64,
    pub strike_speed: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: 1.0,
            jump_force: -22.0,
            strike_speed: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub jump_threshold: f64,
    pub strike_threshold: f64,
    pub dash_distance: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            jump_threshold: 60.0,
            strike_threshold: 60.0,
            dash_distance: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub player_x: f64,
    /// ground line sits this far above the bottom of the viewport
    pub ground_offset: f64,
    pub ground_band_height: f64,
    pub ground_color: String,
    pub run_speed: f64,
    /// far, mid, near
    pub layer_speeds: [f64; 3],
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            player_x: 120.0,
            ground_offset: 140.0,
            ground_band_height: 200.0,
            ground_color: "#222".to_string(),
            run_speed: 5.0,
            layer_speeds: [0.2, 0.5, 1.0],
        }
    }
}

impl Config {
    pub const PATH: &'static str = "config.json";

    /// Missing or broken config is not fatal : warn and play with defaults
    pub async fn load() -> Self {
        match browser::fetch_json::<Config>(Self::PATH).await {
            Ok(config) => {
                log!("Config: loaded {}", Self::PATH);
                config
            }
            Err(err) => {
                warn!("Config: using defaults, {} unavailable ({:#})", Self::PATH, err);
                Config::default()
            }
        }
    }
}
