use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A circuit layout loaded from TOML.
///
/// Every field defaults to the stock circuit, so an empty file renders the
/// full default scene and a partial file overrides only what it names.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LayoutFile {
    #[serde(default)]
    pub metadata: LayoutMetadata,
    #[serde(default)]
    pub surface: SurfaceLayout,
    #[serde(default)]
    pub track: TrackLayout,
    #[serde(default)]
    pub starting_arc: StartingArcLayout,
    #[serde(default)]
    pub stand: StandLayout,
    #[serde(default = "default_signs")]
    pub signs: Vec<SignLayout>,
    #[serde(default)]
    pub finish_line: FinishLineLayout,
    #[serde(default)]
    pub pit_stop: PitStopLayout,
}

impl Default for LayoutFile {
    fn default() -> Self {
        Self {
            metadata: LayoutMetadata::default(),
            surface: SurfaceLayout::default(),
            track: TrackLayout::default(),
            starting_arc: StartingArcLayout::default(),
            stand: StandLayout::default(),
            signs: default_signs(),
            finish_line: FinishLineLayout::default(),
            pit_stop: PitStopLayout::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LayoutMetadata {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub author: String,
}

impl Default for LayoutMetadata {
    fn default() -> Self {
        Self {
            name: default_name(),
            author: String::new(),
        }
    }
}

/// The flat driving surface under everything else.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SurfaceLayout {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default = "default_surface_extent")]
    pub width: f32,
    #[serde(default = "default_surface_extent")]
    pub height: f32,
}

impl Default for SurfaceLayout {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            width: default_surface_extent(),
            height: default_surface_extent(),
        }
    }
}

/// Ring of marker boxes outlining the circuit.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TrackLayout {
    #[serde(default = "default_track_radius")]
    pub radius: f32,
    #[serde(default = "default_segments")]
    pub segments: usize,
    #[serde(default)]
    pub y: f32,
}

impl Default for TrackLayout {
    fn default() -> Self {
        Self {
            radius: default_track_radius(),
            segments: default_segments(),
            y: 0.0,
        }
    }
}

/// The arched starting line across the track. `angle` is in radians.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StartingArcLayout {
    #[serde(default = "default_track_radius")]
    pub radius: f32,
    #[serde(default = "default_arc_angle")]
    pub angle: f32,
    #[serde(default = "default_segments")]
    pub segments: usize,
    #[serde(default)]
    pub y: f32,
}

impl Default for StartingArcLayout {
    fn default() -> Self {
        Self {
            radius: default_track_radius(),
            angle: default_arc_angle(),
            segments: default_segments(),
            y: 0.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StandLayout {
    #[serde(default)]
    pub x: f32,
    #[serde(default = "default_stand_y")]
    pub y: f32,
    #[serde(default = "default_stand_z")]
    pub z: f32,
}

impl Default for StandLayout {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: default_stand_y(),
            z: default_stand_z(),
        }
    }
}

/// A signpost with a textured panel. `y` is the post height; the panel sits
/// on top of it.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SignLayout {
    #[serde(default)]
    pub x: f32,
    #[serde(default = "default_sign_height")]
    pub y: f32,
    #[serde(default = "default_sign_z")]
    pub z: f32,
    #[serde(default = "default_sign_width")]
    pub width: f32,
    #[serde(default = "default_sign_panel_height")]
    pub height: f32,
    #[serde(default = "default_sign_texture")]
    pub texture: String,
}

impl Default for SignLayout {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: default_sign_height(),
            z: default_sign_z(),
            width: default_sign_width(),
            height: default_sign_panel_height(),
            texture: default_sign_texture(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FinishLineLayout {
    #[serde(default)]
    pub x: f32,
    #[serde(default = "default_stand_y")]
    pub y: f32,
    #[serde(default = "default_finish_z")]
    pub z: f32,
    #[serde(default = "default_finish_width")]
    pub width: f32,
    #[serde(default = "default_finish_height")]
    pub height: f32,
    #[serde(default = "default_finish_texture")]
    pub texture: String,
}

impl Default for FinishLineLayout {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: default_stand_y(),
            z: default_finish_z(),
            width: default_finish_width(),
            height: default_finish_height(),
            texture: default_finish_texture(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PitStopLayout {
    #[serde(default = "default_pit_x")]
    pub x: f32,
    #[serde(default = "default_pit_y")]
    pub y: f32,
    #[serde(default = "default_pit_z")]
    pub z: f32,
}

impl Default for PitStopLayout {
    fn default() -> Self {
        Self {
            x: default_pit_x(),
            y: default_pit_y(),
            z: default_pit_z(),
        }
    }
}

fn default_name() -> String {
    "Untitled".to_string()
}

fn default_surface_extent() -> f32 {
    100.0
}

fn default_track_radius() -> f32 {
    50.0
}

fn default_segments() -> usize {
    100
}

fn default_arc_angle() -> f32 {
    FRAC_PI_2
}

fn default_stand_y() -> f32 {
    1.0
}

fn default_stand_z() -> f32 {
    90.0
}

fn default_sign_height() -> f32 {
    5.0
}

fn default_sign_z() -> f32 {
    -10.0
}

fn default_sign_width() -> f32 {
    3.0
}

fn default_sign_panel_height() -> f32 {
    2.0
}

fn default_sign_texture() -> String {
    "start.png".to_string()
}

fn default_finish_z() -> f32 {
    -20.0
}

fn default_finish_width() -> f32 {
    10.0
}

fn default_finish_height() -> f32 {
    5.0
}

fn default_finish_texture() -> String {
    "checkered_flag.png".to_string()
}

fn default_pit_x() -> f32 {
    -10.0
}

fn default_pit_y() -> f32 {
    0.5
}

fn default_pit_z() -> f32 {
    5.0
}

fn default_signs() -> Vec<SignLayout> {
    vec![SignLayout::default()]
}

impl LayoutFile {
    /// Load a layout from a TOML file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        toml::from_str(&text).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }

    /// Save this layout to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let text = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize layout: {}", e))?;
        std::fs::write(path, text)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::LayoutFile;

    #[test]
    fn empty_file_yields_the_stock_circuit() {
        let layout: LayoutFile = toml::from_str("").unwrap();

        assert_eq!(layout.metadata.name, "Untitled");
        assert_eq!(layout.surface.width, 100.0);
        assert_eq!(layout.track.radius, 50.0);
        assert_eq!(layout.track.segments, 100);
        assert_eq!(layout.starting_arc.angle, FRAC_PI_2);
        assert_eq!(layout.stand.z, 90.0);
        assert_eq!(layout.signs.len(), 1);
        assert_eq!(layout.signs[0].texture, "start.png");
        assert_eq!(layout.finish_line.width, 10.0);
        assert_eq!(layout.pit_stop.x, -10.0);
    }

    #[test]
    fn saved_layout_loads_back_identically() {
        let mut layout = LayoutFile::default();
        layout.metadata.name = "Roundtrip".to_string();
        layout.track.radius = 42.0;
        layout.signs[0].texture = "sponsor.png".to_string();

        let path = std::env::temp_dir().join("kart-circuit-layout-roundtrip.toml");
        layout.save(&path).unwrap();
        let reloaded = LayoutFile::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(reloaded.metadata.name, "Roundtrip");
        assert_eq!(reloaded.track.radius, 42.0);
        assert_eq!(reloaded.track.segments, layout.track.segments);
        assert_eq!(reloaded.signs.len(), 1);
        assert_eq!(reloaded.signs[0].texture, "sponsor.png");
        assert_eq!(reloaded.stand.z, layout.stand.z);
        assert_eq!(reloaded.finish_line.width, layout.finish_line.width);
        assert_eq!(reloaded.pit_stop.x, layout.pit_stop.x);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let layout: LayoutFile = toml::from_str(
            r#"
            [metadata]
            name = "Test Oval"

            [track]
            radius = 30.0

            [[signs]]
            z = -5.0
            texture = "sponsor.png"
            "#,
        )
        .unwrap();

        assert_eq!(layout.metadata.name, "Test Oval");
        assert_eq!(layout.track.radius, 30.0);
        // Unnamed fields keep their defaults.
        assert_eq!(layout.track.segments, 100);
        assert_eq!(layout.stand.z, 90.0);
        // An explicit sign list replaces the default one.
        assert_eq!(layout.signs.len(), 1);
        assert_eq!(layout.signs[0].z, -5.0);
        assert_eq!(layout.signs[0].texture, "sponsor.png");
        assert_eq!(layout.signs[0].width, 3.0);
    }
}
