use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

/// Rendering constants for the overlay pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Minimum keypoint score before it is drawn or anchored to.
    pub confidence_threshold: f32,
    /// Side length of the square item sprite floated above the head.
    pub anchor_size_px: u32,
    /// Vertical lift of the item sprite above the head keypoint.
    pub anchor_y_offset_px: f32,
    pub marker_radius_px: i32,
    pub line_thickness_px: u32,
    pub marker_color: [u8; 4],
    pub line_color: [u8; 4],
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.3,
            anchor_size_px: 150,
            anchor_y_offset_px: 150.0,
            marker_radius_px: 5,
            line_thickness_px: 2,
            marker_color: [255, 0, 0, 255],
            line_color: [0, 0, 255, 255],
        }
    }
}

/// Tunable game parameters with their shipped defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Round length in seconds; begin/restart reset the clock to this.
    pub round_secs: u32,
    /// Render every Kth pose sample. Deployments have shipped with both 1
    /// (render every frame) and 3, so this stays a parameter.
    pub decimation: u32,
    /// Scheduling tick of the pose sampler loop, in milliseconds.
    pub sample_interval_ms: u64,
    pub overlay: OverlayConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_secs: 15,
            decimation: 3,
            sample_interval_ms: 33,
            overlay: OverlayConfig::default(),
        }
    }
}

pub struct ConfigStore {
    path: PathBuf,
    data: RwLock<GameConfig>,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            GameConfig::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> GameConfig {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, config: GameConfig) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            *guard = config;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &GameConfig) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write config to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_values() {
        let config = GameConfig::default();
        assert_eq!(config.round_secs, 15);
        assert_eq!(config.decimation, 3);
        assert_eq!(config.overlay.confidence_threshold, 0.3);
        assert_eq!(config.overlay.anchor_size_px, 150);
        assert_eq!(config.overlay.anchor_y_offset_px, 150.0);
    }

    #[test]
    fn store_round_trips_through_disk() {
        let path = std::env::temp_dir().join(format!("posesort-{}.json", uuid::Uuid::new_v4()));

        let store = ConfigStore::new(path.clone()).unwrap();
        let mut config = store.get();
        config.decimation = 1;
        config.round_secs = 30;
        store.update(config).unwrap();

        let reloaded = ConfigStore::new(path.clone()).unwrap();
        assert_eq!(reloaded.get().decimation, 1);
        assert_eq!(reloaded.get().round_secs, 30);

        let _ = fs::remove_file(path);
    }
}
