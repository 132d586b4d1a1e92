//! Scenario file loading.

use std::{fs, io, path::Path};

use bw4t_system_layout::LayoutConfig;
use thiserror::Error;

/// Errors that can occur while loading a scenario file.
#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    /// The scenario file could not be read.
    #[error("could not read scenario file: {0}")]
    Io(#[from] io::Error),
    /// The scenario file is not valid TOML for a layout configuration.
    #[error("could not parse scenario file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads a layout configuration from the TOML file at the provided path.
///
/// Missing keys fall back to the built-in default scenario values.
pub(crate) fn load(path: &Path) -> Result<LayoutConfig, ScenarioError> {
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bw4t_core::{BlockColor, BlockShape};

    #[test]
    fn partial_scenario_files_fall_back_to_defaults() {
        let config: LayoutConfig = toml::from_str(
            r##"
            room_count = 6
            rooms_per_row = 3
            blocks_needed = 4
            block_colors = ["#0008ff", "#ff1500"]
            seed = 7
            "##,
        )
        .expect("scenario parses");

        assert_eq!(config.room_count, 6);
        assert_eq!(config.blocks_needed, 4);
        assert_eq!(config.seed, 7);
        assert_eq!(
            config.block_colors,
            vec![
                BlockColor::from_rgb(0x00, 0x08, 0xff),
                BlockColor::from_rgb(0xff, 0x15, 0x00),
            ],
        );
        // Untouched keys keep the classic defaults.
        assert_eq!(config.room_width, 5);
        assert_eq!(config.block_shapes, vec![BlockShape::new(0)]);
    }

    #[test]
    fn malformed_scenario_files_are_rejected() {
        let result: Result<LayoutConfig, _> = toml::from_str("room_count = \"many\"");
        assert!(result.is_err());
    }
}
