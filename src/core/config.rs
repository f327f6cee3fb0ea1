//! Configuration for the measuring map
//!
//! Every section has defaults matching the stock component (Melbourne at
//! zoom 10, OpenStreetMap tiles, a 100% × 500 px container), so a config
//! file only needs to name what it changes.

use crate::{
    core::{
        constants::{
            DEFAULT_CENTER_LON_LAT, DEFAULT_CONTAINER_HEIGHT_PX, DEFAULT_SNAP_TOLERANCE_PX,
            DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM,
        },
        geo::LatLng,
        map::{Dimension, MapTarget},
    },
    layers::{tile::TileLayerOptions, vector::VectorStyle},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Initial camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// `[lon, lat]`
    pub center_lon_lat: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center_lon_lat: DEFAULT_CENTER_LON_LAT,
            zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl ViewConfig {
    pub fn center(&self) -> LatLng {
        LatLng::from_lon_lat(self.center_lon_lat)
    }
}

/// Container the map is mounted into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub id: String,
    pub width: Dimension,
    pub height: Dimension,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            id: "map".to_string(),
            width: Dimension::Percent(100.0),
            height: Dimension::Px(DEFAULT_CONTAINER_HEIGHT_PX),
        }
    }
}

impl TargetConfig {
    pub fn to_target(&self) -> MapTarget {
        MapTarget::new(self.id.clone(), self.width, self.height)
    }
}

/// Draw interaction tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Pixel distance within which clicking the last vertex finishes the sketch
    pub snap_tolerance_px: f64,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            snap_tolerance_px: DEFAULT_SNAP_TOLERANCE_PX,
        }
    }
}

/// Top-level configuration of a measuring map
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub view: ViewConfig,
    pub target: TargetConfig,
    pub tiles: TileLayerOptions,
    pub draw: DrawConfig,
    pub sketch_style: VectorStyle,
}

impl MapConfig {
    /// Parses and validates a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(json).map_err(Error::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(Error::from)?;
        Self::from_json_str(&json)
    }

    /// Checks value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let center = self.view.center();
        if !center.is_valid() {
            return Err(Error::InvalidCoordinates(format!(
                "view center {:?} is outside lon/lat range",
                self.view.center_lon_lat
            ))
            .into());
        }

        if !(self.view.min_zoom <= self.view.max_zoom) {
            return Err(Error::InvalidConfig(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.view.min_zoom, self.view.max_zoom
            ))
            .into());
        }

        if !(self.view.min_zoom..=self.view.max_zoom).contains(&self.view.zoom) {
            return Err(Error::InvalidConfig(format!(
                "zoom {} is outside [{}, {}]",
                self.view.zoom, self.view.min_zoom, self.view.max_zoom
            ))
            .into());
        }

        if !self.tiles.url_template.contains("{z}")
            || !self.tiles.url_template.contains("{x}")
            || !self.tiles.url_template.contains("{y}")
        {
            return Err(Error::InvalidConfig(format!(
                "tile url template '{}' must contain {{z}}, {{x}} and {{y}}",
                self.tiles.url_template
            ))
            .into());
        }

        if self.tiles.url_template.contains("{s}") && self.tiles.subdomains.is_empty() {
            return Err(
                Error::InvalidConfig("tile url uses {s} but no subdomains are set".into()).into(),
            );
        }

        if !(self.draw.snap_tolerance_px >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "snap tolerance {} must be a non-negative number",
                self.draw.snap_tolerance_px
            ))
            .into());
        }

        for dimension in [self.target.width, self.target.height] {
            if !dimension.is_valid() {
                return Err(Error::InvalidConfig(format!(
                    "container dimension {dimension:?} must be positive"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.view.center(), LatLng::new(-37.8136, 144.9631));
        assert_eq!(config.view.zoom, 10.0);
        assert_eq!(config.target.height, Dimension::Px(500.0));
        assert_eq!(config.target.width, Dimension::Percent(100.0));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            MapConfig::from_json_str(r#"{ "view": { "center_lon_lat": [2.3522, 48.8566] } }"#)
                .unwrap();
        assert_eq!(config.view.center(), LatLng::new(48.8566, 2.3522));
        assert_eq!(config.view.zoom, 10.0);
        assert_eq!(config.draw.snap_tolerance_px, 12.0);
    }

    #[test]
    fn test_dimension_json_shape() {
        let config = MapConfig::from_json_str(
            r#"{ "target": { "id": "measure", "width": { "px": 640.0 }, "height": { "percent": 50.0 } } }"#,
        )
        .unwrap();
        assert_eq!(config.target.width, Dimension::Px(640.0));
        assert_eq!(config.target.height, Dimension::Percent(50.0));
    }

    #[test]
    fn test_rejects_out_of_range_center() {
        let err = MapConfig::from_json_str(r#"{ "view": { "center_lon_lat": [200.0, 0.0] } }"#)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_rejects_bad_template() {
        let err = MapConfig::from_json_str(
            r#"{ "tiles": { "url_template": "https://tiles.example.com/{z}/{x}.png" } }"#,
        )
        .unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = MapConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::Serialization(_))
        ));
    }
}
