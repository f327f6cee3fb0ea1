//! Base imagery layer.
//!
//! The layer only decides *which* tiles cover the view and *where* they go;
//! fetching and decoding the images is left to the UI toolkit's image
//! loader, which receives the tile URL.

use crate::{
    core::{geo::TileCoord, viewport::Viewport},
    layers::base::{impl_layer_properties, LayerProperties, LayerTrait, LayerType},
    rendering::context::RenderContext,
    Result,
};
use serde::{Deserialize, Serialize};

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;

    /// Attribution text that must be displayed with the imagery
    fn attribution(&self) -> &str {
        ""
    }

    /// Highest zoom level the source serves
    fn max_zoom(&self) -> u8 {
        19
    }
}

/// Options for a URL-template tile source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayerOptions {
    /// Template with `{z}`, `{x}`, `{y}` and optionally `{s}` placeholders
    pub url_template: String,
    pub subdomains: Vec<String>,
    pub attribution: String,
    pub max_zoom: u8,
    pub opacity: f32,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            attribution: "© OpenStreetMap contributors".to_string(),
            max_zoom: 19,
            opacity: 1.0,
        }
    }
}

/// Tile source driven by a URL template
pub struct UrlTemplateSource {
    options: TileLayerOptions,
}

impl UrlTemplateSource {
    pub fn new(options: TileLayerOptions) -> Self {
        Self { options }
    }

    /// The public OpenStreetMap tile servers
    pub fn openstreetmap() -> Self {
        Self::new(TileLayerOptions::default())
    }
}

impl TileSource for UrlTemplateSource {
    fn url(&self, coord: TileCoord) -> String {
        let mut url = self
            .options
            .url_template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string());

        if !self.options.subdomains.is_empty() {
            let idx = ((coord.x + coord.y) % self.options.subdomains.len() as u32) as usize;
            url = url.replace("{s}", &self.options.subdomains[idx]);
        }
        url
    }

    fn attribution(&self) -> &str {
        &self.options.attribution
    }

    fn max_zoom(&self) -> u8 {
        self.options.max_zoom
    }
}

/// Raster base layer
pub struct TileLayer {
    properties: LayerProperties,
    source: Box<dyn TileSource>,
}

impl TileLayer {
    pub fn new(id: String, name: String, source: Box<dyn TileSource>) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Tile),
            source,
        }
    }

    pub fn from_options(id: String, options: TileLayerOptions) -> Self {
        let opacity = options.opacity;
        let mut layer = Self::new(
            id,
            "Base imagery".to_string(),
            Box::new(UrlTemplateSource::new(options)),
        );
        layer.properties.set_opacity(opacity);
        layer
    }

    pub fn openstreetmap() -> Self {
        Self::new(
            "osm".to_string(),
            "OpenStreetMap".to_string(),
            Box::new(UrlTemplateSource::openstreetmap()),
        )
    }

    pub fn source(&self) -> &dyn TileSource {
        self.source.as_ref()
    }
}

impl LayerTrait for TileLayer {
    impl_layer_properties!();

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let tile_zoom = viewport.tile_zoom(self.source.max_zoom());
        let tiles = viewport.visible_tiles(tile_zoom);
        log::trace!("tile layer '{}': {} tiles at z{}", self.properties.id, tiles.len(), tile_zoom);

        for tile in tiles {
            let url = self.source.url(tile.coord);
            context.render_tile(tile.coord, url, tile.bounds, self.properties.opacity)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::{LatLng, Point};
    use crate::rendering::context::DrawCommand;

    #[test]
    fn test_osm_url_rotates_subdomains() {
        let source = UrlTemplateSource::openstreetmap();
        assert_eq!(
            source.url(TileCoord::new(1, 2, 3)),
            "https://a.tile.openstreetmap.org/3/1/2.png"
        );
        assert_eq!(
            source.url(TileCoord::new(2, 2, 3)),
            "https://b.tile.openstreetmap.org/3/2/2.png"
        );
    }

    #[test]
    fn test_template_without_subdomains() {
        let source = UrlTemplateSource::new(TileLayerOptions {
            url_template: "https://tiles.example.com/{z}/{x}/{y}.png".to_string(),
            subdomains: vec![],
            ..Default::default()
        });
        assert_eq!(
            source.url(TileCoord::new(5, 6, 7)),
            "https://tiles.example.com/7/5/6.png"
        );
    }

    #[test]
    fn test_render_queues_visible_tiles() {
        let mut layer = TileLayer::openstreetmap();
        let viewport = Viewport::new(LatLng::new(-37.8136, 144.9631), 10.0, Point::new(800.0, 500.0));
        let mut context = RenderContext::new(800, 500);

        layer.render(&mut context, &viewport).unwrap();

        let queue = context.drawing_queue();
        assert!(!queue.is_empty());
        assert!(queue.iter().all(|cmd| matches!(
            cmd,
            DrawCommand::Tile { url, coord, .. } if coord.z == 10 && url.ends_with(".png")
        )));
    }
}
