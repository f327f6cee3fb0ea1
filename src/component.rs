//! The mounted measuring map: a base map, a line-drawing interaction and
//! live length tooltips, with an explicit teardown.

use crate::{
    core::{config::MapConfig, geo::Point, map::Map},
    input::events::{EventHandled, InputEvent},
    interactions::draw::{Draw, DrawOptions, DrawType},
    layers::vector::{VectorLayer, VectorSource},
    measure::session::MeasureSession,
    rendering::context::RenderContext,
    ui::overlay::Overlay,
    Result,
};

/// Id of the layer that shows finished measurements
pub const MEASURE_LAYER_ID: &str = "measure";

pub struct MeasureMap {
    map: Map,
    session: MeasureSession,
    source: VectorSource,
    mounted: bool,
}

impl MeasureMap {
    /// Builds the map described by `config` and starts measuring
    pub fn mount(config: &MapConfig) -> Result<Self> {
        let mut map = Map::from_config(config)?;
        let source = VectorSource::new();

        map.add_layer(Box::new(
            VectorLayer::new(MEASURE_LAYER_ID.to_string(), source.clone())
                .with_style(config.sketch_style.clone()),
        ))?;
        map.add_interaction(Box::new(Draw::new(
            source.clone(),
            DrawOptions {
                draw_type: DrawType::LineString,
                snap_tolerance_px: config.draw.snap_tolerance_px,
                style: config.sketch_style.clone(),
            },
        )));
        let session = MeasureSession::attach(&mut map)?;

        log::info!(
            "measure map mounted on '{}' at {:?}, zoom {}",
            config.target.id,
            config.view.center(),
            config.view.zoom
        );
        Ok(Self {
            map,
            session,
            source,
            mounted: true,
        })
    }

    /// Mounts with the stock configuration
    pub fn mount_default() -> Result<Self> {
        Self::mount(&MapConfig::default())
    }

    /// Dispatches one input and applies the measure events it raised.
    /// Does nothing once unmounted.
    pub fn handle_input(&mut self, input: InputEvent) -> EventHandled {
        if !self.mounted {
            return EventHandled::NotHandled;
        }
        let handled = self.map.handle_input(input);
        self.session.process(&mut self.map);
        handled
    }

    /// Queues the current frame. Returns `false`, queueing nothing, once
    /// unmounted.
    pub fn render(&mut self, context: &mut RenderContext) -> Result<bool> {
        if !self.mounted {
            context.begin_frame();
            return Ok(false);
        }
        self.map.render(context)
    }

    pub fn set_size(&mut self, size: Point) {
        self.map.set_size(size);
    }

    /// Detaches the map from its target and releases every listener.
    /// Idempotent; also runs on drop.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.session.detach(&mut self.map);
        self.map.set_target(None);
        log::info!("measure map unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn session(&self) -> &MeasureSession {
        &self.session
    }

    /// Finished measurements
    pub fn source(&self) -> &VectorSource {
        &self.source
    }

    pub fn live_tooltip(&self) -> Option<&Overlay> {
        self.session
            .live_tooltip()
            .and_then(|id| self.map.overlay(id))
    }

    pub fn static_tooltips(&self) -> Vec<&Overlay> {
        self.session
            .static_tooltips()
            .iter()
            .filter_map(|id| self.map.overlay(*id))
            .collect()
    }

    pub fn attribution(&self) -> String {
        self.map.attributions().join(" | ")
    }
}

impl Drop for MeasureMap {
    fn drop(&mut self) {
        self.unmount();
    }
}
