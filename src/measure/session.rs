//! Drives measure tooltips from the events of a [`Draw`] interaction.
//!
//! Draw listeners only forward [`MeasureSignal`]s into a channel owned by
//! the session; [`MeasureSession::process`] applies them to the map, in the
//! order they were raised, once the input that caused them has been
//! dispatched. All state lives in the session, so every mounted map gets
//! its own.

use crate::{
    core::{geo::LatLng, map::Map},
    input::handler::ListenerKey,
    interactions::draw::Draw,
    layers::vector::{FeatureId, Geometry},
    measure::{format::format_length, tooltip},
    ui::overlay::OverlayId,
    Error, Result,
};
use crossbeam_channel::{unbounded, Receiver, Sender};

/// A draw event, as seen by the session
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureSignal {
    Start {
        feature_id: FeatureId,
        coordinate: LatLng,
    },
    GeometryChanged {
        feature_id: FeatureId,
        geometry: Geometry,
    },
    End {
        feature_id: FeatureId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Drawing(FeatureId),
    /// Listeners released; signals are dropped
    Detached,
}

pub struct MeasureSession {
    sender: Sender<MeasureSignal>,
    receiver: Receiver<MeasureSignal>,
    /// Draw start and draw end listeners
    draw_listeners: Vec<ListenerKey>,
    sketch: Option<FeatureId>,
    /// Geometry change listener of the current sketch
    change_listener: Option<ListenerKey>,
    anchor: Option<LatLng>,
    live_tooltip: Option<OverlayId>,
    static_tooltips: Vec<OverlayId>,
    attached: bool,
}

impl MeasureSession {
    /// Listens to the map's [`Draw`] interaction and arms the first live
    /// tooltip
    pub fn attach(map: &mut Map) -> Result<Self> {
        let (sender, receiver) = unbounded();

        let start_tx = sender.clone();
        let end_tx = sender.clone();
        let draw_listeners = map
            .with_interaction_mut(|draw: &mut Draw| {
                let start = draw.on_draw_start(move |event| {
                    let _ = start_tx.send(MeasureSignal::Start {
                        feature_id: event.feature_id,
                        coordinate: event.coordinate,
                    });
                });
                let end = draw.on_draw_end(move |event| {
                    let _ = end_tx.send(MeasureSignal::End {
                        feature_id: event.feature_id,
                    });
                });
                vec![start, end]
            })
            .ok_or_else(|| Error::Interaction("map has no draw interaction".to_string()))?;

        let mut session = Self {
            sender,
            receiver,
            draw_listeners,
            sketch: None,
            change_listener: None,
            anchor: None,
            live_tooltip: None,
            static_tooltips: Vec::new(),
            attached: true,
        };
        session.arm(map);
        Ok(session)
    }

    /// Applies every pending signal to `map`
    pub fn process(&mut self, map: &mut Map) {
        while let Ok(signal) = self.receiver.try_recv() {
            if !self.attached {
                continue;
            }
            match signal {
                MeasureSignal::Start {
                    feature_id,
                    coordinate,
                } => self.on_start(map, feature_id, coordinate),
                MeasureSignal::GeometryChanged {
                    feature_id,
                    geometry,
                } => self.on_geometry_change(map, feature_id, &geometry),
                MeasureSignal::End { feature_id } => self.on_end(map, feature_id),
            }
        }
    }

    fn on_start(&mut self, map: &mut Map, feature_id: FeatureId, coordinate: LatLng) {
        // A sketch aborted without an end event leaves its listener behind
        self.release_change_listener(map);

        self.sketch = Some(feature_id);
        self.anchor = Some(coordinate);

        let tx = self.sender.clone();
        self.change_listener = map
            .with_interaction_mut(|draw: &mut Draw| {
                draw.on_sketch_change(move |change| {
                    let _ = tx.send(MeasureSignal::GeometryChanged {
                        feature_id: change.feature_id,
                        geometry: change.geometry.clone(),
                    });
                })
            })
            .flatten();

        if self.change_listener.is_none() {
            log::warn!("sketch {feature_id:?} ended before its changes could be observed");
        }
        log::debug!("measuring sketch {feature_id:?}");
    }

    fn on_geometry_change(&mut self, map: &mut Map, feature_id: FeatureId, geometry: &Geometry) {
        if self.sketch != Some(feature_id) {
            return;
        }

        let Geometry::LineString(coords) = geometry else {
            return;
        };

        let label = format_length(coords);
        if let Some(last) = coords.last() {
            self.anchor = Some(*last);
        }

        let anchor = self.anchor;
        if let Some(overlay) = self.live_tooltip.and_then(|id| map.overlay_mut(id)) {
            overlay.set_text(label);
            overlay.set_position(anchor);
        }
    }

    fn on_end(&mut self, map: &mut Map, feature_id: FeatureId) {
        if self.sketch != Some(feature_id) {
            log::warn!("draw end for unknown sketch {feature_id:?}");
            return;
        }
        self.retire_and_arm(map);
        log::debug!(
            "sketch {feature_id:?} measured, {} static tooltips",
            self.static_tooltips.len()
        );
    }

    /// Freezes the live tooltip as a static annotation, forgets the sketch
    /// and its listener, and arms a fresh live tooltip
    pub fn retire_and_arm(&mut self, map: &mut Map) {
        if let Some(id) = self.live_tooltip.take() {
            if let Some(overlay) = map.overlay_mut(id) {
                tooltip::freeze(overlay);
                self.static_tooltips.push(id);
            }
        }

        self.sketch = None;
        self.anchor = None;
        self.release_change_listener(map);
        self.arm(map);
    }

    fn arm(&mut self, map: &mut Map) {
        self.live_tooltip = Some(map.add_overlay(tooltip::live_tooltip()));
    }

    fn release_change_listener(&mut self, map: &mut Map) {
        if let Some(key) = self.change_listener.take() {
            // The draw interaction drops a finished sketch's listeners itself
            let released = map
                .with_interaction_mut(|draw: &mut Draw| draw.un_by_key(key))
                .unwrap_or(false);
            log::debug!("sketch listener {key:?} released (still registered: {released})");
        }
    }

    /// Releases every listener and ignores any later signal. Safe to call
    /// more than once.
    pub fn detach(&mut self, map: &mut Map) {
        if !self.attached {
            return;
        }
        self.attached = false;

        self.release_change_listener(map);
        for key in self.draw_listeners.drain(..) {
            map.with_interaction_mut(|draw: &mut Draw| draw.un_by_key(key));
        }
        while self.receiver.try_recv().is_ok() {}
        self.sketch = None;
        self.anchor = None;
        log::debug!("measure session detached");
    }

    pub fn state(&self) -> SessionState {
        match (self.attached, self.sketch) {
            (false, _) => SessionState::Detached,
            (true, Some(id)) => SessionState::Drawing(id),
            (true, None) => SessionState::Idle,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn sketch(&self) -> Option<FeatureId> {
        self.sketch
    }

    pub fn anchor(&self) -> Option<LatLng> {
        self.anchor
    }

    pub fn has_change_listener(&self) -> bool {
        self.change_listener.is_some()
    }

    pub fn live_tooltip(&self) -> Option<OverlayId> {
        self.live_tooltip
    }

    pub fn static_tooltips(&self) -> &[OverlayId] {
        &self.static_tooltips
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{config::MapConfig, geo::Point},
        input::events::{InputEvent, MouseButton},
        layers::vector::VectorSource,
        measure::tooltip::TooltipState,
    };

    fn setup() -> (Map, MeasureSession) {
        let mut map = Map::from_config(&MapConfig::default()).unwrap();
        map.add_interaction(Box::new(Draw::line_string(VectorSource::new())));
        let session = MeasureSession::attach(&mut map).unwrap();
        (map, session)
    }

    fn send(map: &mut Map, session: &mut MeasureSession, input: InputEvent) {
        map.handle_input(input);
        session.process(map);
    }

    fn click(x: f64, y: f64) -> InputEvent {
        InputEvent::Click {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_attach_requires_draw() {
        let mut map = Map::from_config(&MapConfig::default()).unwrap();
        let err = MeasureSession::attach(&mut map).err().unwrap();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Interaction(_))));
    }

    #[test]
    fn test_start_subscribes_without_positioning() {
        let (mut map, mut session) = setup();
        let live = session.live_tooltip().unwrap();

        send(&mut map, &mut session, click(100.0, 100.0));

        assert!(matches!(session.state(), SessionState::Drawing(_)));
        assert!(session.has_change_listener());
        assert_eq!(session.live_tooltip(), Some(live));
        assert_eq!(map.overlay(live).unwrap().position(), None);
        assert!(session.anchor().is_some());
    }

    #[test]
    fn test_changes_update_live_tooltip() {
        let (mut map, mut session) = setup();
        send(&mut map, &mut session, click(100.0, 100.0));
        send(&mut map, &mut session, InputEvent::MouseMove { position: Point::new(300.0, 100.0) });

        let live = map.overlay(session.live_tooltip().unwrap()).unwrap();
        let cursor = map.viewport().pixel_to_lat_lng(&Point::new(300.0, 100.0));
        assert_eq!(live.position(), Some(cursor));
        assert!(live.text().ends_with(" km"), "label was {}", live.text());
    }

    #[test]
    fn test_end_retires_and_arms() {
        let (mut map, mut session) = setup();
        let first = session.live_tooltip().unwrap();

        send(&mut map, &mut session, click(100.0, 100.0));
        send(&mut map, &mut session, click(300.0, 100.0));
        send(&mut map, &mut session, InputEvent::DoubleClick { position: Point::new(300.0, 100.0) });

        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.has_change_listener());
        assert_eq!(session.static_tooltips(), &[first]);

        let frozen = map.overlay(first).unwrap();
        assert_eq!(TooltipState::of(frozen), Some(TooltipState::Static));
        assert_eq!(frozen.offset(), [0.0, -7.0]);

        let next = session.live_tooltip().unwrap();
        assert_ne!(next, first);
        assert_eq!(TooltipState::of(map.overlay(next).unwrap()), Some(TooltipState::Live));
        assert_eq!(map.overlay(next).unwrap().position(), None);
    }

    #[test]
    fn test_non_line_changes_are_ignored() {
        let (mut map, mut session) = setup();
        send(&mut map, &mut session, click(100.0, 100.0));
        let sketch = session.sketch().unwrap();
        let live = session.live_tooltip().unwrap();

        session
            .sender
            .send(MeasureSignal::GeometryChanged {
                feature_id: sketch,
                geometry: Geometry::Polygon(vec![LatLng::new(0.0, 0.0); 3]),
            })
            .unwrap();
        session.process(&mut map);

        assert_eq!(map.overlay(live).unwrap().text(), "");
        assert_eq!(map.overlay(live).unwrap().position(), None);
    }

    #[test]
    fn test_detach_is_idempotent_and_final() {
        let (mut map, mut session) = setup();
        send(&mut map, &mut session, click(100.0, 100.0));
        let live = session.live_tooltip().unwrap();

        session.detach(&mut map);
        session.detach(&mut map);
        assert_eq!(session.state(), SessionState::Detached);

        // The draw interaction keeps running, but nothing reaches the tooltips
        send(&mut map, &mut session, InputEvent::MouseMove { position: Point::new(200.0, 200.0) });
        send(&mut map, &mut session, InputEvent::DoubleClick { position: Point::new(200.0, 200.0) });

        assert_eq!(map.overlay(live).unwrap().text(), "");
        assert!(session.static_tooltips().is_empty());
    }
}
