use crate::{
    core::viewport::Viewport, layers::base::LayerTrait, prelude::HashMap,
    rendering::context::RenderContext, Error, Result,
};

/// Layers of a map keyed by id, drawn bottom to top by z-index. Layers
/// sharing a z-index keep their insertion order.
#[derive(Default)]
pub struct LayerManager {
    layers: HashMap<String, Box<dyn LayerTrait>>,
    order: Vec<(i32, String)>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let id = layer.id().to_string();
        if self.layers.contains_key(&id) {
            return Err(Error::Layer(format!("layer '{id}' already exists")).into());
        }

        let z_index = layer.z_index();
        let slot = self.order.partition_point(|(z, _)| *z <= z_index);
        self.order.insert(slot, (z_index, id.clone()));
        self.layers.insert(id, layer);
        Ok(())
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        let layer = self.layers.remove(layer_id)?;
        self.order.retain(|(_, id)| id != layer_id);
        Some(layer)
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layers.get(layer_id).map(|l| l.as_ref())
    }

    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layers.get_mut(layer_id).map(|layer| f(layer.as_mut()))
    }

    /// Layer ids, bottom first
    pub fn list_layers(&self) -> Vec<String> {
        self.order.iter().map(|(_, id)| id.clone()).collect()
    }

    /// Queues every visible layer, bottom first
    pub fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        for (_, id) in &self.order {
            match self.layers.get_mut(id) {
                Some(layer) if layer.is_visible() => layer.render(context, viewport)?,
                _ => {}
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{tile::TileLayer, vector::{VectorLayer, VectorSource}};

    #[test]
    fn test_vector_layers_render_above_tiles() {
        let mut manager = LayerManager::new();
        manager
            .add_layer(Box::new(VectorLayer::new("sketch".into(), VectorSource::new())))
            .unwrap();
        manager.add_layer(Box::new(TileLayer::openstreetmap())).unwrap();

        assert_eq!(manager.list_layers(), vec!["osm".to_string(), "sketch".to_string()]);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut manager = LayerManager::new();
        manager.add_layer(Box::new(TileLayer::openstreetmap())).unwrap();
        assert!(manager.add_layer(Box::new(TileLayer::openstreetmap())).is_err());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_equal_z_index_keeps_insertion_order() {
        let mut manager = LayerManager::new();
        for id in ["a", "b", "c"] {
            manager
                .add_layer(Box::new(VectorLayer::new(id.into(), VectorSource::new())))
                .unwrap();
        }
        assert_eq!(manager.list_layers(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_remove_layer() {
        let mut manager = LayerManager::new();
        manager.add_layer(Box::new(TileLayer::openstreetmap())).unwrap();

        assert!(manager.remove_layer("osm").is_some());
        assert!(manager.remove_layer("osm").is_none());
        assert!(manager.is_empty());
        assert!(manager.list_layers().is_empty());
    }
}
