use crate::domain::model::LayerInfo;

/// Every overlay is drawn semi-transparent over the base map.
pub const OVERLAY_OPACITY: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub name: String,
    pub url: String,
    pub opacity: f32,
}

impl From<LayerInfo> for Overlay {
    fn from(layer: LayerInfo) -> Self {
        Self {
            name: layer.name,
            url: layer.url,
            opacity: OVERLAY_OPACITY,
        }
    }
}

/// Sole owner of the map's overlay set, keyed by layer name and kept in drawing order
/// (first is bottom-most). Mutation goes through `add` and `clear` only.
#[derive(Debug, Default)]
pub struct OverlayManager {
    overlays: Vec<Overlay>,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `layer` on top. A layer already shown under the same name is taken off first.
    pub fn add(&mut self, layer: LayerInfo) {
        self.overlays.retain(|o| o.name != layer.name);
        self.overlays.push(Overlay::from(layer));
    }

    /// Removes every overlay; returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.overlays.len();
        self.overlays.clear();
        removed
    }

    pub fn replace_all(&mut self, layers: Vec<LayerInfo>) {
        let removed = self.clear();
        tracing::debug!("Cleared {} overlays, adding {}", removed, layers.len());
        for layer in layers {
            self.add(layer);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.name == name)
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn names(&self) -> Vec<&str> {
        self.overlays.iter().map(|o| o.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
}
