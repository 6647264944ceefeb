#[cfg(test)]
#[path = "map_test.rs"]
mod map_test;

use crate::net::types::Coordinates;

/// Zoom used when flying to a single site.
pub const FLY_TO_ZOOM: f64 = 13.0;

/// Map viewport. Defaults to the Oahu regional view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
}

impl Default for MapViewState {
    fn default() -> Self {
        Self { longitude: -157.9, latitude: 21.5, zoom: 9.0 }
    }
}

impl MapViewState {
    /// Viewport centred on `coordinates` at [`FLY_TO_ZOOM`].
    #[must_use]
    pub fn centered_on(coordinates: Coordinates) -> Self {
        Self { longitude: coordinates.longitude, latitude: coordinates.latitude, zoom: FLY_TO_ZOOM }
    }

    /// Overwrite only the fields the patch names.
    pub fn apply(&mut self, patch: MapViewPatch) {
        if let Some(longitude) = patch.longitude {
            self.longitude = longitude;
        }
        if let Some(latitude) = patch.latitude {
            self.latitude = latitude;
        }
        if let Some(zoom) = patch.zoom {
            self.zoom = zoom;
        }
    }
}

/// Partial viewport update, e.g. from a manual pan or zoom.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MapViewPatch {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub zoom: Option<f64>,
}
