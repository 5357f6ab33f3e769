//! Core data models shared by the search page and the map popup.
//! Locations travel between the two windows as JSON-encoded [`PopupMessage`]s.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
    /// Marker hint; empty means "no hint of its own".
    #[serde(default)]
    pub label: String,
}

impl Location {
    pub fn new(longitude: f64, latitude: f64, label: impl Into<String>) -> Self {
        Self {
            longitude,
            latitude,
            label: label.into(),
        }
    }

    /// Adapter for the legacy three-array call surface.
    ///
    /// Entries are paired by index and the result is as long as the shorter of
    /// the coordinate arrays. A missing label slot becomes the empty label.
    pub fn from_parallel(longitudes: &[f64], latitudes: &[f64], labels: &[String]) -> Vec<Location> {
        longitudes
            .iter()
            .zip(latitudes)
            .enumerate()
            .map(|(i, (&lng, &lat))| Location::new(lng, lat, labels.get(i).cloned().unwrap_or_default()))
            .collect()
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.latitude,
            lng: self.longitude,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Smallest lat/lng rectangle covering every point added so far.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoBounds {
    extent: Option<(GeoPoint, GeoPoint)>,
}

impl GeoBounds {
    pub fn extend(&mut self, p: GeoPoint) {
        self.extent = Some(match self.extent {
            None => (p, p),
            Some((sw, ne)) => (
                GeoPoint {
                    lat: sw.lat.min(p.lat),
                    lng: sw.lng.min(p.lng),
                },
                GeoPoint {
                    lat: ne.lat.max(p.lat),
                    lng: ne.lng.max(p.lng),
                },
            ),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    pub fn south_west(&self) -> Option<GeoPoint> {
        self.extent.map(|(sw, _)| sw)
    }

    pub fn north_east(&self) -> Option<GeoPoint> {
        self.extent.map(|(_, ne)| ne)
    }

    pub fn center(&self) -> Option<GeoPoint> {
        self.extent.map(|(sw, ne)| GeoPoint {
            lat: (sw.lat + ne.lat) * 0.5,
            lng: (sw.lng + ne.lng) * 0.5,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
        }
    }
}

/// Messages exchanged between the search page and the map popup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PopupMessage {
    /// Popup -> opener: the map finished initializing.
    Ready,
    /// Opener -> popup: replace every marker with these locations.
    ShowMarkers { locations: Vec<Location> },
}

impl PopupMessage {
    pub fn to_json(&self) -> Result<String, crate::error::GlueError> {
        serde_json::to_string(self).map_err(crate::error::GlueError::Message)
    }

    pub fn from_json(raw: &str) -> Result<Self, crate::error::GlueError> {
        serde_json::from_str(raw).map_err(crate::error::GlueError::Message)
    }
}
