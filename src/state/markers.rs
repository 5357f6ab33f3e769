use crate::config::HintPolicy;
use crate::model::{GeoBounds, GeoPoint, Location};

/// The parts of the third-party map widget the popup drives.
pub trait MapWidget {
    /// Removes every marker held by the clusterer.
    fn clear_markers(&mut self);
    fn add_marker(&mut self, point: GeoPoint, hint: Option<&str>, cluster_hint: &str);
    /// Highest zoom level at which `bounds` still fits the viewport.
    fn bounds_zoom_level(&self, bounds: &GeoBounds) -> u32;
    /// Recenters in the hybrid view (satellite imagery with labels).
    fn set_center(&mut self, center: GeoPoint, zoom: u32);
}

/// Marker display surface of the map popup.
///
/// Holds no widget when the browser failed the capability check, in which case
/// every display request is ignored.
pub struct MarkerSurface<W: MapWidget> {
    widget: Option<W>,
    max_zoom: u32,
    hint_policy: HintPolicy,
    cluster_hint: String,
}

impl<W: MapWidget> MarkerSurface<W> {
    pub fn new(widget: Option<W>, max_zoom: u32, hint_policy: HintPolicy, cluster_hint: impl Into<String>) -> Self {
        Self {
            widget,
            max_zoom,
            hint_policy,
            cluster_hint: cluster_hint.into(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.widget.is_some()
    }

    pub fn widget(&self) -> Option<&W> {
        self.widget.as_ref()
    }

    /// Replaces all markers with `locations` and recenters on them.
    /// Returns the number of markers placed.
    pub fn replace_markers(&mut self, locations: &[Location]) -> usize {
        let Some(widget) = self.widget.as_mut() else {
            return 0;
        };
        widget.clear_markers();

        let mut bounds = GeoBounds::default();
        let mut carried: Option<&str> = None;
        for loc in locations {
            let point = loc.point();
            bounds.extend(point);
            let own = (!loc.label.is_empty()).then_some(loc.label.as_str());
            let hint = match self.hint_policy {
                HintPolicy::CarryForward => {
                    if own.is_some() {
                        carried = own;
                    }
                    carried
                }
                HintPolicy::PerMarker => own,
            };
            widget.add_marker(point, hint, &self.cluster_hint);
        }

        let Some(center) = bounds.center() else {
            return 0;
        };
        let zoom = widget.bounds_zoom_level(&bounds).min(self.max_zoom);
        widget.set_center(center, zoom);
        log::debug!("placed {} markers at zoom {}", locations.len(), zoom);
        locations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[derive(Default)]
    struct FakeWidget {
        markers: Vec<(GeoPoint, Option<String>)>,
        fit_zoom: u32,
        centered: Vec<(GeoPoint, u32)>,
        clears: usize,
    }

    impl MapWidget for FakeWidget {
        fn clear_markers(&mut self) {
            self.clears += 1;
            self.markers.clear();
        }

        fn add_marker(&mut self, point: GeoPoint, hint: Option<&str>, _cluster_hint: &str) {
            self.markers.push((point, hint.map(str::to_string)));
        }

        fn bounds_zoom_level(&self, _bounds: &GeoBounds) -> u32 {
            self.fit_zoom
        }

        fn set_center(&mut self, center: GeoPoint, zoom: u32) {
            self.centered.push((center, zoom));
        }
    }

    fn surface(policy: HintPolicy, fit_zoom: u32) -> MarkerSurface<FakeWidget> {
        let widget = FakeWidget {
            fit_zoom,
            ..Default::default()
        };
        MarkerSurface::new(Some(widget), 5, policy, "Zoom in to see these ")
    }

    fn hints(s: &MarkerSurface<FakeWidget>) -> Vec<Option<String>> {
        s.widget().unwrap().markers.iter().map(|(_, h)| h.clone()).collect()
    }

    #[test]
    fn uninitialized_surface_ignores_requests() {
        let mut s: MarkerSurface<FakeWidget> = MarkerSurface::new(None, 5, HintPolicy::CarryForward, "");
        assert!(!s.is_initialized());
        assert_eq!(s.replace_markers(&[Location::new(1.0, 2.0, "x")]), 0);
    }

    #[test]
    fn second_call_replaces_first() {
        let mut s = surface(HintPolicy::CarryForward, 3);
        s.replace_markers(&[
            Location::new(1.0, 1.0, "a"),
            Location::new(2.0, 2.0, "b"),
            Location::new(3.0, 3.0, "c"),
        ]);
        s.replace_markers(&[Location::new(4.0, 4.0, "d")]);
        let w = s.widget().unwrap();
        assert_eq!(w.markers.len(), 1);
        assert_eq!(w.clears, 2);
    }

    #[test]
    fn carry_forward_reuses_last_non_empty_label() {
        let mut s = surface(HintPolicy::CarryForward, 3);
        s.replace_markers(&[
            Location::new(0.0, 0.0, ""),
            Location::new(1.0, 1.0, "Berlin"),
            Location::new(2.0, 2.0, ""),
            Location::new(3.0, 3.0, "Paris"),
            Location::new(4.0, 4.0, ""),
        ]);
        assert_eq!(
            hints(&s),
            vec![
                None,
                Some("Berlin".to_string()),
                Some("Berlin".to_string()),
                Some("Paris".to_string()),
                Some("Paris".to_string()),
            ]
        );
    }

    #[test]
    fn carried_hint_does_not_leak_into_next_call() {
        let mut s = surface(HintPolicy::CarryForward, 3);
        s.replace_markers(&[Location::new(1.0, 1.0, "Berlin")]);
        s.replace_markers(&[Location::new(2.0, 2.0, "")]);
        assert_eq!(hints(&s), vec![None]);
    }

    #[test]
    fn per_marker_leaves_empty_labels_bare() {
        let mut s = surface(HintPolicy::PerMarker, 3);
        s.replace_markers(&[Location::new(1.0, 1.0, "Berlin"), Location::new(2.0, 2.0, "")]);
        assert_eq!(hints(&s), vec![Some("Berlin".to_string()), None]);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(4, 4)]
    #[case(5, 5)]
    #[case(6, 5)]
    #[case(17, 5)]
    fn zoom_never_exceeds_maximum(#[case] fit: u32, #[case] expected: u32) {
        let mut s = surface(HintPolicy::CarryForward, fit);
        s.replace_markers(&[Location::new(8.0, 49.0, "x")]);
        let (_, zoom) = s.widget().unwrap().centered[0];
        assert_eq!(zoom, expected);
    }

    #[test]
    fn recenters_on_bounds_midpoint() {
        let mut s = surface(HintPolicy::CarryForward, 2);
        s.replace_markers(&[Location::new(-10.0, 40.0, "a"), Location::new(30.0, 60.0, "b")]);
        let (center, _) = s.widget().unwrap().centered[0];
        assert_eq!(center, GeoPoint { lat: 50.0, lng: 10.0 });
    }

    #[test]
    fn empty_batch_clears_without_recentering() {
        let mut s = surface(HintPolicy::CarryForward, 2);
        s.replace_markers(&[Location::new(1.0, 1.0, "a")]);
        assert_eq!(s.replace_markers(&[]), 0);
        let w = s.widget().unwrap();
        assert!(w.markers.is_empty());
        assert_eq!(w.centered.len(), 1);
    }
}
