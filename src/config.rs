use crate::error::GlueError;
use serde::Deserialize;

/// How an empty label is treated while placing a batch of markers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HintPolicy {
    /// An empty label reuses the last non-empty label seen earlier in the same batch.
    #[default]
    CarryForward,
    /// An empty label leaves the marker without a hint.
    PerMarker,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WindowFeatures {
    pub width: u32,
    pub height: u32,
    pub top: u32,
    pub left: u32,
    pub resizable: bool,
    pub scrollbars: bool,
}

impl Default for WindowFeatures {
    fn default() -> Self {
        Self {
            width: 550,
            height: 350,
            top: 100,
            left: 100,
            resizable: true,
            scrollbars: true,
        }
    }
}

impl WindowFeatures {
    pub fn to_feature_string(&self) -> String {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        format!(
            "width={},height={},top={},left={},resizable={},scrollbars={}",
            self.width,
            self.height,
            self.top,
            self.left,
            yes_no(self.resizable),
            yes_no(self.scrollbars)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PopupConfig {
    pub base_path: String,
    pub document: String,
    pub window_name: String,
    pub features: WindowFeatures,
    pub max_zoom: u32,
    pub hint_policy: HintPolicy,
    pub cluster_hint: String,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            document: "GMapWindow.html".to_string(),
            window_name: "GoogleMap".to_string(),
            features: WindowFeatures::default(),
            max_zoom: 5,
            hint_policy: HintPolicy::default(),
            cluster_hint: "Zoom in to see these ".to_string(),
        }
    }
}

impl PopupConfig {
    pub fn from_json(raw: &str) -> Result<Self, GlueError> {
        serde_json::from_str(raw).map_err(GlueError::Config)
    }

    /// Popup document location, joined to the base path without normalization.
    pub fn document_url(&self) -> String {
        format!("{}/{}", self.base_path, self.document)
    }
}

/// DOM names the search form synchronizer looks up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchFormConfig {
    pub form_name: String,
    pub primary_field: String,
    pub secondary_field: String,
    pub min_size_field: String,
    pub label_name: String,
    pub label_prefix: String,
    pub not_applicable: String,
}

impl Default for SearchFormConfig {
    fn default() -> Self {
        Self {
            form_name: "srsSearchForm".to_string(),
            primary_field: "indexName".to_string(),
            secondary_field: "subIndexName".to_string(),
            min_size_field: "minSubResultSize".to_string(),
            label_name: "brLabelminSubResultSize".to_string(),
            label_prefix: "Min ".to_string(),
            not_applicable: "<Not Available>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_describe_the_550_by_350_popup() {
        let cfg = PopupConfig::default();
        assert_eq!(cfg.document_url(), "/GMapWindow.html");
        assert_eq!(
            cfg.features.to_feature_string(),
            "width=550,height=350,top=100,left=100,resizable=yes,scrollbars=yes"
        );
        assert_eq!(cfg.max_zoom, 5);
        assert_eq!(cfg.hint_policy, HintPolicy::CarryForward);
    }

    #[test]
    fn empty_json_yields_defaults() {
        assert_eq!(PopupConfig::from_json("{}").unwrap(), PopupConfig::default());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let cfg = PopupConfig::from_json(
            r#"{"basePath":"srs/maps","maxZoom":7,"hintPolicy":"perMarker","features":{"width":800}}"#,
        )
        .unwrap();
        assert_eq!(cfg.document_url(), "srs/maps/GMapWindow.html");
        assert_eq!(cfg.max_zoom, 7);
        assert_eq!(cfg.hint_policy, HintPolicy::PerMarker);
        assert_eq!(cfg.features.width, 800);
        assert_eq!(cfg.features.height, 350);
        assert_eq!(cfg.window_name, "GoogleMap");
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(PopupConfig::from_json("{"), Err(GlueError::Config(_))));
    }
}
