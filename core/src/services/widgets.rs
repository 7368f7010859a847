//! Widget operations.

use crate::error::PodioError;
use crate::http::Transport;
use crate::models::{RefType, Widget, WidgetCreate, WidgetCreated, WidgetUpdate};

use super::{expect_json, expect_no_content, to_json_body};

/// Widget endpoints over an injected transport.
#[derive(Debug)]
pub struct WidgetService<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> WidgetService<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Fetch a single widget.
    pub fn get(&self, widget_id: u64) -> Result<Widget, PodioError> {
        expect_json(self.transport.get(&format!("/widget/{widget_id}"))?, 200)
    }

    /// Create a widget on the given reference.
    pub fn create(
        &self,
        ref_type: RefType,
        ref_id: u64,
        widget: &WidgetCreate,
    ) -> Result<WidgetCreated, PodioError> {
        let body = to_json_body(widget)?;
        let response = self
            .transport
            .post(&format!("/widget/{ref_type}/{ref_id}/"), Some(body))?;
        expect_json(response, 200)
    }

    /// Update a widget's title or configuration.
    pub fn update(&self, widget_id: u64, update: &WidgetUpdate) -> Result<(), PodioError> {
        let body = to_json_body(update)?;
        expect_no_content(
            self.transport
                .put(&format!("/widget/{widget_id}"), Some(body))?,
        )
    }

    /// Delete a widget.
    pub fn delete(&self, widget_id: u64) -> Result<(), PodioError> {
        expect_no_content(self.transport.delete(&format!("/widget/{widget_id}"))?)
    }

    /// All widgets on the given reference, in display order.
    pub fn for_reference(&self, ref_type: RefType, ref_id: u64) -> Result<Vec<Widget>, PodioError> {
        expect_json(
            self.transport
                .get(&format!("/widget/{ref_type}/{ref_id}/display/"))?,
            200,
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::mock::MockTransport;

    #[test]
    fn create_posts_widget_payload() {
        let transport = MockTransport::returning(200, r#"{"widget_id":12}"#);
        let mut config = serde_json::Map::new();
        config.insert("text".to_string(), json!("Welcome"));
        let widget = WidgetCreate {
            kind: "text".to_string(),
            title: Some("Intro".to_string()),
            config: Some(config),
        };
        let created = WidgetService::new(&transport)
            .create(RefType::Space, 77, &widget)
            .unwrap();
        assert_eq!(created.widget_id, 12);

        let request = transport.last_request();
        assert_eq!(request.path, "/widget/space/77/");
        let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({ "type": "text", "title": "Intro", "config": { "text": "Welcome" } })
        );
    }

    #[test]
    fn get_parses_generic_config() {
        let transport = MockTransport::returning(
            200,
            r#"{"widget_id":12,"type":"text","config":{"text":"Welcome"}}"#,
        );
        let widget = WidgetService::new(&transport).get(12).unwrap();
        assert_eq!(widget.kind, "text");
        assert_eq!(widget.config["text"], json!("Welcome"));
        assert_eq!(transport.last_request().path, "/widget/12");
    }

    #[test]
    fn for_reference_builds_display_path() {
        let transport = MockTransport::returning(200, "[]");
        WidgetService::new(&transport)
            .for_reference(RefType::App, 3)
            .unwrap();
        assert_eq!(transport.last_request().path, "/widget/app/3/display/");
    }

    #[test]
    fn update_serializes_only_touched_members() {
        let transport = MockTransport::returning(204, "");
        let update = WidgetUpdate {
            title: Some("Renamed".to_string()),
            config: None,
        };
        WidgetService::new(&transport).update(12, &update).unwrap();
        let body: serde_json::Value =
            serde_json::from_str(transport.last_request().body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "title": "Renamed" }));
    }
}
