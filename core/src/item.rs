//! Items and the payloads used to create, update, and filter them.
//!
//! All request payloads follow the same policy: properties that were never
//! set are omitted from the serialized body entirely, so partial updates
//! carry only what the caller touched.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dates;
use crate::field::ItemField;
use crate::models::FileAttachment;

/// A structured record belonging to an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default)]
    pub revision: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(
        default,
        with = "dates::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_on: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ItemField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileAttachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Item {
    /// Field with the given external id, if present.
    pub fn field(&self, external_id: &str) -> Option<&ItemField> {
        self.fields
            .iter()
            .find(|field| field.external_id.as_deref() == Some(external_id))
    }

    pub fn field_mut(&mut self, external_id: &str) -> Option<&mut ItemField> {
        self.fields
            .iter_mut()
            .find(|field| field.external_id.as_deref() == Some(external_id))
    }

    pub fn field_by_id(&self, field_id: u64) -> Option<&ItemField> {
        self.fields
            .iter()
            .find(|field| field.field_id == Some(field_id))
    }
}

/// One field descriptor in a create/update payload: a field reference plus
/// the raw values to store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub values: Vec<Value>,
}

impl FieldPayload {
    pub fn by_id(field_id: u64, values: Vec<Value>) -> Self {
        Self {
            field_id: Some(field_id),
            external_id: None,
            values,
        }
    }

    pub fn by_external_id(external_id: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            field_id: None,
            external_id: Some(external_id.into()),
            values,
        }
    }
}

impl From<&ItemField> for FieldPayload {
    fn from(field: &ItemField) -> Self {
        Self {
            field_id: field.field_id,
            external_id: field.external_id.clone(),
            values: field.values().to_vec(),
        }
    }
}

/// Payload for creating an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemCreate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldPayload>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Partial update payload. `revision` guards against concurrent edits when
/// set; everything else appears only if the caller touched it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldPayload>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Options for filtering an app's items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_desc: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remember: Option<bool>,
    /// Field-keyed filter values, passed through as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Map<String, Value>>,
}

/// Response to a create: the server-assigned id and computed title.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemCreated {
    pub item_id: u64,
    #[serde(default)]
    pub title: Option<String>,
}

/// A stored revision of an item. Updates that change nothing produce no new
/// revision at all.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemRevision {
    pub revision: u32,
    #[serde(default, with = "dates::optional")]
    pub created_on: Option<NaiveDateTime>,
}

/// Filtered collection with paging counts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemCollection {
    pub total: u64,
    pub filtered: u64,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::field::FieldType;

    #[test]
    fn update_with_one_field_serializes_exactly_one_descriptor() {
        let mut title = ItemField::new(FieldType::Text, "title");
        title.set_text("New title").unwrap();

        let update = ItemUpdate {
            fields: vec![(&title).into()],
            ..Default::default()
        };
        let body = serde_json::to_value(&update).unwrap();

        assert_eq!(
            body,
            json!({
                "fields": [
                    { "external_id": "title", "values": [{ "value": "New title" }] }
                ]
            })
        );
    }

    #[test]
    fn create_payload_omits_unset_members() {
        let create = ItemCreate::default();
        assert_eq!(serde_json::to_value(&create).unwrap(), json!({}));
    }

    #[test]
    fn create_payload_includes_set_members_once() {
        let create = ItemCreate {
            external_id: Some("report-q3".to_string()),
            file_ids: vec![4, 5],
            ..Default::default()
        };
        let body = serde_json::to_value(&create).unwrap();
        assert_eq!(
            body,
            json!({ "external_id": "report-q3", "file_ids": [4, 5] })
        );
    }

    #[test]
    fn filter_options_omit_none_entries() {
        let options = FilterOptions {
            limit: Some(30),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({ "limit": 30 })
        );
    }

    #[test]
    fn item_deserializes_with_absent_collections() {
        let item: Item = serde_json::from_value(json!({
            "item_id": 42,
            "revision": 3,
            "title": "Offsite plan"
        }))
        .unwrap();
        assert_eq!(item.item_id, 42);
        assert!(item.fields.is_empty());
        assert!(item.files.is_empty());
        assert!(item.tags.is_empty());
    }

    #[test]
    fn item_field_lookup_by_external_id_and_id() {
        let item: Item = serde_json::from_value(json!({
            "item_id": 1,
            "fields": [
                { "field_id": 7, "external_id": "title", "type": "text",
                  "values": [{ "value": "Hello" }] }
            ]
        }))
        .unwrap();
        assert_eq!(item.field("title").unwrap().field_id, Some(7));
        assert_eq!(
            item.field_by_id(7).unwrap().texts().unwrap(),
            vec!["Hello"]
        );
        assert!(item.field("missing").is_none());
    }

    #[test]
    fn created_on_uses_api_timestamp_format() {
        let item: Item = serde_json::from_value(json!({
            "item_id": 1,
            "created_on": "2019-06-02 14:00:31"
        }))
        .unwrap();
        let serialized = serde_json::to_value(&item).unwrap();
        assert_eq!(serialized["created_on"], json!("2019-06-02 14:00:31"));
    }

    #[test]
    fn revision_response_parses_bare_revision() {
        let revision: ItemRevision = serde_json::from_str(r#"{"revision":5}"#).unwrap();
        assert_eq!(revision.revision, 5);
        assert!(revision.created_on.is_none());
    }
}
