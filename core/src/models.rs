//! Domain DTOs shared by the service wrappers.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dates;
use crate::values;

/// Kind of object a tag or widget is attached to. Rendered lowercase in
/// request paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefType {
    App,
    Item,
    Space,
    Status,
    Task,
}

impl RefType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefType::App => "app",
            RefType::Item => "item",
            RefType::Space => "space",
            RefType::Status => "status",
            RefType::Task => "task",
        }
    }
}

impl fmt::Display for RefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file uploaded to the platform and attached to an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub file_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Tag text with its usage count within an app.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TagCount {
    pub text: String,
    pub count: u32,
}

/// A saved view over an app's items.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct View {
    pub view_id: u64,
    pub name: String,
    #[serde(default, with = "dates::optional")]
    pub created_on: Option<NaiveDateTime>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_desc: Option<bool>,
    /// Filter definition as stored by the server; shape varies by field kind.
    #[serde(default)]
    pub filters: Option<Value>,
}

/// Payload for creating a view.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_desc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Map<String, Value>>,
}

/// Partial update of a view.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_desc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewCreated {
    pub view_id: u64,
}

/// A dashboard widget attached to some reference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Widget {
    pub widget_id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Widget configuration is kind-specific and kept generic.
    #[serde(default, deserialize_with = "values::lenient_map")]
    pub config: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WidgetCreate {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WidgetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WidgetCreated {
    pub widget_id: u64,
}

/// An app's integration with an external service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Integration {
    #[serde(default)]
    pub integration_id: Option<u64>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub silent: Option<bool>,
    #[serde(default)]
    pub updating: Option<bool>,
    #[serde(default, deserialize_with = "values::lenient_map")]
    pub config: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrationCreate {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IntegrationCreated {
    pub integration_id: u64,
}
