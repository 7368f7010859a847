//! In-memory mock of the subset of the Podio API the client tests exercise:
//! item CRUD with revision tracking, filtering, and tags.
//!
//! Field values are stored as raw JSON, the same way the API transports
//! them. Updates that change nothing produce `204 No Content` and no new
//! revision, matching the real API's behavior.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Stored item record.
#[derive(Clone, Debug, Serialize)]
pub struct Item {
    pub item_id: u64,
    pub app_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub revision: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub fields: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct ItemCreate {
    pub external_id: Option<String>,
    #[serde(default)]
    pub fields: Vec<Value>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct ItemUpdate {
    pub revision: Option<u32>,
    #[serde(default)]
    pub fields: Vec<Value>,
}

#[derive(Deserialize)]
pub struct FilterOptions {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Deserialize)]
pub struct TagQuery {
    pub limit: Option<u32>,
    pub text: Option<String>,
}

#[derive(Serialize)]
pub struct TagCount {
    pub text: String,
    pub count: u32,
}

#[derive(Default)]
pub struct Store {
    pub items: HashMap<u64, Item>,
    next_item_id: u64,
}

impl Store {
    fn next_id(&mut self) -> u64 {
        self.next_item_id += 1;
        self.next_item_id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/item/app/{app_id}/", post(create_item))
        .route("/item/app/{app_id}/filter/", post(filter_items))
        .route(
            "/item/{item_id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/item/{item_id}/value", put(update_item_values))
        .route("/tag/item/{item_id}/", post(create_tags))
        .route("/tag/app/{app_id}/", get(tags_on_app))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Field kinds of the mock app, keyed by external id. Item payloads only
/// reference fields; the schema supplies the kind when items are read back.
fn field_kind(external_id: Option<&str>) -> &'static str {
    match external_id {
        Some("attachments") => "image",
        Some("status") => "category",
        Some("deadline") => "date",
        Some("budget") => "money",
        _ => "text",
    }
}

fn derive_title(fields: &[Value]) -> Option<String> {
    fields
        .first()
        .and_then(|field| field.get("values"))
        .and_then(|values| values.get(0))
        .and_then(|entry| entry.get("value"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Store an incoming field descriptor with the schema's kind attached.
fn stored_field(entry: &Value) -> Value {
    let external_id = entry.get("external_id").and_then(Value::as_str);
    let mut field = serde_json::Map::new();
    if let Some(field_id) = entry.get("field_id").filter(|v| !v.is_null()) {
        field.insert("field_id".to_string(), field_id.clone());
    }
    if let Some(external_id) = external_id {
        field.insert("external_id".to_string(), json!(external_id));
    }
    field.insert("type".to_string(), json!(field_kind(external_id)));
    field.insert(
        "values".to_string(),
        entry.get("values").cloned().unwrap_or_else(|| json!([])),
    );
    Value::Object(field)
}

fn same_field(stored: &Value, entry: &Value) -> bool {
    let by_id = match (stored.get("field_id"), entry.get("field_id")) {
        (Some(a), Some(b)) if !a.is_null() && !b.is_null() => a == b,
        _ => false,
    };
    let by_external = match (stored.get("external_id"), entry.get("external_id")) {
        (Some(a), Some(b)) if !a.is_null() && !b.is_null() => a == b,
        _ => false,
    };
    by_id || by_external
}

/// Apply incoming field descriptors; returns whether anything changed.
fn apply_fields(stored: &mut Vec<Value>, incoming: &[Value]) -> bool {
    let mut changed = false;
    for entry in incoming {
        let values = entry.get("values").cloned().unwrap_or_else(|| json!([]));
        match stored.iter_mut().find(|field| same_field(field, entry)) {
            Some(field) => {
                if field.get("values") != Some(&values) {
                    field["values"] = values;
                    changed = true;
                }
            }
            None => {
                stored.push(stored_field(entry));
                changed = true;
            }
        }
    }
    changed
}

async fn create_item(
    State(db): State<Db>,
    Path(app_id): Path<u64>,
    Json(input): Json<ItemCreate>,
) -> Json<Value> {
    let mut store = db.write().await;
    let item_id = store.next_id();
    let fields: Vec<Value> = input.fields.iter().map(stored_field).collect();
    let title = derive_title(&fields);
    let item = Item {
        item_id,
        app_id,
        external_id: input.external_id,
        revision: 0,
        title: title.clone(),
        fields,
        tags: input.tags,
    };
    store.items.insert(item_id, item);
    Json(json!({ "item_id": item_id, "title": title }))
}

async fn get_item(
    State(db): State<Db>,
    Path(item_id): Path<u64>,
) -> Result<Json<Item>, StatusCode> {
    let store = db.read().await;
    store
        .items
        .get(&item_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_item(
    State(db): State<Db>,
    Path(item_id): Path<u64>,
    Json(input): Json<ItemUpdate>,
) -> Result<Response, StatusCode> {
    let mut store = db.write().await;
    let item = store.items.get_mut(&item_id).ok_or(StatusCode::NOT_FOUND)?;
    if apply_fields(&mut item.fields, &input.fields) {
        item.revision += 1;
        Ok(Json(json!({ "revision": item.revision })).into_response())
    } else {
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

async fn update_item_values(
    State(db): State<Db>,
    Path(item_id): Path<u64>,
    Json(fields): Json<Vec<Value>>,
) -> Result<Response, StatusCode> {
    let mut store = db.write().await;
    let item = store.items.get_mut(&item_id).ok_or(StatusCode::NOT_FOUND)?;
    if apply_fields(&mut item.fields, &fields) {
        item.revision += 1;
        Ok(Json(json!({ "revision": item.revision })).into_response())
    } else {
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

async fn delete_item(
    State(db): State<Db>,
    Path(item_id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store
        .items
        .remove(&item_id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn filter_items(
    State(db): State<Db>,
    Path(app_id): Path<u64>,
    Json(options): Json<FilterOptions>,
) -> Json<Value> {
    let store = db.read().await;
    let mut matches: Vec<&Item> = store
        .items
        .values()
        .filter(|item| item.app_id == app_id)
        .collect();
    matches.sort_by_key(|item| item.item_id);
    let total = matches.len();
    let offset = options.offset.unwrap_or(0) as usize;
    let limit = options.limit.unwrap_or(30) as usize;
    let page: Vec<Item> = matches
        .into_iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();
    Json(json!({ "total": total, "filtered": total, "items": page }))
}

async fn create_tags(
    State(db): State<Db>,
    Path(item_id): Path<u64>,
    Json(tags): Json<Vec<String>>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    let item = store.items.get_mut(&item_id).ok_or(StatusCode::NOT_FOUND)?;
    for tag in tags {
        if !item.tags.contains(&tag) {
            item.tags.push(tag);
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn tags_on_app(
    State(db): State<Db>,
    Path(app_id): Path<u64>,
    Query(query): Query<TagQuery>,
) -> Json<Vec<TagCount>> {
    let store = db.read().await;
    let mut totals: HashMap<String, u32> = HashMap::new();
    for item in store.items.values().filter(|item| item.app_id == app_id) {
        for tag in &item.tags {
            *totals.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    let mut counts: Vec<TagCount> = totals
        .into_iter()
        .filter(|(text, _)| match &query.text {
            Some(prefix) => text.starts_with(prefix.as_str()),
            None => true,
        })
        .map(|(text, count)| TagCount { text, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.text.cmp(&b.text)));
    if let Some(limit) = query.limit {
        counts.truncate(limit as usize);
    }
    Json(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(external_id: &str, values: Value) -> Value {
        json!({ "external_id": external_id, "values": values })
    }

    #[test]
    fn stored_field_attaches_schema_kind() {
        let field = stored_field(&payload("attachments", json!([{ "value": 4 }])));
        assert_eq!(field["type"], json!("image"));
        assert_eq!(field["values"], json!([{ "value": 4 }]));
    }

    #[test]
    fn apply_fields_detects_no_op_updates() {
        let mut stored = vec![stored_field(&payload("title", json!([{ "value": "A" }])))];
        let incoming = vec![payload("title", json!([{ "value": "A" }]))];
        assert!(!apply_fields(&mut stored, &incoming));
    }

    #[test]
    fn apply_fields_replaces_changed_values() {
        let mut stored = vec![stored_field(&payload("title", json!([{ "value": "A" }])))];
        let incoming = vec![payload("title", json!([{ "value": "B" }]))];
        assert!(apply_fields(&mut stored, &incoming));
        assert_eq!(stored[0]["values"], json!([{ "value": "B" }]));
    }

    #[test]
    fn apply_fields_appends_unknown_fields() {
        let mut stored = Vec::new();
        let incoming = vec![payload("title", json!([{ "value": "A" }]))];
        assert!(apply_fields(&mut stored, &incoming));
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn derive_title_reads_first_text_value() {
        let fields = vec![stored_field(&payload("title", json!([{ "value": "Plan" }])))];
        assert_eq!(derive_title(&fields).as_deref(), Some("Plan"));
        assert_eq!(derive_title(&[]), None);
    }
}
