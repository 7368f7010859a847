//! Item operations: retrieval, creation, partial update, filtering, deletion.

use crate::error::PodioError;
use crate::http::Transport;
use crate::item::{
    FieldPayload, FilterOptions, Item, ItemCollection, ItemCreate, ItemCreated, ItemRevision,
    ItemUpdate,
};
use crate::urls::{encode_segment, Query};

use super::{expect_json, expect_no_content, expect_optional_json, to_json_body};

/// Item endpoints over an injected transport.
#[derive(Debug)]
pub struct ItemService<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> ItemService<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Fetch a single item with its field values.
    pub fn get(&self, item_id: u64) -> Result<Item, PodioError> {
        expect_json(self.transport.get(&format!("/item/{item_id}"))?, 200)
    }

    /// Fetch an item by the caller-assigned external id.
    pub fn get_by_external_id(&self, app_id: u64, external_id: &str) -> Result<Item, PodioError> {
        let path = format!(
            "/item/app/{app_id}/external_id/{}",
            encode_segment(external_id)
        );
        expect_json(self.transport.get(&path)?, 200)
    }

    /// Create an item in an app.
    pub fn create(&self, app_id: u64, item: &ItemCreate) -> Result<ItemCreated, PodioError> {
        let body = to_json_body(item)?;
        let response = self
            .transport
            .post(&format!("/item/app/{app_id}/"), Some(body))?;
        expect_json(response, 200)
    }

    /// Update an item. Returns the new revision, or `None` when the update
    /// changed nothing.
    pub fn update(
        &self,
        item_id: u64,
        update: &ItemUpdate,
    ) -> Result<Option<ItemRevision>, PodioError> {
        let body = to_json_body(update)?;
        let response = self.transport.put(&format!("/item/{item_id}"), Some(body))?;
        expect_optional_json(response)
    }

    /// Update only the field values of an item.
    pub fn update_values(
        &self,
        item_id: u64,
        fields: &[FieldPayload],
    ) -> Result<Option<ItemRevision>, PodioError> {
        let body = to_json_body(&fields)?;
        let response = self
            .transport
            .put(&format!("/item/{item_id}/value"), Some(body))?;
        expect_optional_json(response)
    }

    /// Filter an app's items.
    pub fn filter(
        &self,
        app_id: u64,
        options: &FilterOptions,
    ) -> Result<ItemCollection, PodioError> {
        let body = to_json_body(options)?;
        let response = self
            .transport
            .post(&format!("/item/app/{app_id}/filter/"), Some(body))?;
        expect_json(response, 200)
    }

    /// Delete an item. `silent` suppresses stream events and notifications.
    pub fn delete(&self, item_id: u64, silent: bool) -> Result<(), PodioError> {
        let path = Query::new()
            .opt("silent", silent.then_some(true))
            .append_to(&format!("/item/{item_id}"));
        expect_no_content(self.transport.delete(&path)?)
    }
}
