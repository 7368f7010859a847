//! Saved view operations.

use crate::error::PodioError;
use crate::http::Transport;
use crate::models::{View, ViewCreate, ViewCreated, ViewUpdate};
use crate::urls::Query;

use super::{expect_json, expect_no_content, to_json_body};

/// View endpoints over an injected transport.
#[derive(Debug)]
pub struct ViewService<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> ViewService<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Create a view on an app.
    pub fn create(&self, app_id: u64, view: &ViewCreate) -> Result<ViewCreated, PodioError> {
        let body = to_json_body(view)?;
        let response = self
            .transport
            .post(&format!("/view/app/{app_id}/"), Some(body))?;
        expect_json(response, 200)
    }

    /// Fetch a single view.
    pub fn get(&self, app_id: u64, view_id: u64) -> Result<View, PodioError> {
        expect_json(
            self.transport.get(&format!("/view/app/{app_id}/{view_id}"))?,
            200,
        )
    }

    /// All views on an app. `include_standard` also returns the built-in
    /// views alongside the saved ones.
    pub fn all(&self, app_id: u64, include_standard: bool) -> Result<Vec<View>, PodioError> {
        let path = Query::new()
            .opt("include_standard_views", include_standard.then_some(true))
            .append_to(&format!("/view/app/{app_id}/"));
        expect_json(self.transport.get(&path)?, 200)
    }

    /// Update a view.
    pub fn update(&self, view_id: u64, update: &ViewUpdate) -> Result<(), PodioError> {
        let body = to_json_body(update)?;
        expect_no_content(self.transport.put(&format!("/view/{view_id}"), Some(body))?)
    }

    /// Delete a view.
    pub fn delete(&self, view_id: u64) -> Result<(), PodioError> {
        expect_no_content(self.transport.delete(&format!("/view/{view_id}"))?)
    }
}
