//! Tag operations on items, apps, and other taggable objects.

use crate::error::PodioError;
use crate::http::Transport;
use crate::models::{RefType, TagCount};
use crate::urls::Query;

use super::{expect_json, expect_no_content, to_json_body};

/// Tag endpoints over an injected transport.
#[derive(Debug)]
pub struct TagService<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> TagService<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Add tags to an object, keeping existing ones.
    pub fn create(&self, ref_type: RefType, ref_id: u64, tags: &[&str]) -> Result<(), PodioError> {
        let body = to_json_body(&tags)?;
        let response = self
            .transport
            .post(&format!("/tag/{ref_type}/{ref_id}/"), Some(body))?;
        expect_no_content(response)
    }

    /// Replace all tags on an object.
    pub fn replace(&self, ref_type: RefType, ref_id: u64, tags: &[&str]) -> Result<(), PodioError> {
        let body = to_json_body(&tags)?;
        let response = self
            .transport
            .put(&format!("/tag/{ref_type}/{ref_id}/"), Some(body))?;
        expect_no_content(response)
    }

    /// Remove a single tag from an object.
    pub fn remove(&self, ref_type: RefType, ref_id: u64, text: &str) -> Result<(), PodioError> {
        let path = Query::new()
            .set("text", text)
            .append_to(&format!("/tag/{ref_type}/{ref_id}"));
        expect_no_content(self.transport.delete(&path)?)
    }

    /// Tags used within an app, most used first. `text` narrows to tags with
    /// the given prefix.
    pub fn on_app(
        &self,
        app_id: u64,
        limit: Option<u32>,
        text: Option<&str>,
    ) -> Result<Vec<TagCount>, PodioError> {
        let path = Query::new()
            .opt("limit", limit)
            .opt("text", text)
            .append_to(&format!("/tag/app/{app_id}/"));
        expect_json(self.transport.get(&path)?, 200)
    }
}
