//! App integration operations.

use serde_json::{Map, Value};

use crate::error::PodioError;
use crate::http::Transport;
use crate::models::{Integration, IntegrationCreate, IntegrationCreated, IntegrationUpdate};

use super::{expect_json, expect_no_content, to_json_body};

/// Integration endpoints over an injected transport. An app has at most one
/// integration, so every path is keyed by app id.
#[derive(Debug)]
pub struct IntegrationService<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> IntegrationService<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Fetch the integration configured on an app.
    pub fn get(&self, app_id: u64) -> Result<Integration, PodioError> {
        expect_json(self.transport.get(&format!("/integration/{app_id}"))?, 200)
    }

    /// Configure an integration on an app.
    pub fn create(
        &self,
        app_id: u64,
        integration: &IntegrationCreate,
    ) -> Result<IntegrationCreated, PodioError> {
        let body = to_json_body(integration)?;
        let response = self
            .transport
            .post(&format!("/integration/{app_id}"), Some(body))?;
        expect_json(response, 200)
    }

    /// Update an app's integration.
    pub fn update(&self, app_id: u64, update: &IntegrationUpdate) -> Result<(), PodioError> {
        let body = to_json_body(update)?;
        expect_no_content(
            self.transport
                .put(&format!("/integration/{app_id}"), Some(body))?,
        )
    }

    /// Remove an app's integration.
    pub fn delete(&self, app_id: u64) -> Result<(), PodioError> {
        expect_no_content(self.transport.delete(&format!("/integration/{app_id}"))?)
    }

    /// Trigger a refresh of the integration's data.
    pub fn refresh(&self, app_id: u64) -> Result<(), PodioError> {
        expect_no_content(
            self.transport
                .post(&format!("/integration/{app_id}/refresh"), None)?,
        )
    }

    /// Update the mapping from integration fields to app fields.
    pub fn update_mapping(
        &self,
        app_id: u64,
        mapping: &Map<String, Value>,
    ) -> Result<(), PodioError> {
        let body = to_json_body(mapping)?;
        expect_no_content(
            self.transport
                .put(&format!("/integration/{app_id}/mapping"), Some(body))?,
        )
    }
}
