//! Service wrappers over the transport boundary.
//!
//! Each method performs exactly one round-trip: build the path (plus any
//! query string), optionally serialize a JSON body, hand the request to the
//! injected transport, and deserialize the response. No service keeps state
//! beyond the transport reference it was constructed with.

mod integrations;
mod items;
mod tags;
mod views;
mod widgets;

pub use integrations::IntegrationService;
pub use items::ItemService;
pub use tags::TagService;
pub use views::ViewService;
pub use widgets::WidgetService;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PodioError;
use crate::http::HttpResponse;

/// Serialize a request payload, mapping failures to `Serialization`.
pub(crate) fn to_json_body<T: Serialize>(payload: &T) -> Result<String, PodioError> {
    serde_json::to_string(payload).map_err(|e| PodioError::Serialization(e.to_string()))
}

/// Map non-success status codes to the error variants callers match on.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), PodioError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(PodioError::NotFound);
    }
    Err(PodioError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Expect `expected` and deserialize the body into `T`.
pub(crate) fn expect_json<T: DeserializeOwned>(
    response: HttpResponse,
    expected: u16,
) -> Result<T, PodioError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| PodioError::Deserialization(e.to_string()))
}

/// Like [`expect_json`], but a 204 or an empty success body means "nothing
/// changed" and yields `None`.
pub(crate) fn expect_optional_json<T: DeserializeOwned>(
    response: HttpResponse,
) -> Result<Option<T>, PodioError> {
    if response.status == 204 || (is_success(response.status) && response.body.trim().is_empty()) {
        return Ok(None);
    }
    check_status(&response, 200)?;
    serde_json::from_str(&response.body)
        .map(Some)
        .map_err(|e| PodioError::Deserialization(e.to_string()))
}

/// Expect a success; the body, if any, is ignored.
pub(crate) fn expect_no_content(response: HttpResponse) -> Result<(), PodioError> {
    if is_success(response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(PodioError::NotFound);
    }
    Err(PodioError::Http {
        status: response.status,
        body: response.body,
    })
}
