//! Typed client core for the Podio REST API.
//!
//! # Overview
//! Service structs ([`ItemService`], [`TagService`], [`ViewService`],
//! [`WidgetService`], [`IntegrationService`]) build request paths, serialize
//! JSON payloads, and parse responses into typed models. The HTTP round-trip
//! itself is performed by a [`Transport`] implementation injected at
//! construction, keeping the core deterministic and free of I/O
//! dependencies.
//!
//! # Design
//! - Every request model omits unset properties, so partial updates carry
//!   only what the caller touched.
//! - Query parameters drop `None` values entirely and render booleans
//!   lowercase; building happens in [`Query`] before the transport is asked
//!   to do anything.
//! - Item field values stay in their raw JSON wire shape and are projected
//!   through kind-aware typed accessors ([`ItemField::typed_values`] and
//!   friends); projections are cached and recomputed after any write.
//! - Dynamic settings payloads are normalized into generic maps that default
//!   instead of failing when shapes vary between responses.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod app;
pub mod cache;
pub mod dates;
pub mod error;
pub mod field;
pub mod http;
pub mod item;
pub mod models;
pub mod services;
pub mod urls;
pub mod values;

pub use app::{
    ApplicationField, CategoryDisplay, CategorySettings, DateSettings, FieldConfig, MoneySettings,
};
pub use error::PodioError;
pub use field::{
    CategoryOption, ContactReference, DateRange, FieldType, FieldValues, ItemField, ItemReference,
    MoneyAmount,
};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use item::{
    FieldPayload, FilterOptions, Item, ItemCollection, ItemCreate, ItemCreated, ItemRevision,
    ItemUpdate,
};
pub use models::{
    FileAttachment, Integration, IntegrationCreate, IntegrationCreated, IntegrationUpdate, RefType,
    TagCount, View, ViewCreate, ViewCreated, ViewUpdate, Widget, WidgetCreate, WidgetCreated,
    WidgetUpdate,
};
pub use services::{IntegrationService, ItemService, TagService, ViewService, WidgetService};
pub use urls::Query;
pub use values::{settings_map, ValueExt};
