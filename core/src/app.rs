//! Application-level field configuration and typed settings views.
//!
//! # Design
//! A field's settings arrive as a generic key→JSON map whose entries depend
//! on the field kind. Typed views project the map on read and are cached;
//! setters write into the generic map directly and invalidate the view, so
//! a fresh read always observes the write. The map itself may be absent on
//! a newly built field — [`ApplicationField::initialize_settings`] creates
//! it idempotently and is called by every setter.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cache::CacheSlot;
use crate::error::PodioError;
use crate::field::{CategoryOption, FieldType};
use crate::values;

/// How category options are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryDisplay {
    Inline,
    List,
    Dropdown,
}

impl CategoryDisplay {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryDisplay::Inline => "inline",
            CategoryDisplay::List => "list",
            CategoryDisplay::Dropdown => "dropdown",
        }
    }

    fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "inline" => Some(CategoryDisplay::Inline),
            "list" => Some(CategoryDisplay::List),
            "dropdown" => Some(CategoryDisplay::Dropdown),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed view of a category field's settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySettings {
    pub multiple: bool,
    pub display: Option<CategoryDisplay>,
    pub options: Vec<CategoryOption>,
}

/// Typed view of a money field's settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneySettings {
    pub allowed_currencies: Vec<String>,
}

/// Typed view of a date field's settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DateSettings {
    pub calendar: bool,
    pub end: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum SettingsView {
    Category(CategorySettings),
    Money(MoneySettings),
    Date(DateSettings),
}

/// Shared configuration of a field: label, flags, and the kind-specific
/// settings map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(
        default,
        deserialize_with = "values::lenient_optional_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub settings: Option<Map<String, Value>>,
}

/// Configuration describing a field on an application, as opposed to the
/// values the field holds on an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_id: Option<u64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub config: FieldConfig,
    #[serde(skip)]
    view: CacheSlot<SettingsView>,
}

impl PartialEq for ApplicationField {
    fn eq(&self, other: &Self) -> bool {
        self.field_id == other.field_id
            && self.field_type == other.field_type
            && self.external_id == other.external_id
            && self.status == other.status
            && self.config == other.config
    }
}

impl ApplicationField {
    pub fn new(field_type: FieldType, external_id: impl Into<String>) -> Self {
        Self {
            field_id: None,
            field_type: Some(field_type),
            external_id: Some(external_id.into()),
            status: None,
            config: FieldConfig::default(),
            view: CacheSlot::new(),
        }
    }

    /// Guarantee the settings map exists. Idempotent; called by every setter.
    pub fn initialize_settings(&mut self) {
        self.config.settings.get_or_insert_with(Map::new);
    }

    pub fn kind(&self) -> FieldType {
        self.field_type.unwrap_or(FieldType::Unknown)
    }

    fn require_kind(&self, expected: FieldType) -> Result<(), PodioError> {
        if self.kind() == expected {
            Ok(())
        } else {
            Err(PodioError::kind_mismatch(expected, self.kind()))
        }
    }

    fn settings_ref(&self) -> &Map<String, Value> {
        self.config
            .settings
            .as_ref()
            .unwrap_or_else(|| values::empty_map())
    }

    fn write_setting(&mut self, key: &str, value: Value) {
        self.view.invalidate();
        self.config
            .settings
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value);
    }

    // --- typed reads -------------------------------------------------------

    /// Typed settings of a category field, cached until the next write.
    pub fn category_settings(&self) -> Result<CategorySettings, PodioError> {
        self.require_kind(FieldType::Category)?;
        let view = self.view.get_or_try_compute(|| {
            Ok::<_, PodioError>(SettingsView::Category(project_category(self.settings_ref())))
        })?;
        match view {
            SettingsView::Category(settings) => Ok(settings),
            _ => Err(PodioError::kind_mismatch(FieldType::Category, self.kind())),
        }
    }

    /// Typed settings of a money field, cached until the next write.
    pub fn money_settings(&self) -> Result<MoneySettings, PodioError> {
        self.require_kind(FieldType::Money)?;
        let view = self.view.get_or_try_compute(|| {
            Ok::<_, PodioError>(SettingsView::Money(project_money(self.settings_ref())))
        })?;
        match view {
            SettingsView::Money(settings) => Ok(settings),
            _ => Err(PodioError::kind_mismatch(FieldType::Money, self.kind())),
        }
    }

    /// Typed settings of a date field, cached until the next write.
    pub fn date_settings(&self) -> Result<DateSettings, PodioError> {
        self.require_kind(FieldType::Date)?;
        let view = self.view.get_or_try_compute(|| {
            Ok::<_, PodioError>(SettingsView::Date(project_date(self.settings_ref())))
        })?;
        match view {
            SettingsView::Date(settings) => Ok(settings),
            _ => Err(PodioError::kind_mismatch(FieldType::Date, self.kind())),
        }
    }

    // --- typed writes ------------------------------------------------------

    pub fn set_multiple(&mut self, multiple: bool) -> Result<(), PodioError> {
        self.require_kind(FieldType::Category)?;
        self.write_setting("multiple", Value::Bool(multiple));
        Ok(())
    }

    pub fn set_display(&mut self, display: CategoryDisplay) -> Result<(), PodioError> {
        self.require_kind(FieldType::Category)?;
        self.write_setting("display", Value::String(display.as_str().to_string()));
        Ok(())
    }

    pub fn set_options(&mut self, options: &[CategoryOption]) -> Result<(), PodioError> {
        self.require_kind(FieldType::Category)?;
        let raw = options
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PodioError::Serialization(e.to_string()))?;
        self.write_setting("options", Value::Array(raw));
        Ok(())
    }

    pub fn set_allowed_currencies(&mut self, currencies: &[&str]) -> Result<(), PodioError> {
        self.require_kind(FieldType::Money)?;
        let raw = currencies
            .iter()
            .map(|currency| Value::String((*currency).to_string()))
            .collect();
        self.write_setting("allowed_currencies", Value::Array(raw));
        Ok(())
    }

    pub fn set_calendar(&mut self, calendar: bool) -> Result<(), PodioError> {
        self.require_kind(FieldType::Date)?;
        self.write_setting("calendar", Value::Bool(calendar));
        Ok(())
    }
}

fn project_category(settings: &Map<String, Value>) -> CategorySettings {
    let multiple = settings
        .get("multiple")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let display = settings
        .get("display")
        .and_then(Value::as_str)
        .and_then(CategoryDisplay::from_str);
    let options = settings
        .get("options")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| match serde_json::from_value(entry.clone()) {
                    Ok(option) => Some(option),
                    Err(_) => {
                        tracing::warn!("skipping malformed category option");
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    CategorySettings {
        multiple,
        display,
        options,
    }
}

fn project_money(settings: &Map<String, Value>) -> MoneySettings {
    let allowed_currencies = settings
        .get("allowed_currencies")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    MoneySettings { allowed_currencies }
}

fn project_date(settings: &Map<String, Value>) -> DateSettings {
    DateSettings {
        calendar: settings
            .get("calendar")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        end: settings
            .get("end")
            .and_then(Value::as_str)
            .map(str::to_string),
        time: settings
            .get("time")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn initialize_settings_is_idempotent() {
        let mut field = ApplicationField::new(FieldType::Category, "status");
        assert!(field.config.settings.is_none());
        field.initialize_settings();
        assert!(field.config.settings.as_ref().unwrap().is_empty());

        field.set_multiple(true).unwrap();
        field.initialize_settings();
        assert_eq!(field.config.settings.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn multiple_set_true_reads_back_true_after_invalidation() {
        let mut field = ApplicationField::new(FieldType::Category, "status");
        assert!(!field.category_settings().unwrap().multiple);

        field.set_multiple(true).unwrap();
        assert!(field.category_settings().unwrap().multiple);
    }

    #[test]
    fn writes_land_in_the_generic_map() {
        let mut field = ApplicationField::new(FieldType::Category, "status");
        field.set_multiple(true).unwrap();
        field.set_display(CategoryDisplay::Dropdown).unwrap();
        let settings = field.config.settings.as_ref().unwrap();
        assert_eq!(settings["multiple"], json!(true));
        assert_eq!(settings["display"], json!("dropdown"));
    }

    #[test]
    fn category_settings_project_options() {
        let mut field = ApplicationField::new(FieldType::Category, "status");
        field
            .set_options(&[
                CategoryOption {
                    id: 1,
                    text: Some("Open".to_string()),
                    color: None,
                },
                CategoryOption {
                    id: 2,
                    text: Some("Closed".to_string()),
                    color: Some("D2E4EB".to_string()),
                },
            ])
            .unwrap();
        let options = field.category_settings().unwrap().options;
        assert_eq!(options.len(), 2);
        assert_eq!(options[1].color.as_deref(), Some("D2E4EB"));
    }

    #[test]
    fn allowed_currencies_roundtrip() {
        let mut field = ApplicationField::new(FieldType::Money, "budget");
        field.set_allowed_currencies(&["EUR", "USD"]).unwrap();
        assert_eq!(
            field.money_settings().unwrap().allowed_currencies,
            vec!["EUR", "USD"]
        );
    }

    #[test]
    fn date_settings_read_defaults_when_absent() {
        let field = ApplicationField::new(FieldType::Date, "deadline");
        let settings = field.date_settings().unwrap();
        assert!(!settings.calendar);
        assert!(settings.end.is_none());
        assert!(settings.time.is_none());
    }

    #[test]
    fn settings_accessor_on_wrong_kind_fails() {
        let field = ApplicationField::new(FieldType::Text, "title");
        assert!(matches!(
            field.category_settings().unwrap_err(),
            PodioError::TypeMismatch { .. }
        ));
        let mut field = field;
        assert!(field.set_allowed_currencies(&["EUR"]).is_err());
    }

    #[test]
    fn unknown_display_reads_as_none() {
        let field: ApplicationField = serde_json::from_value(json!({
            "field_id": 4,
            "type": "category",
            "config": { "settings": { "display": "carousel" } }
        }))
        .unwrap();
        assert_eq!(field.category_settings().unwrap().display, None);
    }

    #[test]
    fn non_object_settings_degrade_to_absent() {
        let field: ApplicationField = serde_json::from_value(json!({
            "field_id": 4,
            "type": "category",
            "config": { "settings": "broken" }
        }))
        .unwrap();
        assert!(field.config.settings.is_none());
        assert!(field.category_settings().unwrap().options.is_empty());
    }

    #[test]
    fn config_roundtrips_through_serialization() {
        let mut field = ApplicationField::new(FieldType::Category, "status");
        field.set_multiple(true).unwrap();
        let json = serde_json::to_string(&field).unwrap();
        let back: ApplicationField = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
        assert!(back.category_settings().unwrap().multiple);
    }
}
