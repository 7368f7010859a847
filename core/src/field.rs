//! Item field values and their typed projections.
//!
//! # Design
//! A field's values travel as an ordered list of raw JSON entries whose
//! shape is determined by the field's kind tag. The tag is inspected exactly
//! once, in [`ItemField::typed_values`], which decodes the raw list into the
//! [`FieldValues`] union. Typed setters write the exact raw shape the API
//! expects, so a value set through an accessor is indistinguishable from one
//! built by hand. Projections are cached and recomputed after any write,
//! including writes made directly through [`ItemField::values_mut`].

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::cache::CacheSlot;
use crate::dates;
use crate::error::PodioError;
use crate::values::ValueExt;

/// Field kind tag.
///
/// Unknown tags decode to `Unknown` so new server-side kinds do not break
/// item deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Number,
    Category,
    Date,
    Money,
    Image,
    Progress,
    App,
    Contact,
    Duration,
    Calculation,
    Embed,
    Location,
    Unknown,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Category => "category",
            FieldType::Date => "date",
            FieldType::Money => "money",
            FieldType::Image => "image",
            FieldType::Progress => "progress",
            FieldType::App => "app",
            FieldType::Contact => "contact",
            FieldType::Duration => "duration",
            FieldType::Calculation => "calculation",
            FieldType::Embed => "embed",
            FieldType::Location => "location",
            FieldType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(match tag.as_str() {
            "text" => FieldType::Text,
            "number" => FieldType::Number,
            "category" => FieldType::Category,
            "date" => FieldType::Date,
            "money" => FieldType::Money,
            "image" => FieldType::Image,
            "progress" => FieldType::Progress,
            "app" => FieldType::App,
            "contact" => FieldType::Contact,
            "duration" => FieldType::Duration,
            "calculation" => FieldType::Calculation,
            "embed" => FieldType::Embed,
            "location" => FieldType::Location,
            _ => FieldType::Unknown,
        })
    }
}

/// One selectable option of a category field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Start/end pair of a date field value. `end` is absent for single dates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// Amount plus ISO currency code. The amount stays a string so it
/// round-trips exactly as the API sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyAmount {
    pub amount: String,
    pub currency: String,
}

/// Reference to an item in another app. Reads accept both the hydrated item
/// stub and a bare id; writes always send the id.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemReference {
    pub item_id: u64,
    pub title: Option<String>,
}

/// Reference to a contact profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactReference {
    pub profile_id: u64,
    pub name: Option<String>,
}

/// Decoded form of a field's raw values, one variant per concrete shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValues {
    Text(Vec<String>),
    Number(Vec<f64>),
    Category(Vec<CategoryOption>),
    Date(Vec<DateRange>),
    Money(Vec<MoneyAmount>),
    /// File ids of the attached uploads.
    Image(Vec<u64>),
    /// Percentages, 0 to 100.
    Progress(Vec<u8>),
    App(Vec<ItemReference>),
    Contact(Vec<ContactReference>),
    /// Durations in seconds.
    Duration(Vec<u32>),
    /// Kinds without a dedicated projection keep their raw entries.
    Raw(Vec<Value>),
}

/// One field slot on an item: a field reference, a kind tag, and the raw
/// value list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default)]
    values: Vec<Value>,
    #[serde(skip)]
    projection: CacheSlot<FieldValues>,
}

impl PartialEq for ItemField {
    fn eq(&self, other: &Self) -> bool {
        self.field_id == other.field_id
            && self.external_id == other.external_id
            && self.label == other.label
            && self.field_type == other.field_type
            && self.values == other.values
    }
}

impl ItemField {
    /// Empty field addressed by external id, for building requests.
    pub fn new(field_type: FieldType, external_id: impl Into<String>) -> Self {
        Self {
            field_id: None,
            external_id: Some(external_id.into()),
            label: None,
            field_type: Some(field_type),
            values: Vec::new(),
            projection: CacheSlot::new(),
        }
    }

    /// Empty field addressed by numeric field id.
    pub fn with_id(field_type: FieldType, field_id: u64) -> Self {
        Self {
            field_id: Some(field_id),
            external_id: None,
            label: None,
            field_type: Some(field_type),
            values: Vec::new(),
            projection: CacheSlot::new(),
        }
    }

    /// The raw wire entries, in order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Mutable access to the raw entries. The cached projection is dropped
    /// up front, so reads after arbitrary edits reflect the new state.
    pub fn values_mut(&mut self) -> &mut Vec<Value> {
        self.projection.invalidate();
        &mut self.values
    }

    pub fn kind(&self) -> FieldType {
        self.field_type.unwrap_or(FieldType::Unknown)
    }

    /// Decode the raw entries according to the field's kind tag.
    ///
    /// The projection is computed lazily and cached; any write through
    /// [`values_mut`](Self::values_mut) or a typed setter invalidates it.
    /// Kinds without a dedicated projection pass their raw entries through
    /// unchanged.
    pub fn typed_values(&self) -> Result<FieldValues, PodioError> {
        self.projection
            .get_or_try_compute(|| decode_values(self.kind(), &self.values))
    }

    fn kind_error(&self, expected: FieldType) -> PodioError {
        PodioError::kind_mismatch(expected, self.kind())
    }

    fn require_kind(&self, expected: FieldType) -> Result<(), PodioError> {
        if self.kind() == expected {
            Ok(())
        } else {
            Err(self.kind_error(expected))
        }
    }

    fn replace_values(&mut self, entries: Vec<Value>) {
        let values = self.values_mut();
        values.clear();
        values.extend(entries);
    }

    fn push_value(&mut self, entry: Value) {
        self.values_mut().push(entry);
    }

    // --- typed getters -----------------------------------------------------

    pub fn texts(&self) -> Result<Vec<String>, PodioError> {
        match self.typed_values()? {
            FieldValues::Text(texts) => Ok(texts),
            _ => Err(self.kind_error(FieldType::Text)),
        }
    }

    /// First text value, if any.
    pub fn text(&self) -> Result<Option<String>, PodioError> {
        Ok(self.texts()?.into_iter().next())
    }

    pub fn numbers(&self) -> Result<Vec<f64>, PodioError> {
        match self.typed_values()? {
            FieldValues::Number(numbers) => Ok(numbers),
            _ => Err(self.kind_error(FieldType::Number)),
        }
    }

    pub fn number(&self) -> Result<Option<f64>, PodioError> {
        Ok(self.numbers()?.into_iter().next())
    }

    pub fn category_options(&self) -> Result<Vec<CategoryOption>, PodioError> {
        match self.typed_values()? {
            FieldValues::Category(options) => Ok(options),
            _ => Err(self.kind_error(FieldType::Category)),
        }
    }

    pub fn date_ranges(&self) -> Result<Vec<DateRange>, PodioError> {
        match self.typed_values()? {
            FieldValues::Date(ranges) => Ok(ranges),
            _ => Err(self.kind_error(FieldType::Date)),
        }
    }

    pub fn date_range(&self) -> Result<Option<DateRange>, PodioError> {
        Ok(self.date_ranges()?.into_iter().next())
    }

    pub fn money_amounts(&self) -> Result<Vec<MoneyAmount>, PodioError> {
        match self.typed_values()? {
            FieldValues::Money(amounts) => Ok(amounts),
            _ => Err(self.kind_error(FieldType::Money)),
        }
    }

    /// File ids of the attached uploads, in order.
    pub fn file_ids(&self) -> Result<Vec<u64>, PodioError> {
        match self.typed_values()? {
            FieldValues::Image(ids) => Ok(ids),
            _ => Err(self.kind_error(FieldType::Image)),
        }
    }

    pub fn progress(&self) -> Result<Option<u8>, PodioError> {
        match self.typed_values()? {
            FieldValues::Progress(percentages) => Ok(percentages.into_iter().next()),
            _ => Err(self.kind_error(FieldType::Progress)),
        }
    }

    pub fn app_references(&self) -> Result<Vec<ItemReference>, PodioError> {
        match self.typed_values()? {
            FieldValues::App(references) => Ok(references),
            _ => Err(self.kind_error(FieldType::App)),
        }
    }

    pub fn contact_references(&self) -> Result<Vec<ContactReference>, PodioError> {
        match self.typed_values()? {
            FieldValues::Contact(references) => Ok(references),
            _ => Err(self.kind_error(FieldType::Contact)),
        }
    }

    pub fn duration_seconds(&self) -> Result<Option<u32>, PodioError> {
        match self.typed_values()? {
            FieldValues::Duration(seconds) => Ok(seconds.into_iter().next()),
            _ => Err(self.kind_error(FieldType::Duration)),
        }
    }

    // --- typed setters -----------------------------------------------------

    /// Replace all values with a single text entry.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), PodioError> {
        self.require_kind(FieldType::Text)?;
        self.replace_values(vec![json!({ "value": text.into() })]);
        Ok(())
    }

    /// Append one text entry, keeping existing values.
    pub fn add_text(&mut self, text: impl Into<String>) -> Result<(), PodioError> {
        self.require_kind(FieldType::Text)?;
        self.push_value(json!({ "value": text.into() }));
        Ok(())
    }

    pub fn set_number(&mut self, value: f64) -> Result<(), PodioError> {
        self.require_kind(FieldType::Number)?;
        if !value.is_finite() {
            return Err(PodioError::Serialization(
                "number values must be finite".to_string(),
            ));
        }
        self.replace_values(vec![json!({ "value": value })]);
        Ok(())
    }

    /// Replace all values with a single category option id.
    pub fn set_category(&mut self, option_id: u64) -> Result<(), PodioError> {
        self.require_kind(FieldType::Category)?;
        self.replace_values(vec![json!({ "value": option_id })]);
        Ok(())
    }

    /// Append a category option id, for multi-value category fields.
    pub fn add_category(&mut self, option_id: u64) -> Result<(), PodioError> {
        self.require_kind(FieldType::Category)?;
        self.push_value(json!({ "value": option_id }));
        Ok(())
    }

    pub fn set_date(&mut self, start: NaiveDateTime) -> Result<(), PodioError> {
        self.set_date_range(DateRange {
            start: Some(start),
            end: None,
        })
    }

    pub fn set_date_range(&mut self, range: DateRange) -> Result<(), PodioError> {
        self.require_kind(FieldType::Date)?;
        let mut entry = Map::new();
        if let Some(start) = range.start {
            entry.insert("start".to_string(), Value::String(dates::format(&start)));
        }
        if let Some(end) = range.end {
            entry.insert("end".to_string(), Value::String(dates::format(&end)));
        }
        self.replace_values(vec![Value::Object(entry)]);
        Ok(())
    }

    pub fn set_money(
        &mut self,
        amount: impl Into<String>,
        currency: impl Into<String>,
    ) -> Result<(), PodioError> {
        self.require_kind(FieldType::Money)?;
        self.replace_values(vec![json!({
            "value": amount.into(),
            "currency": currency.into(),
        })]);
        Ok(())
    }

    /// Replace all values with a single uploaded file reference.
    pub fn set_file_id(&mut self, file_id: u64) -> Result<(), PodioError> {
        self.require_kind(FieldType::Image)?;
        self.replace_values(vec![json!({ "value": file_id })]);
        Ok(())
    }

    /// Replace all values with the given file references, in order.
    pub fn set_file_ids(
        &mut self,
        file_ids: impl IntoIterator<Item = u64>,
    ) -> Result<(), PodioError> {
        self.require_kind(FieldType::Image)?;
        let entries = file_ids
            .into_iter()
            .map(|file_id| json!({ "value": file_id }))
            .collect();
        self.replace_values(entries);
        Ok(())
    }

    pub fn add_file_id(&mut self, file_id: u64) -> Result<(), PodioError> {
        self.require_kind(FieldType::Image)?;
        self.push_value(json!({ "value": file_id }));
        Ok(())
    }

    pub fn set_progress(&mut self, percent: u8) -> Result<(), PodioError> {
        self.require_kind(FieldType::Progress)?;
        if percent > 100 {
            return Err(PodioError::TypeMismatch {
                expected: "progress percentage between 0 and 100".to_string(),
                found: percent.to_string(),
            });
        }
        self.replace_values(vec![json!({ "value": percent })]);
        Ok(())
    }

    /// Replace all values with a reference to a single item.
    pub fn set_app_item(&mut self, item_id: u64) -> Result<(), PodioError> {
        self.require_kind(FieldType::App)?;
        self.replace_values(vec![json!({ "value": item_id })]);
        Ok(())
    }

    pub fn add_app_item(&mut self, item_id: u64) -> Result<(), PodioError> {
        self.require_kind(FieldType::App)?;
        self.push_value(json!({ "value": item_id }));
        Ok(())
    }

    pub fn set_contact(&mut self, profile_id: u64) -> Result<(), PodioError> {
        self.require_kind(FieldType::Contact)?;
        self.replace_values(vec![json!({ "value": profile_id })]);
        Ok(())
    }

    pub fn set_duration(&mut self, seconds: u32) -> Result<(), PodioError> {
        self.require_kind(FieldType::Duration)?;
        self.replace_values(vec![json!({ "value": seconds })]);
        Ok(())
    }
}

fn decode_values(kind: FieldType, raw: &[Value]) -> Result<FieldValues, PodioError> {
    match kind {
        FieldType::Text => collect(raw, text_entry).map(FieldValues::Text),
        FieldType::Number => collect(raw, number_entry).map(FieldValues::Number),
        FieldType::Category => collect(raw, category_entry).map(FieldValues::Category),
        FieldType::Date => collect(raw, date_entry).map(FieldValues::Date),
        FieldType::Money => collect(raw, money_entry).map(FieldValues::Money),
        FieldType::Image => collect(raw, |entry| id_entry("file id", entry)).map(FieldValues::Image),
        FieldType::Progress => collect(raw, progress_entry).map(FieldValues::Progress),
        FieldType::App => collect(raw, app_entry).map(FieldValues::App),
        FieldType::Contact => collect(raw, contact_entry).map(FieldValues::Contact),
        FieldType::Duration => collect(raw, duration_entry).map(FieldValues::Duration),
        FieldType::Calculation | FieldType::Embed | FieldType::Location | FieldType::Unknown => {
            Ok(FieldValues::Raw(raw.to_vec()))
        }
    }
}

fn collect<T>(
    raw: &[Value],
    entry: impl Fn(&Value) -> Result<T, PodioError>,
) -> Result<Vec<T>, PodioError> {
    raw.iter().map(entry).collect()
}

fn value_key(entry: &Value) -> Result<&Value, PodioError> {
    entry
        .get("value")
        .ok_or_else(|| PodioError::value_mismatch("an entry with a \"value\" key", entry))
}

fn text_entry(entry: &Value) -> Result<String, PodioError> {
    value_key(entry)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PodioError::value_mismatch("a string text value", entry))
}

fn number_entry(entry: &Value) -> Result<f64, PodioError> {
    match value_key(entry)? {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| PodioError::value_mismatch("a numeric value", entry)),
        Value::String(raw) => raw
            .parse()
            .map_err(|_| PodioError::value_mismatch("a numeric value", entry)),
        _ => Err(PodioError::value_mismatch("a numeric value", entry)),
    }
}

fn category_entry(entry: &Value) -> Result<CategoryOption, PodioError> {
    match value_key(entry)? {
        value @ Value::Object(_) => serde_json::from_value(value.clone())
            .map_err(|_| PodioError::value_mismatch("a category option", entry)),
        Value::Number(number) => number
            .as_u64()
            .map(|id| CategoryOption {
                id,
                text: None,
                color: None,
            })
            .ok_or_else(|| PodioError::value_mismatch("a category option", entry)),
        _ => Err(PodioError::value_mismatch("a category option", entry)),
    }
}

// Date entries carry start/end at the top level, not under "value".
fn date_entry(entry: &Value) -> Result<DateRange, PodioError> {
    let timestamp = |key: &str| -> Result<Option<NaiveDateTime>, PodioError> {
        match entry.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => dates::parse(raw)
                .map(Some)
                .ok_or_else(|| PodioError::value_mismatch("a timestamp", entry)),
            Some(_) => Err(PodioError::value_mismatch("a timestamp", entry)),
        }
    };
    Ok(DateRange {
        start: timestamp("start")?,
        end: timestamp("end")?,
    })
}

fn money_entry(entry: &Value) -> Result<MoneyAmount, PodioError> {
    let amount = match entry.get("value") {
        Some(Value::String(raw)) => raw.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => return Err(PodioError::value_mismatch("a money amount", entry)),
    };
    let currency = entry
        .str_of("currency")
        .ok_or_else(|| PodioError::value_mismatch("a currency code", entry))?
        .to_string();
    Ok(MoneyAmount { amount, currency })
}

fn id_entry(label: &str, entry: &Value) -> Result<u64, PodioError> {
    value_key(entry)?
        .as_u64()
        .ok_or_else(|| PodioError::value_mismatch(label, entry))
}

fn progress_entry(entry: &Value) -> Result<u8, PodioError> {
    value_key(entry)?
        .as_u64()
        .filter(|percent| *percent <= 100)
        .map(|percent| percent as u8)
        .ok_or_else(|| PodioError::value_mismatch("a progress percentage", entry))
}

fn app_entry(entry: &Value) -> Result<ItemReference, PodioError> {
    match value_key(entry)? {
        value @ Value::Object(_) => value
            .u64_of("item_id")
            .map(|item_id| ItemReference {
                item_id,
                title: value.str_of("title").map(str::to_string),
            })
            .ok_or_else(|| PodioError::value_mismatch("an item reference", entry)),
        Value::Number(number) => number
            .as_u64()
            .map(|item_id| ItemReference {
                item_id,
                title: None,
            })
            .ok_or_else(|| PodioError::value_mismatch("an item reference", entry)),
        _ => Err(PodioError::value_mismatch("an item reference", entry)),
    }
}

fn contact_entry(entry: &Value) -> Result<ContactReference, PodioError> {
    match value_key(entry)? {
        value @ Value::Object(_) => value
            .u64_of("profile_id")
            .map(|profile_id| ContactReference {
                profile_id,
                name: value.str_of("name").map(str::to_string),
            })
            .ok_or_else(|| PodioError::value_mismatch("a contact reference", entry)),
        Value::Number(number) => number
            .as_u64()
            .map(|profile_id| ContactReference {
                profile_id,
                name: None,
            })
            .ok_or_else(|| PodioError::value_mismatch("a contact reference", entry)),
        _ => Err(PodioError::value_mismatch("a contact reference", entry)),
    }
}

fn duration_entry(entry: &Value) -> Result<u32, PodioError> {
    value_key(entry)?
        .as_u64()
        .and_then(|seconds| u32::try_from(seconds).ok())
        .ok_or_else(|| PodioError::value_mismatch("a duration in seconds", entry))
}
