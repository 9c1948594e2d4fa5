use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rust_decimal::Decimal;

use super::controller::{
    FormController, FormError, FormResult, SubmitOutcome, read_lock, write_lock,
};
use super::validation::{FieldLens, FormModel, ValidationError};

/// The `type` of the host control that produced a change event.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum InputKind {
    #[default]
    Text,
    Email,
    Password,
    Search,
    Tel,
    Url,
    Date,
    Time,
    DateTimeLocal,
    Select,
    Textarea,
    Radio,
    Checkbox,
    Number,
}

impl InputKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Email => "email",
            InputKind::Password => "password",
            InputKind::Search => "search",
            InputKind::Tel => "tel",
            InputKind::Url => "url",
            InputKind::Date => "date",
            InputKind::Time => "time",
            InputKind::DateTimeLocal => "datetime-local",
            InputKind::Select => "select",
            InputKind::Textarea => "textarea",
            InputKind::Radio => "radio",
            InputKind::Checkbox => "checkbox",
            InputKind::Number => "number",
        }
    }
}

impl Display for InputKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a host `type` attribute. Unknown kinds behave like plain text.
impl From<&str> for InputKind {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "email" => InputKind::Email,
            "password" => InputKind::Password,
            "search" => InputKind::Search,
            "tel" => InputKind::Tel,
            "url" => InputKind::Url,
            "date" => InputKind::Date,
            "time" => InputKind::Time,
            "datetime-local" => InputKind::DateTimeLocal,
            "select" | "select-one" => InputKind::Select,
            "textarea" => InputKind::Textarea,
            "radio" => InputKind::Radio,
            "checkbox" => InputKind::Checkbox,
            "number" | "range" => InputKind::Number,
            _ => InputKind::Text,
        }
    }
}

/// Value of a number-typed field. `Empty` is what a cleared input holds, which
/// is not the same thing as zero.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Numeric {
    #[default]
    Empty,
    Value(Decimal),
}

impl Numeric {
    pub fn is_empty(self) -> bool {
        matches!(self, Numeric::Empty)
    }

    pub fn as_decimal(self) -> Option<Decimal> {
        match self {
            Numeric::Empty => None,
            Numeric::Value(value) => Some(value),
        }
    }
}

impl From<Decimal> for Numeric {
    fn from(value: Decimal) -> Self {
        Numeric::Value(value)
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::Value(Decimal::from(value))
    }
}

impl From<i32> for Numeric {
    fn from(value: i32) -> Self {
        Numeric::Value(Decimal::from(value))
    }
}

impl From<u32> for Numeric {
    fn from(value: u32) -> Self {
        Numeric::Value(Decimal::from(value))
    }
}

impl Display for Numeric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Numeric::Empty => Ok(()),
            Numeric::Value(value) => Display::fmt(value, f),
        }
    }
}

/// Parses raw number input. Only the empty string is `Empty`; blank input
/// counts as zero and `1_000` is rejected, as numeric conversion does on the web.
impl FromStr for Numeric {
    type Err = rust_decimal::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() {
            return Ok(Numeric::Empty);
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Numeric::Value(Decimal::ZERO));
        }
        // Digit separators are not numbers on the web.
        if trimmed.contains('_') {
            return Err(rust_decimal::Error::ErrorString(format!(
                "invalid number: {trimmed}"
            )));
        }
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Numeric::Value)
    }
}

/// A change event after coercion by input kind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InputValue {
    Text(String),
    Bool(bool),
    Number(Numeric),
}

impl InputValue {
    fn describe(&self) -> &'static str {
        match self {
            InputValue::Text(_) => "text",
            InputValue::Bool(_) => "boolean",
            InputValue::Number(_) => "numeric",
        }
    }
}

/// Field types that can be written from a coerced change event.
pub trait FieldValue: Sized {
    fn from_input(value: InputValue) -> Option<Self>;
}

impl FieldValue for String {
    fn from_input(value: InputValue) -> Option<Self> {
        match value {
            InputValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    fn from_input(value: InputValue) -> Option<Self> {
        match value {
            InputValue::Bool(checked) => Some(checked),
            _ => None,
        }
    }
}

impl FieldValue for Numeric {
    fn from_input(value: InputValue) -> Option<Self> {
        match value {
            InputValue::Number(number) => Some(number),
            _ => None,
        }
    }
}

impl FieldValue for Option<Decimal> {
    fn from_input(value: InputValue) -> Option<Self> {
        match value {
            InputValue::Number(number) => Some(number.as_decimal()),
            _ => None,
        }
    }
}

/// A change event as the host delivers it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ChangeEvent {
    pub kind: InputKind,
    pub value: String,
    pub checked: bool,
}

impl ChangeEvent {
    pub fn new(kind: impl Into<InputKind>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            checked: false,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(InputKind::Text, value)
    }

    pub fn number(value: impl Into<String>) -> Self {
        Self::new(InputKind::Number, value)
    }

    pub fn checkbox(checked: bool) -> Self {
        Self {
            kind: InputKind::Checkbox,
            value: "on".to_string(),
            checked,
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Checkbox input becomes its checked flag whatever the raw value, number
    /// input becomes a [`Numeric`], anything else stays a string.
    pub fn into_value(self) -> Result<InputValue, rust_decimal::Error> {
        Ok(match self.kind {
            InputKind::Checkbox => InputValue::Bool(self.checked),
            InputKind::Number => InputValue::Number(self.value.parse()?),
            _ => InputValue::Text(self.value),
        })
    }
}

/// Host submit event whose default handling must be suppressed.
pub trait SubmitEvent {
    fn prevent_default(&mut self);
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SubmitRequest {
    default_prevented: bool,
}

impl SubmitRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl SubmitEvent for SubmitRequest {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

impl<T, E> FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    /// Coerces the event, writes the field, marks the form dirty and drops the
    /// field's error without revalidating. On a coercion failure nothing changes.
    pub fn handle_change<L>(&self, lens: L, event: ChangeEvent) -> FormResult<()>
    where
        L: FieldLens<T>,
        L::Value: FieldValue,
    {
        let key = lens.key();
        let kind = event.kind;
        let input = event
            .into_value()
            .map_err(|error| FormError::InvalidInput {
                field: key,
                kind,
                reason: error.to_string(),
            })?;
        let described = input.describe();
        let value = L::Value::from_input(input).ok_or_else(|| FormError::InvalidInput {
            field: key,
            kind,
            reason: format!("field does not hold {described} values"),
        })?;

        let mut state = write_lock(&self.state, "applying field change")?;
        lens.set(&mut state.values, value);
        state.dirty = true;
        state.errors.remove(&key);
        tracing::trace!(form_id = state.id.0, field = %key, %kind, "field changed");
        Ok(())
    }

    /// Writes a value directly, without coercion. Marks the form dirty.
    pub fn set_field_value<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let mut state = write_lock(&self.state, "writing field value")?;
        lens.set(&mut state.values, value);
        state.dirty = true;
        Ok(())
    }

    /// Suppresses the host's default submit handling, then submits.
    pub async fn handle_submit<S>(&self, event: &mut S) -> FormResult<SubmitOutcome>
    where
        S: SubmitEvent + ?Sized,
    {
        event.prevent_default();
        self.submit().await
    }

    /// The field's error message, once the user has left the field or tried
    /// to submit.
    pub fn field_error_for_display<L>(&self, lens: L) -> FormResult<Option<String>>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let state = read_lock(&self.state, "reading display error message")?;
        let touched = state.touched.get(&key).copied().unwrap_or(false);
        if !touched && state.submit_count == 0 {
            return Ok(None);
        }
        Ok(state
            .errors
            .get(&key)
            .map(|error| error.message().to_owned()))
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use std::fmt::Formatter;

    use rust_decimal::Decimal;
    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Numeric;

    impl Serialize for Numeric {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Numeric::Empty => serializer.serialize_str(""),
                Numeric::Value(value) => Serialize::serialize(value, serializer),
            }
        }
    }

    struct NumericVisitor;

    impl Visitor<'_> for NumericVisitor {
        type Value = Numeric;

        fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str("a number, a numeric string or an empty string")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Numeric, E> {
            value.parse().map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Numeric, E> {
            Ok(Numeric::from(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Numeric, E> {
            Ok(Numeric::Value(Decimal::from(value)))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Numeric, E> {
            Decimal::try_from(value)
                .map(Numeric::Value)
                .map_err(E::custom)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Numeric, E> {
            Ok(Numeric::Empty)
        }
    }

    impl<'de> Deserialize<'de> for Numeric {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(NumericVisitor)
        }
    }
}
