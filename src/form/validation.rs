use std::borrow::Cow;
use std::collections::BTreeMap;

use super::controller::{FieldKey, FormController, FormResult, read_lock, write_lock};

/// Field error produced by a caller's validator. The controller never invents
/// messages of its own.
pub trait ValidationError: Clone + Send + Sync + 'static {
    fn message(&self) -> &str;
}

impl ValidationError for String {
    fn message(&self) -> &str {
        self
    }
}

impl ValidationError for &'static str {
    fn message(&self) -> &str {
        self
    }
}

impl ValidationError for Cow<'static, str> {
    fn message(&self) -> &str {
        self
    }
}

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

/// A value bag with a fixed, closed set of fields. Usually derived.
pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;

    /// Every field of the model, in declaration order.
    fn field_keys() -> &'static [FieldKey];
}

/// Validator output: at most one error per field, absent key means valid.
pub type FieldErrors<E = String> = BTreeMap<FieldKey, E>;

pub trait FormValidator<T, E>: Send + Sync
where
    E: ValidationError,
{
    fn validate(&self, model: &T) -> FieldErrors<E>;
}

impl<T, E, F> FormValidator<T, E> for F
where
    E: ValidationError,
    F: Fn(&T) -> FieldErrors<E> + Send + Sync,
{
    fn validate(&self, model: &T) -> FieldErrors<E> {
        (self)(model)
    }
}

impl<T, E> FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    /// Marks the field touched and, if the validator flags it, records the
    /// error. A blur never removes an existing error; only an edit of the
    /// field or a submit pass does.
    pub fn handle_blur<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let values = {
            let mut state = write_lock(&self.state, "touching field")?;
            state.touched.insert(key, true);
            if self.validator.is_none() {
                return Ok(());
            }
            state.values.clone()
        };

        let Some(mut pass) = self.run_validator(&values) else {
            return Ok(());
        };
        if let Some(error) = pass.errors.remove(&key) {
            tracing::trace!(field = %key, "blur validation flagged field");
            write_lock(&self.state, "writing blur validation result")?
                .errors
                .insert(key, error);
        }
        Ok(())
    }

    pub fn set_field_error<L>(&self, lens: L, error: E) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        write_lock(&self.state, "setting field error")?
            .errors
            .insert(lens.key(), error);
        Ok(())
    }

    pub fn clear_field_error<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        write_lock(&self.state, "clearing field error")?
            .errors
            .remove(&lens.key());
        Ok(())
    }

    pub fn set_field_touched<L>(&self, lens: L, touched: bool) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        write_lock(&self.state, "setting field touched")?
            .touched
            .insert(lens.key(), touched);
        Ok(())
    }

    /// Replaces the error map with a fresh validator pass over the current
    /// values, without touching fields or submitting. Returns the new validity.
    pub fn validate_form(&self) -> FormResult<bool> {
        let values = read_lock(&self.state, "reading values for form validation")?
            .values
            .clone();
        let Some(pass) = self.run_validator(&values) else {
            return self.is_valid();
        };
        let passed = pass.passed();
        write_lock(&self.state, "applying form validation result")?.errors = pass.errors;
        Ok(passed)
    }

    /// Runs the configured validator. Errors for fields the model does not
    /// have are dropped from the map but still count against the pass.
    /// `None` when no validator is configured.
    pub(super) fn run_validator(&self, values: &T) -> Option<ValidationPass<E>> {
        let validator = self.validator.as_ref()?;
        let mut errors = validator(values);
        let mut unknown_fields = 0;
        errors.retain(|key, _| {
            let known = T::field_keys().contains(key);
            if !known {
                unknown_fields += 1;
                tracing::warn!(field = %key, "validator reported an unknown field");
            }
            known
        });
        Some(ValidationPass {
            errors,
            unknown_fields,
        })
    }
}

pub(super) struct ValidationPass<E> {
    pub(super) errors: FieldErrors<E>,
    pub(super) unknown_fields: usize,
}

impl<E> ValidationPass<E> {
    pub(super) fn passed(&self) -> bool {
        self.errors.is_empty() && self.unknown_fields == 0
    }
}
