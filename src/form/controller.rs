use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::input::InputKind;
use super::validation::{FieldErrors, FieldLens, FormModel, FormValidator, ValidationError};

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

/// Name of a single field of a [`FormModel`]. Only produced by lenses, so every
/// key a controller stores belongs to its model.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct FieldKey(&'static str);

impl FieldKey {
    #[doc(hidden)]
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// How the last accepted submit attempt ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum SubmitOutcome {
    /// Validation reported errors; the submit action was not called.
    Invalid,
    Succeeded,
    /// The submit action returned an error. It was logged and swallowed.
    Failed,
}

/// What `submit` does when called while an earlier submit has not settled,
/// whether it is still validating or awaiting its action.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SubmitReentry {
    /// Refuse with [`FormError::AlreadySubmitting`] and leave state untouched.
    #[default]
    Reject,
    /// Run the second submit as well. Both actions may be in flight at once
    /// and `is_submitting` stays set until the last one settles.
    Allow,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FormOptions {
    pub reset_after_submit: bool,
    pub reentry: SubmitReentry,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldMeta<E> {
    pub touched: bool,
    pub error: Option<E>,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FormSnapshot<T, E> {
    pub form_id: FormId,
    pub values: T,
    pub errors: BTreeMap<FieldKey, E>,
    pub touched: BTreeMap<FieldKey, bool>,
    pub is_submitting: bool,
    pub is_dirty: bool,
    pub is_valid: bool,
    pub submit_count: u32,
    pub last_outcome: Option<SubmitOutcome>,
}

impl<T, E> FormSnapshot<T, E> {
    pub fn is_touched(&self, key: FieldKey) -> bool {
        self.touched.get(&key).copied().unwrap_or(false)
    }

    pub fn error(&self, key: FieldKey) -> Option<&E> {
        self.errors.get(&key)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error("form submit is already in progress")]
    AlreadySubmitting,
    #[error("field `{field}` cannot take {kind} input: {reason}")]
    InvalidInput {
        field: FieldKey,
        kind: InputKind,
        reason: String,
    },
}

pub type FormResult<T> = Result<T, FormError>;

pub type SubmitFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

pub(super) type SubmitActionFn<T> = Arc<dyn Fn(T) -> SubmitFuture + Send + Sync>;
pub(super) type SyncFormValidatorFn<T, E> = Arc<dyn Fn(&T) -> FieldErrors<E> + Send + Sync>;

pub(super) struct FormState<T, E> {
    pub(super) id: FormId,
    pub(super) initial_values: T,
    pub(super) values: T,
    pub(super) errors: BTreeMap<FieldKey, E>,
    pub(super) touched: BTreeMap<FieldKey, bool>,
    pub(super) dirty: bool,
    /// Accepted submits that have not settled, validation included.
    pub(super) pending: u32,
    pub(super) in_flight: u32,
    pub(super) submit_count: u32,
    pub(super) last_outcome: Option<SubmitOutcome>,
}

impl<T: Clone, E> FormState<T, E> {
    pub(super) fn reset(&mut self) {
        self.values = self.initial_values.clone();
        self.errors.clear();
        self.touched.clear();
        self.dirty = false;
    }
}

/// Headless form state: values, per-field errors and touched flags, dirty and
/// submitting flags, plus the caller's validator and submit action.
///
/// Cloning is cheap and every clone drives the same form, so a host can keep
/// feeding change and blur events while a submit awaits its action.
#[derive(Clone)]
pub struct FormController<T, E = String>
where
    T: FormModel,
    E: ValidationError,
{
    pub(super) options: FormOptions,
    pub(super) state: Arc<RwLock<FormState<T, E>>>,
    pub(super) validator: Option<SyncFormValidatorFn<T, E>>,
    pub(super) on_submit: SubmitActionFn<T>,
}

impl<T, E> FormController<T, E>
where
    T: FormModel,
    E: ValidationError,
{
    /// Creates a form whose submit action is asynchronous.
    pub fn new<F, Fut>(initial: T, options: FormOptions, on_submit: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let action: SubmitActionFn<T> =
            Arc::new(move |values: T| -> SubmitFuture { Box::pin(on_submit(values)) });
        Self::with_action(initial, options, action)
    }

    /// Creates a form whose submit action runs to completion synchronously.
    pub fn new_sync<F>(initial: T, options: FormOptions, on_submit: F) -> Self
    where
        F: Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let action: SubmitActionFn<T> = Arc::new(move |values: T| -> SubmitFuture {
            let result = on_submit(&values);
            Box::pin(std::future::ready(result))
        });
        Self::with_action(initial, options, action)
    }

    fn with_action(initial: T, options: FormOptions, on_submit: SubmitActionFn<T>) -> Self {
        Self {
            options,
            state: Arc::new(RwLock::new(FormState {
                id: FormId::next(),
                initial_values: initial.clone(),
                values: initial,
                errors: BTreeMap::new(),
                touched: BTreeMap::new(),
                dirty: false,
                pending: 0,
                in_flight: 0,
                submit_count: 0,
                last_outcome: None,
            })),
            validator: None,
            on_submit,
        }
    }

    /// Installs the whole-form validator. Meant to be called while building
    /// the controller, before it is cloned.
    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: FormValidator<T, E> + 'static,
    {
        let validator = Arc::new(validator);
        self.validator = Some(Arc::new(move |values: &T| validator.validate(values)));
        self
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    pub fn form_id(&self) -> FormResult<FormId> {
        Ok(read_lock(&self.state, "reading form id")?.id)
    }

    /// Validates, then runs the submit action with a snapshot of the values.
    ///
    /// Every field is marked touched first. A validator result with errors
    /// replaces the error map and ends the attempt as
    /// [`SubmitOutcome::Invalid`]. A failing action is logged and reported as
    /// [`SubmitOutcome::Failed`]; it never populates field errors.
    pub async fn submit(&self) -> FormResult<SubmitOutcome> {
        let (mut slot, form_id, values) = {
            let mut state = write_lock(&self.state, "preparing submit")?;
            if self.rejects_reentry(&state) {
                tracing::warn!(form_id = state.id.0, "submit ignored, one is already pending");
                return Err(FormError::AlreadySubmitting);
            }
            state.pending += 1;
            let slot = SubmitSlot {
                state: Arc::clone(&self.state),
                running: false,
            };
            for key in T::field_keys() {
                state.touched.insert(*key, true);
            }
            state.submit_count = state.submit_count.saturating_add(1);
            (slot, state.id, state.values.clone())
        };

        if let Some(pass) = self.run_validator(&values) {
            let passed = pass.passed();
            let mut state = write_lock(&self.state, "applying submit validation result")?;
            let invalid_fields = pass.errors.len() + pass.unknown_fields;
            state.errors = pass.errors;
            if !passed {
                state.last_outcome = Some(SubmitOutcome::Invalid);
                tracing::debug!(form_id = form_id.0, invalid_fields, "submit stopped by validation");
                return Ok(SubmitOutcome::Invalid);
            }
        }

        write_lock(&self.state, "marking submit in flight")?.in_flight += 1;
        slot.running = true;

        tracing::debug!(form_id = form_id.0, "running submit action");
        let outcome = match (self.on_submit)(values).await {
            Ok(()) => SubmitOutcome::Succeeded,
            Err(error) => {
                tracing::error!(form_id = form_id.0, "form submit action failed: {error:#}");
                SubmitOutcome::Failed
            }
        };

        {
            let mut state = write_lock(&self.state, "completing submit")?;
            if outcome == SubmitOutcome::Succeeded && self.options.reset_after_submit {
                state.reset();
            }
            state.last_outcome = Some(outcome);
        }
        tracing::debug!(form_id = form_id.0, ?outcome, "submit settled");
        Ok(outcome)
    }

    fn rejects_reentry(&self, state: &FormState<T, E>) -> bool {
        self.options.reentry == SubmitReentry::Reject && state.pending > 0
    }

    pub fn reset_form(&self) -> FormResult<()> {
        write_lock(&self.state, "resetting form")?.reset();
        Ok(())
    }

    /// Restores one field to its initial value and forgets its error and
    /// touched flag. The form-wide dirty flag is left as is.
    pub fn reset_field<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let mut state = write_lock(&self.state, "resetting field")?;
        let initial_value = lens.get(&state.initial_values).clone();
        lens.set(&mut state.values, initial_value);
        state.errors.remove(&key);
        state.touched.remove(&key);
        Ok(())
    }

    pub fn clear_errors(&self) -> FormResult<()> {
        write_lock(&self.state, "clearing all field errors")?
            .errors
            .clear();
        Ok(())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<T, E>> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            form_id: state.id,
            values: state.values.clone(),
            errors: state.errors.clone(),
            touched: state.touched.clone(),
            is_submitting: state.in_flight > 0,
            is_dirty: state.dirty,
            is_valid: state.errors.is_empty(),
            submit_count: state.submit_count,
            last_outcome: state.last_outcome,
        })
    }

    pub fn value<L>(&self, lens: L) -> FormResult<L::Value>
    where
        L: FieldLens<T>,
    {
        Ok(lens
            .get(&read_lock(&self.state, "reading field value")?.values)
            .clone())
    }

    pub fn field_meta<L>(&self, lens: L) -> FormResult<FieldMeta<E>>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let state = read_lock(&self.state, "reading field meta")?;
        Ok(FieldMeta {
            touched: state.touched.get(&key).copied().unwrap_or(false),
            error: state.errors.get(&key).cloned(),
        })
    }

    /// True when the last validation pass left no errors. Not a live check.
    pub fn is_valid(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading validity")?.errors.is_empty())
    }

    pub fn is_dirty(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading dirty flag")?.dirty)
    }

    pub fn is_submitting(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading submitting flag")?.in_flight > 0)
    }
}

/// One accepted submit, held from the first state write until it settles.
/// Dropping it releases the slot (and the in-flight mark once the action has
/// started) whether the submit finished, failed, panicked or was dropped
/// mid-await. Must not be dropped while a state guard is held.
struct SubmitSlot<T, E> {
    state: Arc<RwLock<FormState<T, E>>>,
    running: bool,
}

impl<T, E> Drop for SubmitSlot<T, E> {
    fn drop(&mut self) {
        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.pending = state.pending.saturating_sub(1);
        if self.running {
            state.in_flight = state.in_flight.saturating_sub(1);
        }
    }
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
