mod controller;
mod input;
mod validation;


pub use controller::{
    FieldKey, FieldMeta, FormController, FormError, FormId, FormOptions, FormResult, FormSnapshot,
    SubmitFuture, SubmitOutcome, SubmitReentry,
};
pub use input::{
    ChangeEvent, FieldValue, InputKind, InputValue, Numeric, SubmitEvent, SubmitRequest,
};
pub use salonkit_form_derive::FormModel;
pub use validation::{FieldErrors, FieldLens, FormModel, FormValidator, ValidationError};
