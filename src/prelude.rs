pub use crate::form::{
    ChangeEvent, FieldErrors, FieldKey, FieldLens, FormController, FormError, FormModel,
    FormOptions, FormResult, FormSnapshot, InputKind, Numeric, SubmitEvent, SubmitOutcome,
    SubmitReentry, SubmitRequest, ValidationError,
};
pub use crate::salon::{
    AbsenceForm, BookingForm, ServiceForm, StaffForm, validate_absence, validate_booking,
    validate_service, validate_staff,
};
