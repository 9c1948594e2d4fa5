use chrono::NaiveDate;

use super::is_blank;
use crate::form::{FieldErrors, FieldKey, FieldLens, FormModel};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A period during which a staff member takes no bookings.
#[derive(Clone, Debug, Default, PartialEq, FormModel)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbsenceForm {
    pub staff_id: String,
    pub start_date: String,
    pub end_date: String,
    pub reason: String,
    pub all_day: bool,
}

impl AbsenceForm {
    /// Number of calendar days covered, both ends included. `None` until both
    /// dates parse and are in order.
    pub fn day_count(&self) -> Option<i64> {
        let start = parse_date(&self.start_date)?;
        let end = parse_date(&self.end_date)?;
        (end >= start).then(|| (end - start).num_days() + 1)
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

fn check_date(
    errors: &mut FieldErrors,
    key: FieldKey,
    value: &str,
    required: &str,
    invalid: &str,
) -> Option<NaiveDate> {
    if is_blank(value) {
        errors.insert(key, required.to_string());
        return None;
    }
    let parsed = parse_date(value);
    if parsed.is_none() {
        errors.insert(key, invalid.to_string());
    }
    parsed
}

pub fn validate_absence(form: &AbsenceForm) -> FieldErrors {
    let fields = AbsenceForm::fields();
    let mut errors = FieldErrors::new();

    if is_blank(&form.staff_id) {
        errors.insert(
            fields.staff_id().key(),
            "Le membre de l'équipe est requis".to_string(),
        );
    }

    let start = check_date(
        &mut errors,
        fields.start_date().key(),
        &form.start_date,
        "La date de début est requise",
        "La date de début est invalide",
    );
    let end = check_date(
        &mut errors,
        fields.end_date().key(),
        &form.end_date,
        "La date de fin est requise",
        "La date de fin est invalide",
    );
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        errors.insert(
            fields.end_date().key(),
            "La date de fin doit être postérieure à la date de début".to_string(),
        );
    }

    if is_blank(&form.reason) {
        errors.insert(fields.reason().key(), "Le motif est requis".to_string());
    }

    errors
}
