use super::{is_blank, is_email, normalize_phone};
use crate::form::{FieldErrors, FieldLens, FormModel};

pub const BOOKING_NOTES_MAX_CHARS: usize = 500;

/// Contact step of the public booking flow, filled in once the client has
/// picked a service, a professional and a slot.
#[derive(Clone, Debug, Default, PartialEq, FormModel)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BookingForm {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub notes: String,
    pub accept_terms: bool,
}

pub fn validate_booking(form: &BookingForm) -> FieldErrors {
    let fields = BookingForm::fields();
    let mut errors = FieldErrors::new();

    if is_blank(&form.client_name) {
        errors.insert(fields.client_name().key(), "Le nom est requis".to_string());
    }

    if is_blank(&form.client_email) {
        errors.insert(fields.client_email().key(), "L'email est requis".to_string());
    } else if !is_email(&form.client_email) {
        errors.insert(fields.client_email().key(), "L'email est invalide".to_string());
    }

    if is_blank(&form.client_phone) {
        errors.insert(
            fields.client_phone().key(),
            "Le numéro de téléphone est requis".to_string(),
        );
    } else if normalize_phone(&form.client_phone).is_none() {
        errors.insert(
            fields.client_phone().key(),
            "Le numéro de téléphone doit contenir 10 chiffres".to_string(),
        );
    }

    if form.notes.chars().count() > BOOKING_NOTES_MAX_CHARS {
        errors.insert(
            fields.notes().key(),
            format!("Les notes ne peuvent pas dépasser {BOOKING_NOTES_MAX_CHARS} caractères"),
        );
    }

    if !form.accept_terms {
        errors.insert(
            fields.accept_terms().key(),
            "Vous devez accepter les conditions".to_string(),
        );
    }

    errors
}
