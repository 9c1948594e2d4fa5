//! Typed forms submitted by the salon dashboard and the client booking flow,
//! with the validators the platform runs on them.

mod absence;
mod booking;
mod service;
mod staff;

pub use absence::{AbsenceForm, AbsenceFormFields, validate_absence};
pub use booking::{BOOKING_NOTES_MAX_CHARS, BookingForm, BookingFormFields, validate_booking};
pub use service::{ServiceForm, ServiceFormFields, validate_service};
pub use staff::{STAFF_ROLES, StaffForm, StaffFormFields, validate_staff};

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Loose shape check: one `@`, a non-empty local part, and a dotted domain.
pub(crate) fn is_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Normalizes a French phone number to its ten-digit national form.
pub(crate) fn normalize_phone(value: &str) -> Option<String> {
    let compact = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-'))
        .collect::<String>();
    let national = match compact.strip_prefix("+33") {
        Some(rest) => format!("0{rest}"),
        None => compact,
    };
    (national.len() == 10 && national.chars().all(|c| c.is_ascii_digit())).then_some(national)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_check() {
        assert!(is_email("nina@salon.fr"));
        assert!(is_email("  nina.b@mail.salon.fr "));
        assert!(!is_email("nina@salon"));
        assert!(!is_email("@salon.fr"));
        assert!(!is_email("nina@@salon.fr"));
        assert!(!is_email("ni na@salon.fr"));
    }

    #[test]
    fn phone_normalization() {
        assert_eq!(normalize_phone("06 12 34 56 78").as_deref(), Some("0612345678"));
        assert_eq!(normalize_phone("+33 6.12.34.56.78").as_deref(), Some("0612345678"));
        assert_eq!(normalize_phone("06 12 34"), None);
        assert_eq!(normalize_phone("06 12 34 56 7a"), None);
    }
}
