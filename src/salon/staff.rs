use super::{is_blank, is_email, normalize_phone};
use crate::form::{FieldErrors, FieldLens, FormModel};

pub const STAFF_ROLES: [&str; 3] = ["owner", "manager", "staff"];

#[derive(Clone, Debug, PartialEq, FormModel)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaffForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub active: bool,
}

impl Default for StaffForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            role: "staff".to_string(),
            active: true,
        }
    }
}

pub fn validate_staff(form: &StaffForm) -> FieldErrors {
    let fields = StaffForm::fields();
    let mut errors = FieldErrors::new();

    if is_blank(&form.first_name) {
        errors.insert(fields.first_name().key(), "Le prénom est requis".to_string());
    }
    if is_blank(&form.last_name) {
        errors.insert(fields.last_name().key(), "Le nom est requis".to_string());
    }

    if is_blank(&form.email) {
        errors.insert(fields.email().key(), "L'email est requis".to_string());
    } else if !is_email(&form.email) {
        errors.insert(fields.email().key(), "L'email est invalide".to_string());
    }

    // Phone is optional for staff.
    if !is_blank(&form.phone) && normalize_phone(&form.phone).is_none() {
        errors.insert(
            fields.phone().key(),
            "Le numéro de téléphone doit contenir 10 chiffres".to_string(),
        );
    }

    if !STAFF_ROLES.contains(&form.role.as_str()) {
        errors.insert(fields.role().key(), "Le rôle est invalide".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stylist() -> StaffForm {
        StaffForm {
            first_name: "Nina".to_string(),
            last_name: "Bernard".to_string(),
            email: "nina@salon.fr".to_string(),
            ..StaffForm::default()
        }
    }

    #[test]
    fn stylist_without_phone_is_valid() {
        assert!(validate_staff(&stylist()).is_empty());
    }

    #[test]
    fn malformed_email_and_phone_are_reported() {
        let fields = StaffForm::fields();
        let form = StaffForm {
            email: "nina-at-salon".to_string(),
            phone: "06 12".to_string(),
            ..stylist()
        };
        let errors = validate_staff(&form);
        assert_eq!(
            errors.get(&fields.email().key()).map(String::as_str),
            Some("L'email est invalide")
        );
        assert!(errors.contains_key(&fields.phone().key()));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let form = StaffForm {
            role: "intern".to_string(),
            ..stylist()
        };
        assert!(validate_staff(&form).contains_key(&StaffForm::fields().role().key()));
    }

    #[test]
    fn names_are_required() {
        let fields = StaffForm::fields();
        let errors = validate_staff(&StaffForm {
            first_name: " ".to_string(),
            last_name: String::new(),
            ..stylist()
        });
        assert!(errors.contains_key(&fields.first_name().key()));
        assert!(errors.contains_key(&fields.last_name().key()));
    }
}
