use rust_decimal::Decimal;

use super::is_blank;
use crate::form::{FieldErrors, FieldLens, FormModel, Numeric};

/// A bookable service in the salon catalogue.
#[derive(Clone, Debug, PartialEq, FormModel)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceForm {
    pub name: String,
    pub description: String,
    pub duration_minutes: Numeric,
    pub price: Numeric,
    pub active: bool,
}

impl Default for ServiceForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            duration_minutes: Numeric::Empty,
            price: Numeric::Empty,
            active: true,
        }
    }
}

pub fn validate_service(form: &ServiceForm) -> FieldErrors {
    let fields = ServiceForm::fields();
    let mut errors = FieldErrors::new();

    if is_blank(&form.name) {
        errors.insert(fields.name().key(), "Le nom est requis".to_string());
    }

    match form.duration_minutes.as_decimal() {
        None => {
            errors.insert(
                fields.duration_minutes().key(),
                "La durée est requise".to_string(),
            );
        }
        Some(minutes) if minutes <= Decimal::ZERO || !minutes.fract().is_zero() => {
            errors.insert(
                fields.duration_minutes().key(),
                "La durée doit être un nombre entier de minutes supérieur à 0".to_string(),
            );
        }
        Some(_) => {}
    }

    match form.price.as_decimal() {
        None => {
            errors.insert(fields.price().key(), "Le prix est requis".to_string());
        }
        Some(price) if price < Decimal::ZERO => {
            errors.insert(
                fields.price().key(),
                "Le prix ne peut pas être négatif".to_string(),
            );
        }
        Some(_) => {}
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{ChangeEvent, FormController, FormOptions, SubmitOutcome};
    use futures::executor::block_on;

    fn haircut() -> ServiceForm {
        ServiceForm {
            name: "Coupe homme".to_string(),
            description: String::new(),
            duration_minutes: Numeric::from(30),
            price: Numeric::Value(Decimal::new(2500, 2)),
            active: true,
        }
    }

    #[test]
    fn complete_service_is_valid() {
        assert!(validate_service(&haircut()).is_empty());
    }

    #[test]
    fn free_service_is_allowed() {
        let form = ServiceForm {
            price: Numeric::from(0),
            ..haircut()
        };
        assert!(validate_service(&form).is_empty());
    }

    #[test]
    fn blank_service_reports_every_required_field() {
        let fields = ServiceForm::fields();
        let errors = validate_service(&ServiceForm::default());
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.get(&fields.name().key()).map(String::as_str),
            Some("Le nom est requis")
        );
        assert_eq!(
            errors.get(&fields.price().key()).map(String::as_str),
            Some("Le prix est requis")
        );
    }

    #[test]
    fn duration_must_be_whole_positive_minutes() {
        let fields = ServiceForm::fields();
        for duration in [Numeric::from(0), Numeric::Value(Decimal::new(125, 1))] {
            let form = ServiceForm {
                duration_minutes: duration,
                ..haircut()
            };
            assert!(
                validate_service(&form).contains_key(&fields.duration_minutes().key()),
                "{duration} should be rejected"
            );
        }
    }

    #[test]
    fn negative_price_is_rejected() {
        let form = ServiceForm {
            price: Numeric::from(-5),
            ..haircut()
        };
        assert_eq!(
            validate_service(&form)
                .get(&ServiceForm::fields().price().key())
                .map(String::as_str),
            Some("Le prix ne peut pas être négatif")
        );
    }

    #[test]
    fn service_form_submits_typed_values() {
        let fields = ServiceForm::fields();
        let controller = FormController::<ServiceForm>::new_sync(
            ServiceForm::default(),
            FormOptions::default(),
            |form| {
                anyhow::ensure!(form.duration_minutes == Numeric::from(45), "unexpected duration");
                Ok(())
            },
        )
        .with_validator(validate_service);

        controller
            .handle_change(fields.name(), ChangeEvent::text("Barbe"))
            .expect("name");
        controller
            .handle_change(fields.duration_minutes(), ChangeEvent::number("45"))
            .expect("duration");
        controller
            .handle_change(fields.price(), ChangeEvent::number("15.50"))
            .expect("price");

        assert_eq!(
            block_on(controller.submit()).expect("submit"),
            SubmitOutcome::Succeeded
        );
    }
}
