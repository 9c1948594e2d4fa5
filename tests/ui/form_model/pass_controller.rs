use salonkit::prelude::*;

#[derive(Clone, Debug, Default, PartialEq, salonkit::form::FormModel)]
pub struct NewsletterForm {
    pub email: String,
    pub frequency: Numeric,
}

fn main() {
    let fields = NewsletterForm::fields();
    let controller: FormController<NewsletterForm> = FormController::new_sync(
        NewsletterForm::default(),
        FormOptions::default(),
        |_form| Ok(()),
    );
    controller
        .handle_change(fields.frequency(), ChangeEvent::number("2"))
        .expect("numeric field accepts number input");
    assert_eq!(
        controller.value(fields.frequency()).expect("value"),
        Numeric::from(2)
    );
}
