use salonkit::form::{FieldLens, FormModel};

#[derive(Clone, salonkit::form::FormModel)]
struct DemoForm {
    email: String,
    opt_in: bool,
}

fn main() {
    let fields = DemoForm::fields();
    let lens = fields.email();
    let mut model = DemoForm {
        email: "a@salon.fr".to_string(),
        opt_in: false,
    };
    lens.set(&mut model, "b@salon.fr".to_string());
    assert_eq!(lens.key().as_str(), "email");
    assert_eq!(lens.get(&model), "b@salon.fr");
    assert_eq!(fields.opt_in().key().as_str(), "opt_in");
    assert_eq!(DemoForm::field_keys().len(), 2);
    assert!(!*fields.opt_in().get(&model));
}
