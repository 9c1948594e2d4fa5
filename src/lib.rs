//! Form state for the salon booking platform: a headless, typed form
//! controller and the forms the dashboard and client booking flow submit.

pub mod form;
pub mod prelude;
pub mod salon;
