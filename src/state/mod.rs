pub mod step;
pub mod validation;
pub mod wizard;
