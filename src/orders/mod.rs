pub mod status;

pub use status::{check_transition, TransitionPolicy};
