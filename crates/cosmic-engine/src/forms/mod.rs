pub mod join;

pub use join::{submit_join, EmailValidator, JoinOutcome, JoinRequest, JoinService};
