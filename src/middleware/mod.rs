//! Review workflow middleware.
//!
//! Events from the form-submission queue are checked by chains of pure
//! predicates. A predicate returns its decision together with the arguments
//! it was given, and `run_steps` stops a chain at the first failure.

pub mod event;
pub mod rules;

pub use event::Event;
pub use rules::{
    Args, Decision, Step, date_served_not_older_than_one_week, has_drivers_licence_been_seized,
    modify_event, prohibition_exists_in_vips, prohibition_should_have_been_entered_in_vips,
    run_steps, user_submitted_last_name_matches_vips,
};
