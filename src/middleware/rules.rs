//! Business-rule predicates for the review workflow.
//!
//! Each predicate takes [`Args`] by value and hands it back alongside its
//! decision, so predicates chain: the output of one step is the input of the
//! next. None of them do I/O; "today" comes from `Args`.

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::middleware::event::Event;
use crate::vips::datetime::to_datetime;
use crate::vips::status::{ProhibitionType, names_match};

/// Days after service during which a review can still be requested.
pub const REVIEW_WINDOW_DAYS: i64 = 7;

/// Arguments passed through a chain of predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub message: Event,
    /// Date the rules are evaluated against.
    pub today: NaiveDate,
}

impl Args {
    /// Evaluate against the current local date.
    pub fn new(message: Event) -> Self {
        Self::at(message, Local::now().date_naive())
    }

    pub fn at(message: Event, today: NaiveDate) -> Self {
        Self { message, today }
    }
}

/// Outcome of a predicate.
pub type Decision = (bool, Args);

/// True if the prohibition took effect at most a week ago.
///
/// Unlicensed (UL) prohibitions have no window and always pass.
pub fn date_served_not_older_than_one_week(args: Args) -> Decision {
    let Some(status) = args.message.vips_status() else {
        return (false, args);
    };
    if status.prohibition_type() == Some(ProhibitionType::Ul) {
        return (true, args);
    }

    let Some(effective) = status.effective_dt.as_deref().and_then(|dt| to_datetime(dt).ok()) else {
        return (false, args);
    };
    let age_days = args
        .today
        .signed_duration_since(effective.date_naive())
        .num_days();
    debug!(age_days, "Checking days since service");
    (age_days <= REVIEW_WINDOW_DAYS, args)
}

/// True if the last name on the form matches the VIPS surname, ignoring
/// case and accents.
pub fn user_submitted_last_name_matches_vips(args: Args) -> Decision {
    let vips_surname = args.message.vips_status().and_then(|s| s.surname_nm);
    let result = match (args.message.last_name(), vips_surname.as_deref()) {
        (Some(submitted), Some(vips)) => names_match(submitted, vips),
        _ => false,
    };
    (result, args)
}

/// True if the cached VIPS response describes a found prohibition.
pub fn prohibition_exists_in_vips(args: Args) -> Decision {
    let result = args.message.exists_in_vips();
    (result, args)
}

/// True if the prohibition is in VIPS, or if `delay_days` have passed since
/// service so its absence is worth reporting.
pub fn prohibition_should_have_been_entered_in_vips(args: Args, delay_days: i64) -> Decision {
    if args.message.exists_in_vips() {
        return (true, args);
    }
    let Some(served) = args.message.date_of_service() else {
        return (false, args);
    };
    let days_since_service = args.today.signed_duration_since(served).num_days();
    (days_since_service >= delay_days, args)
}

/// True if the driver's licence was seized. UL prohibitions always count as
/// seized; IRP and ADP need `driverLicenceSeizedYn == "Y"`.
pub fn has_drivers_licence_been_seized(args: Args) -> Decision {
    let result = args.message.vips_status().is_some_and(|status| {
        status.prohibition_type() == Some(ProhibitionType::Ul) || status.is_licence_seized()
    });
    (result, args)
}

/// Copy of `event` re-routed to `new_type`.
pub fn modify_event(event: &Event, new_type: &str) -> Event {
    Event {
        event_type: new_type.to_string(),
        ..event.clone()
    }
}

/// A named predicate in a chain.
pub struct Step<'a> {
    pub name: &'static str,
    run: Box<dyn Fn(Args) -> Decision + 'a>,
}

impl<'a> Step<'a> {
    pub fn new(name: &'static str, run: impl Fn(Args) -> Decision + 'a) -> Self {
        Self {
            name,
            run: Box::new(run),
        }
    }
}

impl std::fmt::Debug for Step<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}

/// Run `steps` in order, stopping at the first one that fails.
pub fn run_steps(steps: &[Step<'_>], args: Args) -> Decision {
    let mut args = args;
    for step in steps {
        let (passed, next) = (step.run)(args);
        args = next;
        if !passed {
            debug!(step = step.name, event_type = %args.message.event_type, "Rule failed");
            return (false, args);
        }
    }
    (true, args)
}
