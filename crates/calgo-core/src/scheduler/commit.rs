use tracing::{error, info};

use super::{PlanState, Planner};
use crate::error::{CoreError, Result};
use crate::integrations::ConfirmPrompt;

pub const COMMIT_QUESTION: &str = "Commit changes to the calendar?";

/// What happened to the proposals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The user said no; nothing was written.
    Declined,
    /// This many proposals were written.
    Committed(usize),
}

/// Persist the planner's proposals in ascending order.
///
/// With `interactive` set the user is asked first (default yes). Insertion
/// stops at the first failure; the events written before it stay written and
/// are marked persisted in the planner, so a later commit only retries the
/// remainder.
///
/// # Errors
/// `CoreError::InvalidState` if the planner has proposals but was never
/// planned, `CoreError::Insertion` when an insert fails.
pub fn commit(
    planner: &mut Planner<'_>,
    interactive: bool,
    prompt: &mut dyn ConfirmPrompt,
) -> Result<CommitOutcome> {
    let pending = planner.events.unpersisted_positions();
    if pending.is_empty() {
        info!("nothing to commit");
        if planner.state == PlanState::Planned {
            planner.state = PlanState::Committed;
        }
        return Ok(CommitOutcome::Committed(0));
    }

    if planner.state != PlanState::Planned {
        return Err(CoreError::InvalidState {
            operation: "commit",
            state: planner.state.as_str(),
        });
    }

    if interactive && !prompt.ask(COMMIT_QUESTION, true)? {
        info!("commit declined");
        return Ok(CommitOutcome::Declined);
    }

    let total = pending.len();
    for (committed, index) in pending.into_iter().enumerate() {
        let proposal = planner.events.as_slice()[index].clone();
        match planner.inserter.insert_event(&planner.calendar_id, &proposal) {
            Ok(stored) => {
                info!(id = %stored.id, start = %stored.start_time, "created event");
                planner.events.replace(index, stored);
            }
            Err(e) => {
                error!(committed, total, error = %e, "failed to create event");
                return Err(CoreError::Insertion {
                    committed,
                    total,
                    source: Box::new(e),
                });
            }
        }
    }

    planner.state = PlanState::Committed;
    info!(total, calendar_id = %planner.calendar_id, "committed plan");
    Ok(CommitOutcome::Committed(total))
}
