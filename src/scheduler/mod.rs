mod backfill;
mod commit;
pub mod ordering;
mod selection;
mod types;

pub use ordering::OrderedRoster;
pub use selection::{reselect, select};
pub use types::{LeaderSlot, Pick, Reason, SchedError, SelectOptions, Selection, DEFAULT_CREW_SIZE};

use crate::model::Roster;
use chrono::NaiveDate;

/// Scheduler : encapsule le Roster d'une session de programmation
#[derive(Debug, Default)]
pub struct Scheduler {
    roster: Roster,
}

impl Scheduler {
    pub fn new(roster: Roster) -> Self {
        Self { roster }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }
    pub fn into_roster(self) -> Roster {
        self.roster
    }

    /// Vue triée par ancienneté de programmation.
    pub fn ordered(&self) -> OrderedRoster<'_> {
        OrderedRoster::new(self.roster.members())
    }

    /// Compose une nouvelle équipe ; chaque appel repart d'un contexte vierge.
    pub fn select(&self, opts: SelectOptions) -> Result<Selection, SchedError> {
        if opts.crew_size == 0 {
            return Err(SchedError::EmptyCrew);
        }
        Ok(select(&self.ordered(), opts))
    }

    /// Complète une équipe après désélection, dans la même session.
    pub fn reselect(
        &self,
        previous: &Selection,
        opts: SelectOptions,
    ) -> Result<Selection, SchedError> {
        if opts.crew_size == 0 {
            return Err(SchedError::EmptyCrew);
        }
        Ok(reselect(&self.ordered(), previous, opts))
    }

    /// Écrit la date effective sur chaque membre retenu.
    pub fn commit(
        &mut self,
        selection: &Selection,
        effective: NaiveDate,
    ) -> Result<usize, SchedError> {
        commit::commit(self, selection, effective)
    }
}
