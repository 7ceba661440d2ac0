use crate::model::MemberId;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Taille d'équipe par défaut.
pub const DEFAULT_CREW_SIZE: usize = 5;

/// Réservation (ou non) d'une place pour le chef d'équipe pendant la passe principale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaderSlot {
    /// La passe principale va jusqu'à `crew_size`, le rattrapage peut ajouter un membre de plus.
    #[default]
    Collapsed,
    /// Tant qu'aucun chef n'est choisi, la passe principale s'arrête à `crew_size - 1`.
    Reserve,
}

/// Options de sélection
#[derive(Debug, Clone, Copy)]
pub struct SelectOptions {
    pub crew_size: usize,
    pub leader_slot: LeaderSlot,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            crew_size: DEFAULT_CREW_SIZE,
            leader_slot: LeaderSlot::Collapsed,
        }
    }
}

impl SelectOptions {
    /// Borne de la passe principale.
    pub(super) fn primary_bound(&self, leader_picked: bool) -> usize {
        match self.leader_slot {
            LeaderSlot::Reserve if !leader_picked => self.crew_size.saturating_sub(1),
            _ => self.crew_size,
        }
    }

    /// Borne de l'expansion des binômes : une place de moins que la passe principale.
    pub(super) fn expansion_bound(&self, leader_picked: bool) -> usize {
        self.primary_bound(leader_picked).saturating_sub(1)
    }
}

/// Raison affichée à l'opérateur pour chaque membre retenu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    OldestScheduled,
    /// Toujours le nominé d'origine, même plusieurs maillons plus loin.
    ScheduleWith(MemberId),
    AddedTeamLeader,
    NoTeamLeaders,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::OldestScheduled => f.write_str("Oldest scheduled date"),
            Reason::ScheduleWith(id) => write!(f, "Schedule with {id}"),
            Reason::AddedTeamLeader => f.write_str("Added team leader"),
            Reason::NoTeamLeaders => f.write_str("No team leaders found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub member: MemberId,
    pub reason: Reason,
    pub team_leader: bool,
}

/// Résultat d'une sélection : membres dans l'ordre d'ajout, plus les membres examinés
/// pendant la session (pour une resélection).
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub(super) picks: Vec<Pick>,
    pub(super) examined: HashSet<MemberId>,
    pub(super) deselected: HashSet<MemberId>,
}

impl Selection {
    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }
    pub fn len(&self) -> usize {
        self.picks.len()
    }
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.picks.iter().any(|p| p.member == id)
    }

    pub fn member_ids(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.picks.iter().map(|p| p.member)
    }

    pub fn reason_for(&self, id: MemberId) -> Option<Reason> {
        self.picks.iter().find(|p| p.member == id).map(|p| p.reason)
    }

    pub fn leader_picked(&self) -> bool {
        self.picks.iter().any(|p| p.team_leader)
    }

    pub fn was_examined(&self, id: MemberId) -> bool {
        self.examined.contains(&id)
    }

    /// Retire un membre de l'équipe. Ne relance jamais le rattrapage ; le membre
    /// ne reviendra pas dans la session, même par un binôme.
    pub fn deselect(&mut self, id: MemberId) -> Result<Pick, SchedError> {
        let pos = self
            .picks
            .iter()
            .position(|p| p.member == id)
            .ok_or(SchedError::NotSelected(id))?;
        tracing::debug!(member = %id, "deselected");
        self.deselected.insert(id);
        Ok(self.picks.remove(pos))
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("unknown member: {0}")]
    UnknownMember(MemberId),
    #[error("member {0} is not in the current selection")]
    NotSelected(MemberId),
    #[error("crew size must be at least 1")]
    EmptyCrew,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
