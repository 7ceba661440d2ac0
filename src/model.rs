use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Format des dates dans le fichier des membres et la CLI.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Identifiant fort pour Member (numéro de membre, > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemberId(u32);

impl MemberId {
    pub fn new(n: u32) -> Option<Self> {
        (n > 0).then_some(Self(n))
    }
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MemberId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(MemberId::new)
            .ok_or_else(|| ModelError::InvalidId(s.to_string()))
    }
}

/// Membre de l'équipe d'accueil
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub first_name: String,
    pub last_name: String,
    /// Membre avec qui il faut être programmé (recherche par id dans le même roster).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_with: Option<MemberId>,
    #[serde(default)]
    pub team_leader: bool,
    /// `None` = jamais programmé, plus ancien que toute date.
    #[serde(default)]
    pub last_scheduled: Option<NaiveDate>,
}

impl Member {
    pub fn new<F, L>(id: MemberId, first_name: F, last_name: L) -> Self
    where
        F: Into<String>,
        L: Into<String>,
    {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            schedule_with: None,
            team_leader: false,
            last_scheduled: None,
        }
    }

    pub fn with_partner(mut self, partner: MemberId) -> Self {
        self.schedule_with = Some(partner);
        self
    }

    pub fn leader(mut self) -> Self {
        self.team_leader = true;
        self
    }

    pub fn scheduled_on(mut self, date: NaiveDate) -> Self {
        self.last_scheduled = Some(date);
        self
    }

    /// "Nom, Prénom"
    pub fn full_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    pub fn display_last_scheduled(&self) -> String {
        self.last_scheduled
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "Never".to_string())
    }
}

/// Saisie d'un nouveau membre (l'id est attribué par le roster).
#[derive(Debug, Clone, Default)]
pub struct NewMember {
    pub first_name: String,
    pub last_name: String,
    pub schedule_with: Option<MemberId>,
    pub team_leader: bool,
    pub last_scheduled: Option<NaiveDate>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid member id: {0}")]
    InvalidId(String),
    #[error("unknown member: {0}")]
    UnknownMember(MemberId),
    #[error("member {0} cannot be scheduled with itself")]
    SelfPairing(MemberId),
    #[error("member name cannot be empty")]
    EmptyName,
}

/// Lien de binôme incohérent dans un roster déjà chargé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingIssue {
    SelfPairing { member: MemberId },
    Unresolved { member: MemberId, partner: MemberId },
}

impl fmt::Display for PairingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingIssue::SelfPairing { member } => {
                write!(f, "member {member} is scheduled with itself")
            }
            PairingIssue::Unresolved { member, partner } => {
                write!(f, "member {member} is scheduled with unknown member {partner}")
            }
        }
    }
}

/// Roster complet des membres
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Roster {
    members: Vec<Member>,
}

impl Roster {
    pub fn new(members: Vec<Member>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn find_by_id(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }
    pub fn find_by_id_mut(&mut self, id: MemberId) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| m.id == id)
    }

    /// Recherche exacte sur le nom et/ou le prénom ; sans critère, rien ne correspond.
    pub fn find_by_name<'a>(&'a self, last: Option<&str>, first: Option<&str>) -> Vec<&'a Member> {
        if last.is_none() && first.is_none() {
            return Vec::new();
        }
        self.members
            .iter()
            .filter(|m| last.map_or(true, |l| m.last_name == l))
            .filter(|m| first.map_or(true, |f| m.first_name == f))
            .collect()
    }

    /// Prochain numéro libre : plus grand id + 1.
    pub fn next_id(&self) -> MemberId {
        let max = self.members.iter().map(|m| m.id.get()).max().unwrap_or(0);
        MemberId(max + 1)
    }

    pub fn add_member(&mut self, new: NewMember) -> Result<MemberId, ModelError> {
        let id = self.next_id();
        let member = Member {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            schedule_with: new.schedule_with,
            team_leader: new.team_leader,
            last_scheduled: new.last_scheduled,
        };
        self.check_member(&member)?;
        self.members.push(member);
        Ok(id)
    }

    /// Remplace le membre de même id, ou l'ajoute s'il n'existe pas.
    pub fn upsert_member(&mut self, member: Member) -> Result<(), ModelError> {
        self.check_member(&member)?;
        match self.find_by_id_mut(member.id) {
            Some(slot) => *slot = member,
            None => self.members.push(member),
        }
        Ok(())
    }

    /// Supprime un membre et détache les binômes qui le visaient.
    pub fn remove_member(&mut self, id: MemberId) -> Result<Member, ModelError> {
        let pos = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or(ModelError::UnknownMember(id))?;
        let removed = self.members.remove(pos);
        for m in self.members.iter_mut() {
            if m.schedule_with == Some(id) {
                tracing::info!(member = %m.id, partner = %id, "pairing cleared after removal");
                m.schedule_with = None;
            }
        }
        Ok(removed)
    }

    pub fn pairing_issues(&self) -> Vec<PairingIssue> {
        self.members
            .iter()
            .filter_map(|m| {
                let partner = m.schedule_with?;
                if partner == m.id {
                    Some(PairingIssue::SelfPairing { member: m.id })
                } else if self.find_by_id(partner).is_none() {
                    Some(PairingIssue::Unresolved { member: m.id, partner })
                } else {
                    None
                }
            })
            .collect()
    }

    fn check_member(&self, member: &Member) -> Result<(), ModelError> {
        if member.first_name.trim().is_empty() || member.last_name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if let Some(partner) = member.schedule_with {
            if partner == member.id {
                return Err(ModelError::SelfPairing(member.id));
            }
            if self.find_by_id(partner).is_none() {
                return Err(ModelError::UnknownMember(partner));
            }
        }
        Ok(())
    }
}
