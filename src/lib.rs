#![forbid(unsafe_code)]
//! Accueil — composition des équipes d'accueil, fichier texte local (sans BD).
//!
//! - Stockage fichier texte séparé par tabulations, écriture atomique.
//! - Sélection des membres programmés il y a le plus longtemps.
//! - Un chef d'équipe par équipe, binômes programmés ensemble.
//! - Dates sans heure, format `MM/DD/YYYY` en entrée/sortie.

pub mod io;
pub mod model;
pub mod report;
pub mod scheduler;
pub mod storage;

pub use io::{LoadReport, RecordIssue};
pub use model::{Member, MemberId, ModelError, NewMember, PairingIssue, Roster};
pub use report::{render_member, render_selection, SelectionRenderer, TextRenderer};
pub use scheduler::{
    LeaderSlot, OrderedRoster, Pick, Reason, SchedError, Scheduler, SelectOptions, Selection,
};
pub use storage::{Storage, TsvStorage};
