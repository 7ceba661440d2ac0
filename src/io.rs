use crate::model::{Member, MemberId, Roster, DATE_FORMAT};
use crate::scheduler::Selection;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

/// Anomalie rencontrée au chargement d'un fichier de membres. Jamais fatale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordIssue {
    /// Ligne ignorée.
    Malformed { line: u64, reason: String },
    /// Seule la première occurrence est gardée.
    DuplicateId { line: u64, id: MemberId },
    /// Membre gardé, considéré comme jamais programmé.
    BadDate { line: u64, id: MemberId, raw: String },
    /// Lien de binôme retiré.
    UnresolvedPairing { id: MemberId, partner: MemberId },
    /// Lien de binôme retiré.
    SelfPairing { id: MemberId },
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordIssue::Malformed { line, reason } => {
                write!(f, "line {line}: bad record format ({reason}), record skipped")
            }
            RecordIssue::DuplicateId { line, id } => {
                write!(f, "line {line}: member {id} already defined, record skipped")
            }
            RecordIssue::BadDate { line, id, raw } => {
                write!(
                    f,
                    "line {line}: member {id} has invalid date {raw:?}, treated as never scheduled"
                )
            }
            RecordIssue::UnresolvedPairing { id, partner } => {
                write!(f, "member {id} is scheduled with unknown member {partner}, link dropped")
            }
            RecordIssue::SelfPairing { id } => {
                write!(f, "member {id} is scheduled with itself, link dropped")
            }
        }
    }
}

/// Roster chargé et anomalies signalées.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub roster: Roster,
    pub issues: Vec<RecordIssue>,
}

/// Date au format `MM/DD/YYYY`.
pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .with_context(|| format!("invalid date (expected MM/DD/YYYY): {raw}"))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Lecture du fichier des membres, une ligne par membre, champs séparés par des
/// tabulations : `id, prénom, nom, binôme?, chef (true|false), dernière date?`.
pub fn read_members<R: std::io::Read>(input: R) -> anyhow::Result<LoadReport> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(input);

    let mut issues = Vec::new();
    let mut members: Vec<Member> = Vec::new();
    let mut seen = HashSet::new();

    for rec in rdr.records() {
        let rec = match rec {
            Ok(rec) => rec,
            Err(err) if err.is_io_error() => return Err(err).context("reading member records"),
            Err(err) => {
                let line = err.position().map(|p| p.line()).unwrap_or(0);
                tracing::warn!(line, %err, "unreadable member record");
                issues.push(RecordIssue::Malformed { line, reason: err.to_string() });
                continue;
            }
        };
        let line = rec.position().map(|p| p.line()).unwrap_or(0);

        let mut member = match parse_record(&rec) {
            Ok(member) => member,
            Err(err) => {
                tracing::warn!(line, %err, "bad member record");
                issues.push(RecordIssue::Malformed { line, reason: err.to_string() });
                continue;
            }
        };

        if !seen.insert(member.id) {
            issues.push(RecordIssue::DuplicateId { line, id: member.id });
            continue;
        }

        if let Some(raw) = rec.get(5).map(str::trim).filter(|s| !s.is_empty()) {
            match parse_date(raw) {
                Ok(date) => member.last_scheduled = Some(date),
                Err(_) => issues.push(RecordIssue::BadDate {
                    line,
                    id: member.id,
                    raw: raw.to_string(),
                }),
            }
        }
        members.push(member);
    }

    // même ordre d'insertion que le fichier réécrit : par numéro de membre
    members.sort_by_key(|m| m.id);

    let known: HashSet<MemberId> = members.iter().map(|m| m.id).collect();
    for member in members.iter_mut() {
        let Some(partner) = member.schedule_with else {
            continue;
        };
        if partner == member.id {
            issues.push(RecordIssue::SelfPairing { id: member.id });
            member.schedule_with = None;
        } else if !known.contains(&partner) {
            issues.push(RecordIssue::UnresolvedPairing { id: member.id, partner });
            member.schedule_with = None;
        }
    }

    Ok(LoadReport {
        roster: Roster::new(members),
        issues,
    })
}

fn parse_record(rec: &StringRecord) -> anyhow::Result<Member> {
    if rec.len() < 5 || rec.len() > 6 {
        bail!("expected 6 tab-separated fields, found {}", rec.len());
    }
    let id: MemberId = rec[0].parse()?;
    let first = rec[1].trim();
    let last = rec[2].trim();
    if first.is_empty() || last.is_empty() {
        bail!("empty name");
    }
    let mut member = Member::new(id, first, last);

    let partner = rec[3].trim();
    if !partner.is_empty() {
        member.schedule_with = Some(partner.parse()?);
    }
    member.team_leader = parse_bool(&rec[4])?;
    Ok(member)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => bail!("expected true or false, found {other:?}"),
    }
}

pub fn load_members_file<P: AsRef<Path>>(path: P) -> anyhow::Result<LoadReport> {
    let path = path.as_ref();
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_members(file)
}

/// Écriture du fichier des membres, par numéro croissant.
pub fn write_members<W: std::io::Write>(output: W, roster: &Roster) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(output);

    let mut members: Vec<&Member> = roster.members().iter().collect();
    members.sort_by_key(|m| m.id);

    for m in members {
        let id = m.id.to_string();
        let partner = m.schedule_with.map(|p| p.to_string()).unwrap_or_default();
        let leader = if m.team_leader { "true" } else { "false" };
        let date = m.last_scheduled.map(format_date).unwrap_or_default();
        w.write_record([
            id.as_str(),
            m.first_name.as_str(),
            m.last_name.as_str(),
            partner.as_str(),
            leader,
            date.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export JSON du roster (jolie mise en forme)
pub fn export_roster_json<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(roster)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV de l'équipe: header `id,name,reason`
pub fn export_selection_csv<P: AsRef<Path>>(
    path: P,
    roster: &Roster,
    selection: &Selection,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["id", "name", "reason"])?;
    for pick in selection.picks() {
        let name = roster
            .find_by_id(pick.member)
            .map(Member::full_name)
            .unwrap_or_default();
        let id = pick.member.to_string();
        let reason = pick.reason.to_string();
        w.write_record([id.as_str(), name.as_str(), reason.as_str()])?;
    }
    w.flush()?;
    Ok(())
}
