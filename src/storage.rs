use crate::io::{self, LoadReport};
use crate::model::Roster;
use anyhow::Context;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Nom du fichier des membres par défaut.
pub const DEFAULT_MEMBERS_FILE: &str = "HospitalityMembers.txt";

pub trait Storage {
    /// Charge le roster ; les anomalies de données sont rapportées, pas levées.
    fn load(&self) -> anyhow::Result<LoadReport>;
    /// Sauvegarde de manière atomique.
    fn save(&self, roster: &Roster) -> anyhow::Result<()>;
}

/// Fichier texte séparé par tabulations.
pub struct TsvStorage {
    path: PathBuf,
}

impl TsvStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for TsvStorage {
    fn load(&self) -> anyhow::Result<LoadReport> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "members file not found, starting empty");
            return Ok(LoadReport::default());
        }
        let report = io::load_members_file(&self.path)
            .with_context(|| format!("loading {}", self.path.display()))?;
        for issue in &report.issues {
            tracing::warn!(%issue, "member record issue");
        }
        Ok(report)
    }

    fn save(&self, roster: &Roster) -> anyhow::Result<()> {
        let mut buf = Vec::new();
        io::write_members(&mut buf, roster)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&buf)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
