#![forbid(unsafe_code)]
use accueil::{
    io,
    model::{MemberId, NewMember},
    report::{render_member, render_selection, TextRenderer},
    scheduler::{LeaderSlot, Scheduler, SelectOptions, DEFAULT_CREW_SIZE},
    storage::{Storage, TsvStorage, DEFAULT_MEMBERS_FILE},
};
use anyhow::{bail, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI des équipes d'accueil (fichier texte local)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier des membres (séparé par tabulations)
    #[arg(long, global = true, default_value = DEFAULT_MEMBERS_FILE)]
    members: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter un membre (numéro attribué automatiquement)
    Add {
        #[arg(long)]
        first: String,
        #[arg(long)]
        last: String,
        /// Numéro du membre avec qui programmer
        #[arg(long)]
        with: Option<MemberId>,
        #[arg(long)]
        leader: bool,
        /// MM/DD/YYYY
        #[arg(long)]
        last_scheduled: Option<String>,
    },

    /// Modifier un membre existant
    Update {
        #[arg(long)]
        id: MemberId,
        #[arg(long)]
        first: Option<String>,
        #[arg(long)]
        last: Option<String>,
        #[arg(long, conflicts_with = "no_with")]
        with: Option<MemberId>,
        /// Retire le binôme
        #[arg(long)]
        no_with: bool,
        #[arg(long)]
        leader: Option<bool>,
        /// MM/DD/YYYY
        #[arg(long, conflicts_with = "never")]
        last_scheduled: Option<String>,
        /// Remet le membre à « jamais programmé »
        #[arg(long)]
        never: bool,
    },

    /// Supprimer un membre
    Remove {
        #[arg(long)]
        id: MemberId,
    },

    /// Lister et optionnellement exporter
    List {
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Chercher par nom et/ou prénom (correspondance exacte)
    Find {
        #[arg(long)]
        last: Option<String>,
        #[arg(long)]
        first: Option<String>,
    },

    /// Vérifier le fichier des membres
    Check,

    /// Composer une équipe, optionnellement l'enregistrer
    Select {
        /// Membre à retirer de l'équipe proposée (répétable)
        #[arg(long)]
        drop: Vec<MemberId>,
        /// Recompléter l'équipe après les retraits
        #[arg(long)]
        refill: bool,
        #[arg(long, default_value_t = DEFAULT_CREW_SIZE)]
        crew_size: usize,
        /// Garde une place pour le chef d'équipe pendant la passe principale
        #[arg(long)]
        reserve_leader_slot: bool,
        /// Export CSV de l'équipe (optionnel)
        #[arg(long)]
        report: Option<String>,
        /// Écrit la date de programmation sur les membres retenus
        #[arg(long)]
        commit: bool,
        /// Date effective MM/DD/YYYY (défaut : aujourd'hui)
        #[arg(long, requires = "commit")]
        date: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = TsvStorage::open(&cli.members)?;
    let loaded = storage.load()?;
    for issue in &loaded.issues {
        eprintln!("Warning: {issue}");
    }
    let load_issues = loaded.issues.len();
    let mut scheduler = Scheduler::new(loaded.roster);

    let code = match cli.cmd {
        Commands::Add {
            first,
            last,
            with,
            leader,
            last_scheduled,
        } => {
            let last_scheduled = last_scheduled.as_deref().map(io::parse_date).transpose()?;
            let id = scheduler.roster_mut().add_member(NewMember {
                first_name: first,
                last_name: last,
                schedule_with: with,
                team_leader: leader,
                last_scheduled,
            })?;
            storage.save(scheduler.roster())?;
            println!("Added member {id}");
            0
        }
        Commands::Update {
            id,
            first,
            last,
            with,
            no_with,
            leader,
            last_scheduled,
            never,
        } => {
            let Some(current) = scheduler.roster().find_by_id(id) else {
                bail!("unknown member: {id}");
            };
            let mut member = current.clone();
            if let Some(first) = first {
                member.first_name = first;
            }
            if let Some(last) = last {
                member.last_name = last;
            }
            if with.is_some() {
                member.schedule_with = with;
            }
            if no_with {
                member.schedule_with = None;
            }
            if let Some(leader) = leader {
                member.team_leader = leader;
            }
            if let Some(raw) = last_scheduled {
                member.last_scheduled = Some(io::parse_date(&raw)?);
            }
            if never {
                member.last_scheduled = None;
            }
            scheduler.roster_mut().upsert_member(member)?;
            storage.save(scheduler.roster())?;
            0
        }
        Commands::Remove { id } => {
            let removed = scheduler.roster_mut().remove_member(id)?;
            storage.save(scheduler.roster())?;
            println!("Removed {} ({})", removed.full_name(), removed.id);
            0
        }
        Commands::List { out_json } => {
            if let Some(path) = out_json {
                io::export_roster_json(path, scheduler.roster())?;
            }
            for m in scheduler.roster().members() {
                print!("{}", render_member(m, scheduler.roster()));
                println!("========================================");
            }
            0
        }
        Commands::Find { last, first } => {
            if last.is_none() && first.is_none() {
                bail!("give --last and/or --first");
            }
            let found = scheduler
                .roster()
                .find_by_name(last.as_deref(), first.as_deref());
            for m in &found {
                println!("{}: {}", m.full_name(), m.id);
            }
            if found.is_empty() {
                1
            } else {
                0
            }
        }
        Commands::Check => {
            let pairing = scheduler.roster().pairing_issues();
            for issue in &pairing {
                eprintln!("Warning: {issue}");
            }
            if load_issues + pairing.len() == 0 {
                println!("OK: {} member(s), no issues", scheduler.roster().len());
                0
            } else {
                eprintln!("Found {} issue(s)", load_issues + pairing.len());
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Select {
            drop,
            refill,
            crew_size,
            reserve_leader_slot,
            report,
            commit,
            date,
        } => {
            let opts = SelectOptions {
                crew_size,
                leader_slot: if reserve_leader_slot {
                    LeaderSlot::Reserve
                } else {
                    LeaderSlot::Collapsed
                },
            };
            let mut selection = scheduler.select(opts)?;
            for id in &drop {
                selection.deselect(*id)?;
            }
            if refill && !drop.is_empty() {
                selection = scheduler.reselect(&selection, opts)?;
            }

            print!(
                "{}",
                render_selection(scheduler.roster(), &selection, &TextRenderer)
            );
            if let Some(path) = report {
                io::export_selection_csv(path, scheduler.roster(), &selection)?;
            }

            if commit {
                let effective = match date {
                    Some(raw) => io::parse_date(&raw)?,
                    None => Local::now().date_naive(),
                };
                let updated = scheduler.commit(&selection, effective)?;
                storage.save(scheduler.roster())?;
                println!("Scheduled {updated} member(s) on {}", io::format_date(effective));
            }

            if selection.leader_picked() {
                0
            } else {
                2
            }
        }
    };

    std::process::exit(code);
}
