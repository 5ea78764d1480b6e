//! Command-line driver for the shared-list core.
//!
//! # Responsibility
//! - Map one subcommand to one core service call against a SQLite file.
//! - Print results as plain text; report failures by error code and exit
//!   non-zero.

use clap::{Parser, Subcommand};
use log::error;
use shoplist_core::db::{open_db, DbError};
use shoplist_core::{
    init_logging, CollaboratorId, ConfigError, Departure, DirectoryRepository, InviteService,
    ItemId, ItemService, ListId, ListService, LoggingConfig, LoggingError, RepoError, Roster,
    ShareCodePolicy, ShoplistError, SqliteDirectoryRepository, SqliteInviteRepository,
    SqliteItemRepository, SqliteListRepository,
};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "shoplist", version, about = "Manage shared shopping lists")]
struct Cli {
    /// SQLite database file; created and migrated on first use.
    #[arg(long, default_value = "shoplist.sqlite3")]
    db: PathBuf,
    /// Absolute directory for rolling log files. Logging is off when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    #[arg(long)]
    log_level: Option<String>,
    /// Lifetime of newly issued share codes.
    #[arg(long, default_value_t = 24)]
    code_ttl_hours: u32,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record a collaborator's display name.
    Register {
        #[arg(long)]
        id: CollaboratorId,
        #[arg(long)]
        name: String,
    },
    Create {
        #[arg(long = "as")]
        caller: CollaboratorId,
        #[arg(long)]
        name: String,
    },
    Rename {
        #[arg(long = "as")]
        caller: CollaboratorId,
        #[arg(long)]
        list: ListId,
        #[arg(long)]
        name: String,
    },
    Show {
        #[arg(long = "as")]
        caller: CollaboratorId,
        #[arg(long)]
        list: ListId,
    },
    /// Lists the caller belongs to.
    Lists {
        #[arg(long = "as")]
        caller: CollaboratorId,
    },
    Leave {
        #[arg(long = "as")]
        caller: CollaboratorId,
        #[arg(long)]
        list: ListId,
    },
    /// Issue a new share code, replacing the current one.
    Share {
        #[arg(long = "as")]
        caller: CollaboratorId,
        #[arg(long)]
        list: ListId,
    },
    /// Print the active share code.
    ShareCode {
        #[arg(long = "as")]
        caller: CollaboratorId,
        #[arg(long)]
        list: ListId,
    },
    Revoke {
        #[arg(long = "as")]
        caller: CollaboratorId,
        #[arg(long)]
        list: ListId,
    },
    Join {
        #[arg(long = "as")]
        caller: CollaboratorId,
        #[arg(long)]
        code: String,
    },
    AddItem {
        #[arg(long = "as")]
        caller: CollaboratorId,
        #[arg(long)]
        list: ListId,
        #[arg(long)]
        label: String,
    },
    Items {
        #[arg(long = "as")]
        caller: CollaboratorId,
        #[arg(long)]
        list: ListId,
    },
    RemoveItem {
        #[arg(long = "as")]
        caller: CollaboratorId,
        #[arg(long)]
        list: ListId,
        #[arg(long)]
        item: ItemId,
    },
}

#[derive(Debug)]
enum CliError {
    Logging(LoggingError),
    Config(ConfigError),
    Db(DbError),
    Repo(RepoError),
    Service(ShoplistError),
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            Self::Logging(_) => "logging",
            Self::Config(_) => "config",
            Self::Db(_) => "db",
            Self::Repo(_) => "repo",
            Self::Service(err) => err.code(),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ShoplistError> for CliError {
    fn from(value: ShoplistError) -> Self {
        Self::Service(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error_code={}", err.code());
            eprintln!("error[{}]: {err}", err.code());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(log_dir) = cli.log_dir {
        let config = match cli.log_level {
            Some(level) => LoggingConfig { level, log_dir },
            None => LoggingConfig::with_default_level(log_dir),
        };
        init_logging(&config).map_err(CliError::Logging)?;
    }

    let policy = ShareCodePolicy::with_ttl_hours(cli.code_ttl_hours);
    policy.validate().map_err(CliError::Config)?;

    let conn = open_db(&cli.db)?;
    let lists = || SqliteListRepository::try_new(&conn);
    let invites = || -> Result<_, CliError> {
        Ok(InviteService::new(lists()?, SqliteInviteRepository::try_new(&conn)?).with_policy(policy))
    };
    let items = || -> Result<_, CliError> {
        Ok(ItemService::new(lists()?, SqliteItemRepository::try_new(&conn)?))
    };

    match cli.command {
        Command::Register { id, name } => {
            SqliteDirectoryRepository::try_new(&conn)?.upsert_collaborator(id, name.trim())?;
            println!("registered {id}");
        }
        Command::Create { caller, name } => {
            let list_id = ListService::new(lists()?).create_list(caller, name)?;
            println!("created list {list_id}");
        }
        Command::Rename { caller, list, name } => {
            ListService::new(lists()?).rename_list(caller, list, name)?;
            println!("renamed list {list}");
        }
        Command::Show { caller, list } => {
            print_roster(&ListService::new(lists()?).show_list(caller, list)?);
        }
        Command::Lists { caller } => {
            for summary in ListService::new(lists()?).lists_for(caller)? {
                println!(
                    "{}\t{}\towner={}\tmembers={}",
                    summary.list_id, summary.name, summary.owner_id, summary.member_count
                );
            }
        }
        Command::Leave { caller, list } => match ListService::new(lists()?).leave(caller, list)? {
            Departure::Dissolved => println!("left list {list}; list deleted"),
            Departure::OwnershipTransferred { successor } => {
                println!("left list {list}; new owner {successor}")
            }
            Departure::Departed => println!("left list {list}"),
        },
        Command::Share { caller, list } => {
            let share = invites()?.request_share_code(caller, list)?;
            println!("{}\texpires_at={}", share.code, share.expires_at);
        }
        Command::ShareCode { caller, list } => match invites()?.current_share_code(caller, list)? {
            Some(share) => println!("{}\texpires_at={}", share.code, share.expires_at),
            None => println!("no active share code"),
        },
        Command::Revoke { caller, list } => {
            invites()?.revoke_share_code(caller, list)?;
            println!("revoked share code of list {list}");
        }
        Command::Join { caller, code } => {
            let list_id = invites()?.join(caller, code.trim())?;
            println!("joined list {list_id}");
        }
        Command::AddItem {
            caller,
            list,
            label,
        } => {
            let item = items()?.add_item(caller, list, label)?;
            println!("added item {}", item.item_id);
        }
        Command::Items { caller, list } => {
            for item in items()?.list_items(caller, list)? {
                println!("{}\t{}\tadded_by={}", item.item_id, item.label, item.added_by);
            }
        }
        Command::RemoveItem { caller, list, item } => {
            items()?.remove_item(caller, list, item)?;
            println!("removed item {item}");
        }
    }

    Ok(())
}

fn print_roster(roster: &Roster) {
    println!("{}\t{}", roster.list_id, roster.name);
    for member in &roster.members {
        let role = if roster.is_owner(member.collaborator_id) {
            "owner"
        } else {
            "member"
        };
        println!(
            "  {}\t{}\t{role}",
            member.collaborator_id,
            member.display_name.as_deref().unwrap_or("-")
        );
    }
}
