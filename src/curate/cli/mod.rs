//! # CLI Layer
//!
//! One possible client of the editor core. This is the only place that parses
//! arguments, prints, sets up logging or picks exit codes.
//!
//! Collection commands are generic over the entity type; [`run`] maps the
//! `kind` argument to a concrete type once and hands off to
//! [`run_collection`].

mod args;
mod print;

use args::{Cli, Commands};
use clap::Parser;
use curate::api::CollectionEditor;
use curate::commands::{self, CmdResult};
use curate::config::CurateConfig;
use curate::entities::{
    AiAgent, BlogPost, CookieService, Faq, Feature, MenuItem, PageSection, PricingPlan, Product,
};
use curate::error::{CurateError, Result};
use curate::index::{parse_locator_or_range, Locator};
use curate::model::{Entity, Identity, Scope};
use curate::schema::EntityKind;
use curate::store::fs::FileStore;
use directories::ProjectDirs;
use print::{print_kinds, print_messages, print_records};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DATA_DIR_NAME: &str = ".curate";
const HOME_ENV: &str = "CURATE_HOME";
const LOG_ENV: &str = "CURATE_LOG";

/// Version string, with git hash and commit date for non-release builds.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

struct AppContext {
    data_dir: PathBuf,
    store: FileStore,
    config: CurateConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::Init => {
            let result = commands::init::run::<()>(&ctx.data_dir)?;
            print_messages(&result.messages);
            Ok(())
        }
        Commands::Kinds => {
            let result = commands::kinds::run::<(), _>(&ctx.store, &ctx.config)?;
            print_kinds(&result.kinds);
            Ok(())
        }
        command => match command_kind(&command) {
            Some(EntityKind::Faq) => run_collection::<Faq>(&ctx, command),
            Some(EntityKind::Product) => run_collection::<Product>(&ctx, command),
            Some(EntityKind::PricingPlan) => run_collection::<PricingPlan>(&ctx, command),
            Some(EntityKind::Feature) => run_collection::<Feature>(&ctx, command),
            Some(EntityKind::BlogPost) => run_collection::<BlogPost>(&ctx, command),
            Some(EntityKind::CookieService) => run_collection::<CookieService>(&ctx, command),
            Some(EntityKind::PageSection) => run_collection::<PageSection>(&ctx, command),
            Some(EntityKind::MenuItem) => run_collection::<MenuItem>(&ctx, command),
            Some(EntityKind::AiAgent) => run_collection::<AiAgent>(&ctx, command),
            None => Ok(()),
        },
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "curate=debug" } else { "curate=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = if cli.global {
        global_data_dir()?
    } else {
        let cwd = std::env::current_dir()?;
        cwd.join(DATA_DIR_NAME)
    };
    tracing::debug!(data_dir = %data_dir.display(), "using store");

    let config = CurateConfig::load(&data_dir)?;
    let store = FileStore::new(&data_dir);
    Ok(AppContext {
        data_dir,
        store,
        config,
    })
}

fn global_data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "curate", "curate")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| CurateError::Config("could not determine a data directory".to_string()))
}

fn command_kind(command: &Commands) -> Option<EntityKind> {
    match command {
        Commands::List { kind, .. }
        | Commands::Add { kind, .. }
        | Commands::Edit { kind, .. }
        | Commands::Delete { kind, .. }
        | Commands::Move { kind, .. }
        | Commands::Toggle { kind, .. }
        | Commands::Assign { kind, .. } => Some(*kind),
        Commands::Init | Commands::Kinds => None,
    }
}

fn run_collection<T: Entity + 'static>(ctx: &AppContext, command: Commands) -> Result<()> {
    let mut editor: CollectionEditor<T> = commands::open_editor(&ctx.store, &ctx.config)?;

    let result: CmdResult<T> = match command {
        Commands::List {
            search,
            more,
            parent,
            ..
        } => {
            let scope = parse_scope(parent.as_deref())?;
            let result = commands::list::run(&mut editor, scope, search.as_deref(), more)?;
            print_records(&result.listed);
            result
        }
        Commands::Add { fields, parent, .. } => {
            let scope = parse_scope(parent.as_deref())?;
            let fields = commands::parse_assignments(&fields)?;
            commands::create::run(&mut editor, scope, &fields)?
        }
        Commands::Edit {
            locator,
            fields,
            parent,
            ..
        } => {
            let locator = parse_locator(&locator, parent.as_deref())?;
            let fields = commands::parse_assignments(&fields)?;
            commands::update::run(&mut editor, &locator, &fields)?
        }
        Commands::Delete {
            locators, parent, ..
        } => {
            let scope = parse_scope(parent.as_deref())?;
            let mut parsed = Vec::new();
            for input in &locators {
                parsed.extend(
                    parse_locator_or_range(input)?
                        .into_iter()
                        .map(|locator| locator.in_scope(scope)),
                );
            }
            commands::delete::run(&mut editor, &parsed)?
        }
        Commands::Move {
            locator,
            to,
            parent,
            ..
        } => {
            let locator = parse_locator(&locator, parent.as_deref())?;
            let position = parse_position(&to)?;
            commands::move_record::run(&mut editor, &locator, position)?
        }
        Commands::Toggle {
            locator,
            field,
            parent,
            ..
        } => {
            let locator = parse_locator(&locator, parent.as_deref())?;
            commands::toggle::run(&mut editor, &locator, &field)?
        }
        Commands::Assign { pending, id, .. } => {
            let pending: Identity = pending.parse()?;
            let mut store = ctx.store.clone();
            commands::assign::run(&mut editor, &mut store, pending, id)?
        }
        Commands::Init | Commands::Kinds => CmdResult::default(),
    };

    print_messages(&result.messages);
    Ok(())
}

fn parse_scope(parent: Option<&str>) -> Result<Scope> {
    match parent {
        Some(key) => Ok(Scope::Parent(key.parse()?)),
        None => Ok(Scope::Root),
    }
}

fn parse_locator(input: &str, parent: Option<&str>) -> Result<Locator> {
    let scope = parse_scope(parent)?;
    Ok(input.parse::<Locator>()?.in_scope(scope))
}

fn parse_position(input: &str) -> Result<usize> {
    let digits = input.trim().trim_start_matches('@');
    match digits.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CurateError::InvalidLocator(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_accept_both_forms() {
        assert_eq!(parse_position("3").unwrap(), 3);
        assert_eq!(parse_position("@3").unwrap(), 3);
        assert!(parse_position("0").is_err());
        assert!(parse_position("x").is_err());
    }

    #[test]
    fn parent_scopes_positional_locators() {
        let locator = parse_locator("@2", Some("7")).unwrap();
        assert_eq!(
            locator,
            Locator::at(Scope::Parent(Identity::Persisted(7)), 1)
        );
        let key = parse_locator("12", Some("7")).unwrap();
        assert_eq!(key, Locator::Key(Identity::Persisted(12)));
    }

    #[test]
    fn parses_commands() {
        let cli = Cli::try_parse_from(["curate", "add", "faqs", "question=Q", "answer=A"]).unwrap();
        assert_eq!(command_kind(&cli.command), Some(EntityKind::Faq));

        let cli = Cli::try_parse_from(["curate", "mv", "pricing-plan", "@1", "@3", "-p", "5"])
            .unwrap();
        assert_eq!(command_kind(&cli.command), Some(EntityKind::PricingPlan));

        assert!(Cli::try_parse_from(["curate", "list", "widgets"]).is_err());
    }
}
