use clap::Parser;

use crate::api::ApiClient;
use crate::cli::args::{CliArgs, CollectAction, Command, ListOpts, VolunteerAction};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::engine::{self, FilterConfig, SortOrder};
use crate::fixtures;
use crate::model::{Collect, CollectPatch, CollectSort, Volunteer, VolunteerPatch, VolunteerSort};
use crate::output::{self, AlertKind};
use crate::session::{LoginMode, Session};
use crate::store::{Store, SyncError, SyncMode};
use crate::utils;

const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

fn print_banner() {
    println!(
        "collectctl v{} - admin client for the volunteers/collects API",
        env!("CARGO_PKG_VERSION")
    );
    println!();
}

#[derive(Clone, Debug)]
struct RunConfig {
    api_url: String,
    username: String,
    password: String,
    timeout: u64,
    no_color: bool,
    command: Command,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    let timeout = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
    if timeout == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    // The demo allow-list user doubles as the default identity, so a bare
    // `collectctl volunteers list` works against a dead or absent backend.
    let demo_users = fixtures::demo_users();
    let demo = &demo_users[0];
    Ok(RunConfig {
        api_url: args
            .api_url
            .or(cfg.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        username: args
            .username
            .or(cfg.username)
            .unwrap_or_else(|| demo.username.to_string()),
        password: args
            .password
            .or(cfg.password)
            .unwrap_or_else(|| demo.password.to_string()),
        timeout,
        no_color: args.no_color || cfg.no_color.unwrap_or(false),
        command: args.command,
    })
}

pub fn run_cli() -> Result<(), String> {
    let args = CliArgs::parse();
    validation::validate(&args)?;

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    print_banner();

    let api = ApiClient::new(&run.api_url, run.timeout).map_err(|e| e.to_string())?;
    output::format_kv_line("API", api.base_url());
    let mut session = Session::new();

    let pb = output::loading_spinner("authenticating");
    let login = session
        .login(&api, &run.username, &run.password, &fixtures::demo_users())
        .await;
    pb.finish_and_clear();

    match login {
        Ok(LoginMode::Remote) => {
            output::show_alert("Login successful", AlertKind::Success, run.no_color)
        }
        Ok(LoginMode::Demo) => output::show_alert(
            "Login successful (demo mode)",
            AlertKind::Success,
            run.no_color,
        ),
        Err(e) => {
            output::show_alert(&e.to_string(), AlertKind::Error, run.no_color);
            return Err(e.to_string());
        }
    }
    if let Some(user) = session.user() {
        output::format_kv_line("Welcome", &user.display_name());
    }
    println!();

    match run.command.clone() {
        Command::Login => Ok(()),
        Command::Volunteers { action } => {
            run_volunteers(&api, &session, action, run.no_color).await
        }
        Command::Collects { action } => run_collects(&api, &session, action, run.no_color).await,
    }
}

fn list_filter_config<K>(
    opts: &ListOpts,
    parse_key: impl Fn(&str) -> Option<K>,
) -> Result<FilterConfig<K>, String>
where
    K: Copy + Default,
{
    let mut cfg = FilterConfig::default();
    if let Some(search) = &opts.search {
        cfg.query = search.clone();
    }
    if let Some(location) = &opts.location {
        cfg.location = location.clone();
    }
    if let Some(raw) = opts.from.as_deref() {
        cfg.date_from = Some(utils::parse_date_input(raw)?);
    }
    if let Some(raw) = opts.to.as_deref() {
        cfg.date_to = Some(utils::parse_date_input(raw)?);
    }
    if let Some(raw) = opts.sort_by.as_deref() {
        cfg.sort_by = parse_key(raw).ok_or_else(|| format!("invalid sort key '{raw}'"))?;
    }
    if let Some(raw) = opts.order.as_deref() {
        cfg.order =
            SortOrder::parse(raw).ok_or_else(|| format!("invalid sort order '{raw}'"))?;
    }
    Ok(cfg)
}

/// Mutations end with the same two refresh effects the list view does:
/// recompute the location choices, then re-render the derived view.
fn refresh_volunteers(store: &Store<Volunteer>, cfg: &FilterConfig<VolunteerSort>) {
    let options = engine::distinct_locations(store.records());
    let selected = engine::retain_selection(&options, &cfg.location);
    output::show_locations(&options, selected.as_deref());
    output::render_volunteers(&engine::derive_view(store.records(), cfg));
}

fn refresh_collects(store: &Store<Collect>, cfg: &FilterConfig<CollectSort>) {
    let options = engine::distinct_locations(store.records());
    let selected = engine::retain_selection(&options, &cfg.location);
    output::show_locations(&options, selected.as_deref());
    output::render_collects(&engine::derive_view(store.records(), cfg));
}

async fn load_volunteers(
    api: &ApiClient,
    session: &Session,
    store: &mut Store<Volunteer>,
    no_color: bool,
) {
    let pb = output::loading_spinner("loading volunteers");
    let loaded = store.load(api, session).await;
    pb.finish_and_clear();
    if let Err(e) = loaded {
        output::show_alert(
            &format!("API unavailable, using demo data ({e})"),
            AlertKind::Info,
            no_color,
        );
        store.load_demo(fixtures::demo_volunteers());
    }
}

async fn load_collects(
    api: &ApiClient,
    session: &Session,
    store: &mut Store<Collect>,
    no_color: bool,
) {
    let pb = output::loading_spinner("loading collects");
    let loaded = store.load(api, session).await;
    pb.finish_and_clear();
    if let Err(e) = loaded {
        output::show_alert(
            &format!("API unavailable, using demo data ({e})"),
            AlertKind::Info,
            no_color,
        );
        store.load_demo(fixtures::demo_collects());
    }
}

fn alert_sync_error(e: &SyncError, no_color: bool) {
    output::show_alert(&e.to_string(), AlertKind::Error, no_color);
}

async fn run_volunteers(
    api: &ApiClient,
    session: &Session,
    action: VolunteerAction,
    no_color: bool,
) -> Result<(), String> {
    // The volunteers view itself is off-limits to the restricted role.
    if session.is_restricted() {
        output::show_alert(
            "Not authorized for your role",
            AlertKind::Error,
            no_color,
        );
        return Ok(());
    }

    let mut store = Store::<Volunteer>::new();
    load_volunteers(api, session, &mut store, no_color).await;

    match action {
        VolunteerAction::List { opts } => {
            let cfg = list_filter_config(&opts, VolunteerSort::parse)?;
            refresh_volunteers(&store, &cfg);
        }
        VolunteerAction::Add {
            firstname,
            lastname,
            username,
            password,
            location,
            points,
        } => {
            let record = Volunteer {
                id: 0,
                firstname,
                lastname,
                username,
                password,
                location,
                points,
                created_at: None,
            };
            match store.create(api, session, record).await {
                Ok((id, SyncMode::Remote)) => output::show_alert(
                    &format!("Volunteer {id} created successfully!"),
                    AlertKind::Success,
                    no_color,
                ),
                Ok((id, SyncMode::Fallback)) => output::show_alert(
                    &format!("Volunteer {id} created successfully (demo)!"),
                    AlertKind::Success,
                    no_color,
                ),
                Err(e) => alert_sync_error(&e, no_color),
            }
            refresh_volunteers(&store, &FilterConfig::default());
        }
        VolunteerAction::Update {
            id,
            firstname,
            lastname,
            username,
            password,
            location,
            points,
        } => {
            let patch = VolunteerPatch {
                firstname,
                lastname,
                username,
                password,
                location,
                points,
            };
            match store.update(api, session, id, &patch).await {
                Ok(_) => output::show_alert(
                    "Volunteer updated successfully!",
                    AlertKind::Success,
                    no_color,
                ),
                Err(e) => alert_sync_error(&e, no_color),
            }
            refresh_volunteers(&store, &FilterConfig::default());
        }
        VolunteerAction::Delete { id } => {
            match store.delete(api, session, id).await {
                Ok(SyncMode::Remote) => output::show_alert(
                    "Volunteer deleted successfully!",
                    AlertKind::Success,
                    no_color,
                ),
                Ok(SyncMode::Fallback) => output::show_alert(
                    "Volunteer deleted successfully (demo)!",
                    AlertKind::Success,
                    no_color,
                ),
                Err(e) => alert_sync_error(&e, no_color),
            }
            refresh_volunteers(&store, &FilterConfig::default());
        }
    }
    Ok(())
}

async fn run_collects(
    api: &ApiClient,
    session: &Session,
    action: CollectAction,
    no_color: bool,
) -> Result<(), String> {
    let mut store = Store::<Collect>::new();
    load_collects(api, session, &mut store, no_color).await;

    match action {
        CollectAction::List { opts } => {
            let cfg = list_filter_config(&opts, CollectSort::parse)?;
            refresh_collects(&store, &cfg);
        }
        CollectAction::Add {
            item,
            quantity,
            location,
            date,
        } => {
            let record = Collect {
                id: 0,
                item,
                quantity,
                location,
                date,
            };
            match store.create(api, session, record).await {
                Ok((id, SyncMode::Remote)) => output::show_alert(
                    &format!("Collect {id} created successfully!"),
                    AlertKind::Success,
                    no_color,
                ),
                Ok((id, SyncMode::Fallback)) => output::show_alert(
                    &format!("Collect {id} created successfully (demo)!"),
                    AlertKind::Success,
                    no_color,
                ),
                Err(e) => alert_sync_error(&e, no_color),
            }
            refresh_collects(&store, &FilterConfig::default());
        }
        CollectAction::Update {
            id,
            item,
            quantity,
            location,
            date,
        } => {
            let patch = CollectPatch {
                item,
                quantity,
                location,
                date,
            };
            apply_collect_update(api, session, &mut store, id, &patch, no_color).await;
            refresh_collects(&store, &FilterConfig::default());
        }
        CollectAction::Inc { id } => {
            adjust_collect_quantity(api, session, &mut store, id, 1, no_color).await;
            refresh_collects(&store, &FilterConfig::default());
        }
        CollectAction::Dec { id } => {
            adjust_collect_quantity(api, session, &mut store, id, -1, no_color).await;
            refresh_collects(&store, &FilterConfig::default());
        }
        CollectAction::Delete { id } => {
            match store.delete(api, session, id).await {
                Ok(SyncMode::Remote) => output::show_alert(
                    "Collect deleted successfully!",
                    AlertKind::Success,
                    no_color,
                ),
                Ok(SyncMode::Fallback) => output::show_alert(
                    "Collect deleted successfully (demo)!",
                    AlertKind::Success,
                    no_color,
                ),
                Err(e) => alert_sync_error(&e, no_color),
            }
            refresh_collects(&store, &FilterConfig::default());
        }
    }
    Ok(())
}

async fn adjust_collect_quantity(
    api: &ApiClient,
    session: &Session,
    store: &mut Store<Collect>,
    id: i64,
    delta: i64,
    no_color: bool,
) {
    let Some(collect) = store.get(id) else {
        output::show_alert(
            &format!("no record with id {id}"),
            AlertKind::Error,
            no_color,
        );
        return;
    };
    let Some(quantity) = collect.adjusted_quantity(delta) else {
        output::show_alert("Quantity cannot go below zero", AlertKind::Error, no_color);
        return;
    };
    let patch = CollectPatch {
        quantity: Some(quantity),
        ..CollectPatch::default()
    };
    apply_collect_update(api, session, store, id, &patch, no_color).await;
}

async fn apply_collect_update(
    api: &ApiClient,
    session: &Session,
    store: &mut Store<Collect>,
    id: i64,
    patch: &CollectPatch,
    no_color: bool,
) {
    match store.update(api, session, id, patch).await {
        Ok(_) => output::show_alert(
            "Collect updated successfully!",
            AlertKind::Success,
            no_color,
        ),
        Err(e) => alert_sync_error(&e, no_color),
    }
}
