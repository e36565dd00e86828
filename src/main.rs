use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spinwheel::app::AppModel;
use spinwheel::config::{self, Config};
use spinwheel::store::{EnablementStore, FileStore, PersistKey, Storage};
use spinwheel::sys::{runtime, server};
use spinwheel::wheel::view::legend_rows;
use spinwheel::wheel::{Action, Effect, Item, Selection, Session};
use std::path::{Path, PathBuf};
use std::thread;

#[derive(Parser, Debug)]
#[command(name = "spinwheel", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of the platform default
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Storage file for the include/exclude flags (defaults to the XDG data home)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// List the names on the wheel and whether they take part
    List,
    /// Include or exclude a name from upcoming spins
    Toggle { item: String },
    /// Spin once and print the winner
    Spin {
        /// Seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
        /// Settle immediately instead of waiting out the spin duration
        #[arg(long)]
        no_wait: bool,
    },
    /// Run the wheel as a daemon driven over its unix socket
    Daemon {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Send a command (spin, toggle <name>, reload, quit) to the daemon
    Send {
        #[arg(required = true, num_args = 1..)]
        command: Vec<String>,
    },
    /// Write the default config file if none exists
    Init,
    /// Draw the wheel to a PNG file
    #[cfg(feature = "render")]
    Render {
        out: PathBuf,
        /// Spin once before drawing so the wheel shows a landed result
        #[arg(long)]
        spin: bool,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command.clone().unwrap_or(Commands::List) {
        Commands::List => list(&cli),
        Commands::Toggle { item } => toggle(&cli, &item),
        Commands::Spin { seed, no_wait } => spin(&cli, seed, no_wait),
        Commands::Daemon { seed } => daemon(&cli, seed),
        Commands::Send { command } => {
            server::send_command(Path::new(server::SOCKET_PATH), &command.join(" "))
        }
        Commands::Init => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
        #[cfg(feature = "render")]
        Commands::Render { out, spin, seed } => render(&cli, &out, spin, seed),
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(|| rand::rng().random()))
}

fn load_config(cli: &Cli) -> Config {
    config::load_or_default(cli.config.as_deref())
}

fn open_store(cli: &Cli) -> anyhow::Result<EnablementStore<FileStore>> {
    let storage = match &cli.store {
        Some(path) => FileStore::new(path),
        None => FileStore::open_default()?,
    };
    Ok(EnablementStore::new(storage))
}

fn open_session<S: Storage>(
    config: &Config,
    store: &EnablementStore<S>,
    seed: Option<u64>,
) -> Session<StdRng> {
    let persisted = store.load(&config.persist_key);
    Session::begin(config.wheel(), persisted.as_ref(), seeded_rng(seed))
}

fn persist<S: Storage>(store: &EnablementStore<S>, key: &PersistKey, effects: &[Effect]) {
    for effect in effects {
        if let Effect::Persist(map) = effect {
            store.save(key, map);
        }
    }
}

fn print_legend<R>(session: &Session<R>) {
    println!("{}", session.config().title);
    for row in legend_rows(session.items(), session.enabled(), session.selected()) {
        let number = row
            .number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        let mark = if row.included { "x" } else { " " };
        println!("{:>3} [{}] {}", number, mark, row.item);
    }
}

fn list(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli);
    let store = open_store(cli)?;
    print_legend(&open_session(&config, &store, None));
    Ok(())
}

fn toggle(cli: &Cli, raw: &str) -> anyhow::Result<()> {
    let config = load_config(cli);
    let store = open_store(cli)?;
    let mut session = open_session(&config, &store, None);

    let item = Item::parse(raw).ok_or_else(|| anyhow::anyhow!("Name must not be empty"))?;
    if !session.items().contains(&item) {
        anyhow::bail!("'{}' is not on the wheel", item);
    }

    let effects = session.apply(Action::ToggleItem(item));
    persist(&store, &config.persist_key, &effects);
    print_legend(&session);
    Ok(())
}

fn spin(cli: &Cli, seed: Option<u64>, no_wait: bool) -> anyhow::Result<()> {
    let config = load_config(cli);
    let store = open_store(cli)?;
    let mut session = open_session(&config, &store, seed);

    let effects = session.apply(Action::StartSpin);
    let Some(duration) = effects.iter().find_map(|e| match e {
        Effect::Animate { duration, .. } => Some(*duration),
        _ => None,
    }) else {
        eprintln!("Nothing to spin: enable at least one name");
        return Ok(());
    };

    if !no_wait {
        thread::sleep(duration);
    }

    for effect in session.apply(Action::Settle) {
        match effect {
            Effect::Selected(selection) => {
                log::info!("Selected '{}' (#{})", selection.item, selection.index + 1);
                println!("{}", selection.item);
            }
            Effect::Persist(map) => store.save(&config.persist_key, &map),
            Effect::Animate { .. } => {}
        }
    }
    Ok(())
}

fn daemon(cli: &Cli, seed: Option<u64>) -> anyhow::Result<()> {
    let config = load_config(cli);
    let store = open_store(cli)?;
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::get_config_path()?,
    };

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx.clone(), config_path.clone());

    let model = AppModel::new(
        &config,
        Some(config_path),
        store,
        seeded_rng(seed),
        tx,
        Box::new(|selection: &Selection| println!("{}", selection.item)),
    );
    log::info!("Listening on {}", server::SOCKET_PATH);
    model.run(rx);
    Ok(())
}

#[cfg(feature = "render")]
fn render(cli: &Cli, out: &Path, spin: bool, seed: Option<u64>) -> anyhow::Result<()> {
    use spinwheel::wheel::{RenderModel, draw};

    let config = load_config(cli);
    let store = open_store(cli)?;
    let mut session = open_session(&config, &store, seed);
    if spin {
        session.apply(Action::StartSpin);
        session.apply(Action::Settle);
    }

    let model = RenderModel::build(&session, &config.view);
    draw::render_png(&model, out)?;
    println!("{}", out.display());
    Ok(())
}
