mod config;

use std::{io, process};

use env_logger::{Builder, Env};
use ssc_core::{
    engine::Engine,
    error::Error,
    resource::parse_identity_key,
    settings::DeleteMode,
    storage::FileStore,
};

const ENV_LOG: &str = "SSC_LOG";
const ENV_LOG_STYLE: &str = "SSC_LOG_STYLE";

const USAGE: &str = "usage: ssc-cli list
       ssc-cli delete <url>
       ssc-cli restore <url>
       ssc-cli status <url>
       ssc-cli mode [hide|compact]

<url> is a full link (https://soundcloud.com/artist/track) or a path
starting with / (/artist/track).";

enum Command {
    List,
    Delete(String),
    Restore(String),
    Status(String),
    ShowMode,
    SetMode(DeleteMode),
}

impl Command {
    fn parse(args: &[String]) -> Option<Self> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["list"] => Some(Self::List),
            ["delete", url] => parse_identity_key(url).map(Self::Delete),
            ["restore", url] => parse_identity_key(url).map(Self::Restore),
            ["status", url] => parse_identity_key(url).map(Self::Status),
            ["mode"] => Some(Self::ShowMode),
            ["mode", "hide"] => Some(Self::SetMode(DeleteMode::Hide)),
            ["mode", "compact"] => Some(Self::SetMode(DeleteMode::Compact)),
            _ => None,
        }
    }
}

fn main() {
    Builder::from_env(
        Env::new()
            .filter_or(ENV_LOG, "warn")
            .write_style(ENV_LOG_STYLE),
    )
    .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = Command::parse(&args) else {
        eprintln!("{}", USAGE);
        process::exit(2);
    };

    if let Err(err) = start(command) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn start(command: Command) -> Result<(), Error> {
    let dir = config::store_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "no store directory available")
    })?;
    log::info!("using store: {:?}", dir);
    let engine = Engine::new(FileStore::new(dir)?);

    match command {
        Command::List => {
            for key in engine.deleted().keys() {
                println!("{}", key);
            }
        }
        Command::Delete(key) => {
            engine.deleted().mark_deleted(&key);
            println!("deleted {}", key);
        }
        Command::Restore(key) => {
            engine.deleted().mark_restored(&key);
            println!("restored {}", key);
        }
        Command::Status(key) => {
            let state = if engine.deleted().is_deleted(&key) {
                "deleted"
            } else {
                "visible"
            };
            println!("{} {}", key, state);
        }
        Command::ShowMode => {
            println!("{}", engine.settings().delete_mode());
        }
        Command::SetMode(mode) => {
            engine.settings().set_delete_mode(mode);
            println!("delete mode set to {}", mode);
        }
    }

    Ok(())
}
