use crate::events::AppEvent;
use crate::wheel::Item;
use async_channel::Sender;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/spinwheel.sock";

/// One command per line: `spin`, `toggle <name>`, `reload`, `quit`.
pub fn parse_command(line: &str) -> Option<AppEvent> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match verb {
        "spin" => Some(AppEvent::Spin),
        "toggle" => Item::parse(rest).map(AppEvent::Toggle),
        "reload" => Some(AppEvent::ConfigReload),
        "quit" => Some(AppEvent::Quit),
        _ => None,
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    run_server_at(Path::new(SOCKET_PATH), tx).await;
}

pub async fn run_server_at(path: &Path, tx: Sender<AppEvent>) {
    // stale socket from a previous run
    if std::fs::metadata(path).is_ok() {
        let _ = std::fs::remove_file(path);
    }

    let listener = match UnixListener::bind(path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        match parse_command(&line) {
                            Some(event) => {
                                if tx.send(event).await.is_err() {
                                    break;
                                }
                            }
                            None => log::warn!("Unknown command: {:?}", line),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

pub fn send_command(path: &Path, cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to spinwheel daemon at {}: {}. Is it running?",
            path.display(),
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}
