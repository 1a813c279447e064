mod auth;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use spotify_playback::config::Config;
use spotify_playback::model::RepeatMode;
use spotify_playback::{logging, DeviceTarget, Offset, PlayOptions, PlaybackAdapter, SpotifyClient};

#[derive(Parser, Debug)]
#[command(name = "spotify-playback", version, about = "Query and control Spotify playback")]
struct Cli {
    /// Path to config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Target device, by id or name
    #[arg(long, short, global = true)]
    device: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full player state (null when nothing is playing)
    Status,
    /// Available devices
    Devices,
    /// Current queue
    Queue,
    /// Currently playing item (null when idle)
    Now,
    /// Start or resume playback
    Play {
        /// Album, playlist, artist or show URI to play
        #[arg(long)]
        context: Option<String>,
        /// Track or episode URIs to play
        #[arg(long = "uri")]
        uris: Vec<String>,
        /// Start at this index within the context
        #[arg(long, conflicts_with = "offset_uri")]
        offset_position: Option<u32>,
        /// Start at this item within the context
        #[arg(long)]
        offset_uri: Option<String>,
        #[arg(long)]
        position_ms: Option<u64>,
    },
    Pause,
    Next,
    Previous,
    /// Seek to a position in the current item
    Seek { position_ms: u64 },
    Shuffle { state: Toggle },
    Repeat { state: RepeatArg },
    /// Set volume; values outside 0-100 are clamped
    Volume {
        #[arg(allow_negative_numbers = true)]
        percent: i32,
    },
    /// Move playback to another device
    Transfer {
        /// Device id or name
        target: String,
        /// Start playing on the new device
        #[arg(long)]
        play: bool,
    },
    /// Add a track or episode to the queue
    Enqueue { uri: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RepeatArg {
    Off,
    Track,
    Context,
}

impl From<RepeatArg> for RepeatMode {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::Off => RepeatMode::Off,
            RepeatArg::Track => RepeatMode::Track,
            RepeatArg::Context => RepeatMode::Context,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    if let Err(e) = logging::init_logging(&config.log_dir) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::debug!(command = ?cli.command, "Starting");

    let token = auth::obtain_token(&config).await?;
    let client = SpotifyClient::from_token(token, &config.api_base_url).await?;
    let player = PlaybackAdapter::new(client);

    let result = run(&player, cli.device.as_deref(), cli.command).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Command failed");
    }
    result
}

async fn run(
    player: &PlaybackAdapter<SpotifyClient>,
    device: Option<&str>,
    command: Command,
) -> Result<()> {
    let target = match device {
        Some(d) => DeviceTarget::new(resolve_device(player, d).await?),
        None => DeviceTarget::default(),
    };

    match command {
        Command::Status => print_json(&player.get_player_state().await?)?,
        Command::Devices => print_json(&player.list_devices().await?)?,
        Command::Queue => print_json(&player.get_queue().await?)?,
        Command::Now => print_json(&player.get_currently_playing().await?)?,
        Command::Play {
            context,
            uris,
            offset_position,
            offset_uri,
            position_ms,
        } => {
            let offset = (offset_position.is_some() || offset_uri.is_some()).then(|| Offset {
                position: offset_position,
                uri: offset_uri,
            });
            let options = PlayOptions {
                device_id: target.device_id,
                context_uri: context,
                uris: (!uris.is_empty()).then_some(uris),
                offset,
                position_ms,
            };
            player.play(&options).await?;
        }
        Command::Pause => player.pause(&target).await?,
        Command::Next => player.next(&target).await?,
        Command::Previous => player.previous(&target).await?,
        Command::Seek { position_ms } => player.seek(position_ms, &target).await?,
        Command::Shuffle { state } => {
            player.shuffle(matches!(state, Toggle::On), &target).await?
        }
        Command::Repeat { state } => player.repeat(state.into(), &target).await?,
        Command::Volume { percent } => player.volume(percent, &target).await?,
        Command::Transfer { target: to, play } => {
            let device_id = resolve_device(player, &to).await?;
            player.transfer(&device_id, play).await?;
        }
        Command::Enqueue { uri } => player.queue_uri(&uri, &target).await?,
    }

    Ok(())
}

/// Map a device name to its id. Unknown values are used as ids unchanged.
async fn resolve_device(player: &PlaybackAdapter<SpotifyClient>, id_or_name: &str) -> Result<String> {
    match player.find_device(id_or_name).await? {
        Some(device) => {
            tracing::debug!(device_name = %device.name, device_id = ?device.id, "Resolved device");
            Ok(device.id.unwrap_or_else(|| id_or_name.to_string()))
        }
        None => {
            tracing::debug!(device = id_or_name, "Device not listed, using value as id");
            Ok(id_or_name.to_string())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
