use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub world: WorldSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub status: StatusSection,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_motd")]
    pub motd: String,
    #[serde(default = "default_max_players")]
    pub max_players: u32,
    #[serde(default = "default_online_mode")]
    pub online_mode: bool,
}

fn default_address() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    25565
}

fn default_motd() -> String {
    "A jcraft server".into()
}

fn default_max_players() -> u32 {
    20
}

fn default_online_mode() -> bool {
    true
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            motd: default_motd(),
            max_players: default_max_players(),
            online_mode: default_online_mode(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WorldSection {
    /// Directory holding Anvil region files; flat terrain is generated when
    /// absent or unreadable.
    #[serde(default)]
    pub region_dir: Option<String>,
    #[serde(default = "default_spawn_y")]
    pub spawn_y: f64,
}

fn default_spawn_y() -> f64 {
    70.0
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            region_dir: None,
            spawn_y: default_spawn_y(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusSection {
    /// Path to a 64×64 PNG served as the list favicon.
    #[serde(default)]
    pub favicon: Option<String>,
}

impl ServerConfig {
    /// Load the config, falling back to defaults when the file is absent.
    /// A present-but-invalid file is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
