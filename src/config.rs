use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_HISTORY_FILE, DEFAULT_SLEEP_TIME_SECS, DEFAULT_TAGS,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_FILE,
};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fmt::Debug;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::error;

#[derive(Debug, Deserialize, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub rest_api: RestApiConfig,
    pub upload: UploadConfig,
    pub storage: StorageConfig,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RestApiConfig {
    pub base_url: String,
    pub timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    pub image_dir: PathBuf,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub is_public: bool,
    pub is_friend: bool,
    pub is_family: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub history_file: PathBuf,
    pub token_file: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleConfig {
    /// Seconds to wait between two batches in daemon mode.
    pub interval: u64,
    pub daemon: bool,
}

impl RestApiConfig {
    pub fn rest_url(&self) -> String {
        format!("{}/rest/", self.base_url.trim_end_matches('/'))
    }

    pub fn auth_url(&self) -> String {
        format!("{}/auth/", self.base_url.trim_end_matches('/'))
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload/", self.base_url.trim_end_matches('/'))
    }
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"api_key\":\"[REDACTED]\",\"api_secret\":\"[REDACTED]\"}}"
        )
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"credentials\":{},\"rest_api\":{},\"upload\":{},\"storage\":{},\"schedule\":{}}}",
            self.credentials, self.rest_api, self.upload, self.storage, self.schedule
        )
    }
}

impl fmt::Display for RestApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"base_url\":\"{}\",\"timeout\":{}}}",
            self.base_url, self.timeout
        )
    }
}

impl fmt::Display for UploadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"image_dir\":\"{}\",\"title\":\"{}\",\"description\":\"{}\",\"tags\":\"{}\",\"is_public\":{},\"is_friend\":{},\"is_family\":{}}}",
            self.image_dir.display(),
            self.title,
            self.description,
            self.tags,
            self.is_public,
            self.is_friend,
            self.is_family
        )
    }
}

impl fmt::Display for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"history_file\":\"{}\",\"token_file\":\"{}\"}}",
            self.history_file.display(),
            self.token_file.display()
        )
    }
}

impl fmt::Display for ScheduleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"interval\":{},\"daemon\":{}}}",
            self.interval, self.daemon
        )
    }
}

pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            credentials: Credentials {
                api_key: get_env_or_default("FLICKR_API_KEY", String::new()),
                api_secret: get_env_or_default("FLICKR_API_SECRET", String::new()),
            },
            rest_api: RestApiConfig {
                base_url: get_env_or_default("FLICKR_BASE_URL", String::from(DEFAULT_BASE_URL)),
                timeout: get_env_or_default("FLICKR_TIMEOUT", DEFAULT_TIMEOUT_SECS),
            },
            upload: UploadConfig {
                image_dir: get_env_or_default("UPLOADR_IMAGE_DIR", PathBuf::from(".")),
                title: get_env_or_default("UPLOADR_TITLE", String::new()),
                description: get_env_or_default("UPLOADR_DESCRIPTION", String::new()),
                tags: get_env_or_default("UPLOADR_TAGS", String::from(DEFAULT_TAGS)),
                is_public: get_env_or_default("UPLOADR_IS_PUBLIC", false),
                is_friend: get_env_or_default("UPLOADR_IS_FRIEND", true),
                is_family: get_env_or_default("UPLOADR_IS_FAMILY", true),
            },
            storage: StorageConfig {
                history_file: get_env_or_default(
                    "UPLOADR_HISTORY_FILE",
                    PathBuf::from(DEFAULT_HISTORY_FILE),
                ),
                token_file: get_env_or_default("UPLOADR_TOKEN_FILE", PathBuf::from(DEFAULT_TOKEN_FILE)),
            },
            schedule: ScheduleConfig {
                interval: get_env_or_default("UPLOADR_SLEEP_TIME", DEFAULT_SLEEP_TIME_SECS),
                daemon: get_env_or_default("UPLOADR_DAEMON", false),
            },
        }
    }
}

#[cfg(test)]
impl Config {
    /// Fixed settings rooted at `root`, independent of the process environment.
    pub(crate) fn rooted_at(root: &std::path::Path) -> Self {
        Config {
            credentials: Credentials {
                api_key: "key".to_string(),
                api_secret: "secret".to_string(),
            },
            rest_api: RestApiConfig {
                base_url: String::from(DEFAULT_BASE_URL),
                timeout: DEFAULT_TIMEOUT_SECS,
            },
            upload: UploadConfig {
                image_dir: root.join("images"),
                title: String::new(),
                description: String::new(),
                tags: String::from(DEFAULT_TAGS),
                is_public: false,
                is_friend: true,
                is_family: true,
            },
            storage: StorageConfig {
                history_file: root.join(DEFAULT_HISTORY_FILE),
                token_file: root.join(DEFAULT_TOKEN_FILE),
            },
            schedule: ScheduleConfig {
                interval: DEFAULT_SLEEP_TIME_SECS,
                daemon: false,
            },
        }
    }
}
