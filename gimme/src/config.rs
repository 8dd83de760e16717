use clap::Parser;
use gimme_core::store::firestore;
use std::path::PathBuf;

/// A terminal playground for sharing code snippets by reference code
#[derive(Parser, Debug)]
#[clap(version)]
pub struct Config {
    /// The project whose database holds the snippets
    #[clap(long, env = "GIMME_PROJECT_ID")]
    pub project_id: String,

    /// Web API key for the project, if its rules require one
    #[clap(long, env = "GIMME_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Where the document store lives. Point this at an emulator for local
    /// development.
    #[clap(long, env = "GIMME_ENDPOINT", default_value = firestore::DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Which collection snippets go in
    #[clap(long, env = "GIMME_COLLECTION", default_value = firestore::DEFAULT_COLLECTION)]
    pub collection: String,

    /// Where should we write logs?
    #[clap(long)]
    log_dir: Option<PathBuf>,
}

impl Config {
    /// Get either the configured or a default log directory. If no data
    /// directory can be found (e.g. because `$HOME` is unset) we will use the
    /// current directory.
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("dev", "gimme", "gimme")
                    .map(|dirs| dirs.data_local_dir().join("logs"))
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Build a store client from this configuration.
    pub fn store(&self, http: reqwest::Client) -> firestore::Client {
        firestore::Client::new(http, self.endpoint.clone(), self.project_id.clone())
            .with_collection(self.collection.clone())
            .with_api_key(self.api_key.clone())
    }
}
