use std::env;
use std::fmt;
use std::fs;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::map::{MapVersion, MetroMap};
use crate::store::MapStore;

/// Canonical source of the published map document.
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/metronav/metro-data/main/metro_data.json";

/// Environment variable that redirects the refresh to a local file,
/// bypassing the network. Used by tests and offline work.
pub const DATA_SOURCE_ENV: &str = "METRONAV_DATA_SOURCE";

/// What a refresh did to the local document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No local document existed; the fetched one was installed.
    Installed { version: MapVersion },
    /// The fetched document was newer and replaced the local one.
    Updated { from: MapVersion, to: MapVersion },
    /// The local document is already current.
    UpToDate { version: MapVersion },
}

impl fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshOutcome::Installed { .. } => write!(f, "无本地文件，已下载最新数据。"),
            RefreshOutcome::Updated { from, to } => {
                write!(f, "完成版本更新：{from} -> {to}。")
            }
            RefreshOutcome::UpToDate { version } => {
                write!(f, "当前版本与远程仓库版本一致，版本均为：{version}。")
            }
        }
    }
}

/// Fetch the document at `url` and update the store if it is newer.
pub fn refresh_map(store: &MapStore, url: &str) -> Result<RefreshOutcome> {
    let document = fetch_document(url)?;
    refresh_map_from_document(store, &document)
}

/// Update the store from an already fetched document.
///
/// The fetched document is fully decoded before anything is written, so a
/// malformed fetch aborts the refresh with the local file untouched. A
/// local document that fails to load is treated as absent and replaced.
pub fn refresh_map_from_document(store: &MapStore, document: &Value) -> Result<RefreshOutcome> {
    let fetched = MetroMap::from_value(document)?;
    let local_version = match store.load() {
        Ok(map) => Some(map.version),
        Err(Error::DataFileNotFound { .. }) => None,
        Err(err) => {
            warn!(error = %err, "local map document unreadable, replacing it");
            None
        }
    };
    match local_version {
        None => {
            store.replace(document)?;
            info!(version = %fetched.version, "map document installed");
            Ok(RefreshOutcome::Installed {
                version: fetched.version,
            })
        }
        Some(local) if fetched.version.is_newer_than(&local) => {
            store.replace(document)?;
            info!(from = %local, to = %fetched.version, "map document updated");
            Ok(RefreshOutcome::Updated {
                from: local,
                to: fetched.version,
            })
        }
        Some(_) => Ok(RefreshOutcome::UpToDate {
            version: fetched.version,
        }),
    }
}

fn fetch_document(url: &str) -> Result<Value> {
    if let Ok(path) = env::var(DATA_SOURCE_ENV) {
        debug!(%path, "reading map document from the local override");
        let raw = fs::read_to_string(&path)?;
        return Ok(serde_json::from_str(&raw)?);
    }
    let client = build_client()?;
    let response = client.get(url).send()?.error_for_status()?;
    Ok(response.json()?)
}

fn build_client() -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!(
            "metronav-lib/",
            env!("CARGO_PKG_VERSION"),
            " (https://github.com/metronav/metronav)"
        ))
        .build()?)
}
