//! Blocking fetch of the hosted dashboard datasets.
//!
//! The datasets are flat CSV files published at a fixed location and read
//! once at process start; everything downstream works on the in-memory
//! panel.

use crate::models::TimeKey;
use crate::panel::Panel;
use crate::storage;
use anyhow::{Context, Result, bail};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::time::Duration;

/// The hosted panel datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// Census intercensal population estimates, annual.
    Population,
    /// Local area unemployment statistics, monthly.
    LaborMarket,
    /// BEA regional accounts (real GDP, per-capita income), annual.
    RegionalAccounts,
}

impl Dataset {
    pub fn file_name(self) -> &'static str {
        match self {
            Dataset::Population => "pop.csv",
            Dataset::LaborMarket => "lau.csv",
            Dataset::RegionalAccounts => "bea.csv",
        }
    }

    /// Cadence of the series, which decides the rebasing period key.
    pub fn time_key(self) -> TimeKey {
        match self {
            Dataset::LaborMarket => TimeKey::Date,
            Dataset::Population | Dataset::RegionalAccounts => TimeKey::Year,
        }
    }

    /// Earliest year kept after alignment.
    pub fn year_floor(self) -> Option<i32> {
        Some(2000)
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("econ_trends/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client build");
        Self {
            base_url: "https://raw.githubusercontent.com/garycl/EconApp/master/data".into(),
            http,
        }
    }
}

impl Client {
    /// Download one dataset and parse it into a panel.
    ///
    /// Transient transport failures (5xx, network errors) are retried with
    /// a short backoff; other HTTP statuses fail immediately.
    pub fn fetch(&self, dataset: Dataset) -> Result<Panel> {
        let url = format!("{}/{}", self.base_url, dataset.file_name());
        let body = self
            .get_with_retry(&url)
            .with_context(|| format!("GET {}", url))?;
        let panel = storage::read_panel(body.as_bytes())
            .with_context(|| format!("parse {}", dataset.file_name()))?;
        log::info!("fetched {}: {} rows", dataset.file_name(), panel.len());
        Ok(panel)
    }

    fn get_with_retry(&self, url: &str) -> Result<String> {
        let mut last_err: Option<anyhow::Error> = None;
        for backoff_ms in [100u64, 300, 700] {
            match self.http.get(url).send() {
                Ok(r) if r.status().is_success() => {
                    return r.text().context("read body");
                }
                Ok(r) if r.status().is_server_error() => { /* retry */ }
                Ok(r) => bail!("request failed with HTTP {}", r.status()),
                Err(e) => last_err = Some(e.into()),
            }
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        bail!("network error: {:?}", last_err);
    }
}
