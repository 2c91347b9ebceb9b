use crate::config::SourceConfig;
use crate::models::SummaryPayload;
use crate::error::{DashboardError, DashboardResult};
use std::path::PathBuf;
use log::{info, debug, error};

/// Something that can produce the summary payload on demand.
pub trait DataSource {
    fn describe(&self) -> String;
    fn fetch(&self) -> DashboardResult<SummaryPayload>;
}

impl<T: DataSource + ?Sized> DataSource for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn fetch(&self) -> DashboardResult<SummaryPayload> {
        (**self).fetch()
    }
}

pub struct FileDataSource {
    path: PathBuf,
}

impl FileDataSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for FileDataSource {
    fn describe(&self) -> String {
        format!("file {:?}", self.path)
    }

    fn fetch(&self) -> DashboardResult<SummaryPayload> {
        let content = std::fs::read_to_string(&self.path)?;
        let payload: SummaryPayload = serde_json::from_str(&content)?;
        Ok(payload)
    }
}

pub struct HttpDataSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpDataSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::blocking::Client::new())
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::blocking::Client) -> Self {
        Self { url: url.into(), client }
    }
}

impl DataSource for HttpDataSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> DashboardResult<SummaryPayload> {
        let response = self.client.get(self.url.as_str()).send()?;
        let status = response.status();

        if !status.is_success() {
            return Err(DashboardError::DataSource(
                format!("{} answered with status {}", self.url, status)
            ));
        }

        let payload: SummaryPayload = response.json()?;
        Ok(payload)
    }
}

pub fn source_from_config(config: &SourceConfig) -> Box<dyn DataSource> {
    match config {
        SourceConfig::File { path } => Box::new(FileDataSource::new(path.clone())),
        SourceConfig::Http { url } => Box::new(HttpDataSource::new(url.clone())),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded(SummaryPayload),
    Failed(String),
}

/// Tracks the payload fetch. Failures are kept as state and only re-fetched
/// on an explicit `retry`.
pub struct DataLoader<S: DataSource> {
    source: S,
    state: LoadState,
}

impl<S: DataSource> DataLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: LoadState::Idle,
        }
    }

    pub fn load(&mut self) -> &LoadState {
        info!("Loading summary from {}", self.source.describe());
        self.state = LoadState::Loading;

        self.state = match self.source.fetch() {
            Ok(payload) => {
                payload.check_consistency();
                info!("Loaded {} alerts", payload.alerts.len());
                LoadState::Loaded(payload)
            },
            Err(e) => {
                error!("Failed to load summary from {}: {}", self.source.describe(), e);
                LoadState::Failed(e.to_string())
            },
        };

        &self.state
    }

    pub fn retry(&mut self) -> &LoadState {
        if matches!(self.state, LoadState::Loaded(_)) {
            debug!("Retry requested but payload is already loaded");
            return &self.state;
        }
        self.load()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn payload(&self) -> Option<&SummaryPayload> {
        match &self.state {
            LoadState::Loaded(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn into_payload(self) -> Option<SummaryPayload> {
        match self.state {
            LoadState::Loaded(payload) => Some(payload),
            _ => None,
        }
    }
}
