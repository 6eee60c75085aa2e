use anyhow::{Context, Result};
use dotenv::dotenv;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:8070";
pub const DEFAULT_DATASET: &str = "online_sales.csv";
pub const DEFAULT_TEMPLATE: &str = "Sales_presentation1.pptx";
pub const DEFAULT_CONVERTER: &str = "inkscape";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub dataset_path: PathBuf,
    pub template_path: PathBuf,
    /// Scratch charts and finished decks are written below this directory.
    pub work_dir: PathBuf,
    pub converter_bin: String,
}

impl AppConfig {
    /// Reads `.env` (if any) and the `SALESBOARD_*` environment variables.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind = value("SALESBOARD_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .with_context(|| format!("SALESBOARD_BIND is not a socket address: {}", bind))?;

        Ok(Self {
            bind_addr,
            dataset_path: value("SALESBOARD_DATASET")
                .unwrap_or_else(|| DEFAULT_DATASET.to_string())
                .into(),
            template_path: value("SALESBOARD_TEMPLATE")
                .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string())
                .into(),
            work_dir: value("SALESBOARD_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join("salesboard")),
            converter_bin: value("SALESBOARD_CONVERTER")
                .unwrap_or_else(|| DEFAULT_CONVERTER.to_string()),
        })
    }
}
