use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::character::CharacterTemplate;

/// A campaign file as far as the character editor is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignSetting {
    pub title: String,
    pub author: String,
    pub description: String,
    pub characters: Vec<CharacterTemplate>,
}

#[derive(Debug, Error)]
pub enum CampaignIoError {
    #[error("failed to parse campaign: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to decode binary campaign: {0}")]
    Binary(#[from] bincode::Error),
    #[error("failed to read campaign from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write campaign to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CampaignSetting {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_file(path: &Path) -> Result<Self, CampaignIoError> {
        let contents = fs::read_to_string(path).map_err(|source| CampaignIoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let setting = CampaignSetting::from_json_str(&contents)?;
        Ok(setting)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), CampaignIoError> {
        let json = self.to_json_pretty()?;
        fs::write(path, json).map_err(|source| CampaignIoError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Compact fixed-layout encoding used for embedding campaigns.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CampaignIoError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CampaignIoError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
