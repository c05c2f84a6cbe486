use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const MAIN_IMAGE_ID: &str = "m";
pub const MAIN_FLOOR_PLAN_ID: &str = "1";

/// Where an asset lives: a file next to the feed, or a remote URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssetLocation {
    Local(PathBuf),
    Remote(String),
}

/// Image or floor plan referenced by a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Asset {
    pub id: String,
    pub format: Option<String>,
    pub mod_time: Option<String>,
    pub location: AssetLocation,
}

impl Asset {
    pub fn local_path(&self) -> Option<&Path> {
        match &self.location {
            AssetLocation::Local(path) => Some(path),
            AssetLocation::Remote(_) => None,
        }
    }

    pub fn remote_url(&self) -> Option<&str> {
        match &self.location {
            AssetLocation::Local(_) => None,
            AssetLocation::Remote(url) => Some(url),
        }
    }

    pub fn filename(&self) -> Option<&str> {
        self.local_path()?.file_name()?.to_str()
    }

    pub fn extension(&self) -> Option<&str> {
        self.local_path()?.extension()?.to_str()
    }

    /// True only for local assets that are present on disk.
    pub fn exists(&self) -> bool {
        self.local_path().map(Path::is_file).unwrap_or(false)
    }

    pub fn is_main_image(&self) -> bool {
        self.id == MAIN_IMAGE_ID
    }

    pub fn is_main_floor_plan(&self) -> bool {
        self.id == MAIN_FLOOR_PLAN_ID
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            AssetLocation::Local(path) => write!(f, "{}", path.display()),
            AssetLocation::Remote(url) => f.write_str(url),
        }
    }
}
