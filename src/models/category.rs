use serde::{Deserialize, Serialize};
use std::fmt;

/// Listing classification; the variant records which feed taxonomy it came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Category {
    Residential {
        id: Option<String>,
        name: String,
    },
    Commercial {
        id: Option<String>,
        name: String,
    },
    Business {
        id: Option<String>,
        name: String,
        sub_category: Option<String>,
    },
}

impl Category {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Residential { .. } => "residential",
            Self::Commercial { .. } => "commercial",
            Self::Business { .. } => "business",
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Residential { id, .. } | Self::Commercial { id, .. } | Self::Business { id, .. } => {
                id.as_deref()
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Residential { name, .. }
            | Self::Commercial { name, .. }
            | Self::Business { name, .. } => name,
        }
    }

    /// Trimmed, non-empty path segments: the name, then the sub-category if any.
    /// A business sub-category without a name yields no segments at all.
    pub fn path(&self) -> Vec<&str> {
        let name = self.name().trim();
        if name.is_empty() {
            return Vec::new();
        }

        let mut segments = vec![name];
        if let Self::Business {
            sub_category: Some(sub),
            ..
        } = self
        {
            let sub = sub.trim();
            if !sub.is_empty() {
                segments.push(sub);
            }
        }
        segments
    }

    pub fn path_string(&self, delim: &str) -> String {
        self.path().join(delim)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_string(" > "))
    }
}
