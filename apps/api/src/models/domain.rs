use std::fmt;

use serde::{Deserialize, Serialize};

/// Generation target a refinement session is working towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Image,
    Video,
    Dev,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Image, Domain::Video, Domain::Dev];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Image => "image",
            Domain::Video => "video",
            Domain::Dev => "dev",
        }
    }

    /// Lenient lookup for string-typed requests. Unknown names yield `None`
    /// and callers degrade to an empty slot set.
    pub fn parse(name: &str) -> Option<Domain> {
        let name = name.trim().to_lowercase();
        Domain::ALL.into_iter().find(|d| d.as_str() == name)
    }

    /// Heading used when assembling a draft prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Domain::Image => "이미지 생성",
            Domain::Video => "영상 생성",
            Domain::Dev => "개발 작업",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
