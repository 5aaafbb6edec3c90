use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported cipher modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Cfb,
    Ctr,
    Gcm,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Cfb => "cfb",
            Mode::Ctr => "ctr",
            Mode::Gcm => "gcm",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
