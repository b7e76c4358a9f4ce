use std::fmt;

/// Host platform families the sweep knows how to probe from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    Unsupported(String),
}

impl Platform {
    /// Detects the platform this binary was built for.
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        let os = os.to_ascii_lowercase();
        if os.contains("windows") {
            Platform::Windows
        } else if os.contains("linux") {
            Platform::Linux
        } else {
            Platform::Unsupported(os)
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => f.write_str("windows"),
            Platform::Linux => f.write_str("linux"),
            Platform::Unsupported(os) => f.write_str(os),
        }
    }
}
