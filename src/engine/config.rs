use std::fmt;
use std::str::FromStr;

use clap::Parser;

/// Command-line configuration for the triangle window.
#[derive(Debug, Clone, Parser)]
#[command(name = "hello-triangle", about = "Opens a window and draws a single triangle")]
pub struct Config {
    /// Window title.
    #[arg(long, default_value = "LearnOpenGL")]
    pub title: String,

    /// Initial inner width in physical pixels.
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Initial inner height in physical pixels.
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Requested core-profile OpenGL version, as MAJOR.MINOR.
    #[arg(long = "gl-version", default_value = "4.6")]
    pub gl_version: GlVersion,

    /// Disable vsync on buffer swaps.
    #[arg(long)]
    pub no_vsync: bool,

    /// Logger filter in `env_logger` syntax (e.g. "debug" or "hello_triangle=debug").
    #[arg(long = "log")]
    pub log_filter: Option<String>,
}

impl Config {
    pub fn vsync(&self) -> bool {
        !self.no_vsync
    }
}

/// OpenGL context version, e.g. `4.6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlVersion {
    pub major: u8,
    pub minor: u8,
}

impl GlVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// GLSL `#version` number matching this context, e.g. `460` for 4.6.
    ///
    /// Only meaningful for 3.3 and later, where GLSL and GL versions line up.
    pub fn glsl(&self) -> u32 {
        self.major as u32 * 100 + self.minor as u32 * 10
    }
}

impl Default for GlVersion {
    fn default() -> Self {
        Self::new(4, 6)
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GlVersionError {
    #[error("expected MAJOR.MINOR, got {0:?}")]
    Malformed(String),
    #[error("core profile requires OpenGL 3.3 or later, got {0}")]
    Unsupported(GlVersion),
}

impl FromStr for GlVersion {
    type Err = GlVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || GlVersionError::Malformed(s.to_string());

        let (major, minor) = s.trim().split_once('.').ok_or_else(malformed)?;
        let major: u8 = major.parse().map_err(|_| malformed())?;
        let minor: u8 = minor.parse().map_err(|_| malformed())?;
        if minor > 9 {
            return Err(malformed());
        }

        let version = GlVersion::new(major, minor);
        if (major, minor) < (3, 3) {
            return Err(GlVersionError::Unsupported(version));
        }
        Ok(version)
    }
}
