//! Validated name types
//!
//! Newtype wrappers for names that end up on disk or inside archives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Basename used when no output name is configured
pub const FALLBACK_OUTPUT_NAME: &str = "out";

/// Base name of every delivered file
///
/// Delivered files are named `<basename>.<ext>`; archive members use the same
/// basename. The name must be non-empty and must not contain path separators.
///
/// # Examples
///
/// ```
/// use geoexport::domain::ids::OutputName;
///
/// let name = OutputName::new("shapes").unwrap();
/// assert_eq!(name.file_name("geojson"), "shapes.geojson");
/// assert!(OutputName::new("../escape").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputName(String);

impl OutputName {
    /// Creates a new OutputName from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(OutputName)` if the name is valid, `Err` otherwise
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Output name cannot be empty".to_string());
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(format!(
                "Output name must not contain path separators: '{name}'"
            ));
        }
        Ok(Self(name))
    }

    /// The fallback basename
    pub fn fallback() -> Self {
        Self(FALLBACK_OUTPUT_NAME.to_string())
    }

    /// Returns the configured name, or the fallback when none is set
    pub fn or_fallback(name: Option<&str>) -> Result<Self, String> {
        match name {
            Some(n) => Self::new(n),
            None => Ok(Self::fallback()),
        }
    }

    /// Returns the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<basename>.<ext>`
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }
}

impl fmt::Display for OutputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OutputName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for OutputName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
