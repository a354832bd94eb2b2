//! Cloud provider version-string quirks.

use std::fmt;

use semver::Version;

use crate::version::minor_version;

/// Cloud provider a cluster runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudProvider {
    Aws,
    Gcp,
    Azure,
    Other(String),
}

impl CloudProvider {
    /// Parse a provider cloud name. Matching is case-insensitive; unknown
    /// names are kept as [`CloudProvider::Other`].
    pub fn parse(cloud: &str) -> Self {
        let cloud = cloud.trim();
        match cloud.to_ascii_lowercase().as_str() {
            "aws" => Self::Aws,
            "gcp" | "google" => Self::Gcp,
            "azure" => Self::Azure,
            _ => Self::Other(cloud.to_string()),
        }
    }

    /// EKS rejects patch-qualified versions on cluster updates.
    pub fn truncates_patch(&self) -> bool {
        matches!(self, Self::Aws)
    }

    /// Render `raw` the way this provider's API expects it.
    pub fn format_version(&self, raw: &str, version: &Version) -> String {
        if self.truncates_patch() {
            minor_version(version)
        } else {
            raw.to_string()
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aws => write!(f, "aws"),
            Self::Gcp => write!(f, "gcp"),
            Self::Azure => write!(f, "azure"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_providers() {
        assert_eq!(CloudProvider::parse("aws"), CloudProvider::Aws);
        assert_eq!(CloudProvider::parse("AWS"), CloudProvider::Aws);
        assert_eq!(CloudProvider::parse(" gcp "), CloudProvider::Gcp);
        assert_eq!(CloudProvider::parse("Azure"), CloudProvider::Azure);
    }

    #[test]
    fn test_parse_unknown_provider() {
        assert_eq!(
            CloudProvider::parse("equinix"),
            CloudProvider::Other("equinix".to_string())
        );
    }

    #[test]
    fn test_format_version() {
        let version = Version::new(1, 27, 3);
        assert_eq!(CloudProvider::Aws.format_version("1.27.3", &version), "1.27");
        assert_eq!(
            CloudProvider::Gcp.format_version("1.27.3", &version),
            "1.27.3"
        );
        assert_eq!(
            CloudProvider::Other("kind".to_string()).format_version("v1.27.3", &version),
            "v1.27.3"
        );
    }

    #[test]
    fn test_display_round_trips_name() {
        assert_eq!(CloudProvider::Aws.to_string(), "aws");
        assert_eq!(CloudProvider::parse("kind").to_string(), "kind");
    }
}
