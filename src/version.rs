//! Kubernetes version coercion and comparison.
//!
//! Version strings from providers and cluster APIs are loose: `v1.28`,
//! `1.27.3-eks-1`, `1.29`. Everything is coerced once into a
//! [`semver::Version`] triple and compared from there.

use semver::Version;

/// Coerce a loosely formatted version string into `major.minor.patch`.
///
/// Takes the first `MAJOR[.MINOR[.PATCH]]` run of digits in the string, so
/// prefixes (`v`, `=`) and suffixes (`-eks-1`, `+build`) are ignored and
/// missing components default to 0. Returns `None` when the string holds no
/// digits or a component does not fit in a `u64`.
pub fn coerce_version(raw: &str) -> Option<Version> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let mut rest = &raw[start..];
    let mut parts = [0u64; 3];

    for (i, slot) in parts.iter_mut().enumerate() {
        if i > 0 {
            match rest.strip_prefix('.') {
                Some(next) if next.starts_with(|c: char| c.is_ascii_digit()) => rest = next,
                _ => break,
            }
        }
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        *slot = rest[..end].parse().ok()?;
        rest = &rest[end..];
    }

    Some(Version::new(parts[0], parts[1], parts[2]))
}

/// Format a version as `major.minor`, the form EKS accepts.
pub fn minor_version(version: &Version) -> String {
    format!("{}.{}", version.major, version.minor)
}

/// Number of minor releases `candidate` is ahead of `current`.
///
/// `None` when the majors differ or `candidate` is on an older minor.
pub fn minor_steps(current: &Version, candidate: &Version) -> Option<u64> {
    if current.major != candidate.major {
        return None;
    }
    candidate.minor.checked_sub(current.minor)
}

/// True when `candidate` has strictly higher precedence than `current`.
pub fn is_newer(current: &Version, candidate: &Version) -> bool {
    candidate > current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_full_version() {
        assert_eq!(coerce_version("1.27.3"), Some(Version::new(1, 27, 3)));
    }

    #[test]
    fn test_coerce_missing_patch() {
        assert_eq!(coerce_version("1.28"), Some(Version::new(1, 28, 0)));
        assert_eq!(coerce_version("2"), Some(Version::new(2, 0, 0)));
    }

    #[test]
    fn test_coerce_prefixed_and_suffixed() {
        assert_eq!(coerce_version("v1.28"), Some(Version::new(1, 28, 0)));
        assert_eq!(coerce_version("  v1.29.1 "), Some(Version::new(1, 29, 1)));
        assert_eq!(
            coerce_version("1.27.3-eks-1"),
            Some(Version::new(1, 27, 3))
        );
        assert_eq!(coerce_version("v1.30.0+k3s1"), Some(Version::new(1, 30, 0)));
    }

    #[test]
    fn test_coerce_ignores_extra_components() {
        assert_eq!(coerce_version("1.2.3.4"), Some(Version::new(1, 2, 3)));
        assert_eq!(coerce_version("1.28."), Some(Version::new(1, 28, 0)));
    }

    #[test]
    fn test_coerce_invalid() {
        assert_eq!(coerce_version("not-a-version"), None);
        assert_eq!(coerce_version(""), None);
        assert_eq!(coerce_version("v"), None);
        assert_eq!(coerce_version("99999999999999999999999.1"), None);
    }

    #[test]
    fn test_minor_version() {
        assert_eq!(minor_version(&Version::new(1, 27, 3)), "1.27");
    }

    #[test]
    fn test_minor_steps() {
        let current = Version::new(1, 25, 3);
        assert_eq!(minor_steps(&current, &Version::new(1, 25, 4)), Some(0));
        assert_eq!(minor_steps(&current, &Version::new(1, 26, 0)), Some(1));
        assert_eq!(minor_steps(&current, &Version::new(1, 29, 0)), Some(4));
        assert_eq!(minor_steps(&current, &Version::new(1, 24, 0)), None);
        assert_eq!(minor_steps(&current, &Version::new(2, 25, 0)), None);
    }

    #[test]
    fn test_is_newer_is_strict() {
        let current = Version::new(1, 28, 0);
        assert!(is_newer(&current, &Version::new(1, 28, 1)));
        assert!(!is_newer(&current, &Version::new(1, 28, 0)));
        assert!(!is_newer(&current, &Version::new(1, 27, 9)));
    }
}
