//! The root `<COLLADA version="...">` gate

use crate::error::{Error, Result};
use crate::model::Version;

use super::numeric::parse_unsigned_prefix;

/// Parse `major.minor[.patch...]`
///
/// The string must be at least five characters long and contain at least two
/// dots. Components read their leading digits, so `1.4.1` is `1.4` and `1.x.0`
/// is `1.0`.
pub fn parse_version(version: &str) -> Option<Version> {
    if version.len() < 5 {
        return None;
    }
    let (major, rest) = version.split_once('.')?;
    let (minor, _) = rest.split_once('.')?;
    let component = |s: &str| u32::try_from(parse_unsigned_prefix(s)).unwrap_or(u32::MAX);
    Some(Version::new(component(major), component(minor)))
}

/// Reject malformed versions and versions newer than `max`
///
/// Versions compare as `(major, minor)` pairs, so a lower major accepts any
/// minor: `0.9.0` passes a `1.4` maximum.
pub(crate) fn check_max_version(version: &str, max: Version) -> Result<()> {
    let declared = parse_version(version).ok_or_else(|| Error::InvalidVersion(version.to_string()))?;
    if declared > max {
        return Err(Error::UnsupportedVersion {
            version: version.to_string(),
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: Version = Version::new(1, 4);

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("1.4.1"), Some(Version::new(1, 4)));
        assert_eq!(parse_version("1.5.0"), Some(Version::new(1, 5)));
        assert_eq!(parse_version("10.20.3"), Some(Version::new(10, 20)));
    }

    #[test]
    fn test_lower_precision_is_invalid() {
        assert_eq!(parse_version("1.4"), None);
        assert_eq!(parse_version("14100"), None);
        assert_eq!(parse_version("1.40"), None);
        assert_eq!(parse_version(""), None);
    }

    #[test]
    fn test_accepts_up_to_max() {
        assert!(check_max_version("1.4.1", MAX).is_ok());
        assert!(check_max_version("1.3.0", MAX).is_ok());
        assert!(check_max_version("0.9.0", MAX).is_ok());
        assert!(check_max_version("0.12.0", MAX).is_ok());
    }

    #[test]
    fn test_rejects_newer_versions() {
        let err = check_max_version("1.5.0", MAX).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion { ref version, .. } if version == "1.5.0"));
        assert!(check_max_version("2.0.0", MAX).is_err());
    }

    #[test]
    fn test_rejects_malformed_versions() {
        let err = check_max_version("1.4", MAX).unwrap_err();
        assert!(matches!(err, Error::InvalidVersion(ref v) if v == "1.4"));
        assert!(check_max_version("", MAX).unwrap_err().is_format_error());
    }
}
