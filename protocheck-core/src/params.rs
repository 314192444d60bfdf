//! Parsing of the protoc plugin parameter string.
//!
//! protoc passes everything after `--checker_opt=` (or before the `:` in
//! `--checker_out=<params>:<dir>`) as one comma-separated string:
//!
//! ```text
//! language_package=java,ignore_package=google,ignore_message=pkg.Legacy
//! ```

use crate::descriptor::PackageSource;
use crate::error::CheckerResult;

/// Parameters recognized by the plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginParams {
    pub language_package: PackageSource,
    /// Package prefixes whose types are never reported
    pub ignore_packages: Vec<String>,
    /// Fully-qualified type names that are never reported
    pub ignore_messages: Vec<String>,
}

impl PluginParams {
    /// Parses `key=value` entries. Unknown keys and empty entries are skipped,
    /// since protoc forwards unrelated options (e.g. `M<file>=<pkg>`).
    pub fn parse(params: &str) -> CheckerResult<Self> {
        let mut result = Self::default();
        for param in params.split(',') {
            let (key, value) = param.split_once('=').unwrap_or((param, ""));
            match key {
                "" => {}
                "language_package" => {
                    result.language_package = PackageSource::from_param(value)?;
                }
                "ignore_package" => result.ignore_packages.push(value.to_string()),
                "ignore_message" => result.ignore_messages.push(value.to_string()),
                _ => {
                    tracing::debug!(param = %key, "ignoring unknown plugin parameter");
                }
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert_eq!(PluginParams::parse("").unwrap(), PluginParams::default());
    }

    #[test]
    fn test_parse_all_keys() {
        let params = PluginParams::parse(
            "language_package=proto,ignore_package=google,ignore_package=com.acme,ignore_message=pkg.Old",
        )
        .unwrap();
        assert_eq!(params.language_package, PackageSource::Proto);
        assert_eq!(params.ignore_packages, vec!["google", "com.acme"]);
        assert_eq!(params.ignore_messages, vec!["pkg.Old"]);
    }

    #[test]
    fn test_parse_skips_unknown_and_empty_entries() {
        let params =
            PluginParams::parse("Mapi.proto=example.com/api,,paths=source_relative,ignore_package=x")
                .unwrap();
        assert_eq!(params.ignore_packages, vec!["x"]);
        assert!(params.ignore_messages.is_empty());
        assert_eq!(params.language_package, PackageSource::Go);
    }

    #[test]
    fn test_parse_value_keeps_later_equals() {
        let params = PluginParams::parse("ignore_message=a=b").unwrap();
        assert_eq!(params.ignore_messages, vec!["a=b"]);
    }

    #[test]
    fn test_parse_key_without_value() {
        let params = PluginParams::parse("ignore_package").unwrap();
        assert_eq!(params.ignore_packages, vec![""]);
    }

    #[test]
    fn test_parse_rejects_unknown_language() {
        assert!(PluginParams::parse("language_package=kotlin").is_err());
    }
}
