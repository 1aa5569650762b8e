use anyhow::{Context, Result, anyhow, bail};
use chrono_tz::Tz;
use std::env;
use std::path::PathBuf;

pub const EXPO_PUSH_ENDPOINT: &str = "https://exp.host/--/api/v2/push/send";
pub const DEFAULT_TIMEZONE: &str = "Europe/London";

/// Process-wide configuration, resolved once at startup and read-only
/// afterwards. Provider credentials are deliberately *not* resolved here;
/// they are looked up at generation time so rotation needs no restart.
#[derive(Debug, Clone)]
pub struct MedelConfig {
    /// Expo push token(s); comma-separated for multiple devices.
    pub push_tokens: String,
    pub gateway_url: String,
    /// Holds the counter file and the message log.
    pub store_dir: PathBuf,
    /// Zone used for log record timestamps.
    pub timezone: Tz,
    /// Whether to prepend the master instruction to the chosen prompt.
    pub master_prompt: bool,
}

fn env_non_empty(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

fn parse_push_tokens(raw: Option<String>) -> Result<String> {
    let raw = raw.context("EXPO_PUSH_TOKENS is required and cannot be empty")?;
    // A value like "," survives the non-empty check but carries no tokens.
    if !raw.split(',').any(|t| !t.trim().is_empty()) {
        bail!("EXPO_PUSH_TOKENS contains no usable tokens: {raw:?}");
    }
    Ok(raw)
}

fn parse_timezone(raw: Option<String>) -> Result<Tz> {
    let name = raw.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
    name.parse::<Tz>()
        .map_err(|_| anyhow!("MEDEL_TIMEZONE is not a valid IANA zone: {name}"))
}

fn parse_bool(raw: Option<String>, fallback: bool) -> bool {
    match raw.as_deref() {
        Some(v) => matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => fallback,
    }
}

fn resolve_store_dir(medel_home: Option<String>, home_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = medel_home {
        return Ok(PathBuf::from(dir));
    }
    let home = home_dir.context("HOME directory could not be resolved")?;
    Ok(home.join(".medel"))
}

pub fn load() -> Result<MedelConfig> {
    let push_tokens = parse_push_tokens(env_non_empty("EXPO_PUSH_TOKENS"))?;
    let gateway_url =
        env_non_empty("MEDEL_GATEWAY_URL").unwrap_or_else(|| EXPO_PUSH_ENDPOINT.to_string());
    let store_dir = resolve_store_dir(env_non_empty("MEDEL_HOME"), dirs::home_dir())?;
    let timezone = parse_timezone(env_non_empty("MEDEL_TIMEZONE"))?;
    let master_prompt = parse_bool(env_non_empty("MEDEL_MASTER_PROMPT"), true);

    Ok(MedelConfig {
        push_tokens,
        gateway_url,
        store_dir,
        timezone,
        master_prompt,
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_bool, parse_push_tokens, parse_timezone, resolve_store_dir};
    use std::path::PathBuf;

    #[test]
    fn push_tokens_require_at_least_one_usable_entry() {
        assert!(parse_push_tokens(None).is_err());
        assert!(parse_push_tokens(Some(",".to_string())).is_err());
        assert!(parse_push_tokens(Some(", ,".to_string())).is_err());

        let got = parse_push_tokens(Some("tok-a, tok-b".to_string())).expect("valid tokens");
        assert_eq!(got, "tok-a, tok-b");
    }

    #[test]
    fn timezone_defaults_to_london() {
        let tz = parse_timezone(None).expect("default zone parses");
        assert_eq!(tz.name(), "Europe/London");
    }

    #[test]
    fn timezone_rejects_garbage() {
        assert!(parse_timezone(Some("Atlantis/Mu".to_string())).is_err());
    }

    #[test]
    fn master_prompt_toggle_parses_common_spellings() {
        assert!(parse_bool(None, true));
        assert!(parse_bool(Some("1".to_string()), false));
        assert!(parse_bool(Some("TRUE".to_string()), false));
        assert!(!parse_bool(Some("0".to_string()), true));
        assert!(!parse_bool(Some("off".to_string()), true));
    }

    #[test]
    fn store_dir_prefers_medel_home() {
        let got = resolve_store_dir(
            Some("/var/lib/medel".to_string()),
            Some(PathBuf::from("/home/alice")),
        )
        .expect("resolves");
        assert_eq!(got, PathBuf::from("/var/lib/medel"));

        let got = resolve_store_dir(None, Some(PathBuf::from("/home/alice"))).expect("resolves");
        assert_eq!(got, PathBuf::from("/home/alice/.medel"));
    }
}
