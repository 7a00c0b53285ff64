use anyhow::Result;
use url::Url;

/// Validate a URL and return normalized version
pub fn validate_and_normalize_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url)
        .map_err(|_| anyhow::anyhow!("Invalid URL format: {}", url))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("URL must use HTTP or HTTPS protocol");
    }

    Ok(parsed.to_string())
}

/// Parse language code and return the region-qualified version
pub fn normalize_language_code(lang: &str) -> String {
    let normalized = match lang.to_lowercase().as_str() {
        "en" => "en-US",
        "es" => "es-ES",
        "fr" => "fr-FR",
        "de" => "de-DE",
        "it" => "it-IT",
        "pt" => "pt-BR",
        "ja" => "ja-JP",
        "ko" => "ko-KR",
        "zh" => "zh-CN",
        "ar" => "ar-SA",
        "hi" => "hi-IN",
        "ru" => "ru-RU",
        _ => lang, // Return as-is if no mapping found
    };

    normalized.to_string()
}

/// Build an `Accept-Language` value that puts the preferred language first and English after it
pub fn accept_language_header(preferred_language: Option<&str>) -> String {
    let Some(lang) = preferred_language.map(str::trim).filter(|lang| !lang.is_empty()) else {
        return "en-US,en;q=0.9".to_string();
    };

    let region = normalize_language_code(lang);
    let base = region
        .split('-')
        .next()
        .unwrap_or(region.as_str())
        .to_lowercase();

    let mut parts = vec![region.clone()];
    if base != region {
        parts.push(format!("{};q=0.9", base));
    }
    if base != "en" {
        parts.push("en-US;q=0.8".to_string());
        parts.push("en;q=0.7".to_string());
    }

    parts.join(",")
}

/// Format milliseconds as `HH:MM:SS<sep>mmm`
pub fn format_timestamp(ms: u64, millis_separator: char) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;

    format!("{:02}:{:02}:{:02}{}{:03}", hours, minutes, seconds, millis_separator, millis)
}

/// Format milliseconds as a short clock, `MM:SS` or `H:MM:SS`
pub fn format_clock(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
