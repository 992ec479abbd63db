// src/utils.rs
use anyhow::Result;

/// Normalize a language name or code to a two-letter code; unknown values pass through lower-cased
pub fn normalize_language(lang: &str) -> String {
    let lang = lang.trim().to_lowercase();
    let code = match lang.as_str() {
        "fr" | "french" | "français" | "francais" => "fr",
        "en" | "english" | "anglais" => "en",
        "es" | "spanish" | "español" | "espanol" => "es",
        "de" | "german" | "deutsch" => "de",
        "it" | "italian" | "italiano" => "it",
        "pt" | "portuguese" | "português" => "pt",
        "nl" | "dutch" | "nederlands" => "nl",
        "ar" | "arabic" => "ar",
        "zh" | "chinese" => "zh",
        "ja" | "japanese" => "ja",
        _ => return lang,
    };
    code.to_string()
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate file extension against allowed types
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<String> {
    let ext = get_file_extension(filename)
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", filename))?;

    if !allowed.contains(&ext.as_str()) {
        anyhow::bail!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext,
            allowed
        );
    }

    Ok(ext)
}

/// Truncate to at most `max` characters, appending an ellipsis when cut
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max).collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_language() {
        assert_eq!(normalize_language("English"), "en");
        assert_eq!(normalize_language(" french "), "fr");
        assert_eq!(normalize_language("Deutsch"), "de");
        assert_eq!(normalize_language("es"), "es");
        assert_eq!(normalize_language("SV"), "sv");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(get_file_extension("cv.PDF").as_deref(), Some("pdf"));
        assert_eq!(get_file_extension("README"), None);
        assert_eq!(validate_file_extension("cv.txt", &["txt", "pdf"]).unwrap(), "txt");
        assert!(validate_file_extension("cv.exe", &["txt", "pdf"]).is_err());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc…");
    }
}
