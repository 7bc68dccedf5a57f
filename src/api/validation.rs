use url::Url;

use super::ApiError;

pub fn validate_game_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid game ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_url(field: &str, value: &str) -> Result<(), ApiError> {
    let parsed = Url::parse(value)
        .map_err(|_| ApiError::validation(format!("Invalid {}: must be a valid URL", field)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::validation(format!(
            "Invalid {}: only http and https URLs are allowed",
            field
        )));
    }

    Ok(())
}

/// Empty strings are treated as "no link"; anything else must parse as a URL.
pub fn normalize_optional_url(field: &str, value: Option<String>) -> Result<Option<String>, ApiError> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) => {
            validate_url(field, &v)?;
            Ok(Some(v))
        }
    }
}

pub fn validate_required(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{} is required", field)));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Email required"));
    }

    let valid = trimmed.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
    });
    if !valid || trimmed.contains(char::is_whitespace) {
        return Err(ApiError::validation("Invalid email address"));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    const MIN_LENGTH: usize = 6;

    if password.len() < MIN_LENGTH {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters",
            MIN_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_game_id() {
        assert!(validate_game_id(1).is_ok());
        assert!(validate_game_id(12345).is_ok());
        assert!(validate_game_id(0).is_err());
        assert!(validate_game_id(-1).is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("imageUrl", "https://example.com/cover.jpg").is_ok());
        assert!(validate_url("imageUrl", "http://example.com").is_ok());
        assert!(validate_url("imageUrl", "not-a-url").is_err());
        assert!(validate_url("imageUrl", "ftp://example.com/file").is_err());
        assert!(validate_url("imageUrl", "").is_err());
    }

    #[test]
    fn test_normalize_optional_url() {
        assert_eq!(normalize_optional_url("youtubeUrl", None).unwrap(), None);
        assert_eq!(
            normalize_optional_url("youtubeUrl", Some(String::new())).unwrap(),
            None
        );
        assert_eq!(
            normalize_optional_url("youtubeUrl", Some("   ".to_string())).unwrap(),
            None
        );
        assert_eq!(
            normalize_optional_url("youtubeUrl", Some("https://youtu.be/abc".to_string())).unwrap(),
            Some("https://youtu.be/abc".to_string())
        );
        assert!(normalize_optional_url("youtubeUrl", Some("nope".to_string())).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("admin@example.com").is_ok());
        assert!(validate_email("  admin@example.com  ").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("spa ce@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("longer-password").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("").is_err());
    }
}
