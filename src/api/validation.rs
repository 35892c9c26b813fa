use super::ApiError;

/// Parses the `page` query value. Absent means the first page.
pub fn validate_page(raw: Option<&str>) -> Result<u32, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(1);
    };

    match raw.parse::<i64>() {
        Ok(page) if page >= 1 => u32::try_from(page).map_err(|_| {
            ApiError::validation(format!("Invalid page: {page}. Page is too large"))
        }),
        Ok(page) => Err(ApiError::validation(format!(
            "Invalid page: {page}. Page must be a positive integer"
        ))),
        Err(_) => Err(ApiError::validation(format!(
            "Invalid page: {raw}. Page must be a positive integer"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_page() {
        assert_eq!(validate_page(None).unwrap(), 1);
        assert_eq!(validate_page(Some("")).unwrap(), 1);
        assert_eq!(validate_page(Some("3")).unwrap(), 3);
        assert_eq!(validate_page(Some(" 12 ")).unwrap(), 12);
        assert!(validate_page(Some("0")).is_err());
        assert!(validate_page(Some("-1")).is_err());
        assert!(validate_page(Some("two")).is_err());
        assert!(validate_page(Some("99999999999")).is_err());
    }
}
