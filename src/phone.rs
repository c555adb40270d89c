use crate::error::{AppError, AppResult};

/// Normalizes user input such as `8 (999) 111-22-33` to `+79991112233`.
pub fn normalize(input: &str) -> AppResult<String> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();

    let digits = match digits.len() {
        10 if digits.starts_with('9') => format!("7{digits}"),
        11 if digits.starts_with('8') => format!("7{}", &digits[1..]),
        _ => digits,
    };

    if digits.len() != 11 {
        return Err(AppError::Validation(
            "phone number must contain 11 digits".into(),
        ));
    }
    Ok(format!("+{digits}"))
}

pub fn validate_code(code: &str) -> AppResult<&str> {
    let code = code.trim();
    if code.len() != 4 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "verification code must be 4 digits".into(),
        ));
    }
    Ok(code)
}
