use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SchoolError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

// DNI、护照、外国人证件号：字母数字与连字符
static DOCUMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]{6,20}$").expect("Invalid document regex"));

/// 学年允许的范围
pub const ACADEMIC_YEARS: std::ops::RangeInclusive<i32> = 2000..=2100;

const MAX_NAME_LEN: usize = 120;

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_document_number(document: &str) -> Result<(), &'static str> {
    if !DOCUMENT_RE.is_match(document.trim()) {
        return Err("Document number must be 6-20 letters, digits or hyphens");
    }
    Ok(())
}

/// 必填文本字段：去掉首尾空白后不能为空，也不能过长
pub fn require_text(field: &str, value: &str) -> Result<(), SchoolError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SchoolError::validation(format!("{field} cannot be empty")));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(SchoolError::validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_academic_year(year: i32) -> Result<(), SchoolError> {
    if !ACADEMIC_YEARS.contains(&year) {
        return Err(SchoolError::validation(format!(
            "academic_year must be between {} and {}",
            ACADEMIC_YEARS.start(),
            ACADEMIC_YEARS.end()
        )));
    }
    Ok(())
}

fn long_enough(p: &str) -> bool {
    p.chars().count() >= 8
}

fn has_uppercase(p: &str) -> bool {
    p.chars().any(|c| c.is_ascii_uppercase())
}

fn has_lowercase(p: &str) -> bool {
    p.chars().any(|c| c.is_ascii_lowercase())
}

fn has_digit(p: &str) -> bool {
    p.chars().any(|c| c.is_ascii_digit())
}

type PasswordRule = (fn(&str) -> bool, &'static str);

const PASSWORD_RULES: &[PasswordRule] = &[
    (long_enough, "Password must be at least 8 characters long"),
    (has_uppercase, "Password must contain at least one uppercase letter"),
    (has_lowercase, "Password must contain at least one lowercase letter"),
    (has_digit, "Password must contain at least one digit"),
];

const COMMON_PASSWORDS: &[&str] = &[
    "password1",
    "qwerty123",
    "admin123",
    "abcd1234",
    "colegio123",
    "colegio2025",
    "profesor1",
    "docente123",
];

/// 返回所有未满足的规则，空表示通过
pub fn password_violations(password: &str) -> Vec<&'static str> {
    let mut violations: Vec<&'static str> = PASSWORD_RULES
        .iter()
        .filter(|(check, _)| !check(password))
        .map(|(_, msg)| *msg)
        .collect();

    let lowered = password.to_ascii_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        violations.push("Password is too common, please choose a stronger password");
    }
    violations
}

pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let violations = password_violations(password);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert!(validate_email("ana.mendoza@colegio.edu.pe").is_ok());
        assert!(validate_email("  owner@localhost.dev ").is_ok());
        assert!(validate_email("no-at-sign.pe").is_err());
        assert!(validate_email("ana@colegio").is_err());
    }

    #[test]
    fn test_document_number() {
        assert!(validate_document_number("45879632").is_ok());
        assert!(validate_document_number("CE-001245").is_ok());
        assert!(validate_document_number("123").is_err());
        assert!(validate_document_number("4587 9632").is_err());
    }

    #[test]
    fn test_require_text() {
        assert!(require_text("name", "Matematica").is_ok());
        assert!(matches!(
            require_text("name", "   "),
            Err(SchoolError::Validation(msg)) if msg == "name cannot be empty"
        ));
        assert!(require_text("name", &"x".repeat(121)).is_err());
    }

    #[test]
    fn test_academic_year_bounds() {
        assert!(validate_academic_year(2025).is_ok());
        assert!(validate_academic_year(1999).is_err());
        assert!(validate_academic_year(2101).is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(password_violations("SecurePass123").is_empty());
        assert_eq!(
            password_violations("abcd5678"),
            vec!["Password must contain at least one uppercase letter"]
        );
        assert_eq!(password_violations("Ab1").len(), 1);
        assert_eq!(password_violations("ABCDEFGH").len(), 2);
    }

    #[test]
    fn test_common_password_rejected_case_insensitively() {
        let err = validate_password_simple("Colegio123").unwrap_err();
        assert!(err.contains("too common"));
    }
}
