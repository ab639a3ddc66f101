use lazy_static::lazy_static;
use regex::Regex;
use shared::{LoginCredentials, SignupCredentials};

pub const MIN_IDENTIFIER_LEN: usize = 3;
pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_STRENGTH: u8 = 3;
const STRONG_PASSWORD_LEN: usize = 6;
const MAX_STRENGTH: u8 = 5;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// One point each for length, uppercase, lowercase, digit and symbol.
pub fn password_strength(password: &str) -> u8 {
    let checks = [
        password.chars().count() >= STRONG_PASSWORD_LEN,
        password.chars().any(|c| c.is_uppercase()),
        password.chars().any(|c| c.is_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
    ];
    let score = checks.iter().filter(|passed| **passed).count() as u8;
    score.min(MAX_STRENGTH)
}

pub fn strength_label(score: u8) -> &'static str {
    match score {
        0 | 1 => "Weak",
        2 => "Fair",
        3 => "Good",
        4 => "Strong",
        _ => "Very strong",
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub identifier: String,
    pub password: String,
    pub remember: bool,
}

impl LoginForm {
    pub fn is_submittable(&self) -> bool {
        self.identifier.trim().chars().count() >= MIN_IDENTIFIER_LEN && !self.password.is_empty()
    }

    pub fn credentials(&self) -> LoginCredentials {
        LoginCredentials {
            identifier: self.identifier.trim().to_string(),
            password: self.password.clone(),
            remember: self.remember,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl SignupForm {
    pub fn strength(&self) -> u8 {
        password_strength(&self.password)
    }

    pub fn is_submittable(&self) -> bool {
        is_valid_email(&self.email)
            && self.username.trim().chars().count() >= MIN_USERNAME_LEN
            && self.strength() >= MIN_PASSWORD_STRENGTH
    }

    pub fn credentials(&self) -> SignupCredentials {
        SignupCredentials {
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(identifier: &str, password: &str) -> LoginForm {
        LoginForm { identifier: identifier.into(), password: password.into(), remember: false }
    }

    fn signup(email: &str, username: &str, password: &str) -> SignupForm {
        SignupForm { email: email.into(), username: username.into(), password: password.into() }
    }

    #[test]
    fn login_identifier_boundary() {
        assert!(!login("ab", "x").is_submittable());
        assert!(login("abc", "x").is_submittable());
        assert!(!login("  ab  ", "x").is_submittable());
    }

    #[test]
    fn login_requires_password() {
        assert!(!login("alice", "").is_submittable());
    }

    #[test]
    fn strength_scoring() {
        assert_eq!(password_strength(""), 0);
        assert_eq!(password_strength("abc"), 1);
        assert_eq!(password_strength("abcdef"), 2);
        assert_eq!(password_strength("abcdeF"), 3);
        assert_eq!(password_strength("abcdF1"), 4);
        assert_eq!(password_strength("abcF1!"), 5);
        assert_eq!(strength_label(3), "Good");
        assert_eq!(strength_label(5), "Very strong");
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email(" a@b.co "));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("@c.de"));
    }

    #[test]
    fn signup_boundaries() {
        // strength exactly 3 passes, 2 does not
        assert!(signup("a@b.co", "bob", "abcdeF").is_submittable());
        assert!(!signup("a@b.co", "bob", "abcdef").is_submittable());
        // username exactly 3 passes, 2 does not
        assert!(!signup("a@b.co", "bo", "abcdeF").is_submittable());
        assert!(!signup("not-an-email", "bob", "abcdeF").is_submittable());
    }

    #[test]
    fn credentials_are_trimmed_but_passwords_are_not() {
        let form = LoginForm {
            identifier: " alice ".into(),
            password: " pw ".into(),
            remember: true,
        };
        let creds = form.credentials();
        assert_eq!(creds.identifier, "alice");
        assert_eq!(creds.password, " pw ");
        assert!(creds.remember);
    }
}
