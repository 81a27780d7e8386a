//! Registration input validation.
//!
//! Every failing condition is collected rather than short-circuited, so the
//! user sees all problems in one round trip. Message texts are part of the
//! page contract and covered by tests.

use crate::db::models::Grade;

#[derive(Debug, Clone, Copy)]
pub struct RegistrationInput<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub grade: &'a str,
}

/// Validate raw registration input against a list of known grades.
/// Returns the parsed, verified grade id when everything is acceptable,
/// otherwise the full ordered list of human-readable messages.
pub fn validate_registration(
    input: RegistrationInput<'_>,
    grades: &[Grade],
) -> Result<i64, Vec<String>> {
    let mut errors = Vec::new();

    if input.name.trim().is_empty() {
        errors.push("Name is required.".to_string());
    }

    if input.email.is_empty() {
        errors.push("Email is required.".to_string());
    } else if !email_is_valid(input.email) {
        errors.push("Enter a valid email address.".to_string());
    }

    if input.password.is_empty() {
        errors.push("Password is required.".to_string());
    } else {
        // Length and composition are independent checks; a short
        // letters-only password reports both.
        if input.password.chars().count() < 8 {
            errors.push("Password must be at least 8 characters long.".to_string());
        }
        let has_letter = input.password.chars().any(char::is_alphabetic);
        let has_digit = input.password.chars().any(|c| c.is_ascii_digit());
        if !has_letter || !has_digit {
            errors.push("Password must contain both letters and numbers.".to_string());
        }
    }

    let grade_id = match input.grade.trim().parse::<i64>() {
        Ok(id) => {
            if grades.iter().any(|g| g.id == id) {
                Some(id)
            } else {
                errors.push("Selected grade does not exist.".to_string());
                None
            }
        }
        Err(_) => {
            errors.push("Please select a valid grade.".to_string());
            None
        }
    };

    match grade_id {
        Some(id) if errors.is_empty() => Ok(id),
        _ => Err(errors),
    }
}

/// Minimal syntactic email check, equivalent to the pattern
/// `^[^@\s]+@[^@\s]+\.[^@\s]+$`: no whitespace anywhere, exactly one `@`
/// with something before it, and after the `@` a dot with at least one
/// permitted character on each side. Deliberately permissive.
pub fn email_is_valid(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grades() -> Vec<Grade> {
        (1..=9)
            .map(|id| Grade {
                id,
                name: format!("Grade {id}"),
            })
            .collect()
    }

    fn input<'a>(name: &'a str, email: &'a str, password: &'a str, grade: &'a str) -> RegistrationInput<'a> {
        RegistrationInput {
            name,
            email,
            password,
            grade,
        }
    }

    #[test]
    fn clean_input_yields_grade_id() {
        let got = validate_registration(input("Ada", "ada@x.com", "abc12345", "3"), &grades());
        assert_eq!(got, Ok(3));
    }

    #[test]
    fn password_accepted_iff_long_enough_with_letter_and_digit() {
        let cases = [
            ("abc12345", true),
            ("abcd1234", true),
            ("a1b2c3d4e5", true),
            ("short1", false),     // too short
            ("abcdefgh", false),   // no digit
            ("12345678", false),   // no letter
            ("abc1234", false),    // 7 chars
            ("", false),
        ];
        for (password, ok) in cases {
            let got = validate_registration(input("Ada", "ada@x.com", password, "1"), &grades());
            assert_eq!(got.is_ok(), ok, "password case {password:?}");
        }
    }

    #[test]
    fn short_letters_only_password_reports_both_problems() {
        let err = validate_registration(input("Ada", "ada@x.com", "abcde", "1"), &grades())
            .expect_err("must fail");
        assert_eq!(
            err,
            vec![
                "Password must be at least 8 characters long.".to_string(),
                "Password must contain both letters and numbers.".to_string(),
            ]
        );
    }

    #[test]
    fn empty_password_reports_only_required() {
        let err = validate_registration(input("Ada", "ada@x.com", "", "1"), &grades())
            .expect_err("must fail");
        assert_eq!(err, vec!["Password is required.".to_string()]);
    }

    #[test]
    fn email_pattern_accepts_and_rejects() {
        let accepted = ["a@b.c", "ada@x.com", "first.last@sub.example.org", "a@.b.c"];
        for email in accepted {
            assert!(email_is_valid(email), "should accept {email:?}");
        }
        let rejected = [
            "",
            "plain",
            "@x.com",
            "a@b",
            "a@b.",
            "a b@x.com",
            "a@x .com",
            "a@@x.com",
            "a@b@c.d",
        ];
        for email in rejected {
            assert!(!email_is_valid(email), "should reject {email:?}");
        }
    }

    #[test]
    fn whitespace_only_name_is_rejected() {
        let err = validate_registration(input("   ", "ada@x.com", "abc12345", "1"), &grades())
            .expect_err("must fail");
        assert_eq!(err, vec!["Name is required.".to_string()]);
    }

    #[test]
    fn unknown_and_unparseable_grades_report_distinct_messages() {
        let err = validate_registration(input("Ada", "ada@x.com", "abc12345", "42"), &grades())
            .expect_err("must fail");
        assert_eq!(err, vec!["Selected grade does not exist.".to_string()]);

        let err = validate_registration(input("Ada", "ada@x.com", "abc12345", "maths"), &grades())
            .expect_err("must fail");
        assert_eq!(err, vec!["Please select a valid grade.".to_string()]);
    }

    #[test]
    fn all_failures_are_collected_in_field_order() {
        let err = validate_registration(input("", "nope", "short", "x"), &grades())
            .expect_err("must fail");
        assert_eq!(
            err,
            vec![
                "Name is required.".to_string(),
                "Enter a valid email address.".to_string(),
                "Password must be at least 8 characters long.".to_string(),
                "Password must contain both letters and numbers.".to_string(),
                "Please select a valid grade.".to_string(),
            ]
        );
    }
}
