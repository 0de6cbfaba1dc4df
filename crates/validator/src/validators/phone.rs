//! Phone number validator for E.164 and common formats.
//!
//! A valid phone number unpacks to its digits only, so
//! `"8 (999) 123-33-12"` becomes `"89991233312"`. The normalized number is
//! also recorded under `phone` in the context.

use crate::foundation::{BoxError, Context, ValidationError};
use crate::validators::leaf::{Leaf, Refinement, Verdict, text};
use serde_json::Value;

// ============================================================================
// PHONE NUMBER VALIDATOR
// ============================================================================

/// Validates phone numbers in various formats.
///
/// Supports multiple format modes:
/// - **E.164**: International standard format `+[country][number]` (e.g., `+14155551234`)
/// - **Lenient**: Allows common separators like spaces, dashes, parentheses
/// - **Digits only**: Just validates the digit count after stripping formatting
///
/// # Examples
///
/// ```
/// use refined::foundation::Validator;
/// use refined::validators::{Leaf, Phone};
/// use serde_json::json;
///
/// // E.164 format (strict)
/// let e164 = Leaf::new(Phone::e164());
/// assert!(e164.call(&json!("+14155551234")).unwrap().is_valid());
/// assert!(e164.call(&json!("14155551234")).unwrap().is_invalid()); // missing +
///
/// // Lenient format (allows common formatting)
/// let lenient = Leaf::new(Phone::lenient());
/// let outcome = lenient.call(&json!("+1 (415) 555-1234")).unwrap();
/// assert_eq!(outcome.unpack().unwrap(), &json!("14155551234"));
///
/// // Digits only (just checks count)
/// let digits = Leaf::new(Phone::digits_only().min_digits(7).max_digits(15));
/// assert!(digits.call(&json!("4155551234")).unwrap().is_valid());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Phone {
    mode: PhoneMode,
    min_digits: u8,
    max_digits: u8,
    require_country_code: bool,
}

/// Phone validation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneMode {
    /// E.164 international format: `+[country][number]`
    E164,
    /// Lenient: allows spaces, dashes, parentheses
    Lenient,
    /// Digits only: strips all formatting, validates digit count
    DigitsOnly,
}

impl Phone {
    /// Creates a new phone validator with E.164 format.
    ///
    /// E.164 format requires:
    /// - Leading `+` sign
    /// - Only digits after the `+`
    /// - Between 7 and 15 digits (configurable)
    #[must_use]
    pub fn e164() -> Self {
        Self {
            mode: PhoneMode::E164,
            min_digits: 7,
            max_digits: 15,
            require_country_code: true,
        }
    }

    /// Creates a lenient phone validator.
    ///
    /// Allows common formatting characters:
    /// - Spaces, dashes, parentheses, dots
    /// - Optional leading `+` for country code
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            mode: PhoneMode::Lenient,
            min_digits: 7,
            max_digits: 15,
            require_country_code: false,
        }
    }

    /// Creates a digits-only phone validator.
    ///
    /// Strips all non-digit characters and validates the count.
    #[must_use]
    pub fn digits_only() -> Self {
        Self {
            mode: PhoneMode::DigitsOnly,
            min_digits: 7,
            max_digits: 15,
            require_country_code: false,
        }
    }

    /// Sets the minimum number of digits required.
    #[must_use = "builder methods must be chained or built"]
    pub fn min_digits(mut self, min: u8) -> Self {
        self.min_digits = min;
        self
    }

    /// Sets the maximum number of digits allowed.
    #[must_use = "builder methods must be chained or built"]
    pub fn max_digits(mut self, max: u8) -> Self {
        self.max_digits = max;
        self
    }

    /// Requires a country code (leading `+`).
    #[must_use = "builder methods must be chained or built"]
    pub fn require_country_code(mut self) -> Self {
        self.require_country_code = true;
        self
    }

    /// The configured mode.
    #[must_use]
    pub fn mode(&self) -> PhoneMode {
        self.mode
    }

    fn extract_digits(input: &str) -> String {
        input.chars().filter(char::is_ascii_digit).collect()
    }

    fn check(&self, input: &str) -> Result<(), ValidationError> {
        if input.is_empty() {
            return Err(ValidationError::new(
                "empty_phone",
                "Phone number cannot be empty",
            ));
        }

        match self.mode {
            PhoneMode::E164 => self.check_e164(input),
            PhoneMode::Lenient => self.check_lenient(input),
            PhoneMode::DigitsOnly => self.check_digits_only(input),
        }
    }

    fn check_e164(&self, input: &str) -> Result<(), ValidationError> {
        let Some(number_part) = input.strip_prefix('+') else {
            return Err(ValidationError::new(
                "e164_missing_plus",
                "E.164 phone number must start with '+'",
            ));
        };

        if !number_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::new(
                "e164_invalid_chars",
                "E.164 phone number must contain only digits after '+'",
            ));
        }

        self.check_digit_count(number_part.len())
    }

    fn check_lenient(&self, input: &str) -> Result<(), ValidationError> {
        let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')' | '.');

        if !input.chars().all(allowed) {
            return Err(ValidationError::new(
                "phone_invalid_chars",
                "Phone number contains invalid characters",
            ));
        }

        match input.find('+') {
            Some(0) => {}
            Some(_) => {
                return Err(ValidationError::new(
                    "phone_plus_position",
                    "'+' can only appear at the start of the phone number",
                ));
            }
            None if self.require_country_code => {
                return Err(ValidationError::new(
                    "phone_missing_country_code",
                    "Phone number must include country code (start with '+')",
                ));
            }
            None => {}
        }

        let open_parens = input.chars().filter(|&c| c == '(').count();
        let close_parens = input.chars().filter(|&c| c == ')').count();
        if open_parens != close_parens {
            return Err(ValidationError::new(
                "phone_unbalanced_parens",
                "Phone number has unbalanced parentheses",
            ));
        }

        self.check_digit_count(Self::extract_digits(input).len())
    }

    fn check_digits_only(&self, input: &str) -> Result<(), ValidationError> {
        if self.require_country_code && !input.starts_with('+') {
            return Err(ValidationError::new(
                "phone_missing_country_code",
                "Phone number must include country code (start with '+')",
            ));
        }

        self.check_digit_count(Self::extract_digits(input).len())
    }

    fn check_digit_count(&self, count: usize) -> Result<(), ValidationError> {
        if count < usize::from(self.min_digits) {
            return Err(ValidationError::new(
                "phone_too_few_digits",
                format!(
                    "Phone number must have at least {} digits (found {count})",
                    self.min_digits
                ),
            )
            .with_param("min", self.min_digits.to_string()));
        }

        if count > usize::from(self.max_digits) {
            return Err(ValidationError::new(
                "phone_too_many_digits",
                format!(
                    "Phone number must have at most {} digits (found {count})",
                    self.max_digits
                ),
            )
            .with_param("max", self.max_digits.to_string()));
        }

        Ok(())
    }
}

impl Default for Phone {
    fn default() -> Self {
        Self::lenient()
    }
}

impl Refinement for Phone {
    fn refine(&self, value: &Value, ctx: &mut Context) -> Result<Verdict, BoxError> {
        let input = text(value);
        if let Err(reason) = self.check(input.trim()) {
            return Ok(Verdict::Reject(reason));
        }

        let digits = Self::extract_digits(&input);
        ctx.insert("phone", digits.clone());
        Ok(Verdict::AcceptAs(Value::String(digits)))
    }
}

/// Lenient phone validator.
#[must_use]
pub fn phone() -> Leaf<Phone> {
    Leaf::new(Phone::lenient())
}

// ============================================================================
// TESTS
// ============================================================================
