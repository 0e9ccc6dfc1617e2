//! Payment card numbers with a valid Luhn check digit

use seedling::{Context, DiagnosticKind, Schema};

/// Options for [`card_number`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardOptions {
    /// Total number of digits, check digit included
    pub length: usize,
    /// Leading digits (issuer identification)
    pub prefix: String,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            length: 16,
            prefix: "4".to_string(),
        }
    }
}

/// 16-digit card numbers starting with `4` by default
pub fn card_number() -> Schema<String, CardOptions> {
    Schema::with_options(CardOptions::default(), generate_card)
}

fn generate_card(ctx: &mut Context<'_>, options: &CardOptions) -> String {
    let mut digits: String = options.prefix.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != options.prefix.len() {
        ctx.report(
            DiagnosticKind::InvalidParameter,
            format!("card prefix '{}' contains non-digits, ignoring them", options.prefix),
        );
    }

    let length = if options.length <= digits.len() {
        let length = digits.len() + 1;
        ctx.report(
            DiagnosticKind::InvalidParameter,
            format!(
                "card length {} leaves no room after the prefix, using {length}",
                options.length
            ),
        );
        length
    } else {
        options.length
    };

    while digits.len() < length - 1 {
        let d = ctx.next_int(0, 9) as u8;
        digits.push(char::from(b'0' + d));
    }
    digits.push(char::from(b'0' + luhn_check_digit(&digits)));
    digits
}

/// Luhn check digit for a payload of ASCII digits; non-digits are skipped
pub fn luhn_check_digit(payload: &str) -> u8 {
    let sum: u32 = payload
        .bytes()
        .rev()
        .filter(u8::is_ascii_digit)
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            // The rightmost payload digit sits next to the check digit and is doubled.
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// Whether `number` (check digit last) passes the Luhn check
pub fn luhn_valid(number: &str) -> bool {
    if number.len() < 2 || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let (payload, check) = number.split_at(number.len() - 1);
    check.as_bytes()[0] - b'0' == luhn_check_digit(payload)
}

/// Typed setters for card number schemas
pub trait CardSchemaExt: Sized {
    /// Total digits including the check digit
    fn length(&self, length: usize) -> Self;
    fn prefix(&self, prefix: impl Into<String>) -> Self;
}

impl CardSchemaExt for Schema<String, CardOptions> {
    fn length(&self, length: usize) -> Self {
        self.map_options(|o| o.length = length)
    }

    fn prefix(&self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.map_options(|o| o.prefix = prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use seedling::GenerateOptions;

    #[test]
    fn test_known_check_digits() {
        assert_eq!(luhn_check_digit("7992739871"), 3);
        assert!(luhn_valid("79927398713"));
        assert!(luhn_valid("4111111111111111"));
        assert!(!luhn_valid("4111111111111112"));
        assert!(!luhn_valid("4"));
        assert!(!luhn_valid("41x1"));
    }

    #[test]
    fn test_default_card_passes_luhn() {
        for number in card_number().generate_many(100, Some(6)) {
            assert_eq!(number.len(), 16);
            assert!(number.starts_with('4'));
            assert!(luhn_valid(&number), "{number} failed the Luhn check");
        }
    }

    #[test]
    fn test_custom_prefix_and_length() {
        let number = card_number()
            .prefix("3782")
            .length(15)
            .generate(GenerateOptions::seeded(2));
        assert_eq!(number.len(), 15);
        assert!(number.starts_with("3782"));
        assert!(luhn_valid(&number));
    }

    #[test]
    fn test_length_too_short_for_prefix() {
        let generated = card_number()
            .prefix("123456")
            .length(4)
            .run(GenerateOptions::seeded(2));
        assert_eq!(generated.value.len(), 7);
        assert!(luhn_valid(&generated.value));
        assert!(generated.has(DiagnosticKind::InvalidParameter));
    }

    proptest! {
        #[test]
        fn generated_cards_pass_luhn(seed: u64, length in 2usize..20) {
            let number = card_number().prefix("").length(length).generate(GenerateOptions::seeded(seed));
            prop_assert_eq!(number.len(), length);
            prop_assert!(luhn_valid(&number));
        }
    }
}
