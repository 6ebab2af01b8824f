//! CNPJ (Brazilian company registry number) checksum validation.
//!
//! Only the format and the two mod-11 check digits are verified; the number is
//! never looked up in the registry.

/// Number of digits in a CNPJ.
pub const CNPJ_LEN: usize = 14;

/// Strip every non-digit character.
///
/// # Examples
/// ```
/// use onboarding::domain::sanitize_cnpj;
///
/// assert_eq!(sanitize_cnpj("11.444.777/0001-61"), "11444777000161");
/// ```
#[must_use]
pub fn sanitize_cnpj(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Return `true` when `cnpj` is 14 digits, not a repeated digit, and both
/// check digits match.
///
/// Input must already be sanitised with [`sanitize_cnpj`].
///
/// # Examples
/// ```
/// use onboarding::domain::is_valid_cnpj;
///
/// assert!(is_valid_cnpj("11444777000161"));
/// assert!(!is_valid_cnpj("11111111111111"));
/// ```
#[must_use]
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    let digits: Vec<u32> = cnpj.chars().filter_map(|ch| ch.to_digit(10)).collect();
    if digits.len() != CNPJ_LEN || cnpj.len() != CNPJ_LEN {
        return false;
    }
    if digits.iter().all(|digit| *digit == digits[0]) {
        return false;
    }
    check_digit(&digits[..12]) == digits[12] && check_digit(&digits[..13]) == digits[13]
}

/// Weighted mod-11 check digit; weights descend from `len - 7` and wrap from
/// 2 back to 9.
fn check_digit(base: &[u32]) -> u32 {
    let mut weight = base.len() as u32 - 7;
    let mut sum = 0;
    for digit in base {
        sum += digit * weight;
        weight = if weight <= 2 { 9 } else { weight - 1 };
    }
    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("11444777000161")]
    #[case("11222333000181")]
    #[case("45723174000110")]
    fn accepts_valid_numbers(#[case] cnpj: &str) {
        assert!(is_valid_cnpj(cnpj));
    }

    #[rstest]
    #[case::first_digit("11444777000171")]
    #[case::second_digit("11444777000162")]
    #[case::short("1144477700016")]
    #[case::long("114447770001610")]
    #[case::unsanitised("11.444.777/0001-61")]
    #[case::empty("")]
    fn rejects_invalid_numbers(#[case] cnpj: &str) {
        assert!(!is_valid_cnpj(cnpj));
    }

    #[rstest]
    fn rejects_every_repeated_digit_sequence(
        #[values('0', '1', '2', '3', '4', '5', '6', '7', '8', '9')] digit: char,
    ) {
        let repeated: String = std::iter::repeat_n(digit, 14).collect();
        assert!(!is_valid_cnpj(&repeated));
        let formatted = format!("{0}{0}.{0}{0}{0}.{0}{0}{0}/{0}{0}{0}{0}-{0}{0}", digit);
        assert!(!is_valid_cnpj(&sanitize_cnpj(&formatted)));
    }

    #[rstest]
    fn sanitising_keeps_only_digits() {
        assert_eq!(sanitize_cnpj(" 11.444.777/0001-61 "), "11444777000161");
        assert_eq!(sanitize_cnpj("abc"), "");
    }

    #[rstest]
    fn check_digits_match_reference_number() {
        let digits: Vec<u32> = "11444777000161"
            .chars()
            .filter_map(|ch| ch.to_digit(10))
            .collect();
        assert_eq!(check_digit(&digits[..12]), 6);
        assert_eq!(check_digit(&digits[..13]), 1);
    }
}
