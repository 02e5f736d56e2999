//! Decimal formatting patterns for `@decfmt`
//!
//! Supports the common subset of decimal patterns:
//!
//!     0     a digit that is always shown
//!     #     a digit that is shown only when significant
//!     .     the decimal separator
//!     ,     grouping separator in the integer part; the group size is the number of digit
//!           characters after the last comma
//!
//! Rounding follows the shortest correctly rounded decimal of the binary value.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalPattern {
    min_integer_digits: usize,
    grouping: Option<usize>,
    min_fraction_digits: usize,
    max_fraction_digits: usize,
}

impl DecimalPattern {
    /// Parse a pattern; `None` when it uses characters outside the supported subset
    pub fn parse(pattern: &str) -> Option<Self> {
        let (integer, fraction) = match pattern.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (pattern, ""),
        };
        if integer.is_empty() && fraction.is_empty() {
            return None;
        }

        if !integer.chars().all(|c| matches!(c, '#' | '0' | ',')) {
            return None;
        }
        let min_integer_digits = integer.chars().filter(|&c| c == '0').count();
        let grouping = match integer.rfind(',') {
            Some(pos) => {
                let size = integer.len() - pos - 1;
                if size == 0 {
                    return None;
                }
                Some(size)
            }
            None => None,
        };

        // Fraction: mandatory zeros first, then optional hashes
        let min_fraction_digits = fraction.chars().take_while(|&c| c == '0').count();
        let optional = &fraction[min_fraction_digits..];
        if !optional.chars().all(|c| c == '#') {
            return None;
        }

        Some(Self {
            min_integer_digits,
            grouping,
            min_fraction_digits,
            max_fraction_digits: fraction.len(),
        })
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value < 0.0 { "-∞" } else { "∞" }.to_string();
        }

        let rounded = format!("{:.*}", self.max_fraction_digits, value.abs());
        let (integer, fraction) = match rounded.split_once('.') {
            Some((i, f)) => (i.to_string(), f.to_string()),
            None => (rounded.clone(), String::new()),
        };

        let mut fraction = fraction;
        while fraction.len() > self.min_fraction_digits && fraction.ends_with('0') {
            fraction.pop();
        }

        let mut integer = integer.trim_start_matches('0').to_string();
        while integer.len() < self.min_integer_digits {
            integer.insert(0, '0');
        }
        if integer.is_empty() && fraction.is_empty() {
            integer.push('0');
        }
        if let Some(size) = self.grouping {
            integer = group_digits(&integer, size);
        }

        let negative =
            value < 0.0 && integer.chars().chain(fraction.chars()).any(|c| matches!(c, '1'..='9'));

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&integer);
        if !fraction.is_empty() {
            out.push('.');
            out.push_str(&fraction);
        }
        out
    }
}

fn group_digits(digits: &str, size: usize) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / size);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % size == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out
}

/// Format `value` with `pattern`; `None` for unsupported patterns
pub fn format_decimal(value: f64, pattern: &str) -> Option<String> {
    DecimalPattern::parse(pattern).map(|p| p.format(value))
}
