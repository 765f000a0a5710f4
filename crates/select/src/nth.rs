//! `an+b` expressions for the nth-positional pseudo-classes

use std::fmt;

/// A linear position formula `an+b`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthExpr {
    pub a: i32,
    pub b: i32,
}

impl NthExpr {
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse `odd`, `even`, `b`, or `an+b` in any of its spellings
    /// (`2n+1`, `-n+3`, `n`, `+3n - 2`, `4`).
    ///
    /// Returns `None` when the argument is not an nth-expression.
    pub fn parse(args: &str) -> Option<Self> {
        let args = args.trim().to_ascii_lowercase();

        match args.as_str() {
            "odd" => return Some(Self::new(2, 1)),
            "even" => return Some(Self::new(2, 0)),
            _ => {}
        }

        let Some(n_pos) = args.find('n') else {
            return parse_signed(&args, false).map(|b| Self::new(0, b));
        };

        let a = match args[..n_pos].trim() {
            "" | "+" => 1,
            "-" => -1,
            a_part => parse_signed(a_part, false)?,
        };

        let b_part = args[n_pos + 1..].trim();
        let b = if b_part.is_empty() {
            0
        } else {
            // b must carry an explicit sign here: "2n 1" is not an expression
            parse_signed(b_part, true)?
        };

        Some(Self::new(a, b))
    }

    /// Whether the 1-based `position` is `a*k + b` for some `k >= 0`
    pub fn matches(&self, position: i32) -> bool {
        // i64 holds any i32 difference and product without overflow
        let (a, b, position) = (i64::from(self.a), i64::from(self.b), i64::from(position));
        if a == 0 {
            return position == b;
        }
        let diff = position - b;
        diff * a >= 0 && diff % a == 0
    }
}

/// Parse an integer with an optional sign; whitespace may separate the
/// sign from the digits. With `require_sign` a bare number is rejected.
fn parse_signed(text: &str, require_sign: bool) -> Option<i32> {
    let text = text.trim();
    let (negative, digits) = match text.chars().next()? {
        '+' => (false, text[1..].trim_start()),
        '-' => (true, text[1..].trim_start()),
        _ if require_sign => return None,
        _ => (false, text),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value: i32 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

impl fmt::Display for NthExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.a, self.b) {
            (0, b) => write!(f, "{}", b),
            (a, 0) => write!(f, "{}n", a),
            (a, b) if b < 0 => write!(f, "{}n{}", a, b),
            (a, b) => write!(f, "{}n+{}", a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nth(args: &str) -> (i32, i32) {
        let expr = NthExpr::parse(args).unwrap();
        (expr.a, expr.b)
    }

    #[test]
    fn test_keywords() {
        assert_eq!(nth("odd"), (2, 1));
        assert_eq!(nth(" EVEN "), (2, 0));
    }

    #[test]
    fn test_forms() {
        assert_eq!(nth("3"), (0, 3));
        assert_eq!(nth("+3"), (0, 3));
        assert_eq!(nth("2n+1"), (2, 1));
        assert_eq!(nth("2n - 1"), (2, -1));
        assert_eq!(nth("n"), (1, 0));
        assert_eq!(nth("+n+2"), (1, 2));
        assert_eq!(nth("-n+3"), (-1, 3));
        assert_eq!(nth("-2n+ 4"), (-2, 4));
        assert_eq!(nth("10N"), (10, 0));
    }

    #[test]
    fn test_malformed() {
        assert!(NthExpr::parse("").is_none());
        assert!(NthExpr::parse("first").is_none());
        assert!(NthExpr::parse("2n1").is_none());
        assert!(NthExpr::parse("xn+1").is_none());
        assert!(NthExpr::parse("2n+").is_none());
        assert!(NthExpr::parse("1.5").is_none());
    }

    #[test]
    fn test_matches_positive_step() {
        let odd = NthExpr::new(2, 1);
        assert!(odd.matches(1));
        assert!(!odd.matches(2));
        assert!(odd.matches(3));

        let from_three = NthExpr::new(1, 3);
        assert!(!from_three.matches(2));
        assert!(from_three.matches(3));
        assert!(from_three.matches(7));
    }

    #[test]
    fn test_matches_negative_step() {
        // -n+3 selects the first three
        let first_three = NthExpr::new(-1, 3);
        assert!(first_three.matches(1));
        assert!(first_three.matches(3));
        assert!(!first_three.matches(4));

        let every_other = NthExpr::new(-2, 5);
        assert!(every_other.matches(5));
        assert!(every_other.matches(3));
        assert!(every_other.matches(1));
        assert!(!every_other.matches(4));
        assert!(!every_other.matches(7));
    }

    #[test]
    fn test_matches_constant() {
        let second = NthExpr::new(0, 2);
        assert!(second.matches(2));
        assert!(!second.matches(4));
    }

    #[test]
    fn test_matches_extreme_coefficients() {
        let far_offset = NthExpr::parse("n-2147483647").unwrap();
        assert!(far_offset.matches(1));
        assert!(far_offset.matches(i32::MAX));

        let huge_step = NthExpr::parse("2000000000n+1").unwrap();
        assert!(huge_step.matches(1));
        assert!(!huge_step.matches(2));
        assert!(!huge_step.matches(-2_000_000_000));

        let negative = NthExpr::new(i32::MIN, i32::MAX);
        assert!(negative.matches(i32::MAX));
        assert!(!negative.matches(i32::MIN));
    }

    #[test]
    fn test_display() {
        assert_eq!(NthExpr::new(2, 1).to_string(), "2n+1");
        assert_eq!(NthExpr::new(-1, 3).to_string(), "-1n+3");
        assert_eq!(NthExpr::new(2, -1).to_string(), "2n-1");
        assert_eq!(NthExpr::new(0, 4).to_string(), "4");
        assert_eq!(NthExpr::new(3, 0).to_string(), "3n");
    }
}
