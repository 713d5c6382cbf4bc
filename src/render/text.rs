//! Narrative text and number formatting shared by the renderers.

use serde::Serialize;

/// A run of text, optionally emphasised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub strong: bool,
}

/// A paragraph made of plain and emphasised runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct RichText {
    pub spans: Vec<Span>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(mut self, text: impl Into<String>) -> Self {
        self.spans.push(Span {
            text: text.into(),
            strong: false,
        });
        self
    }

    pub fn strong(mut self, text: impl Into<String>) -> Self {
        self.spans.push(Span {
            text: text.into(),
            strong: true,
        });
        self
    }

    /// The paragraph without emphasis.
    pub fn to_plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Integer with `,` thousands separators (`1234567` → `1,234,567`).
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Fixed number of decimals, rounding the exact binary value the way JS
/// `toFixed` does: `67.55` (stored just below the tie) → `67.5`, while an
/// exact half goes away from zero (`52.5` → `53`).
pub fn fixed(v: f64, decimals: usize) -> String {
    const GUARD: usize = 30;
    if !v.is_finite() {
        return format!("{v:.decimals$}");
    }
    let exact = format!("{:.*}", decimals + GUARD, v.abs());
    let (head, tail) = exact.split_at(exact.len() - GUARD);
    let tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if !tie {
        return format!("{v:.decimals$}");
    }
    let step = 10f64.powi(-(decimals as i32));
    let truncated = head.trim_end_matches('.').parse::<f64>().unwrap_or(v.abs());
    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}{:.decimals$}", truncated + step)
}

/// One decimal with an explicit `+` on positive changes (`+1.4`, `-0.3`, `0.0`).
pub fn signed_change(v: f64) -> String {
    let text = fixed(v, 1);
    match text.parse::<f64>() {
        Ok(rounded) if rounded > 0.0 => format!("+{text}"),
        _ => text,
    }
}

/// Shortest decimal form of a value as it appears in the data (`84.6`, `50`).
pub fn num(v: f64) -> String {
    format!("{v}")
}

/// `num(v)` followed by `%`.
pub fn pct(v: f64) -> String {
    format!("{}%", num(v))
}

/// Percentage for an optional rate; gaps print as `-`.
pub fn pct_or_dash(v: Option<f64>) -> String {
    v.map(pct).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn fixed_rounds_halves_up() {
        assert_eq!(fixed(52.5, 0), "53");
        assert_eq!(fixed(-52.5, 0), "-53");
        assert_eq!(fixed(0.125, 2), "0.13");
        assert_eq!(fixed(56.0, 1), "56.0");
        assert_eq!(fixed(41.98, 1), "42.0");
    }

    #[test]
    fn fixed_rounds_the_stored_value_not_the_scaled_one() {
        assert_eq!(fixed((70.0 + 65.1) / 2.0, 1), "67.5");
        assert_eq!(fixed(1.45, 1), "1.4");
        assert_eq!(fixed(2.675, 2), "2.67");
        assert_eq!(signed_change(1.45), "+1.4");
    }

    #[test]
    fn signed_change_marks_positive_only() {
        assert_eq!(signed_change(1.44), "+1.4");
        assert_eq!(signed_change(-2.9), "-2.9");
        assert_eq!(signed_change(0.01), "0.0");
    }

    #[test]
    fn num_uses_shortest_form() {
        assert_eq!(num(84.6), "84.6");
        assert_eq!(num(50.0), "50");
        assert_eq!(pct(39.85), "39.85%");
        assert_eq!(pct_or_dash(None), "-");
    }

    #[test]
    fn rich_text_flattens() {
        let t = RichText::new().plain("a").strong("b").plain("c");
        assert_eq!(t.to_plain(), "abc");
        assert!(t.spans[1].strong);
    }
}
