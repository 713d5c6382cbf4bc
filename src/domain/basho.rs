//! Tournament period codes.
//!
//! A basho code is a 4-digit year followed by the month of the tournament,
//! e.g. `"202311"`. Upstream zero-pads the month (`"202301"`), which keeps
//! lexicographic order equal to chronological order.

/// Width of the year prefix in a basho code.
const YEAR_WIDTH: usize = 4;

/// Format a basho code as `YYYY/M`, dropping any zero padding of the month.
///
/// The split is always at the fourth character, whatever the suffix length.
/// Codes whose suffix is not a number are returned unchanged.
pub fn format_basho(code: &str) -> String {
    let Some((year, month)) = split_basho(code) else {
        return code.to_string();
    };
    format!("{year}/{month}")
}

/// Split a basho code into its year text and numeric month.
pub fn split_basho(code: &str) -> Option<(&str, u32)> {
    if !code.is_char_boundary(YEAR_WIDTH.min(code.len())) || code.len() <= YEAR_WIDTH {
        return None;
    }
    let (year, month) = code.split_at(YEAR_WIDTH);
    let month = month.parse::<u32>().ok()?;
    Some((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_month_padding() {
        assert_eq!(format_basho("202301"), "2023/1");
        assert_eq!(format_basho("202303"), "2023/3");
        assert_eq!(format_basho("202311"), "2023/11");
    }

    #[test]
    fn splits_at_fixed_width_regardless_of_suffix_length() {
        assert_eq!(format_basho("20235"), "2023/5");
        assert_eq!(split_basho("199909"), Some(("1999", 9)));
    }

    #[test]
    fn malformed_codes_pass_through() {
        assert_eq!(format_basho(""), "");
        assert_eq!(format_basho("2023"), "2023");
        assert_eq!(format_basho("2023ab"), "2023ab");
    }

    #[test]
    fn lexicographic_order_is_chronological() {
        let mut codes = vec!["202311", "202101", "202303", "202109"];
        codes.sort();
        assert_eq!(codes, ["202101", "202109", "202303", "202311"]);
    }
}
