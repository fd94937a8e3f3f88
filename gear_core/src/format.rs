//! Fixed-width number formatting for the character display and the
//! diagnostic dump.

/// Left-pad `number` with zeros to at least `width` digits.
pub fn pad_left(number: u32, width: usize) -> String {
    format!("{number:0width$}")
}

/// Three-character rendering of a raw count.
///
/// Values below 1000 are zero-padded to three digits. Values of 1000 and
/// above (at most 1023) are shown as `+` and the last two digits, so the
/// field never grows past three cells.
pub fn format_value(value: u16) -> String {
    if value < 1000 {
        pad_left(u32::from(value), 3)
    } else {
        format!("+{}", pad_left(u32::from(value % 1000), 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 3, "000")]
    #[case(7, 3, "007")]
    #[case(42, 3, "042")]
    #[case(200, 3, "200")]
    #[case(1234, 3, "1234")]
    #[case(5, 2, "05")]
    #[case(5, 1, "5")]
    fn pads(#[case] n: u32, #[case] w: usize, #[case] expected: &str) {
        assert_eq!(pad_left(n, w), expected);
    }

    #[rstest]
    #[case(0, "000")]
    #[case(511, "511")]
    #[case(999, "999")]
    #[case(1000, "+00")]
    #[case(1009, "+09")]
    #[case(1023, "+23")]
    fn formats_values_in_three_cells(#[case] v: u16, #[case] expected: &str) {
        assert_eq!(format_value(v), expected);
        assert_eq!(format_value(v).chars().count(), 3);
    }
}
