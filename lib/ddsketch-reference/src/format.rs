/// Formats a floating-point number with the given number of significant digits.
///
/// This follows the `%#.<digits>g` conversion from C's `printf`: fixed-point notation is used when the decimal exponent
/// of the rounded value is at least -4 and less than `digits`, and scientific notation (`d.ddde+XX`) is used otherwise.
/// Trailing zeros are kept, so the output always carries exactly `digits` significant digits, but a bare trailing decimal
/// point is not emitted. For example, `0.0` and `1.0` at three significant digits are written as `0.00` and `1.00`.
///
/// Non-finite values are written as `nan`, `inf`, and `-inf`.
///
/// A `digits` value of zero is treated as one.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() { "inf" } else { "-inf" }.to_string();
    }

    let digits = digits.max(1);

    // Let the standard library do the rounding, and then pull the exponent of the rounded value back out so that we
    // pick the notation based on what will actually be printed, such as 9.9951 rounding up to 10.0 at three digits.
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = split_exponent(&scientific);

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent) as usize;
        format!("{:.*}", decimals, value)
    }
}

/// Splits `LowerExp` output into its mantissa and decimal exponent.
///
/// Finite values always format as `<mantissa>e<exponent>`, where the exponent is a plain signed integer.
fn split_exponent(scientific: &str) -> (&str, i32) {
    let mut parts = scientific.splitn(2, 'e');
    let mantissa = parts.next().unwrap_or(scientific);
    let exponent = parts.next().map_or(0, |exponent| {
        exponent
            .parse::<i32>()
            .unwrap_or_else(|_| unreachable!("`LowerExp` produced an invalid exponent: {}", scientific))
    });

    (mantissa, exponent)
}
