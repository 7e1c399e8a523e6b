//! Message codec
//!
//! Wire format: `<theta:int>,<phi:int>,<raw_reading:int>`, one reading per line.

use contracts::{ContractError, RawSample};

/// Field delimiter
pub const DELIMITER: char = ',';

/// Number of fields in a data message
pub const FIELD_COUNT: usize = 3;

/// Parse one data line into a `RawSample`.
///
/// Each field must be a complete integer literal: whitespace, empty fields,
/// fractions and a field count other than three are rejected rather than
/// guessed at.
///
/// # Errors
/// `MalformedMessage` describing the first offending field.
pub fn parse(line: &str) -> Result<RawSample, ContractError> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return Err(ContractError::malformed(
            line,
            format!("expected {FIELD_COUNT} fields, got {}", fields.len()),
        ));
    }

    let mut values = [0i32; FIELD_COUNT];
    for (idx, (slot, field)) in values.iter_mut().zip(&fields).enumerate() {
        *slot = field.parse().map_err(|e| {
            ContractError::malformed(line, format!("field {idx} ({field:?}): {e}"))
        })?;
    }

    let [theta, phi, raw_reading] = values;
    Ok(RawSample::new(theta, phi, raw_reading))
}

/// Render a sample in wire format.
pub fn format(sample: &RawSample) -> String {
    format!(
        "{}{DELIMITER}{}{DELIMITER}{}",
        sample.theta, sample.phi, sample.raw_reading
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_parse_valid() {
        assert_eq!(parse("10,20,512").unwrap(), RawSample::new(10, 20, 512));
        assert_eq!(parse("-5,0,-1").unwrap(), RawSample::new(-5, 0, -1));
    }

    #[test]
    fn test_parse_wrong_field_count() {
        for line in ["", "10,20", "10,20,30,40", "garbage"] {
            let err = parse(line).unwrap_err();
            assert!(
                matches!(err, ContractError::MalformedMessage { .. }),
                "{line:?} -> {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_empty_and_non_numeric_fields() {
        for line in ["10,,512", "10,abc,512", "1.5,20,512", "10,20,5e2", ",,"] {
            assert!(parse(line).is_err(), "{line:?} accepted");
        }
    }

    #[test]
    fn test_parse_rejects_padding() {
        assert!(parse("10, 20,512").is_err());
        assert!(parse("10,20,512\r").is_err());
    }

    #[test]
    fn test_error_names_line() {
        let err = parse("10,x,3").unwrap_err().to_string();
        assert!(err.contains("10,x,3"), "got: {err}");
        assert!(err.contains("field 1"), "got: {err}");
    }

    #[test]
    fn test_format_then_parse_random_samples() {
        let mut rng = rand::rng();
        for _ in 0..500 {
            let sample = RawSample::new(rng.random(), rng.random(), rng.random());
            assert_eq!(parse(&format(&sample)).unwrap(), sample);
        }
    }
}
