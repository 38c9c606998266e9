//! Parser for the reference trace tables (`*_trace_refmodel.txt`).
//!
//! The tables are plain whitespace-separated columns. The first data row holds the rotation
//! origin `(x0, y0)`, every following row one centroid sample `(x, y)`. Blank lines and
//! `#` comments are skipped.
use nom::{
    bytes::complete::take_until,
    character::complete::space1,
    combinator::{all_consuming, opt},
    multi::separated_list1,
    number::complete::double,
    IResult, Parser,
};

use crate::{reference_data::ReferenceTrace, soss_errors::SossError};

fn parse_row(input: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(separated_list1(space1, double)).parse(input)
}

fn strip_comment(line: &str) -> &str {
    let stripped: IResult<&str, Option<&str>> = opt(take_until("#")).parse(line);
    match stripped {
        Ok((_, Some(data))) => data,
        _ => line,
    }
}

/// Parse the content of a reference trace table.
///
/// Return
/// ----------
/// * The [`ReferenceTrace`] described by the table.
/// * [`SossError::NomParsingError`] if a row is not made of at least two numbers, or if the
///   table has no sample after the origin row.
pub fn parse_reference_trace(content: &str) -> Result<ReferenceTrace, SossError> {
    let rows = content
        .lines()
        .map(|line| strip_comment(line).trim())
        .filter(|line| !line.is_empty())
        .map(|line| {
            parse_row(line)
                .map_err(|_e| SossError::NomParsingError(line.to_string()))
                .and_then(|(_, row)| match row[..] {
                    [x, y, ..] => Ok((x, y)),
                    _ => Err(SossError::NomParsingError(format!(
                        "expected two columns: {line}"
                    ))),
                })
        })
        .collect::<Result<Vec<_>, SossError>>()?;

    let (origin, samples) = rows.split_first().ok_or_else(|| {
        SossError::NomParsingError("empty reference trace table".to_string())
    })?;
    if samples.is_empty() {
        return Err(SossError::NomParsingError(
            "reference trace table has an origin but no samples".to_string(),
        ));
    }

    let (x, y) = samples.iter().copied().unzip();
    ReferenceTrace::new(x, y, *origin)
}

#[cfg(test)]
mod trace_file_test {
    use super::*;

    #[test]
    fn test_parse_reference_trace() {
        let content = "# origin\n1887.0  54.0\n\n4.0\t80.25\n\
                       5.0 80.125 # trailing comment\n6.0   80.0  0.0\n";
        let trace = parse_reference_trace(content).unwrap();
        assert_eq!(trace.origin(), (1887.0, 54.0));
        assert_eq!(trace.x(), &[4.0, 5.0, 6.0]);
        assert_eq!(trace.y(), &[80.25, 80.125, 80.0]);
    }

    #[test]
    fn test_parse_scientific_notation() {
        let content = "1.677e3 2.0e2\n1.0e3 2.015e2\n";
        let trace = parse_reference_trace(content).unwrap();
        assert_eq!(trace.origin(), (1677.0, 200.0));
        assert_eq!(trace.x(), &[1000.0]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_reference_trace(""),
            Err(SossError::NomParsingError(_))
        ));
        assert!(matches!(
            parse_reference_trace("1887 54\n"),
            Err(SossError::NomParsingError(_))
        ));
        assert!(matches!(
            parse_reference_trace("1887 54\n4.0 abc\n"),
            Err(SossError::NomParsingError(_))
        ));
        assert!(matches!(
            parse_reference_trace("1887 54\n4.0\n"),
            Err(SossError::NomParsingError(_))
        ));
    }
}
