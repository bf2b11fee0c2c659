use crate::error::TimingError;

use std::sync::OnceLock;
use std::time::Duration;

use nom::bytes::complete::{take_while1, take_while_m_n};
use nom::character::complete::{char, digit0, one_of};
use nom::combinator::{all_consuming, map_res, opt};
use nom::error::VerboseError;
use nom::sequence::preceded;
use nom::IResult;

/// The marker separating start and end on a timing line.
pub const ARROW: &str = "-->";

/// Start and end as written in the file, before any retiming.
pub type TimeSpan = (Duration, Duration);

const MICROS_DIGITS: usize = 6;

fn candidates() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    // Looser than the token grammar: near misses like `0:0:01` still become
    // candidates and are rejected by `parse_timestamp`.
    RE.get_or_init(|| {
        regex::Regex::new(r"\d+:\d+:\d+(?:[,.]\d*)?").expect("static regex is valid")
    })
}

/// Pulls exactly two timestamps out of a timing line.
pub fn parse_timing_line(line: &str) -> Result<TimeSpan, TimingError> {
    let tokens: Vec<&str> = candidates().find_iter(line).map(|m| m.as_str()).collect();
    match tokens.len() {
        0 => Err(TimingError::NoTimestamps),
        1 => Err(TimingError::OneTimestamp),
        2 => Ok((parse_timestamp(tokens[0])?, parse_timestamp(tokens[1])?)),
        n => Err(TimingError::TooManyTimestamps(n)),
    }
}

/// Parses a single `H+:MM:SS[,fraction]` token.
pub fn parse_timestamp(token: &str) -> Result<Duration, TimingError> {
    let malformed = || TimingError::MalformedTimestamp(token.to_string());
    let (_, (hours, minutes, seconds, micros)) =
        all_consuming(timestamp)(token).map_err(|_| malformed())?;
    if minutes > 59 || seconds > 59 {
        return Err(malformed());
    }
    let secs = hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + seconds))
        .ok_or_else(malformed)?;
    Ok(Duration::new(secs, micros * 1000))
}

fn timestamp(input: &str) -> IResult<&str, (u64, u64, u64, u32), VerboseError<&str>> {
    let take_two = || {
        map_res(
            take_while_m_n(2, 2, |c: char| c.is_ascii_digit()),
            |s: &str| s.parse::<u64>(),
        )
    };

    let (input, hours) = map_res(take_while1(|c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<u64>()
    })(input)?;
    let (input, _) = char(':')(input)?;
    let (input, minutes) = take_two()(input)?;
    let (input, _) = char(':')(input)?;
    let (input, seconds) = take_two()(input)?;
    let (input, fraction) = opt(preceded(one_of(",."), digit0))(input)?;

    Ok((input, (hours, minutes, seconds, fraction.map_or(0, fraction_micros))))
}

/// Reads the digits after the separator as a decimal fraction of a second.
/// `,2` is 200ms; anything past microseconds is dropped.
fn fraction_micros(digits: &str) -> u32 {
    let kept = &digits[..digits.len().min(MICROS_DIGITS)];
    let padded = format!("{:0<width$}", kept, width = MICROS_DIGITS);
    padded.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_parse_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                let duration = parse_timestamp(input).unwrap();

                assert_eq!(duration.as_micros(), expected);
            }
        )*
        }
    }

    test_parse_ts! {
        test_parse_ts_0: ("00:00:01,200", 1_200_000),
        test_parse_ts_1: ("00:00:01,2", 1_200_000),
        test_parse_ts_2: ("00:00:01,002", 1_002_000),
        test_parse_ts_3: ("00:00:01,02", 1_020_000),
        test_parse_ts_4: ("00:00:01,", 1_000_000),
        test_parse_ts_5: ("00:00:01", 1_000_000),
        test_parse_ts_6: ("01:01:01,200", 3_661_200_000),
        test_parse_ts_7: ("1:01:01,200", 3_661_200_000),
        test_parse_ts_8: ("00:00:01.500", 1_500_000),
        test_parse_ts_9: ("00:00:01,2345678", 1_234_567),
        test_parse_ts_10: ("100:00:00,001", 360_000_001_000),
    }

    macro_rules! test_malformed_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let input = $value;

                assert_eq!(
                    parse_timestamp(input),
                    Err(TimingError::MalformedTimestamp(input.to_string()))
                );
            }
        )*
        }
    }

    test_malformed_ts! {
        test_malformed_ts_0: "0:0:01,000",
        test_malformed_ts_1: "00:00:1,000",
        test_malformed_ts_2: "00:60:00,000",
        test_malformed_ts_3: "00:00:75,000",
        test_malformed_ts_4: "00:01",
        test_malformed_ts_5: "00:00:01500",
    }

    #[test]
    fn short_fraction_is_decimal_not_millisecond_count() {
        assert_eq!(parse_timestamp("00:00:01,5"), parse_timestamp("00:00:01,500"));
        assert_eq!(
            parse_timestamp("00:00:01,5").unwrap(),
            Duration::from_millis(1500)
        );
        assert_eq!(
            parse_timestamp("00:00:01,05").unwrap(),
            Duration::from_millis(1050)
        );
    }

    #[test]
    fn timing_line_with_spaces() {
        let (start, end) = parse_timing_line("00:00:01,000 --> 00:00:02,500").unwrap();
        assert_eq!(start, Duration::from_millis(1000));
        assert_eq!(end, Duration::from_millis(2500));
    }

    #[test]
    fn timing_line_without_spaces() {
        let (start, end) = parse_timing_line("00:00:01,000-->00:00:02,500").unwrap();
        assert_eq!(start, Duration::from_millis(1000));
        assert_eq!(end, Duration::from_millis(2500));
    }

    #[test]
    fn timing_line_keeps_token_order() {
        let (start, end) = parse_timing_line("00:00:05,000 --> 00:00:02,000").unwrap();
        assert_eq!(start, Duration::from_secs(5));
        assert_eq!(end, Duration::from_secs(2));
    }

    #[test]
    fn timing_line_with_position_suffix() {
        let (start, end) =
            parse_timing_line("00:00:01,000 --> 00:00:02,000 X1:40 X2:600 Y1:20 Y2:50").unwrap();
        assert_eq!(start, Duration::from_secs(1));
        assert_eq!(end, Duration::from_secs(2));
    }

    #[test]
    fn timing_line_with_three_timestamps() {
        assert_eq!(
            parse_timing_line("00:00:01,000 --> 00:00:02,000 --> 00:00:03,000"),
            Err(TimingError::TooManyTimestamps(3))
        );
    }

    #[test]
    fn timing_line_without_timestamps() {
        assert_eq!(parse_timing_line("-->"), Err(TimingError::NoTimestamps));
    }

    #[test]
    fn timing_line_with_one_timestamp() {
        assert_eq!(
            parse_timing_line("00:00:01,000 -->"),
            Err(TimingError::OneTimestamp)
        );
    }

    #[test]
    fn timing_line_with_bad_token() {
        assert_eq!(
            parse_timing_line("00:00:01,000 --> 00:61:02,000"),
            Err(TimingError::MalformedTimestamp("00:61:02,000".to_string()))
        );
    }
}
