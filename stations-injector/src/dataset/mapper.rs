//! Dataset line → cache entry mapping.
//!
//! Each line of the dataset is one departure record:
//!
//! ```json
//! {"name":"IC1","to":"Zurich","category":"IC","operator":"SBB",
//!  "stop":{"station":{"id":"100","name":"Bern"},
//!          "departureTimestamp":1456700000,"departure":"14:00","delay":2}}
//! ```

use chrono::DateTime;
use serde::Deserialize;

use crate::domain::{Station, Stop, Train};

use super::error::ParseError;

/// Raw record as it appears on one dataset line.
#[derive(Debug, Deserialize)]
struct RecordDto {
    name: String,
    to: String,
    category: String,
    operator: String,
    stop: StopDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StopDto {
    station: StationDto,
    /// Epoch seconds, UTC.
    departure_timestamp: i64,
    /// Departure as printed on the board; only used for the entry key.
    departure: String,
    #[serde(default)]
    delay: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct StationDto {
    id: StationIdDto,
    name: String,
}

/// The dataset encodes station ids as strings; plain integers are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StationIdDto {
    Number(u64),
    Text(String),
}

impl StationIdDto {
    fn parse(self) -> Result<u64, ParseError> {
        match self {
            StationIdDto::Number(id) => Ok(id),
            StationIdDto::Text(text) => text
                .parse()
                .map_err(|_| ParseError::InvalidStationId(text)),
        }
    }
}

/// Build the cache key for a stop: `{station-id}/{train-name}/{destination}/{departure}`.
pub fn entry_key(station_id: u64, train: &Train, departure: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        station_id, train.name, train.destination, departure
    )
}

/// Parse one dataset line into its cache key and [`Stop`].
///
/// Pure: the same line always yields the same pair.
pub fn to_entry(line: &str) -> Result<(String, Stop), ParseError> {
    let record: RecordDto = serde_json::from_str(line)?;

    let train = Train::new(record.name, record.to, record.category, record.operator);

    let stop = record.stop;
    let station_id = stop.station.id.parse()?;
    let station = Station::new(station_id, stop.station.name);

    let departure = DateTime::from_timestamp(stop.departure_timestamp, 0)
        .ok_or(ParseError::TimestampOutOfRange(stop.departure_timestamp))?;
    let delay_min = stop.delay.unwrap_or(0);

    let key = entry_key(station_id, &train, &stop.departure);

    Ok((key, Stop::new(train, delay_min, station, departure)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BERN_LINE: &str = r#"{"name":"IC1","to":"Zurich","category":"IC","operator":"SBB","stop":{"station":{"id":"100","name":"Bern"},"departureTimestamp":1456700000,"departure":"14:00"}}"#;

    #[test]
    fn maps_single_record() {
        let (key, stop) = to_entry(BERN_LINE).unwrap();

        assert_eq!(key, "100/IC1/Zurich/14:00");
        assert_eq!(stop.train, Train::new("IC1", "Zurich", "IC", "SBB"));
        assert_eq!(stop.delay_min, 0);
        assert_eq!(stop.station, Station::new(100, "Bern"));
        assert_eq!(stop.departure.timestamp(), 1456700000);
    }

    #[test]
    fn delay_is_read_when_present() {
        let line = BERN_LINE.replace(r#""departure":"14:00""#, r#""departure":"14:00","delay":4"#);
        let (_, stop) = to_entry(&line).unwrap();
        assert_eq!(stop.delay_min, 4);
    }

    #[test]
    fn null_delay_defaults_to_zero() {
        let line = BERN_LINE.replace(r#""departure":"14:00""#, r#""departure":"14:00","delay":null"#);
        let (_, stop) = to_entry(&line).unwrap();
        assert_eq!(stop.delay_min, 0);
    }

    #[test]
    fn numeric_station_id() {
        let line = BERN_LINE.replace(r#""id":"100""#, r#""id":100"#);
        let (key, stop) = to_entry(&line).unwrap();
        assert_eq!(key, "100/IC1/Zurich/14:00");
        assert_eq!(stop.station.id, 100);
    }

    #[test]
    fn non_numeric_station_id() {
        let line = BERN_LINE.replace(r#""id":"100""#, r#""id":"BN""#);
        assert!(matches!(
            to_entry(&line),
            Err(ParseError::InvalidStationId(id)) if id == "BN"
        ));
    }

    #[test]
    fn padded_station_id_is_rejected() {
        let line = BERN_LINE.replace(r#""id":"100""#, r#""id":" 100 ""#);
        assert!(matches!(
            to_entry(&line),
            Err(ParseError::InvalidStationId(id)) if id == " 100 "
        ));
    }

    #[test]
    fn out_of_range_timestamp() {
        let line = BERN_LINE.replace("1456700000", &i64::MAX.to_string());
        assert!(matches!(
            to_entry(&line),
            Err(ParseError::TimestampOutOfRange(_))
        ));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(to_entry("{not json"), Err(ParseError::Json(_))));
        assert!(matches!(to_entry(""), Err(ParseError::Json(_))));
    }

    #[test]
    fn missing_required_fields() {
        let removals = [
            r#""name":"IC1","#,
            r#""to":"Zurich","#,
            r#""category":"IC","#,
            r#""operator":"SBB","#,
            r#""id":"100","#,
            r#","name":"Bern""#,
            r#""departureTimestamp":1456700000,"#,
            r#","departure":"14:00""#,
        ];

        for removal in removals {
            let line = BERN_LINE.replacen(removal, "", 1);
            assert_ne!(line, BERN_LINE, "removal {removal} did not apply");
            assert!(
                matches!(to_entry(&line), Err(ParseError::Json(_))),
                "expected parse error without {removal}: {line}"
            );
        }
    }

    #[test]
    fn null_required_field() {
        let line = BERN_LINE.replace(r#""operator":"SBB""#, r#""operator":null"#);
        assert!(to_entry(&line).is_err());
    }
}
