//! Serde adapter for the store's `"HH:MM"` time-of-day fields.

use chrono::NaiveTime;
use serde::{self, Deserialize, Deserializer, Serializer};

const FORMAT: &str = "%H:%M";

pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&time.format(FORMAT).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super")]
        time: NaiveTime,
    }

    #[test]
    fn round_trips_whole_hours() {
        let json = serde_json::to_string(&Wrapper {
            time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        })
        .unwrap();
        assert_eq!(json, r#"{"time":"08:00"}"#);

        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    }

    #[test]
    fn rejects_seconds_suffix() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"time":"08:00:00"}"#).is_err());
    }
}
