//! Backend implementation for the Sporttia timetable and occupations API.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use pista_core::{
    model::{Activity, Capacity, FacilityId, SlotWindow},
    plugin::BackendPlugin,
    ports::{OccupationPort, PortError, TimetablePort},
};

const BASE_URL: &str = "https://api.sporttia.com/v7";

// The deployment serves a single sports centre; the SPA hardcodes the same id.
const FIELD_GROUP_ID: i64 = 1_742_300;

/// Availability marker on a bookable slot.
const OPEN_MARK: &str = "FREE";

/// Timestamp formats observed across API versions.
const SLOT_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Format used for the occupations query parameters.
const QUERY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Weekly timetable payload; the two API generations disagree on the
/// top-level shape, so decoding probes both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimetableResponse {
    /// Newer columnar shape: slots grouped per facility column.
    Columnar { one: Board },
    /// Older nested shape: facility → day → slots.
    Nested { facilities: Vec<FacilityWeek> },
}

/// Board wrapper around the facility columns.
#[derive(Debug, Deserialize)]
struct Board {
    #[serde(default)]
    columns: Vec<Column>,
}

/// One facility column with its week of slots.
#[derive(Debug, Deserialize)]
struct Column {
    facility: Facility,
    #[serde(default)]
    pieces: Vec<Piece>,
}

/// Facility header inside a column.
#[derive(Debug, Deserialize)]
struct Facility {
    id: i64,
    name: String,
}

/// Facility entry in the nested shape, slots grouped per day.
#[derive(Debug, Deserialize)]
struct FacilityWeek {
    id: i64,
    name: String,
    #[serde(default)]
    days: Vec<Day>,
}

/// One day of slots in the nested shape.
#[derive(Debug, Deserialize)]
struct Day {
    #[serde(default)]
    pieces: Vec<Piece>,
}

/// Single bookable slot record, common to both shapes.
#[derive(Debug, Deserialize)]
struct Piece {
    ini: String,
    end: String,
    #[serde(default)]
    mark: Option<String>,
    #[serde(default)]
    capacity: Option<PieceCapacity>,
}

/// Seat counts attached to a slot.
#[derive(Debug, Deserialize)]
struct PieceCapacity {
    free: u32,
    total: u32,
}

/// Response from /timetables/occupations.
#[derive(Debug, Deserialize)]
struct OccupationsResponse {
    #[serde(default)]
    rows: Vec<OccupationRow>,
}

/// Single booking row; other fields exist but only the name is needed.
#[derive(Debug, Deserialize)]
struct OccupationRow {
    name: String,
}

/// Weekly timetable implementation backed by the Sporttia API.
pub struct SporttiaTimetablePort {
    client: Client,
}

impl SporttiaTimetablePort {
    /// Create a new timetable port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TimetablePort for SporttiaTimetablePort {
    async fn weekly_timetable(&self, now: NaiveDateTime) -> Result<Vec<Activity>, PortError> {
        let req = self
            .client
            .get(format!("{BASE_URL}/timetable"))
            .query(&[("idFieldGroup", FIELD_GROUP_ID)])
            .query(&[("weekly", true)]);

        let response = fetch_json::<TimetableResponse>(req).await?;
        let activities = normalize(response, now)?;

        tracing::debug!(slots = activities.len(), "normalized weekly timetable");
        Ok(activities)
    }
}

/// Participant lookup implementation backed by the Sporttia API.
pub struct SporttiaOccupationPort {
    client: Client,
}

impl SporttiaOccupationPort {
    /// Create a new occupation port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OccupationPort for SporttiaOccupationPort {
    async fn occupations(&self, window: &SlotWindow) -> Result<Vec<String>, PortError> {
        let date_ini = window.start.format(QUERY_TIME_FORMAT).to_string();
        let date_end = window.end.format(QUERY_TIME_FORMAT).to_string();
        let field_id = window.facility.to_string();

        let req = self
            .client
            .get(format!("{BASE_URL}/timetables/occupations"))
            .query(&[
                ("dateIni", date_ini.as_str()),
                ("dateEnd", date_end.as_str()),
                ("fieldId", field_id.as_str()),
            ]);

        let response = fetch_json::<OccupationsResponse>(req).await?;
        Ok(response.rows.into_iter().map(|row| row.name).collect())
    }
}

/// Build the plugin bundle for the Sporttia backend.
#[must_use]
pub fn plugin(client: Client) -> BackendPlugin {
    BackendPlugin {
        timetable_port: Arc::new(SporttiaTimetablePort::new(client.clone())),
        occupation_port: Arc::new(SporttiaOccupationPort::new(client)),
    }
}

/// Flatten either payload shape into the sorted, filtered activity list.
fn normalize(response: TimetableResponse, now: NaiveDateTime) -> Result<Vec<Activity>, PortError> {
    let mut activities = Vec::new();

    match response {
        TimetableResponse::Columnar { one } => {
            for column in one.columns {
                collect_open_slots(&column.facility, column.pieces, now, &mut activities)?;
            }
        }
        TimetableResponse::Nested { facilities } => {
            for week in facilities {
                let facility = Facility {
                    id: week.id,
                    name: week.name,
                };
                for day in week.days {
                    collect_open_slots(&facility, day.pieces, now, &mut activities)?;
                }
            }
        }
    }

    // Stable sort: slots starting together keep their encounter order.
    activities.sort_by_key(|activity| activity.start);

    Ok(activities)
}

/// Keep only slots that are open, have a defined capacity, and end in the
/// future.
fn collect_open_slots(
    facility: &Facility,
    pieces: Vec<Piece>,
    now: NaiveDateTime,
    out: &mut Vec<Activity>,
) -> Result<(), PortError> {
    for piece in pieces {
        if piece.mark.as_deref() != Some(OPEN_MARK) {
            continue;
        }
        let Some(capacity) = piece.capacity else {
            continue;
        };

        let start = parse_slot_time(&piece.ini)?;
        let end = parse_slot_time(&piece.end)?;
        if end <= now {
            continue;
        }

        out.push(Activity {
            facility: FacilityId(facility.id),
            facility_name: facility.name.trim().to_owned(),
            start,
            end,
            capacity: Capacity {
                free: capacity.free,
                total: capacity.total,
            },
        });
    }

    Ok(())
}

/// Parse a slot timestamp, accepting the formats of both API generations.
fn parse_slot_time(raw: &str) -> Result<NaiveDateTime, PortError> {
    let mut last_err = None;
    for slot_format in SLOT_TIME_FORMATS {
        match NaiveDateTime::parse_from_str(raw, slot_format) {
            Ok(parsed) => return Ok(parsed),
            Err(err) => last_err = Some(err),
        }
    }
    match last_err {
        Some(err) => Err(PortError::from(err)),
        None => Err(PortError::Internal(format!("Unparseable slot time {raw}"))),
    }
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(PortError::from)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    fn clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2031, 3, 10)
            .expect("valid date")
            .and_hms_opt(12, 0, 0)
            .expect("valid time")
    }

    fn decode(value: serde_json::Value) -> TimetableResponse {
        serde_json::from_value(value).expect("payload decodes")
    }

    #[test]
    fn columnar_payload_filters_and_sorts() {
        let payload = decode(json!({
            "one": {
                "columns": [
                    {
                        "facility": { "id": 11, "name": " Padel 1 " },
                        "pieces": [
                            {
                                // Ends in the past, dropped.
                                "ini": "2031-03-10T09:00:00",
                                "end": "2031-03-10T10:00:00",
                                "mark": "FREE",
                                "capacity": { "free": 4, "total": 8 }
                            },
                            {
                                "ini": "2031-03-10T18:00:00",
                                "end": "2031-03-10T19:00:00",
                                "mark": "FREE",
                                "capacity": { "free": 2, "total": 10 }
                            }
                        ]
                    },
                    {
                        "facility": { "id": 12, "name": "Tenis" },
                        "pieces": [
                            {
                                "ini": "2031-03-10T15:00:00",
                                "end": "2031-03-10T16:00:00",
                                "mark": "FREE",
                                "capacity": { "free": 1, "total": 4 }
                            },
                            {
                                // No capacity object, dropped.
                                "ini": "2031-03-10T16:00:00",
                                "end": "2031-03-10T17:00:00",
                                "mark": "FREE"
                            },
                            {
                                // Closed slot, dropped.
                                "ini": "2031-03-10T17:00:00",
                                "end": "2031-03-10T18:00:00",
                                "mark": "BUSY",
                                "capacity": { "free": 0, "total": 4 }
                            }
                        ]
                    }
                ]
            }
        }));

        let activities = normalize(payload, clock()).expect("normalizes");

        let summary: Vec<(i64, &str, u32)> = activities
            .iter()
            .map(|activity| {
                (
                    activity.facility.0,
                    activity.facility_name.as_str(),
                    activity.capacity.free,
                )
            })
            .collect();

        // Sorted by start time, names trimmed, invalid slots gone.
        assert_eq!(summary, vec![(12, "Tenis", 1), (11, "Padel 1", 2)]);
    }

    #[test]
    fn nested_payload_flattens_days() {
        let payload = decode(json!({
            "facilities": [
                {
                    "id": 3,
                    "name": "Futbol Sala",
                    "days": [
                        {
                            "pieces": [
                                {
                                    "ini": "2031-03-11 10:00:00",
                                    "end": "2031-03-11 11:00:00",
                                    "mark": "FREE",
                                    "capacity": { "free": 5, "total": 14 }
                                }
                            ]
                        },
                        {
                            "pieces": [
                                {
                                    "ini": "2031-03-10 20:00:00",
                                    "end": "2031-03-10 21:30:00",
                                    "mark": "FREE",
                                    "capacity": { "free": 3, "total": 14 }
                                }
                            ]
                        }
                    ]
                }
            ]
        }));

        let activities = normalize(payload, clock()).expect("normalizes");

        let starts: Vec<NaiveDateTime> =
            activities.iter().map(|activity| activity.start).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted, "ascending by start time");
        assert_eq!(activities.len(), 2);
    }

    #[test]
    fn equal_start_times_keep_encounter_order() {
        let payload = decode(json!({
            "one": {
                "columns": [
                    {
                        "facility": { "id": 1, "name": "A" },
                        "pieces": [
                            {
                                "ini": "2031-03-10T18:00:00",
                                "end": "2031-03-10T19:00:00",
                                "mark": "FREE",
                                "capacity": { "free": 1, "total": 2 }
                            }
                        ]
                    },
                    {
                        "facility": { "id": 2, "name": "B" },
                        "pieces": [
                            {
                                "ini": "2031-03-10T18:00:00",
                                "end": "2031-03-10T19:00:00",
                                "mark": "FREE",
                                "capacity": { "free": 1, "total": 2 }
                            }
                        ]
                    }
                ]
            }
        }));

        let activities = normalize(payload, clock()).expect("normalizes");
        let order: Vec<i64> = activities.iter().map(|activity| activity.facility.0).collect();
        assert_eq!(order, vec![1, 2]);
    }

    #[test]
    fn slot_ending_exactly_now_is_excluded() {
        let payload = decode(json!({
            "one": {
                "columns": [
                    {
                        "facility": { "id": 5, "name": "Padel 2" },
                        "pieces": [
                            {
                                "ini": "2031-03-10T11:00:00",
                                "end": "2031-03-10T12:00:00",
                                "mark": "FREE",
                                "capacity": { "free": 2, "total": 4 }
                            }
                        ]
                    }
                ]
            }
        }));

        let activities = normalize(payload, clock()).expect("normalizes");
        assert!(activities.is_empty(), "end == now is not a future slot");
    }

    #[test]
    fn missing_piece_lists_decode_as_empty() {
        let payload = decode(json!({
            "one": {
                "columns": [
                    { "facility": { "id": 9, "name": "Gimnasio" } }
                ]
            }
        }));

        let activities = normalize(payload, clock()).expect("normalizes");
        assert!(activities.is_empty());
    }

    #[test]
    fn occupation_rows_default_to_empty() {
        let empty: OccupationsResponse = serde_json::from_value(json!({})).expect("decodes");
        assert!(empty.rows.is_empty());

        let populated: OccupationsResponse = serde_json::from_value(json!({
            "rows": [ { "name": "12 maria garcia 34" }, { "name": "ANA LOPEZ" } ]
        }))
        .expect("decodes");
        let names: Vec<String> = populated.rows.into_iter().map(|row| row.name).collect();
        assert_eq!(names, vec!["12 maria garcia 34", "ANA LOPEZ"]);
    }

    #[test]
    fn bad_slot_time_is_a_parse_error() {
        assert!(matches!(
            parse_slot_time("not-a-time"),
            Err(PortError::Parse(_))
        ));
    }
}
