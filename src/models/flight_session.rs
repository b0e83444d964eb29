use chrono::{DateTime, FixedOffset, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    Flight,
    Simulator,
    Training,
    Checkride,
    Solo,
    CrossCountry,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PilotRole {
    Pic,
    Dual,
    Copilot,
    Picus,
    CommandPractice,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CrewOperation {
    SinglePilot,
    MultiPilot,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Canceled,
    Rescheduled,
    NoShow,
    PendingReview,
}

/// Hour-breakdown categories logged for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum HourField {
    SingleEngineHours,
    MultiEngineHours,
    DayHours,
    NightHours,
    InstrumentHours,
    SimulatedInstrumentHours,
    CrossCountryHours,
    FstdHours,
}

/// A numeric form value as it arrives from a client: either already a
/// number or the raw text of an input box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

/// Checkbox/select value that may be a boolean or its string form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FlagInput {
    Bool(bool),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct HourInputs {
    pub single_engine_hours: Option<NumericInput>,
    pub multi_engine_hours: Option<NumericInput>,
    pub day_hours: Option<NumericInput>,
    pub night_hours: Option<NumericInput>,
    pub instrument_hours: Option<NumericInput>,
    pub simulated_instrument_hours: Option<NumericInput>,
    pub cross_country_hours: Option<NumericInput>,
    pub fstd_hours: Option<NumericInput>,
}

impl HourInputs {
    pub fn get(&self, field: HourField) -> Option<&NumericInput> {
        match field {
            HourField::SingleEngineHours => self.single_engine_hours.as_ref(),
            HourField::MultiEngineHours => self.multi_engine_hours.as_ref(),
            HourField::DayHours => self.day_hours.as_ref(),
            HourField::NightHours => self.night_hours.as_ref(),
            HourField::InstrumentHours => self.instrument_hours.as_ref(),
            HourField::SimulatedInstrumentHours => self.simulated_instrument_hours.as_ref(),
            HourField::CrossCountryHours => self.cross_country_hours.as_ref(),
            HourField::FstdHours => self.fstd_hours.as_ref(),
        }
    }

    pub fn set(&mut self, field: HourField, value: Option<NumericInput>) {
        let slot = match field {
            HourField::SingleEngineHours => &mut self.single_engine_hours,
            HourField::MultiEngineHours => &mut self.multi_engine_hours,
            HourField::DayHours => &mut self.day_hours,
            HourField::NightHours => &mut self.night_hours,
            HourField::InstrumentHours => &mut self.instrument_hours,
            HourField::SimulatedInstrumentHours => &mut self.simulated_instrument_hours,
            HourField::CrossCountryHours => &mut self.cross_country_hours,
            HourField::FstdHours => &mut self.fstd_hours,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HourBreakdown {
    pub single_engine_hours: f64,
    pub multi_engine_hours: f64,
    pub day_hours: f64,
    pub night_hours: f64,
    pub instrument_hours: f64,
    pub simulated_instrument_hours: f64,
    pub cross_country_hours: f64,
    pub fstd_hours: f64,
}

impl HourBreakdown {
    pub fn get(&self, field: HourField) -> f64 {
        match field {
            HourField::SingleEngineHours => self.single_engine_hours,
            HourField::MultiEngineHours => self.multi_engine_hours,
            HourField::DayHours => self.day_hours,
            HourField::NightHours => self.night_hours,
            HourField::InstrumentHours => self.instrument_hours,
            HourField::SimulatedInstrumentHours => self.simulated_instrument_hours,
            HourField::CrossCountryHours => self.cross_country_hours,
            HourField::FstdHours => self.fstd_hours,
        }
    }

    pub fn set(&mut self, field: HourField, value: f64) {
        let slot = match field {
            HourField::SingleEngineHours => &mut self.single_engine_hours,
            HourField::MultiEngineHours => &mut self.multi_engine_hours,
            HourField::DayHours => &mut self.day_hours,
            HourField::NightHours => &mut self.night_hours,
            HourField::InstrumentHours => &mut self.instrument_hours,
            HourField::SimulatedInstrumentHours => &mut self.simulated_instrument_hours,
            HourField::CrossCountryHours => &mut self.cross_country_hours,
            HourField::FstdHours => &mut self.fstd_hours,
        };
        *slot = value;
    }
}

// Flight session as the form submits it; every field may still be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct FlightSessionDraft {
    pub date: Option<NaiveDate>,

    #[validate(range(max = 23, message = "startHour must be between 0 and 23"))]
    pub start_hour: Option<u8>,
    #[validate(range(max = 59, message = "startMinute must be between 0 and 59"))]
    pub start_minute: Option<u8>,
    #[validate(range(max = 23, message = "endHour must be between 0 and 23"))]
    pub end_hour: Option<u8>,
    #[validate(range(max = 59, message = "endMinute must be between 0 and 59"))]
    pub end_minute: Option<u8>,

    pub session_type: Option<SessionType>,
    pub pilot_role: Option<PilotRole>,
    pub crew_operation: Option<CrewOperation>,
    pub status: Option<SessionStatus>,

    #[serde(flatten)]
    pub hours: HourInputs,

    pub student_id: Option<String>,
    pub teacher_id: Option<String>,
    pub aircraft_id: Option<String>,
    pub simulator_id: Option<String>,

    pub verified_by_instructor: Option<FlagInput>,
    pub remarks: Option<String>,
}

// Normalized flight session handed to the persistence API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlightSessionRecord {
    pub date: NaiveDate,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub duration_hours: f64,

    pub session_type: SessionType,
    pub pilot_role: PilotRole,
    pub crew_operation: CrewOperation,
    pub status: SessionStatus,

    #[serde(flatten)]
    pub hours: HourBreakdown,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aircraft_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulator_id: Option<String>,

    pub verified_by_instructor: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlightSessionPreview {
    /// Draft after hour inputs were sanitized.
    pub draft: FlightSessionDraft,
    /// Duration shown next to the time pickers.
    pub duration_hours: f64,
    pub record: Option<FlightSessionRecord>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct StatusChangeRequest {
    pub status: SessionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn draft_accepts_numbers_and_strings_for_hours() {
        let draft: FlightSessionDraft = serde_json::from_value(json!({
            "date": "2024-05-01",
            "startHour": 8,
            "dayHours": "1.5",
            "nightHours": 0.7,
            "verifiedByInstructor": "true",
            "sessionType": "CROSS_COUNTRY"
        }))
        .unwrap();

        assert_eq!(draft.start_hour, Some(8));
        assert_eq!(draft.hours.day_hours, Some(NumericInput::Text("1.5".into())));
        assert_eq!(draft.hours.night_hours, Some(NumericInput::Number(0.7)));
        assert_eq!(draft.verified_by_instructor, Some(FlagInput::Text("true".into())));
        assert_eq!(draft.session_type, Some(SessionType::CrossCountry));
        assert_eq!(draft.hours.fstd_hours, None);
    }

    #[test]
    fn hour_field_names_match_the_wire_format() {
        assert_eq!(HourField::FstdHours.to_string(), "fstdHours");
        assert_eq!(
            HourField::SimulatedInstrumentHours.to_string(),
            "simulatedInstrumentHours"
        );
    }

    #[test]
    fn status_parses_from_query_strings() {
        assert_eq!(SessionStatus::from_str("NO_SHOW"), Ok(SessionStatus::NoShow));
        assert!(SessionStatus::from_str("LATE").is_err());
        assert_eq!(PilotRole::CommandPractice.to_string(), "COMMAND_PRACTICE");
    }
}
