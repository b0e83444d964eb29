use chrono::{Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use rust_decimal::Decimal;
use strum::IntoEnumIterator;
use validator::Validate;

use crate::models::flight_session::{
    CrewOperation, FlagInput, FlightSessionDraft, FlightSessionRecord, HourBreakdown, HourField,
    NumericInput, PilotRole, SessionStatus, SessionType,
};
use crate::services::input_filter::{sanitize_hours_input, DEFAULT_MAX_HOURS};
use crate::utils::error::{AppError, AppResult};

pub const MISSING_TIME_FIELDS: &str = "Please fill in date and time fields";

const MINUTES_PER_DAY: i64 = 24 * 60;

/// What to do when the aircraft/simulator reference is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// Build the record without the reference and let the backend decide.
    Lenient,
    /// Refuse to build the record.
    Strict,
}

#[derive(Debug, Clone, Copy)]
pub struct RecorderConfig {
    /// Offset of the school's local clock; wall times are read in it.
    pub utc_offset: FixedOffset,
    pub reference_policy: ReferencePolicy,
    /// Ceiling for every hour field, at most one fractional digit.
    pub max_hours: Decimal,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        RecorderConfig {
            utc_offset: Utc.fix(),
            reference_policy: ReferencePolicy::Lenient,
            max_hours: DEFAULT_MAX_HOURS,
        }
    }
}

/// Minutes flown between two wall-clock times, wrapping past midnight.
pub fn session_duration_minutes(
    start_hour: u8,
    start_minute: u8,
    end_hour: u8,
    end_minute: u8,
) -> i64 {
    let start_total = i64::from(start_hour) * 60 + i64::from(start_minute);
    let end_total = i64::from(end_hour) * 60 + i64::from(end_minute);

    if end_total > start_total {
        end_total - start_total
    } else if end_total < start_total {
        (MINUTES_PER_DAY - start_total + end_total).max(0)
    } else {
        0
    }
}

/// Decimal hours between two wall-clock times. Both the form display and
/// the submitted record go through this function.
pub fn session_duration_hours(
    start_hour: u8,
    start_minute: u8,
    end_hour: u8,
    end_minute: u8,
) -> f64 {
    session_duration_minutes(start_hour, start_minute, end_hour, end_minute) as f64 / 60.0
}

/// Turns a flight session draft into the record the persistence API stores.
///
/// Pure: no I/O, no clock reads, same draft in, same record out.
#[derive(Debug, Clone, Default)]
pub struct FlightSessionRecorder {
    config: RecorderConfig,
}

impl FlightSessionRecorder {
    pub fn new(config: RecorderConfig) -> Self {
        FlightSessionRecorder { config }
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn build_record(&self, draft: &FlightSessionDraft) -> AppResult<FlightSessionRecord> {
        // Time fields first: nothing else matters until they are all there
        let (date, start_hour, start_minute, end_hour, end_minute) = match (
            draft.date,
            draft.start_hour,
            draft.start_minute,
            draft.end_hour,
            draft.end_minute,
        ) {
            (Some(date), Some(sh), Some(sm), Some(eh), Some(em)) => (date, sh, sm, eh, em),
            _ => return Err(AppError::ValidationError(MISSING_TIME_FIELDS.into())),
        };
        draft.validate()?;

        let duration_minutes = session_duration_minutes(start_hour, start_minute, end_hour, end_minute);
        let start_time = self
            .config
            .utc_offset
            .from_local_datetime(&local_datetime(date, start_hour, start_minute)?)
            .single()
            .ok_or_else(|| AppError::ValidationError("Start time is not a valid local time".into()))?;
        // Overnight sessions end on the following day
        let end_time = start_time + Duration::minutes(duration_minutes);

        let session_type = draft.session_type.unwrap_or(SessionType::Flight);
        let pilot_role = draft.pilot_role.unwrap_or(match session_type {
            SessionType::Solo => PilotRole::Pic,
            _ => PilotRole::Dual,
        });

        let (aircraft_id, simulator_id) = self.resolve_device(draft, session_type)?;
        let student_id = non_empty(&draft.student_id);
        let teacher_id = non_empty(&draft.teacher_id);
        if self.config.reference_policy == ReferencePolicy::Strict {
            if student_id.is_none() {
                return Err(AppError::ValidationError("Please select a student".into()));
            }
            if teacher_id.is_none() {
                return Err(AppError::ValidationError("Please select a teacher".into()));
            }
        }

        let mut hours = HourBreakdown::default();
        for field in HourField::iter() {
            hours.set(field, coerce_hours(field, draft.hours.get(field), self.config.max_hours)?);
        }

        Ok(FlightSessionRecord {
            date,
            start_time,
            end_time,
            duration_hours: duration_minutes as f64 / 60.0,
            session_type,
            pilot_role,
            crew_operation: draft.crew_operation.unwrap_or(CrewOperation::SinglePilot),
            status: draft.status.unwrap_or(SessionStatus::Scheduled),
            hours,
            student_id,
            teacher_id,
            aircraft_id,
            simulator_id,
            verified_by_instructor: normalize_flag(draft.verified_by_instructor.as_ref()),
            remarks: non_empty(&draft.remarks),
            school_id: None,
        })
    }

    // Exactly one device kind is kept, chosen by the session type
    fn resolve_device(
        &self,
        draft: &FlightSessionDraft,
        session_type: SessionType,
    ) -> AppResult<(Option<String>, Option<String>)> {
        let strict = self.config.reference_policy == ReferencePolicy::Strict;
        match session_type {
            SessionType::Simulator => {
                let simulator_id = non_empty(&draft.simulator_id);
                if strict && simulator_id.is_none() {
                    return Err(AppError::ValidationError("Please select a simulator".into()));
                }
                Ok((None, simulator_id))
            }
            SessionType::Flight
            | SessionType::Training
            | SessionType::Checkride
            | SessionType::Solo
            | SessionType::CrossCountry => {
                let aircraft_id = non_empty(&draft.aircraft_id);
                if strict && aircraft_id.is_none() {
                    return Err(AppError::ValidationError("Please select an aircraft".into()));
                }
                Ok((aircraft_id, None))
            }
        }
    }
}

fn local_datetime(date: NaiveDate, hour: u8, minute: u8) -> AppResult<NaiveDateTime> {
    NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), 0)
        .map(|time| date.and_time(time))
        .ok_or_else(|| AppError::ValidationError(MISSING_TIME_FIELDS.into()))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// Blank input counts as zero, anything unparsable is refused. Accepted
// values go through the keystroke filter, JSON numbers included.
fn coerce_hours(field: HourField, input: Option<&NumericInput>, max_hours: Decimal) -> AppResult<f64> {
    let value = match input {
        None => return Ok(0.0),
        Some(NumericInput::Number(value)) => *value,
        Some(NumericInput::Text(raw)) => {
            let raw = raw.trim();
            if raw.is_empty() || raw == "." {
                return Ok(0.0);
            }
            raw.parse::<f64>().map_err(|_| invalid_hours(field))?
        }
    };

    if !value.is_finite() || value < 0.0 {
        return Err(invalid_hours(field));
    }
    sanitize_hours_input(&value.to_string(), max_hours)
        .parse::<f64>()
        .map_err(|_| invalid_hours(field))
}

fn invalid_hours(field: HourField) -> AppError {
    AppError::ValidationError(format!("{} must be a non-negative number", field))
}

pub fn normalize_flag(input: Option<&FlagInput>) -> bool {
    match input {
        Some(FlagInput::Text(value)) => value == "true",
        Some(FlagInput::Bool(value)) => *value,
        Some(FlagInput::Number(value)) => *value != 0.0 && !value.is_nan(),
        None => false,
    }
}
