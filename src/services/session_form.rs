use chrono::NaiveDate;
use rust_decimal::Decimal;
use strum::IntoEnumIterator;

use crate::models::flight_session::{
    FlightSessionDraft, FlightSessionRecord, HourField, NumericInput,
};
use crate::services::input_filter::sanitize_hours_input;
use crate::services::recorder::{session_duration_hours, FlightSessionRecorder};
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    StartHour,
    StartMinute,
    EndHour,
    EndMinute,
}

impl TimeField {
    fn name(self) -> &'static str {
        match self {
            TimeField::StartHour => "startHour",
            TimeField::StartMinute => "startMinute",
            TimeField::EndHour => "endHour",
            TimeField::EndMinute => "endMinute",
        }
    }

    fn max(self) -> u8 {
        match self {
            TimeField::StartHour | TimeField::EndHour => 23,
            TimeField::StartMinute | TimeField::EndMinute => 59,
        }
    }
}

/// A flight session being filled in by one user.
///
/// Every edit goes through a setter so the displayed duration is refreshed
/// before the setter returns, and hour inputs are sanitized as they are
/// typed. Submitting builds the record from the same draft with the same
/// duration function, so what was shown is what gets stored.
#[derive(Debug, Clone)]
pub struct SessionForm {
    draft: FlightSessionDraft,
    max_hours: Decimal,
    duration_hours: f64,
}

impl SessionForm {
    pub fn new(max_hours: Decimal) -> Self {
        Self::from_draft(FlightSessionDraft::default(), max_hours)
    }

    pub fn from_draft(draft: FlightSessionDraft, max_hours: Decimal) -> Self {
        let mut form = SessionForm {
            draft,
            max_hours,
            duration_hours: 0.0,
        };
        for field in HourField::iter() {
            if let Some(NumericInput::Text(raw)) = form.draft.hours.get(field).cloned() {
                form.set_hours(field, &raw);
            }
        }
        form.recompute_duration();
        form
    }

    pub fn draft(&self) -> &FlightSessionDraft {
        &self.draft
    }

    pub fn into_draft(self) -> FlightSessionDraft {
        self.draft
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_hours
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.draft.date = date;
    }

    pub fn set_time(&mut self, field: TimeField, value: u8) -> AppResult<()> {
        if value > field.max() {
            return Err(AppError::ValidationError(format!(
                "{} must be between 0 and {}",
                field.name(),
                field.max()
            )));
        }
        *self.time_slot(field) = Some(value);
        self.recompute_duration();
        Ok(())
    }

    pub fn clear_time(&mut self, field: TimeField) {
        *self.time_slot(field) = None;
        self.recompute_duration();
    }

    /// Stores the sanitized text of an hour input.
    pub fn set_hours(&mut self, field: HourField, raw: &str) {
        let cleaned = sanitize_hours_input(raw, self.max_hours);
        self.draft.hours.set(field, Some(NumericInput::Text(cleaned)));
    }

    pub fn submit(&self, recorder: &FlightSessionRecorder) -> AppResult<FlightSessionRecord> {
        recorder.build_record(&self.draft)
    }

    fn time_slot(&mut self, field: TimeField) -> &mut Option<u8> {
        match field {
            TimeField::StartHour => &mut self.draft.start_hour,
            TimeField::StartMinute => &mut self.draft.start_minute,
            TimeField::EndHour => &mut self.draft.end_hour,
            TimeField::EndMinute => &mut self.draft.end_minute,
        }
    }

    fn recompute_duration(&mut self) {
        self.duration_hours = match (
            self.draft.start_hour,
            self.draft.start_minute,
            self.draft.end_hour,
            self.draft.end_minute,
        ) {
            (Some(sh), Some(sm), Some(eh), Some(em)) => session_duration_hours(sh, sm, eh, em),
            _ => 0.0,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::input_filter::DEFAULT_MAX_HOURS;
    use crate::services::recorder::MISSING_TIME_FIELDS;

    fn filled_form() -> SessionForm {
        let mut form = SessionForm::new(DEFAULT_MAX_HOURS);
        form.set_date(NaiveDate::from_ymd_opt(2024, 5, 1));
        form.set_time(TimeField::StartHour, 8).unwrap();
        form.set_time(TimeField::StartMinute, 0).unwrap();
        form.set_time(TimeField::EndHour, 10).unwrap();
        form.set_time(TimeField::EndMinute, 30).unwrap();
        form
    }

    #[test]
    fn duration_follows_every_time_edit() {
        let mut form = SessionForm::new(DEFAULT_MAX_HOURS);
        form.set_time(TimeField::StartHour, 8).unwrap();
        form.set_time(TimeField::StartMinute, 0).unwrap();
        form.set_time(TimeField::EndHour, 10).unwrap();
        assert_eq!(form.duration_hours(), 0.0);

        form.set_time(TimeField::EndMinute, 30).unwrap();
        assert_eq!(form.duration_hours(), 2.5);

        form.set_time(TimeField::EndHour, 6).unwrap();
        assert_eq!(form.duration_hours(), 22.5);

        form.set_time(TimeField::StartHour, 6).unwrap();
        form.set_time(TimeField::StartMinute, 30).unwrap();
        assert_eq!(form.duration_hours(), 0.0);

        form.clear_time(TimeField::StartHour);
        assert_eq!(form.duration_hours(), 0.0);
    }

    #[test]
    fn submitted_duration_matches_the_displayed_one() {
        let form = filled_form();
        let record = form.submit(&FlightSessionRecorder::default()).unwrap();
        assert_eq!(record.duration_hours.to_bits(), form.duration_hours().to_bits());
    }

    #[test]
    fn hour_inputs_are_sanitized_on_entry() {
        let mut form = filled_form();
        form.set_hours(HourField::DayHours, "abc12.34");
        form.set_hours(HourField::NightHours, "12.3.4");

        assert_eq!(
            form.draft().hours.day_hours,
            Some(NumericInput::Text("12.3".into()))
        );
        let record = form.submit(&FlightSessionRecorder::default()).unwrap();
        assert_eq!(record.hours.day_hours, 12.3);
        assert_eq!(record.hours.night_hours, 12.3);
    }

    #[test]
    fn loaded_drafts_are_sanitized_and_timed() {
        let mut draft = filled_form().into_draft();
        draft.hours.fstd_hours = Some(NumericInput::Text("1,5".into()));

        let form = SessionForm::from_draft(draft, Decimal::new(10, 0));
        assert_eq!(form.duration_hours(), 2.5);
        assert_eq!(
            form.draft().hours.fstd_hours,
            Some(NumericInput::Text("10".into()))
        );
    }

    #[test]
    fn out_of_range_selection_is_refused() {
        let mut form = filled_form();
        assert!(form.set_time(TimeField::EndMinute, 60).is_err());
        assert_eq!(form.draft().end_minute, Some(30));
        assert_eq!(form.duration_hours(), 2.5);
    }

    #[test]
    fn incomplete_forms_do_not_submit() {
        let mut form = filled_form();
        form.set_date(None);
        assert_eq!(
            form.submit(&FlightSessionRecorder::default()),
            Err(AppError::ValidationError(MISSING_TIME_FIELDS.into()))
        );
    }
}
