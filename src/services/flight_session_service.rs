use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::models::flight_session::{
    FlightSessionDraft, FlightSessionPreview, FlightSessionRecord, SessionStatus,
};
use crate::models::reference::{
    Aircraft, FlightSessionFormOptions, Person, SelectOption, Simulator,
};
use crate::models::resource::ListQuery;
use crate::services::persistence::{unwrap_list, BackendCall, PersistenceApi};
use crate::services::recorder::FlightSessionRecorder;
use crate::services::resource_service::{check_segment, search_items};
use crate::services::session_form::SessionForm;
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt::SchoolContext;

const COLLECTION: &str = "/flight-sessions";

pub struct FlightSessionService {
    api: Arc<dyn PersistenceApi>,
    recorder: FlightSessionRecorder,
}

impl FlightSessionService {
    pub fn new(api: Arc<dyn PersistenceApi>, recorder: FlightSessionRecorder) -> Self {
        FlightSessionService {
            api,
            recorder,
        }
    }

    // What the form would show and submit, without touching the backend
    pub fn preview(&self, draft: FlightSessionDraft) -> FlightSessionPreview {
        let form = self.form_for(draft);
        let duration_hours = form.duration_hours();
        let (record, error) = match form.submit(&self.recorder) {
            Ok(record) => (Some(record), None),
            Err(e) => (None, Some(e.to_string())),
        };

        FlightSessionPreview {
            draft: form.into_draft(),
            duration_hours,
            record,
            error,
        }
    }

    pub async fn create(&self, ctx: &SchoolContext, draft: &FlightSessionDraft) -> AppResult<Value> {
        let record = self.prepare(ctx, draft)?;
        tracing::info!(
            school_id = %ctx.school_id,
            user_id = %ctx.user_id,
            session_type = %record.session_type,
            duration_hours = record.duration_hours,
            "creating flight session"
        );

        self.api
            .send(BackendCall::post(COLLECTION, to_body(&record)?).with_token(&ctx.token))
            .await
            .map_err(|e| e.into_app_error("Failed to create flight session"))
    }

    pub async fn update(
        &self,
        ctx: &SchoolContext,
        id: &str,
        draft: &FlightSessionDraft,
    ) -> AppResult<Value> {
        check_segment(id)?;
        let record = self.prepare(ctx, draft)?;
        tracing::info!(school_id = %ctx.school_id, session_id = id, "updating flight session");

        self.api
            .send(BackendCall::put(format!("{}/{}", COLLECTION, id), to_body(&record)?).with_token(&ctx.token))
            .await
            .map_err(|e| e.into_app_error("Failed to update flight session"))
    }

    pub async fn list(&self, ctx: &SchoolContext, query: &ListQuery) -> AppResult<Vec<Value>> {
        // Only statuses a session can actually have are forwarded
        if let Some(status) = query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            SessionStatus::from_str(status)
                .map_err(|_| AppError::BadRequest(format!("Unknown flight session status: {}", status)))?;
        }

        let value = self
            .api
            .send(
                BackendCall::get(COLLECTION)
                    .with_query(query.to_backend_query(&ctx.school_id)?)
                    .with_token(&ctx.token),
            )
            .await
            .map_err(|e| e.into_app_error("Failed to fetch flight sessions"))?;
        let sessions = unwrap_list(value).map_err(|e| e.into_app_error("Failed to fetch flight sessions"))?;

        Ok(match query.search_term() {
            Some(term) => search_items(sessions, term),
            None => sessions,
        })
    }

    pub async fn get(&self, ctx: &SchoolContext, id: &str) -> AppResult<Value> {
        check_segment(id)?;
        self.api
            .send(BackendCall::get(format!("{}/{}", COLLECTION, id)).with_token(&ctx.token))
            .await
            .map_err(|e| e.into_app_error("Failed to fetch flight session"))
    }

    pub async fn delete(&self, ctx: &SchoolContext, id: &str) -> AppResult<Value> {
        check_segment(id)?;
        if !ctx.role.is_staff() {
            return Err(AppError::Forbidden("Only staff can delete flight sessions".into()));
        }
        tracing::info!(school_id = %ctx.school_id, session_id = id, "deleting flight session");

        self.api
            .send(BackendCall::delete(format!("{}/{}", COLLECTION, id)).with_token(&ctx.token))
            .await
            .map_err(|e| e.into_app_error("Failed to delete flight session"))
    }

    pub async fn change_status(
        &self,
        ctx: &SchoolContext,
        id: &str,
        status: SessionStatus,
    ) -> AppResult<Value> {
        check_segment(id)?;
        tracing::info!(school_id = %ctx.school_id, session_id = id, status = %status, "changing flight session status");

        self.api
            .send(
                BackendCall::patch(format!("{}/{}/status", COLLECTION, id), json!({ "status": status }))
                    .with_token(&ctx.token),
            )
            .await
            .map_err(|e| e.into_app_error("Failed to update flight session status"))
    }

    /// Reference data for the form's dropdowns, fetched together.
    pub async fn form_options(&self, ctx: &SchoolContext) -> AppResult<FlightSessionFormOptions> {
        let (students, teachers, aircraft, simulators) = tokio::try_join!(
            self.fetch_references::<Person>(ctx, "/students", "Failed to fetch students"),
            self.fetch_references::<Person>(ctx, "/teachers", "Failed to fetch teachers"),
            self.fetch_references::<Aircraft>(ctx, "/aircrafts", "Failed to fetch aircraft"),
            self.fetch_references::<Simulator>(ctx, "/simulators", "Failed to fetch simulators"),
        )?;

        Ok(FlightSessionFormOptions {
            students: students.iter().map(SelectOption::from).collect(),
            teachers: teachers.iter().map(SelectOption::from).collect(),
            aircraft: aircraft.iter().map(SelectOption::from).collect(),
            simulators: simulators.iter().map(SelectOption::from).collect(),
        })
    }

    fn form_for(&self, draft: FlightSessionDraft) -> SessionForm {
        SessionForm::from_draft(draft, self.recorder.config().max_hours)
    }

    // Submissions go through the same form as previews
    fn prepare(&self, ctx: &SchoolContext, draft: &FlightSessionDraft) -> AppResult<FlightSessionRecord> {
        let mut record = self.form_for(draft.clone()).submit(&self.recorder)?;
        record.school_id = Some(ctx.school_id.clone());
        Ok(record)
    }

    async fn fetch_references<T: DeserializeOwned>(
        &self,
        ctx: &SchoolContext,
        path: &str,
        fallback: &str,
    ) -> AppResult<Vec<T>> {
        let value = self
            .api
            .send(
                BackendCall::get(path)
                    .with_query(vec![("schoolId".to_string(), ctx.school_id.clone())])
                    .with_token(&ctx.token),
            )
            .await
            .map_err(|e| e.into_app_error(fallback))?;

        unwrap_list(value)
            .map_err(|e| e.into_app_error(fallback))?
            .into_iter()
            .map(|item| {
                serde_json::from_value(item).map_err(|e| {
                    tracing::warn!(path, error = %e, "unexpected reference row");
                    AppError::Upstream {
                        status: None,
                        message: fallback.to_string(),
                    }
                })
            })
            .collect()
    }
}

fn to_body(record: &FlightSessionRecord) -> AppResult<Value> {
    serde_json::to_value(record).map_err(|e| AppError::Unprocessable(e.to_string()))
}
