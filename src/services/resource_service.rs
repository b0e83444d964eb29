use std::sync::Arc;

use serde_json::Value;

use crate::models::resource::{ListQuery, Resource};
use crate::services::persistence::{unwrap_list, BackendCall, PersistenceApi};
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt::SchoolContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
    Delete,
}

/// Pass-through CRUD for the collections that need no reshaping.
pub struct ResourceService {
    api: Arc<dyn PersistenceApi>,
}

impl ResourceService {
    pub fn new(api: Arc<dyn PersistenceApi>) -> Self {
        ResourceService { api }
    }

    pub async fn list(
        &self,
        ctx: &SchoolContext,
        resource: Resource,
        query: &ListQuery,
    ) -> AppResult<Vec<Value>> {
        authorize(ctx, resource, Access::Read)?;
        let fallback = format!("Failed to fetch {}", resource);

        let value = self
            .api
            .send(
                BackendCall::get(resource.collection_path())
                    .with_query(query.to_backend_query(&ctx.school_id)?)
                    .with_token(&ctx.token),
            )
            .await
            .map_err(|e| e.into_app_error(&fallback))?;
        let items = unwrap_list(value).map_err(|e| e.into_app_error(&fallback))?;

        Ok(match query.search_term() {
            Some(term) => search_items(items, term),
            None => items,
        })
    }

    pub async fn get(&self, ctx: &SchoolContext, resource: Resource, id: &str) -> AppResult<Value> {
        authorize(ctx, resource, Access::Read)?;
        check_segment(id)?;

        self.api
            .send(BackendCall::get(item_path(resource, id)).with_token(&ctx.token))
            .await
            .map_err(|e| e.into_app_error(&format!("Failed to fetch {}", resource.noun())))
    }

    pub async fn create(&self, ctx: &SchoolContext, resource: Resource, body: Value) -> AppResult<Value> {
        authorize(ctx, resource, Access::Write)?;
        let body = with_school_id(body, &ctx.school_id)?;
        tracing::info!(school_id = %ctx.school_id, resource = %resource, "creating record");

        self.api
            .send(BackendCall::post(resource.collection_path(), body).with_token(&ctx.token))
            .await
            .map_err(|e| e.into_app_error(&format!("Failed to create {}", resource.noun())))
    }

    pub async fn update(
        &self,
        ctx: &SchoolContext,
        resource: Resource,
        id: &str,
        body: Value,
    ) -> AppResult<Value> {
        authorize(ctx, resource, Access::Write)?;
        check_segment(id)?;
        require_object(&body)?;
        tracing::info!(school_id = %ctx.school_id, resource = %resource, id, "updating record");

        self.api
            .send(BackendCall::put(item_path(resource, id), body).with_token(&ctx.token))
            .await
            .map_err(|e| e.into_app_error(&format!("Failed to update {}", resource.noun())))
    }

    pub async fn delete(&self, ctx: &SchoolContext, resource: Resource, id: &str) -> AppResult<Value> {
        authorize(ctx, resource, Access::Delete)?;
        check_segment(id)?;
        tracing::info!(school_id = %ctx.school_id, resource = %resource, id, "deleting record");

        self.api
            .send(BackendCall::delete(item_path(resource, id)).with_token(&ctx.token))
            .await
            .map_err(|e| e.into_app_error(&format!("Failed to delete {}", resource.noun())))
    }

    /// `PATCH <collection>/:id/<subresource>`, e.g. closing a snag.
    pub async fn patch_subresource(
        &self,
        ctx: &SchoolContext,
        resource: Resource,
        id: &str,
        subresource: &str,
        body: Value,
    ) -> AppResult<Value> {
        authorize(ctx, resource, Access::Write)?;
        check_segment(id)?;
        check_segment(subresource)?;
        tracing::info!(school_id = %ctx.school_id, resource = %resource, id, subresource, "patching record");

        self.api
            .send(
                BackendCall::patch(format!("{}/{}", item_path(resource, id), subresource), body)
                    .with_token(&ctx.token),
            )
            .await
            .map_err(|e| e.into_app_error(&format!("Failed to update {}", resource.noun())))
    }
}

pub fn authorize(ctx: &SchoolContext, resource: Resource, access: Access) -> AppResult<()> {
    let restricted = ctx.role.is_teacher_or_student();
    match access {
        Access::Read => Ok(()),
        Access::Delete if restricted => Err(AppError::Forbidden(format!(
            "{} users cannot delete {}",
            ctx.role, resource
        ))),
        Access::Write if restricted && resource.is_administrative() => Err(AppError::Forbidden(
            format!("{} users cannot modify {}", ctx.role, resource),
        )),
        Access::Write | Access::Delete => Ok(()),
    }
}

/// Ids and sub-resource names end up in backend URLs verbatim.
pub fn check_segment(segment: &str) -> AppResult<()> {
    let valid = !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid path segment: {:?}", segment)))
    }
}

fn item_path(resource: Resource, id: &str) -> String {
    format!("{}/{}", resource.collection_path(), id)
}

fn require_object(body: &Value) -> AppResult<()> {
    if body.is_object() {
        Ok(())
    } else {
        Err(AppError::BadRequest("Request body must be a JSON object".into()))
    }
}

// Records created through the gateway always belong to the caller's school
fn with_school_id(mut body: Value, school_id: &str) -> AppResult<Value> {
    require_object(&body)?;
    if let Some(map) = body.as_object_mut() {
        map.entry("schoolId")
            .or_insert_with(|| Value::String(school_id.to_string()));
    }
    Ok(body)
}

/// Keeps rows where any top-level text or number contains `term`,
/// ignoring case.
pub fn search_items(items: Vec<Value>, term: &str) -> Vec<Value> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }

    items
        .into_iter()
        .filter(|item| match item {
            Value::Object(map) => map.values().any(|v| field_matches(v, &needle)),
            other => field_matches(other, &needle),
        })
        .collect()
}

fn field_matches(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(text) => text.to_lowercase().contains(needle),
        Value::Number(number) => number.to_string().contains(needle),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use serde_json::json;

    fn ctx(role: UserRole) -> SchoolContext {
        SchoolContext {
            user_id: "u-1".into(),
            school_id: "school-1".into(),
            role,
            token: "token".into(),
        }
    }

    #[test]
    fn trainees_cannot_delete_or_touch_the_fleet() {
        for role in [UserRole::Teacher, UserRole::Student] {
            assert!(authorize(&ctx(role), Resource::Snags, Access::Read).is_ok());
            assert!(authorize(&ctx(role), Resource::Snags, Access::Write).is_ok());
            assert!(matches!(
                authorize(&ctx(role), Resource::Snags, Access::Delete),
                Err(AppError::Forbidden(_))
            ));
            assert!(matches!(
                authorize(&ctx(role), Resource::Aircrafts, Access::Write),
                Err(AppError::Forbidden(_))
            ));
        }
    }

    #[test]
    fn staff_may_do_everything() {
        for role in [UserRole::Admin, UserRole::Manager] {
            for access in [Access::Read, Access::Write, Access::Delete] {
                assert!(authorize(&ctx(role), Resource::Payments, access).is_ok());
            }
        }
    }

    #[test]
    fn path_segments_are_restricted() {
        assert!(check_segment("abc-123_X").is_ok());
        assert!(check_segment("").is_err());
        assert!(check_segment("..").is_err());
        assert!(check_segment("1?admin=true").is_err());
    }

    #[test]
    fn school_id_is_added_only_when_absent() {
        let body = with_school_id(json!({ "title": "oil leak" }), "school-1").unwrap();
        assert_eq!(body, json!({ "title": "oil leak", "schoolId": "school-1" }));

        let body = with_school_id(json!({ "schoolId": "other" }), "school-1").unwrap();
        assert_eq!(body["schoolId"], "other");

        assert!(with_school_id(json!([1]), "school-1").is_err());
    }

    #[test]
    fn search_matches_text_and_numbers_case_insensitively() {
        let items = vec![
            json!({ "registration": "C-GABC", "model": "Cessna 172" }),
            json!({ "registration": "C-FXYZ", "model": "Piper PA-28", "seats": 4 }),
            json!({ "registration": "C-GDEF", "model": "Diamond DA40", "year": 2017 }),
        ];

        let hits = search_items(items.clone(), "cessna");
        assert_eq!(hits, vec![items[0].clone()]);

        let hits = search_items(items.clone(), "2017");
        assert_eq!(hits, vec![items[2].clone()]);

        assert_eq!(search_items(items.clone(), "  ").len(), 3);
        assert!(search_items(items, "boeing").is_empty());
    }
}
