use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Manager,
    Teacher,
    Student,
}

impl UserRole {
    pub fn is_teacher_or_student(self) -> bool {
        matches!(self, UserRole::Teacher | UserRole::Student)
    }

    /// Staff may manage the fleet, rosters and payments.
    pub fn is_staff(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Manager)
    }
}
