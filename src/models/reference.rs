use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// The backend hands out either numeric or string ids
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or numeric id, got {}",
            other
        ))),
    }
}

/// Student or teacher as listed by the persistence API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Person {
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.id.clone()
        } else {
            name.to_string()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aircraft {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub registration: String,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulator {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub fstd_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl From<&Person> for SelectOption {
    fn from(person: &Person) -> Self {
        SelectOption {
            label: person.full_name(),
            value: person.id.clone(),
        }
    }
}

impl From<&Aircraft> for SelectOption {
    fn from(aircraft: &Aircraft) -> Self {
        let label = match aircraft.model.as_deref().map(str::trim) {
            Some(model) if !model.is_empty() => format!("{} ({})", aircraft.registration, model),
            _ => aircraft.registration.clone(),
        };
        SelectOption {
            label,
            value: aircraft.id.clone(),
        }
    }
}

impl From<&Simulator> for SelectOption {
    fn from(simulator: &Simulator) -> Self {
        let label = match simulator.fstd_level.as_deref() {
            Some(level) if !level.is_empty() => format!("{} - {}", simulator.name, level),
            _ => simulator.name.clone(),
        };
        SelectOption {
            label,
            value: simulator.id.clone(),
        }
    }
}

// Dropdown contents for the flight session form
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct FlightSessionFormOptions {
    pub students: Vec<SelectOption>,
    pub teachers: Vec<SelectOption>,
    pub aircraft: Vec<SelectOption>,
    pub simulators: Vec<SelectOption>,
}
