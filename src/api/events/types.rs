use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::event::{time_format, Event, EventFields, EventPatch};

/// Body of `POST /api/events` and `PUT /api/events/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct EventRequest {
    #[serde(default)]
    pub day_of_week: i64,
    #[serde(deserialize_with = "time_format::deserialize")]
    pub start_time: NaiveTime,
    #[serde(deserialize_with = "time_format::deserialize")]
    pub finish_time: NaiveTime,
    pub title: String,
    /// Missing or null is stored as empty text
    #[serde(default)]
    pub description: Option<String>,
    /// Read-only; accepted and discarded
    #[serde(default)]
    pub owner: Option<Value>,
}

impl From<EventRequest> for EventFields {
    fn from(request: EventRequest) -> Self {
        Self {
            day_of_week: request.day_of_week,
            start_time: request.start_time,
            finish_time: request.finish_time,
            title: request.title,
            description: request.description.unwrap_or_default(),
        }
    }
}

/// Body of `PATCH /api/events/{id}`; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchEventRequest {
    #[serde(default)]
    pub day_of_week: Option<i64>,
    #[serde(default, deserialize_with = "time_format::option::deserialize")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "time_format::option::deserialize")]
    pub finish_time: Option<NaiveTime>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner: Option<Value>,
}

impl From<PatchEventRequest> for EventPatch {
    fn from(request: PatchEventRequest) -> Self {
        Self {
            day_of_week: request.day_of_week,
            start_time: request.start_time,
            finish_time: request.finish_time,
            title: request.title,
            description: request.description,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub owner: String,
    pub day_of_week: i16,
    #[serde(serialize_with = "time_format::serialize")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "time_format::serialize")]
    pub finish_time: NaiveTime,
    pub title: String,
    pub description: String,
    pub created_ts: String,
    pub modified_ts: String,
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id().to_string(),
            owner: event.owner().to_string(),
            day_of_week: event.day_of_week(),
            start_time: event.start_time(),
            finish_time: event.finish_time(),
            title: event.title().to_string(),
            description: event.description().to_string(),
            created_ts: event.created_ts().to_rfc3339(),
            modified_ts: event.modified_ts().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_request_defaults() {
        let request: EventRequest = serde_json::from_value(json!({
            "start_time": "10:00",
            "finish_time": "10:15",
            "title": "Important task"
        }))
        .unwrap();

        assert_eq!(request.day_of_week, 0);
        assert_eq!(request.start_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(EventFields::from(request).description, "");
    }

    #[test]
    fn test_null_description_becomes_empty() {
        let request: EventRequest = serde_json::from_value(json!({
            "start_time": "10:00",
            "finish_time": "10:15",
            "title": "Important task",
            "description": null
        }))
        .unwrap();

        assert_eq!(EventFields::from(request).description, "");
    }

    #[test]
    fn test_event_request_requires_times() {
        let result: Result<EventRequest, _> = serde_json::from_value(json!({
            "start_time": "10:00",
            "title": "No finish"
        }));
        assert!(result.is_err());

        let result: Result<EventRequest, _> = serde_json::from_value(json!({
            "start_time": "ten",
            "finish_time": "10:15",
            "title": "Bad start"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_request_keeps_absent_fields_empty() {
        let request: PatchEventRequest =
            serde_json::from_value(json!({ "finish_time": "10:30" })).unwrap();
        let patch = EventPatch::from(request);

        assert_eq!(patch.finish_time, NaiveTime::from_hms_opt(10, 30, 0));
        assert!(patch.start_time.is_none());
        assert!(patch.title.is_none());
    }
}
