//! # Raw lifecycle events.
//!
//! [`Event`] mirrors the object the Docker Engine API streams from
//! `GET /events`. It is received once, wrapped in an `Arc` and passed by
//! reference through interception and fan-out; it is never mutated.
//!
//! ## Wire shape
//! ```text
//! {"status":"start","id":"6100…","from":"nginx",
//!  "Type":"container","Action":"start",
//!  "Actor":{"ID":"6100…","Attributes":{"image":"nginx","name":"web"}},
//!  "scope":"local","time":1700000000,"timeNano":1700000000000000000}
//! ```
//! Field names and order follow the upstream schema so that clients of the
//! facade decode the forwarded objects exactly like native ones. Empty
//! optional fields are omitted.
//!
//! ## Terms
//! - **kind**: `Action` (`"start"`, `"die"`, ...), selects the interceptor.
//! - **target**: `Actor.ID`, the workload the event is about.
//! - **attributes**: `Actor.Attributes`, ordered so log lines are stable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Length of the abbreviated identifiers shown in log lines.
const SHORT_ID_LEN: usize = 12;

/// The object an event is about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Workload (or image, network, ...) identifier.
    #[serde(rename = "ID", alias = "id", default)]
    pub id: String,

    /// Free-form attributes (image, name, labels, exit code, ...).
    #[serde(rename = "Attributes", alias = "attributes", default)]
    pub attributes: BTreeMap<String, String>,
}

/// Raw control plane event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Legacy field: same as `action` for container events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Legacy field: same as `actor.id` for container events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Legacy field: image the container was created from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// Object type (`container`, `image`, `network`, ...).
    #[serde(rename = "Type", alias = "type", default, skip_serializing_if = "String::is_empty")]
    pub typ: String,

    /// What happened (`start`, `stop`, `die`, ...).
    #[serde(rename = "Action", alias = "action", default)]
    pub action: String,

    /// The object the event is about.
    #[serde(rename = "Actor", alias = "actor", default)]
    pub actor: Actor,

    /// `local` or `swarm`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Unix timestamp (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,

    /// Unix timestamp (nanoseconds).
    #[serde(rename = "timeNano", default, skip_serializing_if = "Option::is_none")]
    pub time_nano: Option<i64>,
}

impl Event {
    /// Creates a container event with the given action and target.
    ///
    /// Legacy fields are filled in the same way the Docker daemon does.
    ///
    /// # Example
    /// ```
    /// use bootvisor::Event;
    ///
    /// let ev = Event::container("start", "610036617aa165161127bc0cec60ae78")
    ///     .with_attribute("image", "nginx");
    ///
    /// assert_eq!(ev.kind(), "start");
    /// assert_eq!(ev.short_id(), "610036617aa1");
    /// assert_eq!(ev.from.as_deref(), Some("nginx"));
    /// ```
    pub fn container(action: impl Into<String>, id: impl Into<String>) -> Self {
        let action = action.into();
        let id = id.into();
        Self {
            status: Some(action.clone()),
            id: Some(id.clone()),
            typ: "container".to_string(),
            action,
            actor: Actor {
                id,
                attributes: BTreeMap::new(),
            },
            ..Self::default()
        }
    }

    /// Adds an actor attribute. `image` also sets the legacy `from` field.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if key == "image" && self.typ == "container" {
            self.from = Some(value.clone());
        }
        self.actor.attributes.insert(key, value);
        self
    }

    /// Event kind used for interceptor lookup.
    #[inline]
    pub fn kind(&self) -> &str {
        &self.action
    }

    /// Identifier of the workload the event is about.
    #[inline]
    pub fn target(&self) -> &str {
        &self.actor.id
    }

    #[inline]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.actor.attributes
    }

    /// Abbreviated target identifier for log lines.
    pub fn short_id(&self) -> &str {
        short_id(&self.actor.id)
    }
}

/// First characters of an identifier, as shown by the Docker CLI.
pub(crate) fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}
