use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::engine::{FieldValue, Listable};
use crate::utils;

/// Role barred from mutating the volunteers collection.
pub const RESTRICTED_ROLE: &str = "volunteer";

/// A collection record the synchronizer can manage. `Patch` is the partial
/// update shape merged over the current record before a PUT.
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync {
    type Patch;

    /// API path of the collection, e.g. `/volunteers`.
    const ENDPOINT: &'static str;
    /// Whether the restricted role is refused create/update/delete.
    const GUARDED: bool;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    fn merge(&mut self, patch: &Self::Patch);
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl User {
    pub fn is_restricted(&self) -> bool {
        self.role.as_deref() == Some(RESTRICTED_ROLE)
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }
}

/// Wire aliases are resolved here and nowhere else: the registration date
/// arrives as `createdAt`, `date`, or `created_at` depending on the backend
/// revision.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Volunteer {
    #[serde(default)]
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub points: i64,
    #[serde(
        rename = "createdAt",
        alias = "date",
        alias = "created_at",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct VolunteerPatch {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub location: Option<String>,
    pub points: Option<i64>,
}

impl Resource for Volunteer {
    type Patch = VolunteerPatch;

    const ENDPOINT: &'static str = "/volunteers";
    const GUARDED: bool = true;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn merge(&mut self, patch: &VolunteerPatch) {
        if let Some(firstname) = &patch.firstname {
            self.firstname = firstname.clone();
        }
        if let Some(lastname) = &patch.lastname {
            self.lastname = lastname.clone();
        }
        if let Some(username) = &patch.username {
            self.username = username.clone();
        }
        if let Some(password) = &patch.password {
            self.password = Some(password.clone());
        }
        if let Some(location) = &patch.location {
            self.location = Some(location.clone());
        }
        if let Some(points) = patch.points {
            self.points = points;
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VolunteerSort {
    Name,
    Location,
    Points,
    #[default]
    Date,
}

impl VolunteerSort {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "location" => Some(Self::Location),
            "points" => Some(Self::Points),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

impl Listable for Volunteer {
    type SortKey = VolunteerSort;

    fn search_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.firstname,
            self.lastname,
            self.username,
            self.location.as_deref().unwrap_or("")
        )
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn record_date(&self) -> Option<NaiveDateTime> {
        self.created_at
            .as_deref()
            .and_then(utils::parse_wire_date)
    }

    fn sort_field(&self, key: VolunteerSort) -> FieldValue {
        match key {
            VolunteerSort::Name => {
                let name = format!("{} {}", self.lastname, self.firstname);
                FieldValue::Text(name.trim().to_string())
            }
            VolunteerSort::Location => {
                FieldValue::Text(self.location.clone().unwrap_or_default())
            }
            VolunteerSort::Points => FieldValue::Number(self.points),
            VolunteerSort::Date => FieldValue::Date(self.record_date()),
        }
    }
}

/// Collects carry their own alias pair: `item` vs `type`, `location` vs
/// `place`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Collect {
    #[serde(default)]
    pub id: i64,
    #[serde(alias = "type")]
    pub item: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(alias = "place", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Collect {
    /// Quantity after a +/- adjustment; `None` when it would go negative.
    pub fn adjusted_quantity(&self, delta: i64) -> Option<i64> {
        let next = self.quantity + delta;
        if next < 0 {
            None
        } else {
            Some(next)
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CollectPatch {
    pub item: Option<String>,
    pub quantity: Option<i64>,
    pub location: Option<String>,
    pub date: Option<String>,
}

impl Resource for Collect {
    type Patch = CollectPatch;

    const ENDPOINT: &'static str = "/collects";
    const GUARDED: bool = false;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn merge(&mut self, patch: &CollectPatch) {
        if let Some(item) = &patch.item {
            self.item = item.clone();
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(location) = &patch.location {
            self.location = Some(location.clone());
        }
        if let Some(date) = &patch.date {
            self.date = Some(date.clone());
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollectSort {
    Item,
    Location,
    Quantity,
    #[default]
    Date,
}

impl CollectSort {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "item" => Some(Self::Item),
            "location" => Some(Self::Location),
            "quantity" => Some(Self::Quantity),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

impl Listable for Collect {
    type SortKey = CollectSort;

    fn search_text(&self) -> String {
        format!("{} {}", self.item, self.location.as_deref().unwrap_or(""))
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn record_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(utils::parse_wire_date)
    }

    fn sort_field(&self, key: CollectSort) -> FieldValue {
        match key {
            CollectSort::Item => FieldValue::Text(self.item.clone()),
            CollectSort::Location => {
                FieldValue::Text(self.location.clone().unwrap_or_default())
            }
            CollectSort::Quantity => FieldValue::Number(self.quantity),
            CollectSort::Date => FieldValue::Date(self.record_date()),
        }
    }
}
