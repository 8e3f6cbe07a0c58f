use std::{
    fmt::{Display, Formatter},
    ops::Deref,
    str::FromStr,
};

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use rocket::{
    http::{
        impl_from_uri_param_identity,
        uri::fmt::{Formatter as UriFormatter, Path, UriDisplay},
    },
    request::FromParam,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An opaque identifier for surveys, questions, options and responses.
///
/// Identifiers are stored as plain strings so that the database and the JSON
/// API share one representation. Fresh identifiers are the hex form of a
/// new `ObjectId`, but any non-empty string is accepted from clients.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("identifier must not be empty")]
pub struct EmptyIdError;

impl Id {
    /// Generate a new unique ID.
    pub fn new() -> Self {
        Self(ObjectId::new().to_hex())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A filter document matching this ID.
    pub fn as_doc(&self) -> Document {
        doc! { "_id": self.as_str() }
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Id {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Id {
    type Err = EmptyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Err(EmptyIdError)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<Id> for Bson {
    fn from(id: Id) -> Self {
        Bson::String(id.0)
    }
}

impl<'a> FromParam<'a> for Id {
    type Error = EmptyIdError;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        param.parse::<Id>()
    }
}

impl UriDisplay<Path> for Id {
    fn fmt(&self, formatter: &mut UriFormatter<'_, Path>) -> std::fmt::Result {
        formatter.write_value(self.as_str())
    }
}

impl_from_uri_param_identity!([Path] Id);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_unique_hex() {
        let a = Id::new();
        let b = Id::new();
        assert_ne!(a, b);
        assert_eq!(a.len(), 24);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert_eq!("".parse::<Id>(), Err(EmptyIdError));
        assert_eq!("   ".parse::<Id>(), Err(EmptyIdError));
        assert_eq!(" abc ".parse::<Id>().unwrap().as_str(), "abc");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = Id::from("q1");
        let json = rocket::serde::json::serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"q1\"");
        assert_eq!(id.as_doc(), doc! { "_id": "q1" });
    }

    #[test]
    fn ids_are_bson_strings_by_value_and_reference() {
        let id = Id::from("s1");
        assert_eq!(doc! { "surveyId": &id }, doc! { "surveyId": "s1" });
        assert_eq!(Bson::from(&id), Bson::String("s1".to_string()));
        assert_eq!(Bson::from(id), Bson::String("s1".to_string()));
    }
}
