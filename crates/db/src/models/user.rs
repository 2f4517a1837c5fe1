//! Annotator accounts mirrored from Label Studio.

use fishsense_core::normalize::TemporalSchema;
use fishsense_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub label_studio_id: Option<i64>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub last_activity: Option<Timestamp>,
    pub date_joined: Option<Timestamp>,
}

/// DTO for inserting or replacing a user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveUser {
    pub label_studio_id: Option<i64>,
    #[validate(email, length(max = 100))]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    pub last_activity: Option<Timestamp>,
    pub date_joined: Option<Timestamp>,
}

impl TemporalSchema for SaveUser {
    const TEMPORAL_FIELDS: &'static [&'static str] = &["last_activity", "date_joined"];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> SaveUser {
        SaveUser {
            label_studio_id: Some(1),
            email: Some(email.to_string()),
            first_name: None,
            last_name: None,
            last_activity: None,
            date_joined: None,
        }
    }

    #[test]
    fn email_must_be_well_formed() {
        assert!(user("diver@example.org").validate().is_ok());
        assert!(user("not-an-email").validate().is_err());
    }

    #[test]
    fn names_are_capped_at_column_width() {
        let mut input = user("diver@example.org");
        input.first_name = Some("x".repeat(101));
        assert!(input.validate().is_err());
    }
}
