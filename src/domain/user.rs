//! User domain entity and related types.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles. Closed set: a role is assigned at registration and
/// never changes afterwards (there is no promotion flow).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User document. Serialized shape matches the `users` collection;
/// never returned to clients directly (see [`UserResponse`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    /// Argon2 hash, stored under the original field name
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub enrolled_courses: Vec<ObjectId>,
    #[serde(default)]
    pub created_courses: Vec<ObjectId>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a freshly generated id
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name,
            email,
            password: password_hash,
            role,
            enrolled_courses: Vec::new(),
            created_courses: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_enrolled_in(&self, course_id: &ObjectId) -> bool {
        self.enrolled_courses.contains(course_id)
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier (hex)
    #[schema(example = "650c5f1a2ab5e7a1dcd3b2f4")]
    pub id: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "student")]
    pub role: Role,
    #[schema(value_type = Vec<String>)]
    pub enrolled_courses: Vec<String>,
    #[schema(value_type = Vec<String>)]
    pub created_courses: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name,
            email: user.email,
            role: user.role,
            enrolled_courses: user.enrolled_courses.iter().map(|id| id.to_hex()).collect(),
            created_courses: user.created_courses.iter().map(|id| id.to_hex()).collect(),
            created_at: user.created_at,
        }
    }
}

/// Name/email projection of an enrolled student (course roster view)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentSummary {
    #[schema(example = "650c5f1a2ab5e7a1dcd3b2f4")]
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for StudentSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Student, Role::Instructor, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn response_never_carries_the_password_hash() {
        let user = User::new(
            "Test".into(),
            "t@example.com".into(),
            "$argon2id$hash".into(),
            Role::Student,
        );
        let response = UserResponse::from(user);
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
    }
}
