use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::user::schema::UserEntity;
use crate::utils::double_option;

#[derive(Deserialize, Validate)]
pub struct SignUpModel {
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[validate(length(min = 1, message = "Display name cannot be empty"))]
    pub display_name: String,
    #[validate(length(min = 10, message = "Phone number must be at least 10 digits long"))]
    pub phone: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct SignInModel {
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct UpdateUserModel {
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Display name cannot be empty"))]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
}

impl UpdateUserModel {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.display_name.is_none()
            && self.avatar_url.is_none()
            && self.bio.is_none()
            && self.phone.is_none()
    }
}

#[derive(Deserialize, Validate)]
pub struct SearchUsersQuery {
    #[validate(length(min = 1, message = "Search query cannot be empty"))]
    pub q: String,
}

pub struct InsertUser {
    pub username: String,
    pub email: String,
    pub hash_password: String,
    pub display_name: String,
    pub phone: Option<String>,
}

pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub phone: Option<Option<String>>,
}

#[derive(Serialize)]
pub struct SignUpResponse {
    pub id: uuid::Uuid,
}

#[derive(Serialize)]
pub struct SignInResponse {
    pub access_token: String,
}

/// Profile view returned by the user endpoints. Deliberately excludes the
/// password hash and the relationship sets; the latter are served fresh by
/// the relationship endpoints so they are never cached stale.
#[derive(Deserialize, Serialize)]
pub struct UserResponse {
    pub id: uuid::Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            id: entity.id,
            username: entity.username,
            email: entity.email,
            display_name: entity.display_name,
            avatar_url: entity.avatar_url,
            bio: entity.bio,
            phone: entity.phone,
        }
    }
}
