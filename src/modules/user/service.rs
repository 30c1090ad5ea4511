use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::ENV;
use crate::api::error;
use crate::configs::RedisCache;

use crate::modules::user::model::{
    SignInModel, SignUpModel, UpdateUser, UpdateUserModel, UserResponse,
};
use crate::modules::user::{model::InsertUser, repository::UserRepository};
use crate::utils::{Claims, TypeClaims, hash_password, verify_password};

const SEARCH_LIMIT: i32 = 20;
const PROFILE_CACHE_SECS: usize = 3600;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    cache: Arc<RedisCache>,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        cache: Arc<RedisCache>,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, cache }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserResponse, error::SystemError> {
        let key = format!("user:{}", id);
        if let Some(cached_user) = self.cache.get::<UserResponse>(&key).await? {
            info!("User {} found in cache", id);
            return Ok(cached_user);
        }
        let user_entity = self.repo.find_by_id(&id).await?;
        if let Some(entity) = user_entity {
            self.cache.set(&key, &UserResponse::from(entity.clone()), PROFILE_CACHE_SECS).await?;
            info!("User {} cached", id);
            Ok(UserResponse::from(entity))
        } else {
            Err(error::SystemError::not_found("User not found"))
        }
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        user: UpdateUserModel,
    ) -> Result<(), error::SystemError> {
        if user.is_empty() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        let update_user = UpdateUser {
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            bio: user.bio,
            phone: user.phone,
        };

        self.repo.update(&id, &update_user).await?;

        let key = format!("user:{}", id);
        self.cache.delete(&key).await?;
        Ok(())
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), error::SystemError> {
        let deleted = self.repo.delete(&id).await?;
        if !deleted {
            return Err(error::SystemError::not_found("User not found"));
        }

        let key = format!("user:{}", id);
        self.cache.delete(&key).await?;
        Ok(())
    }

    pub async fn search(&self, query: &str) -> Result<Vec<UserResponse>, error::SystemError> {
        let users = self.repo.search_users(query, SEARCH_LIMIT).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn sign_up(&self, user: SignUpModel) -> Result<uuid::Uuid, error::SystemError> {
        let hash_password = hash_password(&user.password)?;

        let new_user = InsertUser {
            username: user.username,
            email: user.email,
            hash_password,
            display_name: user.display_name,
            phone: user.phone,
        };

        let user_id = self.repo.create(&new_user).await?;
        Ok(user_id)
    }

    pub async fn sign_in(&self, user: SignInModel) -> Result<(String, String), error::SystemError> {
        let user_entity = self
            .repo
            .find_by_username(&user.username)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("Invalid username or password"))?;

        let valid = verify_password(&user_entity.hash_password, &user.password)?;
        if !valid {
            return Err(error::SystemError::unauthorized("Invalid username or password"));
        }

        self.issue_tokens(&user_entity.id).await
    }

    pub async fn sign_out(&self, refresh_token: Option<String>) -> Result<(), error::SystemError> {
        // Best-effort: an absent or expired cookie still signs out.
        let Some(token) = refresh_token else {
            return Ok(());
        };
        let Ok(claims) = Claims::decode(&token, ENV.jwt_secret.as_ref()) else {
            return Ok(());
        };
        if let Some(jti) = claims.jti {
            self.cache.delete(&format!("refresh_token:{jti}")).await?;
        }
        Ok(())
    }

    pub async fn refresh(
        &self,
        refresh_token: Option<String>,
    ) -> Result<(String, String), error::SystemError> {
        let token = refresh_token
            .ok_or_else(|| error::SystemError::unauthorized("Missing refresh token"))?;
        let claims = Claims::decode(&token, ENV.jwt_secret.as_ref())
            .map_err(|_| error::SystemError::unauthorized("Token Invalid or Expired"))?;

        if claims._type != Some(TypeClaims::RefreshToken) {
            return Err(error::SystemError::unauthorized("Token Invalid or Expired"));
        }
        let jti = claims
            .jti
            .ok_or_else(|| error::SystemError::unauthorized("Token Invalid or Expired"))?;

        let refresh_key = format!("refresh_token:{jti}");
        let known: Option<Uuid> = self.cache.get(&refresh_key).await?;
        if known != Some(claims.sub) {
            return Err(error::SystemError::unauthorized("Token Invalid or Expired"));
        }

        // Rotation: the presented token is spent before a new pair is issued.
        self.cache.delete(&refresh_key).await?;
        self.issue_tokens(&claims.sub).await
    }

    async fn issue_tokens(&self, user_id: &Uuid) -> Result<(String, String), error::SystemError> {
        let access_token = Claims::new(user_id, ENV.access_token_expiration)
            .with_type(TypeClaims::AccessToken)
            .encode(ENV.jwt_secret.as_ref())?;

        let jti = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));

        let refresh_token = Claims::new(user_id, ENV.refresh_token_expiration)
            .with_jti(jti)
            .with_type(TypeClaims::RefreshToken)
            .encode(ENV.jwt_secret.as_ref())?;

        let refresh_key = format!("refresh_token:{jti}");
        self.cache.set(&refresh_key, user_id, ENV.refresh_token_expiration as usize).await?;

        Ok((access_token, refresh_token))
    }
}
