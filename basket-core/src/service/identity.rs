//! Account registration, login and account management

use super::load_user;
use crate::crypto::{hash_password, verify_password};
use crate::domain::{
    normalize_email, AdminUpdateUserInput, ChangePasswordInput, LoginInput, NewUser,
    RegisterInput, Role, StringUuid, UpdateProfileInput, User, UserSummary,
};
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::repository::UserRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const DUPLICATE_EMAIL: &str = "User with this email already exists";

/// Issued session plus the public account view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    pub token: String,
    pub user: UserSummary,
}

pub struct IdentityService<U: UserRepository> {
    repo: Arc<U>,
    jwt_manager: JwtManager,
}

impl<U: UserRepository> IdentityService<U> {
    pub fn new(repo: Arc<U>, jwt_manager: JwtManager) -> Self {
        Self { repo, jwt_manager }
    }

    /// Create a `user` account. A requested role is validated but never honored here;
    /// admins are seeded or promoted by another admin.
    pub async fn register(&self, input: RegisterInput) -> Result<UserSummary> {
        let input = input.normalized();
        input.validate()?;

        if self.repo.find_by_email(&input.email).await?.is_some() {
            metrics::counter!("basket_auth_register_total", "result" => "duplicate").increment(1);
            return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .repo
            .create(&NewUser {
                name: input.name,
                email: input.email,
                password_hash,
                role: Role::User,
            })
            .await
            .inspect_err(|e| {
                if matches!(e, AppError::Conflict(_)) {
                    metrics::counter!("basket_auth_register_total", "result" => "duplicate")
                        .increment(1);
                }
            })?;

        metrics::counter!("basket_auth_register_total", "result" => "success").increment(1);
        info!(user_id = %user.id, "Registered new account");
        Ok(UserSummary::from(&user))
    }

    pub async fn login(&self, input: LoginInput) -> Result<LoginResult> {
        input.validate()?;
        let email = normalize_email(&input.email);

        let Some(found) = self.repo.find_by_email_with_credential(&email).await? else {
            metrics::counter!("basket_auth_login_total", "result" => "unknown_email").increment(1);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&input.password, &found.password_hash)? {
            metrics::counter!("basket_auth_login_total", "result" => "bad_password").increment(1);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self
            .jwt_manager
            .issue_session_token(found.user.id, found.user.role)?;
        metrics::counter!("basket_auth_login_total", "result" => "success").increment(1);

        Ok(LoginResult {
            token,
            user: UserSummary::from(&found.user),
        })
    }

    /// Resolve an identity by id; `None` when it no longer exists
    pub async fn find(&self, id: StringUuid) -> Result<Option<User>> {
        self.repo.find_by_id(id).await
    }

    pub async fn get(&self, id: StringUuid) -> Result<User> {
        load_user(self.repo.as_ref(), id).await
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.repo.list().await
    }

    pub async fn update_profile(&self, id: StringUuid, input: UpdateProfileInput) -> Result<User> {
        let input = input.normalized();
        input.validate()?;
        let mut user = self.get(id).await?;

        if let Some(email) = input.email {
            self.change_email(&mut user, &email).await?;
        }
        if let Some(name) = input.name {
            user.name = name;
        }

        self.repo.save(&user).await
    }

    pub async fn change_password(&self, id: StringUuid, input: ChangePasswordInput) -> Result<()> {
        input.validate()?;

        let current_hash = self
            .repo
            .find_credential_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !verify_password(&input.current_password, &current_hash)? {
            return Err(AppError::BadRequest(
                "Current password is incorrect".to_string(),
            ));
        }

        let new_hash = hash_password(&input.new_password)?;
        self.repo.update_credential(id, &new_hash).await?;
        info!(user_id = %id, "Password changed");
        Ok(())
    }

    pub async fn admin_update(&self, id: StringUuid, input: AdminUpdateUserInput) -> Result<User> {
        let input = input.normalized();
        input.validate()?;
        let mut user = self.get(id).await?;

        if let Some(email) = input.email {
            self.change_email(&mut user, &email).await?;
        }
        if let Some(name) = input.name {
            user.name = name;
        }
        if let Some(role) = input.role {
            if role != user.role {
                info!(user_id = %id, role = %role, "Changing account role");
            }
            user.role = role;
        }

        self.repo.save(&user).await
    }

    pub async fn delete(&self, id: StringUuid) -> Result<()> {
        self.repo.delete(id).await?;
        info!(user_id = %id, "Deleted account");
        Ok(())
    }

    async fn change_email(&self, user: &mut User, email: &str) -> Result<()> {
        let email = normalize_email(email);
        if email == user.email {
            return Ok(());
        }
        if let Some(other) = self.repo.find_by_email(&email).await? {
            if other.id != user.id {
                return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
            }
        }
        user.email = email;
        Ok(())
    }
}
