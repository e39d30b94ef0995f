use sea_orm::{ActiveValue, Condition, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    DEFAULT_ROLE, EngineError, Identity, ProfileUpdate, RegisterCmd, ResultEngine, User, password,
    users,
};

use super::{Engine, map_unique_violation, normalize_optional_text, normalize_required_name, with_tx};

const MIN_PASSWORD_LEN: usize = 8;

fn normalize_email(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(EngineError::Validation(format!("invalid email: {trimmed}")));
    }
    Ok(trimmed.to_string())
}

fn validate_password(value: &str) -> ResultEngine<()> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(EngineError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

impl Engine {
    async fn ensure_user_unique<C: ConnectionTrait>(
        db: &C,
        username: &str,
        email: &str,
        exclude: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = users::Entity::find().filter(
            Condition::any()
                .add(users::Column::Username.eq(username))
                .add(users::Column::Email.eq(email)),
        );
        if let Some(id) = exclude {
            query = query.filter(users::Column::Id.ne(id));
        }
        if let Some(existing) = query.one(db).await? {
            let what = if existing.username == username {
                format!("username {username}")
            } else {
                format!("email {email}")
            };
            return Err(EngineError::DuplicateUser(what));
        }
        Ok(())
    }

    /// Create an account. The password is stored as a bcrypt hash.
    pub async fn register(&self, cmd: RegisterCmd) -> ResultEngine<User> {
        let username = normalize_required_name(&cmd.username, "user")?;
        let email = normalize_email(&cmd.email)?;
        validate_password(&cmd.password)?;
        let password_hash = password::hash(&cmd.password, self.bcrypt_cost).await?;

        let model = users::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            username: ActiveValue::Set(username.clone()),
            email: ActiveValue::Set(email.clone()),
            password_hash: ActiveValue::Set(password_hash),
            roles: ActiveValue::Set(DEFAULT_ROLE.to_string()),
            first_name: ActiveValue::Set(normalize_optional_text(cmd.first_name.as_deref())),
            last_name: ActiveValue::Set(normalize_optional_text(cmd.last_name.as_deref())),
            date_of_birth: ActiveValue::Set(None),
            phone_number: ActiveValue::Set(None),
            address: ActiveValue::Set(None),
            profile_picture_url: ActiveValue::Set(None),
        };

        with_tx!(self, |db_tx| {
            Self::ensure_user_unique(&db_tx, &username, &email, None).await?;
            let inserted = model.insert(&db_tx).await.map_err(|err| {
                map_unique_violation(err, || EngineError::DuplicateUser(username.clone()))
            })?;
            tracing::debug!(user_id = %inserted.id, "user registered");
            Ok(User::from(inserted))
        })
    }

    pub async fn current_user(&self, identity: &Identity) -> ResultEngine<User> {
        users::Entity::find_by_id(identity.user_id)
            .one(&self.database)
            .await?
            .map(User::from)
            .ok_or(EngineError::Unauthenticated)
    }

    /// Apply the provided fields to the caller's own profile.
    pub async fn update_profile(
        &self,
        identity: &Identity,
        changes: ProfileUpdate,
    ) -> ResultEngine<User> {
        let username = changes
            .username
            .as_deref()
            .map(|name| normalize_required_name(name, "user"))
            .transpose()?;
        let email = changes.email.as_deref().map(normalize_email).transpose()?;
        let password_hash = match changes.password.as_deref() {
            Some(plain) => {
                validate_password(plain)?;
                Some(password::hash(plain, self.bcrypt_cost).await?)
            }
            None => None,
        };

        with_tx!(self, |db_tx| {
            let current = users::Entity::find_by_id(identity.user_id)
                .one(&db_tx)
                .await?
                .ok_or(EngineError::Unauthenticated)?;

            let next_username = username.clone().unwrap_or_else(|| current.username.clone());
            let next_email = email.clone().unwrap_or_else(|| current.email.clone());
            Self::ensure_user_unique(&db_tx, &next_username, &next_email, Some(current.id))
                .await?;

            let mut active: users::ActiveModel = current.clone().into();
            if let Some(value) = username.clone() {
                active.username = ActiveValue::Set(value);
            }
            if let Some(value) = email.clone() {
                active.email = ActiveValue::Set(value);
            }
            if let Some(value) = password_hash.clone() {
                active.password_hash = ActiveValue::Set(value);
            }
            if let Some(value) = changes.first_name.as_deref() {
                active.first_name = ActiveValue::Set(normalize_optional_text(Some(value)));
            }
            if let Some(value) = changes.last_name.as_deref() {
                active.last_name = ActiveValue::Set(normalize_optional_text(Some(value)));
            }
            if let Some(value) = changes.date_of_birth {
                active.date_of_birth = ActiveValue::Set(Some(value));
            }
            if let Some(value) = changes.phone_number.as_deref() {
                active.phone_number = ActiveValue::Set(normalize_optional_text(Some(value)));
            }
            if let Some(value) = changes.address.as_deref() {
                active.address = ActiveValue::Set(normalize_optional_text(Some(value)));
            }
            if let Some(value) = changes.profile_picture_url.as_deref() {
                active.profile_picture_url =
                    ActiveValue::Set(normalize_optional_text(Some(value)));
            }

            if !active.is_changed() {
                return Ok(User::from(current));
            }
            let updated = active.update(&db_tx).await.map_err(|err| {
                map_unique_violation(err, || EngineError::DuplicateUser(next_username.clone()))
            })?;
            tracing::debug!(user_id = %updated.id, "profile updated");
            Ok(User::from(updated))
        })
    }
}
