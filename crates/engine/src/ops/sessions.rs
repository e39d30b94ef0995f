use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, Identity, ResultEngine, Session, User, password, sessions, users, util};

use super::{Engine, with_tx};

impl Engine {
    /// Resolve the caller behind a bearer token.
    ///
    /// Unknown and expired tokens, and tokens whose user is gone, are all
    /// `Unauthenticated`.
    pub async fn resolve_identity(&self, token: &str) -> ResultEngine<Identity> {
        let token = token.trim();
        if token.is_empty() {
            return Err(EngineError::Unauthenticated);
        }

        let (session, user) = sessions::Entity::find_by_id(token.to_string())
            .find_also_related(users::Entity)
            .one(&self.database)
            .await?
            .ok_or(EngineError::Unauthenticated)?;
        if session.expires_at <= Utc::now() {
            return Err(EngineError::Unauthenticated);
        }
        let user = user.ok_or(EngineError::Unauthenticated)?;

        Ok(Identity {
            user_id: user.id,
            username: user.username,
        })
    }

    /// Verify credentials and issue a new session token.
    ///
    /// The password is checked before any transaction is opened. Unknown
    /// usernames are verified against a stand-in hash so both failures cost
    /// the same.
    pub async fn login(&self, username: &str, password: &str) -> ResultEngine<Session> {
        let username = username.trim();
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.database)
            .await?;
        let stored_hash = user
            .as_ref()
            .map_or(self.dummy_hash.as_str(), |user| user.password_hash.as_str());
        let verified = password::verify(password, stored_hash).await?;
        let Some(user) = user.filter(|_| verified) else {
            return Err(EngineError::Unauthenticated);
        };

        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.session_ttl).ok_or_else(|| {
            EngineError::InvariantViolation("session expiry out of range".to_string())
        })?;
        let token = util::new_session_token();

        with_tx!(self, |db_tx| {
            sessions::Entity::delete_many()
                .filter(sessions::Column::UserId.eq(user.id))
                .filter(sessions::Column::ExpiresAt.lte(now))
                .exec(&db_tx)
                .await?;

            sessions::ActiveModel {
                token: ActiveValue::Set(token.clone()),
                user_id: ActiveValue::Set(user.id),
                created_at: ActiveValue::Set(now),
                expires_at: ActiveValue::Set(expires_at),
            }
            .insert(&db_tx)
            .await?;

            tracing::debug!(user_id = %user.id, "session issued");
            Ok(Session {
                token,
                expires_at,
                user: User::from(user),
            })
        })
    }

    /// Drop a session. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> ResultEngine<()> {
        sessions::Entity::delete_by_id(token.trim().to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }
}
