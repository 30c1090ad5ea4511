use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{
    api::error,
    modules::relationship::{
        model::PeerProfile,
        repository::RelationshipRepository,
        schema::AccountRecord,
    },
    modules::user::schema::UserEntity,
};

#[derive(Clone)]
pub struct RelationshipRepositoryPg {
    pool: sqlx::PgPool,
}

impl RelationshipRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_account(
        &self,
        id: &Uuid,
    ) -> Result<Option<AccountRecord>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>(
            "SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user.map(AccountRecord::from))
    }
}

/// Binds one side's new sets conditioned on its revision being unchanged.
/// Returns false when the row was modified since it was loaded.
async fn write_guarded(
    tx: &mut sqlx::PgConnection,
    record: &AccountRecord,
) -> Result<bool, error::SystemError> {
    let to_vec = |set: &BTreeSet<Uuid>| set.iter().copied().collect::<Vec<_>>();

    let rows = sqlx::query(
        r#"
        UPDATE users
        SET
            friends           = $2,
            outgoing_requests = $3,
            incoming_requests = $4,
            relationship_rev  = relationship_rev + 1,
            updated_at        = NOW()
        WHERE id = $1 AND relationship_rev = $5 AND deleted_at IS NULL
        "#,
    )
    .bind(record.id)
    .bind(to_vec(&record.sets.friends))
    .bind(to_vec(&record.sets.outgoing_requests))
    .bind(to_vec(&record.sets.incoming_requests))
    .bind(record.rev)
    .execute(tx)
    .await?
    .rows_affected();

    Ok(rows == 1)
}

#[async_trait::async_trait]
impl RelationshipRepository for RelationshipRepositoryPg {
    async fn load_pair(
        &self,
        user_id: &Uuid,
        peer_id: &Uuid,
    ) -> Result<(AccountRecord, AccountRecord), error::SystemError> {
        let (user, peer) = tokio::try_join!(
            self.fetch_account(user_id),
            self.fetch_account(peer_id),
        )?;

        match (user, peer) {
            (Some(user), Some(peer)) => Ok((user, peer)),
            _ => Err(error::SystemError::not_found("User not found")),
        }
    }

    async fn save_pair(
        &self,
        user: &AccountRecord,
        peer: &AccountRecord,
    ) -> Result<(), error::SystemError> {
        let mut tx = self.pool.begin().await?;

        // Rows are written in id order so two racing pair-writes cannot
        // deadlock each other.
        let (first, second) = if user.id <= peer.id { (user, peer) } else { (peer, user) };

        if !write_guarded(tx.as_mut(), first).await? {
            return Err(error::SystemError::StaleRevision);
        }
        if !write_guarded(tx.as_mut(), second).await? {
            return Err(error::SystemError::StaleRevision);
        }

        tx.commit().await?;
        Ok(())
    }

    async fn load(&self, id: &Uuid) -> Result<AccountRecord, error::SystemError> {
        self.fetch_account(id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))
    }

    async fn profiles(
        &self,
        ids: &BTreeSet<Uuid>,
    ) -> Result<Vec<PeerProfile>, error::SystemError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = ids.iter().copied().collect::<Vec<_>>();
        let profiles = sqlx::query_as::<_, PeerProfile>(
            r#"
            SELECT id, username, display_name, avatar_url
            FROM users
            WHERE id = ANY($1) AND deleted_at IS NULL
            ORDER BY display_name
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }
}
