use super::*;
use sb_core::ID;

/// Persistence seam for member accounts.
///
/// Object-safe so handlers can share one `web::Data<dyn Users>` regardless
/// of the backing store.
#[async_trait::async_trait]
pub trait Users: Send + Sync {
    async fn find(&self, id: ID<Member>) -> Result<Option<Member>, AuthError>;
    /// Exact-match email lookup, returning the stored password hash too.
    async fn lookup(&self, email: &str) -> Result<Option<(Member, String)>, AuthError>;
    /// Fails with [`AuthError::DuplicateEmail`] when the email is taken.
    async fn insert(&self, member: &Member, hashword: &str) -> Result<(), AuthError>;
    async fn update(&self, member: &Member) -> Result<(), AuthError>;
}

#[cfg(feature = "database")]
mod postgres {
    use super::*;
    use sb_core::Unique;
    use sb_pg::*;
    use std::sync::Arc;
    use tokio_postgres::Client;
    use tokio_postgres::Row;
    use tokio_postgres::error::SqlState;

    fn member(row: &Row) -> Member {
        Member::restore(
            ID::from(row.get::<_, uuid::Uuid>(0)),
            row.get::<_, String>(1),
            row.get::<_, bool>(2),
            row.get::<_, bool>(3),
        )
    }

    fn conflict(e: PgErr) -> AuthError {
        match e.code() {
            Some(code) if *code == SqlState::UNIQUE_VIOLATION => AuthError::DuplicateEmail,
            _ => AuthError::Database(e),
        }
    }

    #[async_trait::async_trait]
    impl Users for Arc<Client> {
        async fn find(&self, id: ID<Member>) -> Result<Option<Member>, AuthError> {
            self.query_opt(
                const_format::concatcp!(
                    "SELECT id, email, is_active, is_superuser FROM ",
                    USERS,
                    " WHERE id = $1"
                ),
                &[&id.inner()],
            )
            .await
            .map(|opt| opt.as_ref().map(member))
            .map_err(AuthError::from)
        }

        async fn lookup(&self, email: &str) -> Result<Option<(Member, String)>, AuthError> {
            self.query_opt(
                const_format::concatcp!(
                    "SELECT id, email, is_active, is_superuser, hashword FROM ",
                    USERS,
                    " WHERE email = $1"
                ),
                &[&email],
            )
            .await
            .map(|opt| opt.map(|row| (member(&row), row.get::<_, String>(4))))
            .map_err(AuthError::from)
        }

        async fn insert(&self, member: &Member, hashword: &str) -> Result<(), AuthError> {
            self.execute(
                const_format::concatcp!(
                    "INSERT INTO ",
                    USERS,
                    " (id, email, hashword, is_active, is_superuser) VALUES ($1, $2, $3, $4, $5)"
                ),
                &[
                    &member.id().inner(),
                    &member.email(),
                    &hashword,
                    &member.active(),
                    &member.superuser(),
                ],
            )
            .await
            .map(|_| ())
            .map_err(conflict)
        }

        async fn update(&self, member: &Member) -> Result<(), AuthError> {
            self.execute(
                const_format::concatcp!(
                    "UPDATE ",
                    USERS,
                    " SET email = $2, is_active = $3, is_superuser = $4 WHERE id = $1"
                ),
                &[
                    &member.id().inner(),
                    &member.email(),
                    &member.active(),
                    &member.superuser(),
                ],
            )
            .await
            .map(|_| ())
            .map_err(conflict)
        }
    }
}
