use sb_core::ID;
use sb_core::Unique;

/// Registered account. The password hash is a storage-only column and
/// never travels with this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Member {
    id: ID<Self>,
    email: String,
    active: bool,
    superuser: bool,
}

impl Member {
    pub fn new(id: ID<Self>, email: String) -> Self {
        Self {
            id,
            email,
            active: true,
            superuser: false,
        }
    }
    pub fn restore(id: ID<Self>, email: String, active: bool, superuser: bool) -> Self {
        Self {
            id,
            email,
            active,
            superuser,
        }
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn active(&self) -> bool {
        self.active
    }
    pub fn superuser(&self) -> bool {
        self.superuser
    }
    pub fn deactivate(self) -> Self {
        Self {
            active: false,
            ..self
        }
    }
}

impl Unique for Member {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use sb_pg::*;

    impl Schema for Member {
        fn name() -> &'static str {
            USERS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                USERS,
                " (
                    id           UUID PRIMARY KEY,
                    email        VARCHAR(255) UNIQUE NOT NULL,
                    hashword     TEXT NOT NULL,
                    is_active    BOOLEAN NOT NULL DEFAULT TRUE,
                    is_superuser BOOLEAN NOT NULL DEFAULT FALSE
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_users_email ON ",
                USERS,
                " (email);"
            )
        }
    }
}
