use super::*;
use sb_core::ID;
use sb_core::Unique;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-process [`Users`] store for tests and local runs without PostgreSQL.
#[derive(Debug, Default)]
pub struct MemoryUsers {
    rows: RwLock<BTreeMap<ID<Member>, (Member, String)>>,
}

impl MemoryUsers {
    /// Drops an account outright, as an administrator deleting it would.
    pub fn remove(&self, id: ID<Member>) -> Option<Member> {
        self.rows
            .write()
            .expect("users lock")
            .remove(&id)
            .map(|(member, _)| member)
    }
}

#[async_trait::async_trait]
impl Users for MemoryUsers {
    async fn find(&self, id: ID<Member>) -> Result<Option<Member>, AuthError> {
        Ok(self
            .rows
            .read()
            .expect("users lock")
            .get(&id)
            .map(|(member, _)| member.clone()))
    }

    async fn lookup(&self, email: &str) -> Result<Option<(Member, String)>, AuthError> {
        Ok(self
            .rows
            .read()
            .expect("users lock")
            .values()
            .find(|(member, _)| member.email() == email)
            .cloned())
    }

    async fn insert(&self, member: &Member, hashword: &str) -> Result<(), AuthError> {
        let mut rows = self.rows.write().expect("users lock");
        if rows.values().any(|(m, _)| m.email() == member.email()) {
            return Err(AuthError::DuplicateEmail);
        }
        rows.insert(member.id(), (member.clone(), hashword.to_string()));
        Ok(())
    }

    async fn update(&self, member: &Member) -> Result<(), AuthError> {
        let mut rows = self.rows.write().expect("users lock");
        if rows
            .values()
            .any(|(m, _)| m.email() == member.email() && m.id() != member.id())
        {
            return Err(AuthError::DuplicateEmail);
        }
        if let Some(row) = rows.get_mut(&member.id()) {
            row.0 = member.clone();
        }
        Ok(())
    }
}
