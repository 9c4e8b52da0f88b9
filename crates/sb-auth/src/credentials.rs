//! Email/password verification and account creation over any [`Users`] store.
use super::*;
use sb_core::ID;
use sb_core::Unique;

/// Returns the member only when the email exists and the password matches.
/// Both failure modes yield `None` after the same Argon2 work.
pub async fn verify(users: &dyn Users, email: &str, password: &str) -> Result<Option<Member>, AuthError> {
    match users.lookup(email).await? {
        Some((member, hashword)) => Ok(password::verify(password, &hashword).then_some(member)),
        None => {
            password::verify(password, password::decoy());
            Ok(None)
        }
    }
}

pub async fn create(users: &dyn Users, email: &str, password: &str) -> Result<Member, AuthError> {
    validate(email, password)?;
    if users.lookup(email).await?.is_some() {
        return Err(AuthError::DuplicateEmail);
    }
    let hashword = password::hash(password)?;
    let member = Member::new(ID::default(), email.to_string());
    users.insert(&member, &hashword).await?;
    log::info!("registered member {}", member.id());
    Ok(member)
}

fn validate(email: &str, password: &str) -> Result<(), AuthError> {
    let wellformed = !email.chars().any(char::is_whitespace)
        && email
            .split_once('@')
            .filter(|(local, domain)| !local.is_empty() && !domain.contains('@'))
            .is_some_and(|(_, domain)| {
                domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
            });
    if !wellformed {
        return Err(AuthError::Invalid("invalid email address"));
    }
    if password.is_empty() {
        return Err(AuthError::Invalid("password must not be empty"));
    }
    Ok(())
}
