// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub email: String,
    pub display_name: Option<String>,
}

impl SessionUser {
    /// Name stamped on new plants: the display name, or the local part of
    /// the email when no display name is set.
    pub fn owner_name(&self) -> String {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_owned(),
        }
    }
}

pub trait SessionProvider {
    fn current_user(&self) -> Option<SessionUser>;
}

/// Session held in process, filled from configuration or by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalSession {
    user: Option<SessionUser>,
}

impl LocalSession {
    pub fn signed_in(email: &str, display_name: Option<&str>) -> Result<Self> {
        let mut session = Self::default();
        session.sign_in(email, display_name)?;
        Ok(session)
    }

    pub fn sign_in(&mut self, email: &str, display_name: Option<&str>) -> Result<()> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            bail!("session email {email:?} is not an email address -- set [session].email");
        }
        self.user = Some(SessionUser {
            email: email.to_owned(),
            display_name: display_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_owned),
        });
        Ok(())
    }

    pub fn sign_out(&mut self) {
        self.user = None;
    }

    pub fn update_profile(&mut self, display_name: &str) -> Result<()> {
        let Some(user) = self.user.as_mut() else {
            bail!("no user is currently signed in");
        };
        let trimmed = display_name.trim();
        user.display_name = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        Ok(())
    }
}

impl SessionProvider for LocalSession {
    fn current_user(&self) -> Option<SessionUser> {
        self.user.clone()
    }
}
