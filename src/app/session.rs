use anyhow::{Context, Result};

use super::{AppContext, SessionOutput};
use crate::session::Session;

pub fn set_session(
    ctx: &AppContext,
    token: &str,
    fullname: Option<&str>,
    user_id: Option<&str>,
) -> Result<SessionOutput> {
    anyhow::ensure!(!token.trim().is_empty(), "Session token must not be empty");
    let mut session = Session::new(token.trim());
    if let Some(name) = fullname {
        session = session.with_fullname(name);
    }
    if let Some(id) = user_id {
        session = session.with_user_id(id);
    }
    ctx.sessions
        .save(&session)
        .with_context(|| format!("Failed to save session to {}", ctx.sessions.path().display()))?;
    tracing::info!(path = %ctx.sessions.path().display(), "Session stored");
    Ok(SessionOutput::from_session(ctx, Some(&session)))
}

pub fn show_session(ctx: &AppContext) -> Result<SessionOutput> {
    let session = ctx.sessions.load()?;
    Ok(SessionOutput::from_session(ctx, session.as_ref()))
}

pub fn clear_session(ctx: &AppContext) -> Result<SessionOutput> {
    ctx.sessions.clear()?;
    Ok(SessionOutput::from_session(ctx, None))
}
