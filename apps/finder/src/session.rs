//! Line-driven search page.
//!
//! A plain line replaces the query text, as if the user had edited the search
//! box. Lines starting with `:` are filter, account and session commands.
//! Every state change published by the pipeline is rendered to `output`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::account::{AuthContext, Credentials, ProfileClient, SignupForm};
use crate::errors::AppError;
use crate::models::user::{ProfileUpdate, User};
use crate::search::{self, RoleFilter};
use crate::state::AppState;

const HELP: &str = "commands: :verified, :role <All|Developer|Designer|...>, :dismiss, \
:login <email> <password>, :signup <email> <password> <confirm>, :me, \
:skill +<name>|-<name>, :save, :upload <path> <description>, :quit";

const NOT_SIGNED_IN: &str =
    "Not signed in. Use :login or :signup, or set TRACE_TOKEN or TRACE_EMAIL and TRACE_PASSWORD.";

#[derive(Debug, Clone, PartialEq)]
pub enum SkillEdit {
    Add(String),
    Remove(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Query(String),
    ToggleVerified,
    Role(RoleFilter),
    Dismiss,
    Login(Credentials),
    Signup(SignupForm),
    Me,
    Skill(SkillEdit),
    Save,
    Upload { path: String, description: String },
    Quit,
    /// A known command with missing arguments; carries its usage line.
    Usage(&'static str),
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let Some(rest) = line.strip_prefix(':') else {
            return Command::Query(line.to_string());
        };
        let (name, arg) = rest.split_once(' ').unwrap_or((rest, ""));
        let words: Vec<&str> = arg.split_whitespace().collect();
        match name.trim() {
            "verified" | "v" => Command::ToggleVerified,
            "role" | "r" => Command::Role(RoleFilter::parse(arg)),
            "dismiss" => Command::Dismiss,
            "login" => match words[..] {
                [email, password] => Command::Login(Credentials {
                    email: email.to_string(),
                    password: password.to_string(),
                }),
                _ => Command::Usage(":login <email> <password>"),
            },
            "signup" => match words[..] {
                [email, password, confirm] => Command::Signup(SignupForm {
                    email: email.to_string(),
                    password: password.to_string(),
                    confirm_password: confirm.to_string(),
                }),
                _ => Command::Usage(":signup <email> <password> <confirm>"),
            },
            "me" => Command::Me,
            "skill" => {
                let arg = arg.trim();
                if let Some(skill) = arg.strip_prefix('+') {
                    Command::Skill(SkillEdit::Add(skill.trim().to_string()))
                } else if let Some(skill) = arg.strip_prefix('-') {
                    Command::Skill(SkillEdit::Remove(skill.trim().to_string()))
                } else {
                    Command::Usage(":skill +<name> | :skill -<name>")
                }
            }
            "save" => Command::Save,
            "upload" => match arg.trim().split_once(' ') {
                Some((path, description)) if !description.trim().is_empty() => Command::Upload {
                    path: path.to_string(),
                    description: description.trim().to_string(),
                },
                _ => Command::Usage(":upload <path> <description>"),
            },
            "quit" | "q" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Account side of the page: the current token and any unsaved profile edits.
struct Account<'a> {
    state: &'a AppState,
    auth: Option<AuthContext>,
    draft: Option<ProfileUpdate>,
}

impl<'a> Account<'a> {
    fn new(state: &'a AppState) -> Self {
        Self {
            state,
            auth: state.auth.clone(),
            draft: None,
        }
    }

    fn profile(&self) -> Option<ProfileClient> {
        self.auth.as_ref().map(|auth| self.state.profile_client(auth))
    }

    /// Runs one account command and returns the text to show for it.
    async fn execute(&mut self, command: Command) -> String {
        match self.try_execute(command).await {
            Ok(text) => text,
            Err(e) => e.report("Account command failed"),
        }
    }

    async fn try_execute(&mut self, command: Command) -> Result<String, AppError> {
        match command {
            Command::Login(credentials) => {
                let ctx = self.state.auth_client().login(&credentials).await?;
                self.signed_in(ctx);
                Ok(format!("Logged in as {}", credentials.email))
            }
            Command::Signup(form) => {
                let ctx = self.state.auth_client().signup(&form).await?;
                self.signed_in(ctx);
                Ok(format!("Account created for {}", form.email))
            }
            Command::Me => {
                let Some(client) = self.profile() else {
                    return Ok(NOT_SIGNED_IN.to_string());
                };
                Ok(describe_user(&client.me().await?))
            }
            Command::Skill(edit) => {
                let Some(client) = self.profile() else {
                    return Ok(NOT_SIGNED_IN.to_string());
                };
                let draft = match self.draft.take() {
                    Some(draft) => draft,
                    None => client
                        .me()
                        .await?
                        .profile
                        .map(ProfileUpdate::from)
                        .unwrap_or_default(),
                };
                let draft = self.draft.insert(draft);
                let note = match edit {
                    SkillEdit::Add(skill) => {
                        if draft.add_skill(&skill) {
                            String::new()
                        } else {
                            format!("{skill:?} is blank or already listed. ")
                        }
                    }
                    SkillEdit::Remove(skill) => {
                        draft.remove_skill(&skill);
                        String::new()
                    }
                };
                Ok(format!(
                    "{note}skills: {} (unsaved, :save to keep)",
                    draft.skills.join(", ")
                ))
            }
            Command::Save => {
                let Some(client) = self.profile() else {
                    return Ok(NOT_SIGNED_IN.to_string());
                };
                let Some(draft) = &self.draft else {
                    return Ok("Nothing to save".to_string());
                };
                let profile = client.update_profile(draft).await?;
                self.draft = None;
                Ok(format!("Profile saved. skills: {}", profile.skills.join(", ")))
            }
            Command::Upload { path, description } => {
                let Some(client) = self.profile() else {
                    return Ok(NOT_SIGNED_IN.to_string());
                };
                let bytes = match tokio::fs::read(&path).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!("Could not read {path}: {e}");
                        return Ok(format!("Could not read {path}: {e}"));
                    }
                };
                let filename = Path::new(&path)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.clone());
                let cert = client
                    .upload_certificate(&filename, bytes, &description)
                    .await?;
                Ok(format!("Uploaded {} ({})", cert.filename, cert.url))
            }
            _ => Ok(HELP.to_string()),
        }
    }

    fn signed_in(&mut self, ctx: AuthContext) {
        self.auth = Some(ctx);
        self.draft = None;
    }
}

/// Runs the page until `:quit` or end of input, then unmounts the pipeline.
pub async fn run<R, W>(state: &AppState, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let pipeline = search::spawn(Arc::clone(&state.directory), state.config.pipeline());
    let mut updates = pipeline.subscribe();
    let mut lines = input.lines();
    let mut account = Account::new(state);

    output.write_all(format!("{HELP}\n").as_bytes()).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let reply = match Command::parse(&line) {
                    Command::Quit => break,
                    Command::Query(text) => {
                        pipeline.set_query(text)?;
                        None
                    }
                    Command::ToggleVerified => {
                        pipeline.toggle_verified()?;
                        None
                    }
                    Command::Role(role) => {
                        pipeline.select_role(role)?;
                        None
                    }
                    Command::Dismiss => {
                        pipeline.dismiss_notice()?;
                        None
                    }
                    Command::Usage(usage) => Some(format!("usage: {usage}")),
                    Command::Unknown(name) => Some(format!("unknown command :{name}; {HELP}")),
                    command => Some(account.execute(command).await),
                };
                if let Some(text) = reply {
                    output.write_all(format!("{text}\n").as_bytes()).await?;
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let page = updates.borrow_and_update().page();
                output.write_all(format!("{page}\n").as_bytes()).await?;
            }
        }
        output.flush().await?;
    }

    pipeline.unmount().await;
    info!("Search page closed");
    Ok(())
}

fn describe_user(user: &User) -> String {
    let verified = if user.is_verified { " (verified)" } else { "" };
    let mut text = format!("{}{verified}", user.email);
    if let Some(profile) = &user.profile {
        let name = profile.full_name.as_deref().unwrap_or("unnamed");
        let role = profile.role.as_deref().unwrap_or("no role");
        text.push_str(&format!("\n  {name} | {role}"));
        if !profile.skills.is_empty() {
            text.push_str(&format!("\n  skills: {}", profile.skills.join(", ")));
        }
    }
    if !user.certificates.is_empty() {
        text.push_str(&format!("\n  certificates: {}", user.certificates.len()));
    }
    text
}
