//! Credential and permission checks.

use tessera::{
    auth::{Reason, action_key},
    user::UserDirectory,
};

use crate::accounts::load_existing;
use crate::cli::{AuthorizeArgs, PasswdArgs};
use crate::output::OutputFormat;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Run the `login` command
///
/// Unknown accounts report a plain failure, like a wrong password.
pub fn login(directory: &UserDirectory, args: &PasswdArgs, format: OutputFormat) -> CommandResult {
    let mut user = directory.load(&args.username)?;
    let accepted = user.login(&args.password)?;

    match format {
        OutputFormat::Human if accepted => println!("Login accepted for '{}'", user.key()),
        OutputFormat::Human => println!("Login refused"),
        OutputFormat::Json => {
            let value = serde_json::json!({ "username": user.key(), "accepted": accepted });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}

/// Run the `authorize` command
pub fn authorize(
    directory: &UserDirectory,
    args: &AuthorizeArgs,
    format: OutputFormat,
) -> CommandResult {
    let mut user = load_existing(directory, &args.username)?;
    match &args.password {
        Some(password) => {
            user.login(password)?;
        }
        None => user.set_authenticated(true),
    }

    let scope = args.scope.as_deref();
    let key = action_key(&args.action, scope);
    let granted = user.authorize(&args.action, scope);

    let reason = if !user.is_authenticated() {
        "not authenticated".to_string()
    } else if !user.is_enabled() {
        format!("account is {}", user.state())
    } else {
        match directory.engine().decide(user.elements(), &args.action, scope).reason {
            Reason::Group(group) => format!("group '{group}'"),
            Reason::Direct => "account access entry".to_string(),
            Reason::Default => "no matching permission".to_string(),
        }
    };

    match format {
        OutputFormat::Human => {
            let verdict = if granted { "granted" } else { "denied" };
            println!("{key}: {verdict} ({reason})");
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "username": user.key(),
                "action": key,
                "granted": granted,
                "reason": reason,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}
