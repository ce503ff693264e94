//! Account management commands: create, show, list, find, passwd, set, remove.

use tessera::{
    data::{Properties, Value},
    encoding::{Encoder, JsonEncoder},
    user::{UserDirectory, UserRecord},
};

use crate::accounts::load_existing;
use crate::cli::{CreateArgs, FindArgs, PasswdArgs, SetArgs, UserArgs};
use crate::output::{OutputFormat, print_properties, print_table};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Run the `create` command
pub fn create(directory: &UserDirectory, args: &CreateArgs, format: OutputFormat) -> CommandResult {
    let mut data = Properties::new();
    data.insert("email", args.email.as_str());
    data.insert("password", args.password.as_str());
    if let Some(fullname) = &args.fullname {
        data.insert("fullname", fullname.as_str());
    }
    if !args.groups.is_empty() {
        data.insert("groups", args.groups.clone());
    }

    let user = directory.create(&args.username, &data)?;

    match format {
        OutputFormat::Human => println!("Created account '{}'", user.key()),
        OutputFormat::Json => {
            let value = serde_json::json!({ "created": user.key() });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}

/// Run the `show` command
pub fn show(directory: &UserDirectory, args: &UserArgs, format: OutputFormat) -> CommandResult {
    let user = load_existing(directory, &args.username)?;
    print_account(&user, format)
}

/// Run the `list` command
pub fn list(directory: &UserDirectory, format: OutputFormat) -> CommandResult {
    let usernames = directory.list()?;

    match format {
        OutputFormat::Human => {
            if usernames.is_empty() {
                println!("No accounts found.");
                return Ok(());
            }

            let mut rows = Vec::with_capacity(usernames.len());
            for username in &usernames {
                let user = directory.load(username)?;
                rows.push(vec![
                    user.key().to_string(),
                    user.email().unwrap_or_default().to_string(),
                    user.state().to_string(),
                    user.groups().join(","),
                ]);
            }
            print_table(&["USERNAME", "EMAIL", "STATE", "GROUPS"], &rows);
        }
        OutputFormat::Json => {
            let mut entries = Vec::with_capacity(usernames.len());
            for username in &usernames {
                let user = directory.load(username)?;
                entries.push(serde_json::json!({
                    "username": user.key(),
                    "email": user.email(),
                    "state": user.state(),
                    "groups": user.groups(),
                }));
            }
            println!("{}", serde_json::to_string(&entries)?);
        }
    }
    Ok(())
}

/// Run the `find` command
pub fn find(directory: &UserDirectory, args: &FindArgs, format: OutputFormat) -> CommandResult {
    let fields: Vec<&str> = args.fields.iter().map(String::as_str).collect();
    let user = directory.find(&args.query, &fields)?;
    if !user.exists() {
        return Err(format!("No account matches '{}'", args.query).into());
    }
    print_account(&user, format)
}

/// Run the `passwd` command
pub fn passwd(directory: &UserDirectory, args: &PasswdArgs, format: OutputFormat) -> CommandResult {
    let mut user = load_existing(directory, &args.username)?;
    user.set_nested_property("password", args.password.as_str())?;
    user.validate()?;
    user.save()?;
    tracing::info!(username = %user.key(), "Password changed");

    match format {
        OutputFormat::Human => println!("Password changed for '{}'", user.key()),
        OutputFormat::Json => {
            let value = serde_json::json!({ "updated": user.key() });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}

/// Run the `set` command
pub fn set(directory: &UserDirectory, args: &SetArgs, format: OutputFormat) -> CommandResult {
    let mut user = load_existing(directory, &args.username)?;
    match &args.value {
        Some(raw) => {
            user.set_nested_property(&args.path, parse_value(raw))?;
        }
        None => {
            user.unset_nested_property(&args.path);
        }
    }
    user.validate()?;
    user.save()?;
    print_account(&user, format)
}

/// Run the `remove` command
pub fn remove(directory: &UserDirectory, args: &UserArgs, format: OutputFormat) -> CommandResult {
    let removed = directory.remove(&args.username)?;

    match format {
        OutputFormat::Human if removed => println!("Removed account '{}'", args.username),
        OutputFormat::Human => println!("No account named '{}'", args.username),
        OutputFormat::Json => {
            let value = serde_json::json!({ "username": args.username, "removed": removed });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}

fn print_account(user: &UserRecord, format: OutputFormat) -> CommandResult {
    let mut elements = user.prepare_storage();
    elements.remove("hashed_password");

    match format {
        OutputFormat::Human => {
            println!("Account:  {}", user.key());
            println!("Avatar:   {}", user.avatar_url());
            println!();
            print_properties(&elements);
        }
        OutputFormat::Json => println!("{}", JsonEncoder::compact().encode(&elements)?),
    }
    Ok(())
}

/// JSON when it parses, text otherwise, so `enabled` needs no quoting.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(raw))
}
