//! Line-oriented command shell over a secrets client

use futures::StreamExt;
use keyvault_secrets::{KeyVaultSecret, SecretClient, SecretError, SecretProperties};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub const HELP: &str = "\
commands:
  get <name>
  set <name> <value>
  delete <name>
  purge <name>
  recover <name>
  update <name> [content-type=<type>] [enabled=<bool>] [tag:<key>=<value>] [untag:<key>]
  list
  list-deleted
  help
  quit | exit";

/// Errors in the command line itself, before the store is touched
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command}: missing argument <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// A property change requested by `update`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyChange {
    ContentType(String),
    Enabled(bool),
    Tag(String, String),
    Untag(String),
}

impl PropertyChange {
    fn parse(arg: &str) -> Result<Self, CommandError> {
        if let Some(content_type) = arg.strip_prefix("content-type=") {
            return Ok(Self::ContentType(content_type.to_string()));
        }
        if let Some(enabled) = arg.strip_prefix("enabled=") {
            return enabled
                .parse()
                .map(Self::Enabled)
                .map_err(|_| CommandError::InvalidArgument(arg.to_string()));
        }
        if let Some(tag) = arg.strip_prefix("tag:") {
            return match tag.split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    Ok(Self::Tag(key.to_string(), value.to_string()))
                }
                _ => Err(CommandError::InvalidArgument(arg.to_string())),
            };
        }
        if let Some(key) = arg.strip_prefix("untag:") {
            if !key.is_empty() {
                return Ok(Self::Untag(key.to_string()));
            }
        }
        Err(CommandError::InvalidArgument(arg.to_string()))
    }

    fn apply(self, properties: &mut SecretProperties) {
        match self {
            Self::ContentType(content_type) => properties.content_type = Some(content_type),
            Self::Enabled(enabled) => properties.enabled = enabled,
            Self::Tag(key, value) => {
                properties.tags.insert(key, value);
            }
            Self::Untag(key) => {
                properties.tags.remove(&key);
            }
        }
    }
}

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get(String),
    Set(String, String),
    Delete(String),
    Purge(String),
    Recover(String),
    Update(String, Vec<PropertyChange>),
    List,
    ListDeleted,
    Help,
    Quit,
}

/// Split off the first whitespace-delimited word
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

fn require_name(command: &'static str, rest: &str) -> Result<String, CommandError> {
    let (name, _) = split_word(rest);
    if name.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            argument: "name",
        });
    }
    Ok(name.to_string())
}

impl Command {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let (word, rest) = split_word(line.trim());

        let command = match word {
            "" => return Ok(None),
            "get" => Self::Get(require_name("get", rest)?),
            "set" => {
                let name = require_name("set", rest)?;
                // The value is the rest of the line and may contain spaces
                let (_, value) = split_word(rest);
                if value.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "set",
                        argument: "value",
                    });
                }
                Self::Set(name, value.to_string())
            }
            "delete" => Self::Delete(require_name("delete", rest)?),
            "purge" => Self::Purge(require_name("purge", rest)?),
            "recover" => Self::Recover(require_name("recover", rest)?),
            "update" => {
                let name = require_name("update", rest)?;
                let (_, args) = split_word(rest);
                let changes = args
                    .split_whitespace()
                    .map(PropertyChange::parse)
                    .collect::<Result<Vec<_>, _>>()?;
                Self::Update(name, changes)
            }
            "list" => Self::List,
            "list-deleted" => Self::ListDeleted,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

/// Result of running one line
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Text to print; the shell keeps running
    Output(String),
    /// Stop reading input
    Quit,
}

/// Command interpreter bound to a secrets client
pub struct Shell<C> {
    client: C,
}

impl<C: SecretClient> Shell<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Parse and run one line of input
    pub async fn run_line(&self, line: &str) -> Outcome {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Outcome::Output(String::new()),
            Err(err) => return Outcome::Output(format!("error: {err}")),
        };

        debug!(?command, "Running command");
        if command == Command::Quit {
            return Outcome::Quit;
        }

        match self.execute(command).await {
            Ok(output) => Outcome::Output(output),
            Err(err) => Outcome::Output(err.to_json()),
        }
    }

    async fn execute(&self, command: Command) -> Result<String, SecretError> {
        match command {
            Command::Get(name) => Ok(to_json(&self.client.get_secret(&name).await?)),
            Command::Set(name, value) => {
                Ok(to_json(&self.client.set_secret(&name, &value).await?))
            }
            Command::Delete(name) => {
                self.client.delete_secret(&name).await?;
                Ok("OK".to_string())
            }
            Command::Purge(name) => {
                self.client.purge_deleted_secret(&name).await?;
                Ok("OK".to_string())
            }
            Command::Recover(name) => {
                self.client.recover_deleted_secret(&name).await?;
                Ok("OK".to_string())
            }
            Command::Update(name, changes) => {
                let mut properties = self.client.get_secret(&name).await?.properties;
                for change in changes {
                    change.apply(&mut properties);
                }
                self.client.update_secret_properties(properties).await?;
                Ok(to_json(&self.client.get_secret(&name).await?.properties))
            }
            Command::List => {
                let properties: Vec<SecretProperties> =
                    self.client.list_properties_of_secrets().collect().await;
                Ok(to_json(&properties))
            }
            Command::ListDeleted => {
                let deleted: Vec<KeyVaultSecret> =
                    self.client.list_deleted_secrets().collect().await;
                Ok(to_json(&deleted))
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("error: {e}"))
}
