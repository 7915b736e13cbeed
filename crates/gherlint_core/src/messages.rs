//! Message identity and the per-run message catalog.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::LinterError;

const ID_PATTERN: &str = "^[EWCRI][0-9]{3}$";
const NAME_PATTERN: &str = "^[a-z][a-z0-9]*(-[a-z0-9]+)*$";

static ID_RE: OnceLock<Regex> = OnceLock::new();
static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn id_re() -> &'static Regex {
    ID_RE.get_or_init(|| Regex::new(ID_PATTERN).expect("id pattern is valid"))
}

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(NAME_PATTERN).expect("name pattern is valid"))
}

/// Whether `identifier` looks like a message id rather than a name.
pub fn is_message_id(identifier: &str) -> bool {
    id_re().is_match(identifier)
}

/// Compile-time message declaration of a checker.
#[derive(Debug, Clone, Copy)]
pub struct MessageDef {
    pub id: &'static str,
    pub name: &'static str,
    pub text: &'static str,
}

/// A validated diagnostic template.
///
/// `id` is the machine identifier (`E001`), `name` the symbolic kebab-case
/// identifier (`unparseable-file`), `text` the template with `{named}`
/// placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub name: String,
    pub text: String,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, LinterError> {
        let id = id.into();
        let name = name.into();
        if !id_re().is_match(&id) {
            return Err(LinterError::InvalidMessageId {
                pattern: ID_PATTERN,
                value: id,
            });
        }
        if !name_re().is_match(&name) {
            return Err(LinterError::InvalidMessageName {
                pattern: NAME_PATTERN,
                value: name,
            });
        }
        Ok(Self {
            id,
            name,
            text: text.into(),
        })
    }

    /// Interpolates `{key}` placeholders from `args`.
    ///
    /// A placeholder without a matching argument is a programming error in
    /// the calling checker, not a user-facing failure.
    pub fn format(&self, args: &[(&str, String)]) -> String {
        let mut text = self.text.clone();
        for (key, value) in args {
            text = text.replace(&format!("{{{key}}}"), value);
        }
        debug_assert!(
            !text.contains('{'),
            "message {} has unfilled placeholders: {text}",
            self.id
        );
        text
    }
}

/// Catalog of every message known to one run.
///
/// Both the id and the name of a message are unique for the lifetime of
/// the store; construct a fresh store to reset between independent runs.
#[derive(Debug, Default)]
pub struct MessageStore {
    by_id: HashMap<String, Message>,
    name_to_id: HashMap<String, String>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_message(&mut self, message: Message) -> Result<(), LinterError> {
        if self.by_id.contains_key(&message.id) {
            return Err(LinterError::DuplicateMessage(format!(
                "Message with ID {} already registered",
                message.id
            )));
        }
        if self.name_to_id.contains_key(&message.name) {
            return Err(LinterError::DuplicateMessage(format!(
                "Message with name {} already registered",
                message.name
            )));
        }
        self.name_to_id
            .insert(message.name.clone(), message.id.clone());
        self.by_id.insert(message.id.clone(), message);
        Ok(())
    }

    /// Validates and registers a checker's declared messages.
    pub fn register_all(&mut self, defs: &[MessageDef]) -> Result<(), LinterError> {
        for def in defs {
            self.register_message(Message::new(def.id, def.name, def.text)?)?;
        }
        Ok(())
    }

    pub fn get_by_id(&self, id: &str) -> Result<&Message, LinterError> {
        self.by_id
            .get(id)
            .ok_or_else(|| LinterError::UnknownMessage(format!("Message ID {id} not found.")))
    }

    pub fn get_by_name(&self, name: &str) -> Result<&Message, LinterError> {
        let id = self
            .name_to_id
            .get(name)
            .ok_or_else(|| LinterError::UnknownMessage(format!("Message name '{name}' not found.")))?;
        self.get_by_id(id)
    }

    /// Resolves an identifier by whichever pattern it matches.
    pub fn resolve(&self, id_or_name: &str) -> Result<&Message, LinterError> {
        if is_message_id(id_or_name) {
            self.get_by_id(id_or_name)
        } else {
            self.get_by_name(id_or_name)
        }
    }
}
