use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::MessageIdentity;
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeField {
    Translation,
    Fuzzy,
    Context,
}

impl ChangeField {
    pub const fn as_str(self) -> &'static str {
        match self {
            ChangeField::Translation => "translation",
            ChangeField::Fuzzy => "fuzzy",
            ChangeField::Context => "context",
        }
    }
}

impl fmt::Display for ChangeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeField {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "translation" => Ok(ChangeField::Translation),
            "fuzzy" => Ok(ChangeField::Fuzzy),
            "context" => Ok(ChangeField::Context),
            other => Err(CoreError::UnsupportedField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "field", rename_all = "lowercase")]
pub enum FieldChange {
    Translation { from: String, to: String },
    Fuzzy { from: bool, to: bool },
    Context { from: Option<String>, to: Option<String> },
}

impl FieldChange {
    pub fn field(&self) -> ChangeField {
        match self {
            FieldChange::Translation { .. } => ChangeField::Translation,
            FieldChange::Fuzzy { .. } => ChangeField::Fuzzy,
            FieldChange::Context { .. } => ChangeField::Context,
        }
    }

    pub fn is_noop(&self) -> bool {
        match self {
            FieldChange::Translation { from, to } => from == to,
            FieldChange::Fuzzy { from, to } => from == to,
            FieldChange::Context { from, to } => from == to,
        }
    }

    pub fn from_text(&self) -> Option<String> {
        match self {
            FieldChange::Translation { from, .. } => Some(from.clone()),
            FieldChange::Fuzzy { from, .. } => Some(from.to_string()),
            FieldChange::Context { from, .. } => from.clone(),
        }
    }

    pub fn to_text(&self) -> Option<String> {
        match self {
            FieldChange::Translation { to, .. } => Some(to.clone()),
            FieldChange::Fuzzy { to, .. } => Some(to.to_string()),
            FieldChange::Context { to, .. } => to.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    pub identity: MessageIdentity,
    pub source_text: String,
    #[serde(flatten)]
    pub change: FieldChange,
}

impl ChangeRecord {
    pub fn new(identity: MessageIdentity, source_text: impl Into<String>, change: FieldChange) -> Self {
        Self {
            identity,
            source_text: source_text.into(),
            change,
        }
    }

    pub fn translation(
        source_text: &str,
        context: Option<&str>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self::new(
            MessageIdentity::of(source_text, context),
            source_text,
            FieldChange::Translation {
                from: from.into(),
                to: to.into(),
            },
        )
    }

    pub fn fuzzy(source_text: &str, context: Option<&str>, from: bool, to: bool) -> Self {
        Self::new(
            MessageIdentity::of(source_text, context),
            source_text,
            FieldChange::Fuzzy { from, to },
        )
    }

    pub fn context(source_text: &str, from: Option<&str>, to: Option<&str>) -> Self {
        Self::new(
            MessageIdentity::of(source_text, from),
            source_text,
            FieldChange::Context {
                from: from.map(str::to_string),
                to: to.map(str::to_string),
            },
        )
    }

    pub fn field(&self) -> ChangeField {
        self.change.field()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedChange {
    #[serde(flatten)]
    pub change: ChangeRecord,
    pub current_value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireChange {
    #[serde(alias = "md5hash", alias = "msghash")]
    pub identity: String,
    #[serde(alias = "msgid", default)]
    pub source_text: String,
    pub field: String,
    #[serde(default)]
    pub from: Value,
    #[serde(default)]
    pub to: Value,
}

impl TryFrom<WireChange> for ChangeRecord {
    type Error = CoreError;

    fn try_from(wire: WireChange) -> Result<Self, Self::Error> {
        let field: ChangeField = wire.field.parse()?;
        let identity = MessageIdentity::parse(&wire.identity)?;
        let change = match field {
            ChangeField::Translation => FieldChange::Translation {
                from: text_value(field, wire.from)?,
                to: text_value(field, wire.to)?,
            },
            ChangeField::Fuzzy => FieldChange::Fuzzy {
                from: flag_value(field, wire.from)?,
                to: flag_value(field, wire.to)?,
            },
            ChangeField::Context => FieldChange::Context {
                from: optional_text_value(field, wire.from)?,
                to: optional_text_value(field, wire.to)?,
            },
        };
        Ok(ChangeRecord::new(identity, wire.source_text, change))
    }
}

pub fn decode_batch(input: &str) -> CoreResult<Vec<ChangeRecord>> {
    let wire: Vec<WireChange> =
        serde_json::from_str(input).map_err(|err| CoreError::InvalidBatch(err.to_string()))?;
    wire.into_iter().map(ChangeRecord::try_from).collect()
}

fn text_value(field: ChangeField, value: Value) -> CoreResult<String> {
    match value {
        Value::String(text) => Ok(text),
        Value::Null => Ok(String::new()),
        _ => Err(invalid(field, "expected a string")),
    }
}

fn optional_text_value(field: ChangeField, value: Value) -> CoreResult<Option<String>> {
    match value {
        Value::String(text) => Ok(Some(text)),
        Value::Null => Ok(None),
        _ => Err(invalid(field, "expected a string or null")),
    }
}

fn flag_value(field: ChangeField, value: Value) -> CoreResult<bool> {
    match value {
        Value::Bool(flag) => Ok(flag),
        Value::Null => Ok(false),
        _ => Err(invalid(field, "expected a boolean")),
    }
}

fn invalid(field: ChangeField, reason: &'static str) -> CoreError {
    CoreError::InvalidValue {
        field: field.as_str().to_string(),
        reason,
    }
}
