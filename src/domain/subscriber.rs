use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::{Chunker, SubscriberError};

/// Key/value pairs as sent to the Mailchimp member endpoints.
pub type Fields = Map<String, Value>;

/// A list member as the Mailchimp "add or update member" endpoint expects it.
///
/// See <http://developer.mailchimp.com/documentation/mailchimp/reference/lists/members/>.
///
/// Null merge fields are rejected by the API with a 400, so no view handed out by this
/// type ever contains one. Nulls given to [`Subscriber::new`] or
/// [`Subscriber::set_merge_field_value`] are kept internally and only hidden on read;
/// [`Subscriber::set_merge_fields`] drops them before storing.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscriber {
    email: String,
    merge_fields: Fields,
    options: Fields,
}

impl Subscriber {
    /// `email` is stored as given. Use [`SubscriberEmail`](crate::domain::SubscriberEmail)
    /// beforehand when the address needs checking.
    pub fn new(email: impl Into<String>, merge_fields: Fields, options: Fields) -> Self {
        Self {
            email: email.into(),
            merge_fields,
            options,
        }
    }

    /// Builds the request payload: `email_address`, then `merge_fields` when any non-null
    /// field is left, then every option in its original order.
    ///
    /// An option named `email_address` is always overridden. An option named
    /// `merge_fields` is overridden only when this subscriber has merge fields to send.
    #[tracing::instrument(
        name = "Formatting subscriber payload",
        level = "debug",
        skip(self),
        fields(subscriber_email = %self.email)
    )]
    pub fn format(&self) -> Fields {
        let mut payload = Map::with_capacity(self.options.len() + 2);
        payload.insert("email_address".into(), Value::String(self.email.clone()));

        let merge_fields = self.merge_fields();
        if !merge_fields.is_empty() {
            payload.insert("merge_fields".into(), Value::Object(merge_fields));
        }

        for (key, value) in &self.options {
            if payload.contains_key(key) {
                continue;
            }
            payload.insert(key.clone(), value.clone());
        }
        payload
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// The merge fields with every null entry left out.
    pub fn merge_fields(&self) -> Fields {
        self.merge_fields
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Replaces all merge fields with the non-null entries of `merge_fields`.
    pub fn set_merge_fields(&mut self, mut merge_fields: Fields) -> &Fields {
        let before = merge_fields.len();
        merge_fields.retain(|_, value| !value.is_null());
        if merge_fields.len() < before {
            tracing::debug!(
                dropped = before - merge_fields.len(),
                "Dropping null merge fields"
            );
        }
        self.merge_fields = merge_fields;
        &self.merge_fields
    }

    /// Every other member option (`email_type`, `interests`, `language`, `vip`, `location`,
    /// `ip_signup`, `timestamp_signup`, `ip_opt`, `timestamp_opt`, ...), untouched.
    pub fn options(&self) -> &Fields {
        &self.options
    }

    /// Looks up a merge field, returning `default` when it is stored as null.
    ///
    /// Fails when `key` was never set: asking for an unknown field is a caller bug.
    pub fn merge_field_value(
        &self,
        key: &str,
        default: impl Into<Value>,
    ) -> Result<Value, SubscriberError> {
        match self.merge_fields.get(key) {
            None => Err(SubscriberError::PreconditionFailed(key.to_owned())),
            Some(Value::Null) => Ok(default.into()),
            Some(value) => Ok(value.clone()),
        }
    }

    /// Sets `key` to `value`, or spreads `value` over `key_1..=key_<chunk_count>`.
    ///
    /// Without a delimiter the value is cut every 230 characters, otherwise on each
    /// delimiter. Unused slots are blanked so a previously longer value leaves nothing
    /// behind; pieces past `chunk_count` are lost.
    pub fn set_merge_field_value(
        &mut self,
        key: &str,
        value: impl Into<Value>,
        chunk_count: Option<usize>,
        delimiter: Option<&str>,
    ) {
        self.set_merge_field_value_with(&Chunker::default(), key, value, chunk_count, delimiter)
    }

    /// [`Subscriber::set_merge_field_value`] with a custom chunk length.
    pub fn set_merge_field_value_with(
        &mut self,
        chunker: &Chunker,
        key: &str,
        value: impl Into<Value>,
        chunk_count: Option<usize>,
        delimiter: Option<&str>,
    ) {
        let value = value.into();
        let count = match chunk_count {
            Some(count) if count > 0 => count,
            _ => {
                self.merge_fields.insert(key.to_owned(), value);
                return;
            }
        };

        let text = if is_falsy(&value) {
            String::new()
        } else {
            to_text(&value)
        };
        let _span = tracing::debug_span!("Chunking merge field", merge_field = key).entered();
        let slots = chunker.chunk(&text, count, delimiter);
        for (i, slot) in slots.into_iter().enumerate() {
            self.merge_fields
                .insert(format!("{}_{}", key, i + 1), Value::String(slot));
        }
    }
}

impl Serialize for Subscriber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.format().serialize(serializer)
    }
}

/// Values that count as "no content" when chunking.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_owned(),
        Value::Number(n) => match n.as_f64() {
            // whole floats print without a fraction, like a PHP string cast
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
