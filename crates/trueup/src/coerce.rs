//! Default-value normalization.
//!
//! Postgres reports column defaults as text: `0`, `true`,
//! `'pending'::character varying`, `nextval('widgets_id_seq'::regclass)`.
//! Before a stored default can be compared against a declared one it has to
//! be brought into the declared type's native representation, otherwise a
//! boolean column defaulting to `'1'` would forever look different from a
//! declared `true`. Every default comparison goes through [`defaults_equal`].

use rust_decimal::Decimal;
use trueup_db_schema::{SqlType, Value};

/// Strip a trailing `::type` cast from a stored default expression.
fn strip_cast(raw: &str) -> &str {
    if let Some(pos) = raw.rfind("::") {
        let suffix = &raw[pos + 2..];
        let ident_like = !suffix.is_empty()
            && suffix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '[' | ']'));
        if ident_like {
            return &raw[..pos];
        }
    }
    raw
}

/// Strip outer single quotes, unescaping doubled quotes. Returns `None`
/// when the text is not a quoted literal.
fn unquote(raw: &str) -> Option<String> {
    let inner = raw.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(inner.replace("''", "'"))
}

/// Bring a live default into the declared type's native representation.
///
/// Values that cannot be parsed as the declared type stay textual, which
/// then compares unequal to any typed declared default.
pub fn normalize(ty: &SqlType, live: &Value) -> Value {
    let Value::Text(raw) = live else {
        return live.clone();
    };
    let bare = strip_cast(raw.trim());
    let unquoted = unquote(bare);
    let text = unquoted.as_deref().unwrap_or(bare);

    match ty {
        SqlType::Integer | SqlType::BigInt => text
            .parse::<i64>()
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Text(text.to_string())),
        SqlType::Float => text
            .parse::<f64>()
            .map(Value::Float)
            .unwrap_or_else(|_| Value::Text(text.to_string())),
        SqlType::Decimal => text
            .parse::<Decimal>()
            .map(Value::Decimal)
            .unwrap_or_else(|_| Value::Text(text.to_string())),
        SqlType::Boolean => match text {
            "t" | "true" | "1" => Value::Bool(true),
            "f" | "false" | "0" => Value::Bool(false),
            _ => Value::Text(text.to_string()),
        },
        _ => Value::Text(text.to_string()),
    }
}

/// Whether a declared default and a live default are equivalent.
pub fn defaults_equal(ty: &SqlType, declared: &Value, live: &Value) -> bool {
    match declared {
        // Expressions compare textually against the cast-stripped live text.
        Value::Expr(expr) => match live {
            Value::Text(raw) | Value::Expr(raw) => strip_cast(raw.trim()) == expr,
            _ => false,
        },
        _ => normalize(ty, live) == *declared,
    }
}
