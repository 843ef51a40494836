//! Permissive scalar coercion with explicit degradation.

/// Result of a lenient parse: either the parsed value or a fallback plus the
/// reason the input was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Ok(T),
    Degraded { value: T, reason: String },
}

impl<T> Parsed<T> {
    /// The value, parsed or fallback.
    pub fn into_value(self) -> T {
        match self {
            Parsed::Ok(value) | Parsed::Degraded { value, .. } => value,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Parsed::Ok(value) | Parsed::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Parsed::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Parsed::Ok(_) => None,
            Parsed::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        match self {
            Parsed::Ok(value) => Parsed::Ok(f(value)),
            Parsed::Degraded { value, reason } => Parsed::Degraded {
                value: f(value),
                reason,
            },
        }
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Integer with a default. Missing or blank input is the default without
/// degradation; unparsable input degrades to the default.
pub fn int_or(raw: Option<&str>, default: i64) -> Parsed<i64> {
    let Some(s) = present(raw) else {
        return Parsed::Ok(default);
    };
    match s.parse::<i64>() {
        Ok(v) => Parsed::Ok(v),
        Err(e) => Parsed::Degraded {
            value: default,
            reason: format!("invalid integer {s:?}: {e}"),
        },
    }
}

/// Optional float. Missing input is `None`; unparsable or non-finite input
/// degrades to `None`.
pub fn float_opt(raw: Option<&str>) -> Parsed<Option<f64>> {
    let Some(s) = present(raw) else {
        return Parsed::Ok(None);
    };
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Parsed::Ok(Some(v)),
        Ok(_) => Parsed::Degraded {
            value: None,
            reason: format!("non-finite number {s:?}"),
        },
        Err(e) => Parsed::Degraded {
            value: None,
            reason: format!("invalid number {s:?}: {e}"),
        },
    }
}

/// Float where zero also counts as "not set".
pub fn nonzero_float(raw: Option<&str>) -> Option<f64> {
    float_opt(raw).into_value().filter(|v| *v != 0.0)
}

/// Trimmed text, empty when missing.
pub fn text(raw: Option<&str>) -> String {
    present(raw).unwrap_or_default().to_string()
}

/// Truncates to at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
