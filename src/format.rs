use serde::Serialize;

/// Placeholder shown wherever a value is missing.
pub const NO_DATA: &str = "no data";

/// A display value that is either present or explicitly missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Formatted {
    Present(String),
    Absent,
}

impl Formatted {
    pub fn as_str(&self) -> &str {
        match self {
            Formatted::Present(text) => text,
            Formatted::Absent => NO_DATA,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Formatted::Present(_))
    }
}

impl std::fmt::Display for Formatted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn format_count(value: Option<u32>) -> Formatted {
    match value {
        Some(count) => Formatted::Present(count.to_string()),
        None => Formatted::Absent,
    }
}

/// Two decimal places, e.g. `3.456` becomes `3.46`.
pub fn format_decimal(value: Option<f64>) -> Formatted {
    match value {
        Some(number) if number.is_finite() => Formatted::Present(format!("{:.2}", number)),
        _ => Formatted::Absent,
    }
}
