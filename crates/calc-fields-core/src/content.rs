//! Cell content types
//!
//! The host distinguishes only four kinds of cell content: empty, a numeric
//! value, text and a formula. No further type inference is done here.

use std::fmt;

/// The content stored in a cell
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellContent {
    /// Empty cell (no content)
    Empty,
    /// Numeric value
    Number(f64),
    /// Text value
    String(String),
    /// Formula text, including the leading `=`
    Formula(String),
}

/// Classification of a cell's content, as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentKind {
    Empty,
    Value,
    Text,
    Formula,
}

/// How a typed read coerces a cell's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadAs {
    /// Return the content according to its [`ContentKind`]
    #[default]
    Auto,
    /// Force a numeric value (text and empty read as 0)
    Value,
    /// Force the formula text (non-formulas read as their input text)
    Formula,
    /// Force the display string
    String,
}

impl CellContent {
    /// Create a new text value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellContent::String(s.into())
    }

    /// Create a new formula value, adding the leading `=` if missing
    pub fn formula<S: Into<String>>(text: S) -> Self {
        let text = text.into();
        if text.starts_with('=') {
            CellContent::Formula(text)
        } else {
            CellContent::Formula(format!("={}", text))
        }
    }

    /// Classify the content
    pub fn kind(&self) -> ContentKind {
        match self {
            CellContent::Empty => ContentKind::Empty,
            CellContent::Number(_) => ContentKind::Value,
            CellContent::String(_) => ContentKind::Text,
            CellContent::Formula(_) => ContentKind::Formula,
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }

    /// Check if the cell contains a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Formula(_))
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellContent::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellContent::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get the formula text if this is a formula
    pub fn formula_text(&self) -> Option<&str> {
        match self {
            CellContent::Formula(f) => Some(f.as_str()),
            _ => None,
        }
    }

    /// Coerce the content as a typed read would
    pub fn read_as(&self, mode: ReadAs) -> CellContent {
        match mode {
            ReadAs::Auto => self.clone(),
            ReadAs::Value => CellContent::Number(self.as_number().unwrap_or(0.0)),
            ReadAs::Formula => match self {
                CellContent::Formula(_) => self.clone(),
                other => CellContent::Formula(other.to_string()),
            },
            ReadAs::String => CellContent::String(self.to_string()),
        }
    }
}

impl Default for CellContent {
    fn default() -> Self {
        CellContent::Empty
    }
}

impl fmt::Display for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellContent::Empty => write!(f, ""),
            CellContent::Number(n) => write!(f, "{}", n),
            CellContent::String(s) => write!(f, "{}", s),
            // No evaluation: formulas display as their text
            CellContent::Formula(text) => write!(f, "{}", text),
        }
    }
}

impl From<f64> for CellContent {
    fn from(n: f64) -> Self {
        CellContent::Number(n)
    }
}

impl From<i32> for CellContent {
    fn from(n: i32) -> Self {
        CellContent::Number(n as f64)
    }
}

impl From<&str> for CellContent {
    fn from(s: &str) -> Self {
        CellContent::String(s.to_string())
    }
}

impl From<String> for CellContent {
    fn from(s: String) -> Self {
        CellContent::String(s)
    }
}
