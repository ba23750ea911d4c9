//! Grid layouts: `"<columns>x<rows>"` tokens.
//!
//! A layout decides how many cards fit on one binder page. Admins manage a
//! list of preset tokens; users pick one. Tokens must match `^\d+x\d+$`.
//!
//! ```
//! use photocard_binder::core::GridLayout;
//!
//! let layout: GridLayout = "4x3".parse().unwrap();
//! assert_eq!(layout.columns(), 4);
//! assert_eq!(layout.rows(), 3);
//! assert_eq!(layout.cards_per_page(), 12);
//!
//! assert!("3".parse::<GridLayout>().is_err());
//! ```

use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

fn layout_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+x\d+$").expect("layout pattern is valid"))
}

/// Check a raw token against the layout format without building a layout.
#[must_use]
pub fn is_valid_layout(token: &str) -> bool {
    layout_pattern().is_match(token)
}

/// A columns x rows page grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GridLayout {
    columns: u32,
    rows: u32,
}

impl GridLayout {
    /// Columns and rows used when no usable layout is configured.
    pub const DEFAULT: GridLayout = GridLayout { columns: 3, rows: 3 };

    /// Create a layout from dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Parse a `"<columns>x<rows>"` token.
    ///
    /// The token must match `^\d+x\d+$` exactly; surrounding whitespace is
    /// not trimmed here.
    pub fn parse(token: &str) -> Result<Self, ValidationError> {
        if !is_valid_layout(token) {
            return Err(ValidationError::InvalidLayout(token.to_string()));
        }
        let (cols, rows) = token
            .split_once('x')
            .ok_or_else(|| ValidationError::InvalidLayout(token.to_string()))?;
        let columns = cols
            .parse()
            .map_err(|_| ValidationError::InvalidLayout(token.to_string()))?;
        let rows = rows
            .parse()
            .map_err(|_| ValidationError::InvalidLayout(token.to_string()))?;
        Ok(Self { columns, rows })
    }

    /// Resolve a user's stored layout for display.
    ///
    /// Missing layouts fall back to 3x3. Each dimension that is missing,
    /// unparsable or zero falls back to 3 on its own, so `"5x?"` shows 5x3.
    #[must_use]
    pub fn parse_or_default(token: Option<&str>) -> Self {
        let Some(token) = token else {
            return Self::DEFAULT;
        };
        let mut parts = token.split('x');
        let dim = |part: Option<&str>| {
            part.and_then(|p| p.trim().parse::<u32>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(3)
        };
        let columns = dim(parts.next());
        let rows = dim(parts.next());
        Self { columns, rows }
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(self) -> u32 {
        self.rows
    }

    /// Cards that fit on one page (`columns * rows`).
    #[must_use]
    pub fn cards_per_page(self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Page capacity for pagination. Fails for layouts with a zero dimension.
    pub fn page_capacity(self) -> Result<NonZeroUsize, ValidationError> {
        NonZeroUsize::new(self.cards_per_page())
            .ok_or_else(|| ValidationError::InvalidLayout(self.to_string()))
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for GridLayout {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for GridLayout {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<GridLayout> for String {
    fn from(layout: GridLayout) -> Self {
        layout.to_string()
    }
}

impl std::fmt::Display for GridLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}
