//! Addressing features and subsets of their scenarios.
//!
//! An address has the form `<module>:<file>[:<selectors>]`. The selector list
//! is a comma-separated record in which quoting follows the usual
//! double-quote rules. Entries made only of ASCII digits are zero-based
//! scenario indices; anything else is a literal scenario name.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::delimited::{self, DelimitedError};

/// One entry of a selector list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Selector {
    /// Zero-based scenario index.
    Index(usize),
    /// Literal scenario name.
    Name(String),
}

impl Selector {
    /// Whether the scenario at `index` named `name` is selected.
    ///
    /// Names compare literally, except that a single trailing period on the
    /// scenario name is ignored.
    ///
    /// # Examples
    /// ```
    /// use trellis_bdd::selection::Selector;
    ///
    /// let selector = Selector::Name("Adds numbers".into());
    /// assert!(selector.matches(3, "Adds numbers."));
    /// assert!(!selector.matches(3, "Adds numbers.."));
    /// assert!(Selector::Index(3).matches(3, "anything"));
    /// ```
    #[must_use]
    pub fn matches(&self, index: usize, name: &str) -> bool {
        match self {
            Self::Index(selected) => *selected == index,
            Self::Name(selected) => {
                selected == name || name.strip_suffix('.') == Some(selected.as_str())
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Errors raised while parsing an address or selector list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SelectorError {
    /// The address lacks a `<module>:<file>` prefix.
    #[error("address `{address}` must have the form <module>:<file>[:<selectors>]")]
    MalformedAddress {
        /// The address as given.
        address: String,
    },
    /// The selector list is present but has an empty entry.
    #[error("selector list `{list}` contains an empty entry")]
    EmptySelector {
        /// The selector list as given.
        list: String,
    },
    /// A numeric selector does not fit an index.
    #[error("selector `{value}` is out of range")]
    IndexOutOfRange {
        /// The selector as given.
        value: String,
    },
    /// The selector list is not a valid record.
    #[error("invalid selector list `{list}`: {source}")]
    Delimited {
        /// The selector list as given.
        list: String,
        /// Underlying record failure.
        #[source]
        source: DelimitedError,
    },
}

/// Parse a comma-separated selector list.
///
/// A blank list yields no selectors.
///
/// # Errors
/// Returns [`SelectorError`] when the list is not a valid record or has an
/// empty entry.
///
/// # Examples
/// ```
/// use trellis_bdd::selection::{Selector, parse_selectors};
///
/// let selectors = parse_selectors(r#"0,"Adds, then checks",2"#)
///     .unwrap_or_else(|e| panic!("{e}"));
/// assert_eq!(
///     selectors.into_iter().collect::<Vec<_>>(),
///     vec![
///         Selector::Index(0),
///         Selector::Index(2),
///         Selector::Name("Adds, then checks".into()),
///     ],
/// );
/// ```
pub fn parse_selectors(list: &str) -> Result<BTreeSet<Selector>, SelectorError> {
    if list.trim().is_empty() {
        return Ok(BTreeSet::new());
    }
    let fields = delimited::split_record(list).map_err(|source| SelectorError::Delimited {
        list: list.to_string(),
        source,
    })?;
    fields
        .into_iter()
        .map(|field| {
            if field.is_empty() {
                Err(SelectorError::EmptySelector {
                    list: list.to_string(),
                })
            } else if field.bytes().all(|b| b.is_ascii_digit()) {
                field
                    .parse()
                    .map(Selector::Index)
                    .map_err(|_| SelectorError::IndexOutOfRange { value: field })
            } else {
                Ok(Selector::Name(field))
            }
        })
        .collect()
}

/// Render selectors as a record: names quoted, indices bare.
#[must_use]
pub fn render_selectors<'a, I>(selectors: I) -> String
where
    I: IntoIterator<Item = &'a Selector>,
{
    let fields: Vec<(String, bool)> = selectors
        .into_iter()
        .map(|selector| (selector.to_string(), matches!(selector, Selector::Name(_))))
        .collect();
    delimited::join_record(fields.iter().map(|(field, quote)| (field.as_str(), *quote)))
}

/// Address of a feature, optionally narrowed to some of its scenarios.
///
/// # Examples
/// ```
/// use trellis_bdd::selection::FeatureAddress;
///
/// let address: FeatureAddress = "features:math.feature:1,\"Adds\""
///     .parse()
///     .unwrap_or_else(|e| panic!("{e}"));
/// assert_eq!(address.module, "features");
/// assert_eq!(address.file, "math.feature");
/// assert_eq!(address.to_string(), "features:math.feature:1,\"Adds\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureAddress {
    /// Module path owning the feature.
    pub module: String,
    /// File name of the feature document.
    pub file: String,
    /// Selected scenarios; `None` addresses the whole feature.
    pub selectors: Option<BTreeSet<Selector>>,
}

impl FeatureAddress {
    /// Address a whole feature.
    #[must_use]
    pub fn whole(module: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            file: file.into(),
            selectors: None,
        }
    }

    /// Narrow the address to `selectors`.
    ///
    /// An empty set leaves the whole feature addressed.
    #[must_use]
    pub fn with_selectors(mut self, selectors: impl IntoIterator<Item = Selector>) -> Self {
        let selectors: BTreeSet<Selector> = selectors.into_iter().collect();
        self.selectors = (!selectors.is_empty()).then_some(selectors);
        self
    }

    /// `<module>:<file>` without selectors.
    #[must_use]
    pub fn feature_id(&self) -> String {
        format!("{}:{}", self.module, self.file)
    }
}

impl FromStr for FeatureAddress {
    type Err = SelectorError;

    fn from_str(address: &str) -> Result<Self, Self::Err> {
        let malformed = || SelectorError::MalformedAddress {
            address: address.to_string(),
        };
        let mut parts = address.splitn(3, ':');
        let module = parts.next().filter(|m| !m.is_empty()).ok_or_else(malformed)?;
        let file = parts.next().filter(|f| !f.is_empty()).ok_or_else(malformed)?;
        let selectors = parts.next().map(parse_selectors).transpose()?;
        Ok(Self::whole(module, file).with_selectors(selectors.into_iter().flatten()))
    }
}

impl fmt::Display for FeatureAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.file)?;
        if let Some(selectors) = &self.selectors {
            write!(f, ":{}", render_selectors(selectors))?;
        }
        Ok(())
    }
}

/// Merge addresses naming the same feature.
///
/// Selector lists for one feature are united, and an address naming the
/// whole feature absorbs every subset. The result is ordered by module, then
/// file.
#[must_use]
pub fn group_addresses<I>(addresses: I) -> Vec<FeatureAddress>
where
    I: IntoIterator<Item = FeatureAddress>,
{
    let mut grouped: BTreeMap<(String, String), Option<BTreeSet<Selector>>> = BTreeMap::new();
    for address in addresses {
        match grouped.entry((address.module, address.file)) {
            Entry::Vacant(slot) => {
                slot.insert(address.selectors);
            }
            Entry::Occupied(mut slot) => match (slot.get_mut(), address.selectors) {
                (Some(existing), Some(selectors)) => existing.extend(selectors),
                (existing, None) => *existing = None,
                (None, Some(_)) => {}
            },
        }
    }
    grouped
        .into_iter()
        .map(|((module, file), selectors)| FeatureAddress {
            module,
            file,
            selectors,
        })
        .collect()
}
