//! Per-observation defect labels.
//!
//! An observation's error column is an ordered set of [`ErrorLabel`]s; the empty set is `OK`.
//! Labels are only ever added, except that a pass may take back the label it added itself
//! during the same invocation when it decides the defect was not a reportable one.
//!
//! Combined labels render as the distinct labels joined with `,` in first-seen order,
//! e.g. `timeDUP,locNA`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ContractError;

const OK: &str = "OK";
const SEPARATOR: char = ',';

/// A single defect label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorLabel {
    /// Timestamp repeated an earlier observation's timestamp
    TimeDup,
    /// Timestamp inconsistent with the linear progression of time
    TimeSeq,
    /// Timestamp missing
    TimeNa,
    /// Position far from the locally fitted path
    LocSeq,
    /// Position missing on at least one axis
    LocNa,
    /// Row inserted while re-gridding onto the expected timeline
    Missing,
}

impl ErrorLabel {
    pub const ALL: [ErrorLabel; 6] = [
        ErrorLabel::TimeDup,
        ErrorLabel::TimeSeq,
        ErrorLabel::TimeNa,
        ErrorLabel::LocSeq,
        ErrorLabel::LocNa,
        ErrorLabel::Missing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorLabel::TimeDup => "timeDUP",
            ErrorLabel::TimeSeq => "timeSEQ",
            ErrorLabel::TimeNa => "timeNA",
            ErrorLabel::LocSeq => "locSEQ",
            ErrorLabel::LocNa => "locNA",
            ErrorLabel::Missing => "MISSING",
        }
    }
}

impl fmt::Display for ErrorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorLabel {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| ContractError::InvalidLabel {
                label: s.to_string(),
            })
    }
}

/// Accumulated defect labels of one observation (empty = `OK`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ErrorLabels(Vec<ErrorLabel>);

impl ErrorLabels {
    /// The `OK` label set
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn is_ok(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, label: ErrorLabel) -> bool {
        self.0.contains(&label)
    }

    pub fn iter(&self) -> impl Iterator<Item = ErrorLabel> + '_ {
        self.0.iter().copied()
    }

    /// Add `label` unless already present.
    ///
    /// Returns `true` when the label was newly added; passes keep this to know whether a
    /// later [`downgrade`](Self::downgrade) is theirs to make.
    pub fn merge(&mut self, label: ErrorLabel) -> bool {
        if self.contains(label) {
            false
        } else {
            self.0.push(label);
            true
        }
    }

    /// Functional form of [`merge`](Self::merge): `OK + X = X`, `X + Y = X,Y`, `X + X = X`.
    pub fn merged(&self, label: ErrorLabel) -> Self {
        let mut out = self.clone();
        out.merge(label);
        out
    }

    /// Remove `label`, leaving every other label in place.
    pub fn downgrade(&mut self, label: ErrorLabel) {
        self.0.retain(|l| *l != label);
    }
}

impl From<ErrorLabel> for ErrorLabels {
    fn from(label: ErrorLabel) -> Self {
        Self(vec![label])
    }
}

impl fmt::Display for ErrorLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str(OK);
        }
        for (i, label) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(label.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for ErrorLabels {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut labels = Self::ok();
        for token in s.split(SEPARATOR).map(str::trim) {
            if token.is_empty() || token == OK {
                continue;
            }
            labels.merge(token.parse()?);
        }
        Ok(labels)
    }
}

impl TryFrom<String> for ErrorLabels {
    type Error = ContractError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ErrorLabels> for String {
    fn from(labels: ErrorLabels) -> Self {
        labels.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_merge_yields_new_label() {
        let labels = ErrorLabels::ok().merged(ErrorLabel::TimeDup);
        assert_eq!(labels.to_string(), "timeDUP");
    }

    #[test]
    fn test_merge_keeps_first_seen_order_without_duplicates() {
        let mut labels = ErrorLabels::from(ErrorLabel::LocNa);
        assert!(labels.merge(ErrorLabel::TimeSeq));
        assert!(!labels.merge(ErrorLabel::LocNa));
        assert!(labels.merge(ErrorLabel::Missing));
        assert_eq!(labels.to_string(), "locNA,timeSEQ,MISSING");
    }

    #[test]
    fn test_downgrade_removes_only_that_label() {
        let mut labels = ErrorLabels::from(ErrorLabel::TimeNa);
        labels.merge(ErrorLabel::TimeDup);
        labels.downgrade(ErrorLabel::TimeDup);
        assert_eq!(labels.to_string(), "timeNA");

        labels.downgrade(ErrorLabel::TimeNa);
        assert!(labels.is_ok());
        assert_eq!(labels.to_string(), "OK");
    }

    #[test]
    fn test_parse_round_trip() {
        let labels: ErrorLabels = "timeDUP, locSEQ".parse().unwrap();
        assert_eq!(labels.to_string(), "timeDUP,locSEQ");

        let ok: ErrorLabels = "OK".parse().unwrap();
        assert!(ok.is_ok());

        let err = "timeDUP,bogus".parse::<ErrorLabels>().unwrap_err();
        assert!(matches!(err, ContractError::InvalidLabel { .. }));
    }

    #[test]
    fn test_serde_as_string() {
        let labels = ErrorLabels::from(ErrorLabel::Missing).merged(ErrorLabel::LocNa);
        let json = serde_json::to_string(&labels).unwrap();
        assert_eq!(json, "\"MISSING,locNA\"");

        let back: ErrorLabels = serde_json::from_str(&json).unwrap();
        assert_eq!(back, labels);
        assert!(serde_json::from_str::<ErrorLabels>("\"nope\"").is_err());
    }
}
