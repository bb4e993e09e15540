use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ColorsError, ColorsResult};

/// Group assigned to every label when no grouping is supplied.
pub const DEFAULT_GROUP: i64 = 1;

/// One labeled region: its number, display name, and color group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    /// Label number as it appears in the labeled image.
    pub id: i64,
    /// Human-readable region name.
    pub name: String,
    /// Caller-assigned cluster; need not be contiguous or sorted.
    pub group: i64,
}

impl LabelRecord {
    /// Zip parallel lists into records for `n` labels.
    ///
    /// Empty lists fall back to defaults: ids `0..n`, names `"0".."n-1"`, and
    /// [`DEFAULT_GROUP`] for everyone. A non-empty list of the wrong length is
    /// a shape mismatch; a repeated ID is a config error.
    pub fn from_parts(
        n: usize,
        ids: &[i64],
        names: &[String],
        groups: &[i64],
    ) -> ColorsResult<Vec<Self>> {
        for (what, len) in [("ids", ids.len()), ("names", names.len()), ("groups", groups.len())] {
            if len != 0 && len != n {
                return Err(ColorsError::shape(what, n, len));
            }
        }
        let records: Vec<Self> = (0..n)
            .map(|i| {
                #[allow(clippy::cast_possible_wrap)]
                let id = ids.get(i).copied().unwrap_or(i as i64);
                Self {
                    id,
                    name: names.get(i).cloned().unwrap_or_else(|| i.to_string()),
                    group: groups.get(i).copied().unwrap_or(DEFAULT_GROUP),
                }
            })
            .collect();
        Self::ensure_unique_ids(&records)?;
        Ok(records)
    }

    /// Fail when two records share an ID.
    pub fn ensure_unique_ids(labels: &[Self]) -> ColorsResult<()> {
        let mut seen = BTreeSet::new();
        match labels.iter().find(|l| !seen.insert(l.id)) {
            Some(dup) => Err(ColorsError::config(format!(
                "label ID {} appears more than once",
                dup.id
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_lists_use_defaults() {
        let labels = LabelRecord::from_parts(2, &[], &[], &[]).unwrap();
        assert_eq!(
            labels,
            vec![
                LabelRecord {
                    id: 0,
                    name: "0".into(),
                    group: DEFAULT_GROUP
                },
                LabelRecord {
                    id: 1,
                    name: "1".into(),
                    group: DEFAULT_GROUP
                },
            ]
        );
    }

    #[test]
    fn supplied_lists_are_zipped() {
        let names = vec!["caudal".to_string(), "rostral".to_string()];
        let labels = LabelRecord::from_parts(2, &[1002, 1003], &names, &[4, 2]).unwrap();
        assert_eq!(labels[1].id, 1003);
        assert_eq!(labels[1].name, "rostral");
        assert_eq!(labels[1].group, 2);
    }

    #[test]
    fn wrong_lengths_are_rejected() {
        let err = LabelRecord::from_parts(3, &[1, 2], &[], &[]).unwrap_err();
        assert!(matches!(
            err,
            ColorsError::ShapeMismatch {
                what: "ids",
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn repeated_ids_are_rejected() {
        let err = LabelRecord::from_parts(3, &[1002, 1003, 1002], &[], &[]).unwrap_err();
        assert!(matches!(err, ColorsError::Config(_)));
        assert!(err.to_string().contains("1002"));
    }
}
