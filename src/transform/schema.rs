//! Schema normalization: question texts → short variable codes, and the
//! fixed questionnaire column order.
//!
//! Renaming and ordering are both driven by the tables in
//! [`crate::questionnaire`]. Target columns missing from the dataset are
//! silently omitted; columns the order list does not know are appended after
//! it in their existing relative order, so instrument variants survive.

use tracing::debug;

use crate::model::Dataset;
use crate::questionnaire::{COLUMN_ORDER, MULTI_SOURCE_COLUMNS, RENAME_TABLE};

/// Rename columns to their short codes and apply the target ordering. Any
/// multi-select source column still present (e.g. when its expansion was
/// skipped) is dropped here; its content lives in the indicator and
/// companion columns.
pub fn rename_and_reorder(ds: &mut Dataset) {
    for (from, to) in RENAME_TABLE.iter() {
        ds.rename_column(from, to);
    }

    ds.reorder_columns(COLUMN_ORDER);

    for source in MULTI_SOURCE_COLUMNS {
        if ds.has_column(source) {
            debug!(column = source, "dropping residual multi-select source column");
            ds.drop_column(source);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;
    use crate::questionnaire as q;

    #[test]
    fn test_rename_to_short_codes() {
        let mut ds = Dataset::new(vec![q::ID.into(), q::GENDER.into(), q::AGE.into()]);
        ds.push_row(vec![
            Cell::Text("1".into()),
            Cell::Int(1),
            Cell::Int(3),
        ]);
        rename_and_reorder(&mut ds);
        assert_eq!(ds.columns(), &["ID", "S1", "S2"]);
    }

    #[test]
    fn test_companion_other_columns_renamed() {
        let mut ds = Dataset::new(vec![q::ID.into(), q::other_column(q::HOUSEHOLD)]);
        ds.push_row(vec![Cell::Text("1".into()), Cell::Text("caravan".into())]);
        rename_and_reorder(&mut ds);
        assert!(ds.has_column("D3_97_Oth"));
    }

    #[test]
    fn test_target_order_with_omissions_and_extras() {
        let mut ds = Dataset::new(vec![
            "ExtraB".into(),
            q::AGE.into(),
            "ExtraA".into(),
            q::ID.into(),
        ]);
        ds.push_row(vec![Cell::Int(9), Cell::Int(3), Cell::Int(8), Cell::Text("1".into())]);
        rename_and_reorder(&mut ds);
        // known columns in target order first, extras appended in their
        // original relative order
        assert_eq!(ds.columns(), &["ID", "S2", "ExtraB", "ExtraA"]);
    }

    #[test]
    fn test_residual_source_columns_dropped() {
        let mut ds = Dataset::new(vec![q::ID.into(), q::AWARENESS.into()]);
        ds.push_row(vec![Cell::Text("1".into()), Cell::Text("Origin".into())]);
        rename_and_reorder(&mut ds);
        assert!(!ds.has_column(q::AWARENESS));
        assert_eq!(ds.columns(), &["ID"]);
    }

    #[test]
    fn test_full_ordering_after_expansion() {
        // indicator columns land between the screeners and Q2
        let mut ds = Dataset::new(vec![
            q::ID.into(),
            q::GENDER.into(),
            "Q1_1".into(),
            "Q1_99".into(),
            q::MAIN_PROVIDER.into(),
        ]);
        ds.push_row(vec![
            Cell::Text("1".into()),
            Cell::Int(1),
            Cell::Int(0),
            Cell::Int(1),
            Cell::Int(4),
        ]);
        rename_and_reorder(&mut ds);
        assert_eq!(ds.columns(), &["ID", "S1", "Q1_1", "Q1_99", "Q2"]);
    }
}
