//! Marking evaluated tests in source text.

use crate::BranchRecord;

/// Wrap the text of each record's range in markup: `open_true` or
/// `open_false` before it, depending on the outcome, and `close` after.
///
/// `records` must be in source order, as [`crate::evaluate_branches`]
/// returns them. Records that fall outside `source`, overlap an earlier
/// record or split a character are left unmarked.
pub fn highlight(source: &str, records: &[BranchRecord], open_true: &str, open_false: &str, close: &str) -> String {
    let mut output = String::with_capacity(source.len() + records.len() * (open_true.len() + close.len()));
    let mut cursor = 0;
    for record in records {
        let (start, end) = (record.start as usize, record.end as usize);
        if start < cursor || start > end {
            continue;
        }
        let (Some(before), Some(marked)) = (source.get(cursor..start), source.get(start..end)) else {
            continue;
        };
        output.push_str(before);
        output.push_str(if record.taken { open_true } else { open_false });
        output.push_str(marked);
        output.push_str(close);
        cursor = end;
    }
    output.push_str(source.get(cursor..).unwrap_or_default());
    output
}
