//! Result set → record mapping.

use super::{Record, descriptor};
use crate::driver::ResultSet;
use crate::error::{OrmError, OrmResult};

/// Map every row of `result` into a `T`, in row order.
///
/// Columns are matched to fields by lower-cased name. Columns without a
/// matching field are dropped; fields without a matching column keep their
/// `Default` value. The first value that does not convert aborts the whole
/// mapping and nothing is returned.
pub fn map_rows<T: Record>(result: ResultSet) -> OrmResult<Vec<T>> {
    let desc = descriptor::<T>();
    let targets: Vec<Option<usize>> = result
        .columns
        .iter()
        .map(|column| desc.field_index(column))
        .collect();

    let mut records = Vec::with_capacity(result.rows.len());
    for (row_idx, row) in result.rows.into_iter().enumerate() {
        if row.len() != targets.len() {
            return Err(OrmError::conversion(
                format!("#{row_idx}"),
                format!(
                    "row has {} values but result has {} columns",
                    row.len(),
                    targets.len()
                ),
            ));
        }
        let mut record = T::default();
        for (value, target) in row.into_iter().zip(&targets) {
            if let Some(index) = *target {
                desc.set_index(&mut record, index, value)?;
            }
        }
        records.push(record);
    }
    Ok(records)
}
