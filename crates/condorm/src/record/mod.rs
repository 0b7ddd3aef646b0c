//! Destination records and their cached descriptors.
//!
//! A [`Record`] is a plain struct whose fields are filled from result columns
//! by name. It is normally derived:
//!
//! ```ignore
//! use condorm::Record;
//!
//! #[derive(Debug, Default, Record)]
//! struct TestModel {
//!     id: i64,
//!     name: String,
//!     addr: String,
//! }
//!
//! assert_eq!(TestModel::TABLE, "test_model");
//! ```

mod mapper;

pub use mapper::map_rows;

use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

/// A struct that rows can be mapped into.
///
/// This trait should typically be derived using `#[derive(Record)]`.
pub trait Record: Default + 'static {
    /// Table the record is selected from.
    const TABLE: &'static str;

    /// Column names of the mapped fields, in declaration order.
    const FIELDS: &'static [&'static str];

    /// Store `value` into the field at `index` of [`Record::FIELDS`].
    fn set_field(&mut self, index: usize, value: Value) -> OrmResult<()>;
}

/// Per-type field table used by the row mapper.
#[derive(Debug)]
pub struct RecordDescriptor {
    type_id: TypeId,
    table: &'static str,
    fields: &'static [&'static str],
    by_column: HashMap<String, usize>,
}

impl RecordDescriptor {
    fn build<T: Record>() -> Self {
        let by_column = T::FIELDS
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_lowercase(), i))
            .collect();
        Self {
            type_id: TypeId::of::<T>(),
            table: T::TABLE,
            fields: T::FIELDS,
            by_column,
        }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Field column names in declaration order.
    pub fn field_names(&self) -> &'static [&'static str] {
        self.fields
    }

    /// Index of the field matching `column`, compared case-insensitively.
    pub fn field_index(&self, column: &str) -> Option<usize> {
        match self.by_column.get(column) {
            Some(&i) => Some(i),
            None => self.by_column.get(&column.to_lowercase()).copied(),
        }
    }

    /// Assign `value` to the field matching `column`.
    ///
    /// Returns `Ok(false)` when the record has no such field.
    pub fn set<T: Record>(&self, record: &mut T, column: &str, value: Value) -> OrmResult<bool> {
        self.check_type::<T>()?;
        match self.field_index(column) {
            Some(i) => self.set_index(record, i, value).map(|()| true),
            None => Ok(false),
        }
    }

    /// Assign `value` to the field at `index` of [`RecordDescriptor::field_names`].
    ///
    /// Fails with `InvalidArgument` when this descriptor was built for another type.
    pub fn set_index<T: Record>(&self, record: &mut T, index: usize, value: Value) -> OrmResult<()> {
        self.check_type::<T>()?;
        if index >= self.fields.len() {
            return Err(OrmError::invalid_argument(format!(
                "{} has no field #{index}",
                self.table
            )));
        }
        record.set_field(index, value)
    }

    fn check_type<T: Record>(&self) -> OrmResult<()> {
        if self.type_id != TypeId::of::<T>() {
            return Err(OrmError::invalid_argument(format!(
                "descriptor for {} used with {}",
                self.table,
                std::any::type_name::<T>()
            )));
        }
        Ok(())
    }
}

type DescriptorCache = RwLock<HashMap<TypeId, Arc<RecordDescriptor>>>;

/// Get the descriptor for `T`, building it on first use.
///
/// Descriptors live for the whole process and are shared between threads.
pub fn descriptor<T: Record>() -> Arc<RecordDescriptor> {
    static CACHE: OnceLock<DescriptorCache> = OnceLock::new();
    let cache = CACHE.get_or_init(|| RwLock::new(HashMap::new()));
    let key = TypeId::of::<T>();

    // Fast path: already cached.
    if let Some(found) = cache
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&key)
    {
        return Arc::clone(found);
    }

    let built = Arc::new(RecordDescriptor::build::<T>());
    // If another thread won the race, keep its entry.
    let mut map = cache.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(map.entry(key).or_insert(built))
}
