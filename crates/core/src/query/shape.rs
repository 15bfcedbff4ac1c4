use crate::error::Result;
use crate::metadata::EntityMetadata;

/// Key layout a query runs against, resolved once from metadata.
///
/// Each variant carries exactly the attribute names valid for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape<'m> {
    PrimaryNoSort {
        partition_key: &'m str,
    },
    PrimaryWithSort {
        partition_key: &'m str,
        sort_key: &'m str,
    },
    IndexNoSort {
        index_name: &'m str,
        partition_key: &'m str,
    },
    IndexWithSort {
        index_name: &'m str,
        partition_key: &'m str,
        sort_key: &'m str,
    },
}

impl<'m> QueryShape<'m> {
    /// Resolves the shape of a query on the table or on one of its indexes.
    ///
    /// Fails with a configuration error when the index is not declared.
    pub fn resolve(metadata: &'m EntityMetadata, index_name: Option<&str>) -> Result<Self> {
        let Some(index_name) = index_name else {
            return Ok(match metadata.sort_key.as_deref() {
                Some(sort_key) => QueryShape::PrimaryWithSort {
                    partition_key: &metadata.partition_key,
                    sort_key,
                },
                None => QueryShape::PrimaryNoSort {
                    partition_key: &metadata.partition_key,
                },
            });
        };

        let (index_name, index) = metadata.index_entry(index_name)?;

        Ok(match index.sort_key.as_deref() {
            Some(sort_key) => QueryShape::IndexWithSort {
                index_name,
                partition_key: &index.partition_key,
                sort_key,
            },
            None => QueryShape::IndexNoSort {
                index_name,
                partition_key: &index.partition_key,
            },
        })
    }

    pub fn index_name(&self) -> Option<&'m str> {
        match *self {
            QueryShape::IndexNoSort { index_name, .. }
            | QueryShape::IndexWithSort { index_name, .. } => Some(index_name),
            _ => None,
        }
    }

    pub fn partition_key(&self) -> &'m str {
        match *self {
            QueryShape::PrimaryNoSort { partition_key }
            | QueryShape::PrimaryWithSort { partition_key, .. }
            | QueryShape::IndexNoSort { partition_key, .. }
            | QueryShape::IndexWithSort { partition_key, .. } => partition_key,
        }
    }

    pub fn sort_key(&self) -> Option<&'m str> {
        match *self {
            QueryShape::PrimaryWithSort { sort_key, .. }
            | QueryShape::IndexWithSort { sort_key, .. } => Some(sort_key),
            _ => None,
        }
    }
}
