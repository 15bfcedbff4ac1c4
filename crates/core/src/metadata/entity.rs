use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};

use super::EntityMetadata;
use crate::error::Result;

/// A domain type persisted through dynamap.
///
/// Metadata is a property of the type, so it can be looked up without
/// constructing an instance.
///
/// ```
/// use std::sync::LazyLock;
///
/// use dynamap_core::{Entity, EntityMetadata};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct User {
///     id: String,
///     name: String,
/// }
///
/// static USER: LazyLock<EntityMetadata> = LazyLock::new(|| EntityMetadata::new("users", "id"));
///
/// impl Entity for User {
///     fn metadata() -> &'static EntityMetadata {
///         &USER
///     }
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Returns the type's table and key layout.
    fn metadata() -> &'static EntityMetadata;
}

/// Returns the validated metadata of `T`.
///
/// Fails with a configuration error when the type returns metadata that was
/// never filled in (for example `EntityMetadata::default()`).
pub fn metadata_of<T: Entity>() -> Result<&'static EntityMetadata> {
    let metadata = T::metadata();
    metadata.validate()?;
    Ok(metadata)
}

/// An entity value paired with the metadata it was read with.
///
/// Serializing a record only serializes the value.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<'m, T> {
    metadata: &'m EntityMetadata,
    value: T,
}

impl<'m, T> Record<'m, T> {
    pub fn new(metadata: &'m EntityMetadata, value: T) -> Self {
        Self { metadata, value }
    }

    pub fn metadata(&self) -> &'m EntityMetadata {
        self.metadata
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (&'m EntityMetadata, T) {
        (self.metadata, self.value)
    }
}

impl<T> Deref for Record<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Serialize> Serialize for Record<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}
