use std::any::Any;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::HubClient;
use crate::error::{HubApiError, Result};

// ---------------------------------------------------------------------------
// Materialization: wire JSON <-> typed objects
// ---------------------------------------------------------------------------

/// Conversion between raw JSON values and typed records.
///
/// Materialization is deliberately permissive about absent keys (they take the
/// declared defaults, tolerating server schema evolution) but strict about
/// values it does not recognize: an out-of-domain enum string or a malformed
/// nested structure fails the whole conversion, and no partial object is
/// produced.
pub trait Materialize: Serialize + DeserializeOwned {
    /// Name used in materialization error messages.
    const WIRE_NAME: &'static str;

    fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| HubApiError::Materialize {
            kind: Self::WIRE_NAME,
            message: e.to_string(),
        })
    }

    /// Inverse of [`from_value`](Materialize::from_value). Back-reference
    /// fields are marked `#[serde(skip)]` and never appear in the output.
    fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| HubApiError::Materialize {
            kind: Self::WIRE_NAME,
            message: e.to_string(),
        })
    }
}

/// Binds the owning client into a freshly materialized object, recursing into
/// nested entities so that every level can perform follow-up calls.
pub trait Attach {
    fn attach(&mut self, client: &HubClient);
}

// ---------------------------------------------------------------------------
// Entity identity
// ---------------------------------------------------------------------------

/// A server-owned record with a stable identifier and audit timestamps.
pub trait Entity: Any {
    fn entity_id(&self) -> Option<&str>;
    fn kind_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
}

/// Static entity kind name, used for error messages where no instance is at
/// hand (object safety keeps it out of [`Entity`] itself).
pub trait EntityKind {
    const KIND: &'static str;
}

/// Either a raw identifier or a typed entity. Resource methods accept
/// `impl Into<EntityRef>` so callers never need to extract `.id` manually.
pub enum EntityRef<'a> {
    Id(&'a str),
    Object(&'a dyn Entity),
}

impl<'a> From<&'a str> for EntityRef<'a> {
    fn from(id: &'a str) -> Self {
        EntityRef::Id(id)
    }
}

impl<'a> From<&'a String> for EntityRef<'a> {
    fn from(id: &'a String) -> Self {
        EntityRef::Id(id)
    }
}

/// Resolve an entity-or-id argument to the identifier string.
///
/// Fails with [`HubApiError::TypeMismatch`] if a typed object of the wrong
/// kind is passed, and with [`HubApiError::DetachedEntity`] if the object has
/// no id yet.
pub fn entity_to_id<'a, T>(value: impl Into<EntityRef<'a>>) -> Result<String>
where
    T: Entity + EntityKind,
{
    match value.into() {
        EntityRef::Id(id) => Ok(id.to_string()),
        EntityRef::Object(entity) => {
            if !entity.as_any().is::<T>() {
                return Err(HubApiError::TypeMismatch {
                    expected: T::KIND,
                    actual: entity.kind_name(),
                });
            }
            entity
                .entity_id()
                .map(str::to_string)
                .ok_or_else(|| HubApiError::DetachedEntity {
                    kind: T::KIND,
                    id: None,
                })
        }
    }
}

/// Precondition guard for operations that need both a back-reference and an
/// id (refresh, nested-resource creation). Checked before any network call so
/// a purely local failure never surfaces as a transport error.
pub fn require_attached(
    kind: &'static str,
    client: &Option<HubClient>,
    id: &Option<String>,
) -> Result<(HubClient, String)> {
    match (client, id) {
        (Some(client), Some(id)) => Ok((client.clone(), id.clone())),
        _ => Err(HubApiError::DetachedEntity {
            kind,
            id: id.clone(),
        }),
    }
}
