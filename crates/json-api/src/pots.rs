//! Pot Requests
//!
//! Clients send catalog identifiers only. Names are read back from the
//! catalog and every pot is priced from the size table.

use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use sorveteria::pots::{AdditionalRef, CatalogRef, FlavorRef, Pot, RefSet, Size};
use sorveteria_app::domain::catalog::{
    CatalogService, CatalogServiceError,
    records::{AdditionalRecord, FlavorRecord},
};

use crate::extensions::*;

/// Pot Request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct PotRequest {
    /// Pot size (`pequeno`, `medio` or `grande`)
    pub size: String,

    /// Flavor identifiers; repeats are ignored
    #[serde(default)]
    pub flavors: Vec<Uuid>,

    /// Additional identifiers; repeats are ignored
    #[serde(default)]
    pub additionals: Vec<Uuid>,
}

/// Catalog reference as shown on orders and favorites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CatalogRefResponse {
    /// Catalog identifier
    pub uuid: Uuid,

    /// Display name
    pub name: String,
}

impl From<&FlavorRef> for CatalogRefResponse {
    fn from(flavor: &FlavorRef) -> Self {
        Self {
            uuid: flavor.uuid,
            name: flavor.name.clone(),
        }
    }
}

impl From<&AdditionalRef> for CatalogRefResponse {
    fn from(additional: &AdditionalRef) -> Self {
        Self {
            uuid: additional.uuid,
            name: additional.name.clone(),
        }
    }
}

pub(crate) fn refs_response<T>(refs: &RefSet<T>) -> Vec<CatalogRefResponse>
where
    T: CatalogRef + Clone,
    for<'a> &'a T: Into<CatalogRefResponse>,
{
    refs.iter().map(Into::into).collect()
}

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::InvalidReference(uuid) => StatusError::bad_request()
            .brief("Unknown flavor or additional")
            .detail(uuid.to_string()),
        CatalogServiceError::Sql(source) => {
            error!("failed to read catalog: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// Turns pot requests into priced pots with catalog names attached.
pub(crate) async fn resolve_pots(
    catalog: &dyn CatalogService,
    requests: &[PotRequest],
) -> Result<Vec<Pot>, StatusError> {
    let sizes = requests
        .iter()
        .map(|request| request.size.parse::<Size>())
        .collect::<Result<Vec<_>, _>>()
        .or_400("Unknown pot size")?;

    let flavors = fetch_flavors(catalog, distinct(requests.iter().flat_map(|r| &r.flavors))).await?;
    let additionals =
        fetch_additionals(catalog, distinct(requests.iter().flat_map(|r| &r.additionals))).await?;

    requests
        .iter()
        .zip(sizes)
        .map(|(request, size)| {
            let mut pot = Pot::new(size);

            for uuid in &request.flavors {
                pot.add_flavor(lookup(&flavors, *uuid)?);
            }

            for uuid in &request.additionals {
                pot.add_additional(lookup(&additionals, *uuid)?);
            }

            Ok(pot)
        })
        .collect()
}

async fn fetch_flavors(
    catalog: &dyn CatalogService,
    uuids: Vec<Uuid>,
) -> Result<Vec<FlavorRef>, StatusError> {
    if uuids.is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<FlavorRecord> = catalog
        .get_flavors(uuids)
        .await
        .map_err(into_status_error)?;

    if let Some(record) = records.iter().find(|record| !record.active) {
        return Err(unavailable(&record.name));
    }

    Ok(records.iter().map(FlavorRef::from).collect())
}

async fn fetch_additionals(
    catalog: &dyn CatalogService,
    uuids: Vec<Uuid>,
) -> Result<Vec<AdditionalRef>, StatusError> {
    if uuids.is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<AdditionalRecord> = catalog
        .get_additionals(uuids)
        .await
        .map_err(into_status_error)?;

    if let Some(record) = records.iter().find(|record| !record.active) {
        return Err(unavailable(&record.name));
    }

    Ok(records.iter().map(AdditionalRef::from).collect())
}

fn unavailable(name: &str) -> StatusError {
    StatusError::bad_request()
        .brief("Catalog item is not available")
        .detail(name.to_string())
}

fn lookup<T: CatalogRef + Clone>(refs: &[T], uuid: Uuid) -> Result<T, StatusError> {
    refs.iter()
        .find(|reference| reference.uuid() == uuid)
        .cloned()
        .ok_or_else(|| StatusError::bad_request().brief("Unknown flavor or additional"))
}

fn distinct<'a>(uuids: impl Iterator<Item = &'a Uuid>) -> Vec<Uuid> {
    let mut distinct: Vec<Uuid> = Vec::new();

    for uuid in uuids {
        if !distinct.contains(uuid) {
            distinct.push(*uuid);
        }
    }

    distinct
}
