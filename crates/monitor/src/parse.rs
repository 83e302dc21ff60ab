//! Description parsing and identity extraction
//!
//! Raw descriptions arrive partially populated; both functions here are
//! pure and push every type-coercion failure into a recoverable error
//! so callers can drop the offending event and keep observing.

use types::description::keys;
use types::{DescriptionError, DescriptionValue, DiskDescription, UsbDisk};
use uuid::Uuid;

/// Extract the stable volume identity from a raw description
///
/// The identity may arrive as a native UUID value or as its string
/// rendering; an absent key, a wrong-typed value, or an unparseable
/// string all resolve to [`DescriptionError::IdentityUnresolvable`].
pub fn extract_volume_id(description: &DiskDescription) -> Result<Uuid, DescriptionError> {
    match description.get(keys::VOLUME_UUID) {
        Some(DescriptionValue::Uuid(uuid)) => Ok(*uuid),
        Some(DescriptionValue::Str(s)) => {
            Uuid::parse_str(s).map_err(|_| DescriptionError::IdentityUnresolvable)
        }
        _ => Err(DescriptionError::IdentityUnresolvable),
    }
}

/// Parse a full disk record from a raw description
///
/// Required fields: volume name, media size (non-negative byte count),
/// media name, and a resolvable identity. The mount path is optional;
/// its presence alone determines mounted-ness. No partial record is
/// ever produced.
pub fn parse_disk(description: &DiskDescription) -> Result<UsbDisk, DescriptionError> {
    let id = extract_volume_id(description)?;

    let name = description
        .str_field(keys::VOLUME_NAME)
        .ok_or(DescriptionError::Incomplete {
            field: keys::VOLUME_NAME,
        })?;

    let size = description
        .int_field(keys::MEDIA_SIZE)
        .ok_or(DescriptionError::Incomplete {
            field: keys::MEDIA_SIZE,
        })?;
    let size_bytes = u64::try_from(size).map_err(|_| DescriptionError::Incomplete {
        field: keys::MEDIA_SIZE,
    })?;

    let media_name = description
        .str_field(keys::MEDIA_NAME)
        .ok_or(DescriptionError::Incomplete {
            field: keys::MEDIA_NAME,
        })?;

    let mount_path = description.path_field(keys::VOLUME_PATH).map(Into::into);

    Ok(UsbDisk {
        id,
        name: name.to_string(),
        mount_path,
        size_bytes,
        media_name: media_name.to_string(),
    })
}
