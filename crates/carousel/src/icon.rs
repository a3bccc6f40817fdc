use derive_more::{AsRef, Deref, Display, From, Into};
use freedesktop_icons::lookup;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ICON_LOOKUP_SIZE: u16 = 256;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconName(String);

crate::impl_string_newtype!(IconName);

/// Resolves an icon theme name, or an absolute path, to a file.
pub fn find_icon_path(icon_name: &IconName) -> Option<PathBuf> {
    if icon_name.is_empty() {
        return None;
    }

    let path = Path::new(icon_name.as_ref());
    if path.is_absolute() {
        return path.exists().then(|| path.to_path_buf());
    }

    lookup(icon_name.as_ref())
        .with_size(ICON_LOOKUP_SIZE)
        .with_scale(1)
        .find()
}
