//! Collection type conversion functions.

use crate::shopify::types::Collection;

use super::super::queries::featured_collection;
use super::products::convert_image;

pub fn convert_collection(collection: featured_collection::Collection) -> Collection {
    Collection {
        id: collection.id,
        handle: collection.handle,
        title: collection.title,
        image: collection.image.map(convert_image),
    }
}
