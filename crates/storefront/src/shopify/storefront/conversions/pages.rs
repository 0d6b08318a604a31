//! Content page conversion functions.

use crate::shopify::types::{Page, Seo};

use super::super::queries::page;

pub fn convert_page(page: page::Page) -> Page {
    Page {
        id: page.id,
        handle: page.handle,
        title: page.title,
        body: page.body,
        seo: page
            .seo
            .map(|seo| Seo {
                title: seo.title,
                description: seo.description,
            })
            .unwrap_or_default(),
    }
}
