//! Header and menu conversion functions.

use coffee_cup_hut_core::menu::{MenuItem, MenuLink};

use crate::shopify::types::{Header, Shop};

use super::super::queries::header;

pub fn convert_header(data: header::ResponseData) -> Header {
    Header {
        shop: Shop {
            name: data.shop.name,
            primary_domain_url: data.shop.primary_domain.url,
        },
        menu: data
            .menu
            .map(|menu| menu.items.into_iter().map(convert_menu_item).collect()),
    }
}

fn convert_menu_item(item: header::MenuItem) -> MenuItem {
    let link = MenuLink {
        id: item.id,
        title: item.title,
        url: item.url.filter(|url| !url.is_empty()),
    };
    MenuItem::new(link, item.items.into_iter().map(convert_menu_item).collect())
}
