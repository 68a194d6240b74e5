//! Page rendering

use std::fmt::Write;

use avance_cart::{
    catalog::Catalog,
    items::DisplayLineItem,
    observer::CartBadge,
    pricing::{TotalPriceError, format_money},
    products::Product,
};
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

/// Header line with the cart badge; the count is omitted when the cart is empty.
pub(crate) fn header(badge: &CartBadge) -> String {
    match badge.label() {
        Some(count) => format!("AVANCE  ·  Cart ({count})"),
        None => "AVANCE  ·  Cart".to_string(),
    }
}

/// Catalog listing for the shop page.
pub(crate) fn catalog_table(catalog: &Catalog) -> String {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Product", "Price"]);

    for product in catalog.iter() {
        builder.push_record([
            product.id.clone(),
            product.name.clone(),
            format_money(&product.price),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.modify(Columns::new(2..3), Alignment::right());

    table.to_string()
}

/// Product detail page.
pub(crate) fn product_detail(product: &Product) -> String {
    let mut page = String::new();

    _ = writeln!(page, "{}", product.name);
    _ = writeln!(page, "{}", format_money(&product.price));
    _ = writeln!(page);
    _ = writeln!(page, "{}", product.description);
    _ = writeln!(page);
    _ = writeln!(page, "Features");

    for feature in &product.features {
        _ = writeln!(page, "  - {feature}");
    }

    _ = writeln!(page);
    _ = writeln!(page, "Images: {}", product.images.join(", "));

    page
}

/// Cart page: one row per line, followed by the summary.
pub(crate) fn cart_page(
    lines: &[DisplayLineItem<'_>],
    subtotal: &Money<'_, Currency>,
) -> Result<String, TotalPriceError> {
    if lines.is_empty() {
        return Ok(
            "Your cart is empty\nDiscover our products and add them to your cart.\n".to_string(),
        );
    }

    let mut builder = Builder::default();

    builder.push_record(["Image", "Product", "Price", "Qty", "Total"]);

    for line in lines {
        builder.push_record([
            line.thumbnail().to_string(),
            line.item().name().to_string(),
            line.formatted_price(),
            line.item().quantity().to_string(),
            line.formatted_line_total()?,
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.modify(Columns::new(2..5), Alignment::right());

    let subtotal = format_money(subtotal);
    let mut page = table.to_string();

    _ = writeln!(page);
    _ = writeln!(page, "Subtotal  {subtotal}");
    _ = writeln!(page, "Shipping  Calculated at checkout");
    _ = writeln!(page, "Total     {subtotal}");

    Ok(page)
}
