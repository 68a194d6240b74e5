//! Command dispatch

use std::io::Write;

use avance_cart::{
    cart::CartChange,
    catalog::Catalog,
    observer::CartBadge,
    products::Product,
    storage::{CartStorage, FileStorage},
    store::CartStore,
};
use tracing::info;

use crate::{
    config::{CliConfig, Command, CorruptPolicy},
    error::CliError,
    render,
};

/// Open the cart in the configured data directory and run the requested command.
pub(crate) fn run(config: &CliConfig, out: &mut impl Write) -> Result<(), CliError> {
    let catalog = Catalog::avance()?;
    let storage = FileStorage::new(&config.data_dir);

    let store = match config.on_corrupt {
        CorruptPolicy::Fail => CartStore::load(storage)?,
        CorruptPolicy::Reset => CartStore::load_or_reset(storage)?,
    };

    info!(data_dir = %config.data_dir.display(), "opened cart");

    let mut store = store.with_observer(CartBadge::default());

    execute(&config.command, &catalog, &mut store, out)
}

/// Run one command against an open store, writing the resulting page to `out`.
pub(crate) fn execute<S: CartStorage>(
    command: &Command,
    catalog: &Catalog,
    store: &mut CartStore<S, CartBadge>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Shop => {
            writeln!(out, "{}", render::header(store.observer()))?;
            writeln!(out, "{}", render::catalog_table(catalog))?;
        }
        Command::Product { id } => {
            let product = lookup(catalog, id)?;

            writeln!(out, "{}", render::header(store.observer()))?;
            write!(out, "{}", render::product_detail(product))?;
        }
        Command::Add { id } => {
            let product = lookup(catalog, id)?;

            store.add_product(product)?;

            writeln!(out, "Added {} to cart", product.name)?;
            writeln!(out, "{}", render::header(store.observer()))?;
        }
        Command::Inc { id } => {
            let change = store.increment(id)?;

            report_update(store, id, &change, out)?;
        }
        Command::Dec { id } => {
            let change = store.decrement(id)?;

            report_update(store, id, &change, out)?;
        }
        Command::Remove { id } => {
            match store.remove_item(id)? {
                CartChange::Removed { .. } => writeln!(out, "Removed {id} from cart")?,
                _ => writeln!(out, "{id} is not in the cart")?,
            }

            writeln!(out, "{}", render::header(store.observer()))?;
        }
        Command::Clear => {
            store.clear()?;

            writeln!(out, "Cart cleared")?;
            writeln!(out, "{}", render::header(store.observer()))?;
        }
        Command::Cart => {
            let lines = store.display_items(catalog);
            let subtotal = store.subtotal()?;

            writeln!(out, "{}", render::header(store.observer()))?;
            write!(out, "{}", render::cart_page(&lines, &subtotal)?)?;
        }
        Command::Checkout => {
            info!(count = store.item_count(), "checkout requested");

            writeln!(out, "Checkout is not available yet; your cart has been kept.")?;
        }
    }

    Ok(())
}

fn lookup<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a Product, CliError> {
    catalog
        .get(id)
        .ok_or_else(|| CliError::ProductNotFound(id.to_string()))
}

fn report_update<S: CartStorage>(
    store: &CartStore<S, CartBadge>,
    id: &str,
    change: &CartChange,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match change {
        CartChange::QuantityChanged { quantity, .. } => {
            writeln!(out, "{id} quantity is now {quantity}")?;
        }
        CartChange::Removed { .. } => writeln!(out, "Removed {id} from cart")?,
        _ => writeln!(out, "{id} is not in the cart")?,
    }

    writeln!(out, "{}", render::header(store.observer()))?;

    Ok(())
}
