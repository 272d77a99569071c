//! Sellers command - one-shot viewport query.

use sellermap::geo::{GeoPoint, Viewport, ViewportQuery};

use super::output;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the sellers command.
pub struct SellersArgs {
    pub lat: f64,
    pub lon: f64,
    pub radius: Option<u32>,
    pub api_url: Option<String>,
    pub verbose: bool,
}

/// Run the sellers command.
pub fn run(args: SellersArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.verbose)?;
    runner.log_startup("sellers");

    let query = build_query(args.lat, args.lon, args.radius)?;
    let api = runner.api_client(args.api_url)?;

    println!(
        "Sellers within {} m of {:.5}, {:.5} ({})",
        query.radius,
        query.lat,
        query.lon,
        api.base_url()
    );
    println!();

    let sellers = runner.block_on(api.fetch_sellers_in_viewport(&query))?;
    output::print_sellers(&sellers);

    Ok(())
}

/// Query around a point; without a radius the default map region is covered.
fn build_query(lat: f64, lon: f64, radius: Option<u32>) -> Result<ViewportQuery, CliError> {
    let center = GeoPoint::new(lat, lon)?;
    let query = match radius {
        Some(0) => {
            return Err(CliError::InvalidInput(
                "radius must be at least 1 meter".to_string(),
            ))
        }
        Some(radius) => ViewportQuery {
            lat: center.latitude,
            lon: center.longitude,
            radius,
        },
        None => ViewportQuery::from_viewport(&Viewport::around(center)),
    };
    Ok(query)
}
