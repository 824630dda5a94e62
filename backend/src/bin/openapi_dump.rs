//! Print the tracker's OpenAPI document as pretty JSON on stdout.

use color_eyre::eyre::{Context, Result};
use revision_tracker::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("failed to serialise the OpenAPI document")?;
    println!("{json}");
    Ok(())
}
