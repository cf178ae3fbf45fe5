//! `ecostore catalog` - dump the demo catalog.

use clap::ValueEnum;

use ecostore_storefront::db::seed::demo_products;

use super::CliError;

/// Output formats for catalog export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Yaml,
}

/// Render the demo catalog in `format`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(format: Format) -> Result<String, CliError> {
    let products = demo_products();
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(&products)?,
        Format::Yaml => serde_yaml::to_string(&products)?,
    })
}

/// Print the demo catalog.
///
/// # Errors
///
/// Returns an error if serialization fails.
#[allow(clippy::print_stdout)]
pub fn print(format: Format) -> Result<(), CliError> {
    println!("{}", render(format)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_json_lists_every_product() {
        let json: serde_json::Value = serde_json::from_str(&render(Format::Json).unwrap()).unwrap();
        let products = json.as_array().unwrap();
        assert_eq!(products.len(), 20);
        assert_eq!(products.first().unwrap()["name"], "Eco-Friendly Water Bottle");
        assert_eq!(products.first().unwrap()["price"], "29.99");
    }

    #[test]
    fn test_yaml_output() {
        let yaml = render(Format::Yaml).unwrap();
        assert!(yaml.contains("name: Eco-Friendly Water Bottle"));
        assert!(yaml.contains("isEcoFriendly: true"));
    }
}
