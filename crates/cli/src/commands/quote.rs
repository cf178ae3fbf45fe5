//! `ecostore quote` - price a cart against the demo catalog.

use std::fmt::Write as _;

use ecostore_core::{OrderTotals, PricedLine, PricingPolicy, ProductId, PromoCode};
use ecostore_storefront::config::StorefrontConfig;
use ecostore_storefront::db::seed::demo_products;

use super::CliError;

/// A `PRODUCT_ID:QUANTITY` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineArg {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Parse `PRODUCT_ID:QUANTITY`. The quantity defaults to 1.
///
/// # Errors
///
/// Returns a message clap shows next to the offending argument.
pub fn parse_line(s: &str) -> Result<LineArg, String> {
    let (id, quantity) = s.split_once(':').unwrap_or((s, "1"));
    let product_id: ProductId = id
        .parse()
        .map_err(|_| format!("invalid product id `{id}`"))?;
    let quantity: u32 = quantity
        .trim()
        .parse()
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| format!("invalid quantity `{quantity}`"))?;
    Ok(LineArg {
        product_id,
        quantity,
    })
}

/// Price `items` with `pricing`. Demo product ids follow catalog order,
/// starting at 1.
///
/// # Errors
///
/// Returns an error for an unknown product id or promo code.
pub fn quote(
    pricing: &PricingPolicy,
    items: &[LineArg],
    promo: Option<&str>,
) -> Result<(Vec<String>, OrderTotals), CliError> {
    let promo = promo.map(str::parse::<PromoCode>).transpose()?;
    let catalog = demo_products();

    let mut names = Vec::with_capacity(items.len());
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let product = usize::try_from(item.product_id.as_i32())
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|index| catalog.get(index))
            .ok_or(CliError::UnknownProduct(item.product_id))?;
        names.push(format!(
            "{} x{} @ {}",
            product.name,
            item.quantity,
            product.price.format_inr()
        ));
        lines.push(PricedLine::new(product.price, item.quantity));
    }

    Ok((names, pricing.quote(&lines, promo)))
}

fn render(names: &[String], totals: &OrderTotals) -> String {
    let mut out = String::new();
    for name in names {
        let _ = writeln!(out, "  {name}");
    }
    let _ = writeln!(out, "Subtotal:  {}", totals.subtotal.format_inr());
    let _ = writeln!(out, "Shipping:  {}", totals.shipping.format_inr());
    let _ = writeln!(out, "Tax:       {}", totals.tax.format_inr());
    if let Some(code) = totals.promo_code {
        let _ = writeln!(out, "Discount:  -{} ({code})", totals.discount.format_inr());
    }
    let _ = writeln!(out, "Total:     {}", totals.total.format_inr());
    if let Some(remaining) = totals.free_shipping_remaining {
        let _ = writeln!(
            out,
            "Add {} more for free shipping",
            remaining.format_inr()
        );
    }
    out
}

/// Print a quote using the configured pricing policy.
///
/// # Errors
///
/// Returns an error if configuration is invalid or a line cannot be priced.
#[allow(clippy::print_stdout)]
pub fn print(items: &[LineArg], promo: Option<&str>) -> Result<(), CliError> {
    let config = StorefrontConfig::from_env()?;
    let (names, totals) = quote(&config.pricing, items, promo)?;
    print!("{}", render(&names, &totals));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecostore_core::Price;

    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line("3:2").unwrap(),
            LineArg {
                product_id: ProductId::new(3),
                quantity: 2
            }
        );
        assert_eq!(parse_line("7").unwrap().quantity, 1);
        assert!(parse_line("x:2").is_err());
        assert!(parse_line("1:0").is_err());
    }

    #[test]
    fn test_quote_demo_cart() {
        let items = [parse_line("1:2").unwrap(), parse_line("3:1").unwrap()];
        let (names, totals) = quote(&PricingPolicy::default(), &items, Some("save10")).unwrap();

        assert_eq!(names.len(), 2);
        assert_eq!(totals.subtotal, Price::from_paise(7997));
        assert_eq!(totals.promo_code, Some(PromoCode::Save10));

        let text = render(&names, &totals);
        assert!(text.contains("Eco-Friendly Water Bottle x2 @ ₹29.99"));
        assert!(text.contains("(SAVE10)"));
        assert!(text.contains("more for free shipping"));
    }

    #[test]
    fn test_quote_rejects_unknown_ids_and_codes() {
        let items = [parse_line("21:1").unwrap()];
        assert!(matches!(
            quote(&PricingPolicy::default(), &items, None),
            Err(CliError::UnknownProduct(_))
        ));
        let items = [parse_line("1:1").unwrap()];
        assert!(matches!(
            quote(&PricingPolicy::default(), &items, Some("FREEBIE")),
            Err(CliError::Promo(_))
        ));
    }
}
