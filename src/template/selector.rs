//! Template selection: purpose filter, then market filter, then first survivor.

use super::TemplateDescriptor;

/// Keep descriptors whose name contains `purpose` (case-insensitive).
pub fn filter_by_purpose<'a>(
    templates: &'a [TemplateDescriptor],
    purpose: &str,
) -> Vec<&'a TemplateDescriptor> {
    let purpose = purpose.to_lowercase();
    templates
        .iter()
        .filter(|t| t.name.to_lowercase().contains(&purpose))
        .collect()
}

/// Keep descriptors whose market segment contains `market` (case-insensitive).
///
/// Names without a second `-` segment never match.
pub fn filter_by_market<'a>(
    templates: Vec<&'a TemplateDescriptor>,
    market: &str,
) -> Vec<&'a TemplateDescriptor> {
    let market = market.to_lowercase();
    templates
        .into_iter()
        .filter(|t| {
            t.market_code()
                .is_some_and(|code| code.to_lowercase().contains(&market))
        })
        .collect()
}

/// Pick the template for a purpose and market. `None` means no variant
/// exists for that market.
pub fn select_template<'a>(
    templates: &'a [TemplateDescriptor],
    purpose: &str,
    market: &str,
) -> Option<&'a TemplateDescriptor> {
    let by_purpose = filter_by_purpose(templates, purpose);
    filter_by_market(by_purpose, market).into_iter().next()
}
