//! Rendering: project [`InvoiceData`] into an HTML table.
//!
//! Rendering is a pure function of its input: no counters, no clocks, no
//! ids. Rendering the same invoice twice yields byte-identical markup.
//!
//! Labels are Hebrew and money is formatted the way the he-IL locale formats
//! ILS: a leading right-to-left mark, `,` thousands separators, two decimals,
//! a no-break space and the `₪` sign.

use crate::model::{InvoiceData, LineItem};

/// Shekel sign.
const CURRENCY_SYMBOL: char = '₪';
/// U+200F RIGHT-TO-LEFT MARK, prefixed by the he-IL currency pattern.
const RLM: char = '\u{200F}';
/// U+00A0 NO-BREAK SPACE between amount and symbol.
const NBSP: char = '\u{00A0}';

/// VAT rate printed in the tax row label.
pub const TAX_RATE_LABEL: &str = "17%";

const HEADER_DESCRIPTION: &str = "תיאור";
const HEADER_QUANTITY: &str = "כמות";
const HEADER_UNIT_PRICE: &str = "מחיר יחידה";
const HEADER_TOTAL: &str = "סה\"כ";
const LABEL_SUBTOTAL: &str = "סה\"כ לפני מע\"מ:";
const LABEL_GRAND_TOTAL: &str = "סה\"כ כולל מע\"מ:";

/// Render the result fragment: heading plus the invoice table.
///
/// Body rows follow `line_items` order. The footer always has three rows:
/// subtotal, tax and the emphasised grand total.
pub fn render_invoice(invoice: &InvoiceData) -> String {
    let mut html = String::new();
    html.push_str("<h3>Processing Results</h3>\n");
    html.push_str("<div class=\"table-responsive\">\n");
    html.push_str("  <table class=\"table table-bordered\">\n");

    html.push_str("    <thead>\n      <tr>\n");
    for header in [HEADER_DESCRIPTION, HEADER_QUANTITY, HEADER_UNIT_PRICE, HEADER_TOTAL] {
        html.push_str(&format!("        <th>{}</th>\n", escape_html(header)));
    }
    html.push_str("      </tr>\n    </thead>\n");

    html.push_str("    <tbody>\n");
    for item in &invoice.line_items {
        html.push_str(&render_line_item(item));
    }
    html.push_str("    </tbody>\n");

    let totals = &invoice.totals;
    html.push_str("    <tfoot>\n");
    html.push_str(&footer_row(LABEL_SUBTOTAL, totals.subtotal, false));
    html.push_str(&footer_row(
        &format!("מע\"מ ({TAX_RATE_LABEL}):"),
        totals.tax,
        false,
    ));
    html.push_str(&footer_row(LABEL_GRAND_TOTAL, totals.total, true));
    html.push_str("    </tfoot>\n");

    html.push_str("  </table>\n</div>\n");
    html
}

/// Wrap [`render_invoice`] in a standalone right-to-left HTML page.
///
/// Invoice number, date and issuer are shown above the table when the API
/// returned them.
pub fn render_document(invoice: &InvoiceData) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"he\" dir=\"rtl\">\n<head>\n  <meta charset=\"utf-8\">\n  <title>Invoice</title>\n</head>\n<body>\n",
    );

    let mut details = Vec::new();
    if let Some(company) = &invoice.company_details {
        for value in [&company.name, &company.address, &company.tax_id]
            .into_iter()
            .flatten()
        {
            details.push(escape_html(value));
        }
    }
    if let Some(number) = &invoice.invoice_number {
        details.push(format!("#{}", escape_html(number)));
    }
    if let Some(date) = &invoice.date {
        details.push(escape_html(date));
    }
    if !details.is_empty() {
        html.push_str(&format!("<p class=\"invoice-details\">{}</p>\n", details.join(" | ")));
    }

    html.push_str(&render_invoice(invoice));
    html.push_str("</body>\n</html>\n");
    html
}

fn render_line_item(item: &LineItem) -> String {
    format!(
        "      <tr>\n        <td>{}</td>\n        <td class=\"text-center\">{}</td>\n        <td class=\"text-center\">{}</td>\n        <td class=\"text-center\">{}</td>\n      </tr>\n",
        escape_html(&item.description),
        format_quantity(item.quantity),
        format_currency(item.unit_price),
        format_currency(item.total),
    )
}

fn footer_row(label: &str, amount: f64, emphasise: bool) -> String {
    let label = escape_html(label);
    let amount = format_currency(amount);
    if emphasise {
        format!(
            "      <tr>\n        <td colspan=\"3\" class=\"text-end\"><strong>{label}</strong></td>\n        <td class=\"text-center\"><strong>{amount}</strong></td>\n      </tr>\n"
        )
    } else {
        format!(
            "      <tr>\n        <td colspan=\"3\" class=\"text-end\">{label}</td>\n        <td class=\"text-center\">{amount}</td>\n      </tr>\n"
        )
    }
}

/// Format an amount as he-IL shekels, e.g. `1234.5` → `"\u{200F}1,234.50\u{A0}₪"`.
///
/// Rounds to two decimals, half-cent ties away from zero. Negative amounts
/// keep their minus even when they round to zero (`-0.001` → `-0.00`).
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("{RLM}{amount}{NBSP}{CURRENCY_SYMBOL}");
    }

    let fixed = to_fixed_cents(amount.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount.is_sign_negative() { "-" } else { "" };

    format!(
        "{RLM}{sign}{}.{dec_part}{NBSP}{CURRENCY_SYMBOL}",
        group_thousands(int_part)
    )
}

/// Two-decimal fixed notation of a non-negative value, ties rounded up.
///
/// `{:.2}` rounds the exact binary value to nearest but breaks exact ties
/// to even. An f64 sits exactly on a half cent only when it is an odd
/// number of eighths, so its last three decimals are `125`, `375`, `625`
/// or `875` and rounding up never carries past the cents.
fn to_fixed_cents(value: f64) -> String {
    let eighths = value * 8.0;
    if eighths.fract() != 0.0 || eighths % 2.0 != 1.0 {
        return format!("{value:.2}");
    }

    let exact = format!("{value:.3}");
    let (head, tail) = exact.split_at(exact.len() - 2);
    let cent = if tail == "25" { '3' } else { '8' };
    format!("{head}{cent}")
}

/// Quantities print in their shortest form: `2`, `7.5`, `0.25`.
pub fn format_quantity(quantity: f64) -> String {
    quantity.to_string()
}

/// Insert `,` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Escape text for use inside HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompanyDetails, Totals};

    fn sample() -> InvoiceData {
        InvoiceData {
            line_items: vec![
                LineItem {
                    description: "Item A".into(),
                    quantity: 2.0,
                    unit_price: 10.0,
                    total: 20.0,
                },
                LineItem {
                    description: "המבורגר ילדים".into(),
                    quantity: 7.0,
                    unit_price: 38.0,
                    total: 266.0,
                },
            ],
            totals: Totals {
                subtotal: 286.0,
                tax: 48.62,
                total: 334.62,
            },
            company_details: None,
            invoice_number: None,
            date: None,
        }
    }

    fn shekels(s: &str) -> String {
        format!("\u{200F}{s}\u{00A0}₪")
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(1234.5), shekels("1,234.50"));
        assert_eq!(format_currency(10.0), shekels("10.00"));
        assert_eq!(format_currency(0.0), shekels("0.00"));
        assert_eq!(format_currency(3.4), shekels("3.40"));
        assert_eq!(format_currency(1_000_000.0), shekels("1,000,000.00"));
        assert_eq!(format_currency(999.999), shekels("1,000.00"));
        assert_eq!(format_currency(-42.1), shekels("-42.10"));
    }

    #[test]
    fn half_cent_ties_round_away_from_zero() {
        assert_eq!(format_currency(0.125), shekels("0.13"));
        assert_eq!(format_currency(1234.625), shekels("1,234.63"));
        assert_eq!(format_currency(0.375), shekels("0.38"));
        assert_eq!(format_currency(2.875), shekels("2.88"));
        assert_eq!(format_currency(-1234.625), shekels("-1,234.63"));
        // 1.005 is stored just below the tie
        assert_eq!(format_currency(1.005), shekels("1.00"));
    }

    #[test]
    fn negative_amounts_rounding_to_zero_keep_sign() {
        assert_eq!(format_currency(-0.001), shekels("-0.00"));
        assert_eq!(format_currency(-0.0), shekels("-0.00"));
        assert_eq!(format_currency(0.001), shekels("0.00"));
    }

    #[test]
    fn fixed_cents() {
        assert_eq!(to_fixed_cents(99.875), "99.88");
        assert_eq!(to_fixed_cents(0.625), "0.63");
        assert_eq!(to_fixed_cents(0.5), "0.50");
        assert_eq!(to_fixed_cents(0.25), "0.25");
        assert_eq!(to_fixed_cents(12.0), "12.00");
    }

    #[test]
    fn quantity_formatting() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(7.5), "7.5");
        assert_eq!(format_quantity(0.25), "0.25");
    }

    #[test]
    fn grouping() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }

    #[test]
    fn rows_in_item_order() {
        let html = render_invoice(&sample());
        let a = html.find("Item A").unwrap();
        let b = html.find("המבורגר ילדים").unwrap();
        assert!(a < b);
        assert_eq!(html.matches("<tr>").count(), 1 + 2 + 3);
    }

    #[test]
    fn row_columns_in_order() {
        let html = render_invoice(&sample());
        let row_start = html.find("<td>Item A</td>").unwrap();
        let row = &html[row_start..row_start + html[row_start..].find("</tr>").unwrap()];
        let qty = row.find(">2<").unwrap();
        let price = row.find(&shekels("10.00")).unwrap();
        let total = row.find(&shekels("20.00")).unwrap();
        assert!(qty < price && price < total);
    }

    #[test]
    fn footer_order_and_labels() {
        let html = render_invoice(&sample());
        let footer = &html[html.find("<tfoot>").unwrap()..];
        let sub = footer.find("סה&quot;כ לפני מע&quot;מ:").unwrap();
        let tax = footer.find("(17%)").unwrap();
        let total = footer.find("<strong>סה&quot;כ כולל מע&quot;מ:</strong>").unwrap();
        assert!(sub < tax && tax < total);
        assert!(footer.contains(&format!("<strong>{}</strong>", shekels("334.62"))));
        assert!(footer.contains(&shekels("48.62")));
    }

    #[test]
    fn empty_invoice_still_has_footer() {
        let mut inv = sample();
        inv.line_items.clear();
        let html = render_invoice(&inv);
        assert!(html.contains("<tbody>\n    </tbody>"));
        assert_eq!(html.matches("<tr>").count(), 4);
    }

    #[test]
    fn rendering_is_idempotent() {
        let inv = sample();
        let before = inv.clone();
        assert_eq!(render_invoice(&inv), render_invoice(&inv));
        assert_eq!(inv, before);
    }

    #[test]
    fn descriptions_are_escaped() {
        let mut inv = sample();
        inv.line_items[0].description = "<script>alert('x')</script> & co".into();
        let html = render_invoice(&inv);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; co"));
    }

    #[test]
    fn document_wraps_fragment_with_details() {
        let mut inv = sample();
        inv.invoice_number = Some("1043".into());
        inv.company_details = Some(CompanyDetails {
            name: Some("Burger Bar".into()),
            ..Default::default()
        });
        let doc = render_document(&inv);
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("dir=\"rtl\""));
        assert!(doc.contains("Burger Bar | #1043"));
        assert!(doc.contains(&render_invoice(&inv)));
    }
}
