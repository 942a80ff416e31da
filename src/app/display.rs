use crossterm::style::Stylize;

use super::catalog::Catalog;

pub(crate) fn fullwidth(value: usize) -> String {
    value
        .to_string()
        .chars()
        .map(|c| {
            c.to_digit(10)
                .and_then(|digit| char::from_u32(0xFF10 + digit))
                .unwrap_or(c)
        })
        .collect()
}

pub(crate) fn banner(total: usize) -> String {
    let eye = "◕".red();
    let plural = if total == 1 { "" } else { "Ｓ" };
    format!(
        "／人{eye} ‿‿ {eye}人＼  ＬＥＴ’Ｓ　ＷＡＴＣＨ　{}　ＫＥＩＯＮ{plural}！",
        fullwidth(total)
    )
}

pub(crate) fn catalog_lines(catalog: &Catalog) -> Vec<String> {
    catalog.series().map(|series| series.to_string()).collect()
}

pub(crate) fn emit_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("Warning: {warning}");
    }
}
