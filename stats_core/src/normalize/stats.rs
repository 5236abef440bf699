//! Named statistic lookup.
//!
//! Upstream stat lists are short (well under twenty entries), so a linear
//! scan per requested name is all that is needed.

use super::json::{as_number, as_text, items, number, text};
use serde_json::Value;

/// The `{name, value, displayValue}` entry called `name`
pub fn find_stat<'a>(entries: &'a [Value], name: &str) -> Option<&'a Value> {
    entries
        .iter()
        .find(|entry| entry.get("name").and_then(Value::as_str) == Some(name))
}

/// Numeric value of a named stat, read from `value` and then `displayValue`
pub fn stat_value(entries: &[Value], name: &str) -> Option<f64> {
    let entry = find_stat(entries, name)?;
    number(entry, &["value"]).or_else(|| number(entry, &["displayValue"]))
}

/// Display text of a named stat
pub fn stat_display(entries: &[Value], name: &str) -> Option<String> {
    let entry = find_stat(entries, name)?;
    text(entry, &["displayValue"]).or_else(|| text(entry, &["summary"]))
}

/// Value of `stat` inside the category named `category`, where a category
/// carries parallel `names` and `values` arrays
pub fn category_value(categories: &[Value], category: &str, stat: &str) -> Option<f64> {
    let category = find_stat(categories, category)?;
    let index = items(category, "names")
        .iter()
        .position(|name| as_text(name).as_deref() == Some(stat))?;
    as_number(items(category, "values").get(index)?)
}
