//! Pretty output formatting.

use serde_json::Value;

use dynamap::Document;

use super::Report;

/// Format a report for display.
pub fn format_report(report: &Report) -> String {
    match report {
        Report::Item(Some(item)) => format_item(item),
        Report::Item(None) => "No item found.".to_string(),
        Report::Page(page) => {
            let mut output = format_items(&page.items);
            if let Some(cursor) = &page.next_page {
                output.push_str(&format!("\nNext page: {}", cursor));
            }
            output
        }
        Report::Items(items) => format_items(items),
        Report::Counter { field, value } => match value {
            Some(value) => format!("{} = {}", field, value),
            None => format!("{} incremented", field),
        },
        Report::Lines(lines) => lines.join("\n"),
        Report::Message(message) => message.clone(),
    }
}

/// Format a single item as indented JSON.
pub fn format_item(item: &Document) -> String {
    serde_json::to_string_pretty(&Value::Object(item.clone())).unwrap_or_default()
}

/// Format items for display.
pub fn format_items(items: &[Document]) -> String {
    if items.is_empty() {
        return "No items found.".to_string();
    }
    let mut output = format!("ITEMS ({})\n", items.len());
    output.push_str(&"-".repeat(40));
    for item in items {
        output.push_str(&format!("\n{}", format_item(item)));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use dynamap::Page;

    use super::*;

    #[test]
    fn test_empty_page_shows_cursor() {
        let report = Report::Page(Page {
            items: Vec::new(),
            next_page: Some("c".to_string()),
        });

        assert_eq!(format_report(&report), "No items found.\nNext page: c");
    }

    #[test]
    fn test_counter_without_value() {
        let report = Report::Counter {
            field: "views".to_string(),
            value: None,
        };

        assert_eq!(format_report(&report), "views incremented");
    }
}
