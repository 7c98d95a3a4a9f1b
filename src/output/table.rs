//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format data as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled)]
    struct GroupLine {
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "GROUP ID")]
        id: String,
    }

    #[test]
    fn test_format_table_empty() {
        let items: Vec<GroupLine> = vec![];
        let result = format_table(&items);
        assert_eq!(result, "No results found.");
    }

    #[test]
    fn test_format_table_single_row() {
        let items = vec![GroupLine {
            name: "Engineering".to_string(),
            id: "g-1".to_string(),
        }];

        let result = format_table(&items);

        assert!(result.contains("NAME"));
        assert!(result.contains("GROUP ID"));
        assert!(result.contains("Engineering"));
        assert!(result.contains("g-1"));
    }

    #[test]
    fn test_format_table_multiple_rows() {
        let items = vec![
            GroupLine {
                name: "Finance-Team".to_string(),
                id: "g-1".to_string(),
            },
            GroupLine {
                name: "Eng-All".to_string(),
                id: "g-2".to_string(),
            },
        ];

        let result = format_table(&items);

        assert!(result.contains("Finance-Team"));
        assert!(result.contains("Eng-All"));
    }

    #[test]
    fn test_format_table_uses_rounded_style() {
        let items = vec![GroupLine {
            name: "Engineering".to_string(),
            id: "g-1".to_string(),
        }];

        let result = format_table(&items);

        // Rounded style uses ╭ for top-left corner
        assert!(result.contains("╭"));
        assert!(result.contains("╰"));
    }
}
