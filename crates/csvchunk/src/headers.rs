//! Header names for from-scratch buffered parses.

use bstr::BString;

/// Resolves the captured header row into column names, substituting a
/// synthesized `Column N` (1-based) for each blank cell.
pub(crate) fn resolve_names(row: &[BString]) -> Vec<BString> {
    row.iter()
        .enumerate()
        .map(|(index, cell)| {
            if cell.is_empty() {
                BString::from(format!("Column {}", index + 1))
            } else {
                cell.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use bstr::BString;

    use super::resolve_names;

    fn row(cells: &[&str]) -> Vec<BString> {
        cells.iter().map(|c| BString::from(*c)).collect()
    }

    #[test]
    fn keeps_non_blank_names() {
        assert_eq!(resolve_names(&row(&["id", "name"])), row(&["id", "name"]));
    }

    #[test]
    fn synthesizes_blank_names_in_column_order() {
        assert_eq!(
            resolve_names(&row(&["", "name", "", ""])),
            row(&["Column 1", "name", "Column 3", "Column 4"])
        );
    }

    #[test]
    fn all_blank_headers_are_fully_synthesized() {
        assert_eq!(
            resolve_names(&row(&["", "", ""])),
            row(&["Column 1", "Column 2", "Column 3"])
        );
    }
}
