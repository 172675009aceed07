/// Output formatting: terminal table, JSON, and CSV export.
use photorank_core::RankedItem;
use serde::Serialize;
use std::path::Path;

use crate::bail;

#[derive(Serialize)]
struct JsonRankedItem {
    rank: usize,
    name: String,
    rating: f64,
    confidence: f64,
    comparisons: usize,
}

#[derive(Serialize)]
struct JsonOutput {
    items: Vec<JsonRankedItem>,
    total_comparisons: usize,
}

/// Print results as a formatted terminal table.
pub fn print_table(rankings: &[RankedItem], names: &[String], total_comparisons: usize) {
    // Find the widest item name for padding
    let name_width = rankings
        .iter()
        .map(|r| names[r.id as usize].len())
        .max()
        .unwrap_or(4)
        .max(4); // at least "Item"

    println!(" # | {:<name_width$} | Rating | Confidence | Comparisons", "Item");
    println!("---|-{}-|--------|------------|------------", "-".repeat(name_width));

    for r in rankings {
        let name = &names[r.id as usize];
        println!(
            "{:>2} | {:<name_width$} | {:>6} | {:>9.0}% | {:>11}",
            r.rank, name, r.rating, r.confidence, r.comparisons,
        );
    }

    println!(
        "\n{} items ranked after {} comparisons",
        rankings.len(),
        total_comparisons,
    );
}

/// Print results as JSON.
pub fn print_json(rankings: &[RankedItem], names: &[String], total_comparisons: usize) {
    let items: Vec<JsonRankedItem> = rankings
        .iter()
        .map(|r| JsonRankedItem {
            rank: r.rank,
            name: names[r.id as usize].clone(),
            rating: r.rating,
            confidence: r.confidence,
            comparisons: r.comparisons,
        })
        .collect();

    let output = JsonOutput { items, total_comparisons };

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

/// Write the ranking to a CSV file: Rank,Name,Rating,Confidence,Comparisons.
pub fn write_csv(path: &Path, rankings: &[RankedItem], names: &[String]) {
    let mut csv = String::from("Rank,Name,Rating,Confidence,Comparisons\n");
    for r in rankings {
        let name = names[r.id as usize].replace('"', "\"\"");
        csv.push_str(&format!(
            "{},\"{}\",{},{:.0}%,{}\n",
            r.rank, name, r.rating, r.confidence, r.comparisons,
        ));
    }

    std::fs::write(path, csv)
        .unwrap_or_else(|e| bail(format!("Failed to write CSV to {}: {e}", path.display())));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_escapes_quoted_names() {
        let rankings = vec![RankedItem {
            id: 0,
            rank: 1,
            rating: 1416.0,
            confidence: 5.0,
            comparisons: 1,
        }];
        let names = vec![r#"my "best" shot.jpg"#.to_string()];

        let dir = std::env::temp_dir().join("photorank-csv-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rankings.csv");
        write_csv(&path, &rankings, &names);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Rank,Name,Rating,Confidence,Comparisons\n"));
        assert!(written.contains(r#""my ""best"" shot.jpg""#));
        std::fs::remove_file(&path).unwrap();
    }
}
