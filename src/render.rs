use analytics::{DerivedDealRow, DerivedTotalsRow, SnapshotRow};
use comfy_table::Table;
use query::QueryResult;

/// Prints the three result tables to stdout.
pub fn print_tables(result: &QueryResult) {
    let range = match &result.date_range {
        Some(r) => format!("{} to {}", r.from, r.to),
        None => "all dates".to_string(),
    };
    println!("Keyword: {} ({range})", result.keyword);

    println!("\nTotals by date");
    println!("{}", totals_table(&result.totals));

    println!("\nDeal series");
    println!("{}", deal_series_table(&result.deal_series));

    match result.as_of_date {
        Some(date) => println!("\nSnapshot as of {date}"),
        None => println!("\nSnapshot (no data)"),
    }
    println!("{}", snapshot_table(&result.snapshot));
}

fn totals_table(rows: &[DerivedTotalsRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "date",
        "total_real_volume",
        "total_init_volume",
        "total_effective_volume",
        "total_expected_volume",
        "total_init_amount",
        "total_effective_amount",
        "total_expected_amount",
    ]);
    for row in rows {
        table.add_row(vec![
            row.date.to_string(),
            row.total_real_volume.to_string(),
            row.total_init_volume.to_string(),
            row.total_effective_volume.to_string(),
            row.total_expected_volume.to_string(),
            row.total_init_amount.to_string(),
            row.total_effective_amount.to_string(),
            row.total_expected_amount.to_string(),
        ]);
    }
    table
}

fn deal_series_table(rows: &[DerivedDealRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "deal_uid",
        "date",
        "price",
        "volume",
        "init_volume",
        "deal_expected_volume",
    ]);
    for row in rows {
        table.add_row(vec![
            row.deal_uid.clone(),
            row.date.to_string(),
            row.price.to_string(),
            row.volume.to_string(),
            row.init_volume.to_string(),
            row.deal_expected_volume.to_string(),
        ]);
    }
    table
}

fn snapshot_table(rows: &[SnapshotRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "deal_uid",
        "deal_sold_volume",
        "deal_expected_volume",
        "deal_effective_amount",
        "deal_sold_amount",
        "deal_expected_amount",
    ]);
    for row in rows {
        table.add_row(vec![
            row.deal_uid.clone(),
            row.deal_sold_volume.to_string(),
            row.deal_expected_volume.to_string(),
            row.deal_effective_amount.to_string(),
            row.deal_sold_amount.to_string(),
            row.deal_expected_amount.to_string(),
        ]);
    }
    table
}
