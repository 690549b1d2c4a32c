use analytics::{Aggregator, FormulaSet};
use chrono::NaiveDate;
use core_types::{CoreError, DateRangePolicy, RawDealRecord, RecordErrorPolicy};
use database::InMemoryStore;
use query::{QueryError, QueryFacade, QueryOptions};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn deal(uid: &str, day: u32, keyword: &str) -> RawDealRecord {
    RawDealRecord::new(uid, date(day), keyword, dec!(10), dec!(100))
        .with_init(dec!(8), dec!(90))
        .with_sold_amount(dec!(450))
}

fn records() -> Vec<RawDealRecord> {
    vec![
        deal("B", 2, "Bitcoin"),
        deal("A", 1, "Bitcoin"),
        deal("C", 3, "Bitcoin"),
        deal("A", 2, "Bitcoin"),
        deal("A", 3, "Bitcoin"),
        deal("Z", 2, "Ethereum"),
    ]
}

fn facade(records: Vec<RawDealRecord>) -> QueryFacade<InMemoryStore> {
    QueryFacade::new(
        InMemoryStore::new(records),
        Aggregator::default(),
        QueryOptions::default(),
    )
}

fn strict_facade(records: Vec<RawDealRecord>) -> QueryFacade<InMemoryStore> {
    QueryFacade::new(
        InMemoryStore::new(records),
        Aggregator::default(),
        QueryOptions {
            date_range_policy: DateRangePolicy::Strict,
            ..QueryOptions::default()
        },
    )
}

#[tokio::test]
async fn reads_the_store_exactly_once_per_query() {
    let facade = facade(records());
    facade
        .run_query("Bitcoin", Some("2024-01-01"), Some("2024-01-03"))
        .await
        .unwrap();
    assert_eq!(facade.store().fetch_count(), 1);
}

#[tokio::test]
async fn full_range_filters_and_sets_snapshot_date() {
    let result = facade(records())
        .run_query("Bitcoin", Some("2024-01-02"), Some("2024-01-02"))
        .await
        .unwrap();

    assert_eq!(result.as_of_date, Some(date(2)));
    assert_eq!(result.totals.len(), 1);
    assert_eq!(result.totals[0].date, date(2));
    assert_eq!(result.totals[0].total_real_volume, dec!(20));
    assert_eq!(result.deal_series.len(), 2);

    let uids: Vec<&str> = result.snapshot.iter().map(|r| r.deal_uid.as_str()).collect();
    assert_eq!(uids, vec!["A", "B"]);
}

#[tokio::test]
async fn no_range_uses_all_dates_and_latest_snapshot() {
    let result = facade(records()).run_query("Bitcoin", None, None).await.unwrap();

    let dates: Vec<NaiveDate> = result.totals.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![date(1), date(2), date(3)]);
    assert_eq!(result.deal_series.len(), 5);
    assert_eq!(result.as_of_date, Some(date(3)));
    let uids: Vec<&str> = result.snapshot.iter().map(|r| r.deal_uid.as_str()).collect();
    assert_eq!(uids, vec!["A", "C"]);
}

#[tokio::test]
async fn single_bound_runs_unfiltered_when_lenient() {
    let result = facade(records())
        .run_query("Bitcoin", None, Some("2024-01-01"))
        .await
        .unwrap();
    assert_eq!(result.date_range, None);
    assert_eq!(result.totals.len(), 3);
    assert_eq!(result.as_of_date, Some(date(1)));
    let uids: Vec<_> = result.snapshot.iter().map(|r| r.deal_uid.as_str()).collect();
    assert_eq!(uids, vec!["A"]);
}

#[tokio::test]
async fn lone_from_date_keeps_latest_snapshot_when_lenient() {
    let result = facade(records())
        .run_query("Bitcoin", Some("2024-01-02"), None)
        .await
        .unwrap();
    assert_eq!(result.date_range, None);
    assert_eq!(result.as_of_date, Some(date(3)));
    let uids: Vec<_> = result.snapshot.iter().map(|r| r.deal_uid.as_str()).collect();
    assert_eq!(uids, vec!["A", "C"]);
}

#[tokio::test]
async fn malformed_lone_bound_is_rejected_when_lenient() {
    let facade = facade(records());
    let err = facade
        .run_query("Bitcoin", None, Some("01/01/2024"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::Request(CoreError::MalformedDate(ref s)) if s == "01/01/2024"
    ));
    assert_eq!(facade.store().fetch_count(), 0);
}

#[tokio::test]
async fn single_bound_is_rejected_when_strict() {
    let facade = strict_facade(records());
    let err = facade
        .run_query("Bitcoin", Some("2024-01-01"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Request(CoreError::IncompleteDateRange)));
    assert_eq!(facade.store().fetch_count(), 0);
}

#[tokio::test]
async fn malformed_date_aborts_before_reading_the_store() {
    let facade = facade(records());
    let err = facade
        .run_query("Bitcoin", Some("2024-13-01"), Some("2024-01-03"))
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Request(CoreError::MalformedDate(_))));
    assert_eq!(facade.store().fetch_count(), 0);
}

#[tokio::test]
async fn snapshot_is_empty_when_to_date_has_no_records() {
    let result = facade(records())
        .run_query("Bitcoin", Some("2024-01-01"), Some("2024-01-10"))
        .await
        .unwrap();
    assert_eq!(result.as_of_date, Some(date(10)));
    assert!(result.snapshot.is_empty());
    assert_eq!(result.totals.len(), 3);
}

#[tokio::test]
async fn unknown_keyword_yields_empty_tables() {
    let result = facade(records()).run_query("Dogecoin", None, None).await.unwrap();
    assert!(result.totals.is_empty());
    assert!(result.deal_series.is_empty());
    assert!(result.snapshot.is_empty());
    assert_eq!(result.as_of_date, None);
}

#[tokio::test]
async fn empty_keyword_falls_back_to_default() {
    let result = facade(records()).run_query("  ", None, None).await.unwrap();
    assert_eq!(result.keyword, "Bitcoin");
    assert_eq!(result.deal_series.len(), 5);
}

#[tokio::test]
async fn repeated_queries_serialize_identically() {
    let facade = facade(records());
    let first = facade
        .run_query("Bitcoin", Some("2024-01-01"), Some("2024-01-03"))
        .await
        .unwrap();
    let second = facade
        .run_query("Bitcoin", Some("2024-01-01"), Some("2024-01-03"))
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn single_record_scenario() {
    let record = RawDealRecord::new("A", date(1), "Bitcoin", dec!(10), dec!(100))
        .with_init(dec!(8), dec!(90))
        .with_sold_amount(dec!(450));
    let result = facade(vec![record.clone()])
        .run_query("Bitcoin", Some("2024-01-01"), Some("2024-01-01"))
        .await
        .unwrap();
    assert_eq!(result.totals[0].total_expected_volume, dec!(15));
    assert_eq!(result.totals[0].total_expected_amount, dec!(1500));
    assert_eq!(result.deal_series[0].deal_expected_volume, dec!(7));
    assert_eq!(result.snapshot[0].deal_expected_volume, dec!(7));

    let mut without_price = record;
    without_price.init_price = None;
    let result = facade(vec![without_price])
        .run_query("Bitcoin", None, None)
        .await
        .unwrap();
    assert_eq!(result.totals[0].total_expected_volume, dec!(10));
    assert_eq!(result.totals[0].total_expected_amount, dec!(1000));
}

#[tokio::test]
async fn schema_mismatch_fails_the_request() {
    let mut data = records();
    data[0].sold_amount = None;
    let err = facade(data).run_query("Bitcoin", None, None).await.unwrap_err();
    assert!(matches!(err, QueryError::Analytics(_)));
}

#[tokio::test]
async fn skip_policy_excludes_invalid_records() {
    let mut data = records();
    data[0].sold_amount = None; // B on day 2
    let facade = QueryFacade::new(
        InMemoryStore::new(data),
        Aggregator::new(FormulaSet::default(), RecordErrorPolicy::Skip),
        QueryOptions::default(),
    );
    let result = facade.run_query("Bitcoin", None, None).await.unwrap();
    assert_eq!(result.deal_series.len(), 4);
    let day_two = result.totals.iter().find(|r| r.date == date(2)).unwrap();
    assert_eq!(day_two.total_real_volume, dec!(10));
    assert!(result.totals.iter().all(|r| r.total_real_volume > Decimal::ZERO));
}

#[tokio::test]
async fn facade_follows_loaded_configuration() {
    let mut config = configuration::Config::default();
    config.query.default_keyword = "Ethereum".to_string();
    config.formulas.sold_tracking = core_types::SoldTrackingMode::VolumeBased;

    let data = vec![
        RawDealRecord::new("Z", date(2), "Ethereum", dec!(10), dec!(100)).with_sold_volume(dec!(4)),
    ];
    let facade = QueryFacade::from_config(InMemoryStore::new(data), &config);
    let result = facade.run_query("", None, None).await.unwrap();
    assert_eq!(result.keyword, "Ethereum");
    assert_eq!(result.totals[0].total_expected_volume, dec!(14.2));
}
