// ==========================================
// 制衣生产跟踪系统 - 产能登记与回填集成测试
// ==========================================
// 覆盖: 缺口登记 / 测定值落库 / 存量工序实例回填
//       (仅补 null, 尺码与工序名双重匹配)
// ==========================================


use garment_aps::domain::RateLookup;
use std::collections::BTreeMap;
use test_helpers::{create_test_state, day, raw_record, seed_style};

#[tokio::test]
async fn test_measured_rate_backfills_only_null_instances() {
    let (temp, state) = create_test_state().unwrap();
    seed_style(temp.path().to_str().unwrap(), "ABC", &["Cut", "Sew"]).unwrap();

    // 两个 M 码产品 + 一个 L 码产品, 此时产能未测定 → 实例产能为 null
    let outcome = state
        .product_api
        .import_records(
            vec![
                raw_record("SR-1", "ABC", "M", 100, Some(day(30))),
                raw_record("SR-2", "ABC", "M", 50, Some(day(25))),
                raw_record("SR-3", "ABC", "L", 80, Some(day(28))),
            ],
            day(0),
        )
        .await
        .unwrap();
    assert_eq!(outcome.persisted_products.len(), 3);

    let reports = state
        .production_api
        .set_production_rates("Sew", BTreeMap::from([("M".to_string(), 12.0)]))
        .unwrap();

    // 每个尺码一份报告; 两个 M 码产品各回填一个 Sew 实例
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.process_name, "Sew");
    assert_eq!(report.size, "M");
    assert_eq!(report.updated.len(), 2);
    assert!(report.failed.is_empty());

    for product_id in &outcome.persisted_products {
        let product = state.production_api.get_product(product_id).unwrap();
        for process in &product.processes {
            let expected = if product.size == "M" && process.process_name == "Sew" {
                Some(12.0)
            } else {
                None // Cut 未测定, L 码不在本次回填范围
            };
            assert_eq!(process.production_per_day_per_machine, expected);
        }
    }

    // 产能文档本身: (Sew, M) 已测定, (Sew, L) 仍是缺口
    let rates = state.production_api.list_production_rates().unwrap();
    let sew = rates.iter().find(|r| r.process_name == "Sew").unwrap();
    assert_eq!(sew.lookup("M"), RateLookup::Measured(12.0));
    assert_eq!(sew.lookup("L"), RateLookup::Unmeasured);
}

#[tokio::test]
async fn test_backfill_leaves_measured_instances_untouched() {
    let (temp, state) = create_test_state().unwrap();
    seed_style(temp.path().to_str().unwrap(), "ABC", &["Sew"]).unwrap();

    // 先测定 (Sew, M) = 12 → 之后导入的实例在建档时即带测定值
    state
        .production_api
        .set_production_rates("Sew", BTreeMap::from([("M".to_string(), 12.0)]))
        .unwrap();
    state
        .product_api
        .import_records(vec![raw_record("SR-1", "ABC", "M", 100, Some(day(30)))], day(0))
        .await
        .unwrap();

    // 再次登记新值: 已测定的实例不动, 回填清单为空
    let reports = state
        .production_api
        .set_production_rates("Sew", BTreeMap::from([("M".to_string(), 20.0)]))
        .unwrap();
    assert!(reports[0].updated.is_empty());

    let products = state.production_api.list_products().unwrap();
    assert_eq!(
        products[0].processes[0].production_per_day_per_machine,
        Some(12.0)
    );

    // 产能文档取新值
    let rates = state.production_api.list_production_rates().unwrap();
    assert_eq!(rates[0].lookup("M"), RateLookup::Measured(20.0));
}

#[tokio::test]
async fn test_import_after_measurement_skips_gap_report() {
    let (temp, state) = create_test_state().unwrap();
    seed_style(temp.path().to_str().unwrap(), "ABC", &["Sew"]).unwrap();

    state
        .production_api
        .set_production_rates("Sew", BTreeMap::from([("M".to_string(), 9.5)]))
        .unwrap();

    let outcome = state
        .product_api
        .import_records(vec![raw_record("SR-1", "ABC", "M", 40, Some(day(10)))], day(0))
        .await
        .unwrap();

    // 已测定的 (工序, 尺码) 不再上报缺口
    assert!(outcome.missing_production_data.is_empty());
    let product = state
        .production_api
        .get_product(&outcome.persisted_products[0])
        .unwrap();
    assert_eq!(
        product.processes[0].production_per_day_per_machine,
        Some(9.5)
    );
}
