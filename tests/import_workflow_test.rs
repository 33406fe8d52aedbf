// ==========================================
// 制衣生产跟踪系统 - 导入工作流集成测试
// ==========================================
// 覆盖: 已知款式建档 / 未知款式暂存与解析 /
//       行级失败隔离 / 订单折叠 / 文件导入
// ==========================================


use chrono::Datelike;
use garment_aps::api::ApiError;
use garment_aps::domain::{MissingRate, RateLookup, StyleSubmission};
use std::io::Write;
use test_helpers::{create_test_state, day, raw_record, seed_style};

#[tokio::test]
async fn test_import_known_style_creates_product_and_order() {
    let (temp, state) = create_test_state().unwrap();
    seed_style(temp.path().to_str().unwrap(), "ABC", &["Cut", "Sew", "Pack"]).unwrap();

    let outcome = state
        .product_api
        .import_records(vec![raw_record("SR-1", "ABC", "M", 100, Some(day(30)))], day(0))
        .await
        .unwrap();

    assert_eq!(outcome.persisted_products.len(), 1);
    assert!(outcome.unknown_styles.is_empty());
    assert!(outcome.errors.is_empty());

    // 工序实例: 模板拷贝 + 空台账 + 排期就位
    let product = state
        .production_api
        .get_product(&outcome.persisted_products[0])
        .unwrap();
    assert_eq!(product.processes.len(), 3);
    let indexes: Vec<i32> = product.processes.iter().map(|p| p.sequence_index).collect();
    assert_eq!(indexes, vec![1, 2, 3]);
    assert!(product.processes.iter().all(|p| p.entries.is_empty()));
    assert!(product.processes.iter().all(|p| p.total_production == 0));

    assert_eq!(product.processes[2].end_date, Some(day(30)));
    assert_eq!(product.processes[1].end_date, Some(day(25)));
    assert_eq!(product.processes[0].end_date, Some(day(20)));
    assert_eq!(product.processes[0].start_date, Some(day(0)));
    assert_eq!(product.processes[1].start_date, Some(day(5)));
    assert_eq!(product.processes[2].start_date, Some(day(10)));

    // 缺产能: 三个工序都没有 (工序, M) 记录 → 登记缺口并上报
    assert_eq!(outcome.missing_production_data.len(), 3);
    let rates = state.production_api.list_production_rates().unwrap();
    assert_eq!(rates.len(), 3);
    assert!(rates.iter().all(|r| r.lookup("M") == RateLookup::Unmeasured));

    // 订单: 新建 + 周次派生 + 产品条目未完成
    let orders = state.product_api.list_orders().unwrap();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.sr_no, "SR-1");
    assert_eq!(order.week, Some(day(30).iso_week().week()));
    assert_eq!(order.products.len(), 1);
    assert!(!order.products[0].completed);
    assert!(!order.completed);

    // 买家名录 insert-if-absent
    let buyers = state.buyer_api.list_buyers().unwrap();
    assert_eq!(buyers.len(), 1);
    assert_eq!(buyers[0].name, "ACME");
}

#[tokio::test]
async fn test_unknown_style_staged_until_resolution() {
    let (_temp, state) = create_test_state().unwrap();

    let outcome = state
        .product_api
        .import_records(vec![raw_record("SR-1", "XYZ", "M", 50, Some(day(20)))], day(0))
        .await
        .unwrap();

    // 未知款式上报, 产品未建档
    assert_eq!(outcome.unknown_styles, vec!["XYZ".to_string()]);
    assert!(outcome.persisted_products.is_empty());
    assert!(state.production_api.list_products().unwrap().is_empty());
    assert!(state.product_api.list_orders().unwrap().is_empty());

    // 解析步骤: 凭批次ID提交工序
    let resolved = state
        .product_api
        .resolve_pending_styles(
            &outcome.batch_id,
            vec![StyleSubmission {
                style_name: "XYZ".to_string(),
                process_names: vec!["Cut".to_string(), "Pack".to_string()],
            }],
            day(1),
        )
        .await
        .unwrap();

    assert_eq!(resolved.persisted_products.len(), 1);
    assert!(resolved.unknown_styles.is_empty());

    let product = state
        .production_api
        .get_product(&resolved.persisted_products[0])
        .unwrap();
    assert_eq!(product.style_name, "XYZ");
    assert_eq!(product.processes.len(), 2);
    // 末道工序完工日锚定出厂日, 开工日锚定解析时传入的导入日
    assert_eq!(product.processes[1].end_date, Some(day(20)));
    assert_eq!(product.processes[0].start_date, Some(day(1)));
    assert_eq!(product.processes[1].start_date, Some(day(6)));

    let orders = state.product_api.list_orders().unwrap();
    assert_eq!(orders.len(), 1);

    // 款式目录已落库, sequence_index 为 1..N
    let style = state.style_api.get_style("XYZ").unwrap();
    let indexes: Vec<i32> = style.processes.iter().map(|p| p.sequence_index).collect();
    assert_eq!(indexes, vec![1, 2]);
}

#[tokio::test]
async fn test_resolution_keeps_uncovered_styles_staged() {
    let (_temp, state) = create_test_state().unwrap();

    let outcome = state
        .product_api
        .import_records(
            vec![
                raw_record("SR-1", "XYZ", "M", 50, Some(day(20))),
                raw_record("SR-2", "QRS", "L", 60, Some(day(25))),
            ],
            day(0),
        )
        .await
        .unwrap();
    assert_eq!(
        outcome.unknown_styles,
        vec!["QRS".to_string(), "XYZ".to_string()]
    );

    // 只提交 XYZ: QRS 的暂存行保留并继续上报
    let resolved = state
        .product_api
        .resolve_pending_styles(
            &outcome.batch_id,
            vec![StyleSubmission {
                style_name: "XYZ".to_string(),
                process_names: vec!["Cut".to_string()],
            }],
            day(0),
        )
        .await
        .unwrap();

    assert_eq!(resolved.persisted_products.len(), 1);
    assert_eq!(resolved.unknown_styles, vec!["QRS".to_string()]);

    // 二次提交补齐 QRS
    let resolved = state
        .product_api
        .resolve_pending_styles(
            &outcome.batch_id,
            vec![StyleSubmission {
                style_name: "QRS".to_string(),
                process_names: vec!["Cut".to_string(), "Sew".to_string()],
            }],
            day(0),
        )
        .await
        .unwrap();
    assert_eq!(resolved.persisted_products.len(), 1);
    assert!(resolved.unknown_styles.is_empty());
    assert_eq!(state.production_api.list_products().unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_ship_date_aborts_row_only() {
    let (temp, state) = create_test_state().unwrap();
    seed_style(temp.path().to_str().unwrap(), "ABC", &["Cut"]).unwrap();

    let outcome = state
        .product_api
        .import_records(
            vec![
                raw_record("SR-1", "ABC", "M", 100, None), // 缺出厂日
                raw_record("SR-2", "ABC", "L", 40, Some(day(15))),
            ],
            day(0),
        )
        .await
        .unwrap();

    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].sr_no, "SR-1");
    assert_eq!(outcome.persisted_products.len(), 1);
    assert_eq!(state.production_api.list_products().unwrap().len(), 1);
}

#[tokio::test]
async fn test_same_sr_no_folds_into_single_order() {
    let (temp, state) = create_test_state().unwrap();
    seed_style(temp.path().to_str().unwrap(), "ABC", &["Cut"]).unwrap();

    state
        .product_api
        .import_records(
            vec![
                raw_record("SR-1", "ABC", "M", 100, Some(day(30))),
                raw_record("SR-1", "ABC", "L", 80, Some(day(30))),
            ],
            day(0),
        )
        .await
        .unwrap();

    let orders = state.product_api.list_orders().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].products.len(), 2);

    // 同 sr_no 的后续导入追加条目并重置完成标志
    state
        .product_api
        .import_records(vec![raw_record("SR-1", "ABC", "S", 20, Some(day(30)))], day(0))
        .await
        .unwrap();
    let orders = state.product_api.list_orders().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].products.len(), 3);
    assert!(!orders[0].completed);
}

#[tokio::test]
async fn test_submit_processes_rebuilds_persisted_products() {
    let (temp, state) = create_test_state().unwrap();
    seed_style(temp.path().to_str().unwrap(), "ABC", &["Cut", "Sew"]).unwrap();

    let outcome = state
        .product_api
        .import_records(vec![raw_record("SR-1", "ABC", "M", 100, Some(day(30)))], day(0))
        .await
        .unwrap();
    let product_id = outcome.persisted_products[0].clone();

    // 录满两道工序并重算, 让产品进入已完成状态
    let process_ids: Vec<String> = state
        .production_api
        .get_product(&product_id)
        .unwrap()
        .processes
        .iter()
        .map(|p| p.process_id.clone())
        .collect();
    state
        .production_api
        .record_entry(&product_id, &process_ids[0], day(1), 100)
        .unwrap();
    state
        .production_api
        .record_entry(&product_id, &process_ids[1], day(6), 100)
        .unwrap();
    assert!(state.production_api.update_process_status(&product_id).unwrap());

    // 重新提交工序: 目录整体替换 + 存量产品整体重建
    let report = state
        .style_api
        .submit_processes(
            "ABC",
            &["Cut".to_string(), "Sew".to_string(), "Pack".to_string()],
            day(2),
        )
        .await
        .unwrap();

    assert_eq!(report.style_name, "ABC");
    assert_eq!(report.updated_products, vec![product_id.clone()]);
    assert!(report.errors.is_empty());
    // Cut/Sew 的 (工序, M) 缺口在首次导入时已登记, 只有新工序 Pack 上报
    assert_eq!(
        report.missing_production_data,
        vec![MissingRate {
            process_name: "Pack".to_string(),
            size: "M".to_string(),
        }]
    );

    // 工序实例重新生成: 空台账 + 重新排期 + 完成标志清零
    let product = state.production_api.get_product(&product_id).unwrap();
    assert!(!product.completed);
    assert_eq!(product.processes.len(), 3);
    assert!(product.processes.iter().all(|p| p.entries.is_empty()));
    assert!(product.processes.iter().all(|p| p.total_production == 0));
    assert!(product.processes.iter().all(|p| !p.completed));

    assert_eq!(product.processes[2].end_date, Some(day(30)));
    assert_eq!(product.processes[1].end_date, Some(day(25)));
    assert_eq!(product.processes[0].end_date, Some(day(20)));
    assert_eq!(product.processes[0].start_date, Some(day(2)));
    assert_eq!(product.processes[1].start_date, Some(day(7)));
    assert_eq!(product.processes[2].start_date, Some(day(12)));

    // 款式目录同步替换
    let style = state.style_api.get_style("ABC").unwrap();
    let indexes: Vec<i32> = style.processes.iter().map(|p| p.sequence_index).collect();
    assert_eq!(indexes, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_submit_processes_without_products_is_not_found() {
    let (_temp, state) = create_test_state().unwrap();

    // 该款无已建档产品: 无可重建对象
    let err = state
        .style_api
        .submit_processes("ZZZ", &["Cut".to_string()], day(0))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_import_csv_file_end_to_end() {
    let (temp, state) = create_test_state().unwrap();
    seed_style(temp.path().to_str().unwrap(), "ABC", &["Cut", "Sew"]).unwrap();

    let mut csv = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(
        csv,
        "SR NO.,BUYER,BUYER PO,COLOUR,EX-FECT,ARTICLE,SIZE,QTY,PROCESSES"
    )
    .unwrap();
    writeln!(csv, "SR-7,ACME,PO-1,Red,2025-03-31,ABC,M,120,").unwrap();
    csv.flush().unwrap();

    let outcome = state
        .product_api
        .import_file(csv.path(), day(0))
        .await
        .unwrap();

    assert_eq!(outcome.persisted_products.len(), 1);
    let product = state
        .production_api
        .get_product(&outcome.persisted_products[0])
        .unwrap();
    assert_eq!(product.sr_no, "SR-7");
    assert_eq!(product.quantity, 120);
    assert_eq!(product.ex_factory_date, Some(day(30)));
}
