use std::sync::Arc;

use stampnav::catalogue::{CatalogueOption, FixtureCatalogueProvider};
use stampnav::core::{NavError, SideCategory, StackController, StepKind};
use tokio_test::{assert_err, assert_ok};

fn nz() -> StackController {
    StackController::new(Arc::new(FixtureCatalogueProvider::sample()))
}

fn option(segment: &str, label: &str) -> CatalogueOption {
    CatalogueOption::simple(segment, label)
}

fn top_code(nav: &StackController) -> &str {
    nav.top().map(|t| t.code.as_str()).unwrap_or_default()
}

#[tokio::test]
async fn test_open_drill_close_and_side_category() {
    let mut nav = nz();

    assert_ok!(nav.open_root(&option("NZ", "New Zealand")).await);
    assert_eq!((nav.depth(), top_code(&nav)), (1, "NZ"));

    assert_ok!(nav.drill(&option("014", "1898 Pictorials")).await);
    assert_eq!((nav.depth(), top_code(&nav)), (2, "NZ.014"));

    assert_ok!(nav.drill(&option("1898", "1898")).await);
    assert_eq!((nav.depth(), top_code(&nav)), (3, "NZ.014.1898"));

    assert_ok!(nav.close());
    assert_eq!((nav.depth(), top_code(&nav)), (2, "NZ.014"));

    let errors = nav.drill_side_category(SideCategory::Errors).await.unwrap();
    assert_eq!(errors.kind, StepKind::SideCategory(SideCategory::Errors));
    assert!(errors.has_consumed(SideCategory::Errors));
    assert_eq!(nav.depth(), 3);

    let err = assert_err!(nav.drill_side_category(SideCategory::Errors).await);
    assert_eq!(err, NavError::DuplicateCategory(SideCategory::Errors));
    assert_eq!(nav.depth(), 3);
}

#[tokio::test]
async fn test_full_path_to_a_stamp() {
    let mut nav = nz();
    nav.open_root(&option("NZ", "New Zealand")).await.unwrap();
    for (segment, label) in [
        ("014", "1898 Pictorials"),
        ("1898", "1898"),
        ("GBP", "Sterling"),
        ("1d", "1d"),
        ("Carmine", "Carmine"),
        ("Wove", "Wove"),
    ] {
        nav.drill(&option(segment, label)).await.unwrap();
    }
    // Missing watermark segment becomes the placeholder
    nav.drill(&CatalogueOption::new("w0", "No watermark", None))
        .await
        .unwrap();
    assert_eq!(top_code(&nav), "NZ.014.1898.GBP.1d.Carmine.Wove.NoWmk");

    nav.drill(&option("14", "Perf 14")).await.unwrap();
    nav.drill(&option("Stamp", "Single stamp")).await.unwrap();
    assert!(nav.can_select_detail());

    let stamp = nav.select_detail(&option("A1", "Pembroke Peak")).await.unwrap();
    assert_eq!(stamp.kind, StepKind::StampDetail);
    let record = stamp.detail.as_ref().unwrap();
    assert_eq!(record.code, "NZ.014.1898.GBP.1d.Carmine.Wove.NoWmk.14.Stamp.A1");
    assert_eq!(nav.depth(), 11);

    // Every frame's code extends its parent's by one segment
    let stack = nav.current_stack();
    for pair in stack.windows(2) {
        assert!(pair[1].code.starts_with(&format!("{}.", pair[0].code)));
    }
}

#[tokio::test]
async fn test_restore_round_trips_a_path() {
    let mut nav = nz();
    nav.restore("NZ.014.~errors").await.unwrap();
    assert_eq!(nav.breadcrumb(), vec!["New Zealand", "1898 Pictorials", "Errors"]);

    let err = assert_err!(nav.restore("NZ.014.bogus").await);
    assert!(matches!(err, NavError::PathNotFound { ref segment, .. } if segment == "bogus"));
    // Failed restore keeps the previous path
    assert_eq!(top_code(&nav), "NZ.014.~errors");
}

#[tokio::test]
async fn test_close_all_then_reopen() {
    let mut nav = nz();
    nav.restore("NZ.014.1898").await.unwrap();
    nav.close_all();
    assert_eq!(nav.depth(), 0);
    assert_err!(nav.close());

    nav.open_root(&option("AU", "Australia")).await.unwrap();
    assert_eq!(top_code(&nav), "AU");
    // Nothing is listed under Australia in the sample
    assert!(nav.top().unwrap().options.is_empty());
}
